// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Checksums required by the PNG container and its zlib stream.
//!
//! - **CRC-32** (ISO 3309 / ITU-T V.42, reflected polynomial `0xEDB88320`):
//!   protects every PNG chunk, computed over chunk type + chunk data.
//! - **Adler-32** (RFC 1950 section 8.2): trails every zlib stream, computed
//!   over the uncompressed data.
//!
//! Both are pure and can be fed incrementally: passing the result of one call
//! as the starting state of the next gives the checksum of the concatenation.

const CRC_POLYNOMIAL: u32 = 0xEDB8_8320;

/// Largest prime smaller than 65536.
const ADLER_MODULUS: u32 = 65521;

/// Largest n such that 255n(n+1)/2 + (n+1)(MOD-1) fits in 32 bits,
/// so the modulo can be deferred for this many bytes.
const ADLER_NMAX: usize = 5552;

static CRC_TABLE: [u32; 256] = build_crc_table();

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 {
                CRC_POLYNOMIAL ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// CRC-32 of `bytes`. The empty input yields 0.
#[must_use]
pub fn crc32(bytes: &[u8]) -> u32 {
    crc32_update(0, bytes)
}

/// Continues a CRC-32 computation from a previous result.
///
/// `crc32_update(crc32(a), b) == crc32(a ++ b)`.
#[must_use]
pub fn crc32_update(crc: u32, bytes: &[u8]) -> u32 {
    let mut c = !crc;
    for &byte in bytes {
        c = CRC_TABLE[((c ^ u32::from(byte)) & 0xFF) as usize] ^ (c >> 8);
    }
    !c
}

/// Adler-32 of `bytes`. The empty input yields 1.
#[must_use]
pub fn adler32(bytes: &[u8]) -> u32 {
    adler32_update(1, bytes)
}

/// Continues an Adler-32 computation from a previous result.
#[must_use]
pub fn adler32_update(adler: u32, bytes: &[u8]) -> u32 {
    let mut a = adler & 0xFFFF;
    let mut b = adler >> 16;
    for block in bytes.chunks(ADLER_NMAX) {
        for &byte in block {
            a += u32::from(byte);
            b += a;
        }
        a %= ADLER_MODULUS;
        b %= ADLER_MODULUS;
    }
    (b << 16) | a
}
