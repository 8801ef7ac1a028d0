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

//! PNG chunk framing.
//!
//! ```text
//! [length BE32][type 4 bytes][data][CRC-32 BE32 over type + data]
//! ```

use std::fmt;
use std::io::{self, Write};

use crate::checksum::{crc32, crc32_update};

/// Largest chunk data length allowed by the PNG specification (2^31 - 1).
pub const MAX_CHUNK_LEN: usize = 0x7FFF_FFFF;

/// Four-byte chunk type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const PLTE: Self = Self(*b"PLTE");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Tag as text, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self.0 {
            [b'I', b'H', b'D', b'R'] => "IHDR",
            [b'P', b'L', b'T', b'E'] => "PLTE",
            [b'I', b'D', b'A', b'T'] => "IDAT",
            [b'I', b'E', b'N', b'D'] => "IEND",
            _ => "chunk",
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            write!(f, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

/// Writes one chunk to `sink`, advancing it by `12 + payload.len()` bytes.
///
/// The CRC is accumulated over the tag and then the payload, so neither is
/// copied.
///
/// # Errors
///
/// Returns `InvalidInput` if the payload exceeds [`MAX_CHUNK_LEN`], and
/// propagates any sink error unchanged. Callers assembling a whole file go
/// through `PngEncoding::check`, which reports oversized chunks as
/// `ConfigError::ChunkTooLarge` before anything is written.
pub fn write_chunk<W: Write + ?Sized>(
    sink: &mut W,
    chunk_type: ChunkType,
    payload: &[u8],
) -> io::Result<()> {
    let len = u32::try_from(payload.len())
        .ok()
        .filter(|_| payload.len() <= MAX_CHUNK_LEN)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{chunk_type} payload of {} bytes exceeds {MAX_CHUNK_LEN}",
                    payload.len()
                ),
            )
        })?;
    let crc = crc32_update(crc32(chunk_type.as_bytes()), payload);

    sink.write_all(&len.to_be_bytes())?;
    sink.write_all(chunk_type.as_bytes())?;
    sink.write_all(payload)?;
    sink.write_all(&crc.to_be_bytes())?;

    #[cfg(feature = "debug-logging")]
    log::info!("chunk {chunk_type}: {len} bytes, crc=0x{crc:08x}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts `capacity` bytes, then fails every write.
    struct FailingSink {
        written: Vec<u8>,
        capacity: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.capacity - self.written.len();
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "sink full"));
            }
            let n = room.min(buf.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_iend_chunk_bytes() {
        let mut out = Vec::new();
        write_chunk(&mut out, ChunkType::IEND, &[]).unwrap();
        assert_eq!(
            out,
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_length_and_crc_fields() {
        let payload = [0u8, 0, 0, 0xFF, 0xFF, 0xFF];
        let mut out = Vec::new();
        write_chunk(&mut out, ChunkType::PLTE, &payload).unwrap();

        assert_eq!(out.len(), 12 + payload.len());
        assert_eq!(u32::from_be_bytes([out[0], out[1], out[2], out[3]]), 6);
        assert_eq!(&out[4..8], b"PLTE");
        assert_eq!(&out[8..14], &payload);

        let stored_crc = u32::from_be_bytes([out[14], out[15], out[16], out[17]]);
        assert_eq!(stored_crc, crc32(&out[4..14]));
        assert_eq!(stored_crc, 0xA5D9_9FDD);
    }

    #[test]
    fn test_sink_error_is_propagated() {
        let mut sink = FailingSink {
            written: Vec::new(),
            capacity: 6,
        };
        let err = write_chunk(&mut sink, ChunkType::IDAT, b"payload").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert_eq!(sink.written.len(), 6);
    }

    #[test]
    fn test_chunk_type_display() {
        assert_eq!(ChunkType::IHDR.to_string(), "IHDR");
        assert_eq!(ChunkType(*b"tEXt").to_string(), "tEXt");
        assert_eq!(ChunkType::IDAT.name(), "IDAT");
        assert_eq!(ChunkType(*b"tEXt").name(), "chunk");
    }
}
