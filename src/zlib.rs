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

//! Zlib stream framing with stored (uncompressed) deflate blocks.
//!
//! # Wire Format
//!
//! ```text
//! [0x78][0x01]                         RFC 1950 header: deflate, 32K window, FLEVEL 0
//! repeated per block (RFC 1951 section 3.2.4):
//!   [BFINAL][LEN lo][LEN hi][NLEN lo][NLEN hi][LEN literal bytes]
//! [ADLER32 BE]                         Adler-32 of the whole uncompressed payload
//! ```
//!
//! `BFINAL` is a whole byte because a stored block header with `BTYPE = 00`
//! is padded to the next byte boundary. Only the last block has `BFINAL = 1`.
//! An empty payload still produces one (empty, final) block.

use bytes::{BufMut, BytesMut};

use crate::checksum::adler32;
use crate::error::ConfigError;

/// CMF/FLG pair emitted by zlib at compression level 0.
pub const ZLIB_HEADER: [u8; 2] = [0x78, 0x01];

/// Bytes of block metadata preceding each stored block's literal data.
const STORED_BLOCK_OVERHEAD: usize = 5;

/// Size of the trailing Adler-32 checksum.
const ZLIB_TRAILER_LEN: usize = 4;

/// Maximum literal length of one stored block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSize(u16);

impl BlockSize {
    /// The format's hard limit, imposed by the 16-bit `LEN` field.
    pub const MAX: Self = Self(u16::MAX);

    /// The block size zlib itself uses for stored blocks.
    pub const ZLIB_DEFAULT: Self = Self(0xFB00);

    /// Validates a block size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBlockSize`] for 0 or anything above 65535.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        match u16::try_from(size) {
            Ok(size) if size > 0 => Ok(Self(size)),
            _ => Err(ConfigError::InvalidBlockSize(size)),
        }
    }

    #[must_use]
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self::ZLIB_DEFAULT
    }
}

/// Length of the stream [`encode_zlib_stored`] produces for a payload of
/// `payload_len` bytes, saturating at `usize::MAX`.
#[must_use]
pub fn stored_len(payload_len: usize, block_size: BlockSize) -> usize {
    let blocks = payload_len.div_ceil(block_size.get()).max(1);
    (ZLIB_HEADER.len() + ZLIB_TRAILER_LEN)
        .saturating_add(blocks.saturating_mul(STORED_BLOCK_OVERHEAD))
        .saturating_add(payload_len)
}

/// Wraps `payload` in a zlib stream made of stored deflate blocks.
///
/// The payload bytes appear in the output unchanged and in order, split into
/// blocks of at most `block_size` bytes.
#[must_use]
pub fn encode_zlib_stored(payload: &[u8], block_size: BlockSize) -> BytesMut {
    let mut buf = BytesMut::with_capacity(stored_len(payload.len(), block_size));
    buf.put_slice(&ZLIB_HEADER);

    if payload.is_empty() {
        put_stored_block(&mut buf, &[], true);
    } else {
        let mut blocks = payload.chunks(block_size.get()).peekable();
        while let Some(block) = blocks.next() {
            put_stored_block(&mut buf, block, blocks.peek().is_none());
        }
    }

    buf.put_u32(adler32(payload));

    #[cfg(feature = "debug-logging")]
    log::info!(
        "zlib stored: {} payload bytes framed into {} bytes (block size {})",
        payload.len(),
        buf.len(),
        block_size.get()
    );

    buf
}

#[allow(clippy::cast_possible_truncation)] // Block length bounded by BlockSize (u16)
fn put_stored_block(buf: &mut BytesMut, block: &[u8], is_final: bool) {
    let len = block.len() as u16;
    buf.put_u8(u8::from(is_final));
    buf.put_u16_le(len);
    buf.put_u16_le(!len);
    buf.put_slice(block);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_size_bounds() {
        assert_eq!(BlockSize::new(0), Err(ConfigError::InvalidBlockSize(0)));
        assert_eq!(
            BlockSize::new(65536),
            Err(ConfigError::InvalidBlockSize(65536))
        );
        assert_eq!(BlockSize::new(65535), Ok(BlockSize::MAX));
        assert_eq!(BlockSize::new(1).map(BlockSize::get), Ok(1));
        assert_eq!(BlockSize::default().get(), 0xFB00);
    }

    #[test]
    fn test_empty_payload_emits_one_final_block() {
        let framed = encode_zlib_stored(&[], BlockSize::default());
        assert_eq!(
            &framed[..],
            &[0x78, 0x01, 0x01, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn test_payload_split_across_blocks() {
        let block_size = BlockSize::new(3).unwrap();
        let framed = encode_zlib_stored(b"abcdefg", block_size);
        let expected: &[u8] = &[
            0x78, 0x01, // header
            0x00, 0x03, 0x00, 0xFC, 0xFF, b'a', b'b', b'c', // block 1
            0x00, 0x03, 0x00, 0xFC, 0xFF, b'd', b'e', b'f', // block 2
            0x01, 0x01, 0x00, 0xFE, 0xFF, b'g', // final block
            0x0A, 0xDB, 0x02, 0xBD, // adler32("abcdefg")
        ];
        assert_eq!(&framed[..], expected);
        assert_eq!(framed.len(), stored_len(7, block_size));
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_empty_block() {
        let block_size = BlockSize::new(4).unwrap();
        let framed = encode_zlib_stored(&[9u8; 8], block_size);
        // header, 2 * (5 + 4), trailer
        assert_eq!(framed.len(), 2 + 18 + 4);
        assert_eq!(framed[2], 0x00);
        assert_eq!(framed[11], 0x01);
    }

    #[test]
    fn test_stored_len_accounts_for_every_block() {
        assert_eq!(stored_len(0, BlockSize::MAX), 11);
        assert_eq!(stored_len(65535, BlockSize::MAX), 2 + 5 + 65535 + 4);
        assert_eq!(stored_len(65536, BlockSize::MAX), 2 + 10 + 65536 + 4);
    }
}
