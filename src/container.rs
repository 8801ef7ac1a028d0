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

//! Indexed-color PNG encoder (RFC 2083).
//!
//! # File Layout
//!
//! ```text
//! [89 50 4E 47 0D 0A 1A 0A]   signature
//! IHDR  width BE32, height BE32, bit depth, color type 3, 0, 0, 0
//! PLTE  R G B per palette entry, in index order
//! IDAT  zlib stream of stored blocks over the filtered scanlines
//! IEND  empty
//! ```
//!
//! Every scanline is prefixed with filter type 0 (None). All payloads are
//! built and validated before the first byte is written, so a rejected input
//! leaves the sink untouched.

use std::io::Write;

use bytes::{BufMut, BytesMut};

use crate::chunk::{write_chunk, ChunkType, MAX_CHUNK_LEN};
use crate::error::{ConfigError, Result};
use crate::grid::{Palette, PixelGrid};
use crate::zlib::{encode_zlib_stored, stored_len, BlockSize};
use crate::Encoding;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// IHDR field values (RFC 2083 section 4.1.1)
const COLOR_TYPE_INDEXED: u8 = 3;
const COMPRESSION_DEFLATE: u8 = 0;
const FILTER_METHOD_ADAPTIVE: u8 = 0;
const INTERLACE_NONE: u8 = 0;

/// Per-scanline filter type byte.
const FILTER_NONE: u8 = 0;

const IHDR_LEN: usize = 13;

/// Width and height must fit in 31 bits.
const MAX_DIMENSION: usize = 0x7FFF_FFFF;

/// Bits per palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// 8 pixels per byte, MSB first; palette of at most 2 colors.
    One = 1,
    /// One byte per pixel, the code itself.
    #[default]
    Eight = 8,
}

impl BitDepth {
    #[must_use]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Number of palette entries this depth can address.
    #[must_use]
    pub fn max_colors(self) -> usize {
        1 << self.bits()
    }

    /// Bytes of sample data per row, excluding the filter byte.
    #[must_use]
    pub fn row_bytes(self, width: usize) -> usize {
        match self {
            Self::One => width.div_ceil(8),
            Self::Eight => width,
        }
    }
}

/// Filtered scanlines: for each row, a filter byte followed by the row's
/// packed samples. This is the uncompressed IDAT content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanlines {
    data: BytesMut,
    stride: usize,
}

impl Scanlines {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length of one filtered row, filter byte included.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Converts pixel codes into filtered scanlines at the given depth.
///
/// Codes must already be known to fit `bit_depth`; higher bits are masked.
#[must_use]
pub fn filter_scanlines(grid: &PixelGrid, bit_depth: BitDepth) -> Scanlines {
    let row_bytes = bit_depth.row_bytes(grid.width());
    let stride = row_bytes + 1;
    let mut data = BytesMut::with_capacity(stride * grid.height());

    for row in grid.rows() {
        data.put_u8(FILTER_NONE);
        match bit_depth {
            BitDepth::Eight => data.put_slice(row),
            BitDepth::One => {
                for pixels in row.chunks(8) {
                    let mut byte_val = 0u8;
                    for (i, &code) in pixels.iter().enumerate() {
                        byte_val |= (code & 1) << (7 - i);
                    }
                    data.put_u8(byte_val);
                }
            }
        }
    }

    Scanlines { data, stride }
}

/// Encodes a [`PixelGrid`] as an indexed-color PNG with stored zlib blocks.
#[derive(Debug, Clone)]
pub struct PngEncoding {
    palette: Palette,
    bit_depth: BitDepth,
    block_size: BlockSize,
}

impl PngEncoding {
    /// 8-bit indexed output with zlib's default stored-block size.
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            bit_depth: BitDepth::default(),
            block_size: BlockSize::default(),
        }
    }

    #[must_use]
    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    #[must_use]
    pub fn with_block_size(mut self, block_size: BlockSize) -> Self {
        self.block_size = block_size;
        self
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[must_use]
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    #[must_use]
    pub fn block_size(&self) -> BlockSize {
        self.block_size
    }

    /// Validates `grid` against this encoder's settings.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`]: oversized dimensions, a palette the bit depth
    /// cannot index, a code without a palette entry, or chunk payloads too
    /// large for the length field.
    pub fn check(&self, grid: &PixelGrid) -> std::result::Result<(), ConfigError> {
        let (width, height) = (grid.width(), grid.height());
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(ConfigError::DimensionsTooLarge { width, height });
        }

        let max_colors = self.bit_depth.max_colors();
        if self.palette.len() > max_colors {
            return Err(ConfigError::PaletteTooLarge {
                len: self.palette.len(),
                max: max_colors,
            });
        }

        if let Some((x, y, code)) = grid.find_code_at_least(self.palette.len()) {
            return Err(ConfigError::PaletteIndexOutOfRange {
                code,
                x,
                y,
                palette_len: self.palette.len(),
            });
        }

        let raw_len = self
            .bit_depth
            .row_bytes(width)
            .checked_add(1)
            .and_then(|stride| stride.checked_mul(height))
            .unwrap_or(usize::MAX);
        let idat_len = stored_len(raw_len, self.block_size);
        if idat_len > MAX_CHUNK_LEN {
            return Err(ConfigError::ChunkTooLarge {
                chunk: ChunkType::IDAT.name(),
                len: idat_len,
            });
        }

        #[cfg(feature = "debug-logging")]
        log::info!(
            "png check: {}x{} depth={} palette={} idat={} bytes",
            width,
            height,
            self.bit_depth.bits(),
            self.palette.len(),
            idat_len
        );

        Ok(())
    }

    /// Writes the complete PNG file to `sink`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`](crate::Error::Config) before any byte is written,
    /// or [`Error::Io`](crate::Error::Io) from the sink, which aborts the
    /// remaining sequence.
    pub fn write_png<W: Write + ?Sized>(&self, grid: &PixelGrid, sink: &mut W) -> Result<()> {
        self.check(grid)?;

        let header = self.header_payload(grid);
        let palette = self.palette_payload();
        let scanlines = filter_scanlines(grid, self.bit_depth);
        let image_data = encode_zlib_stored(scanlines.as_bytes(), self.block_size);

        sink.write_all(&PNG_SIGNATURE)?;
        write_chunk(sink, ChunkType::IHDR, &header)?;
        write_chunk(sink, ChunkType::PLTE, &palette)?;
        write_chunk(sink, ChunkType::IDAT, &image_data)?;
        write_chunk(sink, ChunkType::IEND, &[])?;

        #[cfg(feature = "debug-logging")]
        log::info!(
            "png: wrote {}x{} image, {} scanline bytes in {} IDAT bytes",
            grid.width(),
            grid.height(),
            scanlines.len(),
            image_data.len()
        );

        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)] // Dimensions bounded by check()
    fn header_payload(&self, grid: &PixelGrid) -> [u8; IHDR_LEN] {
        let mut header = [0u8; IHDR_LEN];
        header[0..4].copy_from_slice(&(grid.width() as u32).to_be_bytes());
        header[4..8].copy_from_slice(&(grid.height() as u32).to_be_bytes());
        header[8] = self.bit_depth.bits();
        header[9] = COLOR_TYPE_INDEXED;
        header[10] = COMPRESSION_DEFLATE;
        header[11] = FILTER_METHOD_ADAPTIVE;
        header[12] = INTERLACE_NONE;
        header
    }

    fn palette_payload(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.palette.len() * 3);
        for color in self.palette.colors() {
            buf.put_slice(&[color.r, color.g, color.b]);
        }
        buf
    }
}

impl Encoding for PngEncoding {
    fn check(&self, grid: &PixelGrid) -> std::result::Result<(), ConfigError> {
        PngEncoding::check(self, grid)
    }

    fn write_to(&self, grid: &PixelGrid, sink: &mut dyn Write) -> Result<()> {
        self.write_png(grid, sink)
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}
