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

//! Error types shared by all encoders.

use thiserror::Error;

/// Invalid input detected before any byte reaches the sink.
///
/// Retrying with the same input yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid has no rows.
    #[error("pixel grid has no rows")]
    EmptyGrid,

    /// The grid has rows but no columns.
    #[error("pixel grid has no columns")]
    EmptyRow,

    /// A row is shorter or longer than the first row.
    #[error("row {row} has {actual} pixels, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// The flat code buffer is not a whole number of rows.
    #[error("{len} pixel codes do not divide into rows of {width}")]
    PartialRow { width: usize, len: usize },

    /// A pixel code has no palette entry.
    #[error("pixel code {code} at ({x}, {y}) is outside the {palette_len}-color palette")]
    PaletteIndexOutOfRange {
        code: u8,
        x: usize,
        y: usize,
        palette_len: usize,
    },

    /// The palette has no entries.
    #[error("palette is empty")]
    EmptyPalette,

    /// The palette has more entries than the bit depth can index.
    #[error("palette has {len} colors, at most {max} allowed")]
    PaletteTooLarge { len: usize, max: usize },

    /// The stored-block size is zero or exceeds 65535.
    #[error("stored block size {0} is outside 1..=65535")]
    InvalidBlockSize(usize),

    /// Width or height exceeds what the container header can carry.
    #[error("image dimensions {width}x{height} exceed 2^31-1")]
    DimensionsTooLarge { width: usize, height: usize },

    /// A generated pattern was asked for zero-pixel squares.
    #[error("chessboard square size must be at least 1")]
    ZeroSquareSize,

    /// The board's closing frame line lies beyond `usize::MAX`.
    #[error("chessboard of {squares} squares of {square_size} px overflows")]
    BoardTooLarge { squares: usize, square_size: usize },

    /// A chunk payload exceeds the container's length field.
    #[error("{chunk} payload of {len} bytes exceeds the chunk length limit")]
    ChunkTooLarge { chunk: &'static str, len: usize },
}

/// Top-level error: either the input was rejected or the sink failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any byte was written.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Sink open/write/flush failure. A partially written file may remain.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, Error>;
