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

//! Chessboard-in-a-frame test pattern.
//!
//! ```text
//! column/row 0       background
//! column/row 1       frame line
//! 2 .. end           board, squares alternate starting with code 0
//! end                frame line   (end = 2 + squares * square_size)
//! beyond end         background
//! ```

use crate::error::ConfigError;
use crate::grid::PixelGrid;

/// Offset of the first board pixel; the frame sits one pixel before it.
const BOARD_ORIGIN: usize = 2;
const FRAME_START: usize = 1;

/// Parameters of the generated pattern. Codes are 0 (black) and 1 (white).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chessboard {
    pub width: usize,
    pub height: usize,
    pub square_size: usize,
    pub squares: usize,
}

impl Default for Chessboard {
    /// 8x8 board of 10 px squares on a 91x84 canvas.
    fn default() -> Self {
        Self {
            width: 91,
            height: 84,
            square_size: 10,
            squares: 8,
        }
    }
}

impl Chessboard {
    /// Column and row of the closing frame line, or `None` if it does not
    /// fit in `usize`.
    #[must_use]
    pub fn board_end(&self) -> Option<usize> {
        self.squares
            .checked_mul(self.square_size)?
            .checked_add(BOARD_ORIGIN)
    }

    /// Pixel code at `(x, y)`. An unrepresentable board covers every pixel
    /// past the origin.
    #[must_use]
    pub fn code_at(&self, x: usize, y: usize) -> u8 {
        let end = self.board_end().unwrap_or(usize::MAX);
        if x == FRAME_START || x == end || y == FRAME_START || y == end {
            return 1;
        }
        let board = BOARD_ORIGIN..end;
        if !board.contains(&x) || !board.contains(&y) {
            return 0;
        }
        let column = (x - BOARD_ORIGIN) / self.square_size;
        let row = (y - BOARD_ORIGIN) / self.square_size;
        u8::from((column + row) % 2 == 1)
    }

    /// Renders the pattern.
    ///
    /// # Errors
    ///
    /// `ZeroSquareSize` when `square_size` is 0, `BoardTooLarge` when the
    /// board extent overflows, `EmptyRow` / `EmptyGrid` for a zero-sized
    /// canvas.
    pub fn generate(&self) -> Result<PixelGrid, ConfigError> {
        if self.square_size == 0 {
            return Err(ConfigError::ZeroSquareSize);
        }
        if self.board_end().is_none() {
            return Err(ConfigError::BoardTooLarge {
                squares: self.squares,
                square_size: self.square_size,
            });
        }
        PixelGrid::from_fn(self.width, self.height, |x, y| self.code_at(x, y))
    }
}
