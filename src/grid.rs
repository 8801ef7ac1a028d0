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

//! Pixel-code grids and palettes.
//!
//! A [`PixelGrid`] holds palette indices, never encoded sample bytes. The
//! encoders translate codes into bytes when they build their output.

use crate::error::ConfigError;

/// Maximum number of palette entries an indexed PNG can carry.
pub const MAX_PALETTE_LEN: usize = 256;

/// Rectangular, non-empty grid of pixel codes stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    codes: Vec<u8>,
    width: usize,
}

impl PixelGrid {
    /// Builds a grid from rows of equal length.
    ///
    /// # Errors
    ///
    /// `EmptyGrid` without rows, `EmptyRow` when rows have no columns and
    /// `RaggedRow` when a row's length differs from the first row's.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self, ConfigError> {
        let width = rows.first().ok_or(ConfigError::EmptyGrid)?.len();
        if width == 0 {
            return Err(ConfigError::EmptyRow);
        }
        let mut codes = Vec::with_capacity(width * rows.len());
        for (row, pixels) in rows.into_iter().enumerate() {
            if pixels.len() != width {
                return Err(ConfigError::RaggedRow {
                    row,
                    expected: width,
                    actual: pixels.len(),
                });
            }
            codes.extend_from_slice(&pixels);
        }
        Ok(Self { codes, width })
    }

    /// Builds a grid from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// `EmptyRow` for zero width, `EmptyGrid` for an empty buffer and
    /// `PartialRow` when the buffer length is not a multiple of `width`.
    pub fn from_codes(width: usize, codes: Vec<u8>) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::EmptyRow);
        }
        if codes.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }
        if !codes.len().is_multiple_of(width) {
            return Err(ConfigError::PartialRow {
                width,
                len: codes.len(),
            });
        }
        Ok(Self { codes, width })
    }

    /// Builds a grid by evaluating `f(x, y)` for every pixel.
    ///
    /// # Errors
    ///
    /// `EmptyRow` for zero width, `EmptyGrid` for zero height,
    /// `DimensionsTooLarge` when the pixel count overflows `usize`.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, ConfigError>
    where
        F: FnMut(usize, usize) -> u8,
    {
        if width == 0 {
            return Err(ConfigError::EmptyRow);
        }
        if height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let len = width
            .checked_mul(height)
            .ok_or(ConfigError::DimensionsTooLarge { width, height })?;
        let mut codes = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                codes.push(f(x, y));
            }
        }
        Ok(Self { codes, width })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.codes.len() / self.width
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.codes.chunks_exact(self.width)
    }

    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        let start = y.checked_mul(self.width)?;
        let end = start.checked_add(self.width)?;
        self.codes.get(start..end)
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width {
            return None;
        }
        self.row(y).map(|row| row[x])
    }

    /// Largest code in the grid.
    #[must_use]
    pub fn max_code(&self) -> u8 {
        self.codes.iter().copied().max().unwrap_or(0)
    }

    /// First pixel whose code is `>= limit`, as `(x, y, code)`.
    pub(crate) fn find_code_at_least(&self, limit: usize) -> Option<(usize, usize, u8)> {
        self.codes
            .iter()
            .position(|&code| usize::from(code) >= limit)
            .map(|i| (i % self.width, i / self.width, self.codes[i]))
    }
}

/// 24-bit palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// Ordered colors indexed by pixel code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    /// # Errors
    ///
    /// `EmptyPalette` for no colors, `PaletteTooLarge` for more than 256.
    pub fn new(colors: Vec<Rgb>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if colors.len() > MAX_PALETTE_LEN {
            return Err(ConfigError::PaletteTooLarge {
                len: colors.len(),
                max: MAX_PALETTE_LEN,
            });
        }
        Ok(Self(colors))
    }

    /// Code 0 black, code 1 white.
    #[must_use]
    pub fn monochrome() -> Self {
        Self(vec![Rgb::BLACK, Rgb::WHITE])
    }

    #[must_use]
    #[allow(clippy::len_without_is_empty)] // Never empty by construction
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_grid() {
        assert_eq!(PixelGrid::new(vec![]), Err(ConfigError::EmptyGrid));
    }

    #[test]
    fn test_new_rejects_zero_columns() {
        assert_eq!(
            PixelGrid::new(vec![vec![], vec![]]),
            Err(ConfigError::EmptyRow)
        );
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        assert_eq!(
            PixelGrid::new(vec![vec![0, 1], vec![1, 0], vec![1]]),
            Err(ConfigError::RaggedRow {
                row: 2,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_from_codes_validation() {
        assert_eq!(PixelGrid::from_codes(0, vec![1]), Err(ConfigError::EmptyRow));
        assert_eq!(PixelGrid::from_codes(2, vec![]), Err(ConfigError::EmptyGrid));
        assert_eq!(
            PixelGrid::from_codes(2, vec![0, 1, 0]),
            Err(ConfigError::PartialRow { width: 2, len: 3 })
        );
    }

    #[test]
    fn test_accessors() {
        let grid = PixelGrid::new(vec![vec![0, 1, 2], vec![3, 4, 5]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.row(1), Some(&[3u8, 4, 5][..]));
        assert_eq!(grid.row(2), None);
        assert_eq!(grid.get(2, 0), Some(2));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.max_code(), 5);
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(grid.find_code_at_least(4), Some((1, 1, 4)));
        assert_eq!(grid.find_code_at_least(6), None);
    }

    #[test]
    fn test_from_fn_matches_rows() {
        let grid = PixelGrid::from_fn(2, 2, |x, y| ((x + y) % 2) as u8).unwrap();
        assert_eq!(grid, PixelGrid::new(vec![vec![0, 1], vec![1, 0]]).unwrap());
        assert_eq!(
            PixelGrid::from_fn(3, 0, |_, _| 0),
            Err(ConfigError::EmptyGrid)
        );
    }

    #[test]
    fn test_row_past_end_of_address_space() {
        let grid = PixelGrid::new(vec![vec![0, 1]]).unwrap();
        assert_eq!(grid.row(usize::MAX / 2), None);
        assert_eq!(grid.row(usize::MAX), None);
        assert_eq!(grid.get(0, usize::MAX / 2), None);
    }

    #[test]
    fn test_from_fn_rejects_overflowing_dimensions() {
        assert_eq!(
            PixelGrid::from_fn(usize::MAX, 2, |_, _| 0),
            Err(ConfigError::DimensionsTooLarge {
                width: usize::MAX,
                height: 2
            })
        );
    }

    #[test]
    fn test_palette_bounds() {
        assert_eq!(Palette::new(vec![]), Err(ConfigError::EmptyPalette));
        assert_eq!(
            Palette::new(vec![Rgb::BLACK; 257]),
            Err(ConfigError::PaletteTooLarge { len: 257, max: 256 })
        );
        assert_eq!(Palette::new(vec![Rgb::WHITE; 256]).unwrap().len(), 256);
        assert_eq!(Palette::monochrome().colors(), &[Rgb::BLACK, Rgb::WHITE]);
    }
}
