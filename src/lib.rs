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

//! Encoders for small synthesized bitmaps.
//!
//! A [`PixelGrid`] of palette codes is written either as a binary PGM
//! ([`PgmEncoding`]) or as an indexed-color PNG ([`PngEncoding`]) whose IDAT
//! stream uses stored deflate blocks.
//!
//! # Layers
//!
//! ```text
//! container   signature + IHDR, PLTE, IDAT, IEND
//!   chunk     length, type, data, CRC-32
//!   zlib      header, stored blocks, Adler-32
//!   checksum  CRC-32, Adler-32
//! ```
//!
//! # Example
//!
//! ```
//! use chess_png::{encode_container, encode_raw, Palette, PixelGrid};
//!
//! let grid = PixelGrid::new(vec![vec![0, 1], vec![1, 0]])?;
//! let png = encode_container(&grid, Palette::monochrome())?;
//! assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
//!
//! let pgm = encode_raw(&grid);
//! assert!(pgm.starts_with(b"P5 2 2 255\n"));
//! # Ok::<(), chess_png::Error>(())
//! ```

pub mod checksum;
pub mod chess;
pub mod chunk;
pub mod container;
pub mod error;
pub mod grid;
pub mod pgm;
pub mod zlib;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use chess::Chessboard;
pub use container::{BitDepth, PngEncoding};
pub use error::{ConfigError, Error, Result};
pub use grid::{Palette, PixelGrid, Rgb};
pub use pgm::PgmEncoding;
pub use zlib::BlockSize;

/// Output image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Binary PGM (`P5`).
    Pgm,
    /// Indexed-color PNG.
    Png,
}

/// An encoder from [`PixelGrid`] to one file format.
pub trait Encoding {
    /// Rejects input this encoder cannot represent. Writes nothing.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    fn check(&self, _grid: &PixelGrid) -> std::result::Result<(), ConfigError> {
        Ok(())
    }

    /// Validates `grid`, then writes the encoded file to `sink`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] before any byte is written, [`Error::Io`] from the
    /// sink.
    fn write_to(&self, grid: &PixelGrid, sink: &mut dyn Write) -> Result<()>;

    /// Encodes into memory.
    ///
    /// # Errors
    ///
    /// Same as [`Encoding::write_to`]; a `Vec` sink never fails.
    fn encode(&self, grid: &PixelGrid) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(grid, &mut out)?;
        Ok(out)
    }

    /// Conventional file extension, without the dot.
    fn extension(&self) -> &'static str;
}

/// Returns an encoder for `format`. PNG output uses [`Palette::monochrome`].
#[must_use]
pub fn get_encoder(format: ImageFormat) -> Box<dyn Encoding> {
    match format {
        ImageFormat::Pgm => Box::new(PgmEncoding),
        ImageFormat::Png => Box::new(PngEncoding::new(Palette::monochrome())),
    }
}

/// Encodes `grid` as binary PGM.
#[must_use]
pub fn encode_raw(grid: &PixelGrid) -> Vec<u8> {
    pgm::encode_pgm(grid).to_vec()
}

/// Encodes `grid` as an 8-bit indexed PNG with the given palette.
///
/// # Errors
///
/// [`Error::Config`] when a code has no palette entry.
pub fn encode_container(grid: &PixelGrid, palette: Palette) -> Result<Vec<u8>> {
    PngEncoding::new(palette).encode(grid)
}

/// Encodes `grid` into the file at `path`.
///
/// The grid is checked before the file is created. The file is closed when
/// this function returns, whether or not writing succeeded; after an I/O
/// error a partial file may remain.
///
/// # Errors
///
/// [`Error::Config`] for rejected input, [`Error::Io`] for create, write or
/// flush failures.
pub fn save<P: AsRef<Path>>(path: P, grid: &PixelGrid, encoding: &dyn Encoding) -> Result<()> {
    encoding.check(grid)?;

    let mut sink = BufWriter::new(File::create(path.as_ref())?);
    encoding.write_to(grid, &mut sink)?;
    sink.flush()?;

    #[cfg(feature = "debug-logging")]
    log::info!(
        "saved {}x{} {} to {}",
        grid.width(),
        grid.height(),
        encoding.extension(),
        path.as_ref().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_encoder_extensions() {
        assert_eq!(get_encoder(ImageFormat::Pgm).extension(), "pgm");
        assert_eq!(get_encoder(ImageFormat::Png).extension(), "png");
    }

    #[test]
    fn test_encoders_agree_with_entry_points() {
        let grid = PixelGrid::new(vec![vec![0, 1], vec![1, 0]]).unwrap();
        assert_eq!(
            get_encoder(ImageFormat::Pgm).encode(&grid).unwrap(),
            encode_raw(&grid)
        );
        assert_eq!(
            get_encoder(ImageFormat::Png).encode(&grid).unwrap(),
            encode_container(&grid, Palette::monochrome()).unwrap()
        );
    }

    #[test]
    fn test_save_rejects_before_creating_file() {
        let path = std::env::temp_dir().join(format!("chess_png_reject_{}.png", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let grid = PixelGrid::new(vec![vec![0, 5]]).unwrap();

        let err = save(&path, &grid, get_encoder(ImageFormat::Png).as_ref()).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::PaletteIndexOutOfRange { code: 5, .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_writes_file() {
        let path = std::env::temp_dir().join(format!("chess_png_save_{}.pgm", std::process::id()));
        let grid = PixelGrid::new(vec![vec![1, 0]]).unwrap();

        save(&path, &grid, &PgmEncoding).unwrap();
        let written = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(written, b"P5 2 1 255\n\xff\x00");
    }

    #[test]
    fn test_save_reports_create_failure() {
        let path = std::env::temp_dir()
            .join("chess_png_missing_dir")
            .join("nested")
            .join("out.png");
        let grid = PixelGrid::new(vec![vec![0]]).unwrap();
        let err = save(&path, &grid, &PgmEncoding).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    /// Writes the PGM header, then fails.
    struct TruncatingEncoding;

    impl Encoding for TruncatingEncoding {
        fn write_to(&self, _grid: &PixelGrid, sink: &mut dyn Write) -> Result<()> {
            sink.write_all(b"P5 ")?;
            Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full").into())
        }

        fn extension(&self) -> &'static str {
            "pgm"
        }
    }

    #[test]
    fn test_save_reports_write_failure() {
        let path = std::env::temp_dir().join(format!("chess_png_partial_{}.pgm", std::process::id()));
        let grid = PixelGrid::new(vec![vec![0]]).unwrap();

        let err = save(&path, &grid, &TruncatingEncoding).unwrap_err();
        assert!(matches!(&err, Error::Io(e) if e.kind() == std::io::ErrorKind::WriteZero));

        // The sink was released: the partial file can be reopened and removed
        let partial = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(partial, b"P5 ");
    }
}
