//! Chessboard Image Generator
//!
//! Renders the default chessboard-in-a-frame pattern and writes it in both
//! supported formats to the current directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin genchess
//! ```
//!
//! # Generated Files
//!
//! - `chess.pgm` (7,657 bytes): binary PGM, frame and light squares at 255
//! - `chess.png` (7,814 bytes): 8-bit indexed PNG, black/white palette,
//!   IDAT made of stored deflate blocks

use chess_png::{get_encoder, save, Chessboard, ImageFormat};

fn main() -> chess_png::Result<()> {
    let grid = Chessboard::default().generate()?;

    for format in [ImageFormat::Pgm, ImageFormat::Png] {
        let encoder = get_encoder(format);
        let path = format!("chess.{}", encoder.extension());
        save(&path, &grid, encoder.as_ref())?;
        println!(
            "Generated {} ({}x{} pixels)",
            path,
            grid.width(),
            grid.height()
        );
    }

    Ok(())
}
