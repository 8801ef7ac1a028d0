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

//! Binary PGM (`P5`) writer.
//!
//! Header `P5 <width> <height> 255\n`, then one byte per pixel, top row first.
//! Code 1 is written as 255 (white); every other code is written as is.

use std::io::{self, Write};

use bytes::{BufMut, BytesMut};

use crate::error::Result;
use crate::grid::PixelGrid;
use crate::Encoding;

const MAXVAL: u8 = 255;

#[inline]
fn sample(code: u8) -> u8 {
    if code == 1 {
        MAXVAL
    } else {
        code
    }
}

fn header(grid: &PixelGrid) -> String {
    format!("P5 {} {} {}\n", grid.width(), grid.height(), MAXVAL)
}

/// Encodes `grid` as a binary PGM image.
#[must_use]
pub fn encode_pgm(grid: &PixelGrid) -> BytesMut {
    let header = header(grid);
    let mut buf = BytesMut::with_capacity(header.len() + grid.width() * grid.height());
    buf.put_slice(header.as_bytes());
    for row in grid.rows() {
        buf.extend(row.iter().copied().map(sample));
    }
    buf
}

/// Writes `grid` as a binary PGM image, one row at a time.
///
/// # Errors
///
/// Propagates sink errors.
pub fn write_pgm<W: Write + ?Sized>(sink: &mut W, grid: &PixelGrid) -> io::Result<()> {
    sink.write_all(header(grid).as_bytes())?;
    let mut line = Vec::with_capacity(grid.width());
    for row in grid.rows() {
        line.clear();
        line.extend(row.iter().copied().map(sample));
        sink.write_all(&line)?;
    }
    Ok(())
}

/// Raw grayscale output; accepts every valid grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgmEncoding;

impl Encoding for PgmEncoding {
    fn write_to(&self, grid: &PixelGrid, sink: &mut dyn Write) -> Result<()> {
        write_pgm(sink, grid)?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "pgm"
    }
}
