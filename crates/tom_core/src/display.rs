/*
    MartyPC
    https://github.com/dbalsom/martypc

    Copyright 2022-2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    display.rs

    Defines the interface TOM uses to tell a frontend display backend that
    the emulated video resolution has changed.

*/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DisplayBackendError {
    #[error("Failed to create display surface: {0}")]
    SurfaceCreationError(String),
    #[error("Unsupported surface dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceDimensions {
    pub w: u32,
    pub h: u32,
}

impl From<(u32, u32)> for SurfaceDimensions {
    fn from((w, h): (u32, u32)) -> Self {
        Self { w, h }
    }
}

/// A display backend receives 15-bit RGB pixels, `(R << 10) | (G << 5) | B`, and must be able to
/// recreate its output surface whenever TOM's visible resolution changes.
pub trait DisplayBackend {
    fn resize_surface(&mut self, dimensions: SurfaceDimensions) -> Result<(), DisplayBackendError>;
}
