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

    devices::tom::draw.rs

    Scanline rendering. Each pixel format has a pure converter that reads
    the current line buffer and writes 15-bit RGB pixels to the backbuffer,
    plus a stretch variant that averages two source pixels per output pixel.

*/

use super::*;

/// Number of background-filled pixel pairs at the start of the current line buffer.
pub const LINE_BUFFER_PIXEL_PAIRS: usize = 720;

/// Inputs a scanline converter reads from.
pub struct ScanlineSource<'a> {
    pub ram: &'a [u8],
    pub mix_lut: &'a [u16],
}

impl ScanlineSource<'_> {
    #[inline]
    fn u8_at(&self, index: usize) -> u8 {
        self.ram[(TOM_LBUF_CURRENT + index) & TOM_ADDRESS_MASK]
    }

    #[inline]
    fn u16_at(&self, index: usize) -> u16 {
        (self.u8_at(index) as u16) << 8 | self.u8_at(index + 1) as u16
    }
}

type ScanlineFn = fn(&ScanlineSource, &mut [u16]);

#[inline]
fn direct16_to_rgb15(color: u16) -> u16 {
    color >> 1
}

#[inline]
fn rgb16_to_rgb15(color: u16) -> u16 {
    let c = color >> 1;
    (c & 0x7C00) | ((c & 0x03E0) >> 5) | ((c & 0x001F) << 5)
}

/// Average two 15-bit pixels channel by channel, rounding down.
#[inline]
fn blend_rgb15(a: u16, b: u16) -> u16 {
    let r = (((a >> 10) & 0x1F) + ((b >> 10) & 0x1F)) >> 1;
    let g = (((a >> 5) & 0x1F) + ((b >> 5) & 0x1F)) >> 1;
    let bl = ((a & 0x1F) + (b & 0x1F)) >> 1;
    (r << 10) | (g << 5) | bl
}

fn draw_cry16(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        *pixel = cry16_to_rgb15(src.u16_at(i * 2));
    }
}

fn draw_cry16_stretch(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        let c0 = cry16_to_rgb15(src.u16_at(i * 4));
        let c1 = cry16_to_rgb15(src.u16_at(i * 4 + 2));
        *pixel = blend_rgb15(c0, c1);
    }
}

/// Source bytes are green, red, unused, blue.
#[inline]
fn rgb24_at(src: &ScanlineSource, index: usize) -> u16 {
    let g = (src.u8_at(index) >> 3) as u16;
    let r = (src.u8_at(index + 1) >> 3) as u16;
    let b = (src.u8_at(index + 3) >> 3) as u16;
    (r << 10) | (g << 5) | b
}

fn draw_rgb24(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        *pixel = rgb24_at(src, i * 4);
    }
}

fn draw_rgb24_stretch(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        *pixel = blend_rgb15(rgb24_at(src, i * 8), rgb24_at(src, i * 8 + 4));
    }
}

fn draw_direct16(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        *pixel = direct16_to_rgb15(src.u16_at(i * 2));
    }
}

fn draw_direct16_stretch(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        let c0 = direct16_to_rgb15(src.u16_at(i * 4));
        let c1 = direct16_to_rgb15(src.u16_at(i * 4 + 2));
        *pixel = blend_rgb15(c0, c1);
    }
}

fn draw_rgb16(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        *pixel = rgb16_to_rgb15(src.u16_at(i * 2));
    }
}

fn draw_rgb16_stretch(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        let c0 = rgb16_to_rgb15(src.u16_at(i * 4));
        let c1 = rgb16_to_rgb15(src.u16_at(i * 4 + 2));
        *pixel = blend_rgb15(c0, c1);
    }
}

fn draw_mixed(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        *pixel = src.mix_lut[src.u16_at(i * 2) as usize];
    }
}

fn draw_mixed_stretch(src: &ScanlineSource, backbuffer: &mut [u16]) {
    for (i, pixel) in backbuffer.iter_mut().enumerate() {
        let c0 = src.mix_lut[src.u16_at(i * 4) as usize];
        let c1 = src.mix_lut[src.u16_at(i * 4 + 2) as usize];
        *pixel = blend_rgb15(c0, c1);
    }
}

fn scanline_fn(format: PixelFormat, stretch: bool) -> ScanlineFn {
    match (format, stretch) {
        (PixelFormat::Cry16, false) => draw_cry16,
        (PixelFormat::Cry16, true) => draw_cry16_stretch,
        (PixelFormat::Rgb24, false) => draw_rgb24,
        (PixelFormat::Rgb24, true) => draw_rgb24_stretch,
        (PixelFormat::Direct16, false) => draw_direct16,
        (PixelFormat::Direct16, true) => draw_direct16_stretch,
        (PixelFormat::Rgb16, false) => draw_rgb16,
        (PixelFormat::Rgb16, true) => draw_rgb16_stretch,
        (PixelFormat::Mixed, false) => draw_mixed,
        (PixelFormat::Mixed, true) => draw_mixed_stretch,
    }
}

/// Convert the current line buffer to 15-bit RGB, one output pixel per element of `backbuffer`.
pub fn render_scanline(format: PixelFormat, stretch: bool, src: &ScanlineSource, backbuffer: &mut [u16]) {
    scanline_fn(format, stretch)(src, backbuffer)
}

impl Tom {
    /// Render `scanline` into `backbuffer`. The background fill, object processor and pixel
    /// conversion only run if `should_render` is set; the scanline counter always advances.
    pub fn render(&mut self, scanline: u32, backbuffer: &mut [u16], should_render: bool) {
        self.scanline = scanline;
        if !should_render {
            return;
        }

        if self.vmode().bg_enable() {
            let (bg_hi, bg_lo) = (self.ram[TOM_BG], self.ram[TOM_BG + 1]);
            let fill_end = TOM_LBUF_CURRENT + LINE_BUFFER_PIXEL_PAIRS * 2;
            for pair in self.ram[TOM_LBUF_CURRENT..fill_end].chunks_exact_mut(2) {
                pair[0] = bg_hi;
                pair[1] = bg_lo;
            }
        }

        self.delegates
            .object_processor
            .process_list(scanline, should_render, &mut self.ram[TOM_LBUF_CURRENT..]);

        let width = (self.width as usize).min(backbuffer.len());
        let src = ScanlineSource {
            ram: &self.ram,
            mix_lut: &self.mix_lut,
        };
        render_scanline(self.pixel_format(), self.stretch, &src, &mut backbuffer[..width]);
    }
}
