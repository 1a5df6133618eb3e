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

    devices::tom::tablegen.rs

    Table generation for CRY color decoding. The per-channel coefficient
    tables are built at compile time; the 64K mixed mode lookup table is
    built once per TOM instance.

*/

// Chroma anchors in half-intensity steps (0, 1 = half, 2 = full) for red, green and blue. The
// cyan axis is the high chroma nibble, the red axis the low nibble; $88 is the neutral centre.
const CRY_NEUTRAL: [u32; 3] = [2, 2, 2];
// [cyan low/high][red low/high]
const CRY_CORNERS: [[[u32; 3]; 2]; 2] = [[[0, 0, 2], [2, 0, 0]], [[0, 2, 0], [2, 2, 0]]];
// Cyan axis extremes with red at the centre: magenta, yellow-green
const CRY_CYAN_EDGES: [[u32; 3]; 2] = [[2, 0, 2], [1, 2, 0]];
// Red axis extremes with cyan at the centre: cyan, orange
const CRY_RED_EDGES: [[u32; 3]; 2] = [[0, 2, 2], [2, 1, 0]];

/// Per-channel intensity for a CRY chroma cell, indexed by [major][minor] nibble. Each cell
/// blends the neutral centre with the nearest edge and corner anchors of its quadrant, then is
/// scaled so that its strongest channel reaches full intensity.
const CRY_TABLES: [[[u8; 16]; 16]; 3] = {
    let mut tables = [[[0u8; 16]; 16]; 3];

    let mut major: usize = 0;
    loop {
        let mut minor: usize = 0;
        loop {
            // Distance from the centre in eighths, and which half of each axis the cell is in.
            let (cyan_side, cyan_dist) = if major < 8 { (0, 8 - major as u32) } else { (1, major as u32 - 8) };
            let (red_side, red_dist) = if minor < 8 { (0, 8 - minor as u32) } else { (1, minor as u32 - 8) };

            let w_neutral = (8 - cyan_dist) * (8 - red_dist);
            let w_cyan_edge = cyan_dist * (8 - red_dist);
            let w_red_edge = (8 - cyan_dist) * red_dist;
            let w_corner = cyan_dist * red_dist;

            let mut mix = [0u32; 3];
            let mut peak = 0;
            let mut ch = 0;
            while ch < 3 {
                mix[ch] = CRY_NEUTRAL[ch] * w_neutral
                    + CRY_CYAN_EDGES[cyan_side][ch] * w_cyan_edge
                    + CRY_RED_EDGES[red_side][ch] * w_red_edge
                    + CRY_CORNERS[cyan_side][red_side][ch] * w_corner;
                if mix[ch] > peak {
                    peak = mix[ch];
                }
                ch += 1;
            }

            ch = 0;
            while ch < 3 {
                tables[ch][major][minor] = ((mix[ch] * 255 + peak / 2) / peak) as u8;
                ch += 1;
            }

            if minor < 15 {
                minor += 1;
            }
            else {
                break;
            }
        }

        if major < 15 {
            major += 1;
        }
        else {
            break;
        }
    }

    tables
};

pub const CRY_RED: [[u8; 16]; 16] = CRY_TABLES[0];
pub const CRY_GREEN: [[u8; 16]; 16] = CRY_TABLES[1];
pub const CRY_BLUE: [[u8; 16]; 16] = CRY_TABLES[2];

/// Convert a 16-bit CRY pixel to 15-bit RGB. Pixels with the low bit set are direct RGB
/// instead; the top field is kept and the low two fields are exchanged.
#[inline]
pub fn cry16_to_rgb15(color: u16) -> u16 {
    if color & 0x01 != 0 {
        let c = color >> 1;
        return (c & 0x7C00) | ((c & 0x03E0) >> 5) | ((c & 0x001F) << 5);
    }

    let major = (color >> 12) as usize;
    let minor = ((color >> 8) & 0x0F) as usize;
    let luma = (color & 0xFF) as u32;

    let r = (CRY_RED[major][minor] as u32 * luma) >> 11;
    let g = (CRY_GREEN[major][minor] as u32 * luma) >> 11;
    let b = (CRY_BLUE[major][minor] as u32 * luma) >> 11;

    ((r << 10) | (g << 5) | b) as u16
}

/// Build the 64K lookup used by mixed CRY/RGB mode.
pub fn build_cry_mix_lut() -> Box<[u16]> {
    (0..=u16::MAX).map(cry16_to_rgb15).collect()
}
