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

    devices::tom::videomode.rs

    Decoding of the VMODE register into a pixel format, and derivation of
    the visible resolution from the timing registers.

*/

use super::*;
use modular_bitfield::{bitfield, prelude::*};
use strum_macros::{Display, IntoStaticStr};

#[bitfield]
#[derive(Copy, Clone, Debug)]
pub struct VideoModeRegister {
    pub video_enable: bool,
    pub mode: B2,
    pub genlock: bool,
    pub increment_enable: bool,
    pub bg_increment: bool,
    pub csync: bool,
    pub bg_enable: bool,
    pub variable_mode: bool,
    pub pixel_width: B3,
    #[skip]
    unused: B4,
}

impl VideoModeRegister {
    pub fn from_word(word: u16) -> Self {
        Self::from_bytes(word.to_le_bytes())
    }

    /// The 3-bit video mode code, with VARMOD as the high bit.
    pub fn video_mode(&self) -> usize {
        (self.variable_mode() as usize) << 2 | self.mode() as usize
    }
}

#[derive(Copy, Clone, Debug, Display, IntoStaticStr, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum PixelFormat {
    #[strum(serialize = "16 bpp CRY")]
    Cry16,
    #[strum(serialize = "24 bpp RGB")]
    Rgb24,
    #[strum(serialize = "16 bpp DIRECT")]
    Direct16,
    #[strum(serialize = "16 bpp RGB")]
    Rgb16,
    #[strum(serialize = "Mixed mode")]
    Mixed,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 5] = [
        PixelFormat::Cry16,
        PixelFormat::Rgb24,
        PixelFormat::Direct16,
        PixelFormat::Rgb16,
        PixelFormat::Mixed,
    ];
}

/// Pixel formats indexed by video mode code. With VARMOD set, only mode 0 has its own behavior;
/// the remaining slots select the same formats as without it.
pub const VIDEO_MODE_TABLE: [PixelFormat; 8] = [
    PixelFormat::Cry16,
    PixelFormat::Rgb24,
    PixelFormat::Direct16,
    PixelFormat::Rgb16,
    PixelFormat::Mixed,
    PixelFormat::Rgb24,
    PixelFormat::Direct16,
    PixelFormat::Rgb16,
];

/// Visible width by PWIDTH + 1, the number of clocks per pixel.
pub const PIXEL_WIDTH_TABLE: [u32; 8] = [1330, 665, 443, 332, 266, 222, 190, 166];

const HDB1_WIDE_HBLANK: u16 = 123;
const WIDE_HBLANK_PIXELS: u32 = 16;

impl Tom {
    pub fn vmode(&self) -> VideoModeRegister {
        VideoModeRegister::from_word(self.reg16(TOM_VMODE))
    }

    pub fn video_mode(&self) -> usize {
        self.vmode().video_mode()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        VIDEO_MODE_TABLE[self.video_mode()]
    }

    pub fn video_mode_name(&self) -> &'static str {
        self.pixel_format().into()
    }

    /// Visible width for the current pixel width setting. Also recomputes the horizontal blank
    /// width.
    pub fn video_mode_width(&mut self) -> u32 {
        let pwidth = self.vmode().pixel_width() as usize;

        self.hblank_width = if self.reg16(TOM_HDB1) == HDB1_WIDE_HBLANK {
            WIDE_HBLANK_PIXELS
        }
        else {
            0
        };

        PIXEL_WIDTH_TABLE[pwidth]
    }

    /// Visible height, taken as half the span between vertical blank end and begin.
    pub fn video_mode_height(&self) -> u32 {
        (self.reg16(TOM_VBB).saturating_sub(self.reg16(TOM_VBE)) >> 1) as u32
    }

    /// Recompute the visible resolution after a timing register write and resize the display
    /// surface if it changed. Failure to resize is fatal.
    pub(super) fn update_video_geometry(&mut self) {
        let width = self.video_mode_width();
        let height = self.video_mode_height();
        self.real_internal_width = width;

        if width != self.width || height != self.height {
            log::debug!(
                "TOM: Resolution change {}x{} -> {}x{} ({})",
                self.width,
                self.height,
                width,
                height,
                self.video_mode_name()
            );
            self.width = width;
            self.height = height;

            if let Err(e) = self.notify_display() {
                log::error!("TOM: Couldn't create display surface for {}x{}: {}", width, height, e);
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::mock_delegates;
    use crate::display::{DisplayBackendError, SurfaceDimensions};
    use std::{cell::RefCell, rc::Rc};
    use strum::IntoEnumIterator;

    struct RecordingDisplay(Rc<RefCell<Vec<SurfaceDimensions>>>);

    impl DisplayBackend for RecordingDisplay {
        fn resize_surface(&mut self, dimensions: SurfaceDimensions) -> Result<(), DisplayBackendError> {
            self.0.borrow_mut().push(dimensions);
            Ok(())
        }
    }

    fn new_tom() -> Tom {
        let (delegates, _logs) = mock_delegates(false, Vec::new());
        Tom::new(TomConfig::default(), delegates, None)
    }

    fn set_vmode(tom: &mut Tom, vmode: u16) {
        tom.write_u16(TOM_BASE_ADDRESS + TOM_VMODE as u32, vmode);
    }

    #[test]
    fn test_mode_dispatch() {
        let mut tom = new_tom();

        set_vmode(&mut tom, 0x0100);
        assert_eq!(tom.video_mode(), 4);
        assert_eq!(tom.pixel_format(), PixelFormat::Mixed);

        set_vmode(&mut tom, 0x0002);
        assert_eq!(tom.video_mode(), 1);
        assert_eq!(tom.pixel_format(), PixelFormat::Rgb24);

        set_vmode(&mut tom, 0x0004);
        assert_eq!(tom.pixel_format(), PixelFormat::Direct16);

        set_vmode(&mut tom, 0x0006);
        assert_eq!(tom.pixel_format(), PixelFormat::Rgb16);

        set_vmode(&mut tom, 0x0000);
        assert_eq!(tom.pixel_format(), PixelFormat::Cry16);
    }

    #[test]
    fn test_varmod_aliases() {
        let mut tom = new_tom();
        for base in 1..4u16 {
            set_vmode(&mut tom, base << 1);
            let plain = tom.pixel_format();
            set_vmode(&mut tom, 0x0100 | base << 1);
            assert_eq!(tom.pixel_format(), plain);
            assert_eq!(tom.video_mode_name(), tom.pixel_format().to_string());
        }
    }

    #[test]
    fn test_mode_names_match_formats() {
        let mut tom = new_tom();
        let names = ["16 bpp CRY", "24 bpp RGB", "16 bpp DIRECT", "16 bpp RGB", "Mixed mode"];
        for (code, name) in names.iter().enumerate() {
            set_vmode(&mut tom, if code == 4 { 0x0100 } else { (code as u16) << 1 });
            assert_eq!(tom.video_mode_name(), *name);
            assert_eq!(tom.pixel_format().to_string(), *name);
        }
        assert_eq!(PixelFormat::iter().collect::<Vec<_>>(), PixelFormat::ALL);
    }

    #[test]
    fn test_width_table() {
        let mut tom = new_tom();

        set_vmode(&mut tom, 3 << 9);
        assert_eq!(tom.width(), 332);
        set_vmode(&mut tom, 0);
        assert_eq!(tom.width(), 1330);
        set_vmode(&mut tom, 7 << 9);
        assert_eq!(tom.width(), 166);
        assert_eq!(tom.real_internal_width(), 166);
    }

    #[test]
    fn test_height_and_hblank() {
        let mut tom = new_tom();

        // Touch VMODE so the NTSC preset geometry is computed.
        set_vmode(&mut tom, 0x06C1);
        assert_eq!(tom.width(), 332);
        assert_eq!(tom.height(), (500 - 24) / 2);
        assert_eq!(tom.hblank_width_in_pixels(), 0);

        tom.write_u16(TOM_BASE_ADDRESS + TOM_HDB1 as u32, 123);
        assert_eq!(tom.hblank_width_in_pixels(), 16);

        // VBE above VBB saturates rather than wrapping.
        tom.write_u16(TOM_BASE_ADDRESS + TOM_VBE as u32, 600);
        assert_eq!(tom.height(), 0);
    }

    #[test]
    fn test_resize_notification() {
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let (delegates, _logs) = mock_delegates(false, Vec::new());
        let mut tom = Tom::new(
            TomConfig::default(),
            delegates,
            Some(Box::new(RecordingDisplay(sizes.clone()))),
        );

        set_vmode(&mut tom, 0x06C1);
        assert_eq!(*sizes.borrow(), vec![SurfaceDimensions { w: 332, h: 238 }]);

        // Same geometry, no notification.
        tom.write_u16(TOM_BASE_ADDRESS + TOM_VDB as u32, 40);
        assert_eq!(sizes.borrow().len(), 1);

        tom.write_u16(TOM_BASE_ADDRESS + TOM_VBB as u32, 524);
        assert_eq!(sizes.borrow().last(), Some(&SurfaceDimensions { w: 332, h: 250 }));
    }
}
