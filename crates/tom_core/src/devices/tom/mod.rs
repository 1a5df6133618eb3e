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

    devices::tom::mod.rs

    Implementation of TOM, the video and timer coprocessor. TOM owns a 16K
    register space containing video timing registers, the CLUT and the line
    buffers. It forwards the GPU, blitter and object processor windows of
    that space to their devices, renders each scanline from the line buffer
    and runs the programmable interrupt timer.

*/

mod draw;
mod io;
mod tablegen;
mod timer;
mod videomode;

pub use draw::{render_scanline, ScanlineSource, LINE_BUFFER_PIXEL_PAIRS};
pub use io::{decode_address, TomDevice};
pub use tablegen::{build_cry_mix_lut, cry16_to_rgb15, CRY_BLUE, CRY_GREEN, CRY_RED};
pub use timer::{InterruptControlRegister, TomIrq, TomTimer};
pub use videomode::{PixelFormat, VideoModeRegister, PIXEL_WIDTH_TABLE, VIDEO_MODE_TABLE};

use crate::{
    bus::TomDelegates,
    bytecodec::{get_u16_be, set_u16_be},
    config::{TomConfig, VideoStandard},
    display::DisplayBackend,
    error::TomError,
};

pub const TOM_BASE_ADDRESS: u32 = 0xF0_0000;
pub const TOM_RAM_SIZE: usize = 0x4000; // 16K register space
pub const TOM_ADDRESS_MASK: usize = 0x3FFF; // Applying this mask implements the register space mirror.
pub const TOM_WRITE_DECODE_MASK: u32 = 0xFF_3FFF;

// Windows of the address space serviced by other devices.
pub const GPU_CONTROL_ADDRESS: u32 = 0xF0_2100;
pub const GPU_CONTROL_SIZE: u32 = 0x20;
pub const GPU_WORK_RAM_ADDRESS: u32 = 0xF0_3000;
pub const GPU_WORK_RAM_SIZE: u32 = 0x1000;
pub const GPU_REGISTER_FILE_ADDRESS: u32 = 0xF0_2000; // Not implemented. Accesses are logged.
pub const GPU_REGISTER_FILE_END: u32 = 0xF0_20FF;
pub const OP_REGISTERS_START: u32 = 0xF0_0010;
pub const OP_REGISTERS_END: u32 = 0xF0_0028; // Exclusive. VMODE begins here.
pub const BLITTER_REGISTERS_START: u32 = 0xF0_2200;
pub const BLITTER_REGISTERS_END: u32 = 0xF0_22A0; // Exclusive

// Register offsets within the store
pub const TOM_MEMCON1: usize = 0x00;
pub const TOM_MEMCON2: usize = 0x02;
pub const TOM_HC: usize = 0x04;
pub const TOM_VC: usize = 0x06;
pub const TOM_VMODE: usize = 0x28;
pub const TOM_HP: usize = 0x2E;
pub const TOM_HBB: usize = 0x30;
pub const TOM_HBE: usize = 0x32;
pub const TOM_HS: usize = 0x34;
pub const TOM_HVS: usize = 0x36;
pub const TOM_HDB1: usize = 0x38;
pub const TOM_HDB2: usize = 0x3A;
pub const TOM_HDE: usize = 0x3C;
pub const TOM_VP: usize = 0x3E;
pub const TOM_VBB: usize = 0x40;
pub const TOM_VBE: usize = 0x42;
pub const TOM_VS: usize = 0x44;
pub const TOM_VDB: usize = 0x46;
pub const TOM_VDE: usize = 0x48;
pub const TOM_VEB: usize = 0x4A;
pub const TOM_VEE: usize = 0x4C;
pub const TOM_VI: usize = 0x4E;
pub const TOM_PIT0: usize = 0x50; // Timer prescaler
pub const TOM_PIT1: usize = 0x52; // Timer divider
pub const TOM_HEQ: usize = 0x54;
pub const TOM_BG: usize = 0x58;
pub const TOM_INT1: usize = 0xE0;
pub const TOM_INT2: usize = 0xE2;

// Writes anywhere in this window may change the visible resolution.
pub const TOM_TIMING_WINDOW_START: usize = 0x28;
pub const TOM_TIMING_WINDOW_END: usize = 0x4F;

pub const TOM_CLUT_A: usize = 0x400;
pub const TOM_CLUT_B: usize = 0x600;
pub const TOM_CLUT_END: usize = 0x7FF;
pub const TOM_CLUT_BANK_SIZE: usize = 0x200;
pub const TOM_CLUT_MIRROR_MASK: usize = 0x5FF;

pub const TOM_LBUF_A: usize = 0x800;
pub const TOM_LBUF_B: usize = 0x1000;
pub const TOM_LBUF_CURRENT: usize = 0x1800;
pub const TOM_LBUF_SIZE: usize = 0x600;

// Power-on values shared by both video standards
const RESET_MEMCON1: u16 = 0x1861;
const RESET_MEMCON2: u16 = 0x35CC;
const RESET_VMODE: u16 = 0x06C1;

struct TimingPreset {
    hp: u16,
    hbb: u16,
    hbe: u16,
    hde: u16,
    hdb1: u16,
    vp: u16,
    vbe: u16,
    vdb: u16,
    vde: u16,
    vbb: u16,
    vs: u16,
}

const NTSC_PRESET: TimingPreset = TimingPreset {
    hp: 844,
    hbb: 1713,
    hbe: 125,
    hde: 1665,
    hdb1: 203,
    vp: 523,
    vbe: 24,
    vdb: 38,
    vde: 518,
    vbb: 500,
    vs: 517,
};

const PAL_PRESET: TimingPreset = TimingPreset {
    hp: 850,
    hbb: 1711,
    hbe: 158,
    hde: 1665,
    hdb1: 203,
    vp: 623,
    vbe: 34,
    vdb: 38,
    vde: 518,
    vbb: 600,
    vs: 618,
};

impl VideoStandard {
    fn timing_preset(&self) -> &'static TimingPreset {
        match self {
            VideoStandard::Ntsc => &NTSC_PRESET,
            VideoStandard::Pal => &PAL_PRESET,
        }
    }
}

pub struct Tom {
    ram: Box<[u8]>,
    width: u32,
    height: u32,
    real_internal_width: u32,
    hblank_width: u32,
    scanline: u32,
    pending: u8,
    timer: TomTimer,
    stretch: bool,
    mix_lut: Box<[u16]>,
    delegates: TomDelegates,
    display: Option<Box<dyn DisplayBackend>>,
    video_standard: VideoStandard,
}

impl Tom {
    /// Create a TOM, build its color lookup table, initialize the companion devices and apply the
    /// configured power-on state.
    pub fn new(config: TomConfig, delegates: TomDelegates, display: Option<Box<dyn DisplayBackend>>) -> Self {
        let mut tom = Self {
            ram: vec![0; TOM_RAM_SIZE].into_boxed_slice(),
            width: 0,
            height: 0,
            real_internal_width: 0,
            hblank_width: 0,
            scanline: 0,
            pending: 0,
            timer: TomTimer::default(),
            stretch: false,
            mix_lut: build_cry_mix_lut(),
            delegates,
            display,
            video_standard: config.video_standard,
        };

        tom.delegates.gpu.reset();
        tom.reset(config.video_standard);
        if config.stretch {
            tom.set_stretch(true);
        }
        tom
    }

    /// Restore the power-on register values for `standard` and reinstall the normal renderers.
    pub fn reset(&mut self, standard: VideoStandard) {
        self.delegates.object_processor.reset();
        self.delegates.blitter.reset();

        self.ram.fill(0);

        let preset = standard.timing_preset();
        set_u16_be(&mut self.ram, TOM_MEMCON1, RESET_MEMCON1);
        set_u16_be(&mut self.ram, TOM_MEMCON2, RESET_MEMCON2);
        set_u16_be(&mut self.ram, TOM_VMODE, RESET_VMODE);
        set_u16_be(&mut self.ram, TOM_HP, preset.hp);
        set_u16_be(&mut self.ram, TOM_HBB, preset.hbb);
        set_u16_be(&mut self.ram, TOM_HBE, preset.hbe);
        set_u16_be(&mut self.ram, TOM_HDE, preset.hde);
        set_u16_be(&mut self.ram, TOM_HDB1, preset.hdb1);
        set_u16_be(&mut self.ram, TOM_VP, preset.vp);
        set_u16_be(&mut self.ram, TOM_VBE, preset.vbe);
        set_u16_be(&mut self.ram, TOM_VDB, preset.vdb);
        set_u16_be(&mut self.ram, TOM_VDE, preset.vde);
        set_u16_be(&mut self.ram, TOM_VBB, preset.vbb);
        set_u16_be(&mut self.ram, TOM_VS, preset.vs);

        self.width = 0;
        self.height = 0;
        self.real_internal_width = 0;
        self.scanline = 0;
        self.hblank_width = (preset.hdb1 >> 1) as u32;
        self.pending = 0;
        self.timer = TomTimer::default();
        self.stretch = false;
        self.video_standard = standard;

        log::debug!("TOM: Reset to {} timing, mode {}", standard, self.video_mode_name());
    }

    /// Tear down TOM and its companion devices. The register store is released with `self`.
    pub fn done(mut self) {
        log::info!(
            "TOM: Resolution {}x{} {}",
            self.width,
            self.height,
            self.video_mode_name()
        );
        self.delegates.object_processor.done();
        self.delegates.blitter.done();
        self.delegates.gpu.done();
    }

    /// Select the renderers that read two source pixels per output pixel.
    pub fn set_stretch(&mut self, stretch: bool) {
        self.stretch = stretch;
    }

    pub fn stretch(&self) -> bool {
        self.stretch
    }

    pub fn video_standard(&self) -> VideoStandard {
        self.video_standard
    }

    pub fn set_display(&mut self, display: Option<Box<dyn DisplayBackend>>) {
        self.display = display;
    }

    pub fn scanline(&self) -> u32 {
        self.scanline
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn real_internal_width(&self) -> u32 {
        self.real_internal_width
    }

    pub fn hblank_width_in_pixels(&self) -> u32 {
        self.hblank_width
    }

    pub fn vdb(&self) -> u16 {
        self.reg16(TOM_VDB)
    }

    /// Direct view of the register store, for memory viewers and the object processor.
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    #[inline]
    fn reg16(&self, offset: usize) -> u16 {
        get_u16_be(&self.ram, offset)
    }

    /// Tell the display backend about the current width and height.
    fn notify_display(&mut self) -> Result<(), TomError> {
        if let Some(display) = self.display.as_mut() {
            display.resize_surface((self.width, self.height).into())?;
        }
        Ok(())
    }
}
