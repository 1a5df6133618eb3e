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

    devices::tom::timer.rs

    TOM's programmable interval timer and interrupt controller. The timer
    counts down elapsed cycles from (1 + prescaler) * (1 + divider) and
    raises a timer interrupt on expiry. Five sticky pending flags are
    reported through INT1 and acknowledged by writing its high byte.

*/

use super::*;
use crate::bus::{IrqLineState, GPU_TIMER_IRQ_LINE};
use modular_bitfield::{bitfield, prelude::*};
use strum_macros::Display;

/// CPU vector serviced by TOM's interrupt output.
pub const CPU_TOM_VECTOR: u8 = 64;
/// CPU interrupt level raised by TOM.
pub const CPU_TOM_IRQ_LEVEL: u8 = 7;

#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum TomIrq {
    Video = 0,
    Gpu = 1,
    Object = 2,
    Timer = 3,
    Puck = 4,
}

impl TomIrq {
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// INT1. The low byte holds the CPU interrupt enables, the high byte acknowledges pending
/// interrupts.
#[bitfield]
#[derive(Copy, Clone, Debug, Default)]
pub struct InterruptControlRegister {
    pub video_enable: bool,
    pub gpu_enable: bool,
    pub object_enable: bool,
    pub timer_enable: bool,
    pub puck_enable: bool,
    #[skip]
    unused0: B3,
    pub video_clear: bool,
    pub gpu_clear: bool,
    pub object_clear: bool,
    pub timer_clear: bool,
    pub puck_clear: bool,
    #[skip]
    unused1: B3,
}

impl InterruptControlRegister {
    pub fn from_word(word: u16) -> Self {
        Self::from_bytes(word.to_le_bytes())
    }

    /// Pending flags acknowledged by this write, as a mask of `TomIrq` bits.
    pub fn clear_mask(&self) -> u8 {
        let mut mask = 0;
        if self.video_clear() {
            mask |= TomIrq::Video.mask();
        }
        if self.gpu_clear() {
            mask |= TomIrq::Gpu.mask();
        }
        if self.object_clear() {
            mask |= TomIrq::Object.mask();
        }
        if self.timer_clear() {
            mask |= TomIrq::Timer.mask();
        }
        if self.puck_clear() {
            mask |= TomIrq::Puck.mask();
        }
        mask
    }
}

#[derive(Clone, Debug, Default)]
pub struct TomTimer {
    prescaler: u16,
    divider: u16,
    counter: i64,
}

impl TomTimer {
    pub fn prescaler(&self) -> u16 {
        self.prescaler
    }

    pub fn divider(&self) -> u16 {
        self.divider
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn set_prescaler(&mut self, prescaler: u16) {
        self.prescaler = prescaler;
        self.reload();
    }

    pub fn set_divider(&mut self, divider: u16) {
        self.divider = divider;
        self.reload();
    }

    /// Cycles between expiries. Zero if either field is zero, which stops the timer.
    pub fn reload_value(&self) -> i64 {
        if self.prescaler == 0 || self.divider == 0 {
            0
        }
        else {
            (1 + self.prescaler as i64) * (1 + self.divider as i64)
        }
    }

    pub fn reload(&mut self) {
        self.counter = self.reload_value();
        log::trace!(
            "TOM: Timer reload: prescaler {} divider {} counter {}",
            self.prescaler,
            self.divider,
            self.counter
        );
    }

    /// Count down by `cycles`. Returns true if the timer expired, in which case it has been
    /// reloaded.
    pub fn tick(&mut self, cycles: u32) -> bool {
        if self.counter <= 0 {
            return false;
        }

        self.counter -= cycles as i64;
        if self.counter <= 0 {
            self.reload();
            true
        }
        else {
            false
        }
    }
}

impl Tom {
    /// Advance the timer by `cycles` elapsed cycles.
    pub fn execute(&mut self, cycles: u32) {
        if self.timer.tick(cycles) {
            self.timer_expired();
        }
    }

    fn timer_expired(&mut self) {
        self.set_timer_pending();
        self.delegates
            .gpu
            .set_irq_line(GPU_TIMER_IRQ_LINE, IrqLineState::Assert);

        if self.irq_enabled(TomIrq::Timer) && self.delegates.cpu.interrupt_handler_is_valid(CPU_TOM_VECTOR) {
            self.delegates.cpu.raise_irq(CPU_TOM_IRQ_LEVEL);
        }
    }

    pub fn timer(&self) -> &TomTimer {
        &self.timer
    }

    /// Returns true if the CPU interrupt enable bit for `irq` is set in INT1.
    pub fn irq_enabled(&self, irq: TomIrq) -> bool {
        let int1 = InterruptControlRegister::from_word(self.reg16(TOM_INT1));
        match irq {
            TomIrq::Video => int1.video_enable(),
            TomIrq::Gpu => int1.gpu_enable(),
            TomIrq::Object => int1.object_enable(),
            TomIrq::Timer => int1.timer_enable(),
            TomIrq::Puck => int1.puck_enable(),
        }
    }

    /// The INT1 status word: one bit per pending interrupt.
    pub fn pending_interrupts(&self) -> u16 {
        self.pending as u16
    }

    pub fn is_pending(&self, irq: TomIrq) -> bool {
        self.pending & irq.mask() != 0
    }

    pub fn set_pending(&mut self, irq: TomIrq) {
        self.pending |= irq.mask();
    }

    pub fn set_video_pending(&mut self) {
        self.set_pending(TomIrq::Video);
    }

    pub fn set_gpu_pending(&mut self) {
        self.set_pending(TomIrq::Gpu);
    }

    pub fn set_object_pending(&mut self) {
        self.set_pending(TomIrq::Object);
    }

    pub fn set_timer_pending(&mut self) {
        self.set_pending(TomIrq::Timer);
    }

    pub fn set_puck_pending(&mut self) {
        self.set_pending(TomIrq::Puck);
    }

    /// Clear the pending flags selected by an INT1 write.
    pub(super) fn acknowledge_interrupts(&mut self, int1: InterruptControlRegister) {
        self.pending &= !int1.clear_mask();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::{mock_delegates, DelegateCall};
    use strum::IntoEnumIterator;

    const PIT0_ADDRESS: u32 = TOM_BASE_ADDRESS + TOM_PIT0 as u32;
    const PIT1_ADDRESS: u32 = TOM_BASE_ADDRESS + TOM_PIT1 as u32;
    const INT1_ADDRESS: u32 = TOM_BASE_ADDRESS + TOM_INT1 as u32;

    #[test]
    fn test_timer_reload_value() {
        let mut timer = TomTimer::default();
        assert_eq!(timer.reload_value(), 0);
        timer.set_prescaler(9);
        assert_eq!(timer.counter(), 0);
        timer.set_divider(3);
        assert_eq!(timer.counter(), 40);
        timer.set_prescaler(0);
        assert_eq!(timer.counter(), 0);
        assert!(!timer.tick(100));
    }

    #[test]
    fn test_timer_expiry_once() {
        let (delegates, logs) = mock_delegates(true, Vec::new());
        let mut tom = Tom::new(TomConfig::default(), delegates, None);
        tom.write_u16(PIT0_ADDRESS, 9);
        tom.write_u16(PIT1_ADDRESS, 3);
        assert_eq!(tom.timer().counter(), 40);

        for _ in 0..3 {
            tom.execute(13);
        }
        assert!(!tom.is_pending(TomIrq::Timer));
        assert_eq!(tom.timer().counter(), 1);

        tom.execute(1);
        assert!(tom.is_pending(TomIrq::Timer));
        assert_eq!(tom.pending_interrupts(), 0x08);
        assert_eq!(tom.timer().counter(), 40);
        assert_eq!(logs.gpu.count(&DelegateCall::IrqLine(2, IrqLineState::Assert)), 1);
        // CPU enable bit is clear, so no CPU interrupt.
        assert!(logs.cpu.calls().is_empty());
    }

    #[test]
    fn test_timer_raises_cpu_irq() {
        let (delegates, logs) = mock_delegates(true, Vec::new());
        let mut tom = Tom::new(TomConfig::default(), delegates, None);
        tom.write_u16(INT1_ADDRESS, 0x0008);
        assert!(tom.irq_enabled(TomIrq::Timer));
        assert!(!tom.irq_enabled(TomIrq::Video));

        tom.write_u16(PIT0_ADDRESS, 1);
        tom.write_u16(PIT1_ADDRESS, 1);
        tom.execute(4);
        assert_eq!(logs.cpu.calls(), vec![DelegateCall::RaiseIrq(7)]);

        tom.execute(10);
        assert_eq!(logs.cpu.count(&DelegateCall::RaiseIrq(7)), 2);
    }

    #[test]
    fn test_timer_needs_valid_handler() {
        let (delegates, logs) = mock_delegates(false, Vec::new());
        let mut tom = Tom::new(TomConfig::default(), delegates, None);
        tom.write_u16(INT1_ADDRESS, 0x0008);
        tom.write_u16(PIT0_ADDRESS, 1);
        tom.write_u16(PIT1_ADDRESS, 1);
        tom.execute(4);
        assert!(tom.is_pending(TomIrq::Timer));
        assert!(logs.cpu.calls().is_empty());
    }

    #[test]
    fn test_timer_disabled() {
        let (delegates, logs) = mock_delegates(true, Vec::new());
        let mut tom = Tom::new(TomConfig::default(), delegates, None);
        tom.write_u16(PIT0_ADDRESS, 9);
        tom.execute(1000);
        assert_eq!(tom.pending_interrupts(), 0);
        assert!(logs.gpu.calls().is_empty());
    }

    #[test]
    fn test_interrupt_acknowledge() {
        let (delegates, _logs) = mock_delegates(false, Vec::new());
        let mut tom = Tom::new(TomConfig::default(), delegates, None);
        for irq in TomIrq::iter() {
            tom.set_pending(irq);
        }
        assert_eq!(tom.read_u16(INT1_ADDRESS), 0x001F);

        tom.write_u16(INT1_ADDRESS, 0x0800);
        assert_eq!(tom.read_u16(INT1_ADDRESS), 0x0017);
        assert!(!tom.is_pending(TomIrq::Timer));

        tom.write_u16(INT1_ADDRESS, 0x1100);
        assert_eq!(tom.read_u16(INT1_ADDRESS), 0x0006);

        // Byte write to the high byte acknowledges too.
        tom.write_u8(INT1_ADDRESS, 0x06);
        assert_eq!(tom.pending_interrupts(), 0);
    }

    #[test]
    fn test_pending_setters_idempotent() {
        let (delegates, _logs) = mock_delegates(false, Vec::new());
        let mut tom = Tom::new(TomConfig::default(), delegates, None);
        tom.set_video_pending();
        tom.set_video_pending();
        tom.set_gpu_pending();
        tom.set_object_pending();
        tom.set_puck_pending();
        assert_eq!(tom.pending_interrupts(), 0b1_0111);
    }

    #[test]
    fn test_clear_mask_bits() {
        for irq in TomIrq::iter() {
            let word = (irq.mask() as u16) << 8;
            assert_eq!(InterruptControlRegister::from_word(word).clear_mask(), irq.mask());
        }
    }
}
