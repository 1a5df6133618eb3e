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

    bus.rs

    Interfaces to the devices TOM shares its address space and interrupt
    lines with. TOM forwards accesses in their register windows and raises
    interrupts through these traits; it never owns their internal state.

*/

pub const NO_REGISTER_BYTE: u8 = 0xFF;
pub const NO_REGISTER_WORD: u16 = 0xFFFF;

/// A device whose registers are reached through TOM's register router. Addresses are full bus
/// addresses.
pub trait RegisterDevice {
    /// Read a byte from the specified address. The default implementation returns
    /// NO_REGISTER_BYTE (0xFF).
    fn read_u8(&mut self, _address: u32) -> u8 {
        NO_REGISTER_BYTE
    }

    /// Read a big-endian word from the specified address. The default implementation returns
    /// NO_REGISTER_WORD (0xFFFF).
    fn read_u16(&mut self, _address: u32) -> u16 {
        NO_REGISTER_WORD
    }

    fn write_u8(&mut self, _address: u32, _data: u8) {}

    fn write_u16(&mut self, _address: u32, _data: u16) {}

    /// Restore power-on state. Called from TOM's reset.
    fn reset(&mut self) {}

    /// Release any resources. Called once when TOM is torn down.
    fn done(&mut self) {}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IrqLineState {
    Clear,
    Assert,
}

/// GPU line number asserted when the programmable timer expires.
pub const GPU_TIMER_IRQ_LINE: u8 = 2;

pub trait GpuDevice: RegisterDevice {
    fn set_irq_line(&mut self, line: u8, state: IrqLineState);
}

pub trait ObjectProcessorDevice: RegisterDevice {
    /// Set or clear the "display list active" flag.
    fn set_list_active(&mut self, active: bool);
    /// Walk the object list for `scanline`, composing pixels into `line_buffer`. The slice begins
    /// at the current line buffer and extends to the end of TOM's register store.
    fn process_list(&mut self, scanline: u32, render: bool, line_buffer: &mut [u8]);
}

pub trait BlitterDevice: RegisterDevice {}

/// The host CPU's interrupt input.
pub trait CpuInterruptLine {
    /// Returns true if the CPU's vector table holds a usable handler for `vector`.
    fn interrupt_handler_is_valid(&self, vector: u8) -> bool;
    /// Raise the CPU interrupt priority level `level`.
    fn raise_irq(&mut self, level: u8);
}

/// Stands in for any device that is not attached.
#[derive(Default)]
pub struct NullDevice;

impl RegisterDevice for NullDevice {}

impl GpuDevice for NullDevice {
    fn set_irq_line(&mut self, _line: u8, _state: IrqLineState) {}
}

impl ObjectProcessorDevice for NullDevice {
    fn set_list_active(&mut self, _active: bool) {}
    fn process_list(&mut self, _scanline: u32, _render: bool, _line_buffer: &mut [u8]) {}
}

impl BlitterDevice for NullDevice {}

impl CpuInterruptLine for NullDevice {
    fn interrupt_handler_is_valid(&self, _vector: u8) -> bool {
        false
    }
    fn raise_irq(&mut self, _level: u8) {}
}

/// The set of companion devices injected into TOM at construction.
pub struct TomDelegates {
    pub gpu: Box<dyn GpuDevice>,
    pub blitter: Box<dyn BlitterDevice>,
    pub object_processor: Box<dyn ObjectProcessorDevice>,
    pub cpu: Box<dyn CpuInterruptLine>,
}

impl Default for TomDelegates {
    fn default() -> Self {
        Self {
            gpu: Box::new(NullDevice),
            blitter: Box::new(NullDevice),
            object_processor: Box::new(NullDevice),
            cpu: Box::new(NullDevice),
        }
    }
}
