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

    devices::tom::io.rs

    Register router for TOM's address space. Accesses to the GPU, blitter
    and object processor windows are forwarded to those devices; everything
    else is serviced from the register store, with side effects for the
    timer, INT1, the CLUT and the video timing registers.

*/

use super::*;
use crate::bytecodec::{set_word_lane, word_lane};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TomDevice {
    GpuControl,
    GpuWorkRam,
    ObjectProcessor,
    Blitter,
    Local,
}

/// Determine which device services a bus address. Windows are checked in priority order; any
/// address outside them belongs to TOM itself.
pub fn decode_address(address: u32) -> TomDevice {
    if (GPU_CONTROL_ADDRESS..GPU_CONTROL_ADDRESS + GPU_CONTROL_SIZE).contains(&address) {
        TomDevice::GpuControl
    }
    else if (GPU_WORK_RAM_ADDRESS..GPU_WORK_RAM_ADDRESS + GPU_WORK_RAM_SIZE).contains(&address) {
        TomDevice::GpuWorkRam
    }
    else if (OP_REGISTERS_START..OP_REGISTERS_END).contains(&address) {
        TomDevice::ObjectProcessor
    }
    else if (BLITTER_REGISTERS_START..BLITTER_REGISTERS_END).contains(&address) {
        TomDevice::Blitter
    }
    else {
        TomDevice::Local
    }
}

/// Mask of implemented bits for the 16-bit register at `register`.
fn register_width_mask(register: usize) -> u16 {
    match register {
        TOM_HP | TOM_HVS | TOM_HEQ => 0x03FF,
        TOM_HBB..=TOM_VI => 0x07FF,
        _ => 0xFFFF,
    }
}

fn timing_register_name(register: usize) -> Option<&'static str> {
    let name = match register {
        TOM_MEMCON1 => "MEMCON1",
        TOM_MEMCON2 => "MEMCON2",
        TOM_VMODE => "VMODE",
        TOM_HP => "HP",
        TOM_HBB => "HBB",
        TOM_HBE => "HBE",
        TOM_HDB1 => "HDB1",
        TOM_HDE => "HDE",
        TOM_VP => "VP",
        TOM_VBB => "VBB",
        TOM_VBE => "VBE",
        TOM_VS => "VS",
        TOM_VDB => "VDB",
        TOM_VDE => "VDE",
        TOM_VI => "VI",
        _ => return None,
    };
    Some(name)
}

fn is_gpu_register_file(address: u32) -> bool {
    (GPU_REGISTER_FILE_ADDRESS..=GPU_REGISTER_FILE_END).contains(&address)
}

impl Tom {
    pub fn read_u8(&mut self, address: u32) -> u8 {
        if is_gpu_register_file(address) {
            log::warn!("TOM: Read of unimplemented GPU register file at {:06X}", address);
        }

        match decode_address(address) {
            TomDevice::GpuControl | TomDevice::GpuWorkRam => self.delegates.gpu.read_u8(address),
            TomDevice::ObjectProcessor => self.delegates.object_processor.read_u8(address),
            TomDevice::Blitter => self.delegates.blitter.read_u8(address),
            TomDevice::Local => self.local_read_u8(address as usize & TOM_ADDRESS_MASK),
        }
    }

    pub fn read_u16(&mut self, address: u32) -> u16 {
        if is_gpu_register_file(address) {
            log::warn!("TOM: Read of unimplemented GPU register file at {:06X}", address);
        }

        match decode_address(address) {
            TomDevice::GpuControl | TomDevice::GpuWorkRam => self.delegates.gpu.read_u16(address),
            TomDevice::ObjectProcessor => self.delegates.object_processor.read_u16(address),
            TomDevice::Blitter => self.delegates.blitter.read_u16(address),
            TomDevice::Local => {
                let offset = address as usize & TOM_ADDRESS_MASK;
                if offset == TOM_INT1 {
                    // Only the word read reports status; byte reads see the stored enables.
                    return self.pending_interrupts();
                }
                (self.local_read_u8(offset) as u16) << 8 | self.local_read_u8((offset + 1) & TOM_ADDRESS_MASK) as u16
            }
        }
    }

    pub fn write_u8(&mut self, address: u32, data: u8) {
        let address = address & TOM_WRITE_DECODE_MASK;
        if is_gpu_register_file(address) {
            log::warn!("TOM: Write to unimplemented GPU register file at {:06X}", address);
        }

        match decode_address(address) {
            TomDevice::GpuControl | TomDevice::GpuWorkRam => self.delegates.gpu.write_u8(address, data),
            TomDevice::ObjectProcessor => self.delegates.object_processor.write_u8(address, data),
            TomDevice::Blitter => self.delegates.blitter.write_u8(address, data),
            TomDevice::Local => self.local_write(address as usize & TOM_ADDRESS_MASK, &[data]),
        }
    }

    pub fn write_u16(&mut self, address: u32, data: u16) {
        let address = address & TOM_WRITE_DECODE_MASK;
        if is_gpu_register_file(address) {
            log::warn!("TOM: Write to unimplemented GPU register file at {:06X}", address);
        }

        match decode_address(address) {
            TomDevice::GpuControl | TomDevice::GpuWorkRam => self.delegates.gpu.write_u16(address, data),
            TomDevice::ObjectProcessor => self.delegates.object_processor.write_u16(address, data),
            TomDevice::Blitter => self.delegates.blitter.write_u16(address, data),
            TomDevice::Local => self.local_write(address as usize & TOM_ADDRESS_MASK, &data.to_be_bytes()),
        }
    }

    fn local_read_u8(&self, offset: usize) -> u8 {
        match offset & !1 {
            TOM_PIT0 => word_lane(self.timer.prescaler(), offset),
            TOM_PIT1 => word_lane(self.timer.divider(), offset),
            _ => self.ram[offset],
        }
    }

    /// Store `bytes` starting at `offset`, then run the side effects for the registers touched.
    fn local_write(&mut self, offset: usize, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.local_write_byte((offset + i) & TOM_ADDRESS_MASK, byte);
        }

        let first = offset;
        let last = offset + bytes.len() - 1;
        let touches = |start: usize, end: usize| first <= end && last >= start;

        if touches(TOM_VMODE, TOM_VMODE + 1) {
            self.delegates.object_processor.set_list_active(true);
        }

        if touches(TOM_TIMING_WINDOW_START, TOM_TIMING_WINDOW_END) || touches(TOM_MEMCON1, TOM_MEMCON2 + 1) {
            let register = offset & !1;
            if let Some(name) = timing_register_name(register) {
                log::debug!("TOM: {} <- {:04X}", name, self.reg16(register));
            }
        }

        if touches(TOM_TIMING_WINDOW_START, TOM_TIMING_WINDOW_END) {
            self.update_video_geometry();
        }
    }

    fn local_write_byte(&mut self, offset: usize, data: u8) {
        if (TOM_CLUT_A..=TOM_CLUT_END).contains(&offset) {
            // One logical table visible at two addresses
            let entry = offset & TOM_CLUT_MIRROR_MASK;
            self.ram[entry] = data;
            self.ram[entry + TOM_CLUT_BANK_SIZE] = data;
            return;
        }

        let register = offset & !1;
        match register {
            TOM_PIT0 => {
                self.timer
                    .set_prescaler(set_word_lane(self.timer.prescaler(), offset, data));
                return;
            }
            TOM_PIT1 => {
                self.timer.set_divider(set_word_lane(self.timer.divider(), offset, data));
                return;
            }
            TOM_INT1 if offset == TOM_INT1 => {
                self.acknowledge_interrupts(InterruptControlRegister::from_word((data as u16) << 8));
            }
            _ => {}
        }

        self.ram[offset] = data & word_lane(register_width_mask(register), offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::{mock_delegates, DelegateCall, MockLogs};

    fn new_tom() -> (Tom, MockLogs) {
        let (delegates, logs) = mock_delegates(false, Vec::new());
        let tom = Tom::new(TomConfig::default(), delegates, None);
        logs.clear();
        (tom, logs)
    }

    fn reg_address(offset: usize) -> u32 {
        TOM_BASE_ADDRESS + offset as u32
    }

    #[test]
    fn test_decode_priority() {
        assert_eq!(decode_address(0xF0_2100), TomDevice::GpuControl);
        assert_eq!(decode_address(0xF0_211F), TomDevice::GpuControl);
        assert_eq!(decode_address(0xF0_2120), TomDevice::Local);
        assert_eq!(decode_address(0xF0_3000), TomDevice::GpuWorkRam);
        assert_eq!(decode_address(0xF0_3FFF), TomDevice::GpuWorkRam);
        assert_eq!(decode_address(0xF0_0010), TomDevice::ObjectProcessor);
        assert_eq!(decode_address(0xF0_0027), TomDevice::ObjectProcessor);
        assert_eq!(decode_address(0xF0_0028), TomDevice::Local);
        assert_eq!(decode_address(0xF0_2200), TomDevice::Blitter);
        assert_eq!(decode_address(0xF0_229F), TomDevice::Blitter);
        assert_eq!(decode_address(0xF0_22A0), TomDevice::Local);
        assert_eq!(decode_address(0xF0_2000), TomDevice::Local);
    }

    #[test]
    fn test_delegate_forwarding() {
        let (mut tom, logs) = new_tom();

        assert_eq!(tom.read_u8(0xF0_2104), 0x5A);
        assert_eq!(tom.read_u16(0xF0_3010), 0xA55A);
        tom.write_u16(0xF0_2114, 0x1234);
        tom.write_u8(0xF0_3002, 0x56);
        assert_eq!(
            logs.gpu.calls(),
            vec![
                DelegateCall::ReadU8(0xF0_2104),
                DelegateCall::ReadU16(0xF0_3010),
                DelegateCall::WriteU16(0xF0_2114, 0x1234),
                DelegateCall::WriteU8(0xF0_3002, 0x56),
            ]
        );

        tom.write_u16(0xF0_2238, 0xBEEF);
        assert_eq!(tom.read_u8(0xF0_2238), 0x5A);
        assert_eq!(
            logs.blitter.calls(),
            vec![DelegateCall::WriteU16(0xF0_2238, 0xBEEF), DelegateCall::ReadU8(0xF0_2238)]
        );

        tom.write_u16(0xF0_0020, 0x0001);
        assert_eq!(tom.read_u16(0xF0_0010), 0xA55A);
        assert_eq!(
            logs.object_processor.calls(),
            vec![DelegateCall::WriteU16(0xF0_0020, 0x0001), DelegateCall::ReadU16(0xF0_0010)]
        );
    }

    #[test]
    fn test_write_decode_mirror() {
        let (mut tom, logs) = new_tom();

        // Bits 14-15 of the bus address are not decoded on write.
        tom.write_u16(0xF0_C400, 0x4321);
        assert_eq!(tom.read_u16(0xF0_0400), 0x4321);

        tom.write_u16(0xF0_6100, 0x0101);
        assert_eq!(logs.gpu.calls(), vec![DelegateCall::WriteU16(0xF0_2100, 0x0101)]);
    }

    #[test]
    fn test_eleven_bit_truncation() {
        let (mut tom, _logs) = new_tom();
        for offset in (TOM_HBB..=TOM_VI).step_by(2) {
            if offset == TOM_HVS {
                continue;
            }
            tom.write_u16(reg_address(offset), 0xFFFF);
            assert_eq!(tom.read_u16(reg_address(offset)), 0x07FF, "register {:02X}", offset);
        }
    }

    #[test]
    fn test_ten_bit_truncation() {
        let (mut tom, _logs) = new_tom();
        for offset in [TOM_HP, TOM_HVS, TOM_HEQ] {
            tom.write_u16(reg_address(offset), 0xFFFF);
            assert_eq!(tom.read_u16(reg_address(offset)), 0x03FF, "register {:02X}", offset);
        }

        // Byte writes are masked by lane.
        tom.write_u8(reg_address(TOM_HP), 0xFF);
        assert_eq!(tom.read_u8(reg_address(TOM_HP)), 0x03);
        tom.write_u8(reg_address(TOM_VBB), 0xFF);
        assert_eq!(tom.read_u8(reg_address(TOM_VBB)), 0x07);
    }

    #[test]
    fn test_untruncated_registers() {
        let (mut tom, _logs) = new_tom();
        tom.write_u16(reg_address(TOM_BG), 0xFFFF);
        assert_eq!(tom.read_u16(reg_address(TOM_BG)), 0xFFFF);
        tom.write_u16(reg_address(TOM_VMODE), 0xFFFF);
        assert_eq!(tom.read_u16(reg_address(TOM_VMODE)), 0xFFFF);
    }

    #[test]
    fn test_clut_mirror() {
        let (mut tom, _logs) = new_tom();
        for offset in (TOM_CLUT_A..=TOM_CLUT_END).step_by(2) {
            let value = offset as u16 ^ 0xA5C3;
            tom.write_u16(reg_address(offset), value);

            let bank_a = TOM_CLUT_A + (offset & (TOM_CLUT_BANK_SIZE - 1));
            assert_eq!(tom.read_u16(reg_address(bank_a)), value);
            assert_eq!(tom.read_u16(reg_address(bank_a + TOM_CLUT_BANK_SIZE)), value);
        }

        tom.write_u8(reg_address(0x7FF), 0x77);
        assert_eq!(tom.read_u8(reg_address(0x5FF)), 0x77);
    }

    #[test]
    fn test_vmode_write_activates_list() {
        let (mut tom, logs) = new_tom();
        tom.write_u16(reg_address(TOM_VMODE), 0x06C1);
        assert_eq!(logs.object_processor.calls(), vec![DelegateCall::ListActive(true)]);

        logs.clear();
        tom.write_u8(reg_address(TOM_VMODE + 1), 0xC1);
        assert_eq!(logs.object_processor.calls(), vec![DelegateCall::ListActive(true)]);

        logs.clear();
        tom.write_u16(reg_address(TOM_HP), 100);
        assert!(logs.object_processor.calls().is_empty());
    }

    #[test]
    fn test_timer_registers() {
        let (mut tom, _logs) = new_tom();
        tom.write_u16(reg_address(TOM_PIT0), 0x1234);
        tom.write_u8(reg_address(TOM_PIT1), 0x00);
        tom.write_u8(reg_address(TOM_PIT1 + 1), 0x03);

        assert_eq!(tom.read_u16(reg_address(TOM_PIT0)), 0x1234);
        assert_eq!(tom.read_u8(reg_address(TOM_PIT1 + 1)), 0x03);
        assert_eq!(tom.timer().counter(), (1 + 0x1234) * 4);
        // Timer values are not held in the store.
        assert_eq!(tom.ram()[TOM_PIT0], 0);
    }

    #[test]
    fn test_int1_enables_stored() {
        let (mut tom, _logs) = new_tom();
        tom.set_timer_pending();
        tom.write_u16(reg_address(TOM_INT1), 0x001F);
        assert_eq!(tom.ram()[TOM_INT1 + 1], 0x1F);
        // Status read reports pending flags, not the enables.
        assert_eq!(tom.read_u16(reg_address(TOM_INT1)), 0x0008);
    }

    #[test]
    fn test_int1_byte_reads_stored() {
        let (mut tom, _logs) = new_tom();
        tom.set_timer_pending();
        tom.write_u16(reg_address(TOM_INT1), 0x001F);
        assert_eq!(tom.read_u8(reg_address(TOM_INT1)), 0x00);
        assert_eq!(tom.read_u8(reg_address(TOM_INT1 + 1)), 0x1F);
        assert_eq!(tom.read_u16(reg_address(TOM_INT1)), 0x0008);
        // A word read at the odd address composes stored bytes.
        assert_eq!(tom.read_u16(reg_address(TOM_INT1 + 1)), 0x1F00);
    }

    #[test]
    fn test_local_mirror() {
        let (mut tom, _logs) = new_tom();
        tom.write_u16(reg_address(TOM_LBUF_A), 0xCAFE);
        assert_eq!(tom.read_u16(TOM_BASE_ADDRESS + 0x4000 + TOM_LBUF_A as u32), 0xCAFE);
        assert_eq!(tom.read_u8(0x00_0801), 0xFE);
    }
}
