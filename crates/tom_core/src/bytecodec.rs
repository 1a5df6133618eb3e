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

    bytecodec.rs

    Big-endian packing of 16, 32 and 64-bit values into byte-addressed
    register storage. Results never depend on host byte order.

*/

#[inline]
pub fn get_u16_be(buf: &[u8], offset: usize) -> u16 {
    (buf[offset] as u16) << 8 | buf[offset + 1] as u16
}

#[inline]
pub fn set_u16_be(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset] = (value >> 8) as u8;
    buf[offset + 1] = value as u8;
}

#[inline]
pub fn get_u32_be(buf: &[u8], offset: usize) -> u32 {
    (get_u16_be(buf, offset) as u32) << 16 | get_u16_be(buf, offset + 2) as u32
}

#[inline]
pub fn set_u32_be(buf: &mut [u8], offset: usize, value: u32) {
    set_u16_be(buf, offset, (value >> 16) as u16);
    set_u16_be(buf, offset + 2, value as u16);
}

#[inline]
pub fn get_u64_be(buf: &[u8], offset: usize) -> u64 {
    (get_u32_be(buf, offset) as u64) << 32 | get_u32_be(buf, offset + 4) as u64
}

#[inline]
pub fn set_u64_be(buf: &mut [u8], offset: usize, value: u64) {
    set_u32_be(buf, offset, (value >> 32) as u32);
    set_u32_be(buf, offset + 4, value as u32);
}

/// Select the byte lane of a 16-bit register addressed by `offset`. Even offsets hold the
/// high byte.
#[inline]
pub fn word_lane(word: u16, offset: usize) -> u8 {
    if offset & 1 == 0 {
        (word >> 8) as u8
    }
    else {
        word as u8
    }
}

/// Replace the byte lane of a 16-bit register addressed by `offset`.
#[inline]
pub fn set_word_lane(word: u16, offset: usize, byte: u8) -> u16 {
    if offset & 1 == 0 {
        (word & 0x00FF) | (byte as u16) << 8
    }
    else {
        (word & 0xFF00) | byte as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_layout() {
        let mut buf = [0u8; 4];
        set_u16_be(&mut buf, 1, 0x1861);
        assert_eq!(buf, [0x00, 0x18, 0x61, 0x00]);
        assert_eq!(get_u16_be(&buf, 1), 0x1861);
    }

    #[test]
    fn test_u32_layout() {
        let mut buf = [0u8; 6];
        set_u32_be(&mut buf, 2, 0xF000_00E0);
        assert_eq!(buf, [0x00, 0x00, 0xF0, 0x00, 0x00, 0xE0]);
        assert_eq!(get_u32_be(&buf, 2), 0xF000_00E0);
        assert_eq!(get_u16_be(&buf, 2), 0xF000);
    }

    #[test]
    fn test_u64_layout() {
        let mut buf = [0u8; 8];
        set_u64_be(&mut buf, 0, 0x0123_4567_89AB_CDEF);
        assert_eq!(buf, [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);
        assert_eq!(get_u64_be(&buf, 0), 0x0123_4567_89AB_CDEF);
        assert_eq!(get_u32_be(&buf, 4), 0x89AB_CDEF);
    }

    #[test]
    fn test_word_lanes() {
        assert_eq!(word_lane(0xABCD, 0x50), 0xAB);
        assert_eq!(word_lane(0xABCD, 0x51), 0xCD);
        assert_eq!(set_word_lane(0xABCD, 0x52, 0x12), 0x12CD);
        assert_eq!(set_word_lane(0xABCD, 0x53, 0x12), 0xAB12);
    }
}
