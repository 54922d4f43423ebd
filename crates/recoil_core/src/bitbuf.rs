use crate::huffman::HUFFMAN;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // mod
    #[error("operation could not be completed because there are not enough bits left")]
    Underflow,
    #[error("bit offset {offset} is beyond the end of the buffer ({len} bits)")]
    OutOfBounds { offset: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

// quantized floats carry 13 bits biased by 2^12
const FLOAT_BITS: usize = 13;
const FLOAT_BIAS: f32 = 4096.0;

pub const DEFAULT_STRING_CHARS: usize = 1024;

/// a growable little-endian bit sequence with a read/write cursor.
///
/// byte values within the stream are entropy-coded with the canonical huffman
/// code; the sub-byte remainder of a read/write travels raw. because codes are
/// variable length the buffer is strictly sequential: bits must be consumed in
/// order, and a rewrite of an already-consumed region may grow or shrink the
/// buffer (the tail is shifted to keep the stream contiguous).
pub struct BitBuf {
    // packed, bit k of byte n is stream bit n * 8 + k
    data: Vec<u8>,
    len: usize,
    cursor: usize,
}

impl BitBuf {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            len: 0,
            cursor: 0,
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            len: data.len() << 3,
            cursor: 0,
        }
    }

    /// whole bytes only; a trailing partial byte is not included. call
    /// [`Self::fill`] first when flushing a converted message.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data[..self.len >> 3].to_vec()
    }

    #[inline(always)]
    pub fn len_bits(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn num_bits_left(&self) -> usize {
        self.len - self.cursor
    }

    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn seek(&mut self, bit: usize) -> Result<usize> {
        if bit > self.len {
            return Err(Error::OutOfBounds {
                offset: bit,
                len: self.len,
            });
        }
        self.cursor = bit;
        Ok(self.cursor)
    }

    #[inline(always)]
    fn get(&self, idx: usize) -> bool {
        self.data[idx >> 3] >> (idx & 7) & 1 == 1
    }

    #[inline(always)]
    fn set(&mut self, idx: usize, bit: bool) {
        let mask = 1u8 << (idx & 7);
        if bit {
            self.data[idx >> 3] |= mask;
        } else {
            self.data[idx >> 3] &= !mask;
        }
    }

    fn push(&mut self, bit: bool) {
        if self.len & 7 == 0 {
            self.data.push(0);
        }
        let idx = self.len;
        self.len += 1;
        self.set(idx, bit);
    }

    /// pads the buffer with zero bits up to a whole-byte boundary.
    pub fn fill(&mut self) {
        while self.len & 7 != 0 {
            self.push(false);
        }
    }

    #[inline]
    fn read_bit(&mut self) -> Result<bool> {
        if self.cursor >= self.len {
            return Err(Error::Underflow);
        }
        let bit = self.get(self.cursor);
        self.cursor += 1;
        Ok(bit)
    }

    /// reads `count` bits (1..=32). the low `count % 8` bits travel raw and
    /// land in the low-order bits of the result; each following byte is one
    /// huffman symbol and occupies the next 8 result bits.
    pub fn read_bits(&mut self, count: usize) -> Result<u32> {
        debug_assert!(count >= 1 && count <= 32, "invalid bit count");

        let mut value: u32 = 0;
        let rem = count % 8;
        for i in 0..rem {
            value |= (self.read_bit()? as u32) << i;
        }
        for i in 0..count / 8 {
            let (symbol, width) = {
                let bits = (self.cursor..self.len).map(|idx| self.get(idx));
                HUFFMAN.decode(bits).ok_or(Error::Underflow)?
            };
            self.cursor += width;
            value |= (symbol as u32) << (rem + 8 * i);
        }
        Ok(value)
    }

    /// [`Self::read_bits`], reinterpreting the `count`-bit value as
    /// two's-complement.
    pub fn read_bits_signed(&mut self, count: usize) -> Result<i32> {
        let value = self.read_bits(count)?;
        if count < 32 && value >> (count - 1) & 1 == 1 {
            Ok((value | !0u32 << count) as i32)
        } else {
            Ok(value as i32)
        }
    }

    #[inline]
    pub fn read_boolean(&mut self) -> Result<bool> {
        self.read_bits(1).map(|v| v == 1)
    }

    #[inline]
    pub fn read_byte(&mut self) -> Result<u32> {
        self.read_bits(8)
    }

    #[inline]
    pub fn read_short(&mut self) -> Result<u32> {
        self.read_bits(16)
    }

    #[inline]
    pub fn read_long(&mut self) -> Result<u32> {
        self.read_bits(32)
    }

    /// one flag bit; set means a full ieee-754 binary32, clear means a
    /// quantized small-range value (13 bits biased by 4096).
    pub fn read_float(&mut self) -> Result<f32> {
        if self.read_boolean()? {
            Ok(f32::from_bits(self.read_long()?))
        } else {
            Ok(self.read_bits(FLOAT_BITS)? as f32 - FLOAT_BIAS)
        }
    }

    /// reads bytes until a terminator (any byte outside `1..=255`, i.e. zero).
    /// `%` and bytes above 127 (but below `max_chars - 1`) render as `.`;
    /// `1..=127` map to their ascii characters.
    pub fn read_string(&mut self, max_chars: usize) -> Result<String> {
        let mut out = String::new();
        loop {
            let value = self.read_byte()?;
            if value == b'%' as u32 || (value > 127 && (value as usize) < max_chars - 1) {
                out.push('.');
            } else if value > 0 && value <= 127 {
                out.push(value as u8 as char);
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// replaces the already-consumed region `[offset, cursor)` with the code
    /// for `value`. the new code's length need not match the old region's; the
    /// tail is shifted accordingly and the cursor lands right after the new
    /// code. callers must only ever rewrite the region they just read --
    /// nothing may have been read past the cursor since.
    pub fn write_bits(&mut self, value: u32, count: usize, offset: usize) -> Result<()> {
        debug_assert!(count >= 1 && count <= 32, "invalid bit count");
        if offset > self.cursor {
            return Err(Error::OutOfBounds {
                offset,
                len: self.cursor,
            });
        }

        let mut code: Vec<bool> = Vec::with_capacity(count + 32);
        let rem = count % 8;
        for i in 0..rem {
            code.push(value >> i & 1 == 1);
        }
        for i in 0..count / 8 {
            let symbol = (value >> (rem + 8 * i)) as u8;
            HUFFMAN.encode_into(symbol, &mut code);
        }

        self.splice(offset, self.cursor, &code);
        self.cursor = offset + code.len();
        Ok(())
    }

    fn splice(&mut self, start: usize, end: usize, bits: &[bool]) {
        debug_assert!(start <= end && end <= self.len);

        let old_len = end - start;
        let new_len = bits.len();
        let tail = self.len - end;

        if new_len > old_len {
            for _ in 0..new_len - old_len {
                self.push(false);
            }
            for i in (0..tail).rev() {
                let bit = self.get(end + i);
                self.set(start + new_len + i, bit);
            }
        } else if new_len < old_len {
            for i in 0..tail {
                let bit = self.get(end + i);
                self.set(start + new_len + i, bit);
            }
            self.len -= old_len - new_len;
            self.data.truncate((self.len + 7) >> 3);
        }

        for (i, bit) in bits.iter().enumerate() {
            self.set(start + i, *bit);
        }
    }
}

impl Default for BitBuf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn test_read_write_roundtrip() -> Result<()> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for width in 1..=32usize {
            let max = if width == 32 {
                u32::MAX
            } else {
                (1u32 << width) - 1
            };
            let mut values = vec![0u32, 1, max, max >> 1];
            for _ in 0..16 {
                values.push(rng.gen_range(0..=max));
            }

            for value in values {
                let mut buf = BitBuf::new();
                buf.write_bits(value, width, 0)?;
                buf.seek(0)?;
                assert_eq!(buf.read_bits(width)?, value, "width {width}");
            }
        }

        Ok(())
    }

    #[test]
    fn test_read_bits_signed() -> Result<()> {
        let mut buf = BitBuf::new();
        buf.write_bits(-1i32 as u32 & 0xff, 8, 0)?;
        buf.seek(0)?;
        assert_eq!(buf.read_bits_signed(8)?, -1);

        let mut buf = BitBuf::new();
        buf.write_bits(-4096i32 as u32 & 0xffff, 16, 0)?;
        buf.seek(0)?;
        assert_eq!(buf.read_bits_signed(16)?, -4096);

        let mut buf = BitBuf::new();
        buf.write_bits(-1i32 as u32, 32, 0)?;
        buf.seek(0)?;
        assert_eq!(buf.read_bits_signed(32)?, -1);

        Ok(())
    }

    #[test]
    fn test_sequential_reads_stay_aligned() -> Result<()> {
        let mut buf = BitBuf::new();
        buf.write_bits(1, 1, buf.cursor())?;
        buf.write_bits(200, 8, buf.cursor())?;
        buf.write_bits(1000, 10, buf.cursor())?;
        buf.write_bits(123456, 32, buf.cursor())?;

        buf.seek(0)?;
        assert_eq!(buf.read_bits(1)?, 1);
        assert_eq!(buf.read_bits(8)?, 200);
        assert_eq!(buf.read_bits(10)?, 1000);
        assert_eq!(buf.read_bits(32)?, 123456);
        assert_eq!(buf.num_bits_left(), 0);

        Ok(())
    }

    #[test]
    fn test_rewrite_in_place_shifts_tail() -> Result<()> {
        // write two values, rewrite the first with one whose code length
        // differs, and verify the second still reads back intact
        let mut buf = BitBuf::new();
        buf.write_bits(16, 8, buf.cursor())?;
        buf.write_bits(999, 10, buf.cursor())?;

        buf.seek(0)?;
        let offset = buf.cursor();
        assert_eq!(buf.read_bits(8)?, 16);
        buf.write_bits(14, 8, offset)?;

        assert_eq!(buf.read_bits(10)?, 999);

        buf.seek(0)?;
        assert_eq!(buf.read_bits(8)?, 14);
        assert_eq!(buf.read_bits(10)?, 999);

        Ok(())
    }

    #[test]
    fn test_read_float() -> Result<()> {
        let mut buf = BitBuf::new();
        buf.write_bits(1, 1, buf.cursor())?;
        buf.write_bits(1.5f32.to_bits(), 32, buf.cursor())?;
        buf.seek(0)?;
        assert_eq!(buf.read_float()?, 1.5);

        let mut buf = BitBuf::new();
        buf.write_bits(0, 1, buf.cursor())?;
        buf.write_bits(4096 + 100, 13, buf.cursor())?;
        buf.seek(0)?;
        assert_eq!(buf.read_float()?, 100.0);

        Ok(())
    }

    #[test]
    fn test_read_string() -> Result<()> {
        let mut buf = BitBuf::new();
        for &b in b"map\x25q3dm6\x80" {
            buf.write_bits(b as u32, 8, buf.cursor())?;
        }
        buf.write_bits(0, 8, buf.cursor())?;
        buf.write_bits(77, 8, buf.cursor())?;

        buf.seek(0)?;
        assert_eq!(buf.read_string(DEFAULT_STRING_CHARS)?, "map.q3dm6.");
        // the terminator was consumed; the next byte is still readable
        assert_eq!(buf.read_byte()?, 77);

        Ok(())
    }

    #[test]
    fn test_fill_pads_to_byte_boundary() -> Result<()> {
        let mut buf = BitBuf::new();
        buf.write_bits(5, 3, 0)?;
        assert_eq!(buf.len_bits(), 3);

        buf.fill();
        assert_eq!(buf.len_bits(), 8);
        assert_eq!(buf.to_bytes(), vec![0b0000_0101]);

        Ok(())
    }

    #[test]
    fn test_underflow() {
        let mut buf = BitBuf::new();
        assert!(matches!(buf.read_bits(1), Err(Error::Underflow)));

        // raw remainder bits exist but the huffman symbol after them does not
        let mut buf = BitBuf::new();
        buf.push(true);
        buf.push(false);
        buf.seek(0).unwrap();
        assert!(matches!(buf.read_bits(10), Err(Error::Underflow)));
    }
}
