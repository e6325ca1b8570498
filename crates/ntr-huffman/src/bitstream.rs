//! Bit access over the 32-bit word stream
//!
//! The compressed payload is a sequence of little-endian 32-bit
//! words; inside each word bit 31 is traversed first. The reader
//! refuses to start a word it cannot fully load, the writer zero-pads
//! and flushes a trailing partial word.

use ntr_core::bytestream::ByteWriter;

/// Bit reader over the word stream.
pub struct BitReader32<'a>
{
    stream:    &'a [u8],
    position:  usize,
    word:      u32,
    bits_left: u8
}

impl<'a> BitReader32<'a>
{
    pub fn new(stream: &'a [u8]) -> BitReader32<'a>
    {
        BitReader32 {
            stream,
            position: 0,
            word: 0,
            bits_left: 0
        }
    }
    /// Pull the next bit, `None` once no full word is left to load.
    #[inline]
    pub fn next_bit(&mut self) -> Option<u8>
    {
        if self.bits_left == 0
        {
            let bytes = self.stream.get(self.position..self.position + 4)?;

            self.word = u32::from_le_bytes(bytes.try_into().unwrap());
            self.position += 4;
            self.bits_left = 32;
        }

        let bit = (self.word >> 31) as u8;
        self.word <<= 1;
        self.bits_left -= 1;

        Some(bit)
    }
    /// Bytes of the stream consumed so far, whole words only.
    pub const fn bytes_consumed(&self) -> usize
    {
        self.position
    }
}

/// Bit writer packing codes into the word stream.
pub struct BitWriter32
{
    word:   u32,
    filled: u8
}

impl BitWriter32
{
    pub const fn new() -> BitWriter32
    {
        BitWriter32 {
            word:   0,
            filled: 0
        }
    }
    /// Append the low `length` bits of `code`, most significant
    /// first.
    pub fn push(&mut self, stream: &mut ByteWriter, code: u64, length: u8)
    {
        for i in (0..length).rev()
        {
            let bit = ((code >> i) & 1) as u32;

            self.word |= bit << (31 - self.filled);
            self.filled += 1;

            if self.filled == 32
            {
                stream.write_u32_le(self.word);
                self.word = 0;
                self.filled = 0;
            }
        }
    }
    /// Write out a partially filled trailing word, if any.
    pub fn flush(&mut self, stream: &mut ByteWriter)
    {
        if self.filled > 0
        {
            stream.write_u32_le(self.word);
            self.word = 0;
            self.filled = 0;
        }
    }
}

#[cfg(test)]
mod tests
{
    use ntr_core::bytestream::ByteWriter;

    use super::{BitReader32, BitWriter32};

    #[test]
    fn bits_round_trip_msb_first()
    {
        let mut buf = [0_u8; 8];
        let mut stream = ByteWriter::new(&mut buf);
        let mut writer = BitWriter32::new();

        writer.push(&mut stream, 0b1011, 4);
        writer.push(&mut stream, 0b0, 1);
        writer.push(&mut stream, 0xFFFF_FFFF, 32);
        writer.flush(&mut stream);
        assert_eq!(stream.position(), 8);

        let mut reader = BitReader32::new(&buf);
        for expected in [1, 0, 1, 1, 0]
        {
            assert_eq!(reader.next_bit(), Some(expected));
        }
        for _ in 0..32
        {
            assert_eq!(reader.next_bit(), Some(1));
        }
        // 27 zero pad bits, then the stream ends
        for _ in 0..27
        {
            assert_eq!(reader.next_bit(), Some(0));
        }
        assert_eq!(reader.next_bit(), None);
    }

    #[test]
    fn partial_trailing_word_is_not_readable()
    {
        let data = [0xAA, 0xBB, 0xCC];
        let mut reader = BitReader32::new(&data);
        assert_eq!(reader.next_bit(), None);
    }
}
