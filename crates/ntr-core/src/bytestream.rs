//! Byte-stream reader and writer
//!
//! Both structs wrap a borrowed slice and keep a position, similar to
//! [std::io::Cursor] but without generics and with accessors for the
//! little-endian integer widths these formats actually use (including
//! the 24-bit length fields).
//!
//! The reader offers two variants per accessor, an error variant for
//! cases where bytes must exist and a non-error variant returning zero
//! when the data has been proved to exist beforehand, e.g. via [`has`].
//!
//! [std::io::Cursor]: std::io::Cursor
//! [`has`]: ByteReader::has

static ERROR_MSG: &str = "No more bytes";

/// A byte-wise reader over a borrowed buffer.
pub struct ByteReader<'a>
{
    /// Data stream
    stream:   &'a [u8],
    position: usize
}

impl<'a> ByteReader<'a>
{
    /// Create a new instance of the byte stream
    pub const fn new(buf: &'a [u8]) -> ByteReader<'a>
    {
        ByteReader {
            stream:   buf,
            position: 0
        }
    }
    /// Skip `num` bytes ahead of the stream.
    pub fn skip(&mut self, num: usize)
    {
        self.position = self.position.wrapping_add(num);
    }
    /// Undo a buffer read by moving the position pointer `num`
    /// bytes behind.
    ///
    /// This operation will saturate at zero
    pub fn rewind(&mut self, num: usize)
    {
        self.position = self.position.saturating_sub(num);
    }
    /// Return whether the underlying buffer
    /// has `num` bytes available for reading
    #[inline]
    pub const fn has(&self, num: usize) -> bool
    {
        self.position + num <= self.stream.len()
    }
    /// Get length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize
    {
        self.stream.len()
    }
    /// Return true if the underlying buffer stream is empty
    #[inline]
    pub const fn is_empty(&self) -> bool
    {
        self.stream.len() == 0
    }
    /// Get current position of the buffer.
    #[inline]
    pub const fn position(&self) -> usize
    {
        self.position
    }
    /// Move the cursor to an absolute position.
    ///
    /// Positions past the end of the buffer make every subsequent
    /// read report end of stream.
    #[inline]
    pub fn set_position(&mut self, position: usize)
    {
        self.position = position;
    }
    /// Return true whether or not we read to the end of the
    /// buffer and have no more bytes left.
    #[inline]
    pub const fn eof(&self) -> bool
    {
        self.position >= self.len()
    }
    /// Get number of bytes unread inside this stream.
    #[inline]
    pub const fn remaining(&self) -> usize
    {
        self.stream.len().saturating_sub(self.position)
    }
    /// Get a part of the bytestream as a reference.
    ///
    /// This increments the position to point past the returned bytes
    /// if position+num is in bounds
    pub fn get_as_ref(&mut self, num: usize) -> Result<&'a [u8], &'static str>
    {
        match self.stream.get(self.position..self.position + num)
        {
            Some(bytes) =>
            {
                self.position += num;
                Ok(bytes)
            }
            None => Err(ERROR_MSG)
        }
    }
    /// Look ahead `position` bytes from the cursor and return a reference
    /// to `num_bytes` from that position, or an error if the
    /// peek would be out of bounds.
    ///
    /// This doesn't increment the position.
    #[inline]
    pub fn peek_at(&self, position: usize, num_bytes: usize) -> Result<&'a [u8], &'static str>
    {
        let start = self.position + position;
        let end = start + num_bytes;

        match self.stream.get(start..end)
        {
            Some(bytes) => Ok(bytes),
            None => Err(ERROR_MSG)
        }
    }
    /// Retrieve a byte from the underlying stream
    /// returning 0 if there are no more bytes available
    ///
    /// This means 0 might indicate a byte or an end of stream, which
    /// is fine for callers that bounds-checked beforehand with [`has`]
    ///
    /// For the erroring one, see [`get_u8_err`]
    ///
    /// [`has`]: Self::has
    /// [`get_u8_err`]: Self::get_u8_err
    #[inline(always)]
    pub fn get_u8(&mut self) -> u8
    {
        let byte = *self.stream.get(self.position).unwrap_or(&0);

        self.position += usize::from(self.position < self.len());
        byte
    }
    /// Retrieve a byte from the underlying stream
    /// returning an error if there are no more bytes available
    ///
    /// For the non erroring one, see [`get_u8`]
    ///
    /// [`get_u8`]: Self::get_u8
    #[inline(always)]
    pub fn get_u8_err(&mut self) -> Result<u8, &'static str>
    {
        match self.stream.get(self.position)
        {
            Some(byte) =>
            {
                self.position += 1;
                Ok(*byte)
            }
            None => Err(ERROR_MSG)
        }
    }
    /// Read a 24-bit little-endian integer, widened to u32.
    ///
    /// Returns 0 if the buffer cannot support a 3 byte read.
    #[inline]
    pub fn get_u24_le(&mut self) -> u32
    {
        match self.stream.get(self.position..self.position + 3)
        {
            Some(bytes) =>
            {
                self.position += 3;
                u32::from(bytes[0]) | (u32::from(bytes[1]) << 8) | (u32::from(bytes[2]) << 16)
            }
            None => 0
        }
    }
    /// Read a 24-bit little-endian integer, widened to u32,
    /// erroring out if the buffer cannot support a 3 byte read.
    #[inline]
    pub fn get_u24_le_err(&mut self) -> Result<u32, &'static str>
    {
        if self.has(3)
        {
            Ok(self.get_u24_le())
        }
        else
        {
            Err(ERROR_MSG)
        }
    }
}

macro_rules! get_single_type {
    ($name:tt,$name2:tt,$name3:tt,$name4:tt,$int_type:tt) => {
        impl<'a> ByteReader<'a>
        {
            #[inline(always)]
            fn $name(&mut self) -> $int_type
            {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let mut space = [0; SIZE_OF_VAL];

                match self.stream.get(self.position..self.position + SIZE_OF_VAL)
                {
                    Some(position) =>
                    {
                        space.copy_from_slice(position);
                        self.position += SIZE_OF_VAL;

                        $int_type::from_le_bytes(space)
                    }
                    None => 0,
                }
            }

            #[inline(always)]
            fn $name2(&mut self) -> Result<$int_type, &'static str>
            {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let mut space = [0; SIZE_OF_VAL];

                match self.stream.get(self.position..self.position + SIZE_OF_VAL)
                {
                    Some(position) =>
                    {
                        space.copy_from_slice(position);
                        self.position += SIZE_OF_VAL;

                        Ok($int_type::from_le_bytes(space))
                    }
                    None => Err(ERROR_MSG),
                }
            }
            #[doc=concat!("Read ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name3(&mut self) -> Result<$int_type, &'static str>
            {
                self.$name2()
            }
            #[doc=concat!("Read ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning 0 if the underlying buffer does not have enough bytes for a ",stringify!($int_type)," read.")]
            #[inline(always)]
            pub fn $name4(&mut self) -> $int_type
            {
                self.$name()
            }
        }
    };
}

// u16, u32 -> macros. u8 and u24 are unrolled above.
get_single_type!(
    get_u16_inner_or_default,
    get_u16_inner_or_die,
    get_u16_le_err,
    get_u16_le,
    u16
);
get_single_type!(
    get_u32_inner_or_default,
    get_u32_inner_or_die,
    get_u32_le_err,
    get_u32_le,
    u32
);

/// Encapsulates a simple byte writer over a caller-allocated buffer.
///
/// Encoders allocate a worst-case sized buffer up front, wrap it in a
/// writer and truncate to [`position`] when done.
///
/// [`position`]: ByteWriter::position
pub struct ByteWriter<'a>
{
    buffer:   &'a mut [u8],
    position: usize
}

impl<'a> ByteWriter<'a>
{
    /// Create a new writer writing into `buffer` from the start.
    pub fn new(buffer: &'a mut [u8]) -> ByteWriter<'a>
    {
        ByteWriter {
            buffer,
            position: 0
        }
    }
    /// Return whether the buffer can take `num` more bytes.
    #[inline]
    pub const fn has(&self, num: usize) -> bool
    {
        self.position + num <= self.buffer.len()
    }
    /// Number of bytes written so far.
    #[inline]
    pub const fn position(&self) -> usize
    {
        self.position
    }
    /// Move the cursor to an absolute position.
    ///
    /// Needed to patch bytes written earlier, e.g. flag bytes whose
    /// value is only known after the blocks they describe.
    #[inline]
    pub fn set_position(&mut self, position: usize)
    {
        self.position = position;
    }
    /// Write a single byte in the stream or don't write
    /// anything if the buffer is full and cannot support the write.
    ///
    /// Should be combined with [`has`](Self::has)
    #[inline(always)]
    pub fn write_u8(&mut self, byte: u8)
    {
        if let Some(slot) = self.buffer.get_mut(self.position)
        {
            *slot = byte;
            self.position += 1;
        }
    }
    /// Write a single byte, erroring out if there is no space.
    #[inline]
    pub fn write_u8_err(&mut self, byte: u8) -> Result<(), &'static str>
    {
        match self.buffer.get_mut(self.position)
        {
            Some(slot) =>
            {
                *slot = byte;
                self.position += 1;
                Ok(())
            }
            None => Err(ERROR_MSG)
        }
    }
    /// Write all bytes from `buf`, erroring out if the buffer
    /// cannot take them all.
    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), &'static str>
    {
        match self
            .buffer
            .get_mut(self.position..self.position + buf.len())
        {
            Some(space) =>
            {
                space.copy_from_slice(buf);
                self.position += buf.len();
                Ok(())
            }
            None => Err(ERROR_MSG)
        }
    }
    /// Write a 24-bit little-endian integer from the low three
    /// bytes of `value`.
    ///
    /// The top byte of `value` is ignored; callers range-check before
    /// choosing this width.
    #[inline]
    pub fn write_u24_le(&mut self, value: u32)
    {
        let bytes = value.to_le_bytes();
        let _ = self.write_all(&bytes[0..3]);
    }
}

macro_rules! write_single_type {
    ($name:tt,$name2:tt,$int_type:tt) => {
        impl<'a> ByteWriter<'a>
        {
            #[doc=concat!("Write ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Or don't write anything if the buffer cannot support a ",stringify!($int_type)," write.")]
            #[inline]
            pub fn $name(&mut self, value: $int_type)
            {
                let _ = self.write_all(&value.to_le_bytes());
            }
            #[doc=concat!("Write ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," write.")]
            #[inline]
            pub fn $name2(&mut self, value: $int_type) -> Result<(), &'static str>
            {
                self.write_all(&value.to_le_bytes())
            }
        }
    };
}

write_single_type!(write_u16_le, write_u16_le_err, u16);
write_single_type!(write_u32_le, write_u32_le_err, u32);
