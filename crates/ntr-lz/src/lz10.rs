//! The forward LZ format with magic byte `0x10`
//!
//! The stream is a four-byte header followed by groups of one flag
//! byte and up to eight blocks, flag bits MSB first. A clear flag bit
//! means one literal byte; a set bit means a two-byte back-reference
//! `[B1 B2]` with `length = (B1 >> 4) + 3` and
//! `displacement = (((B1 & 0xF) << 8) | B2) + 1`.

use log::{debug, warn};
use ntr_core::bytestream::{ByteReader, ByteWriter};
use ntr_core::errors::{DecodeErrorStatus, DecodeErrors, EncodeErrors};
use ntr_core::options::CodecOptions;

use crate::constants::{
    LITERAL_BITS, LZ10_MAGIC, LZ10_MAX_MATCH, LZ_MIN_MATCH, LZ_WINDOW_SIZE, MAX_ENCODE_LENGTH,
    SHORT_MATCH_BITS
};
use crate::header::{check_trailing, read_header, write_header};
use crate::matcher::{longest_match, optimal_parse, MatchCost, ParseStep};

/// Return true if `data` plausibly starts a stream of this format.
///
/// Cheap header inspection only; a positive answer does not guarantee
/// a successful decode.
pub fn probe_lz10(data: &[u8]) -> bool
{
    data.len() >= 4 && data[0] == LZ10_MAGIC
}

/// Decoder for the `0x10` format.
pub struct Lz10Decoder<'a>
{
    stream:  ByteReader<'a>,
    options: CodecOptions
}

impl<'a> Lz10Decoder<'a>
{
    /// Create a new decoder with the default options.
    pub fn new(data: &'a [u8]) -> Lz10Decoder<'a>
    {
        Lz10Decoder::new_with_options(CodecOptions::default(), data)
    }
    /// Create a new decoder that obeys the specified restrictions.
    pub fn new_with_options(options: CodecOptions, data: &'a [u8]) -> Lz10Decoder<'a>
    {
        Lz10Decoder {
            stream: ByteReader::new(data),
            options
        }
    }
    /// Decompress the stream, returning the decoded bytes.
    pub fn decode(&mut self) -> Result<Vec<u8>, DecodeErrors>
    {
        let size = read_header(&mut self.stream, LZ10_MAGIC, &self.options)?;

        debug!("LZ10: expecting {size} decompressed bytes");

        let mut out = Vec::with_capacity(size);

        while out.len() < size
        {
            if self.stream.eof()
            {
                return Err(DecodeErrors::new(
                    DecodeErrorStatus::NotEnoughData(out.len(), size),
                    out
                ));
            }
            let flags = self.stream.get_u8();

            for i in 0..8
            {
                if out.len() >= size
                {
                    break;
                }

                if flags & (0x80 >> i) == 0
                {
                    match self.stream.get_u8_err()
                    {
                        Ok(byte) => out.push(byte),
                        Err(_) =>
                        {
                            return Err(DecodeErrors::new(
                                DecodeErrorStatus::NotEnoughData(out.len(), size),
                                out
                            ))
                        }
                    }
                }
                else
                {
                    if !self.stream.has(2)
                    {
                        return Err(DecodeErrors::new(
                            DecodeErrorStatus::NotEnoughData(out.len(), size),
                            out
                        ));
                    }
                    let block_offset = self.stream.position();
                    let b1 = usize::from(self.stream.get_u8());
                    let b2 = usize::from(self.stream.get_u8());

                    let length = (b1 >> 4) + 3;
                    let disp = (((b1 & 0xF) << 8) | b2) + 1;

                    if disp > out.len()
                    {
                        return Err(DecodeErrors::new(
                            DecodeErrorStatus::InvalidData(
                                Some(block_offset),
                                format!(
                                    "displacement {disp:#x} exceeds the {} bytes written",
                                    out.len()
                                )
                            ),
                            out
                        ));
                    }

                    for _ in 0..length
                    {
                        if out.len() >= size
                        {
                            break;
                        }
                        let byte = out[out.len() - disp];
                        out.push(byte);
                    }
                }
            }
        }

        if let Some(status) = check_trailing(&self.stream, out.len())
        {
            warn!("LZ10: {status:?}");
            return Err(DecodeErrors::new(status, out));
        }

        Ok(out)
    }
}

/// Encoder for the `0x10` format.
pub struct Lz10Encoder<'a>
{
    data:    &'a [u8],
    options: CodecOptions
}

impl<'a> Lz10Encoder<'a>
{
    /// Create a new encoder with the default options.
    pub fn new(data: &'a [u8]) -> Lz10Encoder<'a>
    {
        Lz10Encoder::new_with_options(CodecOptions::default(), data)
    }
    /// Create a new encoder with the given options.
    ///
    /// [`CodecOptions::set_lookahead`] switches the block selection
    /// from greedy longest-match to the exhaustive parse.
    ///
    /// [`CodecOptions::set_lookahead`]: ntr_core::options::CodecOptions::set_lookahead
    pub const fn new_with_options(options: CodecOptions, data: &'a [u8]) -> Lz10Encoder<'a>
    {
        Lz10Encoder { data, options }
    }
    /// Return the size of the largest stream `length` input bytes can
    /// produce: the header, every byte literal and a flag byte per
    /// eight blocks.
    pub const fn max_compressed_size(length: usize) -> usize
    {
        8 + length + (length + 7) / 8
    }

    /// Compress the input, returning the encoded stream.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeErrors>
    {
        if self.data.len() > MAX_ENCODE_LENGTH
        {
            return Err(EncodeErrors::InputTooLarge(
                self.data.len(),
                MAX_ENCODE_LENGTH
            ));
        }

        let mut buffer = vec![0_u8; Self::max_compressed_size(self.data.len())];
        let mut stream = ByteWriter::new(&mut buffer);

        write_header(&mut stream, LZ10_MAGIC, self.data.len());

        let mut blocks = BlockWriter::new();
        let mut pos = 0;

        if self.options.get_lookahead()
        {
            let tiers = [MatchCost {
                max_len: LZ10_MAX_MATCH,
                bits:    SHORT_MATCH_BITS
            }];
            let steps = optimal_parse(self.data, LZ_MIN_MATCH, 1, LZ_WINDOW_SIZE, &tiers, LITERAL_BITS);

            while pos < self.data.len()
            {
                let step = steps[pos];
                emit_step(&mut blocks, &mut stream, self.data, pos, step);
                pos += step.length;
            }
        }
        else
        {
            while pos < self.data.len()
            {
                let (length, disp) =
                    longest_match(self.data, pos, 1, LZ_WINDOW_SIZE, LZ10_MAX_MATCH);

                let step = if length >= LZ_MIN_MATCH
                {
                    ParseStep { length, disp }
                }
                else
                {
                    ParseStep::literal()
                };

                emit_step(&mut blocks, &mut stream, self.data, pos, step);
                pos += step.length;
            }
        }

        blocks.flush(&mut stream);

        let written = stream.position();
        debug!(
            "LZ10: compressed {} bytes into {written}",
            self.data.len()
        );
        buffer.truncate(written);

        Ok(buffer)
    }
}

fn emit_step(
    blocks: &mut BlockWriter, stream: &mut ByteWriter, data: &[u8], pos: usize, step: ParseStep
)
{
    if step.is_literal()
    {
        blocks.push_literal(stream, data[pos]);
    }
    else
    {
        let length = step.length - 3;
        let disp = step.disp - 1;

        blocks.push_match(
            stream,
            &[((length << 4) | (disp >> 8)) as u8, disp as u8]
        );
    }
}

/// Accumulates up to eight blocks plus their flag byte, emitting the
/// flag byte first once the group is full.
pub(crate) struct BlockWriter
{
    flags:   u8,
    count:   usize,
    bytes:   [u8; 32],
    written: usize
}

impl BlockWriter
{
    pub(crate) fn new() -> BlockWriter
    {
        BlockWriter {
            flags:   0,
            count:   0,
            bytes:   [0; 32],
            written: 0
        }
    }
    pub(crate) fn push_literal(&mut self, stream: &mut ByteWriter, byte: u8)
    {
        self.bytes[self.written] = byte;
        self.written += 1;
        self.count += 1;
        self.flush_if_full(stream);
    }
    pub(crate) fn push_match(&mut self, stream: &mut ByteWriter, bytes: &[u8])
    {
        self.flags |= 0x80 >> self.count;
        self.bytes[self.written..self.written + bytes.len()].copy_from_slice(bytes);
        self.written += bytes.len();
        self.count += 1;
        self.flush_if_full(stream);
    }
    pub(crate) fn flush(&mut self, stream: &mut ByteWriter)
    {
        if self.count > 0
        {
            stream.write_u8(self.flags);
            let _ = stream.write_all(&self.bytes[..self.written]);
            self.flags = 0;
            self.count = 0;
            self.written = 0;
        }
    }
    fn flush_if_full(&mut self, stream: &mut ByteWriter)
    {
        if self.count == 8
        {
            self.flush(stream);
        }
    }
}
