//! The extended forward LZ format with magic byte `0x11`
//!
//! Same stream shape as the `0x10` format, but a set flag bit starts
//! one of three back-reference encodings selected by the top nibble of
//! the first byte (the indicator):
//!
//! - indicator `> 1`, two bytes: `length = indicator + 1`,
//!   so lengths 3 to 0x10.
//! - indicator `0`, three bytes: an 8-bit length field biased by
//!   0x11, lengths 0x11 to 0x110.
//! - indicator `1`, four bytes: a 16-bit length field biased by
//!   0x111, lengths 0x111 to 0x10110.
//!
//! Displacements are 12 bits plus one in every form.

use log::{debug, warn};
use ntr_core::bytestream::{ByteReader, ByteWriter};
use ntr_core::errors::{DecodeErrorStatus, DecodeErrors, EncodeErrors};
use ntr_core::options::CodecOptions;

use crate::constants::{
    LITERAL_BITS, LONG_MATCH_BITS, LZ11_MAGIC, LZ11_MAX_MATCH, LZ11_MEDIUM_MATCH_MAX,
    LZ11_SHORT_MATCH_MAX, LZ_MIN_MATCH, LZ_WINDOW_SIZE, MAX_ENCODE_LENGTH, MEDIUM_MATCH_BITS,
    SHORT_MATCH_BITS
};
use crate::header::{check_trailing, read_header, write_header};
use crate::lz10::BlockWriter;
use crate::matcher::{longest_match, optimal_parse, MatchCost, ParseStep};

/// Return true if `data` plausibly starts a stream of this format.
pub fn probe_lz11(data: &[u8]) -> bool
{
    data.len() >= 4 && data[0] == LZ11_MAGIC
}

/// Decoder for the `0x11` format.
pub struct Lz11Decoder<'a>
{
    stream:  ByteReader<'a>,
    options: CodecOptions
}

impl<'a> Lz11Decoder<'a>
{
    /// Create a new decoder with the default options.
    pub fn new(data: &'a [u8]) -> Lz11Decoder<'a>
    {
        Lz11Decoder::new_with_options(CodecOptions::default(), data)
    }
    /// Create a new decoder that obeys the specified restrictions.
    pub fn new_with_options(options: CodecOptions, data: &'a [u8]) -> Lz11Decoder<'a>
    {
        Lz11Decoder {
            stream: ByteReader::new(data),
            options
        }
    }
    /// Decompress the stream, returning the decoded bytes.
    pub fn decode(&mut self) -> Result<Vec<u8>, DecodeErrors>
    {
        let size = read_header(&mut self.stream, LZ11_MAGIC, &self.options)?;

        debug!("LZ11: expecting {size} decompressed bytes");

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
                    continue;
                }

                let block_offset = self.stream.position();
                let b1 = match self.stream.get_u8_err()
                {
                    Ok(byte) => usize::from(byte),
                    Err(_) =>
                    {
                        return Err(DecodeErrors::new(
                            DecodeErrorStatus::NotEnoughData(out.len(), size),
                            out
                        ))
                    }
                };
                let indicator = b1 >> 4;

                // bytes still needed for the indicated form
                let extra = match indicator
                {
                    0 => 2,
                    1 => 3,
                    _ => 1
                };
                if !self.stream.has(extra)
                {
                    return Err(DecodeErrors::new(
                        DecodeErrorStatus::NotEnoughData(out.len(), size),
                        out
                    ));
                }

                let (length, disp) = match indicator
                {
                    0 =>
                    {
                        let b2 = usize::from(self.stream.get_u8());
                        let b3 = usize::from(self.stream.get_u8());

                        (
                            (((b1 & 0xF) << 4) | (b2 >> 4)) + 0x11,
                            (((b2 & 0xF) << 8) | b3) + 1
                        )
                    }
                    1 =>
                    {
                        let b2 = usize::from(self.stream.get_u8());
                        let b3 = usize::from(self.stream.get_u8());
                        let b4 = usize::from(self.stream.get_u8());

                        (
                            (((b1 & 0xF) << 12) | (b2 << 4) | (b3 >> 4)) + 0x111,
                            (((b3 & 0xF) << 8) | b4) + 1
                        )
                    }
                    _ =>
                    {
                        let b2 = usize::from(self.stream.get_u8());

                        (indicator + 1, (((b1 & 0xF) << 8) | b2) + 1)
                    }
                };

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

        if let Some(status) = check_trailing(&self.stream, out.len())
        {
            warn!("LZ11: {status:?}");
            return Err(DecodeErrors::new(status, out));
        }

        Ok(out)
    }
}

/// Encoder for the `0x11` format.
pub struct Lz11Encoder<'a>
{
    data:    &'a [u8],
    options: CodecOptions
}

impl<'a> Lz11Encoder<'a>
{
    /// Create a new encoder with the default options.
    pub fn new(data: &'a [u8]) -> Lz11Encoder<'a>
    {
        Lz11Encoder::new_with_options(CodecOptions::default(), data)
    }
    /// Create a new encoder with the given options.
    pub const fn new_with_options(options: CodecOptions, data: &'a [u8]) -> Lz11Encoder<'a>
    {
        Lz11Encoder { data, options }
    }
    /// Size of the largest stream `length` input bytes can produce.
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

        write_header(&mut stream, LZ11_MAGIC, self.data.len());

        let mut blocks = BlockWriter::new();
        let mut pos = 0;

        if self.options.get_lookahead()
        {
            let tiers = [
                MatchCost {
                    max_len: LZ11_SHORT_MATCH_MAX,
                    bits:    SHORT_MATCH_BITS
                },
                MatchCost {
                    max_len: LZ11_MEDIUM_MATCH_MAX,
                    bits:    MEDIUM_MATCH_BITS
                },
                MatchCost {
                    max_len: LZ11_MAX_MATCH,
                    bits:    LONG_MATCH_BITS
                }
            ];
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
                    longest_match(self.data, pos, 1, LZ_WINDOW_SIZE, LZ11_MAX_MATCH);

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
            "LZ11: compressed {} bytes into {written}",
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
        return;
    }

    let disp = step.disp - 1;

    if step.length > LZ11_MEDIUM_MATCH_MAX
    {
        let length = step.length - 0x111;

        blocks.push_match(
            stream,
            &[
                (0x10 | (length >> 12)) as u8,
                (length >> 4) as u8,
                ((length << 4) | (disp >> 8)) as u8,
                disp as u8
            ]
        );
    }
    else if step.length > LZ11_SHORT_MATCH_MAX
    {
        let length = step.length - 0x11;

        blocks.push_match(
            stream,
            &[
                (length >> 4) as u8,
                ((length << 4) | (disp >> 8)) as u8,
                disp as u8
            ]
        );
    }
    else
    {
        let length = step.length - 1;

        blocks.push_match(
            stream,
            &[((length << 4) | (disp >> 8)) as u8, disp as u8]
        );
    }
}

#[cfg(test)]
mod tests
{
    use ntr_core::options::CodecOptions;

    use super::{Lz11Decoder, Lz11Encoder};

    #[test]
    fn two_byte_form_decodes()
    {
        // literal 'A' then a 15-byte match at displacement 1
        let data = [0x11, 0x10, 0x00, 0x00, 0x40, 0x41, 0xE0, 0x00];
        let out = Lz11Decoder::new(&data).decode().unwrap();
        assert_eq!(out, [0x41; 16]);
    }

    #[test]
    fn three_byte_form_decodes()
    {
        // literal 'A' then a 0x20-byte match at displacement 1
        let data = [0x11, 0x21, 0x00, 0x00, 0x40, 0x41, 0x00, 0xF0, 0x00];
        let out = Lz11Decoder::new(&data).decode().unwrap();
        assert_eq!(out, [0x41; 0x21]);
    }

    #[test]
    fn long_runs_round_trip_through_every_form()
    {
        // long enough to force the four-byte form on a run
        let data = vec![0x55_u8; 0x400];
        let packed = Lz11Encoder::new(&data).encode().unwrap();
        let out = Lz11Decoder::new(&packed).decode().unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn mixed_data_round_trips()
    {
        let mut data = Vec::new();
        for i in 0..512_u32
        {
            data.extend_from_slice(&i.to_le_bytes());
            data.extend_from_slice(b"padding");
        }
        let packed = Lz11Encoder::new(&data).encode().unwrap();
        let out = Lz11Decoder::new(&packed).decode().unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn lookahead_never_loses()
    {
        let data = b"aaaabaaabaaabaaaaaabbbbaaaabbbb".repeat(8);
        let greedy = Lz11Encoder::new(&data).encode().unwrap();
        let optimal =
            Lz11Encoder::new_with_options(CodecOptions::default().set_lookahead(true), &data)
                .encode()
                .unwrap();
        assert!(optimal.len() <= greedy.len());
    }
}
