//! The end-of-file LZ variant used by overlay binaries
//!
//! Overlays and the main program binary are stored back to front: the
//! header is a trailer at the end of the file and both the compressed
//! data and the output are traversed from high addresses to low. The
//! region before the compressed part is stored verbatim.
//!
//! Trailer, reading backwards from the end:
//!
//! - last 4 bytes: `extra_size` (u32). Zero means the whole file is
//!   stored verbatim.
//! - 1 byte: `header_size`, the total trailer length.
//! - 3 bytes: `compressed_length` (u24).
//! - `header_size - 8` bytes of `0xFF` padding.
//!
//! Inside the compressed region flag bytes are consumed LSB first. A
//! set bit is a two-byte back-reference `[B1 B2]` with
//! `length = (B1 >> 4) + 3` and
//! `displacement = (((B1 & 0xF) << 8) | B2) + 3`, copying from the
//! already-written higher addresses.
//!
//! There is no encoder: producing this format needs the whole input
//! resident and the shipped games only ever read it, so this module
//! only decodes.

use log::{debug, warn};
use ntr_core::errors::{DecodeErrorStatus, DecodeErrors};
use ntr_core::options::CodecOptions;

/// Minimum trailer size: the u32 extra size, the header-size byte and
/// the u24 compressed length.
const TRAILER_MIN: usize = 8;

/// Parsed trailer fields.
struct Trailer
{
    extra_size:        usize,
    header_size:       usize,
    compressed_length: usize
}

fn read_trailer(data: &[u8]) -> Result<Option<Trailer>, DecodeErrorStatus>
{
    let len = data.len();

    if len < TRAILER_MIN
    {
        return Err(DecodeErrorStatus::StreamTooShort);
    }

    let extra_size = u32::from_le_bytes(data[len - 4..].try_into().unwrap()) as usize;

    if extra_size == 0
    {
        // whole file stored verbatim
        return Ok(None);
    }

    let header_size = usize::from(data[len - 5]);

    if header_size < TRAILER_MIN || header_size > len
    {
        return Err(DecodeErrorStatus::InvalidData(
            Some(len - 5),
            format!("impossible trailer size {header_size:#x} in a {len} byte stream")
        ));
    }

    let tail = &data[len - 8..len - 5];
    let compressed_length =
        usize::from(tail[0]) | (usize::from(tail[1]) << 8) | (usize::from(tail[2]) << 16);

    if compressed_length + header_size > len
    {
        return Err(DecodeErrorStatus::InvalidData(
            Some(len - 8),
            format!("compressed length {compressed_length:#x} does not fit the stream")
        ));
    }

    for (i, pad) in data[len - header_size..len - 8].iter().enumerate()
    {
        if *pad != 0xFF
        {
            return Err(DecodeErrorStatus::InvalidData(
                Some(len - header_size + i),
                format!("trailer padding byte is {pad:#04x}, expected 0xff")
            ));
        }
    }

    Ok(Some(Trailer {
        extra_size,
        header_size,
        compressed_length
    }))
}

/// Return true if `data` ends in a plausible trailer.
///
/// The format has no magic byte, so this validates the trailer fields
/// and padding instead. Used by registries as the probe of last
/// resort since short streams of other formats can look like a
/// trailer by accident.
pub fn probe_lzovl(data: &[u8]) -> bool
{
    read_trailer(data).is_ok()
}

/// Decoder for the end-of-file LZ format.
///
/// The whole output is assembled in memory before being returned:
/// peak memory is the decompressed size, which the trailer states up
/// front.
pub struct LzOvlDecoder<'a>
{
    data:    &'a [u8],
    options: CodecOptions
}

impl<'a> LzOvlDecoder<'a>
{
    /// Create a new decoder with the default options.
    pub fn new(data: &'a [u8]) -> LzOvlDecoder<'a>
    {
        LzOvlDecoder::new_with_options(CodecOptions::default(), data)
    }
    /// Create a new decoder that obeys the specified restrictions.
    ///
    /// With [`CodecOptions::set_strict_mode`] enabled, back-references
    /// past the written output are rejected instead of replaying the
    /// in-the-wild decoder's displacement substitution.
    ///
    /// [`CodecOptions::set_strict_mode`]: ntr_core::options::CodecOptions::set_strict_mode
    pub const fn new_with_options(options: CodecOptions, data: &'a [u8]) -> LzOvlDecoder<'a>
    {
        LzOvlDecoder { data, options }
    }
    /// Decompress the stream, returning the decoded bytes.
    ///
    /// Callers decoding a main program binary slice off its final 12
    /// bytes of unrelated metadata first; the trailer must be the end
    /// of the passed buffer.
    pub fn decode(&mut self) -> Result<Vec<u8>, DecodeErrors>
    {
        let data = self.data;

        let trailer = match read_trailer(data)
        {
            Ok(Some(trailer)) => trailer,
            Ok(None) =>
            {
                debug!("LZ-Ovl: stream stored verbatim");
                return Ok(data[..data.len() - 4].to_vec());
            }
            Err(status) => return Err(DecodeErrors::new_with_error(status))
        };

        let prefix_len = data.len() - trailer.header_size - trailer.compressed_length;
        let region_out_len = trailer.compressed_length + trailer.extra_size;
        let total = prefix_len + region_out_len;

        if total > self.options.get_max_output_size()
        {
            return Err(DecodeErrors::new_with_error(
                DecodeErrorStatus::OutputLimitExceeded(self.options.get_max_output_size(), total)
            ));
        }

        debug!(
            "LZ-Ovl: {prefix_len} verbatim bytes, {} compressed into {region_out_len}",
            trailer.compressed_length
        );

        let region = &data[prefix_len..prefix_len + trailer.compressed_length];
        let mut out = vec![0_u8; region_out_len];

        // both cursors walk down; `read_pos` through the compressed
        // region, `out_pos` through the output
        let mut read_pos = region.len();
        let mut out_pos = out.len();

        while out_pos > 0
        {
            if read_pos == 0
            {
                return Err(self.backwards_error(
                    DecodeErrorStatus::NotEnoughData(out.len() - out_pos, out.len()),
                    prefix_len,
                    &out,
                    out_pos
                ));
            }
            read_pos -= 1;
            let flags = region[read_pos];

            for bit in 0..8
            {
                if out_pos == 0
                {
                    break;
                }

                if flags & (1 << bit) == 0
                {
                    if read_pos == 0
                    {
                        return Err(self.backwards_error(
                            DecodeErrorStatus::NotEnoughData(out.len() - out_pos, out.len()),
                            prefix_len,
                            &out,
                            out_pos
                        ));
                    }
                    read_pos -= 1;
                    out_pos -= 1;
                    out[out_pos] = region[read_pos];
                    continue;
                }

                if read_pos < 2
                {
                    return Err(self.backwards_error(
                        DecodeErrorStatus::NotEnoughData(out.len() - out_pos, out.len()),
                        prefix_len,
                        &out,
                        out_pos
                    ));
                }
                read_pos -= 1;
                let b1 = usize::from(region[read_pos]);
                read_pos -= 1;
                let b2 = usize::from(region[read_pos]);

                let length = (b1 >> 4) + 3;
                let mut disp = (((b1 & 0xF) << 8) | b2) + 3;

                let written = out.len() - out_pos;

                if disp > written
                {
                    // shipped decoders substitute a displacement of 2
                    // here instead of failing; keep streams that rely
                    // on it decoding unless strictness was asked for
                    if self.options.get_strict_mode() || written < 2
                    {
                        return Err(self.backwards_error(
                            DecodeErrorStatus::InvalidData(
                                Some(prefix_len + read_pos),
                                format!(
                                    "backwards displacement {disp:#x} exceeds the {written} bytes written"
                                )
                            ),
                            prefix_len,
                            &out,
                            out_pos
                        ));
                    }
                    warn!(
                        "LZ-Ovl: displacement {disp:#x} exceeds {written} written bytes, substituting 2"
                    );
                    disp = 2;
                }

                for _ in 0..length
                {
                    if out_pos == 0
                    {
                        break;
                    }
                    out_pos -= 1;
                    out[out_pos] = out[out_pos + disp];
                }
            }
        }

        let mut result = Vec::with_capacity(prefix_len + out.len());
        result.extend_from_slice(&data[..prefix_len]);
        result.extend_from_slice(&out);

        if read_pos > 0
        {
            warn!("LZ-Ovl: {read_pos} compressed bytes left unread");
            return Err(DecodeErrors::new(
                DecodeErrorStatus::TooMuchInput(read_pos, result.len()),
                result
            ));
        }

        Ok(result)
    }

    /// Package a mid-decode failure; whatever was already written sits
    /// at the end of the output buffer.
    fn backwards_error(
        &self, status: DecodeErrorStatus, prefix_len: usize, out: &[u8], out_pos: usize
    ) -> DecodeErrors
    {
        let mut partial = Vec::with_capacity(prefix_len + (out.len() - out_pos));
        partial.extend_from_slice(&self.data[..prefix_len]);
        partial.extend_from_slice(&out[out_pos..]);
        DecodeErrors::new(status, partial)
    }
}
