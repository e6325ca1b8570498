//! Huffman decoder

use log::{debug, warn};
use ntr_core::errors::{DecodeErrorStatus, DecodeErrors};
use ntr_core::options::CodecOptions;

use crate::bitstream::BitReader32;
use crate::BlockSize;

/// Return true if `data` plausibly starts a Huffman stream of the
/// given symbol width.
pub fn probe_huffman(data: &[u8], block_size: BlockSize) -> bool
{
    data.len() >= 4 && data[0] == block_size.magic()
}

/// Decoder for the Huffman format.
pub struct HuffDecoder<'a>
{
    data:       &'a [u8],
    block_size: BlockSize,
    options:    CodecOptions
}

impl<'a> HuffDecoder<'a>
{
    /// Create a new decoder with the default options.
    pub fn new(data: &'a [u8], block_size: BlockSize) -> HuffDecoder<'a>
    {
        HuffDecoder::new_with_options(CodecOptions::default(), data, block_size)
    }
    /// Create a new decoder that obeys the specified restrictions.
    pub const fn new_with_options(
        options: CodecOptions, data: &'a [u8], block_size: BlockSize
    ) -> HuffDecoder<'a>
    {
        HuffDecoder {
            data,
            block_size,
            options
        }
    }
    /// Decompress the stream, returning the decoded bytes.
    pub fn decode(&mut self) -> Result<Vec<u8>, DecodeErrors>
    {
        let data = self.data;

        if data.len() < 5
        {
            return Err(DecodeErrors::new_with_error(
                DecodeErrorStatus::StreamTooShort
            ));
        }

        let magic = data[0];

        if magic != self.block_size.magic()
        {
            return Err(DecodeErrors::new_with_error(DecodeErrorStatus::InvalidData(
                Some(0),
                format!(
                    "expected magic {:#04x} but found {magic:#04x}",
                    self.block_size.magic()
                )
            )));
        }

        let mut size =
            usize::from(data[1]) | (usize::from(data[2]) << 8) | (usize::from(data[3]) << 16);
        let mut tree_offset = 4;

        if size == 0
        {
            if data.len() < 9
            {
                return Err(DecodeErrors::new_with_error(
                    DecodeErrorStatus::StreamTooShort
                ));
            }
            size = u32::from_le_bytes(data[4..8].try_into().unwrap()) as usize;
            tree_offset = 8;
        }

        if size > self.options.get_max_output_size()
        {
            return Err(DecodeErrors::new_with_error(
                DecodeErrorStatus::OutputLimitExceeded(self.options.get_max_output_size(), size)
            ));
        }

        // the size byte covers itself and the node bytes; the
        // bitstream starts right after
        let table_span = (usize::from(data[tree_offset]) + 1) * 2;
        let tree_end = tree_offset + table_span;
        let root = tree_offset + 1;

        if data.len() < tree_end
        {
            return Err(DecodeErrors::new_with_error(
                DecodeErrorStatus::NotEnoughData(0, size)
            ));
        }

        debug!(
            "Huffman: {table_span} byte tree table, expecting {size} decompressed bytes"
        );

        let mut reader = BitReader32::new(&data[tree_end..]);
        let mut out = Vec::with_capacity(size);

        // state for the 4-bit alphabet: a pending high nibble
        let mut cached_nibble: Option<u8> = None;

        let mut node = root;

        while out.len() < size
        {
            let bit = match reader.next_bit()
            {
                Some(bit) => bit,
                None =>
                {
                    return Err(DecodeErrors::new(
                        DecodeErrorStatus::NotEnoughData(out.len(), size),
                        out
                    ))
                }
            };

            let node_byte = data[node];
            let child = (node & !1) + 2 * usize::from(node_byte & 0x3F) + 2 + usize::from(bit);
            let is_leaf = (node_byte >> (7 - bit)) & 1 != 0;

            if child >= tree_end
            {
                return Err(DecodeErrors::new(
                    DecodeErrorStatus::InvalidData(
                        Some(node),
                        format!("tree offset walks past the table end {tree_end:#x}")
                    ),
                    out
                ));
            }

            if !is_leaf
            {
                node = child;
                continue;
            }

            let symbol = data[child];
            node = root;

            match self.block_size
            {
                BlockSize::Eight => out.push(symbol),
                BlockSize::Four =>
                {
                    if symbol > 0xF
                    {
                        return Err(DecodeErrors::new(
                            DecodeErrorStatus::InvalidData(
                                Some(child),
                                format!("4-bit symbol {symbol:#04x} has its high nibble set")
                            ),
                            out
                        ));
                    }
                    match cached_nibble.take()
                    {
                        None => cached_nibble = Some(symbol << 4),
                        Some(high) => out.push(high | symbol)
                    }
                }
            }
        }

        let consumed = tree_end + reader.bytes_consumed();
        let aligned_end = (consumed & !3) + 4;

        if data.len() > aligned_end
        {
            let status = DecodeErrorStatus::TooMuchInput(data.len() - consumed, out.len());
            warn!("Huffman: {status:?}");
            return Err(DecodeErrors::new(status, out));
        }

        Ok(out)
    }
}
