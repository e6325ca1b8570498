//! Composite codecs
//!
//! A composite wraps a list of member codecs and is itself a codec.
//! Decoding tries every member whose header check passes; encoding
//! runs every member able to compress and keeps the smallest stream,
//! remembering which member won so callers can log it.

use log::{debug, trace};
use ntr_core::errors::{DecodeErrorStatus, DecodeErrors, EncodeErrors};
use ntr_core::options::CodecOptions;

use crate::traits::CodecTrait;

/// A codec choosing between several member codecs.
pub struct CompositeCodec
{
    short_name:  &'static str,
    description: &'static str,
    flag:        &'static str,
    members:     Vec<Box<dyn CodecTrait>>,
    last_used:   Option<&'static str>
}

impl CompositeCodec
{
    /// Wrap the given members under a name.
    pub fn new(
        short_name: &'static str, description: &'static str, flag: &'static str,
        members: Vec<Box<dyn CodecTrait>>
    ) -> CompositeCodec
    {
        CompositeCodec {
            short_name,
            description,
            flag,
            members,
            last_used: None
        }
    }
}

#[cfg(feature = "huffman")]
impl CompositeCodec
{
    /// Both Huffman symbol widths.
    pub fn huffman_any() -> CompositeCodec
    {
        CompositeCodec::huffman_any_with_options(CodecOptions::default())
    }
    /// Both Huffman symbol widths, with options.
    pub fn huffman_any_with_options(options: CodecOptions) -> CompositeCodec
    {
        use crate::codecs::huffman::{Huffman4Codec, Huffman8Codec};

        CompositeCodec::new(
            "Huffman",
            "Huffman format over either symbol width",
            "huff",
            vec![
                Box::new(Huffman4Codec::new_with_options(options)),
                Box::new(Huffman8Codec::new_with_options(options)),
            ]
        )
    }
}

#[cfg(all(feature = "huffman", feature = "lz"))]
impl CompositeCodec
{
    /// The formats the GBA firmware decodes.
    pub fn gba() -> CompositeCodec
    {
        CompositeCodec::gba_with_options(CodecOptions::default())
    }
    /// The formats the GBA firmware decodes, with options.
    pub fn gba_with_options(options: CodecOptions) -> CompositeCodec
    {
        use crate::codecs::huffman::{Huffman4Codec, Huffman8Codec};
        use crate::codecs::lz10::Lz10Codec;

        CompositeCodec::new(
            "GBA",
            "Any format natively decoded by GBA hardware",
            "gba*",
            vec![
                Box::new(Huffman4Codec::new_with_options(options)),
                Box::new(Huffman8Codec::new_with_options(options)),
                Box::new(Lz10Codec::new_with_options(options)),
            ]
        )
    }
    /// The formats the NDS firmware decodes.
    pub fn nds() -> CompositeCodec
    {
        CompositeCodec::nds_with_options(CodecOptions::default())
    }
    /// The formats the NDS firmware decodes, with options.
    pub fn nds_with_options(options: CodecOptions) -> CompositeCodec
    {
        use crate::codecs::huffman::{Huffman4Codec, Huffman8Codec};
        use crate::codecs::lz10::Lz10Codec;
        use crate::codecs::lz11::Lz11Codec;

        CompositeCodec::new(
            "NDS",
            "Any format natively decoded by NDS hardware",
            "nds*",
            vec![
                Box::new(Huffman4Codec::new_with_options(options)),
                Box::new(Huffman8Codec::new_with_options(options)),
                Box::new(Lz10Codec::new_with_options(options)),
                Box::new(Lz11Codec::new_with_options(options)),
            ]
        )
    }
}

impl CodecTrait for CompositeCodec
{
    fn short_name(&self) -> &'static str
    {
        self.short_name
    }
    fn description(&self) -> &'static str
    {
        self.description
    }
    fn flag(&self) -> &'static str
    {
        self.flag
    }
    fn supports_decompress(&self) -> bool
    {
        self.members.iter().any(|m| m.supports_decompress())
    }
    fn supports_compress(&self) -> bool
    {
        self.members.iter().any(|m| m.supports_compress())
    }
    fn supports(&self, data: &[u8]) -> bool
    {
        self.members.iter().any(|m| m.supports(data))
    }
    /// Decode with the first member whose header check passes and
    /// whose decode succeeds.
    ///
    /// A member finishing with unread trailing input still decoded a
    /// valid stream: that outcome is final and propagates as the same
    /// recoverable error instead of handing the data to the next
    /// member.
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>, DecodeErrors>
    {
        self.last_used = None;

        for member in &mut self.members
        {
            if !member.supports_decompress() || !member.supports(data)
            {
                continue;
            }

            let name = member.short_name();

            match member.decompress(data)
            {
                Ok(decoded) =>
                {
                    debug!("composite decode used {name}");
                    self.last_used = Some(name);
                    return Ok(decoded);
                }
                Err(error) if error.is_recoverable() =>
                {
                    debug!("composite decode used {name} (trailing input left)");
                    self.last_used = Some(name);
                    return Err(error);
                }
                Err(error) =>
                {
                    trace!("composite member {name} failed: {error:?}");
                }
            }
        }

        Err(DecodeErrors::new_with_error(DecodeErrorStatus::InvalidData(
            None,
            format!("no {} member codec could decode the stream", self.short_name)
        )))
    }
    /// Encode with every member able to compress, keeping the
    /// smallest stream.
    fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeErrors>
    {
        self.last_used = None;

        let mut best: Option<Vec<u8>> = None;
        let mut last_error = None;

        for member in &mut self.members
        {
            if !member.supports_compress()
            {
                continue;
            }

            let name = member.short_name();

            match member.compress(data)
            {
                Ok(encoded) =>
                {
                    trace!("composite member {name} produced {} bytes", encoded.len());

                    if best.as_ref().map_or(true, |b| encoded.len() < b.len())
                    {
                        best = Some(encoded);
                        self.last_used = Some(name);
                    }
                }
                Err(error) =>
                {
                    trace!("composite member {name} failed to encode: {error:?}");
                    last_error = Some(error);
                }
            }
        }

        match best
        {
            Some(encoded) =>
            {
                debug!(
                    "composite encode kept {} at {} bytes",
                    self.last_used.unwrap_or("?"),
                    encoded.len()
                );
                Ok(encoded)
            }
            None => Err(last_error
                .unwrap_or(EncodeErrors::Unsupported("no member codec can compress")))
        }
    }
    /// Offer leading options to every member in rounds; a round
    /// advances by the largest count any member claimed and parsing
    /// stops once a whole round claims nothing.
    fn parse_options(&mut self, args: &[&str]) -> usize
    {
        let mut consumed = 0;

        while consumed < args.len()
        {
            let mut round = 0;

            for member in &mut self.members
            {
                round = round.max(member.parse_options(&args[consumed..]));
            }
            if round == 0
            {
                break;
            }
            consumed += round;
        }

        consumed
    }
    fn last_used(&self) -> Option<&'static str>
    {
        self.last_used
    }
}
