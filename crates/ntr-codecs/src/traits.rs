//! The codec interface
//!
//! Every codec in the registry, composites included, sits behind one
//! object-safe trait. Codecs are cheap stateless handles; the only
//! state they carry is their configured [`CodecOptions`], so one
//! boxed codec can decode any number of streams.
//!
//! [`CodecOptions`]: ntr_core::options::CodecOptions

use ntr_core::errors::{DecodeErrors, EncodeErrors};

/// A compression format the registry can hand out.
pub trait CodecTrait
{
    /// Short identifier, e.g. `LZ10` or `Huffman-4`.
    fn short_name(&self) -> &'static str;

    /// One-line human description of the format.
    fn description(&self) -> &'static str;

    /// The tag a command line uses to pick this codec, e.g. `lz10`.
    fn flag(&self) -> &'static str;

    /// Whether [`decompress`](Self::decompress) is implemented.
    fn supports_decompress(&self) -> bool
    {
        true
    }
    /// Whether [`compress`](Self::compress) is implemented.
    fn supports_compress(&self) -> bool
    {
        true
    }

    /// Cheap header check: could `data` be a stream of this format?
    ///
    /// Inspects a few bytes only and never allocates; a `true` answer
    /// does not guarantee a successful decode.
    fn supports(&self, data: &[u8]) -> bool;

    /// Decompress `data`, returning the decoded bytes.
    ///
    /// On failure the error carries whatever was decoded up to that
    /// point; for the recoverable too-much-input status that buffer
    /// is the complete valid output.
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>, DecodeErrors>;

    /// Compress `data`, returning the encoded stream.
    fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeErrors>;

    /// Claim leading command-line options this codec understands,
    /// returning how many arguments were consumed.
    ///
    /// Unknown options must return zero so other codecs get to look
    /// at them.
    fn parse_options(&mut self, _args: &[&str]) -> usize
    {
        0
    }

    /// Which member codec a composite used last, if any.
    fn last_used(&self) -> Option<&'static str>
    {
        None
    }
}
