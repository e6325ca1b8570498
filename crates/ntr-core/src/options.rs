//! Codec options
//!
//! This module exposes one options struct shared by all codecs so the
//! same configured value can be reused across a whole registry of
//! codecs. Not every option is respected by every codec; each option
//! documents who honors it.

/// Per-call codec configuration.
///
/// Options are plain values; the codecs copy them at construction, so
/// one configured instance can be handed to any number of codecs.
#[derive(Debug, Copy, Clone)]
pub struct CodecOptions
{
    /// Use the exhaustive parse when compressing instead of the
    /// greedy one.
    ///
    /// The exhaustive parse never produces larger output than the
    /// greedy one but costs more time.
    ///
    /// - Default value: false
    /// - Respected by: `lz10`, `lz11` encoders
    lookahead:       bool,
    /// Treat recoverable oddities in the input as hard errors.
    ///
    /// This rejects streams that rely on the overlay format's
    /// out-of-range displacement fallback instead of replaying it.
    ///
    /// - Default value: false
    /// - Respected by: `lzovl` decoder
    strict_mode:     bool,
    /// Upper bound on the decompressed size a decoder will allocate.
    ///
    /// Headers declare their output size up front, so a corrupt or
    /// hostile stream can ask for far more memory than its own
    /// length justifies. Decoders refuse anything above this.
    ///
    /// - Default value: 1 << 30
    /// - Respected by: all decoders
    max_output_size: usize
}

impl Default for CodecOptions
{
    fn default() -> Self
    {
        Self {
            lookahead:       false,
            strict_mode:     false,
            max_output_size: 1 << 30
        }
    }
}

impl CodecOptions
{
    /// Create options with the default values.
    pub fn new() -> CodecOptions
    {
        CodecOptions::default()
    }
    /// Return true if encoders should use the exhaustive parse.
    pub const fn get_lookahead(&self) -> bool
    {
        self.lookahead
    }
    /// Return true if recoverable input oddities become hard errors.
    pub const fn get_strict_mode(&self) -> bool
    {
        self.strict_mode
    }
    /// Get the configured decompressed-size ceiling.
    pub const fn get_max_output_size(&self) -> usize
    {
        self.max_output_size
    }
    /// Set whether encoders use the exhaustive parse.
    #[must_use]
    pub fn set_lookahead(mut self, yes: bool) -> Self
    {
        self.lookahead = yes;
        self
    }
    /// Set whether recoverable input oddities become hard errors.
    #[must_use]
    pub fn set_strict_mode(mut self, yes: bool) -> Self
    {
        self.strict_mode = yes;
        self
    }
    /// Set the decompressed-size ceiling.
    #[must_use]
    pub fn set_max_output_size(mut self, size: usize) -> Self
    {
        self.max_output_size = size;
        self
    }
}
