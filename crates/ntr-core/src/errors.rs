//! Shared error taxonomy for the ntr codecs
//!
//! Decode failures come wrapped in [`DecodeErrors`], which carries the
//! output produced up to the failure point. For the recoverable
//! [`TooMuchInput`] status that buffer is the complete, valid output;
//! callers that treat the condition as a warning take the data from
//! there.
//!
//! [`TooMuchInput`]: DecodeErrorStatus::TooMuchInput

use std::fmt::{Debug, Display, Formatter};

/// A struct returned when decompression fails
pub struct DecodeErrors
{
    /// reason why decompression failed
    pub error: DecodeErrorStatus,
    /// Data decoded up until the decompression error.
    ///
    /// For [`DecodeErrorStatus::TooMuchInput`] this is the complete
    /// output and is safe to use.
    pub data:  Vec<u8>
}

impl DecodeErrors
{
    /// Create a new decode error wrapper, `data` being
    /// what was decoded before hitting the error
    pub fn new(error: DecodeErrorStatus, data: Vec<u8>) -> DecodeErrors
    {
        DecodeErrors { error, data }
    }
    /// Create a new decode error wrapper with an empty output buffer
    pub fn new_with_error(error: DecodeErrorStatus) -> DecodeErrors
    {
        DecodeErrors::new(error, vec![])
    }
    /// Return true if the decoded data in this error is complete and
    /// valid, i.e. the error only flags leftover input.
    pub const fn is_recoverable(&self) -> bool
    {
        matches!(self.error, DecodeErrorStatus::TooMuchInput(_, _))
    }
}

impl Debug for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        writeln!(f, "{:?}", self.error)
    }
}

impl Display for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        writeln!(f, "{:?}", self.error)
    }
}

impl std::error::Error for DecodeErrors {}

/// Reasons a decode can fail
pub enum DecodeErrorStatus
{
    /// The input ended before the declared output length was
    /// produced. Carries `(written_so_far, expected_total)`.
    NotEnoughData(usize, usize),
    /// The input is too short to even contain the header or trailer
    /// the format requires.
    StreamTooShort,
    /// Decompression finished and the output is valid, but unread
    /// bytes remain beyond alignment padding.
    /// Carries `(unread_bytes, decoded_length)`.
    TooMuchInput(usize, usize),
    /// A format rule was violated. Carries the input offset where the
    /// violation was detected, if one is meaningful.
    InvalidData(Option<usize>, String),
    /// The declared output size exceeds the configured limit.
    /// Carries `(limit, requested)`.
    OutputLimitExceeded(usize, usize),
    /// Anything that isn't significant
    Generic(&'static str),
    GenericStr(String)
}

impl Debug for DecodeErrorStatus
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::NotEnoughData(written, expected) => writeln!(
                f,
                "Not enough input data, wrote {written} bytes of an expected {expected}"
            ),
            Self::StreamTooShort => writeln!(f, "Input stream too short"),
            Self::TooMuchInput(unread, decoded) => writeln!(
                f,
                "Too much input, {unread} bytes left unread after decoding {decoded} bytes"
            ),
            Self::InvalidData(offset, reason) => match offset
            {
                Some(position) => writeln!(f, "Invalid data at offset {position:#x}: {reason}"),
                None => writeln!(f, "Invalid data: {reason}")
            },
            Self::OutputLimitExceeded(limit, current) => writeln!(
                f,
                "Output limit exceeded, set limit was {limit} and output size is {current}"
            ),
            Self::Generic(reason) => writeln!(f, "{reason}"),
            Self::GenericStr(reason) => writeln!(f, "{reason}")
        }
    }
}

impl From<&'static str> for DecodeErrors
{
    fn from(reason: &'static str) -> Self
    {
        DecodeErrors::new_with_error(DecodeErrorStatus::Generic(reason))
    }
}

/// Reasons an encode can fail
pub enum EncodeErrors
{
    /// The input length cannot be represented in the header size
    /// field. Carries `(length, max_encodable)`.
    InputTooLarge(usize, usize),
    /// The codec has no encoder.
    Unsupported(&'static str),
    /// Anything that isn't significant
    Generic(&'static str),
    GenericStr(String)
}

impl Debug for EncodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::InputTooLarge(length, max) => writeln!(
                f,
                "Input of {length} bytes is too large, this format encodes at most {max} bytes"
            ),
            Self::Unsupported(name) => writeln!(f, "{name} does not support compression"),
            Self::Generic(reason) => writeln!(f, "{reason}"),
            Self::GenericStr(reason) => writeln!(f, "{reason}")
        }
    }
}

impl Display for EncodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for EncodeErrors {}

impl From<&'static str> for EncodeErrors
{
    fn from(reason: &'static str) -> Self
    {
        EncodeErrors::Generic(reason)
    }
}
