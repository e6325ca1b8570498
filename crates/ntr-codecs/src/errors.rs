//! Registry-level errors
//!
//! The grandfather error of this crate: everything the registry and
//! the convenience entry points can report, wrapping the codec-level
//! decode and encode errors.

use std::fmt::{Debug, Display, Formatter};

use ntr_core::errors::{DecodeErrors, EncodeErrors};

use crate::codecs::CompressionFormat;

/// All errors possible when driving codecs through the registry.
pub enum CodecErrors
{
    /// A codec failed to decode; carries the codec error.
    DecodeErrors(DecodeErrors),
    /// A codec failed to encode; carries the codec error.
    EncodeErrors(EncodeErrors),
    /// No known format matches the stream.
    UnknownFormat,
    /// The format was recognized but its decoder is not present.
    NoDecoderForFormat(CompressionFormat),
    /// The format has no encoder or it is not present.
    NoEncoderForFormat(CompressionFormat),
    /// The feature carrying this codec was not compiled in.
    FeatureNotIncluded(CompressionFormat),
    /// No command-line flag names this codec.
    UnknownFlag(String),
    GenericStr(&'static str),
    Generic(String)
}

impl Debug for CodecErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::DecodeErrors(error) => writeln!(f, "{error:?}"),
            Self::EncodeErrors(error) => writeln!(f, "{error:?}"),
            Self::UnknownFormat => writeln!(f, "No known format matches the stream"),
            Self::NoDecoderForFormat(format) =>
            {
                writeln!(f, "No decoder present for format {format:?}")
            }
            Self::NoEncoderForFormat(format) =>
            {
                writeln!(f, "No encoder present for format {format:?}")
            }
            Self::FeatureNotIncluded(format) =>
            {
                writeln!(
                    f,
                    "The feature required to handle {format:?} has not been included"
                )
            }
            Self::UnknownFlag(flag) => writeln!(f, "No codec answers to the flag {flag:?}"),
            Self::GenericStr(reason) => writeln!(f, "{reason}"),
            Self::Generic(reason) => writeln!(f, "{reason}")
        }
    }
}

impl Display for CodecErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for CodecErrors {}

impl From<DecodeErrors> for CodecErrors
{
    fn from(error: DecodeErrors) -> Self
    {
        CodecErrors::DecodeErrors(error)
    }
}

impl From<EncodeErrors> for CodecErrors
{
    fn from(error: EncodeErrors) -> Self
    {
        CodecErrors::EncodeErrors(error)
    }
}
