use std::io;
use thiserror::Error;

/// Failure to build a device model from an SVD document.
///
/// Only documents that cannot be read as XML at all end up here. Missing
/// optional elements, unrecognized field bit ranges and unparsable addresses
/// are recovered while building the model and never reported as errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("malformed SVD document: {0}")]
    Malformed(#[from] quick_xml::DeError),
    /// The document could not be read.
    #[error("failed to read SVD document: {0}")]
    Io(#[from] io::Error),
}

/// Category of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`ParseError::Malformed`].
    Malformed,
    /// See [`ParseError::Io`].
    Io,
}

impl ParseError {
    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed(_) => ErrorKind::Malformed,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Data-quality problems the model builder tolerates.
///
/// These never abort a parse; they are only reported through the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tolerance {
    /// An expected element is absent and its default applies.
    MissingOptional,
    /// A field carries none of the known bit-range encodings and is dropped.
    UnrecognizedFieldEncoding,
    /// A base address or offset is not hexadecimal and reads as zero.
    AddressParseFailure,
    /// A register size is unreadable or out of bounds and reads as 32 bits.
    SizeParseFailure,
}

impl Tolerance {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::MissingOptional => "missing-optional",
            Self::UnrecognizedFieldEncoding => "unrecognized-field-encoding",
            Self::AddressParseFailure => "address-parse-failure",
            Self::SizeParseFailure => "size-parse-failure",
        }
    }
}
