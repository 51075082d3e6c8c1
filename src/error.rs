//! X.509 errors

use crate::der::Tag;
use nom::error::{ErrorKind, ParseError};
use nom::IResult;

/// Holds the result of parsing functions working at the ASN.1 grammar level
///
/// The remaining input is always returned first, as with any `nom` parser.
pub type Asn1Result<'a, T> = IResult<&'a [u8], T, Asn1Error>;

/// Holds the result of parsing functions (X.509)
///
/// Note that this type is also a `Result`, so usual functions (`map`, `unwrap` etc.) are available.
pub type X509Result<'a, T> = IResult<&'a [u8], T, X509Error>;

/// A grammar-level error raised while walking the DER encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Asn1Error {
    #[error("ASN.1 out of data")]
    OutOfData,
    #[error("unexpected ASN.1 tag {found} (expected {expected:?})")]
    UnexpectedTag { expected: Option<Tag>, found: Tag },
    #[error("invalid ASN.1 length")]
    InvalidLength,
    #[error("ASN.1 length mismatch")]
    LengthMismatch,
}

impl Asn1Error {
    #[inline]
    pub(crate) const fn unexpected_tag(expected: Option<Tag>, found: Tag) -> Self {
        Asn1Error::UnexpectedTag { expected, found }
    }

    /// Returns true if the error only reports a tag that differs from the expected one
    #[inline]
    pub const fn is_unexpected_tag(&self) -> bool {
        matches!(self, Asn1Error::UnexpectedTag { .. })
    }
}

// The complete-input combinators used by this crate only fail when the input is exhausted.
impl<I> ParseError<I> for Asn1Error {
    fn from_error_kind(_input: I, _kind: ErrorKind) -> Self {
        Asn1Error::OutOfData
    }
    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

/// An error that can occur while parsing a certificate.
///
/// Each variant names the certificate field being decoded when the failure happened.
/// When the failure comes from the DER grammar, the grammar-level reason is kept as the
/// error [`source`](std::error::Error::source) and can be read with [`X509Error::cause`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum X509Error {
    #[error("invalid certificate version")]
    InvalidVersion(#[source] Option<Asn1Error>),
    #[error("invalid certificate serial number")]
    InvalidSerial(#[source] Option<Asn1Error>),
    #[error("invalid algorithm identifier")]
    InvalidAlgorithm(#[source] Option<Asn1Error>),
    #[error("invalid X.509 name")]
    InvalidName(#[source] Option<Asn1Error>),
    #[error("invalid date")]
    InvalidDate(#[source] Option<Asn1Error>),
    #[error("invalid certificate signature")]
    InvalidSignature(#[source] Option<Asn1Error>),
    #[error("unknown certificate version {0}")]
    UnknownVersion(u32),
    #[error("certificate signature algorithm mismatch")]
    SignatureAlgorithmMismatch,
    #[error("invalid certificate format")]
    InvalidFormat(#[source] Option<Asn1Error>),
}

impl X509Error {
    /// Return the grammar-level reason of this error, if any
    pub fn cause(&self) -> Option<Asn1Error> {
        match self {
            X509Error::InvalidVersion(e)
            | X509Error::InvalidSerial(e)
            | X509Error::InvalidAlgorithm(e)
            | X509Error::InvalidName(e)
            | X509Error::InvalidDate(e)
            | X509Error::InvalidSignature(e)
            | X509Error::InvalidFormat(e) => *e,
            X509Error::UnknownVersion(_) | X509Error::SignatureAlgorithmMismatch => None,
        }
    }
}

impl From<nom::Err<X509Error>> for X509Error {
    fn from(e: nom::Err<X509Error>) -> Self {
        match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
            // not produced by complete-input parsers
            nom::Err::Incomplete(_) => X509Error::InvalidFormat(Some(Asn1Error::OutOfData)),
        }
    }
}

/// Wrap a grammar-level parser error into the semantic error `kind` of the field being decoded.
///
/// Used as `.map_err(wrap(X509Error::InvalidName))`.
pub(crate) fn wrap(
    kind: fn(Option<Asn1Error>) -> X509Error,
) -> impl Fn(nom::Err<Asn1Error>) -> nom::Err<X509Error> {
    move |e| e.map(|e| kind(Some(e)))
}

/// Build a `nom` error holding the semantic error `kind`, caused by `cause`
#[inline]
pub(crate) fn fail<T>(
    kind: fn(Option<Asn1Error>) -> X509Error,
    cause: Asn1Error,
) -> Result<T, nom::Err<X509Error>> {
    Err(nom::Err::Error(kind(Some(cause))))
}

/// An error that can occur while converting a legacy-encoded string to UTF-8.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert {0} string to UTF-8")]
pub struct StringConversionError(pub(crate) &'static str);
