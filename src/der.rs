//! DER grammar atoms: tags, lengths, integers and raw values
//!
//! All functions take the remaining input as a slice and return what is left after the
//! parsed element, so a parser can never read past the end of the slice it was given.
//! Nested containers are parsed by first taking their content as a sub-slice.

use crate::error::{Asn1Error, Asn1Result};
use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::{Err, Parser};
use std::fmt;

/// An ASN.1 tag byte (class, constructed bit and tag number)
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct Tag(pub u8);

#[allow(non_upper_case_globals)]
impl Tag {
    pub const Integer: Tag = Tag(0x02);
    pub const BitString: Tag = Tag(0x03);
    pub const Null: Tag = Tag(0x05);
    pub const Oid: Tag = Tag(0x06);
    pub const Utf8String: Tag = Tag(0x0c);
    pub const PrintableString: Tag = Tag(0x13);
    pub const T61String: Tag = Tag(0x14);
    pub const Ia5String: Tag = Tag(0x16);
    pub const UtcTime: Tag = Tag(0x17);
    pub const GeneralizedTime: Tag = Tag(0x18);
    pub const UniversalString: Tag = Tag(0x1c);
    pub const BmpString: Tag = Tag(0x1e);
    pub const Sequence: Tag = Tag(CONSTRUCTED | 0x10);
    pub const Set: Tag = Tag(CONSTRUCTED | 0x11);

    /// Context-specific, constructed tag `[n]`
    #[inline]
    pub const fn context_constructed(n: u8) -> Tag {
        Tag(CONTEXT_SPECIFIC | CONSTRUCTED | n)
    }

    /// Context-specific, primitive tag `[n]`
    #[inline]
    pub const fn context_primitive(n: u8) -> Tag {
        Tag(CONTEXT_SPECIFIC | n)
    }
}

const CONSTRUCTED: u8 = 0x20;
const CONTEXT_SPECIFIC: u8 = 0x80;

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Tag::Integer => "INTEGER",
            Tag::BitString => "BIT STRING",
            Tag::Null => "NULL",
            Tag::Oid => "OBJECT IDENTIFIER",
            Tag::Utf8String => "UTF8String",
            Tag::PrintableString => "PrintableString",
            Tag::T61String => "T61String",
            Tag::Ia5String => "IA5String",
            Tag::UtcTime => "UTCTime",
            Tag::GeneralizedTime => "GeneralizedTime",
            Tag::UniversalString => "UniversalString",
            Tag::BmpString => "BMPString",
            Tag::Sequence => "SEQUENCE",
            Tag::Set => "SET",
            _ => return write!(f, "Tag({:#04x})", self.0),
        };
        f.write_str(name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// A tagged value: the tag and the content bytes of a TLV, borrowed from the input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggedValue<'a> {
    pub tag: Tag,
    pub data: &'a [u8],
}

impl<'a> TaggedValue<'a> {
    #[inline]
    pub const fn new(tag: Tag, data: &'a [u8]) -> Self {
        TaggedValue { tag, data }
    }

    #[inline]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}

#[inline]
fn read_byte(i: &[u8]) -> Asn1Result<'_, u8> {
    be_u8(i)
}

#[inline]
pub(crate) fn take_bytes(i: &[u8], len: usize) -> Asn1Result<'_, &[u8]> {
    take(len).parse(i)
}

/// Read a DER length.
///
/// Only the short form and the long form with 1 or 2 length octets are accepted (lengths up
/// to 65535). The length must not exceed the remaining input.
pub fn read_length(i: &[u8]) -> Asn1Result<'_, usize> {
    let (rem, first) = read_byte(i)?;
    let (rem, len) = if first & 0x80 == 0 {
        (rem, usize::from(first))
    } else {
        match first & 0x7f {
            1 => {
                let (rem, b) = read_byte(rem)?;
                (rem, usize::from(b))
            }
            2 => {
                let (rem, b) = take_bytes(rem, 2)?;
                (rem, usize::from(b[0]) << 8 | usize::from(b[1]))
            }
            _ => return Err(Err::Error(Asn1Error::InvalidLength)),
        }
    };
    if len > rem.len() {
        return Err(Err::Error(Asn1Error::OutOfData));
    }
    Ok((rem, len))
}

/// Read the tag and length of an element, checking that the tag is `expected`.
///
/// On success, the returned input starts at the content, and the content length is returned.
/// On failure, nothing is consumed.
pub fn read_tag(i: &[u8], expected: Tag) -> Asn1Result<'_, usize> {
    let (rem, tag) = read_byte(i)?;
    if tag != expected.0 {
        return Err(Err::Error(Asn1Error::unexpected_tag(Some(expected), Tag(tag))));
    }
    read_length(rem)
}

/// Read an element with tag `expected`, and return its content as a sub-slice.
pub fn read_content(i: &[u8], expected: Tag) -> Asn1Result<'_, &[u8]> {
    let (rem, len) = read_tag(i, expected)?;
    take_bytes(rem, len)
}

/// Read an element with tag `expected`, and return it as a [`TaggedValue`].
pub fn read_tagged_value(i: &[u8], expected: Tag) -> Asn1Result<'_, TaggedValue<'_>> {
    let (rem, data) = read_content(i, expected)?;
    Ok((rem, TaggedValue::new(expected, data)))
}

const MAX_INTEGER_LEN: usize = 4;

/// Read a small non-negative INTEGER.
///
/// The content must fit in an `i32`, and negative values are rejected.
pub fn read_integer(i: &[u8]) -> Asn1Result<'_, i32> {
    let (rem, bytes) = read_content(i, Tag::Integer)?;
    if bytes.is_empty() || bytes.len() > MAX_INTEGER_LEN || bytes[0] & 0x80 != 0 {
        return Err(Err::Error(Asn1Error::InvalidLength));
    }
    let value = bytes
        .iter()
        .fold(0i32, |acc, &b| (acc << 8) | i32::from(b));
    Ok((rem, value))
}

/// Check that a container's content has been entirely consumed.
#[inline]
pub(crate) fn expect_end(rem: &[u8]) -> Result<(), Asn1Error> {
    if rem.is_empty() {
        Ok(())
    } else {
        Err(Asn1Error::LengthMismatch)
    }
}
