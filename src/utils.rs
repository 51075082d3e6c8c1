use crate::der::{Tag, TaggedValue};
use crate::error::StringConversionError;
use core::fmt;
use log::trace;
use std::borrow::Cow;

/// The string types accepted as attribute values in X.509 names.
///
/// <pre>
/// RFC 5280, 4.1.2.4.  Issuer
///    DirectoryString ::= CHOICE {
///          teletexString           TeletexString (SIZE (1..MAX)),
///          printableString         PrintableString (SIZE (1..MAX)),
///          universalString         UniversalString (SIZE (1..MAX)),
///          utf8String              UTF8String (SIZE (1..MAX)),
///          bmpString               BMPString (SIZE (1..MAX))
///    }
/// </pre>
///
/// IA5String is also accepted, since it is found in real certificates (mostly for email
/// addresses).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectoryString<'a> {
    Teletex(&'a [u8]),
    Printable(&'a [u8]),
    Universal(&'a [u8]),
    Utf8(&'a [u8]),
    Bmp(&'a [u8]),
    Ia5(&'a [u8]),
}

impl<'a> DirectoryString<'a> {
    /// Build a `DirectoryString` from a tagged value, or return `None` if the tag is not a
    /// string type allowed in names.
    pub fn from_tagged_value(value: &TaggedValue<'a>) -> Option<Self> {
        let data = value.data;
        let s = match value.tag {
            Tag::T61String => DirectoryString::Teletex(data),
            Tag::PrintableString => DirectoryString::Printable(data),
            Tag::UniversalString => DirectoryString::Universal(data),
            Tag::Utf8String => DirectoryString::Utf8(data),
            Tag::BmpString => DirectoryString::Bmp(data),
            Tag::Ia5String => DirectoryString::Ia5(data),
            _ => return None,
        };
        Some(s)
    }

    #[inline]
    pub fn is_string_tag(tag: Tag) -> bool {
        matches!(
            tag,
            Tag::T61String
                | Tag::PrintableString
                | Tag::UniversalString
                | Tag::Utf8String
                | Tag::BmpString
                | Tag::Ia5String
        )
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            DirectoryString::Teletex(s)
            | DirectoryString::Printable(s)
            | DirectoryString::Universal(s)
            | DirectoryString::Utf8(s)
            | DirectoryString::Bmp(s)
            | DirectoryString::Ia5(s) => s,
        }
    }

    /// Convert the value to UTF-8, making a best effort.
    ///
    /// Values that cannot be converted are displayed using [`fuzzy_escape`], so the
    /// result is always printable.
    pub fn to_utf8_lossy(&self) -> Cow<'a, str> {
        let encoding = match *self {
            DirectoryString::Utf8(s) => {
                return match std::str::from_utf8(s) {
                    Ok(s) => Cow::Borrowed(s),
                    Err(_) => {
                        trace!("UTF8String value is not valid UTF-8, escaping");
                        fuzzy_escape(s)
                    }
                };
            }
            DirectoryString::Bmp(_) => LegacyEncoding::Ucs2Be,
            DirectoryString::Universal(_) => LegacyEncoding::Ucs4Be,
            // not actually T.61: everyone treats TeletexString as ISO-8859-1
            DirectoryString::Teletex(_) => LegacyEncoding::Latin1,
            // PrintableString and IA5String should be ASCII
            DirectoryString::Printable(s) | DirectoryString::Ia5(s) => return fuzzy_escape(s),
        };
        let s = self.as_bytes();
        match encoding.to_utf8(s) {
            Ok(s) => Cow::Owned(s),
            Err(e) => {
                trace!("{}, escaping", e);
                fuzzy_escape(s)
            }
        }
    }
}

impl fmt::Display for DirectoryString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_utf8_lossy())
    }
}

/// Legacy string encodings found in X.509 names
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegacyEncoding {
    /// UCS-2, big endian (BMPString)
    Ucs2Be,
    /// UCS-4, big endian (UniversalString)
    Ucs4Be,
    /// ISO-8859-1 (TeletexString)
    Latin1,
}

impl LegacyEncoding {
    pub const fn name(self) -> &'static str {
        match self {
            LegacyEncoding::Ucs2Be => "UCS-2BE",
            LegacyEncoding::Ucs4Be => "UCS-4BE",
            LegacyEncoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Convert bytes in this encoding to an UTF-8 string
    pub fn to_utf8(self, bytes: &[u8]) -> Result<String, StringConversionError> {
        let err = || StringConversionError(self.name());
        match self {
            LegacyEncoding::Ucs2Be => {
                if bytes.len() % 2 != 0 {
                    return Err(err());
                }
                // UCS-2 has no surrogate pairs
                bytes
                    .chunks_exact(2)
                    .map(|c| char::from_u32(u32::from(u16::from_be_bytes([c[0], c[1]]))))
                    .collect::<Option<String>>()
                    .ok_or_else(err)
            }
            LegacyEncoding::Ucs4Be => {
                if bytes.len() % 4 != 0 {
                    return Err(err());
                }
                bytes
                    .chunks_exact(4)
                    .map(|c| char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]])))
                    .collect::<Option<String>>()
                    .ok_or_else(err)
            }
            LegacyEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Escape all non-ASCII bytes.
///
/// ASCII bytes are copied, and every other byte is replaced by `?\DDD`, where `DDD` is the
/// decimal value of the byte. If the input is all ASCII, it is returned as is.
pub fn fuzzy_escape(s: &[u8]) -> Cow<'_, str> {
    if let Ok(s) = std::str::from_utf8(s) {
        if s.is_ascii() {
            return Cow::Borrowed(s);
        }
    }
    let mut out = String::with_capacity(s.len() + 4);
    for &b in s {
        if b.is_ascii() {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("?\\{:03}", b));
        }
    }
    Cow::Owned(out)
}
