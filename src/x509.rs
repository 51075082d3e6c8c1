//! X.509 objects and types
//!
//! Based on RFC5280
//!

use crate::der::*;
use crate::error::{fail, wrap, Asn1Error, Asn1Result, X509Error, X509Result};
use crate::objects::attribute_label;
use crate::utils::{fuzzy_escape, DirectoryString};
use log::trace;
use nom::Err;
use std::borrow::Cow;
use std::fmt;

/// The version of the encoded certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum X509Version {
    V1,
    V2,
    V3,
}

impl X509Version {
    /// Build the version from its encoded value (0 for v1, 1 for v2, 2 for v3)
    pub(crate) fn from_raw(v: u32) -> Result<X509Version, X509Error> {
        match v {
            0 => Ok(X509Version::V1),
            1 => Ok(X509Version::V2),
            2 => Ok(X509Version::V3),
            n => Err(X509Error::UnknownVersion(n + 1)),
        }
    }

    /// The version number, as displayed (1, 2 or 3)
    #[inline]
    pub const fn number(self) -> u32 {
        match self {
            X509Version::V1 => 1,
            X509Version::V2 => 2,
            X509Version::V3 => 3,
        }
    }
}

/// <pre>
/// Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }
/// </pre>
///
/// The field is `[0] EXPLICIT` with a default value: if the tag is not present, the version
/// is v1 and nothing is consumed.
pub(crate) fn parse_version(i: &[u8]) -> X509Result<'_, X509Version> {
    let (rem, content) = match read_content(i, Tag::context_constructed(0)) {
        Ok(r) => r,
        Err(Err::Error(e)) if e.is_unexpected_tag() => {
            trace!("no version field, assuming v1");
            return Ok((i, X509Version::V1));
        }
        Err(e) => return Err(wrap(X509Error::InvalidVersion)(e)),
    };
    let (content, version) = read_integer(content).map_err(wrap(X509Error::InvalidVersion))?;
    expect_end(content).or_else(|e| fail(X509Error::InvalidVersion, e))?;
    // read_integer only returns non-negative values
    let version = X509Version::from_raw(version as u32).map_err(Err::Error)?;
    Ok((rem, version))
}

/// <pre>
/// CertificateSerialNumber  ::=  INTEGER
/// </pre>
///
/// The value is not interpreted. A context-specific primitive tag `[2]` is accepted in place of
/// INTEGER, since some encoders emit it.
pub(crate) fn parse_serial(i: &[u8]) -> X509Result<'_, TaggedValue<'_>> {
    let (tag, rem) = match i.split_first() {
        Some((&tag, rem)) => (Tag(tag), rem),
        None => return fail(X509Error::InvalidSerial, Asn1Error::OutOfData),
    };
    if tag != Tag::Integer && tag != Tag::context_primitive(2) {
        return fail(
            X509Error::InvalidSerial,
            Asn1Error::unexpected_tag(Some(Tag::Integer), tag),
        );
    }
    let (rem, len) = read_length(rem).map_err(wrap(X509Error::InvalidSerial))?;
    let (rem, data) = take_bytes(rem, len).map_err(wrap(X509Error::InvalidSerial))?;
    Ok((rem, TaggedValue::new(tag, data)))
}

/// <pre>
/// AlgorithmIdentifier  ::=  SEQUENCE  {
///      algorithm               OBJECT IDENTIFIER,
///      parameters              ANY DEFINED BY algorithm OPTIONAL  }
/// </pre>
///
/// Only absent or NULL parameters are accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmIdentifier<'a> {
    pub algorithm: TaggedValue<'a>,
    pub parameters: Option<TaggedValue<'a>>,
}

/// Number of leading OID bytes compared when checking that the signature algorithm of the
/// TBSCertificate is the one of the certificate.
const SIG_OID_MATCH_LEN: usize = 9;

impl<'a> AlgorithmIdentifier<'a> {
    pub(crate) fn parse(i: &'a [u8]) -> X509Result<'a, Self> {
        let (rem, content) =
            read_content(i, Tag::Sequence).map_err(wrap(X509Error::InvalidAlgorithm))?;
        let (content, algorithm) =
            read_tagged_value(content, Tag::Oid).map_err(wrap(X509Error::InvalidAlgorithm))?;
        if content.is_empty() {
            let alg = AlgorithmIdentifier {
                algorithm,
                parameters: None,
            };
            return Ok((rem, alg));
        }
        let (content, parameters) =
            read_tagged_value(content, Tag::Null).map_err(wrap(X509Error::InvalidAlgorithm))?;
        expect_end(parameters.data)
            .and_then(|_| expect_end(content))
            .or_else(|e| fail(X509Error::InvalidAlgorithm, e))?;
        let alg = AlgorithmIdentifier {
            algorithm,
            parameters: Some(parameters),
        };
        Ok((rem, alg))
    }

    /// Return the DER content of the algorithm OID
    #[inline]
    pub fn oid(&self) -> &'a [u8] {
        self.algorithm.data
    }

    /// Test if two algorithm identifiers designate the same signature algorithm.
    ///
    /// Only the first 9 bytes of the OIDs are compared (all bytes if the OIDs are shorter).
    pub fn same_signature_algorithm(&self, other: &AlgorithmIdentifier<'_>) -> bool {
        self.oid()
            .iter()
            .take(SIG_OID_MATCH_LEN)
            .eq(other.oid().iter().take(SIG_OID_MATCH_LEN))
    }
}

/// Parse the signature value BIT STRING.
///
/// Signatures are always a whole number of bytes, so the unused bits count must be 0.
pub(crate) fn parse_signature_value(i: &[u8]) -> X509Result<'_, TaggedValue<'_>> {
    let (rem, content) =
        read_content(i, Tag::BitString).map_err(wrap(X509Error::InvalidSignature))?;
    match content.split_first() {
        Some((&0, sig)) if !sig.is_empty() => Ok((rem, TaggedValue::new(Tag::BitString, sig))),
        _ => Err(Err::Error(X509Error::InvalidSignature(None))),
    }
}

/// Parse an optional element with context-specific constructed tag `[n]`.
///
/// If the element is absent (no input left, or another tag), nothing is consumed.
fn parse_optional_context<'a>(i: &'a [u8], n: u8) -> X509Result<'a, Option<TaggedValue<'a>>> {
    if i.is_empty() {
        return Ok((i, None));
    }
    let tag = Tag::context_constructed(n);
    match read_content(i, tag) {
        Ok((rem, data)) => Ok((rem, Some(TaggedValue::new(tag, data)))),
        Err(Err::Error(e)) if e.is_unexpected_tag() => {
            trace!("optional field [{}] absent", n);
            Ok((i, None))
        }
        Err(e) => Err(wrap(X509Error::InvalidFormat)(e)),
    }
}

/// <pre>
/// issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
/// </pre>
#[inline]
pub(crate) fn parse_issuer_unique_id(i: &[u8]) -> X509Result<'_, Option<TaggedValue<'_>>> {
    parse_optional_context(i, 1)
}

/// <pre>
/// subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
/// </pre>
#[inline]
pub(crate) fn parse_subject_unique_id(i: &[u8]) -> X509Result<'_, Option<TaggedValue<'_>>> {
    parse_optional_context(i, 2)
}

/// Skip the `[3] EXPLICIT Extensions` field, if present.
///
/// Extensions are not parsed: their content is only skipped.
pub(crate) fn skip_extensions(i: &[u8]) -> X509Result<'_, ()> {
    let (rem, _) = parse_optional_context(i, 3)?;
    Ok((rem, ()))
}

/// <pre>
/// AttributeTypeAndValue   ::= SEQUENCE {
///     type    AttributeType,
///     value   AttributeValue }
/// </pre>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeTypeAndValue<'a> {
    pub attr_type: TaggedValue<'a>,
    pub attr_value: TaggedValue<'a>,
}

impl<'a> AttributeTypeAndValue<'a> {
    /// Return the attribute value converted to UTF-8, or escaped if conversion is not possible
    pub fn value_to_utf8_lossy(&self) -> Cow<'a, str> {
        match DirectoryString::from_tagged_value(&self.attr_value) {
            Some(s) => s.to_utf8_lossy(),
            None => fuzzy_escape(self.attr_value.data),
        }
    }
}

/// X.501 Name, as a list of attributes in encoding order
///
/// <pre>
/// Name ::= CHOICE { -- only one possibility for now --
///     rdnSequence  RDNSequence }
///
/// RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
///
/// RelativeDistinguishedName ::=
///     SET SIZE (1..MAX) OF AttributeTypeAndValue
/// </pre>
///
/// Each `RelativeDistinguishedName` must contain exactly one attribute, which is how
/// certificates are encoded in practice. Multi-valued RDNs are rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct X509Name<'a> {
    pub(crate) attributes: Vec<AttributeTypeAndValue<'a>>,
    pub(crate) raw: &'a [u8],
}

impl<'a> X509Name<'a> {
    // Not using the AsRef trait, as that would not give back the full 'a lifetime
    pub fn as_raw(&self) -> &'a [u8] {
        self.raw
    }

    /// Return an iterator over the attribute types and values of the name
    pub fn iter_attributes(&self) -> impl Iterator<Item = &AttributeTypeAndValue<'a>> {
        self.attributes.iter()
    }
}

impl fmt::Display for X509Name<'_> {
    /// Formats the name as `KEY=VALUE, KEY=VALUE`, in encoding order
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, attr) in self.attributes.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}={}",
                attribute_label(attr.attr_type.data),
                attr.value_to_utf8_lossy()
            )?;
        }
        Ok(())
    }
}

fn parse_rdn(i: &[u8]) -> Asn1Result<'_, AttributeTypeAndValue<'_>> {
    let (rem, set) = read_content(i, Tag::Set)?;
    let (attr, len) = read_tag(set, Tag::Sequence)?;
    if len != attr.len() {
        return Err(Err::Error(Asn1Error::LengthMismatch));
    }
    let (attr, attr_type) = read_tagged_value(attr, Tag::Oid)?;
    let tag = match attr.first() {
        Some(&b) => Tag(b),
        None => return Err(Err::Error(Asn1Error::OutOfData)),
    };
    if !DirectoryString::is_string_tag(tag) {
        return Err(Err::Error(Asn1Error::unexpected_tag(None, tag)));
    }
    let (attr, attr_value) = read_tagged_value(attr, tag)?;
    expect_end(attr).map_err(Err::Error)?;
    Ok((
        rem,
        AttributeTypeAndValue {
            attr_type,
            attr_value,
        },
    ))
}

/// Parse the X.501 type Name, used for ex in issuer and subject of a X.509 certificate
///
/// The name must contain at least one attribute.
pub(crate) fn parse_x509_name(i: &[u8]) -> X509Result<'_, X509Name<'_>> {
    let (rem, content) = read_content(i, Tag::Sequence).map_err(wrap(X509Error::InvalidName))?;
    let mut attributes = Vec::new();
    let mut input = content;
    loop {
        let (next, attr) = parse_rdn(input).map_err(wrap(X509Error::InvalidName))?;
        attributes.push(attr);
        if next.is_empty() {
            break;
        }
        input = next;
    }
    let raw = &i[..i.len() - rem.len()];
    Ok((rem, X509Name { attributes, raw }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_version() {
        assert_eq!(
            parse_version(&hex!("a0 03 02 01 02 02 01 01")),
            Ok((&hex!("02 01 01")[..], X509Version::V3))
        );
        assert_eq!(
            parse_version(&hex!("a0 03 02 01 01")),
            Ok((&[][..], X509Version::V2))
        );
        // absent: v1, nothing consumed
        let data = hex!("02 01 01");
        assert_eq!(parse_version(&data), Ok((&data[..], X509Version::V1)));
        assert_eq!(
            parse_version(&hex!("a0 03 02 01 03")),
            Err(Err::Error(X509Error::UnknownVersion(4)))
        );
    }

    #[test]
    fn test_version_errors() {
        assert_eq!(
            parse_version(&[]),
            Err(Err::Error(X509Error::InvalidVersion(Some(Asn1Error::OutOfData))))
        );
        // trailing byte inside [0]
        assert_eq!(
            parse_version(&hex!("a0 04 02 01 02 00")),
            Err(Err::Error(X509Error::InvalidVersion(Some(
                Asn1Error::LengthMismatch
            ))))
        );
        // not an INTEGER
        assert_eq!(
            parse_version(&hex!("a0 03 04 01 02")),
            Err(Err::Error(X509Error::InvalidVersion(Some(
                Asn1Error::UnexpectedTag {
                    expected: Some(Tag::Integer),
                    found: Tag(0x04)
                }
            ))))
        );
        // negative
        assert_eq!(
            parse_version(&hex!("a0 03 02 01 ff")),
            Err(Err::Error(X509Error::InvalidVersion(Some(
                Asn1Error::InvalidLength
            ))))
        );
    }

    #[test]
    fn test_serial() {
        let (rem, serial) = parse_serial(&hex!("02 02 12 34 30")).expect("parsing failed");
        assert_eq!(rem, &hex!("30"));
        assert_eq!(serial, TaggedValue::new(Tag::Integer, &hex!("12 34")));
        // context-specific [2] is tolerated
        let (_, serial) = parse_serial(&hex!("82 01 01")).expect("parsing failed");
        assert_eq!(serial.tag, Tag(0x82));
        assert_eq!(
            parse_serial(&hex!("04 01 01")),
            Err(Err::Error(X509Error::InvalidSerial(Some(
                Asn1Error::UnexpectedTag {
                    expected: Some(Tag::Integer),
                    found: Tag(0x04)
                }
            ))))
        );
        assert_eq!(
            parse_serial(&[]),
            Err(Err::Error(X509Error::InvalidSerial(Some(Asn1Error::OutOfData))))
        );
        assert_eq!(
            parse_serial(&hex!("02 03 01")),
            Err(Err::Error(X509Error::InvalidSerial(Some(Asn1Error::OutOfData))))
        );
    }

    // sha256WithRSAEncryption
    const SHA256_RSA: [u8; 9] = hex!("2a 86 48 86 f7 0d 01 01 0b");

    #[test]
    fn test_algorithm_identifier() {
        let (rem, alg) = AlgorithmIdentifier::parse(&hex!("30 0d 06 09 2a 86 48 86 f7 0d 01 01 0b 05 00 ff"))
            .expect("parsing failed");
        assert_eq!(rem, &[0xff]);
        assert_eq!(alg.oid(), &SHA256_RSA);
        assert_eq!(alg.parameters, Some(TaggedValue::new(Tag::Null, &[])));
        // ecdsa-with-SHA256, no parameters
        let (_, alg) = AlgorithmIdentifier::parse(&hex!("30 0a 06 08 2a 86 48 ce 3d 04 03 02"))
            .expect("parsing failed");
        assert_eq!(alg.parameters, None);
        assert_eq!(alg.oid().len(), 8);
    }

    #[test]
    fn test_algorithm_identifier_errors() {
        // parameters are not NULL
        assert_eq!(
            AlgorithmIdentifier::parse(&hex!("30 0d 06 09 2a 86 48 86 f7 0d 01 01 0b 02 00")),
            Err(Err::Error(X509Error::InvalidAlgorithm(Some(
                Asn1Error::UnexpectedTag {
                    expected: Some(Tag::Null),
                    found: Tag::Integer
                }
            ))))
        );
        // trailing data after NULL
        assert_eq!(
            AlgorithmIdentifier::parse(&hex!("30 0e 06 09 2a 86 48 86 f7 0d 01 01 0b 05 00 00")),
            Err(Err::Error(X509Error::InvalidAlgorithm(Some(
                Asn1Error::LengthMismatch
            ))))
        );
        // NULL with content
        assert_eq!(
            AlgorithmIdentifier::parse(&hex!("30 0e 06 09 2a 86 48 86 f7 0d 01 01 0b 05 01 00")),
            Err(Err::Error(X509Error::InvalidAlgorithm(Some(
                Asn1Error::LengthMismatch
            ))))
        );
        assert_eq!(
            AlgorithmIdentifier::parse(&hex!("31 00")),
            Err(Err::Error(X509Error::InvalidAlgorithm(Some(
                Asn1Error::UnexpectedTag {
                    expected: Some(Tag::Sequence),
                    found: Tag::Set
                }
            ))))
        );
    }

    fn alg(oid: &[u8]) -> AlgorithmIdentifier<'_> {
        AlgorithmIdentifier {
            algorithm: TaggedValue::new(Tag::Oid, oid),
            parameters: None,
        }
    }

    #[test]
    fn test_same_signature_algorithm() {
        let sha1_rsa = hex!("2a 86 48 86 f7 0d 01 01 05");
        let longer = hex!("2a 86 48 86 f7 0d 01 01 0b 01");
        let ecdsa_sha256 = hex!("2a 86 48 ce 3d 04 03 02");
        let truncated = hex!("2a 86 48 ce 3d 04 03");

        let a = alg(&SHA256_RSA);
        assert!(a.same_signature_algorithm(&alg(&SHA256_RSA)));
        assert!(!a.same_signature_algorithm(&alg(&sha1_rsa)));
        // only 9 bytes are compared
        assert!(a.same_signature_algorithm(&alg(&longer)));
        // shorter OIDs
        let ecdsa = alg(&ecdsa_sha256);
        assert!(ecdsa.same_signature_algorithm(&alg(&ecdsa_sha256)));
        assert!(!ecdsa.same_signature_algorithm(&alg(&truncated)));
        assert!(!ecdsa.same_signature_algorithm(&a));
    }

    #[test]
    fn test_signature_value() {
        let (rem, sig) = parse_signature_value(&hex!("03 03 00 ab cd")).expect("parsing failed");
        assert!(rem.is_empty());
        assert_eq!(sig.as_bytes(), &hex!("ab cd"));
        // unused bits
        assert_eq!(
            parse_signature_value(&hex!("03 03 04 ab c0")),
            Err(Err::Error(X509Error::InvalidSignature(None)))
        );
        // empty signature
        assert_eq!(
            parse_signature_value(&hex!("03 01 00")),
            Err(Err::Error(X509Error::InvalidSignature(None)))
        );
        assert_eq!(
            parse_signature_value(&hex!("04 01 00")),
            Err(Err::Error(X509Error::InvalidSignature(Some(
                Asn1Error::UnexpectedTag {
                    expected: Some(Tag::BitString),
                    found: Tag(0x04)
                }
            ))))
        );
    }

    #[test]
    fn test_unique_ids() {
        let data = hex!("a1 02 00 01 a2 02 00 02 a3 00");
        let (rem, uid) = parse_issuer_unique_id(&data).expect("parsing failed");
        assert_eq!(uid.map(|v| v.data), Some(&hex!("00 01")[..]));
        let (rem, uid) = parse_subject_unique_id(rem).expect("parsing failed");
        assert_eq!(uid.map(|v| v.data), Some(&hex!("00 02")[..]));
        let (rem, ()) = skip_extensions(rem).expect("parsing failed");
        assert!(rem.is_empty());

        // absent fields do not consume input
        let data = hex!("a3 03 30 01 00");
        let (rem, uid) = parse_issuer_unique_id(&data).expect("parsing failed");
        assert!(uid.is_none());
        assert_eq!(rem, &data);
        let (rem, uid) = parse_subject_unique_id(rem).expect("parsing failed");
        assert!(uid.is_none());
        assert_eq!(rem, &data);
        let (rem, ()) = skip_extensions(rem).expect("parsing failed");
        assert!(rem.is_empty());
        assert_eq!(parse_issuer_unique_id(&[]), Ok((&[][..], None)));

        // truncated
        assert_eq!(
            parse_issuer_unique_id(&hex!("a1 05 00")),
            Err(Err::Error(X509Error::InvalidFormat(Some(Asn1Error::OutOfData))))
        );
    }

    fn name(v: &[&[u8]]) -> Vec<u8> {
        let content: Vec<u8> = v.concat();
        let mut out = vec![0x30, content.len() as u8];
        out.extend(content);
        out
    }

    // SET { SEQUENCE { OID 2.5.4.3, UTF8String "example.com" } }
    const RDN_CN: &[u8] = &hex!("31 14 30 12 06 03 55 04 03 0c 0b 65 78 61 6d 70 6c 65 2e 63 6f 6d");
    // SET { SEQUENCE { OID 2.5.4.6, PrintableString "FR" } }
    const RDN_C: &[u8] = &hex!("31 0b 30 09 06 03 55 04 06 13 02 46 52");

    #[test]
    fn test_x509_name() {
        let data = name(&[RDN_C, RDN_CN]);
        let (rem, n) = parse_x509_name(&data).expect("parsing failed");
        assert!(rem.is_empty());
        assert_eq!(n.as_raw(), &data[..]);
        assert_eq!(n.iter_attributes().count(), 2);
        assert_eq!(n.to_string(), "C=FR, CN=example.com");
    }

    #[test]
    fn test_x509_name_cn() {
        let data = name(&[RDN_CN]);
        let (_, n) = parse_x509_name(&data).expect("parsing failed");
        let attr = n.iter_attributes().next().expect("missing attribute");
        assert_eq!(attr.attr_type.as_bytes(), &hex!("55 04 03"));
        assert_eq!(attr.attr_value.tag, Tag::Utf8String);
        assert_eq!(n.to_string(), "CN=example.com");
    }

    #[test]
    fn test_x509_name_string_types() {
        // BMPString "Ab", T61String "M\xfcnchen", email as IA5String
        let bmp = hex!("31 0d 30 0b 06 03 55 04 0a 1e 04 00 41 00 62");
        let t61 = hex!("31 10 30 0e 06 03 55 04 07 14 07 4d fc 6e 63 68 65 6e");
        let email = hex!("31 12 30 10 06 09 2a 86 48 86 f7 0d 01 09 01 16 03 61 40 62");
        let data = name(&[&bmp, &t61, &email]);
        let (_, n) = parse_x509_name(&data).expect("parsing failed");
        assert_eq!(n.to_string(), "O=Ab, L=München, emailAddress=a@b");
    }

    #[test]
    fn test_x509_name_errors() {
        // value is an OCTET STRING
        let bad_value = hex!("31 0a 30 08 06 03 55 04 03 04 01 41");
        assert_eq!(
            parse_x509_name(&name(&[&bad_value])),
            Err(Err::Error(X509Error::InvalidName(Some(
                Asn1Error::UnexpectedTag {
                    expected: None,
                    found: Tag(0x04)
                }
            ))))
        );
        // multi-valued RDN
        let multi = hex!("31 14 30 08 06 03 55 04 03 0c 01 41 30 08 06 03 55 04 03 0c 01 42");
        assert_eq!(
            parse_x509_name(&name(&[&multi])),
            Err(Err::Error(X509Error::InvalidName(Some(
                Asn1Error::LengthMismatch
            ))))
        );
        // missing value
        let no_value = hex!("31 07 30 05 06 03 55 04 03");
        assert_eq!(
            parse_x509_name(&name(&[&no_value])),
            Err(Err::Error(X509Error::InvalidName(Some(Asn1Error::OutOfData))))
        );
        // empty name
        assert_eq!(
            parse_x509_name(&hex!("30 00")),
            Err(Err::Error(X509Error::InvalidName(Some(Asn1Error::OutOfData))))
        );
        // garbage after the last RDN
        let data = name(&[RDN_C, &hex!("05 00")]);
        assert_eq!(
            parse_x509_name(&data),
            Err(Err::Error(X509Error::InvalidName(Some(
                Asn1Error::UnexpectedTag {
                    expected: Some(Tag::Set),
                    found: Tag::Null
                }
            ))))
        );
    }

    #[test]
    fn test_x509_name_invalid_utf8() {
        // UTF8String "a\xe9b"
        let rdn = hex!("31 0c 30 0a 06 03 55 04 03 0c 03 61 e9 62");
        let data = name(&[&rdn]);
        let (_, n) = parse_x509_name(&data).expect("parsing failed");
        assert_eq!(n.to_string(), "CN=a?\\233b");
    }
}
