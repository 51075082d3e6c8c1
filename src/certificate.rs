//! X.509 Certificate object definitions and operations

use crate::der::{expect_end, read_content, read_tag, Tag, TaggedValue};
use crate::error::{fail, wrap, Asn1Error, X509Error, X509Result};
use crate::time::{parse_choice_of_time, ASN1Time};
use crate::x509::*;
use core::ops::Deref;
use log::trace;

/// An X.509 v3 Certificate.
///
/// X.509 v3 certificates are defined in [RFC5280](https://tools.ietf.org/html/rfc5280), section
/// 4.1. This object uses the same structure for content, so for ex the subject can be accessed
/// using the path `x509.tbs_certificate.subject`.
///
/// A `X509Certificate` is a zero-copy view over a buffer, so the lifetime is the same as the
/// buffer containing the binary representation.
///
/// Only the fields needed to describe the certificate are decoded: the public key is skipped,
/// and extensions are skipped without being interpreted.
#[derive(Clone, Debug, PartialEq)]
pub struct X509Certificate<'a> {
    pub tbs_certificate: TbsCertificate<'a>,
    pub signature_algorithm: AlgorithmIdentifier<'a>,
    pub signature_value: TaggedValue<'a>,
    pub(crate) raw: &'a [u8],
}

impl<'a> Deref for X509Certificate<'a> {
    type Target = TbsCertificate<'a>;

    fn deref(&self) -> &Self::Target {
        &self.tbs_certificate
    }
}

impl<'a> X509Certificate<'a> {
    /// Parse a DER-encoded X.509 Certificate.
    ///
    /// The encoding must span exactly the whole input: trailing bytes are an error.
    ///
    /// <pre>
    /// Certificate  ::=  SEQUENCE  {
    ///         tbsCertificate       TBSCertificate,
    ///         signatureAlgorithm   AlgorithmIdentifier,
    ///         signatureValue       BIT STRING  }
    /// </pre>
    pub fn from_der(i: &'a [u8]) -> Result<Self, X509Error> {
        let (content, len) = read_tag(i, Tag::Sequence).map_err(wrap(X509Error::InvalidFormat))?;
        if len != content.len() {
            return Err(X509Error::InvalidFormat(Some(Asn1Error::LengthMismatch)));
        }
        let (rem, tbs_certificate) = TbsCertificate::parse(content)?;
        let (rem, signature_algorithm) = AlgorithmIdentifier::parse(rem)?;
        if !tbs_certificate
            .signature
            .same_signature_algorithm(&signature_algorithm)
        {
            return Err(X509Error::SignatureAlgorithmMismatch);
        }
        let (rem, signature_value) = parse_signature_value(rem)?;
        expect_end(rem).map_err(|e| X509Error::InvalidFormat(Some(e)))?;
        Ok(X509Certificate {
            tbs_certificate,
            signature_algorithm,
            signature_value,
            raw: i,
        })
    }
}

impl AsRef<[u8]> for X509Certificate<'_> {
    /// The whole DER encoding of the certificate
    fn as_ref(&self) -> &[u8] {
        self.raw
    }
}

/// The sequence `TBSCertificate` contains information associated with the
/// subject of the certificate and the CA that issued it.
///
/// RFC5280 definition:
///
/// <pre>
///   TBSCertificate  ::=  SEQUENCE  {
///        version         [0]  EXPLICIT Version DEFAULT v1,
///        serialNumber         CertificateSerialNumber,
///        signature            AlgorithmIdentifier,
///        issuer               Name,
///        validity             Validity,
///        subject              Name,
///        subjectPublicKeyInfo SubjectPublicKeyInfo,
///        issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
///                             -- If present, version MUST be v2 or v3
///        subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
///                             -- If present, version MUST be v2 or v3
///        extensions      [3]  EXPLICIT Extensions OPTIONAL
///                             -- If present, version MUST be v3
///        }
/// </pre>
#[derive(Clone, Debug, PartialEq)]
pub struct TbsCertificate<'a> {
    pub version: X509Version,
    pub serial: TaggedValue<'a>,
    pub signature: AlgorithmIdentifier<'a>,
    pub issuer: X509Name<'a>,
    pub validity: Validity,
    pub subject: X509Name<'a>,
    pub issuer_uid: Option<TaggedValue<'a>>,
    pub subject_uid: Option<TaggedValue<'a>>,
    pub(crate) raw: &'a [u8],
}

impl<'a> TbsCertificate<'a> {
    fn parse(i: &'a [u8]) -> X509Result<'a, Self> {
        let (rem, tbs) = read_content(i, Tag::Sequence).map_err(wrap(X509Error::InvalidFormat))?;
        let raw = &i[..i.len() - rem.len()];
        let (i, version) = parse_version(tbs)?;
        let (i, serial) = parse_serial(i)?;
        let (i, signature) = AlgorithmIdentifier::parse(i)?;
        let (i, issuer) = parse_x509_name(i)?;
        let (i, validity) = Validity::parse(i)?;
        let (i, subject) = parse_x509_name(i)?;
        let (i, _) = skip_subject_public_key_info(i)?;
        let (i, issuer_uid) = if version >= X509Version::V2 {
            parse_issuer_unique_id(i)?
        } else {
            (i, None)
        };
        let (i, subject_uid) = if version >= X509Version::V2 {
            parse_subject_unique_id(i)?
        } else {
            (i, None)
        };
        let (i, _) = if version == X509Version::V3 {
            skip_extensions(i)?
        } else {
            (i, ())
        };
        expect_end(i).or_else(|e| fail(X509Error::InvalidFormat, e))?;
        let tbs = TbsCertificate {
            version,
            serial,
            signature,
            issuer,
            validity,
            subject,
            issuer_uid,
            subject_uid,
            raw,
        };
        Ok((rem, tbs))
    }

    /// Get the version of the encoded certificate
    #[inline]
    pub fn version(&self) -> X509Version {
        self.version
    }

    /// Get the certificate subject.
    #[inline]
    pub fn subject(&self) -> &X509Name<'a> {
        &self.subject
    }

    /// Get the certificate issuer.
    #[inline]
    pub fn issuer(&self) -> &X509Name<'a> {
        &self.issuer
    }

    /// Get the certificate validity.
    #[inline]
    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// Get the raw bytes of the certificate serial number
    #[inline]
    pub fn raw_serial(&self) -> &'a [u8] {
        self.serial.data
    }
}

impl AsRef<[u8]> for TbsCertificate<'_> {
    fn as_ref(&self) -> &[u8] {
        self.raw
    }
}

/// <pre>
/// SubjectPublicKeyInfo  ::=  SEQUENCE  {
///      algorithm            AlgorithmIdentifier,
///      subjectPublicKey     BIT STRING  }
/// </pre>
///
/// The public key is not decoded, only skipped.
fn skip_subject_public_key_info(i: &[u8]) -> X509Result<'_, ()> {
    let (rem, _) = read_content(i, Tag::Sequence).map_err(wrap(X509Error::InvalidFormat))?;
    trace!("skipped subjectPublicKeyInfo");
    Ok((rem, ()))
}

/// <pre>
/// Validity ::= SEQUENCE {
///      notBefore      Time,
///      notAfter       Time }
/// </pre>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: ASN1Time,
    pub not_after: ASN1Time,
}

impl Validity {
    fn parse(i: &[u8]) -> X509Result<'_, Self> {
        let (rem, content) =
            read_content(i, Tag::Sequence).map_err(wrap(X509Error::InvalidDate))?;
        let (content, not_before) = parse_choice_of_time(content)?;
        let (content, not_after) = parse_choice_of_time(content)?;
        expect_end(content).or_else(|e| fail(X509Error::InvalidDate, e))?;
        Ok((
            rem,
            Validity {
                not_before,
                not_after,
            },
        ))
    }
}
