//! Certificate summary, as displayed to users

use crate::certificate::X509Certificate;
use crate::error::X509Error;
use core::fmt;
use data_encoding::HEXLOWER;
use log::{debug, trace};
use ring::digest;

/// Key of the subject name in a [`CertInfo`]
pub const CERTINFO_KEY_SUBJECT: &str = "subject";
/// Key of the issuer name in a [`CertInfo`]
pub const CERTINFO_KEY_ISSUER: &str = "issuer";
/// Key of the start of the validity period in a [`CertInfo`]
pub const CERTINFO_KEY_VALID_FROM: &str = "valid_from";
/// Key of the end of the validity period in a [`CertInfo`]
pub const CERTINFO_KEY_VALID_TO: &str = "valid_to";
/// Key of the certificate fingerprint in a [`CertInfo`]
pub const CERTINFO_KEY_SHA1_DIGEST: &str = "sha1_digest";

/// A human-readable summary of a certificate.
///
/// All values are display strings:
///
/// - `subject` and `issuer` are names formatted as `LABEL=VALUE` pairs, joined by `", "`
///   (for ex `C=US, O=Example Org, CN=example.com`)
/// - `valid_from` and `valid_to` are formatted as
///   `YYYY-MM-DD hh:mm:ss +0000 (Www, DD Mmm YYYY)`
/// - `sha1_digest` is the SHA-1 fingerprint of the whole DER encoding, as 40 lowercase
///   hexadecimal digits
///
/// The fingerprint identifies the certificate, it is not used to check anything.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CertInfo {
    subject: String,
    issuer: String,
    valid_from: String,
    valid_to: String,
    sha1_digest: String,
}

impl CertInfo {
    /// Build the summary of an already decoded certificate.
    ///
    /// The fingerprint is computed over the whole encoding the certificate was decoded from.
    pub fn from_certificate(cert: &X509Certificate<'_>) -> Self {
        CertInfo {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            valid_from: cert.validity().not_before.to_string(),
            valid_to: cert.validity().not_after.to_string(),
            sha1_digest: sha1_fingerprint(cert.as_ref()),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn valid_from(&self) -> &str {
        &self.valid_from
    }

    pub fn valid_to(&self) -> &str {
        &self.valid_to
    }

    /// SHA-1 fingerprint of the DER encoding, as 40 lowercase hexadecimal digits
    pub fn sha1_digest(&self) -> &str {
        &self.sha1_digest
    }

    /// Get a value by key (see the `CERTINFO_KEY_*` constants)
    pub fn get(&self, key: &str) -> Option<&str> {
        let value: &str = match key {
            CERTINFO_KEY_SUBJECT => &self.subject,
            CERTINFO_KEY_ISSUER => &self.issuer,
            CERTINFO_KEY_VALID_FROM => &self.valid_from,
            CERTINFO_KEY_VALID_TO => &self.valid_to,
            CERTINFO_KEY_SHA1_DIGEST => &self.sha1_digest,
            _ => return None,
        };
        Some(value)
    }

    /// Iterate over `(key, value)` pairs.
    ///
    /// The order is fixed: subject, issuer, valid_from, valid_to, sha1_digest.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        IntoIterator::into_iter([
            (CERTINFO_KEY_SUBJECT, self.subject.as_str()),
            (CERTINFO_KEY_ISSUER, self.issuer.as_str()),
            (CERTINFO_KEY_VALID_FROM, self.valid_from.as_str()),
            (CERTINFO_KEY_VALID_TO, self.valid_to.as_str()),
            (CERTINFO_KEY_SHA1_DIGEST, self.sha1_digest.as_str()),
        ])
    }
}

impl fmt::Display for CertInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f, "Valid: from {} until {}", self.valid_from, self.valid_to)?;
        writeln!(f, "Issuer: {}", self.issuer)?;
        write!(f, "Fingerprint: {}", self.sha1_digest)
    }
}

fn sha1_fingerprint(der: &[u8]) -> String {
    let digest = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, der);
    HEXLOWER.encode(digest.as_ref())
}

/// Parse a DER-encoded X.509 certificate, and return its summary.
///
/// The input must contain exactly one certificate: trailing bytes are an error.
/// Nothing is verified: the signature is not checked, and the validity period is only
/// reported.
///
/// ```rust
/// use svn_x509::parse_certificate;
///
/// static DER: &[u8] = include_bytes!("../assets/legacy-v1.der");
///
/// let info = parse_certificate(DER).expect("could not parse certificate");
/// assert_eq!(info.subject(), "C=FR, O=Legacy CA, CN=legacy.example.org");
/// assert_eq!(info.valid_to(), "2009-12-31 23:59:59 +0000 (Thu, 31 Dec 2009)");
/// ```
pub fn parse_certificate(der: &[u8]) -> Result<CertInfo, X509Error> {
    match X509Certificate::from_der(der) {
        Ok(cert) => {
            trace!("parsed {:?} certificate ({} bytes)", cert.version(), der.len());
            Ok(CertInfo::from_certificate(&cert))
        }
        Err(e) => {
            debug!("certificate parsing failed ({} bytes): {}", der.len(), e);
            Err(e)
        }
    }
}
