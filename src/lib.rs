//! # SVN X.509 certificate decoder
//!
//! A decoder for DER-encoded X.509 ([RFC5280]) certificates, implemented with the
//! [nom](https://github.com/Geal/nom) parser combinator framework.
//!
//! The decoder extracts the information needed to describe a certificate to a user, for ex
//! when a server presents a certificate that cannot be trusted automatically:
//!
//! - the subject and issuer names
//! - the validity period
//! - the SHA-1 fingerprint of the encoding
//!
//! Nothing is verified: the signature is not checked and the certificate is not validated
//! against a trust store. The public key and extensions are skipped.
//!
//! The main function is [`parse_certificate`], which takes a DER-encoded certificate as
//! input and returns a [`CertInfo`] summary. The lower-level [`X509Certificate`] gives
//! access to the decoded fields.
//!
//! # Examples
//!
//! ```rust
//! use svn_x509::{parse_certificate, CERTINFO_KEY_SHA1_DIGEST};
//!
//! static DER: &[u8] = include_bytes!("../assets/example-v3.der");
//!
//! # fn main() {
//! let info = parse_certificate(DER).expect("could not parse certificate");
//! assert_eq!(info.valid_from(), "2015-04-01 12:00:00 +0000 (Wed, 01 Apr 2015)");
//! assert_eq!(
//!     info.get(CERTINFO_KEY_SHA1_DIGEST),
//!     Some("76f7ac3689f5eb1b9761de5e1941810dd5a95349")
//! );
//! for (key, value) in info.iter() {
//!     println!("{}: {}", key, value);
//! }
//! # }
//! ```
//!
//! Errors tell which field could not be decoded. When the failure comes from the DER
//! encoding itself, the reason is available as the error source:
//!
//! ```rust
//! use svn_x509::{parse_certificate, Asn1Error, X509Error};
//!
//! static DER: &[u8] = include_bytes!("../assets/example-v3.der");
//!
//! let res = parse_certificate(&DER[..DER.len() - 1]);
//! assert_eq!(res, Err(X509Error::InvalidFormat(Some(Asn1Error::OutOfData))));
//! ```
//!
//! See also `demos/print-certinfo.rs`.
//!
//! # Features
//!
//! - The `serde` feature derives `Serialize` and `Deserialize` for [`CertInfo`].
//!
//! [RFC5280]: https://tools.ietf.org/html/rfc5280

#![deny(/*missing_docs,*/
        unstable_features,
        unused_import_braces, unused_qualifications)]
#![warn(
    missing_debug_implementations,
    /* missing_docs,
    rust_2018_idioms,*/
    unreachable_pub
)]
#![forbid(unsafe_code)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod der;
pub mod error;
pub mod objects;
pub mod utils;
pub mod x509;

mod certificate;
mod certinfo;
mod time;

pub use crate::certificate::*;
pub use crate::certinfo::*;
pub use crate::der::Tag;
pub use crate::error::{Asn1Error, StringConversionError, X509Error};
pub use crate::time::ASN1Time;
pub use crate::x509::{AlgorithmIdentifier, X509Name, X509Version};
