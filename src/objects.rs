//! Attribute type labels used when displaying X.509 names
//!
//! OIDs are matched on their DER content bytes: an attribute family is identified by a fixed
//! prefix, and the attribute by the byte following this prefix.
//!
//! Note: only the labels needed to display subject and issuer names are registered here.

use lazy_static::lazy_static;
use std::borrow::Cow;
use std::collections::HashMap;

/// X.520 attribute types, `2.5.4`
pub const OID_X520: &[u8] = &[0x55, 0x04];
/// PKCS#9 attributes, `1.2.840.113549.1.9`
pub const OID_PKCS9: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09];

pub const X520_COMMON_NAME: u8 = 3;
pub const X520_COUNTRY: u8 = 6;
pub const X520_LOCALITY: u8 = 7;
pub const X520_STATE: u8 = 8;
pub const X520_ORGANIZATION: u8 = 10;
pub const X520_ORG_UNIT: u8 = 11;

pub const PKCS9_EMAIL: u8 = 1;

struct AttributeFamily {
    prefix: &'static [u8],
    labels: HashMap<u8, &'static str>,
}

lazy_static! {
    static ref ATTRIBUTE_FAMILIES: [AttributeFamily; 2] = {
        let mut x520 = HashMap::new();
        x520.insert(X520_COMMON_NAME, "CN");
        x520.insert(X520_COUNTRY, "C");
        x520.insert(X520_LOCALITY, "L");
        x520.insert(X520_STATE, "ST");
        x520.insert(X520_ORGANIZATION, "O");
        x520.insert(X520_ORG_UNIT, "OU");
        //
        let mut pkcs9 = HashMap::new();
        pkcs9.insert(PKCS9_EMAIL, "emailAddress");
        [
            AttributeFamily {
                prefix: OID_X520,
                labels: x520,
            },
            AttributeFamily {
                prefix: OID_PKCS9,
                labels: pkcs9,
            },
        ]
    };
}

/// Returns the label of an attribute type, given the DER content of its OID.
///
/// Known attributes get their short name (`CN`, `O`, `emailAddress`, ...). Other attributes
/// of a known family are labelled with the attribute byte in hex (`0x2A`). Attributes of an
/// unknown family are labelled with the last byte of the OID.
pub fn attribute_label(oid: &[u8]) -> Cow<'static, str> {
    for family in ATTRIBUTE_FAMILIES.iter() {
        if oid.starts_with(family.prefix) {
            if let Some(&b) = oid.get(family.prefix.len()) {
                return match family.labels.get(&b) {
                    Some(&label) => Cow::Borrowed(label),
                    None => Cow::Owned(format!("0x{:02X}", b)),
                };
            }
        }
    }
    match oid.last() {
        Some(b) => Cow::Owned(format!("0x{:02X}", b)),
        None => Cow::Borrowed("??"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_x520_labels() {
        assert_eq!(attribute_label(&hex!("55 04 03")), "CN");
        assert_eq!(attribute_label(&hex!("55 04 06")), "C");
        assert_eq!(attribute_label(&hex!("55 04 07")), "L");
        assert_eq!(attribute_label(&hex!("55 04 08")), "ST");
        assert_eq!(attribute_label(&hex!("55 04 0a")), "O");
        assert_eq!(attribute_label(&hex!("55 04 0b")), "OU");
        // serialNumber
        assert_eq!(attribute_label(&hex!("55 04 05")), "0x05");
    }

    #[test]
    fn test_pkcs9_labels() {
        assert_eq!(
            attribute_label(&hex!("2a 86 48 86 f7 0d 01 09 01")),
            "emailAddress"
        );
        // unstructuredName
        assert_eq!(attribute_label(&hex!("2a 86 48 86 f7 0d 01 09 02")), "0x02");
    }

    #[test]
    fn test_unknown_labels() {
        // domainComponent, 0.9.2342.19200300.100.1.25
        assert_eq!(
            attribute_label(&hex!("09 92 26 89 93 f2 2c 64 01 19")),
            "0x19"
        );
        // family prefix without attribute byte
        assert_eq!(attribute_label(&hex!("55 04")), "0x04");
        assert_eq!(attribute_label(&[]), "??");
    }
}
