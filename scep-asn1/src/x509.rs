// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Just enough of RFC 5280's `Certificate`/`TBSCertificate` grammar to pull
//! the `issuer` Name and `serialNumber` out of a DER-encoded certificate
//! bit-exactly, for building `IssuerAndSerialNumber` values. `Name`,
//! `Validity` and `extensions` are carried opaquely: nothing downstream of
//! this crate needs to interpret them, only to reproduce their bytes.

use crate::common::{AlgorithmIdentifier, RawTlv, SubjectPublicKeyInfo};

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct Certificate<'a> {
    pub tbs_cert: TbsCertificate<'a>,
    pub signature_algorithm: AlgorithmIdentifier<'a>,
    pub signature_value: asn1::BitString<'a>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct TbsCertificate<'a> {
    #[explicit(0)]
    #[default(0u8)]
    pub version: u8,
    pub serial_number: asn1::BigInt<'a>,
    pub signature_alg: AlgorithmIdentifier<'a>,
    pub issuer: RawTlv<'a>,
    pub validity: RawTlv<'a>,
    pub subject: RawTlv<'a>,
    pub spki: SubjectPublicKeyInfo<'a>,
    #[implicit(1)]
    pub issuer_unique_id: Option<asn1::BitString<'a>>,
    #[implicit(2)]
    pub subject_unique_id: Option<asn1::BitString<'a>>,
    #[explicit(3)]
    pub extensions: Option<RawTlv<'a>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_number_round_trips_through_bigint() {
        // A single-byte non-negative serial number must round-trip without
        // leading-zero padding being added or removed.
        let num = asn1::BigInt::new(b"\x01").unwrap();
        let der = asn1::write_single(&num).unwrap();
        let parsed = asn1::parse_single::<asn1::BigInt<'_>>(&der).unwrap();
        assert_eq!(parsed.as_bytes(), num.as_bytes());
    }
}
