// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use scep_asn1::common::RawTlv;

use crate::error::ScepError;

/// Re-parses a fully-encoded TLV (as returned by
/// `scep_key_parsing::Certificate::issuer`) back into a [`RawTlv`], so it can
/// be embedded as the `issuer` field of an `IssuerAndSerialNumber`.
pub fn raw_tlv_from_der(der: &[u8]) -> Result<RawTlv<'_>, ScepError> {
    Ok(asn1::parse_single::<RawTlv<'_>>(der)?)
}

/// Wraps the content octets of a previously-validated ASN.1 INTEGER (as
/// returned by `asn1::BigInt::as_bytes`) back into a `BigInt`.
pub fn big_int_from_bytes(bytes: &[u8]) -> Result<asn1::BigInt<'_>, ScepError> {
    asn1::BigInt::new(bytes).ok_or(ScepError::InvalidSerialNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_tlv_from_der_round_trips_an_empty_sequence() {
        // DER encoding of `SEQUENCE {}`.
        let seq_der = [0x30u8, 0x00];
        let tlv = raw_tlv_from_der(&seq_der).unwrap();
        assert_eq!(tlv.data(), b"");
    }

    #[test]
    fn test_big_int_from_bytes_round_trip() {
        let bytes = [0x01u8];
        let value = big_int_from_bytes(&bytes).unwrap();
        assert_eq!(value.as_bytes(), &bytes);
    }
}
