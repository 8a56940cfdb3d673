// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Object identifiers used in SCEP `pkiMessage` construction and parsing:
//! digest and signature algorithms, content-encryption algorithms, PKCS#7/CMS
//! content types, the CMS authenticated attributes, and SCEP's own six
//! custom attributes (all under `1.2.840.113733.1.9`, the
//! `id-VeriSign-scep` arc).

pub const SHA1_OID: asn1::ObjectIdentifier = asn1::oid!(1, 3, 14, 3, 2, 26);
pub const SHA256_OID: asn1::ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 101, 3, 4, 2, 1);
pub const SHA512_OID: asn1::ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 101, 3, 4, 2, 3);

pub const RSA_ENCRYPTION_OID: asn1::ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 1);
pub const RSA_WITH_SHA1_OID: asn1::ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 5);
pub const RSA_WITH_SHA256_OID: asn1::ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 11);
pub const RSA_WITH_SHA512_OID: asn1::ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 13);

pub const DES_EDE3_CBC_OID: asn1::ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 3, 7);
pub const AES_128_CBC_OID: asn1::ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 101, 3, 4, 1, 2);
pub const AES_192_CBC_OID: asn1::ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 101, 3, 4, 1, 22);
pub const AES_256_CBC_OID: asn1::ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 101, 3, 4, 1, 42);

// PKCS#7 / CMS content types.
pub const PKCS7_DATA_OID: asn1::ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 7, 1);
pub const PKCS7_SIGNED_DATA_OID: asn1::ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 7, 2);
pub const PKCS7_ENVELOPED_DATA_OID: asn1::ObjectIdentifier =
    asn1::oid!(1, 2, 840, 113549, 1, 7, 3);

// CMS/PKCS#9 authenticated attributes.
pub const CONTENT_TYPE_OID: asn1::ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 9, 3);
pub const MESSAGE_DIGEST_OID: asn1::ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 9, 4);

// SCEP's own attributes, under the `id-VeriSign-scep` arc
// `1.2.840.113733.1.9`.
pub const SCEP_MESSAGE_TYPE_OID: asn1::ObjectIdentifier =
    asn1::oid!(2, 16, 840, 1, 113733, 1, 9, 2);
pub const SCEP_PKI_STATUS_OID: asn1::ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 113733, 1, 9, 3);
pub const SCEP_FAIL_INFO_OID: asn1::ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 113733, 1, 9, 4);
pub const SCEP_SENDER_NONCE_OID: asn1::ObjectIdentifier =
    asn1::oid!(2, 16, 840, 1, 113733, 1, 9, 5);
pub const SCEP_RECIPIENT_NONCE_OID: asn1::ObjectIdentifier =
    asn1::oid!(2, 16, 840, 1, 113733, 1, 9, 6);
pub const SCEP_TRANSACTION_ID_OID: asn1::ObjectIdentifier =
    asn1::oid!(2, 16, 840, 1, 113733, 1, 9, 7);
