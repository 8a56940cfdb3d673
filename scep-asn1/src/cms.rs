// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The slice of RFC 5652 (CMS) / RFC 2315 (PKCS#7) that a SCEP `pkiMessage`
//! is built out of: `ContentInfo` wrapping either a degenerate or genuine
//! `SignedData`, or an `EnvelopedData`. Recipient and signer identification
//! is restricted to what SCEP actually uses: key-transport recipient infos
//! and issuer-and-serial-number / subject-key-identifier signer ids.

use crate::common::{AlgorithmIdentifier, Asn1ReadableOrWritable, RawTlv};
use crate::oid;

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct ContentInfo<'a> {
    pub _content_type: asn1::DefinedByMarker<asn1::ObjectIdentifier>,
    #[explicit(0)]
    #[defined_by(_content_type)]
    pub content: Content<'a>,
}

#[derive(asn1::Asn1DefinedByRead, asn1::Asn1DefinedByWrite, Clone)]
pub enum Content<'a> {
    #[defined_by(oid::PKCS7_DATA_OID)]
    Data(Option<&'a [u8]>),
    #[defined_by(oid::PKCS7_SIGNED_DATA_OID)]
    SignedData(Box<SignedData<'a>>),
    #[defined_by(oid::PKCS7_ENVELOPED_DATA_OID)]
    EnvelopedData(Box<EnvelopedData<'a>>),
}

pub type DigestAlgorithms<'a> =
    Asn1ReadableOrWritable<'a, asn1::SetOf<'a, AlgorithmIdentifier<'a>>, asn1::SetOfWriter<'a, AlgorithmIdentifier<'a>, Vec<AlgorithmIdentifier<'a>>>>;

pub type SignerInfos<'a> =
    Asn1ReadableOrWritable<'a, asn1::SetOf<'a, SignerInfo<'a>>, asn1::SetOfWriter<'a, SignerInfo<'a>, Vec<SignerInfo<'a>>>>;

pub type CertificateSet<'a> =
    Asn1ReadableOrWritable<'a, asn1::SetOf<'a, RawTlv<'a>>, asn1::SetOfWriter<'a, RawTlv<'a>, Vec<RawTlv<'a>>>>;

pub type RecipientInfos<'a> =
    Asn1ReadableOrWritable<'a, asn1::SetOf<'a, RecipientInfo<'a>>, asn1::SetOfWriter<'a, RecipientInfo<'a>, Vec<RecipientInfo<'a>>>>;

pub type AttributeValues<'a> =
    Asn1ReadableOrWritable<'a, asn1::SetOf<'a, RawTlv<'a>>, asn1::SetOfWriter<'a, RawTlv<'a>, Vec<RawTlv<'a>>>>;

pub type SignedAttributes<'a> =
    Asn1ReadableOrWritable<'a, asn1::SetOf<'a, Attribute<'a>>, asn1::SetOfWriter<'a, Attribute<'a>, Vec<Attribute<'a>>>>;

/// A degenerate `SignedData` (per RFC 2315 §9.1) carries no signers and no
/// encapsulated content, only a bag of certificates. A genuine `SignedData`
/// (the outer layer of a `pkiMessage`) carries exactly one `SignerInfo`.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct SignedData<'a> {
    pub version: u8,
    pub digest_algorithms: DigestAlgorithms<'a>,
    pub content_info: ContentInfo<'a>,
    #[implicit(0)]
    pub certificates: Option<CertificateSet<'a>>,
    #[implicit(1)]
    pub crls: Option<CertificateSet<'a>>,
    pub signer_infos: SignerInfos<'a>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct IssuerAndSerialNumber<'a> {
    pub issuer: RawTlv<'a>,
    pub serial_number: asn1::BigInt<'a>,
}

/// `SignerIdentifier ::= CHOICE { issuerAndSerialNumber, subjectKeyIdentifier [0] }`.
/// Outbound messages built by this crate always use
/// `IssuerAndSerialNumber`; `SubjectKeyIdentifier` is accepted on parse
/// because some deployed SCEP clients emit it.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub enum SignerIdentifier<'a> {
    IssuerAndSerialNumber(IssuerAndSerialNumber<'a>),
    #[implicit(0)]
    SubjectKeyIdentifier(&'a [u8]),
}

/// `Attribute ::= SEQUENCE { type OBJECT IDENTIFIER, values SET OF ANY }`.
/// Values are carried as opaque TLVs: the SCEP attribute decoders
/// (`scep_attrs`) interpret the bytes of the single element each SCEP
/// attribute is defined to carry.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct Attribute<'a> {
    pub type_id: asn1::ObjectIdentifier,
    pub values: AttributeValues<'a>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct SignerInfo<'a> {
    pub version: u8,
    pub issuer_and_serial_number: SignerIdentifier<'a>,
    pub digest_algorithm: AlgorithmIdentifier<'a>,
    #[implicit(0)]
    pub authenticated_attributes: Option<SignedAttributes<'a>>,
    pub digest_encryption_algorithm: AlgorithmIdentifier<'a>,
    pub encrypted_digest: &'a [u8],
    #[implicit(1)]
    pub unauthenticated_attributes: Option<SignedAttributes<'a>>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct EnvelopedData<'a> {
    pub version: u8,
    pub recipient_infos: RecipientInfos<'a>,
    pub encrypted_content_info: EncryptedContentInfo<'a>,
}

/// `RecipientInfo` restricted to `KeyTransRecipientInfo`: SCEP never uses
/// key-agreement or KEK recipient infos.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct RecipientInfo<'a> {
    pub version: u8,
    pub issuer_and_serial_number: IssuerAndSerialNumber<'a>,
    pub key_encryption_algorithm: AlgorithmIdentifier<'a>,
    pub encrypted_key: &'a [u8],
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct EncryptedContentInfo<'a> {
    pub content_type: asn1::ObjectIdentifier,
    pub content_encryption_algorithm: AlgorithmIdentifier<'a>,
    #[implicit(0)]
    pub encrypted_content: Option<&'a [u8]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_and_serial_number_round_trip() {
        let issuer = RawTlv::new(asn1::Tag::from_bytes(&[0x30]).unwrap().0, b"\x30\x00");
        let serial = asn1::BigInt::new(b"\x01").unwrap();
        let ias = IssuerAndSerialNumber {
            issuer,
            serial_number: serial,
        };
        let der = asn1::write_single(&ias).unwrap();
        let parsed = asn1::parse_single::<IssuerAndSerialNumber<'_>>(&der).unwrap();
        assert_eq!(parsed.serial_number.as_bytes(), b"\x01");
    }
}
