// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Parses a `pkiMessage` back into its SCEP attributes, verifying each
//! `SignerInfo` against whatever certificates are attached to the message or
//! supplied by the caller as trust anchors, and (on request) decrypts its
//! `pkcsPKIEnvelope`.

use scep_asn1::cms;
use scep_asn1::common::RawTlv;
use scep_asn1::oid;
use scep_asn1::scep_attrs::{FailInfo, MessageType, PkiStatus};
use scep_crypto::{CryptoProvider, DigestAlgorithm};
use scep_key_parsing::{Certificate, RsaPrivateKey};

use crate::algid;
use crate::error::ScepError;
use crate::signer::SignerIdentifierKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Bytes were decoded; at least one `SignerInfo` could not be matched
    /// to a known certificate (so its signature was never checked).
    Parsed,
    /// Every `SignerInfo` present was matched and its signature verified.
    Verified,
    /// `decrypt_envelope` has additionally succeeded.
    Decrypted,
}

#[derive(Debug, Clone)]
pub struct SignerRecord {
    pub identifier: SignerIdentifierKind,
    pub digest_algorithm: DigestAlgorithm,
    pub verified: bool,
}

pub struct ParsedMessage {
    pub transaction_id: Option<String>,
    pub message_type: Option<MessageType>,
    pub pki_status: Option<PkiStatus>,
    pub fail_info: Option<FailInfo>,
    pub sender_nonce: Option<Vec<u8>>,
    pub recipient_nonce: Option<Vec<u8>>,
    pub certificates: Vec<Certificate>,
    pub signers: Vec<SignerRecord>,
    pub unrecognized_attributes: Vec<(String, Vec<u8>)>,
    pki_envelope: Option<Vec<u8>>,
    state: ParserState,
}

impl ParsedMessage {
    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn pki_envelope(&self) -> Option<&[u8]> {
        self.pki_envelope.as_deref()
    }

    /// Decrypts the message's `pkcsPKIEnvelope` using `recipient_key`,
    /// matching `recipient_cert` against the envelope's `RecipientInfo`s by
    /// `IssuerAndSerialNumber`. Returns the plaintext content (a PKCS#10
    /// request, or a degenerate certificate bag, depending on message type).
    pub fn decrypt_envelope(
        &mut self,
        provider: &dyn CryptoProvider,
        recipient_cert: &Certificate,
        recipient_key: &RsaPrivateKey,
    ) -> Result<Vec<u8>, ScepError> {
        let envelope_der = self
            .pki_envelope
            .as_ref()
            .ok_or(ScepError::MissingAttribute("pkiEnvelope"))?;

        let outer = asn1::parse_single::<cms::ContentInfo<'_>>(envelope_der)?;
        let enveloped = match outer.content {
            cms::Content::EnvelopedData(e) => e,
            _ => return Err(ScepError::UnexpectedContentType("EnvelopedData")),
        };

        let mut matched_encrypted_key = None;
        for info in enveloped.recipient_infos.unwrap_read().clone() {
            let info_issuer_der = asn1::write_single(&info.issuer_and_serial_number.issuer)?;
            let info_serial = info.issuer_and_serial_number.serial_number.as_bytes();
            if info_issuer_der == recipient_cert.issuer() && info_serial == recipient_cert.serial()
            {
                matched_encrypted_key = Some(info.encrypted_key.to_vec());
                break;
            }
        }
        let encrypted_key = matched_encrypted_key.ok_or(ScepError::NoMatchingRecipient)?;

        let wrapped_key = provider
            .rsa_decrypt_pkcs1(recipient_key, &encrypted_key)
            .map_err(|_| ScepError::DecryptionFailed)?;

        let (alg, iv) = algid::content_encryption_algorithm_from_identifier(
            &enveloped.encrypted_content_info.content_encryption_algorithm,
        )?;
        let ciphertext = enveloped
            .encrypted_content_info
            .encrypted_content
            .ok_or(ScepError::MissingAttribute("encryptedContent"))?;

        let plaintext = provider
            .cbc_decrypt(alg, &wrapped_key, iv, ciphertext)
            .map_err(|_| ScepError::DecryptionFailed)?;

        log::debug!("parser state: {:?} -> Decrypted", self.state);
        self.state = ParserState::Decrypted;
        Ok(plaintext.to_vec())
    }
}

fn single_attribute_value<'a>(
    attrs: &[cms::Attribute<'a>],
    target: &asn1::ObjectIdentifier,
) -> Option<RawTlv<'a>> {
    attrs
        .iter()
        .find(|attr| &attr.type_id == target)
        .and_then(|attr| attr.values.unwrap_read().clone().next())
}

fn parse_printable_string(tlv: &RawTlv<'_>) -> Result<String, ScepError> {
    let der = asn1::write_single(tlv)?;
    let ps = asn1::parse_single::<asn1::PrintableString<'_>>(&der)?;
    Ok(ps.as_str().to_string())
}

fn parse_octet_string<'a>(tlv: &RawTlv<'a>) -> Result<Vec<u8>, ScepError> {
    let der = asn1::write_single(tlv)?;
    Ok(asn1::parse_single::<&'a [u8]>(&der)?.to_vec())
}

/// Parses and verifies a `pkiMessage`. `extra_certificates` supplies trust
/// anchors (typically the RA/CA certificate) not necessarily attached to
/// the message itself; certificates embedded in the message are also
/// considered when matching a `SignerInfo`'s `IssuerAndSerialNumber`.
pub fn parse_pki_message(
    provider: &dyn CryptoProvider,
    der: &[u8],
    extra_certificates: &[&Certificate],
) -> Result<ParsedMessage, ScepError> {
    let outer = asn1::parse_single::<cms::ContentInfo<'_>>(der)?;
    let signed_data = match outer.content {
        cms::Content::SignedData(sd) => *sd,
        _ => return Err(ScepError::UnexpectedContentType("SignedData")),
    };

    let mut certificates = Vec::new();
    if let Some(cert_set) = &signed_data.certificates {
        for tlv in cert_set.unwrap_read().clone() {
            let cert_der = asn1::write_single(&tlv)?;
            certificates.push(scep_key_parsing::load_der_x509_certificate(&cert_der)?);
        }
    }

    let pki_envelope = match signed_data.content_info.content {
        cms::Content::Data(opt) => opt.map(|b| b.to_vec()),
        _ => return Err(ScepError::UnexpectedContentType("Data")),
    };

    let signer_infos: Vec<cms::SignerInfo<'_>> =
        signed_data.signer_infos.unwrap_read().clone().collect();
    if signer_infos.is_empty() {
        return Err(ScepError::MissingAttribute("signerInfos"));
    }

    let known_oids = [
        oid::CONTENT_TYPE_OID,
        oid::MESSAGE_DIGEST_OID,
        oid::SCEP_MESSAGE_TYPE_OID,
        oid::SCEP_PKI_STATUS_OID,
        oid::SCEP_FAIL_INFO_OID,
        oid::SCEP_SENDER_NONCE_OID,
        oid::SCEP_RECIPIENT_NONCE_OID,
        oid::SCEP_TRANSACTION_ID_OID,
    ];

    let mut message_type = None;
    let mut pki_status = None;
    let mut fail_info = None;
    let mut sender_nonce = None;
    let mut recipient_nonce = None;
    let mut transaction_id = None;
    let mut signers = Vec::new();
    let mut unrecognized_attributes = Vec::new();
    let mut any_verified = false;
    let mut any_unverified = false;

    for si in &signer_infos {
        let attrs: Vec<cms::Attribute<'_>> = si
            .authenticated_attributes
            .as_ref()
            .ok_or(ScepError::MissingAttribute("authenticatedAttributes"))?
            .unwrap_read()
            .clone()
            .collect();

        for attr in &attrs {
            if !known_oids.contains(&attr.type_id) {
                if let Some(value) = attr.values.unwrap_read().clone().next() {
                    unrecognized_attributes
                        .push((format!("{:?}", attr.type_id), value.data().to_vec()));
                }
            }
        }

        let digest_algorithm = algid::digest_algorithm_from_identifier(&si.digest_algorithm)?;
        algid::require_rsa_encryption_signature_algorithm(&si.digest_encryption_algorithm)?;

        if let Some(tlv) = single_attribute_value(&attrs, &oid::SCEP_MESSAGE_TYPE_OID) {
            let s = parse_printable_string(&tlv)?;
            let code: u8 = s
                .parse()
                .map_err(|_| ScepError::InvalidAttributeValue("messageType"))?;
            message_type = MessageType::from_code(code);
        }
        if let Some(tlv) = single_attribute_value(&attrs, &oid::SCEP_PKI_STATUS_OID) {
            let s = parse_printable_string(&tlv)?;
            let code: u8 = s
                .parse()
                .map_err(|_| ScepError::InvalidAttributeValue("pkiStatus"))?;
            pki_status = PkiStatus::from_code(code);
        }
        if let Some(tlv) = single_attribute_value(&attrs, &oid::SCEP_FAIL_INFO_OID) {
            let s = parse_printable_string(&tlv)?;
            let code: u8 = s
                .parse()
                .map_err(|_| ScepError::InvalidAttributeValue("failInfo"))?;
            fail_info = FailInfo::from_code(code);
        }
        if let Some(tlv) = single_attribute_value(&attrs, &oid::SCEP_SENDER_NONCE_OID) {
            sender_nonce = Some(parse_octet_string(&tlv)?);
        }
        if let Some(tlv) = single_attribute_value(&attrs, &oid::SCEP_RECIPIENT_NONCE_OID) {
            recipient_nonce = Some(parse_octet_string(&tlv)?);
        }
        if let Some(tlv) = single_attribute_value(&attrs, &oid::SCEP_TRANSACTION_ID_OID) {
            transaction_id = Some(parse_printable_string(&tlv)?);
        }

        let message_digest = single_attribute_value(&attrs, &oid::MESSAGE_DIGEST_OID)
            .ok_or(ScepError::MissingAttribute("messageDigest"))
            .and_then(|tlv| parse_octet_string(&tlv))?;

        let digest_input: &[u8] = pki_envelope.as_deref().unwrap_or(&[]);
        let recomputed = provider.digest(digest_algorithm, digest_input)?;
        if recomputed != message_digest {
            log::warn!("messageDigest mismatch while parsing pkiMessage");
            return Err(ScepError::BadSignature);
        }

        let signing_input = asn1::write_single(&asn1::SetOfWriter::new(attrs.clone()))?;

        match &si.issuer_and_serial_number {
            cms::SignerIdentifier::IssuerAndSerialNumber(ias) => {
                let issuer_der = asn1::write_single(&ias.issuer)?;
                let serial = ias.serial_number.as_bytes().to_vec();

                let matched = certificates
                    .iter()
                    .chain(extra_certificates.iter().copied())
                    .find(|c| c.issuer() == issuer_der.as_slice() && c.serial() == serial.as_slice());

                match matched {
                    Some(cert) => {
                        let ok = provider.rsa_verify_pkcs1(
                            cert.public_key(),
                            digest_algorithm,
                            &signing_input,
                            si.encrypted_digest,
                        )?;
                        if !ok {
                            log::warn!("signature verification failed while parsing pkiMessage");
                            return Err(ScepError::BadSignature);
                        }
                        any_verified = true;
                        signers.push(SignerRecord {
                            identifier: SignerIdentifierKind::IssuerAndSerialNumber {
                                issuer: issuer_der,
                                serial,
                            },
                            digest_algorithm,
                            verified: true,
                        });
                    }
                    None => {
                        any_unverified = true;
                        signers.push(SignerRecord {
                            identifier: SignerIdentifierKind::IssuerAndSerialNumber {
                                issuer: issuer_der,
                                serial,
                            },
                            digest_algorithm,
                            verified: false,
                        });
                    }
                }
            }
            cms::SignerIdentifier::SubjectKeyIdentifier(ski) => {
                // This crate never builds outbound messages using
                // SubjectKeyIdentifier and has no SKI-indexed certificate
                // store to match against; record it as an unverified
                // signer rather than refuse to parse the message.
                any_unverified = true;
                signers.push(SignerRecord {
                    identifier: SignerIdentifierKind::SubjectKeyIdentifier(ski.to_vec()),
                    digest_algorithm,
                    verified: false,
                });
            }
        }
    }

    let state = if any_verified && !any_unverified {
        ParserState::Verified
    } else {
        ParserState::Parsed
    };
    log::debug!("parser state: Decoded -> {:?}", state);

    Ok(ParsedMessage {
        transaction_id,
        message_type,
        pki_status,
        fail_info,
        sender_nonce,
        recipient_nonce,
        certificates,
        signers,
        unrecognized_attributes,
        pki_envelope,
        state,
    })
}
