// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Builds the outer `SignedData` of a `pkiMessage`: the six SCEP signed
//! attributes plus `contentType`/`messageDigest`, one `SignerInfo` per
//! accumulated signer (all signing the same attribute set), and an
//! `encapContentInfo` carrying the (optional) `pkcsPKIEnvelope` bytes
//! produced by [`crate::envelope::EnvelopeBuilder`] or
//! [`crate::degenerate::wrap_degenerate_certs`].

use scep_asn1::cms;
use scep_asn1::common;
use scep_asn1::oid;
use scep_asn1::scep_attrs::{FailInfo, MessageType, PkiStatus};
use scep_crypto::CryptoProvider;
use scep_key_parsing::Certificate;

use crate::algid;
use crate::asn1_util::{big_int_from_bytes, raw_tlv_from_der};
use crate::error::ScepError;
use crate::signer::Signer;

fn printable_string_der(s: &str) -> Result<Vec<u8>, ScepError> {
    let ps = asn1::PrintableString::new(s)
        .ok_or(ScepError::InvalidAttributeValue("not a valid PrintableString"))?;
    Ok(asn1::write_single(&ps)?)
}

fn attribute_from_der(oid: asn1::ObjectIdentifier, value_der: &[u8]) -> Result<cms::Attribute<'_>, ScepError> {
    let tlv = raw_tlv_from_der(value_der)?;
    Ok(cms::Attribute {
        type_id: oid,
        values: common::Asn1ReadableOrWritable::new_write(asn1::SetOfWriter::new(vec![tlv])),
    })
}

pub struct MessageBuilder<'a, 'p> {
    message_type: Option<MessageType>,
    pki_status: Option<PkiStatus>,
    fail_info: Option<FailInfo>,
    sender_nonce: Option<Vec<u8>>,
    recipient_nonce: Option<Vec<u8>>,
    transaction_id: Option<String>,
    pki_envelope: Option<&'a [u8]>,
    certificates: Vec<&'a Certificate>,
    signers: Vec<Signer<'a>>,
    provider: &'p dyn CryptoProvider,
}

impl<'a, 'p> MessageBuilder<'a, 'p> {
    pub fn new(provider: &'p dyn CryptoProvider) -> Self {
        MessageBuilder {
            message_type: None,
            pki_status: None,
            fail_info: None,
            sender_nonce: None,
            recipient_nonce: None,
            transaction_id: None,
            pki_envelope: None,
            certificates: Vec::new(),
            signers: Vec::new(),
            provider,
        }
    }

    pub fn message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = Some(message_type);
        self
    }

    pub fn pki_status(mut self, status: PkiStatus) -> Self {
        self.pki_status = Some(status);
        self
    }

    pub fn fail_info(mut self, fail_info: FailInfo) -> Self {
        self.fail_info = Some(fail_info);
        self
    }

    /// If not called, `finalize` generates 16 random bytes.
    pub fn sender_nonce(mut self, nonce: Vec<u8>) -> Self {
        self.sender_nonce = Some(nonce);
        self
    }

    pub fn recipient_nonce(mut self, nonce: Vec<u8>) -> Self {
        self.recipient_nonce = Some(nonce);
        self
    }

    /// If not called, `finalize` generates a random UUIDv4 string.
    pub fn transaction_id(mut self, transaction_id: String) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    pub fn pki_envelope(mut self, envelope: &'a [u8]) -> Self {
        self.pki_envelope = Some(envelope);
        self
    }

    pub fn certificates(mut self, certs: impl IntoIterator<Item = &'a Certificate>) -> Self {
        self.certificates.extend(certs);
        self
    }

    /// Accumulates a signer. SCEP limits a message to a single shared digest
    /// algorithm across all its signers; `finalize` rejects a mix with
    /// [`ScepError::MixedDigestAlgorithms`].
    pub fn signer(mut self, signer: Signer<'a>) -> Self {
        self.signers.push(signer);
        self
    }

    pub fn finalize(self) -> Result<Vec<u8>, ScepError> {
        if self.signers.is_empty() {
            return Err(ScepError::MissingSigner);
        }
        let digest_algorithm = self.signers[0].digest_algorithm();
        if self
            .signers
            .iter()
            .any(|s| s.digest_algorithm() != digest_algorithm)
        {
            return Err(ScepError::MixedDigestAlgorithms);
        }
        let message_type = self
            .message_type
            .ok_or(ScepError::MissingAttribute("messageType"))?;

        if let Some(PkiStatus::Failure) = self.pki_status {
            if self.fail_info.is_none() {
                return Err(ScepError::MissingFailInfo);
            }
        }

        let sender_nonce = match self.sender_nonce {
            Some(nonce) => nonce,
            None => {
                let mut nonce = vec![0u8; 16];
                self.provider.random_bytes(&mut nonce)?;
                nonce
            }
        };
        let transaction_id = self
            .transaction_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        log::debug!(
            "building pkiMessage: type={:?} status={:?} txn={} signers={}",
            message_type,
            self.pki_status,
            transaction_id,
            self.signers.len()
        );
        if matches!(self.pki_status, Some(PkiStatus::Failure)) {
            log::warn!(
                "building FAILURE pkiMessage txn={} failInfo={:?}",
                transaction_id,
                self.fail_info
            );
        }

        let digest_input: &[u8] = self.pki_envelope.unwrap_or(&[]);
        let digest = self.provider.digest(digest_algorithm, digest_input)?;

        let mut oids: Vec<asn1::ObjectIdentifier> = Vec::new();
        let mut value_bufs: Vec<Vec<u8>> = Vec::new();

        oids.push(oid::CONTENT_TYPE_OID);
        value_bufs.push(asn1::write_single(&oid::PKCS7_DATA_OID)?);

        oids.push(oid::MESSAGE_DIGEST_OID);
        value_bufs.push(asn1::write_single(&digest.as_slice())?);

        oids.push(oid::SCEP_MESSAGE_TYPE_OID);
        value_bufs.push(printable_string_der(&message_type.code().to_string())?);

        if let Some(status) = self.pki_status {
            oids.push(oid::SCEP_PKI_STATUS_OID);
            value_bufs.push(printable_string_der(&status.code().to_string())?);
        }

        if let Some(fail_info) = self.fail_info {
            oids.push(oid::SCEP_FAIL_INFO_OID);
            value_bufs.push(printable_string_der(&fail_info.code().to_string())?);
        }

        oids.push(oid::SCEP_SENDER_NONCE_OID);
        value_bufs.push(asn1::write_single(&sender_nonce.as_slice())?);

        if let Some(recipient_nonce) = &self.recipient_nonce {
            oids.push(oid::SCEP_RECIPIENT_NONCE_OID);
            value_bufs.push(asn1::write_single(&recipient_nonce.as_slice())?);
        }

        oids.push(oid::SCEP_TRANSACTION_ID_OID);
        value_bufs.push(printable_string_der(&transaction_id)?);

        let attrs = oids
            .iter()
            .zip(value_bufs.iter())
            .map(|(oid, der)| attribute_from_der(*oid, der))
            .collect::<Result<Vec<_>, _>>()?;

        // The bytes actually signed are the attributes re-encoded with the
        // universal SET OF tag, per RFC 5652 §5.4 -- not the `[0] IMPLICIT`
        // tag used when they're embedded in each SignerInfo below.
        let signing_input = asn1::write_single(&asn1::SetOfWriter::new(attrs.clone()))?;

        // Compute every signature into an owned buffer before building any
        // SignerInfo, so the bytes each one borrows outlive it.
        let mut signatures = Vec::with_capacity(self.signers.len());
        for signer in &self.signers {
            signatures.push(self.provider.rsa_sign_pkcs1(
                signer.private_key,
                digest_algorithm,
                &signing_input,
            )?);
        }

        let mut signer_infos = Vec::with_capacity(self.signers.len());
        for (signer, signature) in self.signers.iter().zip(signatures.iter()) {
            let cert = signer.certificate();
            let signer_identifier =
                cms::SignerIdentifier::IssuerAndSerialNumber(cms::IssuerAndSerialNumber {
                    issuer: raw_tlv_from_der(cert.issuer())?,
                    serial_number: big_int_from_bytes(cert.serial())?,
                });

            signer_infos.push(cms::SignerInfo {
                version: 1,
                issuer_and_serial_number: signer_identifier,
                digest_algorithm: algid::digest_algorithm_identifier(digest_algorithm),
                authenticated_attributes: Some(common::Asn1ReadableOrWritable::new_write(
                    asn1::SetOfWriter::new(attrs.clone()),
                )),
                digest_encryption_algorithm: algid::signature_algorithm_identifier(),
                encrypted_digest: signature,
                unauthenticated_attributes: None,
            });
        }

        let inner_content_info = cms::ContentInfo {
            _content_type: asn1::DefinedByMarker::marker(),
            content: cms::Content::Data(self.pki_envelope),
        };

        let certificates = if self.certificates.is_empty() {
            None
        } else {
            let tlvs = self
                .certificates
                .iter()
                .map(|c| raw_tlv_from_der(c.der()))
                .collect::<Result<Vec<_>, _>>()?;
            Some(common::Asn1ReadableOrWritable::new_write(
                asn1::SetOfWriter::new(tlvs),
            ))
        };

        let signed_data = cms::SignedData {
            version: 1,
            digest_algorithms: common::Asn1ReadableOrWritable::new_write(asn1::SetOfWriter::new(
                vec![algid::digest_algorithm_identifier(digest_algorithm)],
            )),
            content_info: inner_content_info,
            certificates,
            crls: None,
            signer_infos: common::Asn1ReadableOrWritable::new_write(asn1::SetOfWriter::new(
                signer_infos,
            )),
        };

        let content_info = cms::ContentInfo {
            _content_type: asn1::DefinedByMarker::marker(),
            content: cms::Content::SignedData(Box::new(signed_data)),
        };

        Ok(asn1::write_single(&content_info)?)
    }
}
