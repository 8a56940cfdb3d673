// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Builds the `EnvelopedData` that carries a `pkiMessage`'s encrypted
//! `pkcsPKIEnvelope`: a single randomly-generated content-encryption key and
//! IV, the content encrypted under it, and one `KeyTransRecipientInfo` per
//! recipient wrapping that key under the recipient's RSA public key.

use zeroize::Zeroizing;

use scep_asn1::cms;
use scep_asn1::common;
use scep_asn1::oid;
use scep_crypto::{ContentEncryptionAlgorithm, CryptoProvider};

use crate::algid;
use crate::asn1_util::{big_int_from_bytes, raw_tlv_from_der};
use crate::error::ScepError;
use crate::signer::Recipient;

/// The output of [`EnvelopeBuilder::finalize`]: the DER encoding of an
/// `EnvelopedData` value, plus the symmetric key and IV used to produce it
/// (a caller building a `pkiMessage` needs the key to later sign the
/// envelope's digest; it never appears in the output itself).
pub struct Envelope {
    pub der: Vec<u8>,
    pub symmetric_key: Zeroizing<Vec<u8>>,
    pub iv: Vec<u8>,
}

pub struct EnvelopeBuilder<'a, 'p> {
    content: Option<&'a [u8]>,
    algorithm: ContentEncryptionAlgorithm,
    recipients: Vec<Recipient<'a>>,
    provider: &'p dyn CryptoProvider,
}

impl<'a, 'p> EnvelopeBuilder<'a, 'p> {
    pub fn new(provider: &'p dyn CryptoProvider) -> Self {
        EnvelopeBuilder {
            content: None,
            // 3DES-CBC is the widest-compatibility default; SCEP peers as
            // old as NDES may not support AES.
            algorithm: ContentEncryptionAlgorithm::Des3Cbc,
            recipients: Vec::new(),
            provider,
        }
    }

    pub fn content(mut self, content: &'a [u8]) -> Self {
        self.content = Some(content);
        self
    }

    pub fn algorithm(mut self, algorithm: ContentEncryptionAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn add_recipient(mut self, recipient: Recipient<'a>) -> Self {
        self.recipients.push(recipient);
        self
    }

    pub fn finalize(self) -> Result<Envelope, ScepError> {
        let content = self.content.ok_or(ScepError::MissingContent)?;
        if self.recipients.is_empty() {
            return Err(ScepError::MissingRecipient);
        }

        let mut key = Zeroizing::new(vec![0u8; self.algorithm.key_len()]);
        let mut iv = vec![0u8; self.algorithm.iv_len()];
        self.provider.random_bytes(&mut key)?;
        self.provider.random_bytes(&mut iv)?;

        log::debug!(
            "encrypting {} bytes of content under {:?} for {} recipient(s)",
            content.len(),
            self.algorithm,
            self.recipients.len()
        );
        let ciphertext = self
            .provider
            .cbc_encrypt(self.algorithm, &key, &iv, content)?;

        // Wrap the content-encryption key under each recipient's RSA public
        // key before building any ASN.1 structures, so every byte buffer
        // that a `RecipientInfo` will borrow from outlives it.
        let mut wrapped_keys = Vec::with_capacity(self.recipients.len());
        for recipient in &self.recipients {
            let cert = recipient.certificate();
            let encrypted_key = self.provider.rsa_encrypt_pkcs1(cert.public_key(), &key)?;
            wrapped_keys.push((cert.issuer().to_vec(), cert.serial().to_vec(), encrypted_key));
        }

        let mut recipient_infos = Vec::with_capacity(wrapped_keys.len());
        for (issuer, serial, encrypted_key) in &wrapped_keys {
            recipient_infos.push(cms::RecipientInfo {
                version: 0,
                issuer_and_serial_number: cms::IssuerAndSerialNumber {
                    issuer: raw_tlv_from_der(issuer)?,
                    serial_number: big_int_from_bytes(serial)?,
                },
                key_encryption_algorithm: algid::key_transport_algorithm_identifier(),
                encrypted_key,
            });
        }

        let content_encryption_algorithm =
            algid::content_encryption_algorithm_identifier(self.algorithm, &iv);

        let enveloped_data = cms::EnvelopedData {
            version: 0,
            recipient_infos: common::Asn1ReadableOrWritable::new_write(asn1::SetOfWriter::new(
                recipient_infos,
            )),
            encrypted_content_info: cms::EncryptedContentInfo {
                content_type: oid::PKCS7_DATA_OID,
                content_encryption_algorithm,
                encrypted_content: Some(&ciphertext),
            },
        };

        let content_info = cms::ContentInfo {
            _content_type: asn1::DefinedByMarker::marker(),
            content: cms::Content::EnvelopedData(Box::new(enveloped_data)),
        };

        let der = asn1::write_single(&content_info)?;

        Ok(Envelope {
            der,
            symmetric_key: key,
            iv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scep_crypto::OpensslProvider;
    use scep_key_parsing::load_der_x509_certificate;

    fn generate_test_certificate(cn: &str) -> (scep_key_parsing::Certificate, scep_key_parsing::RsaPrivateKey) {
        use openssl::asn1::Asn1Time;
        use openssl::bn::BigNum;
        use openssl::hash::MessageDigest;
        use openssl::pkey::PKey;
        use openssl::rsa::Rsa;
        use openssl::x509::{X509Name, X509};

        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa.clone()).unwrap();
        let mut name_builder = X509Name::builder().unwrap();
        name_builder.append_entry_by_text("CN", cn).unwrap();
        let name = name_builder.build();

        let mut builder = X509::builder().unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder.set_pubkey(&pkey).unwrap();
        builder.set_not_before(&Asn1Time::days_from_now(0).unwrap()).unwrap();
        builder.set_not_after(&Asn1Time::days_from_now(1).unwrap()).unwrap();
        let mut bn = BigNum::new().unwrap();
        bn.set_word(1).unwrap();
        builder.set_serial_number(&bn.to_asn1_integer().unwrap()).unwrap();
        builder.sign(&pkey, MessageDigest::sha256()).unwrap();
        let x509 = builder.build();

        let cert = load_der_x509_certificate(&x509.to_der().unwrap()).unwrap();
        (cert, rsa)
    }

    #[test]
    fn test_finalize_requires_content() {
        let provider = OpensslProvider::new();
        let (cert, _key) = generate_test_certificate("RA");
        let result = EnvelopeBuilder::new(&provider)
            .add_recipient(Recipient::new(&cert))
            .finalize();
        assert!(matches!(result, Err(ScepError::MissingContent)));
    }

    #[test]
    fn test_finalize_requires_recipient() {
        let provider = OpensslProvider::new();
        let result = EnvelopeBuilder::new(&provider).content(b"hello").finalize();
        assert!(matches!(result, Err(ScepError::MissingRecipient)));
    }

    #[test]
    fn test_finalize_produces_der_and_matching_key_length() {
        let provider = OpensslProvider::new();
        let (cert, _key) = generate_test_certificate("CA");
        let envelope = EnvelopeBuilder::new(&provider)
            .content(b"a PKCS#10 certificate signing request")
            .algorithm(ContentEncryptionAlgorithm::Aes128Cbc)
            .add_recipient(Recipient::new(&cert))
            .finalize()
            .unwrap();
        assert_eq!(envelope.symmetric_key.len(), 16);
        assert_eq!(envelope.iv.len(), 16);
        assert!(!envelope.der.is_empty());

        let parsed =
            asn1::parse_single::<cms::ContentInfo<'_>>(&envelope.der).expect("valid ContentInfo");
        match parsed.content {
            cms::Content::EnvelopedData(enveloped) => {
                assert_eq!(enveloped.version, 0);
            }
            _ => panic!("expected EnvelopedData content"),
        }
    }
}
