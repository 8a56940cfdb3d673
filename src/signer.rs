// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The two roles a certificate plays in `pkiMessage` construction: signing
//! the outer `SignedData` ([`Signer`]), or being the target of an
//! `EnvelopedData`'s key-transport encryption ([`Recipient`]).

use scep_crypto::DigestAlgorithm;
use scep_key_parsing::{Certificate, RsaPrivateKey};

/// A signer attached to an outbound `pkiMessage`. Borrows both its
/// certificate and private key: this crate never takes ownership of key
/// material, so callers retain full control over how long it stays resident.
pub struct Signer<'a> {
    pub(crate) certificate: &'a Certificate,
    pub(crate) private_key: &'a RsaPrivateKey,
    pub(crate) digest_algorithm: DigestAlgorithm,
}

impl<'a> Signer<'a> {
    pub fn new(
        certificate: &'a Certificate,
        private_key: &'a RsaPrivateKey,
        digest_algorithm: DigestAlgorithm,
    ) -> Self {
        Signer {
            certificate,
            private_key,
            digest_algorithm,
        }
    }

    pub fn certificate(&self) -> &'a Certificate {
        self.certificate
    }

    pub fn digest_algorithm(&self) -> DigestAlgorithm {
        self.digest_algorithm
    }
}

/// A recipient of an `EnvelopedData`: its certificate supplies both the
/// `IssuerAndSerialNumber` that identifies it in the `RecipientInfo` and the
/// RSA public key the content-encryption key is wrapped under.
pub struct Recipient<'a> {
    pub(crate) certificate: &'a Certificate,
}

impl<'a> Recipient<'a> {
    pub fn new(certificate: &'a Certificate) -> Self {
        Recipient { certificate }
    }

    pub fn certificate(&self) -> &'a Certificate {
        self.certificate
    }
}

/// Which `SignerIdentifier` CHOICE alternative a parsed `SignerInfo` used.
/// Outbound messages built by this crate always produce
/// `IssuerAndSerialNumber`; this type exists so `MessageParser` can record
/// which alternative an inbound message actually used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerIdentifierKind {
    IssuerAndSerialNumber { issuer: Vec<u8>, serial: Vec<u8> },
    SubjectKeyIdentifier(Vec<u8>),
}
