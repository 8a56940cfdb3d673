// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Builds and parses SCEP `pkiMessage`s (RFC 8894): the CMS/PKCS#7
//! `SignedData` envelope SCEP wraps every request and response in, the
//! `EnvelopedData` a `pkcsPKIEnvelope` is, and the degenerate
//! certificate-only `SignedData` a `CertRep` uses to carry an issued
//! certificate back to its requester.
//!
//! This crate does not speak HTTP, does not hold state across requests, and
//! does not validate certificate chains or enforce CA policy -- it only
//! constructs and parses the cryptographic message itself. Callers supply
//! certificates, private keys and a [`scep_crypto::CryptoProvider`]; this
//! crate never generates or stores key material beyond a single
//! `EnvelopeBuilder::finalize()` call.

mod algid;
mod asn1_util;
pub mod degenerate;
pub mod envelope;
pub mod error;
pub mod message;
pub mod parse;
pub mod signer;

pub use degenerate::wrap_degenerate_certs;
pub use envelope::{Envelope, EnvelopeBuilder};
pub use error::ScepError;
pub use message::MessageBuilder;
pub use parse::{parse_pki_message, ParsedMessage, ParserState, SignerRecord};
pub use signer::{Recipient, Signer, SignerIdentifierKind};

pub use scep_asn1::scep_attrs::{FailInfo, MessageType, PkiStatus};
pub use scep_crypto::{ContentEncryptionAlgorithm, CryptoError, CryptoProvider, DigestAlgorithm, OpensslProvider};
pub use scep_key_parsing::{
    load_der_rsa_private_key, load_der_x509_certificate, load_pem_rsa_private_key,
    load_pem_x509_certificate, Certificate, KeyParsingError, RsaPrivateKey, RsaPublicKey,
};
