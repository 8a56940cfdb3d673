// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! End-to-end seed tests exercising a full SCEP enrollment handshake: a
//! client's `PKCSReq` carrying an encrypted CSR, and the RA's `CertRep`
//! carrying the issued certificate back, each as a complete `pkiMessage`
//! round trip through building, parsing, verifying and decrypting.

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::hash::MessageDigest as OsslDigest;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::x509::{X509Name, X509};

use scep_message::{
    load_der_x509_certificate, parse_pki_message, wrap_degenerate_certs,
    ContentEncryptionAlgorithm, Certificate, DigestAlgorithm, EnvelopeBuilder, FailInfo,
    MessageBuilder, MessageType, OpensslProvider, ParserState, PkiStatus, Recipient, RsaPrivateKey,
    Signer,
};

fn self_signed(cn: &str, serial: u32) -> (Certificate, RsaPrivateKey) {
    let rsa = Rsa::generate(2048).unwrap();
    let pkey = PKey::from_rsa(rsa.clone()).unwrap();
    let mut name_builder = X509Name::builder().unwrap();
    name_builder.append_entry_by_text("CN", cn).unwrap();
    let name = name_builder.build();

    let mut builder = X509::builder().unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&pkey).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(1).unwrap())
        .unwrap();
    let mut bn = BigNum::new().unwrap();
    bn.set_word(serial as u64).unwrap();
    builder
        .set_serial_number(&bn.to_asn1_integer().unwrap())
        .unwrap();
    builder.sign(&pkey, OsslDigest::sha256()).unwrap();

    let cert = load_der_x509_certificate(&builder.build().to_der().unwrap()).unwrap();
    (cert, rsa)
}

/// A client enrolling: it signs its own request with a throwaway
/// self-signed certificate (as real SCEP clients do before they have a CA
/// certificate) and encrypts the CSR to the RA.
#[test]
fn test_pkcs_req_enrollment_is_verified_and_decrypts_to_the_csr() {
    let provider = OpensslProvider::new();
    let (ra_cert, ra_key) = self_signed("RA", 1);
    let (client_self_signed, client_key) = self_signed("Client", 2);

    let csr_der = b"-- pretend PKCS#10 CSR bytes --".to_vec();
    let envelope = EnvelopeBuilder::new(&provider)
        .content(&csr_der)
        .algorithm(ContentEncryptionAlgorithm::Aes128Cbc)
        .add_recipient(Recipient::new(&ra_cert))
        .finalize()
        .unwrap();

    let signer = Signer::new(&client_self_signed, &client_key, DigestAlgorithm::Sha256);
    let sender_nonce = vec![7u8; 16];
    let der = MessageBuilder::new(&provider)
        .message_type(MessageType::PkcsReq)
        .transaction_id("req-txn-1".to_string())
        .sender_nonce(sender_nonce.clone())
        .pki_envelope(&envelope.der)
        .certificates([&client_self_signed])
        .signer(signer)
        .finalize()
        .unwrap();

    // The RA only has the client's embedded self-signed cert to go on, so
    // no extra trust anchors are supplied; the embedded certificate alone
    // is enough to verify the signature.
    let parsed = parse_pki_message(&provider, &der, &[]).unwrap();
    assert_eq!(parsed.state(), ParserState::Verified);
    assert_eq!(parsed.message_type, Some(MessageType::PkcsReq));
    assert_eq!(parsed.transaction_id.as_deref(), Some("req-txn-1"));
    assert_eq!(parsed.sender_nonce, Some(sender_nonce));
    assert_eq!(parsed.certificates.len(), 1);

    let mut parsed = parsed;
    let plaintext = parsed
        .decrypt_envelope(&provider, &ra_cert, &ra_key)
        .unwrap();
    assert_eq!(parsed.state(), ParserState::Decrypted);
    assert_eq!(plaintext, csr_der);
}

/// The RA's successful reply: a degenerate certificate-only `SignedData`
/// carrying the issued certificate, encrypted back to the client, with the
/// `recipientNonce` echoing the client's original `senderNonce`.
#[test]
fn test_cert_rep_success_round_trip_returns_issued_certificate() {
    let provider = OpensslProvider::new();
    let (ra_cert, ra_key) = self_signed("RA", 10);
    let (client_cert, client_key) = self_signed("Client", 11);
    let (issued_cert, _issued_key) = self_signed("Issued", 12);

    let client_sender_nonce = vec![9u8; 16];

    let issued_certs_der = wrap_degenerate_certs(&[&issued_cert]).unwrap();
    let envelope = EnvelopeBuilder::new(&provider)
        .content(&issued_certs_der)
        .algorithm(ContentEncryptionAlgorithm::Aes256Cbc)
        .add_recipient(Recipient::new(&client_cert))
        .finalize()
        .unwrap();

    let signer = Signer::new(&ra_cert, &ra_key, DigestAlgorithm::Sha256);
    let der = MessageBuilder::new(&provider)
        .message_type(MessageType::CertRep)
        .pki_status(PkiStatus::Success)
        .transaction_id("req-txn-1".to_string())
        .recipient_nonce(client_sender_nonce.clone())
        .pki_envelope(&envelope.der)
        .signer(signer)
        .finalize()
        .unwrap();

    // The client trusts the RA certificate as a trust anchor, not embedded
    // in this reply.
    let mut parsed = parse_pki_message(&provider, &der, &[&ra_cert]).unwrap();
    assert_eq!(parsed.state(), ParserState::Verified);
    assert_eq!(parsed.message_type, Some(MessageType::CertRep));
    assert_eq!(parsed.pki_status, Some(PkiStatus::Success));
    assert_eq!(parsed.recipient_nonce, Some(client_sender_nonce));

    let plaintext = parsed
        .decrypt_envelope(&provider, &client_cert, &client_key)
        .unwrap();
    assert_eq!(parsed.state(), ParserState::Decrypted);

    let roundtrip_certs = wrap_degenerate_certs(&[&issued_cert]).unwrap();
    assert_eq!(plaintext, roundtrip_certs);
}

/// A `CertRep` with `pkiStatus` FAILURE carries a `failInfo` and no
/// `pkcsPKIEnvelope` at all -- there's nothing to decrypt.
#[test]
fn test_cert_rep_failure_round_trip_carries_fail_info_and_no_envelope() {
    let provider = OpensslProvider::new();
    let (ra_cert, ra_key) = self_signed("RA", 20);

    let signer = Signer::new(&ra_cert, &ra_key, DigestAlgorithm::Sha256);
    let der = MessageBuilder::new(&provider)
        .message_type(MessageType::CertRep)
        .pki_status(PkiStatus::Failure)
        .fail_info(FailInfo::BadCertId)
        .transaction_id("req-txn-2".to_string())
        .signer(signer)
        .finalize()
        .unwrap();

    let parsed = parse_pki_message(&provider, &der, &[&ra_cert]).unwrap();
    assert_eq!(parsed.state(), ParserState::Verified);
    assert_eq!(parsed.pki_status, Some(PkiStatus::Failure));
    assert_eq!(parsed.fail_info, Some(FailInfo::BadCertId));
    assert!(parsed.pki_envelope().is_none());
}

/// A client polling for a pending certificate (`CertPoll`, formerly known
/// as `GetCertInitial`) round-trips the same way any other signed request
/// does, with no envelope of its own.
#[test]
fn test_cert_poll_message_round_trips() {
    let provider = OpensslProvider::new();
    let (client_cert, client_key) = self_signed("Client", 30);

    let signer = Signer::new(&client_cert, &client_key, DigestAlgorithm::Sha512);
    let der = MessageBuilder::new(&provider)
        .message_type(MessageType::CertPoll)
        .transaction_id("req-txn-3".to_string())
        .certificates([&client_cert])
        .signer(signer)
        .finalize()
        .unwrap();

    let parsed = parse_pki_message(&provider, &der, &[]).unwrap();
    assert_eq!(parsed.state(), ParserState::Verified);
    assert_eq!(parsed.message_type, Some(MessageType::CertPoll));
    assert!(parsed.pki_envelope().is_none());
}

/// Decrypting a `CertRep` envelope with a recipient key that doesn't match
/// any `RecipientInfo` fails without corrupting the already-verified parse.
#[test]
fn test_wrong_recipient_key_does_not_decrypt_someone_elses_envelope() {
    let provider = OpensslProvider::new();
    let (ra_cert, ra_key) = self_signed("RA", 40);
    let (client_cert, _client_key) = self_signed("Client", 41);
    let (eve_cert, eve_key) = self_signed("Eve", 42);

    let issued_certs_der = wrap_degenerate_certs(&[&client_cert]).unwrap();
    let envelope = EnvelopeBuilder::new(&provider)
        .content(&issued_certs_der)
        .algorithm(ContentEncryptionAlgorithm::Des3Cbc)
        .add_recipient(Recipient::new(&client_cert))
        .finalize()
        .unwrap();

    let signer = Signer::new(&ra_cert, &ra_key, DigestAlgorithm::Sha256);
    let der = MessageBuilder::new(&provider)
        .message_type(MessageType::CertRep)
        .pki_status(PkiStatus::Success)
        .pki_envelope(&envelope.der)
        .signer(signer)
        .finalize()
        .unwrap();

    let mut parsed = parse_pki_message(&provider, &der, &[&ra_cert]).unwrap();
    assert_eq!(parsed.state(), ParserState::Verified);

    let result = parsed.decrypt_envelope(&provider, &eve_cert, &eve_key);
    assert!(result.is_err());
    assert_eq!(parsed.state(), ParserState::Verified);
}
