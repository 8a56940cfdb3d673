// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

/// Everything that can go wrong building or parsing a SCEP `pkiMessage`.
#[derive(thiserror::Error, Debug)]
pub enum ScepError {
    #[error("no signer was provided to the message builder")]
    MissingSigner,

    #[error("a PKIStatus of FAILURE requires a failInfo attribute")]
    MissingFailInfo,

    #[error("EnvelopeBuilder has no recipients")]
    MissingRecipient,

    #[error("EnvelopeBuilder has no content to encrypt")]
    MissingContent,

    #[error("required attribute `{0}` was absent from the message")]
    MissingAttribute(&'static str),

    #[error("pkiMessage is not validly DER-encoded: {0:?}")]
    Malformed(asn1::ParseError),

    #[error("certificate serial number is not a minimally-encoded ASN.1 INTEGER")]
    InvalidSerialNumber,

    #[error("attribute `{0}` value is not valid for its ASN.1 type")]
    InvalidAttributeValue(&'static str),

    #[error("expected {0} content, found a different ContentInfo content type")]
    UnexpectedContentType(&'static str),

    #[error("signature verification failed")]
    BadSignature,

    #[error("no recipient certificate matched any RecipientInfo in the envelope")]
    NoMatchingRecipient,

    #[error("content decryption failed (wrong key or corrupted ciphertext)")]
    DecryptionFailed,

    #[error("unsupported digest algorithm OID")]
    UnsupportedDigestAlgorithm,

    #[error("unsupported content encryption algorithm OID")]
    UnsupportedContentEncryptionAlgorithm,

    #[error("unsupported key transport algorithm OID")]
    UnsupportedKeyTransportAlgorithm,

    #[error("unsupported signature algorithm OID (must be rsaEncryption)")]
    UnsupportedSignatureAlgorithm,

    #[error("all signers on a pkiMessage must share one digest algorithm")]
    MixedDigestAlgorithms,

    #[error("ASN.1 encoding error: {0:?}")]
    Encoding(asn1::WriteError),

    #[error(transparent)]
    Crypto(#[from] scep_crypto::CryptoError),

    #[error(transparent)]
    KeyParsing(#[from] scep_key_parsing::KeyParsingError),
}

impl From<asn1::ParseError> for ScepError {
    fn from(e: asn1::ParseError) -> Self {
        ScepError::Malformed(e)
    }
}

impl From<asn1::WriteError> for ScepError {
    fn from(e: asn1::WriteError) -> Self {
        ScepError::Encoding(e)
    }
}
