// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

#[derive(thiserror::Error, Debug)]
pub enum KeyParsingError {
    #[error("certificate is not a well-formed DER X.509 certificate: {0:?}")]
    InvalidCertificate(asn1::ParseError),

    #[error("failed to re-encode a parsed ASN.1 field: {0:?}")]
    Encoding(asn1::WriteError),

    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),

    #[error("PEM decoding error: {0}")]
    Pem(#[from] pem::PemError),
}

impl From<asn1::ParseError> for KeyParsingError {
    fn from(e: asn1::ParseError) -> Self {
        KeyParsingError::InvalidCertificate(e)
    }
}

impl From<asn1::WriteError> for KeyParsingError {
    fn from(e: asn1::WriteError) -> Self {
        KeyParsingError::Encoding(e)
    }
}
