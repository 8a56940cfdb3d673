// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Loads certificates and RSA keys off the wire (DER or PEM) into the shapes
//! the rest of this workspace needs: an owned `issuer` Name and `serialNumber`
//! (for building `IssuerAndSerialNumber`, bit-exact to what was in the
//! certificate) plus an OpenSSL RSA public key ready for signature
//! verification or key-transport encryption.

pub mod error;

pub use error::KeyParsingError;

use openssl::pkey::{Private, Public};
use openssl::rsa::Rsa;
use openssl::x509::X509;

pub type RsaPrivateKey = Rsa<Private>;
pub type RsaPublicKey = Rsa<Public>;

/// An X.509 certificate, retained only for the fields SCEP message
/// construction and parsing actually need.
#[derive(Clone)]
pub struct Certificate {
    der: Vec<u8>,
    issuer: Vec<u8>,
    serial: Vec<u8>,
    public_key: RsaPublicKey,
}

impl Certificate {
    /// The full DER encoding, as found in the wire message or PEM file.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// The DER encoding of `tbsCertificate.issuer`, exactly as it appeared
    /// in the certificate (required for `IssuerAndSerialNumber` matching).
    pub fn issuer(&self) -> &[u8] {
        &self.issuer
    }

    /// The big-endian content octets of `tbsCertificate.serialNumber`.
    pub fn serial(&self) -> &[u8] {
        &self.serial
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }
}

pub fn load_der_x509_certificate(der: &[u8]) -> Result<Certificate, KeyParsingError> {
    let parsed = asn1::parse_single::<scep_asn1::x509::Certificate<'_>>(der)?;
    let issuer = asn1::write_single(&parsed.tbs_cert.issuer)?;
    let serial = parsed.tbs_cert.serial_number.as_bytes().to_vec();

    let x509 = X509::from_der(der)?;
    let public_key = x509.public_key()?.rsa()?;

    Ok(Certificate {
        der: der.to_vec(),
        issuer,
        serial,
        public_key,
    })
}

pub fn load_pem_x509_certificate(pem_bytes: &[u8]) -> Result<Certificate, KeyParsingError> {
    let x509 = X509::from_pem(pem_bytes)?;
    load_der_x509_certificate(&x509.to_der()?)
}

pub fn load_der_rsa_private_key(der: &[u8]) -> Result<RsaPrivateKey, KeyParsingError> {
    Ok(Rsa::private_key_from_der(der)?)
}

pub fn load_pem_rsa_private_key(pem_bytes: &[u8]) -> Result<RsaPrivateKey, KeyParsingError> {
    Ok(Rsa::private_key_from_pem(pem_bytes)?)
}

pub fn load_der_rsa_public_key(der: &[u8]) -> Result<RsaPublicKey, KeyParsingError> {
    Ok(Rsa::public_key_from_der_pkcs1(der).or_else(|_| Rsa::public_key_from_der(der))?)
}
