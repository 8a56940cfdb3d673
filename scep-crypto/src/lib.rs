// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The cryptographic backend a SCEP `pkiMessage` builder or parser is
//! built against: the [`CryptoProvider`] trait, and an OpenSSL-backed
//! implementation of it. Digest, RSA and symmetric operations are the only
//! primitives SCEP needs; everything else (ASN.1 framing, attribute
//! semantics) lives above this layer.

use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::rsa::Padding;
use openssl::sign::{Signer, Verifier};
use openssl::symm::Cipher;
use scep_key_parsing::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),
    #[error("ciphertext padding is invalid")]
    BadPadding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    fn message_digest(self) -> MessageDigest {
        match self {
            DigestAlgorithm::Sha1 => MessageDigest::sha1(),
            DigestAlgorithm::Sha256 => MessageDigest::sha256(),
            DigestAlgorithm::Sha512 => MessageDigest::sha512(),
        }
    }

    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha512 => 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentEncryptionAlgorithm {
    Des3Cbc,
    Aes128Cbc,
    Aes256Cbc,
}

impl ContentEncryptionAlgorithm {
    pub fn key_len(self) -> usize {
        match self {
            ContentEncryptionAlgorithm::Des3Cbc => 24,
            ContentEncryptionAlgorithm::Aes128Cbc => 16,
            ContentEncryptionAlgorithm::Aes256Cbc => 32,
        }
    }

    pub fn iv_len(self) -> usize {
        match self {
            ContentEncryptionAlgorithm::Des3Cbc => 8,
            ContentEncryptionAlgorithm::Aes128Cbc | ContentEncryptionAlgorithm::Aes256Cbc => 16,
        }
    }

    fn cipher(self) -> Cipher {
        match self {
            ContentEncryptionAlgorithm::Des3Cbc => Cipher::des_ede3_cbc(),
            ContentEncryptionAlgorithm::Aes128Cbc => Cipher::aes_128_cbc(),
            ContentEncryptionAlgorithm::Aes256Cbc => Cipher::aes_256_cbc(),
        }
    }
}

/// The cryptographic operations a `pkiMessage` builder or parser needs.
/// Injected rather than called directly so that callers can swap in an
/// HSM-backed implementation without this crate's builders and parsers
/// changing at all.
pub trait CryptoProvider: Send + Sync {
    fn random_bytes(&self, buf: &mut [u8]) -> Result<(), CryptoError>;

    fn digest(&self, alg: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    fn rsa_sign_pkcs1(
        &self,
        key: &RsaPrivateKey,
        alg: DigestAlgorithm,
        data: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    fn rsa_verify_pkcs1(
        &self,
        key: &RsaPublicKey,
        alg: DigestAlgorithm,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;

    fn rsa_encrypt_pkcs1(&self, key: &RsaPublicKey, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    fn rsa_decrypt_pkcs1(
        &self,
        key: &RsaPrivateKey,
        data: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError>;

    fn cbc_encrypt(
        &self,
        alg: ContentEncryptionAlgorithm,
        key: &[u8],
        iv: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    fn cbc_decrypt(
        &self,
        alg: ContentEncryptionAlgorithm,
        key: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError>;
}

/// The default [`CryptoProvider`], backed directly by OpenSSL.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpensslProvider;

impl OpensslProvider {
    pub fn new() -> Self {
        OpensslProvider
    }
}

impl CryptoProvider for OpensslProvider {
    fn random_bytes(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        openssl::rand::rand_bytes(buf)?;
        Ok(())
    }

    fn digest(&self, alg: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(openssl::hash::hash(alg.message_digest(), data)?.to_vec())
    }

    fn rsa_sign_pkcs1(
        &self,
        key: &RsaPrivateKey,
        alg: DigestAlgorithm,
        data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let pkey = PKey::from_rsa(key.clone())?;
        let mut signer = Signer::new(alg.message_digest(), &pkey)?;
        signer.set_rsa_padding(Padding::PKCS1)?;
        signer.update(data)?;
        Ok(signer.sign_to_vec()?)
    }

    fn rsa_verify_pkcs1(
        &self,
        key: &RsaPublicKey,
        alg: DigestAlgorithm,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        let pkey = PKey::from_rsa(key.clone())?;
        let mut verifier = Verifier::new(alg.message_digest(), &pkey)?;
        verifier.set_rsa_padding(Padding::PKCS1)?;
        verifier.update(data)?;
        Ok(verifier.verify(signature)?)
    }

    fn rsa_encrypt_pkcs1(&self, key: &RsaPublicKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut buf = vec![0u8; key.size() as usize];
        let len = key.public_encrypt(data, &mut buf, Padding::PKCS1)?;
        buf.truncate(len);
        Ok(buf)
    }

    fn rsa_decrypt_pkcs1(
        &self,
        key: &RsaPrivateKey,
        data: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let mut buf = Zeroizing::new(vec![0u8; key.size() as usize]);
        let len = key
            .private_decrypt(data, &mut buf, Padding::PKCS1)
            .map_err(|_| CryptoError::BadPadding)?;
        buf.truncate(len);
        Ok(buf)
    }

    fn cbc_encrypt(
        &self,
        alg: ContentEncryptionAlgorithm,
        key: &[u8],
        iv: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        Ok(openssl::symm::encrypt(alg.cipher(), key, Some(iv), plaintext)?)
    }

    fn cbc_decrypt(
        &self,
        alg: ContentEncryptionAlgorithm,
        key: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let plaintext = openssl::symm::decrypt(alg.cipher(), key, Some(iv), ciphertext)
            .map_err(|_| CryptoError::BadPadding)?;
        Ok(Zeroizing::new(plaintext))
    }
}
