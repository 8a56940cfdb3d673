// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Translates between the typed algorithm enums (`scep_crypto::DigestAlgorithm`,
//! `scep_crypto::ContentEncryptionAlgorithm`) and the `AlgorithmIdentifier`
//! values that actually go on the wire.

use scep_asn1::common::{AlgorithmIdentifier, AlgorithmParameters};
use scep_crypto::{ContentEncryptionAlgorithm, DigestAlgorithm};

use crate::error::ScepError;

pub fn digest_algorithm_identifier(alg: DigestAlgorithm) -> AlgorithmIdentifier<'static> {
    let params = match alg {
        DigestAlgorithm::Sha1 => AlgorithmParameters::Sha1(Some(())),
        DigestAlgorithm::Sha256 => AlgorithmParameters::Sha256(Some(())),
        DigestAlgorithm::Sha512 => AlgorithmParameters::Sha512(Some(())),
    };
    AlgorithmIdentifier {
        oid: asn1::DefinedByMarker::marker(),
        params,
    }
}

pub fn digest_algorithm_from_identifier(
    alg: &AlgorithmIdentifier<'_>,
) -> Result<DigestAlgorithm, ScepError> {
    match alg.params {
        AlgorithmParameters::Sha1(_) => Ok(DigestAlgorithm::Sha1),
        AlgorithmParameters::Sha256(_) => Ok(DigestAlgorithm::Sha256),
        AlgorithmParameters::Sha512(_) => Ok(DigestAlgorithm::Sha512),
        _ => Err(ScepError::UnsupportedDigestAlgorithm),
    }
}

/// SCEP's `digestEncryptionAlgorithm`/`signature_algorithm` is always plain
/// `rsaEncryption`; the hash in use is carried separately by
/// `digestAlgorithm`, not folded into a combined `rsaWithSHA*` OID.
pub fn signature_algorithm_identifier() -> AlgorithmIdentifier<'static> {
    AlgorithmIdentifier {
        oid: asn1::DefinedByMarker::marker(),
        params: AlgorithmParameters::RsaEncryption(Some(())),
    }
}

/// Rejects anything but `rsaEncryption`, per SCEP's requirement that
/// `signature_algorithm` never be a combined `rsaWithSHA*` OID.
pub fn require_rsa_encryption_signature_algorithm(
    alg: &AlgorithmIdentifier<'_>,
) -> Result<(), ScepError> {
    match alg.params {
        AlgorithmParameters::RsaEncryption(_) => Ok(()),
        _ => Err(ScepError::UnsupportedSignatureAlgorithm),
    }
}

pub fn key_transport_algorithm_identifier() -> AlgorithmIdentifier<'static> {
    AlgorithmIdentifier {
        oid: asn1::DefinedByMarker::marker(),
        params: AlgorithmParameters::RsaEncryption(Some(())),
    }
}

pub fn content_encryption_algorithm_identifier(
    alg: ContentEncryptionAlgorithm,
    iv: &[u8],
) -> AlgorithmIdentifier<'_> {
    let params = match alg {
        ContentEncryptionAlgorithm::Des3Cbc => AlgorithmParameters::DesEde3Cbc(iv),
        ContentEncryptionAlgorithm::Aes128Cbc => AlgorithmParameters::Aes128Cbc(iv),
        ContentEncryptionAlgorithm::Aes256Cbc => AlgorithmParameters::Aes256Cbc(iv),
    };
    AlgorithmIdentifier {
        oid: asn1::DefinedByMarker::marker(),
        params,
    }
}

/// Returns the decoded algorithm plus a borrow of the IV living inside `alg`.
pub fn content_encryption_algorithm_from_identifier<'a>(
    alg: &AlgorithmIdentifier<'a>,
) -> Result<(ContentEncryptionAlgorithm, &'a [u8]), ScepError> {
    match alg.params {
        AlgorithmParameters::DesEde3Cbc(iv) => Ok((ContentEncryptionAlgorithm::Des3Cbc, iv)),
        AlgorithmParameters::Aes128Cbc(iv) => Ok((ContentEncryptionAlgorithm::Aes128Cbc, iv)),
        AlgorithmParameters::Aes256Cbc(iv) => Ok((ContentEncryptionAlgorithm::Aes256Cbc, iv)),
        _ => Err(ScepError::UnsupportedContentEncryptionAlgorithm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_algorithm_identifier_round_trip() {
        for alg in [DigestAlgorithm::Sha1, DigestAlgorithm::Sha256, DigestAlgorithm::Sha512] {
            let id = digest_algorithm_identifier(alg);
            assert_eq!(digest_algorithm_from_identifier(&id).unwrap(), alg);
        }
    }

    #[test]
    fn test_content_encryption_algorithm_identifier_carries_iv() {
        let iv = [1u8, 2, 3, 4];
        let id = content_encryption_algorithm_identifier(ContentEncryptionAlgorithm::Aes128Cbc, &iv);
        let (alg, round_tripped_iv) = content_encryption_algorithm_from_identifier(&id).unwrap();
        assert_eq!(alg, ContentEncryptionAlgorithm::Aes128Cbc);
        assert_eq!(round_tripped_iv, &iv);
    }

    #[test]
    fn test_require_rsa_encryption_signature_algorithm_accepts_rsa_encryption() {
        let id = signature_algorithm_identifier();
        assert!(require_rsa_encryption_signature_algorithm(&id).is_ok());
    }

    #[test]
    fn test_require_rsa_encryption_signature_algorithm_rejects_digest_algorithm_identifier() {
        let id = digest_algorithm_identifier(DigestAlgorithm::Sha256);
        assert!(matches!(
            require_rsa_encryption_signature_algorithm(&id),
            Err(ScepError::UnsupportedSignatureAlgorithm)
        ));
    }
}
