// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Builds a degenerate PKCS#7 `SignedData` (RFC 2315 §9.1): a certificate
//! bag with no signers and no encapsulated content, used by `CertRep`
//! messages to carry the issued certificate (and any chain) back to the
//! requester.

use scep_asn1::cms;
use scep_asn1::common;
use scep_asn1::oid;
use scep_key_parsing::Certificate;

use crate::error::ScepError;

/// Wraps `certificates` in a degenerate `SignedData`, itself wrapped in a
/// `ContentInfo`, and returns its DER encoding. `certificates` must be
/// non-empty and is emitted in the order given.
pub fn wrap_degenerate_certs(certificates: &[&Certificate]) -> Result<Vec<u8>, ScepError> {
    if certificates.is_empty() {
        return Err(ScepError::MissingAttribute("certificates"));
    }

    let cert_tlvs = certificates
        .iter()
        .map(|cert| {
            asn1::parse_single::<common::RawTlv<'_>>(cert.der())
                .map_err(ScepError::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let inner_content_info = cms::ContentInfo {
        _content_type: asn1::DefinedByMarker::marker(),
        content: cms::Content::Data(None),
    };

    let signed_data = cms::SignedData {
        version: 1,
        digest_algorithms: common::Asn1ReadableOrWritable::new_write(asn1::SetOfWriter::new(
            Vec::<scep_asn1::common::AlgorithmIdentifier<'_>>::new(),
        )),
        content_info: inner_content_info,
        certificates: Some(common::Asn1ReadableOrWritable::new_write(
            asn1::SetOfWriter::new(cert_tlvs),
        )),
        crls: None,
        signer_infos: common::Asn1ReadableOrWritable::new_write(asn1::SetOfWriter::new(
            Vec::<cms::SignerInfo<'_>>::new(),
        )),
    };

    let content_info = cms::ContentInfo {
        _content_type: asn1::DefinedByMarker::marker(),
        content: cms::Content::SignedData(Box::new(signed_data)),
    };

    Ok(asn1::write_single(&content_info)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::asn1::Asn1Time;
    use openssl::bn::BigNum;
    use openssl::hash::MessageDigest;
    use openssl::pkey::PKey;
    use openssl::rsa::Rsa;
    use openssl::x509::{X509Name, X509};
    use scep_key_parsing::load_der_x509_certificate;

    fn self_signed(cn: &str, serial: u32) -> Certificate {
        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa).unwrap();
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
        bn.set_word(serial as u64).unwrap();
        builder.set_serial_number(&bn.to_asn1_integer().unwrap()).unwrap();
        builder.sign(&pkey, MessageDigest::sha256()).unwrap();
        load_der_x509_certificate(&builder.build().to_der().unwrap()).unwrap()
    }

    #[test]
    fn test_wrap_degenerate_certs_rejects_empty_input() {
        let result = wrap_degenerate_certs(&[]);
        assert!(matches!(result, Err(ScepError::MissingAttribute(_))));
    }

    #[test]
    fn test_wrap_degenerate_certs_produces_signed_data_with_no_signers() {
        let cert = self_signed("Issued Leaf", 99);
        let der = wrap_degenerate_certs(&[&cert]).unwrap();

        let parsed = asn1::parse_single::<cms::ContentInfo<'_>>(&der).unwrap();
        match parsed.content {
            cms::Content::SignedData(signed_data) => {
                assert_eq!(signed_data.version, 1);
                assert!(signed_data.signer_infos.unwrap_read().clone().count() == 0);
                let certs = signed_data.certificates.expect("certificates present");
                assert_eq!(certs.unwrap_read().clone().count(), 1);
            }
            _ => panic!("expected SignedData content"),
        }
    }
}
