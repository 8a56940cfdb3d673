// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! SCEP's six custom signed attributes (RFC 8894 §3.2): typed Rust values
//! for `messageType`, `pkiStatus` and `failInfo`, and an OID/name registry
//! used by the parser to label attributes it doesn't otherwise recognize.
//!
//! Unlike the Python reference this was ported from, which mutated a single
//! process-wide attribute-name table at class-definition time, the registry
//! here is an ordinary value: callers build one (or use [`default_registry`])
//! and hold it for as long as they need it.

use crate::oid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    PkcsReq,
    RenewalReq,
    UpdateReq,
    /// Also known as `GetCertInitial` in older SCEP drafts; same wire value.
    CertPoll,
    CertRep,
}

impl MessageType {
    pub fn code(self) -> u8 {
        match self {
            MessageType::PkcsReq => 3,
            MessageType::RenewalReq => 17,
            MessageType::UpdateReq => 19,
            MessageType::CertPoll => 20,
            MessageType::CertRep => 22,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            3 => Some(MessageType::PkcsReq),
            17 => Some(MessageType::RenewalReq),
            19 => Some(MessageType::UpdateReq),
            20 => Some(MessageType::CertPoll),
            22 => Some(MessageType::CertRep),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PkiStatus {
    Success,
    Failure,
    Pending,
}

impl PkiStatus {
    pub fn code(self) -> u8 {
        match self {
            PkiStatus::Success => 0,
            PkiStatus::Failure => 2,
            PkiStatus::Pending => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PkiStatus::Success),
            2 => Some(PkiStatus::Failure),
            3 => Some(PkiStatus::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailInfo {
    BadAlg,
    BadMessageCheck,
    BadRequest,
    BadTime,
    BadCertId,
}

impl FailInfo {
    pub fn code(self) -> u8 {
        match self {
            FailInfo::BadAlg => 0,
            FailInfo::BadMessageCheck => 1,
            FailInfo::BadRequest => 2,
            FailInfo::BadTime => 3,
            FailInfo::BadCertId => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FailInfo::BadAlg),
            1 => Some(FailInfo::BadMessageCheck),
            2 => Some(FailInfo::BadRequest),
            3 => Some(FailInfo::BadTime),
            4 => Some(FailInfo::BadCertId),
            _ => None,
        }
    }
}

/// Maps the six SCEP attribute OIDs to human-readable names, for labeling
/// attributes a parsed message carries that the typed accessors above don't
/// cover (forwards-compatibility with unknown `failInfo`/`pkiStatus` codes,
/// or attributes this crate hasn't been taught about yet).
pub struct ScepAttributeRegistry {
    entries: Vec<(asn1::ObjectIdentifier, &'static str)>,
}

impl ScepAttributeRegistry {
    pub fn new() -> Self {
        ScepAttributeRegistry { entries: Vec::new() }
    }

    pub fn register(&mut self, oid: asn1::ObjectIdentifier, name: &'static str) {
        self.entries.push((oid, name));
    }

    pub fn name_for(&self, oid: &asn1::ObjectIdentifier) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(entry_oid, _)| entry_oid == oid)
            .map(|(_, name)| *name)
    }
}

impl Default for ScepAttributeRegistry {
    fn default() -> Self {
        default_registry()
    }
}

pub fn default_registry() -> ScepAttributeRegistry {
    let mut registry = ScepAttributeRegistry::new();
    registry.register(oid::SCEP_MESSAGE_TYPE_OID, "messageType");
    registry.register(oid::SCEP_PKI_STATUS_OID, "pkiStatus");
    registry.register(oid::SCEP_FAIL_INFO_OID, "failInfo");
    registry.register(oid::SCEP_SENDER_NONCE_OID, "senderNonce");
    registry.register(oid::SCEP_RECIPIENT_NONCE_OID, "recipientNonce");
    registry.register(oid::SCEP_TRANSACTION_ID_OID, "transactionID");
    registry.register(oid::CONTENT_TYPE_OID, "contentType");
    registry.register(oid::MESSAGE_DIGEST_OID, "messageDigest");
    registry
}

/// Encodes a small non-negative integer as the decimal `PrintableString`
/// SCEP uses for `messageType`, `pkiStatus` and `failInfo`.
pub fn encode_numeric_string(value: u8) -> String {
    value.to_string()
}

pub fn decode_numeric_string(s: &str) -> Option<u8> {
    s.parse::<u8>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_round_trip() {
        for mt in [
            MessageType::PkcsReq,
            MessageType::CertPoll,
            MessageType::CertRep,
            MessageType::RenewalReq,
            MessageType::UpdateReq,
        ] {
            assert_eq!(MessageType::from_code(mt.code()).unwrap().code(), mt.code());
        }
    }

    #[test]
    fn test_pki_status_codes() {
        assert_eq!(PkiStatus::Success.code(), 0);
        assert_eq!(PkiStatus::Failure.code(), 2);
        assert_eq!(PkiStatus::Pending.code(), 3);
        assert_eq!(PkiStatus::from_code(1), None);
    }

    #[test]
    fn test_fail_info_codes() {
        assert_eq!(FailInfo::from_code(4), Some(FailInfo::BadCertId));
        assert_eq!(FailInfo::from_code(5), None);
    }

    #[test]
    fn test_default_registry_has_all_six_scep_attributes() {
        let registry = default_registry();
        assert_eq!(registry.name_for(&oid::SCEP_TRANSACTION_ID_OID), Some("transactionID"));
        assert_eq!(registry.name_for(&oid::SCEP_SENDER_NONCE_OID), Some("senderNonce"));
    }

    #[test]
    fn test_numeric_string_round_trip() {
        assert_eq!(decode_numeric_string(&encode_numeric_string(19)), Some(19));
    }
}
