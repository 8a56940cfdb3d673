// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! ASN.1/DER types for SCEP `pkiMessage` construction and parsing: the CMS
//! (PKCS#7) envelope, a minimal `Certificate`/`TBSCertificate` for pulling
//! issuer/serial out of DER-encoded certificates, and SCEP's own signed
//! attributes.

pub mod cms;
pub mod common;
pub mod oid;
pub mod scep_attrs;
pub mod x509;
