// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation_diagnostic::{
    CertificateStatus, DiagnosticData, DigestAlgorithm, DigestMatcherType, EncryptionAlgorithm, KeyUsage,
    QcType, RevocationReason, RevocationType, TimestampType,
};
use chrono::{TimeZone, Utc};

const SNAPSHOT: &str = r#"{
  "validationDate": "2020-01-01T00:00:00Z",
  "documentName": "contract.pdf",
  "signatures": [{
    "id": "S-1",
    "signatureFormat": "PAdES-BASELINE-B",
    "claimedSigningTime": "2019-06-01T10:00:00Z",
    "signedAttributes": { "signingTime": true },
    "basicSignature": {
      "encryptionAlgorithm": "RSA", "digestAlgorithm": "SHA256", "keyLength": 2048,
      "signatureIntact": true, "signatureValid": true
    },
    "signingCertificate": {
      "certificateId": "C-leaf", "attributePresent": true, "digestValuePresent": true,
      "digestValueMatch": true, "issuerSerialMatch": true, "digestAlgorithm": "SHA256"
    },
    "certificateChain": ["C-leaf", "C-root"],
    "digestMatchers": [
      { "type": "MESSAGE_DIGEST", "digestAlgorithm": "SHA256", "dataFound": true, "dataIntact": true }
    ],
    "timestampIds": ["T-1"]
  }],
  "certificates": [
    {
      "id": "C-leaf",
      "subject": { "commonName": "Alice", "country": "BE" },
      "notBefore": "2018-01-01T00:00:00Z",
      "notAfter": "2022-01-01T00:00:00Z",
      "keyUsages": ["nonRepudiation"],
      "qcStatements": { "compliance": true, "qcTypes": ["qc-type-esign"], "sscd": true },
      "certificateChain": ["C-root"],
      "revocations": [
        { "revocationId": "R-1", "status": "REVOKED", "reason": "certificateHold",
          "revocationDate": "2019-12-01T00:00:00Z" }
      ]
    },
    {
      "id": "C-root",
      "notBefore": "2010-01-01T00:00:00Z",
      "notAfter": "2030-01-01T00:00:00Z",
      "selfSigned": true,
      "trusted": true,
      "basicConstraints": { "ca": true }
    }
  ],
  "revocations": [{
    "id": "R-1", "type": "CRL",
    "productionDate": "2019-12-02T00:00:00Z",
    "thisUpdate": "2019-12-02T00:00:00Z",
    "nextUpdate": "2019-12-09T00:00:00Z"
  }],
  "timestamps": [{
    "id": "T-1", "type": "SIGNATURE_TIMESTAMP",
    "productionTime": "2019-06-01T10:05:00Z",
    "messageImprint": { "type": "MESSAGE_IMPRINT", "digestAlgorithm": "SHA256", "dataFound": true, "dataIntact": true },
    "timestampedObjects": [{ "category": "SIGNATURE", "id": "S-1" }]
  }]
}"#;

fn load() -> DiagnosticData {
    DiagnosticData::from_json_str(SNAPSHOT).unwrap()
}

#[test]
fn loads_signature_facts() {
    let data = load();
    assert_eq!(data.validation_date, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(data.document_name.as_deref(), Some("contract.pdf"));
    assert_eq!(data.first_signature_id(), Some("S-1"));

    let sig = data.signature("S-1").unwrap();
    assert_eq!(sig.signing_certificate_id(), Some("C-leaf"));
    assert_eq!(sig.basic_signature.encryption_algorithm, Some(EncryptionAlgorithm::Rsa));
    assert_eq!(sig.basic_signature.digest_algorithm, Some(DigestAlgorithm::Sha256));
    assert!(sig.signed_attributes.signing_time);
    assert!(!sig.signed_attributes.content_hints);
    assert_eq!(sig.digest_matchers[0].matcher_type, DigestMatcherType::MessageDigest);
    assert!(!sig.is_counter_signature());
}

#[test]
fn certificate_defaults_apply_to_missing_fields() {
    let data = load();
    let leaf = data.certificate("C-leaf").unwrap();
    assert!(leaf.issuer_entity_key_match);
    assert!(leaf.policy_tree_valid);
    assert!(!leaf.trusted);
    assert_eq!(leaf.key_usages, vec![KeyUsage::NonRepudiation]);
    assert_eq!(leaf.qc_types(), &[QcType::Esign]);
    assert!(leaf.qc_compliance());
    assert!(leaf.qc_sscd());
    assert_eq!(leaf.issuer_id(), Some("C-root"));

    let root = data.certificate("C-root").unwrap();
    assert!(root.is_ca());
    assert!(root.trusted);
    assert!(root.qc_types().is_empty());
}

#[test]
fn on_hold_is_a_revoked_status_with_hold_reason() {
    let data = load();
    let entry = data.certificate("C-leaf").unwrap().revocation_entry("R-1").unwrap();
    assert_eq!(entry.status, CertificateStatus::Revoked);
    assert_eq!(entry.reason, Some(RevocationReason::CertificateHold));
    assert!(entry.is_on_hold());

    let revocation = data.revocation("R-1").unwrap();
    assert_eq!(revocation.revocation_type, RevocationType::Crl);
    assert!(!revocation.is_ocsp());
}

#[test]
fn timestamps_track_covered_tokens() {
    let data = load();
    let tst = data.timestamp("T-1").unwrap();
    assert_eq!(tst.timestamp_type, TimestampType::SignatureTimestamp);
    assert!(tst.covers("S-1"));
    assert!(!tst.covers("S-2"));
    assert_eq!(data.detached_timestamps().count(), 0);
}

#[test]
fn detached_timestamps_are_not_referenced_by_signatures() {
    let mut data = load();
    data.signature_mut("S-1").unwrap().timestamp_ids.clear();
    let detached: Vec<_> = data.detached_timestamps().map(|t| t.id.clone()).collect();
    assert_eq!(detached, vec!["T-1".to_string()]);
}

#[test]
fn snapshot_survives_a_json_round_trip() {
    let data = load();
    let json = data.to_json_string().unwrap();
    assert_eq!(DiagnosticData::from_json_str(&json).unwrap(), data);
}

#[test]
fn malformed_json_is_a_decode_error() {
    let err = DiagnosticData::from_json_str("{ \"signatures\": [] }").unwrap_err();
    assert!(err.to_string().starts_with("failed to decode diagnostic data"));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = DiagnosticData::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().starts_with("failed to read diagnostic data"));
}
