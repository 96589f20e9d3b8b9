// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Canned diagnostic data shared by the integration tests.
//!
//! Every scenario is anchored on its validation date so that tests can move it around without
//! re-deriving the validity windows of the tokens.

use crate::{
    trusted_list, utc, years, CertificateBuilder, RevocationBuilder, SignatureBuilder, TimestampBuilder,
    TrustServiceBuilder,
};
use ades_validation_diagnostic::trust::{policy_oid, service_status, service_type};
use ades_validation_diagnostic::{
    Certificate, DiagnosticData, KeyUsage, QcType, TimestampType, TimestampedObjectCategory,
};
use chrono::{DateTime, Duration, Utc};

pub const SIGNATURE: &str = "S-1";
pub const ROOT: &str = "ROOT";
pub const CA: &str = "CA";
pub const SIGNER: &str = "SIGNER";
pub const TSA: &str = "TSA";
pub const CRL_CA: &str = "CRL-CA";
pub const CRL_SIGNER: &str = "CRL-SIGNER";
pub const ARCHIVE_TIMESTAMP: &str = "T-ARC";
pub const LOTL: &str = "LOTL";
pub const TRUSTED_LIST: &str = "BE";

/// Extended key usage of time-stamping units.
pub const TIMESTAMPING_EKU: &str = "1.3.6.1.5.5.7.3.8";

fn required(data: &DiagnosticData, id: &str) -> Certificate {
    data.certificate(id)
        .cloned()
        .unwrap_or_else(|| panic!("scenario has no certificate `{id}`"))
}

/// A PAdES signature by a qualified certificate for electronic signatures on a QSCD.
///
/// `SIGNER` is issued by `CA` under the trust anchor `ROOT`. Both non-anchor certificates have
/// a fresh `good` CRL entry, and `SIGNER` is covered by a granted CA/QC service of the
/// trusted list `BE`, itself published through `LOTL`. Validating at `validation_date` under the
/// default policy yields TOTAL-PASSED and QESig.
pub fn qualified_signature(validation_date: DateTime<Utc>) -> DiagnosticData {
    let vd = validation_date;

    let root = CertificateBuilder::new(ROOT)
        .validity(vd - years(10), vd + years(10))
        .ca(None)
        .trusted()
        .build();
    let ca = CertificateBuilder::new(CA)
        .issued_by(&root)
        .validity(vd - years(5), vd + years(5))
        .ca(None)
        .crl_distribution_point("http://crl.example/root.crl")
        .good_in(CRL_CA)
        .build();
    let signer = CertificateBuilder::new(SIGNER)
        .issued_by(&ca)
        .validity(vd - years(1), vd + years(2))
        .common_name("Signer")
        .key_usage(KeyUsage::NonRepudiation)
        .crl_distribution_point("http://crl.example/ca.crl")
        .good_in(CRL_SIGNER)
        .qualified(&[QcType::Esign], true)
        .policy(policy_oid::QCP_NATURAL_QSCD)
        .trust_service_provider(
            TrustServiceBuilder::new(TRUSTED_LIST, service_type::CA_QC)
                .lotl(LOTL)
                .status(service_status::GRANTED, vd - years(5), None)
                .build(),
        )
        .build();

    let crl_ca = RevocationBuilder::crl(CRL_CA)
        .signed_by(&root)
        .this_update(vd - Duration::days(30))
        .next_update(vd + Duration::days(60))
        .build();
    let crl_signer = RevocationBuilder::crl(CRL_SIGNER)
        .signed_by(&ca)
        .this_update(vd - Duration::days(2))
        .next_update(vd + Duration::days(5))
        .build();

    let signature = SignatureBuilder::new(SIGNATURE)
        .signed_by(&signer)
        .claimed_signing_time(vd - Duration::days(1))
        .build();

    let mut lotl = trusted_list(LOTL, vd - Duration::hours(1), vd + Duration::days(180));
    lotl.lotl = true;
    let mut tl = trusted_list(TRUSTED_LIST, vd - Duration::hours(1), vd + Duration::days(180));
    tl.country_code = Some("BE".to_string());

    let mut data = DiagnosticData::new(vd);
    data.document_name = Some("contract.pdf".to_string());
    data.certificates = vec![root, ca, signer];
    data.revocations = vec![crl_ca, crl_signer];
    data.signatures = vec![signature];
    data.trusted_lists = vec![lotl, tl];
    data
}

/// Attaches a timestamp `id` of `timestamp_type` produced at `production_time` to the signature.
///
/// The timestamp is signed by `TSA`, which is added under `CA` when the snapshot has none yet.
/// Content timestamps cover the signed document, every other type covers the signature.
pub fn with_timestamp(
    mut data: DiagnosticData,
    id: &str,
    timestamp_type: TimestampType,
    production_time: DateTime<Utc>,
) -> DiagnosticData {
    let vd = data.validation_date;
    let tsa = match data.certificate(TSA).cloned() {
        Some(tsa) => tsa,
        None => {
            let ca = required(&data, CA);
            let tsa = CertificateBuilder::new(TSA)
                .issued_by(&ca)
                .validity(vd - years(5), vd + years(5))
                .extended_key_usage(TIMESTAMPING_EKU)
                .crl_distribution_point("http://crl.example/ca.crl")
                .good_in(CRL_SIGNER)
                .build();
            data.certificates.push(tsa.clone());
            tsa
        }
    };
    let builder = TimestampBuilder::new(id, timestamp_type, production_time).signed_by(&tsa);
    let builder = if timestamp_type.is_content_timestamp() {
        let document = data.document_name.clone().unwrap_or_else(|| "document".to_string());
        builder.covers(TimestampedObjectCategory::SignedData, document)
    } else {
        builder.covers(TimestampedObjectCategory::Signature, SIGNATURE)
    };
    let timestamp = builder.build();

    if let Some(signature) = data.signature_mut(SIGNATURE) {
        signature.timestamp_ids.push(id.to_string());
    }
    data.timestamps.push(timestamp);
    data
}

/// Adds an archive timestamp `T-ARC` produced at `production_time` over the signature.
pub fn with_archive_timestamp(data: DiagnosticData, production_time: DateTime<Utc>) -> DiagnosticData {
    with_timestamp(data, ARCHIVE_TIMESTAMP, TimestampType::ArchiveTimestamp, production_time)
}

/// [`qualified_signature`] validated on 2020-06-01 with 1023-bit RSA keys on the signer side.
///
/// The signature, the signer certificate, its issuer key and the CRL that covers the signer all
/// rely on RSA 1023, which expired on 2009-01-01 under the default cryptographic suite.
pub fn rsa1023() -> DiagnosticData {
    let mut data = qualified_signature(utc(2020, 6, 1));

    for (id, not_before, not_after) in [
        (ROOT, utc(2000, 1, 1), utc(2040, 1, 1)),
        (CA, utc(2005, 1, 1), utc(2030, 1, 1)),
        (SIGNER, utc(2008, 1, 1), utc(2022, 1, 1)),
    ] {
        if let Some(certificate) = data.certificate_mut(id) {
            certificate.not_before = not_before;
            certificate.not_after = not_after;
        }
    }
    for id in [CA, SIGNER] {
        if let Some(certificate) = data.certificate_mut(id) {
            certificate.public_key_size = Some(1023);
        }
    }
    if let Some(signer) = data.certificate_mut(SIGNER) {
        signer.basic_signature.key_length = Some(1023);
    }
    if let Some(crl) = data.revocation_mut(CRL_SIGNER) {
        crl.basic_signature.key_length = Some(1023);
    }
    if let Some(signature) = data.signature_mut(SIGNATURE) {
        signature.basic_signature.key_length = Some(1023);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_signature_references_only_known_tokens() {
        let data = qualified_signature(utc(2021, 1, 1));
        let signature = data.signature(SIGNATURE).unwrap();
        for id in &signature.certificate_chain {
            assert!(data.certificate(id).is_some(), "{id} missing");
        }
        for revocation in &data.revocations {
            assert!(data.certificate(revocation.signing_certificate_id().unwrap()).is_some());
        }
        assert_eq!(signature.signing_certificate_id(), Some(SIGNER));
    }

    #[test]
    fn archive_timestamp_is_attached_to_the_signature() {
        let data = with_archive_timestamp(qualified_signature(utc(2020, 6, 1)), utc(2017, 6, 1));
        assert_eq!(data.signature(SIGNATURE).unwrap().timestamp_ids, vec![ARCHIVE_TIMESTAMP.to_string()]);
        assert!(data.timestamp(ARCHIVE_TIMESTAMP).unwrap().covers(SIGNATURE));
        assert_eq!(data.detached_timestamps().count(), 0);
    }

    #[test]
    fn timestamps_share_one_tsa() {
        let vd = utc(2021, 1, 1);
        let data = with_timestamp(
            qualified_signature(vd),
            "T-SIG",
            TimestampType::SignatureTimestamp,
            vd - Duration::days(3),
        );
        let data = with_timestamp(data, "T-CONTENT", TimestampType::ContentTimestamp, vd - Duration::days(4));
        assert_eq!(data.certificates.iter().filter(|c| c.id == TSA).count(), 1);
        assert!(data.timestamp("T-SIG").unwrap().covers(SIGNATURE));
        assert!(data.timestamp("T-CONTENT").unwrap().covers("contract.pdf"));
        assert_eq!(data.signature(SIGNATURE).unwrap().timestamp_ids.len(), 2);
    }
}
