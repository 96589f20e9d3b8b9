// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Qualification of a certificate at a given time.

use crate::qualification::strategy::{
    additional_info_types, type_by_certificate, usage_types, Facts, QSCD_AS_IN_CERT, QSCD_NEGATIVE, QSCD_POSITIVE,
};
use crate::qualification::{CertificateQualification, CertificateType, QscdStatus, QualificationTime, QualifiedStatus, ServiceEntry};
use crate::report::{Block, BlockDetail, BlockKind};
use ades_validation_conclusion::{Check, ConstraintChain, Indication, Message, MessageTag, SubIndication};
use ades_validation_diagnostic::trust::qualifier;
use ades_validation_diagnostic::Certificate;
use chrono::{DateTime, TimeZone, Utc};

/// Qualifiers the trusted-list format only defines from eIDAS onwards.
const EIDAS_ONLY_QUALIFIERS: [&str; 7] = [
    qualifier::QC_FOR_ESIG,
    qualifier::QC_FOR_ESEAL,
    qualifier::QC_FOR_WSA,
    qualifier::QC_WITH_QSCD,
    qualifier::QC_NO_QSCD,
    qualifier::QC_QSCD_STATUS_AS_IN_CERT,
    qualifier::QC_QSCD_MANAGED_ON_BEHALF,
];

fn before_eidas(time: DateTime<Utc>) -> bool {
    Utc.with_ymd_and_hms(2016, 7, 1, 0, 0, 0)
        .single()
        .is_some_and(|eidas| time < eidas)
}

/// First inconsistency found in the qualifiers of `service`, as the answer to report.
fn service_inconsistency(service: &ServiceEntry<'_>) -> Option<MessageTag> {
    let has = |uri: &str| service.has_qualifier(uri);
    let has_any = |uris: &[&str]| uris.iter().any(|u| service.has_qualifier(u));
    let usage = usage_types(service);
    let infos = additional_info_types(service);
    let qscd_groups = [&QSCD_POSITIVE[..], &QSCD_NEGATIVE[..], &QSCD_AS_IN_CERT[..]]
        .iter()
        .filter(|group| has_any(group))
        .count();

    if has(qualifier::QC_STATEMENT) && has(qualifier::NOT_QUALIFIED) {
        Some(MessageTag::QUAL_TL_SERV_CONS_ANS1)
    } else if has(qualifier::QC_FOR_LEGAL_PERSON) && has(qualifier::QC_FOR_ESIG) {
        Some(MessageTag::QUAL_TL_SERV_CONS_ANS2)
    } else if qscd_groups > 1 {
        Some(MessageTag::QUAL_TL_SERV_CONS_ANS3)
    } else if usage.len() > 1 {
        Some(MessageTag::QUAL_TL_SERV_CONS_ANS4)
    } else if before_eidas(service.period.start_date)
        && (has_any(&EIDAS_ONLY_QUALIFIERS) || !service.period.additional_service_infos.is_empty())
    {
        Some(MessageTag::QUAL_TL_SERV_CONS_ANS5)
    } else if !infos.is_empty() && usage.iter().any(|u| !infos.contains(u)) {
        Some(MessageTag::QUAL_TL_SERV_CONS_ANS6)
    } else {
        None
    }
}

/// First disagreement between `certificate` and the service selected for it.
fn certificate_inconsistency(certificate: &Certificate, service: &ServiceEntry<'_>) -> Option<MessageTag> {
    let claimed = type_by_certificate(certificate);
    let mut covered = usage_types(service);
    covered.extend(additional_info_types(service));
    if claimed != CertificateType::Unknown && !covered.is_empty() && !covered.contains(&claimed) {
        Some(MessageTag::QUAL_TL_CERT_CONS_ANS1)
    } else if certificate.qc_compliance() && service.has_qualifier(qualifier::NOT_QUALIFIED) {
        Some(MessageTag::QUAL_TL_CERT_CONS_ANS2)
    } else if certificate.qc_sscd() && QSCD_NEGATIVE.iter().any(|u| service.has_qualifier(u)) {
        Some(MessageTag::QUAL_TL_CERT_CONS_ANS3)
    } else {
        None
    }
}

/// A service restricting usage by qualifier overrules the certificate; otherwise its additional
/// service information must cover the type the certificate claims.
fn accepts_type(service: &ServiceEntry<'_>, claimed: CertificateType) -> bool {
    let infos = additional_info_types(service);
    !usage_types(service).is_empty() || infos.is_empty() || claimed == CertificateType::Unknown || infos.contains(&claimed)
}

/// Keeps the services whose digital identifier is the closest issuer of the certificate.
fn closest_issuer(chain: &[&Certificate], services: &mut Vec<ServiceEntry<'_>>) {
    let position = |s: &ServiceEntry<'_>| {
        s.service
            .service_digital_identifier
            .as_deref()
            .and_then(|id| chain.iter().position(|c| c.id == id))
    };
    if let Some(closest) = services.iter().filter_map(position).min() {
        services.retain(|s| position(s) == Some(closest));
    }
}

/// Determines the qualification of `certificate` at `time` from the status periods in `services`.
///
/// `chain` starts with `certificate` and is used to prefer the service of the closest issuer.
pub(crate) fn certificate_qualification_at(
    certificate: &Certificate,
    chain: &[&Certificate],
    services: &[ServiceEntry<'_>],
    time_kind: QualificationTime,
    time: DateTime<Utc>,
) -> Block {
    let mut checks = ConstraintChain::new();
    let at = |tag: MessageTag| Message::new(tag).with_text(time_kind.name());

    let mut candidates: Vec<ServiceEntry<'_>> = services.iter().copied().filter(|s| s.period.covers(time)).collect();
    if services.iter().any(|s| s.mra) {
        checks.check(
            Check::new(MessageTag::QUAL_HAS_MRA_TS, !candidates.is_empty())
                .fail()
                .answer(at(MessageTag::QUAL_HAS_MRA_TS_ANS))
                .on_failure(Indication::Failed, None::<SubIndication>),
        );
        checks.check(
            Check::new(MessageTag::QUAL_MRA_EQUIV, candidates.iter().all(|s| s.mra))
                .warn()
                .answer(MessageTag::QUAL_MRA_EQUIV_ANS),
        );
    } else {
        checks.check(
            Check::new(MessageTag::QUAL_HAS_TS_AT_TIME, !candidates.is_empty())
                .fail()
                .answer(at(MessageTag::QUAL_HAS_TS_AT_TIME_ANS))
                .on_failure(Indication::Failed, None::<SubIndication>),
        );
    }

    let ca_qc = candidates.iter().any(ServiceEntry::is_ca_qc);
    checks.check(
        Check::new(MessageTag::QUAL_HAS_CAQC, ca_qc)
            .warn()
            .answer(MessageTag::QUAL_TL_SERV_CONS_ANS0),
    );
    if ca_qc {
        candidates.retain(ServiceEntry::is_ca_qc);
    }

    let claimed = type_by_certificate(certificate);
    candidates.retain(|s| accepts_type(s, claimed));
    checks.check(
        Check::new(MessageTag::QUAL_HAS_TS_WITH_TYPE, !candidates.is_empty())
            .fail()
            .answer(MessageTag::QUAL_HAS_TS_WITH_TYPE_ANS)
            .on_failure(Indication::Failed, None::<SubIndication>),
    );

    for service in &candidates {
        let problem = service_inconsistency(service);
        checks.check(
            Check::new(MessageTag::QUAL_TL_SERV_CONS, problem.is_none())
                .warn()
                .answer(problem.unwrap_or(MessageTag::QUAL_TL_SERV_CONS))
                .additional_info(service.name()),
        );
    }
    candidates.retain(|s| service_inconsistency(s).is_none());

    if candidates.len() > 1 {
        let facts: Vec<Facts> = candidates.iter().map(|s| Facts::derive(certificate, Some(s))).collect();
        let agree = facts.windows(2).all(|w| w[0].qualification() == w[1].qualification());
        checks.check(
            Check::new(MessageTag::QUAL_HAS_NO_CONFLICT, agree)
                .warn()
                .answer(MessageTag::QUAL_UNIQUE_CERT),
        );
        if !agree {
            tracing::debug!(certificate_id = %certificate.id, time = %time_kind, "trust services disagree, merging");
            let merged = Facts::merge(&facts).unwrap_or(Facts::derive(certificate, None));
            return conclude(certificate, checks, time_kind, merged);
        }
    }

    let granted = candidates.iter().any(ServiceEntry::is_granted);
    checks.check(
        Check::new(MessageTag::QUAL_HAS_GRANTED, granted)
            .warn()
            .answer(at(MessageTag::QUAL_HAS_GRANTED_ANS)),
    );
    if granted {
        candidates.retain(ServiceEntry::is_granted);
    }

    if candidates.len() > 1 {
        closest_issuer(chain, &mut candidates);
        checks.check(
            Check::new(MessageTag::QUAL_UNIQUE_TS, candidates.len() == 1)
                .fail()
                .answer(MessageTag::QUAL_UNIQUE_TS_ANS)
                .on_failure(Indication::Failed, None::<SubIndication>),
        );
    }

    let mut selected = candidates.first().copied();
    if let Some(service) = selected {
        let problem = certificate_inconsistency(certificate, &service);
        checks.check(
            Check::new(MessageTag::QUAL_TL_CERT_CONS, problem.is_none())
                .warn()
                .answer(problem.unwrap_or(MessageTag::QUAL_TL_CERT_CONS)),
        );

        let valid = service.is_ca_qc() && service.is_granted();
        checks.check(
            Check::new(MessageTag::QUAL_VALID_CAQC, valid)
                .fail()
                .answer(MessageTag::QUAL_VALID_CAQC_ANS)
                .on_failure(Indication::Failed, None::<SubIndication>),
        );
        if !valid {
            selected = None;
        }

        let as_in_certificate = QSCD_AS_IN_CERT.iter().any(|u| service.has_qualifier(u));
        checks.check(
            Check::new(
                MessageTag::QUAL_QSCD_OVERRULE_CONS,
                !as_in_certificate || certificate.qc_statements.is_some(),
            )
            .fail()
            .answer(MessageTag::QUAL_QSCD_OVERRULE_CONS_ANS)
            .on_failure(Indication::Failed, None::<SubIndication>),
        );
    }

    let facts = Facts::derive(certificate, selected.as_ref());
    conclude(certificate, checks, time_kind, facts)
}

fn conclude(certificate: &Certificate, mut chain: ConstraintChain, time_kind: QualificationTime, facts: Facts) -> Block {
    let at = |tag: MessageTag| Message::new(tag).with_text(time_kind.name());
    chain.check(
        Check::new(MessageTag::QUAL_QC_AT, facts.status == QualifiedStatus::Qc)
            .warn()
            .answer(at(MessageTag::QUAL_QC_AT_ANS)),
    );
    chain.check(
        Check::new(MessageTag::QUAL_TYPE_AT, facts.kind != CertificateType::Unknown)
            .warn()
            .answer(at(MessageTag::QUAL_TYPE_AT_ANS)),
    );
    chain.check(
        Check::new(MessageTag::QUAL_QSCD_AT, facts.qscd == QscdStatus::Qscd)
            .warn()
            .answer(at(MessageTag::QUAL_QSCD_AT_ANS)),
    );

    let qualification = facts.qualification();
    tracing::debug!(
        certificate_id = %certificate.id,
        time = %time_kind,
        qualification = %qualification,
        "certificate qualification determined"
    );
    Block::from_chain(BlockKind::CertQualification, &certificate.id, chain).with_detail(
        BlockDetail::CertificateQualification {
            time: time_kind,
            qualification,
        },
    )
}

/// Qualification recorded on a certificate qualification block.
pub(crate) fn qualification_of(block: &Block) -> CertificateQualification {
    match block.detail {
        Some(BlockDetail::CertificateQualification { qualification, .. }) => qualification,
        _ => CertificateQualification::Na,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ades_validation_diagnostic::trust::{service_status, service_type};
    use ades_validation_diagnostic::{TrustService, TrustServiceProvider, TrustServiceStatusPeriod};

    fn period(start_year: i32, qualifiers: &[&str], infos: &[&str]) -> TrustServiceStatusPeriod {
        TrustServiceStatusPeriod {
            status: service_status::GRANTED.to_string(),
            start_date: Utc.with_ymd_and_hms(start_year, 1, 1, 0, 0, 0).unwrap(),
            end_date: None,
            captured_qualifiers: qualifiers.iter().map(|q| q.to_string()).collect(),
            additional_service_infos: infos.iter().map(|q| q.to_string()).collect(),
        }
    }

    fn provider(period: TrustServiceStatusPeriod) -> TrustServiceProvider {
        TrustServiceProvider {
            names: vec!["Provider".to_string()],
            registration_identifiers: Vec::new(),
            country_code: Some("BE".to_string()),
            tl_id: "TL-BE".to_string(),
            lotl_id: None,
            services: vec![TrustService {
                names: vec!["CA/QC service".to_string()],
                service_type: service_type::CA_QC.to_string(),
                service_digital_identifier: None,
                status_history: vec![period],
            }],
        }
    }

    fn entry(provider: &TrustServiceProvider) -> ServiceEntry<'_> {
        let service = &provider.services[0];
        ServiceEntry {
            provider,
            service,
            period: &service.status_history[0],
            mra: false,
        }
    }

    #[test]
    fn contradicting_qualified_status_is_inconsistent() {
        let p = provider(period(2018, &[qualifier::QC_STATEMENT, qualifier::NOT_QUALIFIED], &[]));
        assert_eq!(service_inconsistency(&entry(&p)), Some(MessageTag::QUAL_TL_SERV_CONS_ANS1));
    }

    #[test]
    fn eidas_qualifiers_before_eidas_are_inconsistent() {
        let p = provider(period(2015, &[qualifier::QC_WITH_QSCD], &[]));
        assert_eq!(service_inconsistency(&entry(&p)), Some(MessageTag::QUAL_TL_SERV_CONS_ANS5));
    }

    #[test]
    fn qscd_and_no_qscd_together_are_inconsistent() {
        let p = provider(period(2018, &[qualifier::QC_WITH_QSCD, qualifier::QC_NO_QSCD], &[]));
        assert_eq!(service_inconsistency(&entry(&p)), Some(MessageTag::QUAL_TL_SERV_CONS_ANS3));
    }

    #[test]
    fn plain_granted_service_is_consistent() {
        let p = provider(period(2018, &[], &[]));
        assert_eq!(service_inconsistency(&entry(&p)), None);
    }
}
