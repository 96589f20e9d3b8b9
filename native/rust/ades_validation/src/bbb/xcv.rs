// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! X.509 certificate chain validation (XCV) and its per-certificate block (SubXCV).

use crate::bbb::revocation::{revocation_freshness, revocation_selection};
use crate::context::{CertificateScope, ValidationContext};
use crate::crypto::{evaluate_target, CryptoTarget};
use crate::report::{Block, BlockDetail, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Check, ConstraintChain, Indication, MessageTag, SubIndication};
use ades_validation_diagnostic::trust::policy_oid;
use ades_validation_diagnostic::{Certificate, CertificateStatus, Revocation};
use ades_validation_policy::{level_of, CertificateConstraints, Level, MultiValuesConstraint, ANY_VALUE};
use chrono::{DateTime, Utc};

const QUALIFIED_POLICIES: [&str; 7] = [
    policy_oid::QCP_PUBLIC,
    policy_oid::QCP_PUBLIC_WITH_SSCD,
    policy_oid::QCP_NATURAL,
    policy_oid::QCP_LEGAL,
    policy_oid::QCP_NATURAL_QSCD,
    policy_oid::QCP_LEGAL_QSCD,
    policy_oid::QCP_WEB,
];

const QSCD_POLICIES: [&str; 3] = [
    policy_oid::QCP_PUBLIC_WITH_SSCD,
    policy_oid::QCP_NATURAL_QSCD,
    policy_oid::QCP_LEGAL_QSCD,
];

const SEMANTICS_NATURAL: &str = "0.4.0.194121.1.1";
const SEMANTICS_LEGAL: &str = "0.4.0.194121.1.2";

/// Why a certificate needs no revocation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RevocationExemption {
    TrustAnchor,
    OcspNoCheck,
    NoRevAvail,
    Skipped,
}

pub(crate) fn revocation_exemption(
    certificate: &Certificate,
    constraints: Option<&CertificateConstraints>,
) -> Option<RevocationExemption> {
    if certificate.trusted {
        return Some(RevocationExemption::TrustAnchor);
    }
    if certificate.id_pkix_ocsp_no_check {
        return Some(RevocationExemption::OcspNoCheck);
    }
    if certificate.no_rev_avail {
        return Some(RevocationExemption::NoRevAvail);
    }
    let skip = constraints.and_then(|c| c.revocation_data_skip.as_ref())?;
    let skipped = skip.certificate_extensions.iter().any(|oid| certificate.has_extension(oid))
        || skip.certificate_policies.iter().any(|oid| certificate.has_policy(oid));
    skipped.then_some(RevocationExemption::Skipped)
}

/// Position of the first trust anchor in `chain`.
pub(crate) fn anchor_position(chain: &[&Certificate]) -> Option<usize> {
    chain.iter().position(|c| c.trusted)
}

/// Certificates XCV validates: up to and including the first trust anchor.
pub(crate) fn validated_prefix<'c, 'a>(chain: &'c [&'a Certificate]) -> &'c [&'a Certificate] {
    match anchor_position(chain) {
        Some(anchor) => &chain[..=anchor],
        None => chain,
    }
}

pub(crate) fn certificate_chain_validation(ctx: &ValidationContext<'_>, token: Token<'_>) -> Block {
    let context = token.context();
    let basic = ctx.basic_constraints(context);
    let chain_certificates = ctx.index.chain(token.signing_certificate_id(), token.chain_ids());
    let anchor = anchor_position(&chain_certificates).map(|p| chain_certificates[p]);
    let mut chain = ConstraintChain::new();

    chain.check(
        Check::new(MessageTag::BBB_XCV_CCCBB, anchor.is_some())
            .level(basic.and_then(|b| level_of(&b.prospective_certificate_chain)))
            .answer(MessageTag::BBB_XCV_CCCBB_ANS)
            .on_failure(Indication::Indeterminate, SubIndication::NoCertificateChainFound),
    );

    if let Some(anchor) = anchor {
        let services: Vec<_> = anchor
            .trust_service_providers
            .iter()
            .flat_map(|p| p.services.iter())
            .collect();
        if let Some(types) = basic.and_then(|b| b.trusted_service_type_identifier.as_ref()) {
            chain.check(
                Check::new(
                    MessageTag::XCV_TSL_ETIP,
                    types.accepts_any(services.iter().map(|s| s.service_type.as_str())),
                )
                .level(Some(types.level))
                .answer(MessageTag::XCV_TSL_ETIP_ANS)
                .on_failure(Indication::Indeterminate, SubIndication::CertificateChainGeneralFailure),
            );
        }
        if let Some(statuses) = basic.and_then(|b| b.trusted_service_status.as_ref()) {
            let issuance = chain_certificates[0].not_before;
            let current = services
                .iter()
                .filter_map(|s| s.status_at(issuance))
                .map(|period| period.status.as_str());
            chain.check(
                Check::new(MessageTag::XCV_TSL_ESP, statuses.accepts_any(current))
                    .level(Some(statuses.level))
                    .answer(MessageTag::XCV_TSL_ESP_ANS)
                    .on_failure(Indication::Indeterminate, SubIndication::CertificateChainGeneralFailure),
            );
        }
    }

    let mut children = Vec::new();
    for (position, certificate) in validated_prefix(&chain_certificates).iter().enumerate() {
        let scope = ctx.certificate_scope(context, position);
        let sub = sub_certificate_validation(ctx, scope, &chain_certificates, position, ctx.current_time);
        chain.check(
            Check::result(MessageTag::BBB_XCV_SUB, &certificate.id, &sub.conclusion).answer(MessageTag::BBB_XCV_SUB_ANS),
        );
        children.push(sub);
    }

    Block::from_chain(BlockKind::Xcv, token.id(), chain).with_children(children)
}

fn dn_checks(constraints: &CertificateConstraints, certificate: &Certificate) -> Vec<(MessageTag, MessageTag, Level, bool)> {
    let subject = &certificate.subject;
    let attributes: [(MessageTag, MessageTag, &Option<MultiValuesConstraint>, &Option<String>); 12] = [
        (MessageTag::BBB_XCV_ISCGSURN, MessageTag::BBB_XCV_ISCGSURN_ANS, &constraints.surname, &subject.surname),
        (MessageTag::BBB_XCV_ISCGGIVEN, MessageTag::BBB_XCV_ISCGGIVEN_ANS, &constraints.given_name, &subject.given_name),
        (MessageTag::BBB_XCV_ISCGCOMMONN, MessageTag::BBB_XCV_ISCGCOMMONN_ANS, &constraints.common_name, &subject.common_name),
        (MessageTag::BBB_XCV_ISCGPSEUD, MessageTag::BBB_XCV_ISCGPSEUD_ANS, &constraints.pseudonym, &subject.pseudonym),
        (MessageTag::BBB_XCV_ISCGTITLE, MessageTag::BBB_XCV_ISCGTITLE_ANS, &constraints.title, &subject.title),
        (MessageTag::BBB_XCV_ISCGEMAIL, MessageTag::BBB_XCV_ISCGEMAIL_ANS, &constraints.email, &subject.email),
        (MessageTag::BBB_XCV_ISCGCOUNTRY, MessageTag::BBB_XCV_ISCGCOUNTRY_ANS, &constraints.country, &subject.country),
        (MessageTag::BBB_XCV_ISCGLOC, MessageTag::BBB_XCV_ISCGLOC_ANS, &constraints.locality, &subject.locality),
        (MessageTag::BBB_XCV_ISCGST, MessageTag::BBB_XCV_ISCGST_ANS, &constraints.state, &subject.state),
        (
            MessageTag::BBB_XCV_ISCGOI,
            MessageTag::BBB_XCV_ISCGOI_ANS,
            &constraints.organization_identifier,
            &subject.organization_identifier,
        ),
        (
            MessageTag::BBB_XCV_ISCGOU,
            MessageTag::BBB_XCV_ISCGOU_ANS,
            &constraints.organization_unit,
            &subject.organization_unit,
        ),
        (
            MessageTag::BBB_XCV_ISCGON,
            MessageTag::BBB_XCV_ISCGON_ANS,
            &constraints.organization_name,
            &subject.organization_name,
        ),
    ];
    attributes
        .into_iter()
        .filter_map(|(name, answer, constraint, value)| {
            let constraint = constraint.as_ref()?;
            Some((name, answer, constraint.level, constraint.accepts_all(value.as_deref())))
        })
        .collect()
}

fn multi(constraint: &Option<MultiValuesConstraint>) -> Option<&MultiValuesConstraint> {
    constraint.as_ref()
}

fn accepts_any_or_wildcard<'v>(constraint: &MultiValuesConstraint, values: impl Iterator<Item = &'v str>) -> bool {
    constraint.ids.iter().any(|id| id == ANY_VALUE) || constraint.accepts_any(values)
}

/// Validation of the certificate at `position` in `chain` at `time`.
pub(crate) fn sub_certificate_validation<'a>(
    ctx: &ValidationContext<'a>,
    scope: CertificateScope<'a>,
    chain_certificates: &[&'a Certificate],
    position: usize,
    time: DateTime<Utc>,
) -> Block {
    let certificate = chain_certificates[position];
    let constraints = scope.constraints;
    let level = |pick: fn(&CertificateConstraints) -> Option<Level>| constraints.and_then(pick);
    let mut chain = ConstraintChain::new();

    if certificate.trusted {
        if let Some(sunset) = certificate.sunset_date {
            chain.check(
                Check::new(MessageTag::BBB_XCV_ISCTAS, time < sunset)
                    .level(level(|c| level_of(&c.sunset_date)))
                    .answer(MessageTag::BBB_XCV_ISCTAS_ANS)
                    .on_failure(Indication::Indeterminate, SubIndication::NoCertificateChainFound),
            );
        }
        return Block::from_chain(BlockKind::SubXcv, &certificate.id, chain).with_detail(BlockDetail::Certificate {
            certificate_id: certificate.id.clone(),
            trust_anchor: true,
            selected_revocation: None,
        });
    }

    let exemption = revocation_exemption(certificate, constraints);
    let selection = exemption
        .is_none()
        .then(|| revocation_selection(ctx, certificate, time));
    let latest: Option<&'a Revocation> = selection.as_ref().and_then(|s| s.latest);
    let latest_entry = latest.and_then(|r| certificate.revocation_entry(&r.id));
    let revoked_sub = if position == 0 {
        SubIndication::RevokedNoPoe
    } else {
        SubIndication::RevokedCaNoPoe
    };

    let validity_sub = match (latest, latest_entry) {
        (_, Some(entry)) if entry.is_revoked() && !entry.is_on_hold() => revoked_sub,
        (Some(revocation), Some(entry))
            if entry.status == CertificateStatus::Good
                && revocation.production_date > certificate.not_after
                && revocation
                    .expired_certs_retention()
                    .is_some_and(|retention| retention <= certificate.not_after) =>
        {
            SubIndication::OutOfBoundsNotRevoked
        }
        _ => SubIndication::OutOfBoundsNoPoe,
    };
    chain.check(
        Check::new(MessageTag::BBB_XCV_ICTIVRSC, certificate.is_valid_at(time))
            .level(level(|c| level_of(&c.validity_range)))
            .answer(MessageTag::BBB_XCV_ICTIVRSC_ANS)
            .on_failure(Indication::Indeterminate, validity_sub),
    );
    chain.check(
        Check::new(MessageTag::BBB_XCV_ICSI, certificate.basic_signature.signature_intact)
            .level(level(|c| level_of(&c.signature)))
            .answer(MessageTag::BBB_XCV_ICSI_ANS)
            .on_failure(Indication::Indeterminate, SubIndication::CertificateChainGeneralFailure),
    );

    let mut constraint_check = |name: MessageTag, answer: MessageTag, level: Option<Level>, outcome: bool| {
        chain.check(
            Check::new(name, outcome)
                .level(level)
                .answer(answer)
                .on_failure(Indication::Indeterminate, SubIndication::ChainConstraintsFailure),
        );
    };

    let qc = certificate.qc_statements.as_ref();
    let policies = || certificate.certificate_policies.iter().map(|p| p.oid.as_str());

    // identity
    constraint_check(
        MessageTag::BBB_XCV_ISNP,
        MessageTag::BBB_XCV_ISNP_ANS,
        level(|c| level_of(&c.serial_number_present)),
        certificate.serial_number.as_deref().is_some_and(|s| !s.is_empty()),
    );
    if let Some(constraints) = constraints {
        for (name, answer, level, outcome) in dn_checks(constraints, certificate) {
            constraint_check(name, answer, Some(level), outcome);
        }
    }
    constraint_check(
        MessageTag::BBB_XCV_PSEUDO_USE,
        MessageTag::BBB_XCV_PSEUDO_USE_ANS,
        level(|c| level_of(&c.usage_of_pseudonym)),
        certificate.subject.pseudonym.is_none(),
    );
    constraint_check(
        MessageTag::BBB_XCV_SS,
        MessageTag::BBB_XCV_SS_ANS,
        level(|c| level_of(&c.self_signed)),
        certificate.self_signed,
    );
    constraint_check(
        MessageTag::BBB_XCV_NSS,
        MessageTag::BBB_XCV_NSS_ANS,
        level(|c| level_of(&c.not_self_signed)),
        !certificate.self_signed,
    );

    // usage
    if let Some(key_usage) = constraints.and_then(|c| multi(&c.key_usage)) {
        constraint_check(
            MessageTag::BBB_XCV_ISCGKU,
            MessageTag::BBB_XCV_ISCGKU_ANS,
            Some(key_usage.level),
            key_usage.accepts_any(certificate.key_usages.iter().map(|k| k.name())),
        );
    }
    if let Some(extended) = constraints.and_then(|c| multi(&c.extended_key_usage)) {
        constraint_check(
            MessageTag::BBB_XCV_ISCGEKU,
            MessageTag::BBB_XCV_ISCGEKU_ANS,
            Some(extended.level),
            extended.accepts_any(certificate.extended_key_usages.iter().map(String::as_str)),
        );
    }
    constraint_check(
        MessageTag::BBB_XCV_ISCGCA,
        MessageTag::BBB_XCV_ISCGCA_ANS,
        level(|c| level_of(&c.ca)),
        certificate.is_ca(),
    );
    // CA certificates between this one and the signing certificate
    let below = position.saturating_sub(1);
    constraint_check(
        MessageTag::BBB_XCV_ISCGMPL,
        MessageTag::BBB_XCV_ISCGMPL_ANS,
        level(|c| level_of(&c.max_path_length)),
        certificate
            .basic_constraints
            .path_len_constraint
            .map_or(true, |max| below <= max as usize),
    );

    // policies
    if let Some(ids) = constraints.and_then(|c| multi(&c.policy_ids)) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCIPI,
            MessageTag::BBB_XCV_CMDCIPI_ANS,
            Some(ids.level),
            accepts_any_or_wildcard(ids, policies()),
        );
    }
    constraint_check(
        MessageTag::BBB_XCV_CMDCIPQ,
        MessageTag::BBB_XCV_CMDCIPQ_ANS,
        level(|c| level_of(&c.policy_qualification_ids)),
        policies().any(|oid| QUALIFIED_POLICIES.contains(&oid)),
    );
    constraint_check(
        MessageTag::BBB_XCV_CMDCIQSCD,
        MessageTag::BBB_XCV_CMDCIQSCD_ANS,
        level(|c| level_of(&c.policy_supported_by_qscd_ids)),
        policies().any(|oid| QSCD_POLICIES.contains(&oid)),
    );

    // QC statements
    constraint_check(
        MessageTag::BBB_XCV_CMDCIQC,
        MessageTag::BBB_XCV_CMDCIQC_ANS,
        level(|c| level_of(&c.qc_compliance)),
        certificate.qc_compliance(),
    );
    if let Some(currency) = constraints.and_then(|c| c.qc_eu_limit_value_currency.as_ref()) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCILVC,
            MessageTag::BBB_XCV_CMDCILVC_ANS,
            Some(currency.level),
            qc.and_then(|q| q.limit_value.as_ref())
                .is_some_and(|limit| limit.currency == currency.value),
        );
    }
    if let Some(min) = constraints.and_then(|c| c.min_qc_eu_limit_value.as_ref()) {
        let threshold = u64::try_from(min.value).unwrap_or(0);
        constraint_check(
            MessageTag::BBB_XCV_CMDCIMLV,
            MessageTag::BBB_XCV_CMDCIMLV_ANS,
            Some(min.level),
            qc.and_then(|q| q.limit_value.as_ref())
                .is_some_and(|limit| limit.value() >= threshold),
        );
    }
    if let Some(min) = constraints.and_then(|c| c.min_qc_eu_retention_period.as_ref()) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCIRP,
            MessageTag::BBB_XCV_CMDCIRP_ANS,
            Some(min.level),
            qc.and_then(|q| q.retention_period)
                .is_some_and(|years| i64::from(years) >= min.value),
        );
    }
    constraint_check(
        MessageTag::BBB_XCV_CMDCISSCD,
        MessageTag::BBB_XCV_CMDCISSCD_ANS,
        level(|c| level_of(&c.qc_sscd)),
        certificate.qc_sscd(),
    );
    if let Some(pds) = constraints.and_then(|c| multi(&c.qc_eu_pds_location)) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCIPDS,
            MessageTag::BBB_XCV_CMDCIPDS_ANS,
            Some(pds.level),
            pds.accepts_all(qc.into_iter().flat_map(|q| q.pds_locations.iter().map(String::as_str))),
        );
    }
    if let Some(types) = constraints.and_then(|c| multi(&c.qc_type)) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCIQCT,
            MessageTag::BBB_XCV_CMDCIQCT_ANS,
            Some(types.level),
            types.accepts_all(certificate.qc_types().iter().map(|t| t.name())),
        );
    }
    if let Some(countries) = constraints.and_then(|c| multi(&c.qc_legislation_country_codes)) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCIQCL,
            MessageTag::BBB_XCV_CMDCIQCL_ANS,
            Some(countries.level),
            countries.accepts_all(
                qc.into_iter()
                    .flat_map(|q| q.legislation_country_codes.iter().map(String::as_str)),
            ),
        );
    }

    // person, semantics and PSD2
    let semantics = qc.and_then(|q| q.semantics_identifier.as_deref());
    constraint_check(
        MessageTag::BBB_XCV_CMDCIITNP,
        MessageTag::BBB_XCV_CMDCIITNP_ANS,
        level(|c| level_of(&c.issued_to_natural_person)),
        policies().any(|oid| oid == policy_oid::QCP_NATURAL || oid == policy_oid::QCP_NATURAL_QSCD)
            || semantics == Some(SEMANTICS_NATURAL),
    );
    constraint_check(
        MessageTag::BBB_XCV_CMDCIITLP,
        MessageTag::BBB_XCV_CMDCIITLP_ANS,
        level(|c| level_of(&c.issued_to_legal_person)),
        policies().any(|oid| oid == policy_oid::QCP_LEGAL || oid == policy_oid::QCP_LEGAL_QSCD)
            || semantics == Some(SEMANTICS_LEGAL),
    );
    if let Some(identifiers) = constraints.and_then(|c| multi(&c.semantics_identifier)) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCISI,
            MessageTag::BBB_XCV_CMDCISI_ANS,
            Some(identifiers.level),
            identifiers.accepts_all(semantics),
        );
    }
    let psd2 = qc.and_then(|q| q.psd2.as_ref());
    if let Some(roles) = constraints.and_then(|c| multi(&c.psd2_qc_type_roles_of_psp)) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCIPSD2R,
            MessageTag::BBB_XCV_CMDCIPSD2R_ANS,
            Some(roles.level),
            roles.accepts_all(psd2.into_iter().flat_map(|p| p.roles.iter().map(String::as_str))),
        );
    }
    if let Some(names) = constraints.and_then(|c| multi(&c.psd2_qc_comp_nca_name)) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCIPSD2N,
            MessageTag::BBB_XCV_CMDCIPSD2N_ANS,
            Some(names.level),
            names.accepts_all(psd2.and_then(|p| p.nca_name.as_deref())),
        );
    }
    if let Some(ids) = constraints.and_then(|c| multi(&c.psd2_qc_comp_nca_id)) {
        constraint_check(
            MessageTag::BBB_XCV_CMDCIPSD2I,
            MessageTag::BBB_XCV_CMDCIPSD2I_ANS,
            Some(ids.level),
            ids.accepts_all(psd2.and_then(|p| p.nca_id.as_deref())),
        );
    }

    // structure
    constraint_check(
        MessageTag::BBB_XCV_IPTV,
        MessageTag::BBB_XCV_IPTV_ANS,
        level(|c| level_of(&c.policy_tree)),
        certificate.policy_tree_valid,
    );
    let issuers = &chain_certificates[position + 1..];
    let names_permitted = issuers
        .iter()
        .filter_map(|issuer| issuer.name_constraints.as_ref())
        .all(|nc| {
            nc.permits(&certificate.subject_dn)
                && certificate.subject_alternative_names.iter().all(|san| nc.permits(san))
        });
    constraint_check(
        MessageTag::BBB_XCV_INCV,
        MessageTag::BBB_XCV_INCV_ANS,
        level(|c| level_of(&c.name_constraints)),
        names_permitted,
    );
    constraint_check(
        MessageTag::BBB_XCV_IIDNM,
        MessageTag::BBB_XCV_IIDNM_ANS,
        level(|c| level_of(&c.issuer_name)),
        certificate.issuer_entity_key_match
            && issuers
                .first()
                .map_or(true, |issuer| issuer.subject_dn == certificate.issuer_dn),
    );

    // extensions
    if let Some(supported) = constraints.and_then(|c| multi(&c.supported_critical_extensions)) {
        constraint_check(
            MessageTag::BBB_XCV_ISCE,
            MessageTag::BBB_XCV_ISCE_ANS,
            Some(supported.level),
            certificate
                .extensions
                .iter()
                .filter(|e| e.critical)
                .all(|e| supported.accepts(&e.oid)),
        );
    }
    if let Some(forbidden) = constraints.and_then(|c| multi(&c.forbidden_extensions)) {
        constraint_check(
            MessageTag::BBB_XCV_IFEA,
            MessageTag::BBB_XCV_IFEA_ANS,
            Some(forbidden.level),
            !certificate
                .extensions
                .iter()
                .any(|e| forbidden.ids.iter().any(|id| *id == e.oid)),
        );
    }

    // access
    constraint_check(
        MessageTag::BBB_XCV_AIA_PRES,
        MessageTag::BBB_XCV_AIA_PRES_ANS,
        level(|c| level_of(&c.authority_info_access_present)),
        !certificate.aia_urls.is_empty(),
    );
    if exemption.is_none() {
        constraint_check(
            MessageTag::BBB_XCV_REVOC_PRES,
            MessageTag::BBB_XCV_REVOC_PRES_ANS,
            level(|c| level_of(&c.revocation_info_access_present)),
            certificate.has_revocation_access(),
        );
    }
    constraint_check(
        MessageTag::BBB_XCV_INRA,
        MessageTag::BBB_XCV_INRA_ANS,
        level(|c| level_of(&c.no_rev_avail_certificate)),
        !(certificate.no_rev_avail && certificate.is_ca()),
    );

    let mut children = Vec::new();
    match exemption {
        Some(RevocationExemption::OcspNoCheck) => chain.add_info(MessageTag::BBB_XCV_OCSP_NO_CHECK),
        Some(RevocationExemption::Skipped) => chain.add_info(MessageTag::BBB_XCV_REVOC_SKIP),
        Some(_) => {}
        None => {
            chain.check(
                Check::new(MessageTag::BBB_XCV_IRDPFC, !certificate.revocations.is_empty())
                    .level(level(|c| level_of(&c.revocation_data_available)))
                    .answer(MessageTag::BBB_XCV_IRDPFC_ANS)
                    .on_failure(Indication::Indeterminate, SubIndication::TryLater),
            );
            if let Some(selection) = selection {
                if let Some(acceptable) = level(|c| level_of(&c.acceptable_revocation_data_found)) {
                    chain.check(
                        Check::result_with(
                            MessageTag::BBB_XCV_IARDPFC,
                            &selection.block.id,
                            &selection.block.conclusion,
                            selection.block.is_passed(),
                        )
                        .level(Some(acceptable))
                        .answer(MessageTag::BBB_XCV_IARDPFC_ANS)
                        .on_failure(Indication::Indeterminate, SubIndication::TryLater),
                    );
                }
                children.push(selection.block);
            }
            if let (Some(revocation), Some(entry)) = (latest, latest_entry) {
                chain.check(
                    Check::new(MessageTag::BBB_XCV_ISCR, !(entry.is_revoked() && !entry.is_on_hold()))
                        .level(level(|c| level_of(&c.not_revoked)))
                        .answer(MessageTag::BBB_XCV_ISCR_ANS)
                        .on_failure(Indication::Indeterminate, revoked_sub),
                );
                chain.check(
                    Check::new(MessageTag::BBB_XCV_ISCOH, !entry.is_on_hold())
                        .level(level(|c| level_of(&c.not_on_hold)))
                        .answer(MessageTag::BBB_XCV_ISCOH_ANS)
                        .on_failure(Indication::Indeterminate, SubIndication::TryLater),
                );
                let rfc = revocation_freshness(ctx, scope, revocation, time);
                chain.check(
                    Check::result(MessageTag::BBB_XCV_RFC, &rfc.id, &rfc.conclusion).answer(MessageTag::BBB_XCV_RFC_ANS),
                );
                children.push(rfc);
            }
        }
    }

    let target = CryptoTarget::signature(MessageTag::ACCM_POS_CERT_SIG, &certificate.basic_signature, scope.suite_key());
    if let Some(outcome) = evaluate_target(ctx, &target, time) {
        chain.check(outcome.check(MessageTag::ASCCM, SubIndication::CryptoConstraintsFailureNoPoe));
    }

    Block::from_chain(BlockKind::SubXcv, &certificate.id, chain)
        .with_children(children)
        .with_detail(BlockDetail::Certificate {
            certificate_id: certificate.id.clone(),
            trust_anchor: false,
            selected_revocation: latest.map(|r| r.id.clone()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ades_validation_policy::RevocationDataSkipConstraint;
    use ades_validation_test_utils::CertificateBuilder;

    #[test]
    fn revocation_skip_matches_extension_or_policy() {
        let constraints = CertificateConstraints {
            revocation_data_skip: Some(RevocationDataSkipConstraint {
                certificate_extensions: vec!["0.4.0.194121.2.1".into()],
                certificate_policies: vec!["1.2.3.4".into()],
            }),
            ..CertificateConstraints::default()
        };
        let by_extension = CertificateBuilder::new("C-1").extension("0.4.0.194121.2.1", false).build();
        let by_policy = CertificateBuilder::new("C-2").policy("1.2.3.4").build();
        let neither = CertificateBuilder::new("C-3").policy("1.2.3.5").build();

        assert_eq!(
            revocation_exemption(&by_extension, Some(&constraints)),
            Some(RevocationExemption::Skipped)
        );
        assert_eq!(
            revocation_exemption(&by_policy, Some(&constraints)),
            Some(RevocationExemption::Skipped)
        );
        assert_eq!(revocation_exemption(&neither, Some(&constraints)), None);
    }

    #[test]
    fn anchor_and_ocsp_no_check_are_exempt_without_constraints() {
        let anchor = CertificateBuilder::new("ROOT").trusted().build();
        let responder = CertificateBuilder::new("OCSP").ocsp_no_check().build();
        assert_eq!(revocation_exemption(&anchor, None), Some(RevocationExemption::TrustAnchor));
        assert_eq!(revocation_exemption(&responder, None), Some(RevocationExemption::OcspNoCheck));
    }

    #[test]
    fn validated_prefix_stops_at_the_first_anchor() {
        let leaf = CertificateBuilder::new("LEAF").build();
        let anchor = CertificateBuilder::new("CA").trusted().build();
        let root = CertificateBuilder::new("ROOT").trusted().build();
        let chain = [&leaf, &anchor, &root];
        let ids: Vec<_> = validated_prefix(&chain).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["LEAF", "CA"]);
    }
}
