// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Revocation selection (CRS), acceptance (RAC) and freshness (RFC).

use crate::bbb::xcv::anchor_position;
use crate::context::{CertificateScope, SuiteKey, ValidationContext};
use crate::crypto::{evaluate_target, CryptoTarget};
use crate::report::{Block, BlockDetail, BlockKind};
use ades_validation_conclusion::{Check, ConstraintChain, Indication, MessageTag, SubIndication};
use ades_validation_diagnostic::{Certificate, CertificateStatus, Revocation};
use ades_validation_policy::{level_of, CertificateConstraints, Context, Level, RevocationConstraints};
use chrono::{DateTime, Utc};

/// Outcome of the revocation selection for one certificate.
pub(crate) struct RevocationSelection<'a> {
    pub(crate) block: Block,
    /// RAC-passed revocation with the greatest production date.
    pub(crate) latest: Option<&'a Revocation>,
}

pub(crate) fn revocation_selection<'a>(
    ctx: &ValidationContext<'a>,
    certificate: &'a Certificate,
    time: DateTime<Utc>,
) -> RevocationSelection<'a> {
    let mut chain = ConstraintChain::new();
    let mut children = Vec::new();
    let mut latest: Option<&'a Revocation> = None;

    for revocation in ctx.index.revocations_of(certificate) {
        let rac = revocation_acceptance(ctx, certificate, revocation, time);
        chain.check(
            Check::new(MessageTag::BBB_CRS_IRDA, rac.is_passed())
                .inform()
                .answer(MessageTag::BBB_CRS_IRDA_ANS)
                .block_id(rac.id.clone()),
        );
        if rac.is_passed() && latest.map_or(true, |l| revocation.production_date > l.production_date) {
            latest = Some(revocation);
        }
        children.push(rac);
    }

    chain.check(
        Check::new(MessageTag::BBB_CRS_ILRDA, latest.is_some())
            .fail()
            .answer(MessageTag::BBB_CRS_ILRDA_ANS)
            .on_failure(Indication::Indeterminate, SubIndication::TryLater),
    );

    let block = Block::from_chain(BlockKind::Crs, &certificate.id, chain)
        .with_children(children)
        .with_detail(BlockDetail::SelectedRevocation {
            revocation_id: latest.map(|r| r.id.clone()),
        });
    RevocationSelection { block, latest }
}

/// RAC-passed revocations of `certificate` with their production dates, in snapshot order.
pub(crate) fn acceptable_revocations<'a>(
    ctx: &ValidationContext<'a>,
    certificate: &'a Certificate,
    time: DateTime<Utc>,
) -> Vec<&'a Revocation> {
    ctx.index
        .revocations_of(certificate)
        .into_iter()
        .filter(|r| revocation_acceptance(ctx, certificate, r, time).is_passed())
        .collect()
}

fn is_consistent(certificate: &Certificate, revocation: &Revocation) -> bool {
    let after_issuance = revocation.this_update >= certificate.not_before;
    let covers_validity = revocation.this_update <= certificate.not_after
        || revocation
            .expired_certs_retention()
            .is_some_and(|retention| retention <= certificate.not_after);
    after_issuance && covers_validity
}

/// Whether the chain of the revocation's signing certificate reaches a trust anchor that is not
/// past its sunset date at `time`.
fn is_issuer_trusted(ctx: &ValidationContext<'_>, revocation: &Revocation, time: DateTime<Utc>) -> bool {
    let chain = ctx
        .index
        .chain(revocation.signing_certificate_id(), &revocation.certificate_chain);
    match anchor_position(&chain) {
        Some(anchor) => chain[anchor].sunset_date.map_or(true, |sunset| time < sunset),
        None => false,
    }
}

/// Revocation acceptance checks for one candidate at `time`.
pub(crate) fn revocation_acceptance(
    ctx: &ValidationContext<'_>,
    certificate: &Certificate,
    revocation: &Revocation,
    time: DateTime<Utc>,
) -> Block {
    let constraints = ctx.policy.revocation_constraints();
    let level = |pick: fn(&RevocationConstraints) -> Option<Level>| constraints.and_then(pick);
    let issuer = ctx.signing_certificate(revocation.signing_certificate_id());
    let entry = certificate.revocation_entry(&revocation.id);
    let mut chain = ConstraintChain::new();

    let try_later = |check: Check| check.on_failure(Indication::Indeterminate, SubIndication::TryLater);

    chain.check(try_later(
        Check::new(MessageTag::BBB_RAC_IRC, is_consistent(certificate, revocation))
            .level(level(|c| level_of(&c.consistent)))
            .answer(MessageTag::BBB_RAC_IRC_ANS),
    ));
    chain.check(try_later(
        Check::new(
            MessageTag::BBB_RAC_ISK,
            entry.is_some_and(|e| e.status != CertificateStatus::Unknown),
        )
        .level(level(|c| level_of(&c.unknown_status)))
        .answer(MessageTag::BBB_RAC_ISK_ANS),
    ));
    chain.check(try_later(
        Check::new(MessageTag::BBB_RAC_IRIF, issuer.is_some())
            .level(level(|c| level_of(&c.revocation_issuer_known)))
            .answer(MessageTag::BBB_RAC_IRIF_ANS),
    ));
    if issuer.is_some() {
        chain.check(try_later(
            Check::new(MessageTag::BBB_RAC_IRIT, is_issuer_trusted(ctx, revocation, time))
                .level(level(|c| level_of(&c.revocation_issuer_trusted)))
                .answer(MessageTag::BBB_RAC_IRIT_ANS),
        ));
    }
    chain.check(try_later(
        Check::new(MessageTag::BBB_RAC_ISI, revocation.basic_signature.signature_intact)
            .level(ctx.basic_constraints(Context::Revocation).and_then(|b| level_of(&b.signature_intact)))
            .answer(MessageTag::BBB_RAC_ISI_ANS),
    ));
    let self_issued = revocation.is_ocsp() && revocation.signing_certificate_id() == Some(certificate.id.as_str());
    chain.check(try_later(
        Check::new(MessageTag::BBB_RAC_ISOR, !self_issued)
            .level(level(|c| level_of(&c.self_issued_ocsp)))
            .answer(MessageTag::BBB_RAC_ISOR_ANS),
    ));
    if revocation.is_ocsp() {
        chain.check(try_later(
            Check::new(MessageTag::BBB_RAC_OCHP, revocation.cert_hash_present)
                .level(level(|c| level_of(&c.ocsp_cert_hash_present)))
                .answer(MessageTag::BBB_RAC_OCHP_ANS),
        ));
        chain.check(try_later(
            Check::new(MessageTag::BBB_RAC_OCHM, revocation.cert_hash_match)
                .level(level(|c| level_of(&c.ocsp_cert_hash_match)))
                .answer(MessageTag::BBB_RAC_OCHM_ANS),
        ));
    }
    chain.check(try_later(
        Check::new(
            MessageTag::BBB_RAC_ARIIVP,
            issuer.is_some_and(|i| i.is_valid_at(revocation.production_date)),
        )
        .level(level(|c| level_of(&c.issuer_valid_at_production_time)))
        .answer(MessageTag::BBB_RAC_ARIIVP_ANS),
    ));

    Block::from_chain(BlockKind::Rac, &revocation.id, chain).with_detail(BlockDetail::Revocation {
        revocation_id: revocation.id.clone(),
        production_date: revocation.production_date,
    })
}

/// Freshness of `revocation` at `time` and the level it is checked at.
///
/// Without a `revocation_freshness` constraint the revocation is fresh until its nextUpdate.
pub(crate) fn freshness(
    constraints: Option<&CertificateConstraints>,
    revocation: &Revocation,
    time: DateTime<Utc>,
) -> (bool, Level) {
    match constraints.and_then(|c| c.revocation_freshness.as_ref()) {
        Some(max) => (revocation.this_update >= time - max.duration(), max.level),
        None => (revocation.next_update.is_some_and(|next| time <= next), Level::Fail),
    }
}

/// Revocation freshness checks of the selected revocation at `time`.
pub(crate) fn revocation_freshness(
    ctx: &ValidationContext<'_>,
    scope: CertificateScope<'_>,
    revocation: &Revocation,
    time: DateTime<Utc>,
) -> Block {
    let constraints = scope.constraints;
    let mut chain = ConstraintChain::new();

    let next_update_level = constraints.and_then(|c| {
        if revocation.is_ocsp() {
            level_of(&c.ocsp_next_update_present)
        } else {
            level_of(&c.crl_next_update_present)
        }
    });
    chain.check(
        Check::new(MessageTag::BBB_RFC_NUP, revocation.next_update.is_some())
            .level(next_update_level)
            .answer(MessageTag::BBB_RFC_NUP_ANS)
            .on_failure(Indication::Indeterminate, SubIndication::TryLater),
    );

    let (fresh, level) = freshness(constraints, revocation, time);
    chain.check(
        Check::new(MessageTag::BBB_RFC_IRIF, fresh)
            .level(Some(level))
            .answer(MessageTag::BBB_RFC_IRIF_ANS)
            .on_failure(Indication::Indeterminate, SubIndication::TryLater),
    );

    let target = CryptoTarget::signature(
        MessageTag::ACCM_POS_REVOC_SIG,
        &revocation.basic_signature,
        SuiteKey::Token(Context::Revocation),
    );
    if let Some(outcome) = evaluate_target(ctx, &target, time) {
        chain.check(outcome.check(MessageTag::ASCCM, SubIndication::CryptoConstraintsFailureNoPoe));
    }

    Block::from_chain(BlockKind::Rfc, &revocation.id, chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ades_validation_policy::{TimeConstraint, TimeUnit};
    use ades_validation_test_utils::{CertificateBuilder, RevocationBuilder};
    use chrono::TimeZone;

    fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn default_freshness_is_next_update() {
        let crl = RevocationBuilder::crl("R-1")
            .this_update(day(2020, 1, 1))
            .next_update(day(2020, 2, 1))
            .build();
        assert!(freshness(None, &crl, day(2020, 1, 20)).0);
        assert!(!freshness(None, &crl, day(2020, 2, 2)).0);
    }

    #[test]
    fn configured_freshness_wins() {
        let crl = RevocationBuilder::crl("R-1")
            .this_update(day(2020, 1, 1))
            .next_update(day(2020, 6, 1))
            .build();
        let constraints = CertificateConstraints {
            revocation_freshness: Some(TimeConstraint::new(Level::Warn, 7, TimeUnit::Days)),
            ..CertificateConstraints::default()
        };
        assert_eq!(freshness(Some(&constraints), &crl, day(2020, 1, 20)), (false, Level::Warn));
    }

    #[test]
    fn revocation_after_expiry_is_consistent_with_retention() {
        let certificate = CertificateBuilder::new("C-1")
            .validity(day(2015, 1, 1), day(2018, 1, 1))
            .build();
        let late = RevocationBuilder::crl("R-1").this_update(day(2019, 1, 1)).build();
        assert!(!is_consistent(&certificate, &late));
        let retained = RevocationBuilder::crl("R-1")
            .this_update(day(2019, 1, 1))
            .expired_certs_on_crl(day(2010, 1, 1))
            .build();
        assert!(is_consistent(&certificate, &retained));
    }
}
