// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Validation process for signatures with time and long-term validation data.

use crate::bbb::revocation::{acceptable_revocations, freshness};
use crate::bbb::BasicBuildingBlocks;
use crate::context::ValidationContext;
use crate::crypto::{all_targets, check_targets_at};
use crate::process::{best_signature_time, ltv_acceptable, revocation_date, selected_revocations};
use crate::report::{Block, BlockDetail, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Check, Conclusion, ConstraintChain, Indication, Message, MessageTag, SubIndication};
use ades_validation_diagnostic::{Certificate, CertificateStatus, Signature, Timestamp};
use ades_validation_policy::{level_of, Level, SubContext};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Timestamps ordered as content, signature, validation data, archive.
fn is_coherent(timestamps: &[&Timestamp]) -> bool {
    timestamps.iter().all(|earlier| {
        timestamps.iter().all(|later| {
            earlier.timestamp_type.coherence_rank() >= later.timestamp_type.coherence_rank()
                || earlier.production_time <= later.production_time
        })
    })
}

/// A good revocation of `certificate` issued at or after `time`.
fn has_good_revocation_after(ctx: &ValidationContext<'_>, certificate: &Certificate, time: DateTime<Utc>) -> bool {
    ctx.index.revocations_of(certificate).into_iter().any(|r| {
        r.this_update >= time
            && certificate
                .revocation_entry(&r.id)
                .is_some_and(|e| e.status == CertificateStatus::Good)
    })
}

/// Runs the long-term level for `signature` on top of its basic building blocks.
///
/// `timestamp_conclusions` holds the basic conclusion of every timestamp, by id.
pub(crate) fn long_term_validation(
    ctx: &ValidationContext<'_>,
    signature: &Signature,
    basic: &BasicBuildingBlocks,
    timestamp_conclusions: &HashMap<String, Conclusion>,
) -> Block {
    let token = Token::Signature(signature);
    let context = token.context();
    let mut chain = ConstraintChain::new();
    // Lowered by every valid signature timestamp.
    let mut control_time = ctx.current_time;

    let acceptable = ltv_acceptable(&basic.conclusion);
    chain.check(
        Check::result_with(MessageTag::LTV_ABSV, &basic.id, &basic.conclusion, acceptable)
            .answer(MessageTag::LTV_ABSV_ANS),
    );
    if !acceptable {
        return finish(ctx, signature, chain, control_time);
    }

    let timestamp_valid = ctx.policy.timestamp_constraints().and_then(|t| level_of(&t.timestamp_valid));
    let covering = ctx.index.timestamps_covering(&signature.id);
    for timestamp in covering.iter().filter(|t| t.timestamp_type.is_signature_timestamp()) {
        let conclusion = timestamp_conclusions.get(&timestamp.id).cloned().unwrap_or_default();
        chain.check(
            Check::new(MessageTag::ADEST_ITVPC, conclusion.is_passed())
                .level(timestamp_valid)
                .answer(MessageTag::ADEST_ITVPC_ANS)
                .on_failure(
                    conclusion.indication.unwrap_or(Indication::Indeterminate),
                    conclusion.sub_indication,
                )
                .block_id(timestamp.id.as_str()),
        );
        if conclusion.is_passed() {
            control_time = control_time.min(timestamp.production_time);
            chain.add_info(
                Message::new(MessageTag::ADEST_ITVPC_INFO_1)
                    .with_text(timestamp.id.as_str())
                    .with_time(timestamp.production_time),
            );
        }
    }

    let signature_constraints = ctx.policy.signature_constraints(context);
    let chain_certificates = ctx.index.chain(token.signing_certificate_id(), token.chain_ids());
    let signing_certificate = chain_certificates.first().copied();
    let revocation_time_level = signature_constraints
        .and_then(|c| level_of(&c.revocation_time_against_best_signature_time))
        .unwrap_or(Level::Fail);
    let after_control_time = |date: Option<DateTime<Utc>>| date.is_some_and(|d| d > control_time);

    match basic.conclusion.sub_indication {
        Some(SubIndication::RevokedNoPoe) => {
            chain.check(
                Check::new(
                    MessageTag::ADEST_IRTPTBST,
                    after_control_time(signing_certificate.and_then(revocation_date)),
                )
                .level(Some(revocation_time_level))
                .answer(MessageTag::ADEST_IRTPTBST_ANS)
                .on_failure(Indication::Indeterminate, SubIndication::RevokedNoPoe),
            );
        }
        Some(SubIndication::RevokedCaNoPoe) => {
            let ca_revocation = chain_certificates.iter().skip(1).find_map(|c| revocation_date(c));
            chain.check(
                Check::new(MessageTag::ADEST_IRTPTBST, after_control_time(ca_revocation))
                    .level(Some(revocation_time_level))
                    .answer(MessageTag::ADEST_IRTPTBST_ANS)
                    .on_failure(Indication::Indeterminate, SubIndication::RevokedCaNoPoe),
            );
        }
        _ => {}
    }

    let sub_indication = basic.conclusion.sub_indication;
    if basic.conclusion.is_passed()
        || matches!(
            sub_indication,
            Some(SubIndication::OutOfBoundsNoPoe | SubIndication::OutOfBoundsNotRevoked)
        )
    {
        chain.check(
            Check::new(
                MessageTag::TSV_IBSTAIDOSC,
                signing_certificate.map_or(true, |c| control_time >= c.not_before),
            )
            .fail()
            .answer(Message::new(MessageTag::TSV_IBSTAIDOSC_ANS).with_time(control_time))
            .on_failure(Indication::Failed, SubIndication::NotYetValid),
        );
    }
    let before_expiry = signing_certificate.is_some_and(|c| control_time <= c.not_after);
    match sub_indication {
        Some(SubIndication::OutOfBoundsNotRevoked) => {
            chain.check(
                Check::new(MessageTag::TSV_ISCNVABST, before_expiry)
                    .fail()
                    .answer(MessageTag::TSV_ISCNVABST_ANS)
                    .on_failure(Indication::Indeterminate, SubIndication::OutOfBoundsNotRevoked),
            );
        }
        Some(SubIndication::OutOfBoundsNoPoe) => {
            let still_good =
                signing_certificate.is_some_and(|c| has_good_revocation_after(ctx, c, control_time));
            chain.check(
                Check::new(MessageTag::TSV_ISCNVABST, before_expiry && still_good)
                    .fail()
                    .answer(MessageTag::TSV_ISCNVABST_ANS)
                    .on_failure(Indication::Indeterminate, SubIndication::OutOfBoundsNoPoe),
            );
        }
        _ => {}
    }

    let coherence_level = signature_constraints
        .and_then(|c| level_of(&c.timestamp_coherence))
        .or_else(|| ctx.policy.timestamp_constraints().and_then(|t| level_of(&t.coherence)));
    chain.check(
        Check::new(MessageTag::TSV_ASTPTCT, is_coherent(&covering))
            .level(coherence_level)
            .answer(MessageTag::TSV_ASTPTCT_ANS)
            .on_failure(Indication::Indeterminate, SubIndication::TimestampOrderFailure),
    );

    if let Some(delay) = signature_constraints.and_then(|c| c.timestamp_delay) {
        let signing_time = signature.claimed_signing_time;
        chain.check(
            Check::new(MessageTag::ADEST_ISCSTP, signing_time.is_some())
                .level(Some(delay.level))
                .answer(MessageTag::ADEST_ISCSTP_ANS)
                .on_failure(Indication::Indeterminate, SubIndication::SigConstraintsFailure),
        );
        chain.check(
            Check::new(
                MessageTag::ADEST_ISTPTDABST,
                signing_time.is_some_and(|t| t + delay.duration() >= control_time),
            )
            .level(Some(delay.level))
            .answer(MessageTag::ADEST_ISTPTDABST_ANS)
            .on_failure(Indication::Indeterminate, SubIndication::SigConstraintsFailure),
        );
    }

    if sub_indication == Some(SubIndication::TryLater) {
        let constraints = ctx.certificate_constraints(context, SubContext::SigningCertificate);
        let latest = signing_certificate.and_then(|c| {
            acceptable_revocations(ctx, c, ctx.current_time)
                .into_iter()
                .max_by_key(|r| r.production_date)
        });
        let (fresh, level) = latest.map_or((false, Level::Fail), |r| freshness(constraints, r, control_time));
        chain.check(
            Check::new(MessageTag::ADEST_IRIFABST, fresh)
                .level(Some(level))
                .answer(MessageTag::ADEST_IRIFABST_ANS)
                .on_failure(Indication::Indeterminate, SubIndication::TryLater),
        );
    }

    let revocations = selected_revocations(ctx, basic);
    let targets = all_targets(ctx, token, &chain_certificates, &revocations);
    check_targets_at(
        &mut chain,
        ctx,
        &targets,
        control_time,
        MessageTag::TSV_WACRABST,
        SubIndication::CryptoConstraintsFailureNoPoe,
    );

    finish(ctx, signature, chain, control_time)
}

fn finish(
    ctx: &ValidationContext<'_>,
    signature: &Signature,
    chain: ConstraintChain,
    control_time: DateTime<Utc>,
) -> Block {
    Block::from_chain(BlockKind::LongTermData, &signature.id, chain).with_detail(BlockDetail::BestSignatureTime {
        best_signature_time: best_signature_time(signature, control_time, ctx.current_time),
        control_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ades_validation_diagnostic::{
        BasicSignature, DigestAlgorithm, DigestMatcher, DigestMatcherType, TimestampType,
    };
    use chrono::TimeZone;

    fn timestamp(kind: TimestampType, year: i32) -> Timestamp {
        Timestamp {
            id: format!("T-{year}"),
            timestamp_type: kind,
            production_time: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            basic_signature: BasicSignature::default(),
            signing_certificate: None,
            certificate_chain: Vec::new(),
            message_imprint: DigestMatcher::intact(DigestMatcherType::MessageImprint, DigestAlgorithm::Sha256),
            timestamped_objects: Vec::new(),
        }
    }

    #[test]
    fn archive_after_signature_timestamp_is_coherent() {
        let signature = timestamp(TimestampType::SignatureTimestamp, 2012);
        let archive = timestamp(TimestampType::ArchiveTimestamp, 2015);
        assert!(is_coherent(&[&signature, &archive]));
    }

    #[test]
    fn archive_before_signature_timestamp_is_not_coherent() {
        let signature = timestamp(TimestampType::SignatureTimestamp, 2015);
        let archive = timestamp(TimestampType::ArchiveTimestamp, 2012);
        assert!(!is_coherent(&[&archive, &signature]));
    }

    #[test]
    fn same_kind_in_any_order_is_coherent() {
        let first = timestamp(TimestampType::SignatureTimestamp, 2015);
        let second = timestamp(TimestampType::SignatureTimestamp, 2012);
        assert!(is_coherent(&[&first, &second]));
    }
}
