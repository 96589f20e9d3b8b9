// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trusted list analysis.

use crate::context::ValidationContext;
use crate::report::{Block, BlockKind};
use ades_validation_conclusion::{Check, ConstraintChain, Indication, Message, MessageTag, SubIndication};
use ades_validation_diagnostic::TrustedList;
use ades_validation_policy::level_of;

/// Checks freshness, expiry, version and signature of `list` against the eIDAS constraints.
pub(crate) fn trusted_list_analysis(ctx: &ValidationContext<'_>, list: &TrustedList) -> Block {
    let now = ctx.current_time;
    let eidas = ctx.policy.eidas_constraints();
    let mut chain = ConstraintChain::new();

    if let Some(freshness) = eidas.and_then(|e| e.tl_freshness) {
        chain.check(
            Check::new(MessageTag::QUAL_TL_FRESH, now - list.issue_date <= freshness.duration())
                .level(Some(freshness.level))
                .answer(MessageTag::QUAL_TL_FRESH_ANS)
                .on_failure(Indication::Indeterminate, SubIndication::TryLater),
        );
    }

    chain.check(
        Check::new(MessageTag::QUAL_TL_EXP, list.next_update.is_some_and(|next| now <= next))
            .level(eidas.and_then(|e| level_of(&e.tl_not_expired)))
            .answer(Message::new(MessageTag::QUAL_TL_EXP_ANS).with_text(list.id.as_str()))
            .on_failure(Indication::Indeterminate, SubIndication::TryLater),
    );

    let version = list.version.map(|v| v.to_string());
    chain.check(
        Check::new(
            MessageTag::QUAL_TL_VERSION,
            version
                .as_deref()
                .zip(eidas.and_then(|e| e.tl_version.as_ref()))
                .is_some_and(|(v, accepted)| accepted.accepts(v)),
        )
        .level(eidas.and_then(|e| level_of(&e.tl_version)))
        .answer(MessageTag::QUAL_TL_VERSION_ANS)
        .on_failure(Indication::Failed, SubIndication::FormatFailure),
    );

    chain.check(
        Check::new(MessageTag::QUAL_TL_WS, list.well_signed)
            .level(eidas.and_then(|e| level_of(&e.tl_well_signed)))
            .answer(MessageTag::QUAL_TL_WS_ANS)
            .on_failure(Indication::Failed, SubIndication::SigCryptoFailure),
    );

    Block::from_chain(BlockKind::TlAnalysis, &list.id, chain)
}
