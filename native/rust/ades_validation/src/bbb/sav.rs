// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::context::ValidationContext;
use crate::crypto::{evaluate_target, token_targets};
use crate::report::{Block, BlockDetail, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Check, ConstraintChain, Indication, MessageTag, SubIndication};
use ades_validation_policy::level_of;

/// Signature acceptance validation, at the current time.
///
/// The block detail holds the cryptographic validation of the token's own signature value.
pub(crate) fn signature_acceptance(ctx: &ValidationContext<'_>, token: Token<'_>) -> Block {
    let context = token.context();
    let mut chain = ConstraintChain::new();

    if let Token::Signature(signature) = token {
        let structural = ctx
            .policy
            .signature_constraints(context)
            .and_then(|c| level_of(&c.structural_validation));
        chain.check(
            Check::new(MessageTag::BBB_SAV_ISSV, signature.structural_validation != Some(false))
                .level(structural)
                .answer(MessageTag::BBB_SAV_ISSV_ANS)
                .on_failure(Indication::Indeterminate, SubIndication::SigConstraintsFailure),
        );

        if let Some(constraints) = ctx.policy.signed_attributes(context) {
            let present = &signature.signed_attributes;
            let checks = [
                (MessageTag::BBB_SAV_ISQPSTP, MessageTag::BBB_SAV_ISQPSTP_ANS, &constraints.signing_time, present.signing_time),
                (MessageTag::BBB_SAV_ISQPCTP, MessageTag::BBB_SAV_ISQPCTP_ANS, &constraints.content_type, present.content_type),
                (MessageTag::BBB_SAV_ISQPCHP, MessageTag::BBB_SAV_ISQPCHP_ANS, &constraints.content_hints, present.content_hints),
                (
                    MessageTag::BBB_SAV_ISQPCIP,
                    MessageTag::BBB_SAV_ISQPCIP_ANS,
                    &constraints.content_identifier,
                    present.content_identifier,
                ),
                (
                    MessageTag::BBB_SAV_ISQPXTIP,
                    MessageTag::BBB_SAV_ISQPXTIP_ANS,
                    &constraints.commitment_type_indication,
                    present.commitment_type_indication,
                ),
                (
                    MessageTag::BBB_SAV_ISQPSLP,
                    MessageTag::BBB_SAV_ISQPSLP_ANS,
                    &constraints.signer_location,
                    present.signer_location,
                ),
                (
                    MessageTag::BBB_SAV_ISQPCTSIP,
                    MessageTag::BBB_SAV_ISQPCTSIP_ANS,
                    &constraints.content_timestamp,
                    present.content_timestamp,
                ),
            ];
            for (name, answer, constraint, outcome) in checks {
                chain.check(
                    Check::new(name, outcome)
                        .level(level_of(constraint))
                        .answer(answer)
                        .on_failure(Indication::Indeterminate, SubIndication::SigConstraintsFailure),
                );
            }
        }
    }

    let mut main = None;
    for target in token_targets(ctx, token) {
        let Some(outcome) = evaluate_target(ctx, &target, ctx.current_time) else {
            continue;
        };
        chain.check(outcome.check(MessageTag::ASCCM, SubIndication::CryptoConstraintsFailureNoPoe));
        if main.is_none() {
            main = Some(outcome.validation);
        }
    }

    let block = Block::from_chain(BlockKind::Sav, token.id(), chain);
    match main {
        Some(validation) => block.with_detail(BlockDetail::Cryptographic(validation)),
        None => block,
    }
}
