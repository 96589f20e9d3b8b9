// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::context::ValidationContext;
use crate::report::{Block, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Check, ConstraintChain, Indication, MessageTag, SubIndication};
use ades_validation_policy::{level_of, SubContext};

/// Identification of the signing certificate.
pub(crate) fn identification(ctx: &ValidationContext<'_>, token: Token<'_>) -> Block {
    let context = token.context();
    let mut chain = ConstraintChain::new();

    let identified = ctx.signing_certificate(token.signing_certificate_id()).is_some();
    let recognition = ctx
        .certificate_constraints(context, SubContext::SigningCertificate)
        .and_then(|c| level_of(&c.recognition));
    chain.check(
        Check::new(MessageTag::BBB_ICS_ISCI, identified)
            .level(recognition)
            .answer(MessageTag::BBB_ICS_ISCI_ANS)
            .on_failure(Indication::Indeterminate, SubIndication::NoSigningCertificateFound),
    );

    if let (Token::Signature(_), Some(attributes)) = (token, ctx.policy.signed_attributes(context)) {
        let reference = token.signing_certificate_ref();
        let checks = [
            (
                MessageTag::BBB_ICS_ISASCP,
                MessageTag::BBB_ICS_ISASCP_ANS,
                level_of(&attributes.signing_certificate_present),
                reference.is_some_and(|r| r.attribute_present),
            ),
            (
                MessageTag::BBB_ICS_ISACDP,
                MessageTag::BBB_ICS_ISACDP_ANS,
                level_of(&attributes.signing_certificate_digest_value_present),
                reference.is_some_and(|r| r.digest_value_present),
            ),
            (
                MessageTag::BBB_ICS_ICDVV,
                MessageTag::BBB_ICS_ICDVV_ANS,
                level_of(&attributes.signing_certificate_digest_value_match),
                reference.is_some_and(|r| r.digest_value_match),
            ),
            (
                MessageTag::BBB_ICS_AIDNASNE,
                MessageTag::BBB_ICS_AIDNASNE_ANS,
                level_of(&attributes.signing_certificate_issuer_serial_match),
                reference.is_some_and(|r| r.issuer_serial_match),
            ),
        ];
        for (name, answer, level, outcome) in checks {
            chain.check(
                Check::new(name, outcome)
                    .level(level)
                    .answer(answer)
                    .on_failure(Indication::Indeterminate, SubIndication::NoSigningCertificateFound),
            );
        }
    }

    Block::from_chain(BlockKind::Ics, token.id(), chain)
}
