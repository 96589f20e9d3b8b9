// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cryptographic suitability of the algorithms a token uses.

use crate::context::{sub_context, SuiteKey, ValidationContext};
use crate::token::Token;
use ades_validation_conclusion::{Check, ConstraintChain, Indication, Message, MessageTag, SubIndication};
use ades_validation_diagnostic::{
    BasicSignature, Certificate, DigestAlgorithm, DigestMatcherType, EncryptionAlgorithm, Revocation,
};
use ades_validation_policy::{level_of, Context, CryptographicSuite, Expiration, Level};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Algorithms evaluated by one cryptographic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_algorithm: Option<EncryptionAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_algorithm: Option<DigestAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_length: Option<u32>,
}

/// Outcome of a cryptographic check, kept on the block that ran it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptographicValidation {
    pub algorithm: AlgorithmDescription,
    /// Earliest configured expiration of the algorithms involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_after: Option<DateTime<Utc>>,
    pub secure: bool,
    pub validation_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concluding_message: Option<Message>,
}

/// One place in a token where an algorithm is used.
#[derive(Debug, Clone)]
pub(crate) struct CryptoTarget {
    pub(crate) position: MessageTag,
    pub(crate) algorithm: AlgorithmDescription,
    pub(crate) suite: SuiteKey,
    /// Only the digest algorithm is relevant.
    pub(crate) digest_only: bool,
    /// Level of an enabling constraint; the less severe of it and the suite's level applies.
    pub(crate) cap: Option<Level>,
}

impl CryptoTarget {
    pub(crate) fn signature(position: MessageTag, signature: &BasicSignature, suite: SuiteKey) -> Self {
        Self {
            position,
            algorithm: AlgorithmDescription {
                encryption_algorithm: signature.encryption_algorithm,
                digest_algorithm: signature.digest_algorithm,
                key_length: signature.key_length,
            },
            suite,
            digest_only: false,
            cap: None,
        }
    }

    pub(crate) fn digest(position: MessageTag, digest: Option<DigestAlgorithm>, suite: SuiteKey) -> Self {
        Self {
            position,
            algorithm: AlgorithmDescription {
                digest_algorithm: digest,
                ..AlgorithmDescription::default()
            },
            suite,
            digest_only: true,
            cap: None,
        }
    }

    pub(crate) fn capped(mut self, cap: Level) -> Self {
        self.cap = Some(cap);
        self
    }
}

/// Result of evaluating a [`CryptoTarget`] against its suite.
#[derive(Debug, Clone)]
pub(crate) struct CryptoOutcome {
    pub(crate) level: Level,
    pub(crate) answer: Message,
    pub(crate) validation: CryptographicValidation,
}

impl CryptoOutcome {
    pub(crate) fn is_secure(&self) -> bool {
        self.validation.secure
    }

    /// The check reported by a validation block for this outcome.
    pub(crate) fn check(&self, name: MessageTag, sub_indication: SubIndication) -> Check {
        Check::new(name, self.is_secure())
            .level(Some(self.level))
            .answer(self.answer.clone())
            .on_failure(Indication::Indeterminate, sub_indication)
    }
}

pub(crate) fn digest_position(matcher_type: DigestMatcherType) -> MessageTag {
    match matcher_type {
        DigestMatcherType::MessageDigest => MessageTag::ACCM_POS_MESS_DIGEST,
        DigestMatcherType::SignedProperties => MessageTag::ACCM_POS_SIGND_PRT,
        DigestMatcherType::Reference | DigestMatcherType::ObjectReference => MessageTag::ACCM_POS_REF,
        DigestMatcherType::KeyInfo => MessageTag::ACCM_POS_KEY,
        DigestMatcherType::ManifestEntry => MessageTag::ACCM_POS_MAN_ENT,
        DigestMatcherType::MessageImprint => MessageTag::ACCM_POS_MESS_IMP,
        DigestMatcherType::ContentDigest => MessageTag::ACCM_POS_CONTENT_DIGEST,
    }
}

/// Algorithms a token relies on, excluding its certificate chain.
pub(crate) fn token_targets(ctx: &ValidationContext<'_>, token: Token<'_>) -> Vec<CryptoTarget> {
    let context = token.context();
    let suite = SuiteKey::Token(context);
    let mut targets = vec![CryptoTarget::signature(token.signature_position(), token.basic_signature(), suite)];
    match token {
        Token::Signature(signature) => {
            for matcher in &signature.digest_matchers {
                targets.push(CryptoTarget::digest(
                    digest_position(matcher.matcher_type),
                    matcher.digest_algorithm,
                    suite,
                ));
            }
            let cap = ctx
                .policy
                .signed_attributes(context)
                .and_then(|s| level_of(&s.signing_certificate_digest_algorithm));
            if let Some(cap) = cap {
                let digest = signature.signing_certificate.as_ref().and_then(|r| r.digest_algorithm);
                targets.push(CryptoTarget::digest(MessageTag::ACCM_POS_SIGND_CERT_REF, digest, suite).capped(cap));
            }
        }
        Token::Timestamp(timestamp) => {
            targets.push(CryptoTarget::digest(
                MessageTag::ACCM_POS_MESS_IMP,
                timestamp.message_imprint.digest_algorithm,
                suite,
            ));
        }
        Token::Revocation(_) | Token::Certificate(_) => {}
    }
    targets
}

/// Every algorithm a token relies on: its own, its certificates' and its selected revocations'.
pub(crate) fn all_targets(
    ctx: &ValidationContext<'_>,
    token: Token<'_>,
    chain: &[&Certificate],
    revocations: &[&Revocation],
) -> Vec<CryptoTarget> {
    let context = token.context();
    let mut targets = match token {
        Token::Certificate(_) => Vec::new(),
        _ => token_targets(ctx, token),
    };
    for (position, certificate) in chain.iter().enumerate() {
        if certificate.trusted {
            break;
        }
        targets.push(CryptoTarget::signature(
            MessageTag::ACCM_POS_CERT_SIG,
            &certificate.basic_signature,
            SuiteKey::Certificate(context, sub_context(position)),
        ));
    }
    for revocation in revocations {
        targets.push(CryptoTarget::signature(
            MessageTag::ACCM_POS_REVOC_SIG,
            &revocation.basic_signature,
            SuiteKey::Token(Context::Revocation),
        ));
    }
    targets
}

/// Adds one `name` check per target evaluated at `time`. Returns false when any check is NOT_OK.
pub(crate) fn check_targets_at(
    chain: &mut ConstraintChain,
    ctx: &ValidationContext<'_>,
    targets: &[CryptoTarget],
    time: DateTime<Utc>,
    name: MessageTag,
    sub_indication: SubIndication,
) -> bool {
    let mut all_ok = true;
    for target in targets {
        if let Some(outcome) = evaluate_target(ctx, target, time) {
            all_ok &= chain.check(outcome.check(name, sub_indication));
        }
    }
    all_ok
}

/// Whether every target is acceptable at `time`, ignoring levels below FAIL.
pub(crate) fn targets_reliable_at(ctx: &ValidationContext<'_>, targets: &[CryptoTarget], time: DateTime<Utc>) -> bool {
    targets.iter().all(|target| match evaluate_target(ctx, target, time) {
        Some(outcome) => outcome.is_secure() || outcome.level != Level::Fail,
        None => true,
    })
}

fn earliest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Evaluates `target` at `time`. Returns `None` when no suite applies.
pub(crate) fn evaluate_target(
    ctx: &ValidationContext<'_>,
    target: &CryptoTarget,
    time: DateTime<Utc>,
) -> Option<CryptoOutcome> {
    let suite = ctx.suite(target.suite)?;
    let mut outcome = evaluate_with_suite(suite, target, time);
    if let Some(cap) = target.cap {
        outcome.level = outcome.level.least_severe(cap);
    }
    Some(outcome)
}

enum Failure {
    Encryption,
    Digest,
    KeySize,
    DigestExpiration,
    EncryptionExpiration,
}

pub(crate) fn evaluate_with_suite(
    suite: &CryptographicSuite,
    target: &CryptoTarget,
    time: DateTime<Utc>,
) -> CryptoOutcome {
    let algorithm = target.algorithm;
    let position = target.position;

    let digest_expiration = algorithm.digest_algorithm.map(|d| suite.digest_expiration(d));
    let encryption_expiration = if target.digest_only {
        None
    } else {
        algorithm
            .encryption_algorithm
            .map(|e| suite.encryption_expiration(e, algorithm.key_length.unwrap_or(0)))
    };
    let not_after = earliest(
        digest_expiration.and_then(|e| e.date()),
        encryption_expiration.and_then(|e| e.date()),
    );

    let failure = find_failure(suite, target, time, digest_expiration, encryption_expiration);
    let (level, answer) = match &failure {
        None => (suite.level_at(time), Message::new(MessageTag::ASCCM)),
        Some((kind, answer)) => {
            let level = match kind {
                Failure::Encryption => suite.encryption_level(time),
                Failure::Digest => suite.digest_level(time),
                Failure::KeySize => suite.key_size_level(time),
                Failure::DigestExpiration | Failure::EncryptionExpiration => suite.expiration_level(time),
            };
            (level, answer.clone().with_tag(position))
        }
    };

    CryptoOutcome {
        level,
        answer: answer.clone(),
        validation: CryptographicValidation {
            algorithm,
            not_after,
            secure: failure.is_none(),
            validation_time: time,
            concluding_message: failure.map(|_| answer),
        },
    }
}

fn expiration_failure(
    expiration: Expiration,
    listed: bool,
    has_dates: bool,
    time: DateTime<Utc>,
    name: &str,
) -> Option<Message> {
    match expiration {
        Expiration::At(date) if time >= date => Some(Message::new(MessageTag::ASCCM_ANS_5).with_text(name)),
        Expiration::NotConfigured if has_dates && !listed => {
            Some(Message::new(MessageTag::ASCCM_ANS_4).with_text(name))
        }
        _ => None,
    }
}

fn find_failure(
    suite: &CryptographicSuite,
    target: &CryptoTarget,
    time: DateTime<Utc>,
    digest_expiration: Option<Expiration>,
    encryption_expiration: Option<Expiration>,
) -> Option<(Failure, Message)> {
    let algorithm = target.algorithm;

    if !target.digest_only {
        match algorithm.encryption_algorithm {
            Some(encryption) if suite.is_encryption_acceptable(encryption) => {}
            Some(encryption) => {
                return Some((Failure::Encryption, Message::new(MessageTag::ASCCM_ANS_1).with_text(encryption.name())))
            }
            None => return Some((Failure::Encryption, Message::new(MessageTag::ASCCM_ANS_1).with_text("?"))),
        }
    }

    match algorithm.digest_algorithm {
        Some(digest) if suite.is_digest_acceptable(digest) => {}
        Some(digest) => return Some((Failure::Digest, Message::new(MessageTag::ASCCM_ANS_2).with_text(digest.name()))),
        None => return Some((Failure::Digest, Message::new(MessageTag::ASCCM_ANS_2).with_text("?"))),
    }

    if let Some(encryption) = algorithm.encryption_algorithm.filter(|_| !target.digest_only) {
        let key_length = algorithm.key_length.unwrap_or(0);
        if let Some(min) = suite.min_key_size(encryption) {
            if key_length < min {
                let answer = Message::new(MessageTag::ASCCM_ANS_3)
                    .with_text(encryption.name())
                    .with_text(key_length.to_string());
                return Some((Failure::KeySize, answer));
            }
        }
    }

    if let (Some(digest), Some(expiration)) = (algorithm.digest_algorithm, digest_expiration) {
        let listed = suite.lists_digest(digest);
        if let Some(answer) = expiration_failure(expiration, listed, suite.has_expiration_dates(), time, digest.name()) {
            return Some((Failure::DigestExpiration, answer));
        }
    }

    if let (Some(encryption), Some(expiration)) = (algorithm.encryption_algorithm, encryption_expiration) {
        let listed = suite.lists_encryption(encryption);
        if let Some(answer) =
            expiration_failure(expiration, listed, suite.has_expiration_dates(), time, encryption.name())
        {
            let answer = answer.with_text(algorithm.key_length.unwrap_or(0).to_string());
            return Some((Failure::EncryptionExpiration, answer));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ades_validation_policy::{Context, ValidationPolicy};
    use chrono::TimeZone;

    fn default_suite() -> CryptographicSuite {
        ValidationPolicy::default_policy()
            .cryptographic_suite(Context::Signature)
            .unwrap()
            .unwrap()
    }

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap()
    }

    fn rsa(digest: DigestAlgorithm, key_length: u32) -> CryptoTarget {
        CryptoTarget::signature(
            MessageTag::ACCM_POS_SIG_SIG,
            &BasicSignature::new(EncryptionAlgorithm::Rsa, digest, key_length),
            SuiteKey::Token(Context::Signature),
        )
    }

    #[test]
    fn modern_parameters_are_secure() {
        let outcome = evaluate_with_suite(&default_suite(), &rsa(DigestAlgorithm::Sha256, 3072), at(2030));
        assert!(outcome.is_secure());
        assert!(outcome.validation.not_after.is_none());
        assert!(outcome.validation.concluding_message.is_none());
    }

    #[test]
    fn expired_digest_reports_algorithm_and_position() {
        let outcome = evaluate_with_suite(&default_suite(), &rsa(DigestAlgorithm::Sha1, 2048), at(2015));
        assert!(!outcome.is_secure());
        assert_eq!(outcome.answer.tag, MessageTag::ASCCM_ANS_5);
        assert!(outcome.answer.has_arg_text("SHA1"));
        assert!(outcome.answer.has_arg_tag(MessageTag::ACCM_POS_SIG_SIG));
        assert_eq!(outcome.level, Level::Fail);
    }

    #[test]
    fn expiration_is_reached_on_the_configured_instant() {
        let suite = default_suite();
        let date = suite.digest_expiration(DigestAlgorithm::Sha1).date().unwrap();
        let target = rsa(DigestAlgorithm::Sha1, 2048);
        assert!(!evaluate_with_suite(&suite, &target, date).is_secure());
        assert!(evaluate_with_suite(&suite, &target, date - chrono::Duration::seconds(1)).is_secure());
    }

    #[test]
    fn weak_key_uses_floor_entry() {
        let outcome = evaluate_with_suite(&default_suite(), &rsa(DigestAlgorithm::Sha256, 1023), at(2017));
        assert!(!outcome.is_secure());
        assert_eq!(outcome.answer.tag, MessageTag::ASCCM_ANS_5);
        assert_eq!(outcome.validation.not_after, Some(Utc.with_ymd_and_hms(2009, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn key_below_minimum_is_rejected_before_expiration() {
        let outcome = evaluate_with_suite(&default_suite(), &rsa(DigestAlgorithm::Sha256, 512), at(2000));
        assert_eq!(outcome.answer.tag, MessageTag::ASCCM_ANS_3);
    }

    #[test]
    fn unlisted_digest_is_rejected() {
        let outcome = evaluate_with_suite(&default_suite(), &rsa(DigestAlgorithm::Md2, 2048), at(2000));
        assert_eq!(outcome.answer.tag, MessageTag::ASCCM_ANS_2);
    }

    #[test]
    fn digest_only_target_ignores_key() {
        let target = CryptoTarget::digest(
            MessageTag::ACCM_POS_MESS_IMP,
            Some(DigestAlgorithm::Sha256),
            SuiteKey::Token(Context::Timestamp),
        );
        assert!(evaluate_with_suite(&default_suite(), &target, at(2030)).is_secure());
    }
}
