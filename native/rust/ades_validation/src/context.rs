// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::ValidationError;
use crate::index::TokenIndex;
use ades_validation_diagnostic::{Certificate, DiagnosticData, TokenKind};
use ades_validation_policy::{
    BasicSignatureConstraints, CertificateConstraints, Context, CryptographicSuite, SubContext, ValidationPolicy,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Which cryptographic suite applies to a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SuiteKey {
    Token(Context),
    Certificate(Context, SubContext),
}

/// Everything a validation block reads. Built per `execute()` call and dropped with it.
pub(crate) struct ValidationContext<'a> {
    pub(crate) data: &'a DiagnosticData,
    pub(crate) policy: &'a ValidationPolicy,
    pub(crate) index: TokenIndex<'a>,
    pub(crate) current_time: DateTime<Utc>,
    suites: HashMap<SuiteKey, CryptographicSuite>,
}

const CONTEXTS: [Context; 4] = [
    Context::Signature,
    Context::CounterSignature,
    Context::Timestamp,
    Context::Revocation,
];

impl<'a> ValidationContext<'a> {
    pub(crate) fn new(
        data: &'a DiagnosticData,
        policy: &'a ValidationPolicy,
        current_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let index = TokenIndex::build(data)?;
        let mut suites = HashMap::new();
        for context in CONTEXTS {
            if let Some(suite) = policy.cryptographic_suite(context)? {
                suites.insert(SuiteKey::Token(context), suite);
            }
            for sub in [SubContext::SigningCertificate, SubContext::CaCertificate] {
                if let Some(suite) = policy.certificate_cryptographic_suite(context, sub)? {
                    suites.insert(SuiteKey::Certificate(context, sub), suite);
                }
            }
        }
        Ok(Self {
            data,
            policy,
            index,
            current_time,
            suites,
        })
    }

    pub(crate) fn suite(&self, key: SuiteKey) -> Option<&CryptographicSuite> {
        self.suites.get(&key)
    }

    pub(crate) fn basic_constraints(&self, context: Context) -> Option<&'a BasicSignatureConstraints> {
        self.policy.basic_signature_constraints(context)
    }

    pub(crate) fn certificate_constraints(&self, context: Context, sub: SubContext) -> Option<&'a CertificateConstraints> {
        self.policy.certificate_constraints(context, sub)
    }

    /// Cryptographic suite and constraints of a certificate at `position` in its chain.
    pub(crate) fn certificate_scope(&self, context: Context, position: usize) -> CertificateScope<'a> {
        let sub = sub_context(position);
        CertificateScope {
            context,
            sub,
            constraints: self.policy.certificate_constraints(context, sub),
        }
    }

    pub(crate) fn signing_certificate(&self, id: Option<&str>) -> Option<&'a Certificate> {
        id.and_then(|id| self.index.certificate(id))
    }
}

pub(crate) fn sub_context(position: usize) -> SubContext {
    if position == 0 {
        SubContext::SigningCertificate
    } else {
        SubContext::CaCertificate
    }
}

/// Constraint context of one certificate in a chain.
#[derive(Clone, Copy)]
pub(crate) struct CertificateScope<'a> {
    pub(crate) context: Context,
    pub(crate) sub: SubContext,
    pub(crate) constraints: Option<&'a CertificateConstraints>,
}

impl CertificateScope<'_> {
    pub(crate) fn suite_key(&self) -> SuiteKey {
        SuiteKey::Certificate(self.context, self.sub)
    }
}

/// Policy context for a token.
pub(crate) fn token_context(kind: TokenKind, counter_signature: bool) -> Context {
    match kind {
        TokenKind::Signature if counter_signature => Context::CounterSignature,
        TokenKind::Signature | TokenKind::Certificate => Context::Signature,
        TokenKind::Timestamp => Context::Timestamp,
        TokenKind::Revocation => Context::Revocation,
    }
}
