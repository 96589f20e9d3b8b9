// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::context::token_context;
use ades_validation_conclusion::MessageTag;
use ades_validation_diagnostic::{
    BasicSignature, Certificate, Revocation, Signature, SigningCertificateRef, Timestamp, TokenKind,
};
use ades_validation_policy::Context;

/// A token the basic building blocks run for.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Token<'a> {
    Signature(&'a Signature),
    Timestamp(&'a Timestamp),
    Revocation(&'a Revocation),
    Certificate(&'a Certificate),
}

impl<'a> Token<'a> {
    pub(crate) fn id(&self) -> &'a str {
        match self {
            Token::Signature(s) => &s.id,
            Token::Timestamp(t) => &t.id,
            Token::Revocation(r) => &r.id,
            Token::Certificate(c) => &c.id,
        }
    }

    pub(crate) fn kind(&self) -> TokenKind {
        match self {
            Token::Signature(_) => TokenKind::Signature,
            Token::Timestamp(_) => TokenKind::Timestamp,
            Token::Revocation(_) => TokenKind::Revocation,
            Token::Certificate(_) => TokenKind::Certificate,
        }
    }

    pub(crate) fn context(&self) -> Context {
        let counter_signature = matches!(self, Token::Signature(s) if s.is_counter_signature());
        token_context(self.kind(), counter_signature)
    }

    pub(crate) fn basic_signature(&self) -> &'a BasicSignature {
        match self {
            Token::Signature(s) => &s.basic_signature,
            Token::Timestamp(t) => &t.basic_signature,
            Token::Revocation(r) => &r.basic_signature,
            Token::Certificate(c) => &c.basic_signature,
        }
    }

    pub(crate) fn signing_certificate_ref(&self) -> Option<&'a SigningCertificateRef> {
        match self {
            Token::Signature(s) => s.signing_certificate.as_ref(),
            Token::Timestamp(t) => t.signing_certificate.as_ref(),
            Token::Revocation(r) => r.signing_certificate.as_ref(),
            Token::Certificate(_) => None,
        }
    }

    /// For a certificate token the certificate itself heads the chain.
    pub(crate) fn signing_certificate_id(&self) -> Option<&'a str> {
        match self {
            Token::Certificate(c) => Some(&c.id),
            _ => self.signing_certificate_ref().and_then(|r| r.certificate_id.as_deref()),
        }
    }

    pub(crate) fn chain_ids(&self) -> &'a [String] {
        match self {
            Token::Signature(s) => &s.certificate_chain,
            Token::Timestamp(t) => &t.certificate_chain,
            Token::Revocation(r) => &r.certificate_chain,
            Token::Certificate(c) => &c.certificate_chain,
        }
    }

    /// Position tag of the token's own signature value.
    pub(crate) fn signature_position(&self) -> MessageTag {
        match self {
            Token::Signature(_) => MessageTag::ACCM_POS_SIG_SIG,
            Token::Timestamp(_) => MessageTag::ACCM_POS_TST_SIG,
            Token::Revocation(_) => MessageTag::ACCM_POS_REVOC_SIG,
            Token::Certificate(_) => MessageTag::ACCM_POS_CERT_SIG,
        }
    }
}
