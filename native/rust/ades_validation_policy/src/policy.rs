// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::constraints::ANY_VALUE;
use crate::crypto::{CryptographicConstraint, CryptographicSuite};
use crate::default_policy::DEFAULT_POLICY;
use crate::error::PolicyError;
use crate::groups::{
    BasicSignatureConstraints, CertificateConstraints, EidasConstraints, RevocationConstraints,
    SignatureConstraints, SignedAttributesConstraints, TimestampConstraints,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static OID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-2](\.(0|[1-9][0-9]*))+$").unwrap());

/// Chain model used when sliding the control time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationModel {
    #[default]
    Shell,
    Chain,
    Hybrid,
}

/// Token family a constraint set applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Context {
    Signature,
    CounterSignature,
    Timestamp,
    Revocation,
}

/// Position of a certificate in its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubContext {
    SigningCertificate,
    CaCertificate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPolicy {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub model: ValidationModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<SignatureConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_signature: Option<SignatureConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimestampConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation: Option<RevocationConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eidas: Option<EidasConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cryptographic: Option<CryptographicConstraint>,
}

impl ValidationPolicy {
    /// An empty policy: every check is skipped.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            model: ValidationModel::default(),
            signature: None,
            counter_signature: None,
            timestamp: None,
            revocation: None,
            eidas: None,
            cryptographic: None,
        }
    }

    /// A fresh copy of the built-in default policy.
    pub fn default_policy() -> Self {
        DEFAULT_POLICY.clone()
    }

    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, PolicyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks OIDs and resolves every cryptographic suite.
    pub fn validate(&self) -> Result<(), PolicyError> {
        tracing::debug!(policy = %self.name, "validating policy");
        for context in [Context::Signature, Context::CounterSignature, Context::Timestamp, Context::Revocation] {
            self.cryptographic_suite(context)?;
            for sub in [SubContext::SigningCertificate, SubContext::CaCertificate] {
                self.certificate_cryptographic_suite(context, sub)?;
                if let Some(cc) = self.certificate_constraints(context, sub) {
                    validate_certificate_oids(cc)?;
                }
            }
        }
        Ok(())
    }

    pub fn signature_constraints(&self, context: Context) -> Option<&SignatureConstraints> {
        match context {
            Context::Signature => self.signature.as_ref(),
            Context::CounterSignature => self.counter_signature.as_ref().or(self.signature.as_ref()),
            Context::Timestamp | Context::Revocation => None,
        }
    }

    pub fn signed_attributes(&self, context: Context) -> Option<&SignedAttributesConstraints> {
        self.signature_constraints(context)
            .and_then(|s| s.signed_attributes.as_ref())
    }

    pub fn basic_signature_constraints(&self, context: Context) -> Option<&BasicSignatureConstraints> {
        match context {
            Context::Signature | Context::CounterSignature => self
                .signature_constraints(context)
                .and_then(|s| s.basic_signature_constraints.as_ref()),
            Context::Timestamp => self
                .timestamp
                .as_ref()
                .and_then(|t| t.basic_signature_constraints.as_ref()),
            Context::Revocation => self
                .revocation
                .as_ref()
                .and_then(|r| r.basic_signature_constraints.as_ref()),
        }
    }

    pub fn certificate_constraints(&self, context: Context, sub: SubContext) -> Option<&CertificateConstraints> {
        let basic = self.basic_signature_constraints(context)?;
        match sub {
            SubContext::SigningCertificate => basic.signing_certificate.as_ref(),
            SubContext::CaCertificate => basic.ca_certificate.as_ref(),
        }
    }

    pub fn cryptographic_constraint(&self, context: Context) -> Option<&CryptographicConstraint> {
        self.basic_signature_constraints(context)
            .and_then(|b| b.cryptographic.as_ref())
            .or(self.cryptographic.as_ref())
    }

    pub fn certificate_cryptographic_constraint(
        &self,
        context: Context,
        sub: SubContext,
    ) -> Option<&CryptographicConstraint> {
        self.basic_signature_constraints(context)
            .and_then(|b| b.cryptographic.as_ref())
            .or_else(|| {
                self.certificate_constraints(context, sub)
                    .and_then(|c| c.cryptographic.as_ref())
            })
            .or(self.cryptographic.as_ref())
    }

    pub fn cryptographic_suite(&self, context: Context) -> Result<Option<CryptographicSuite>, PolicyError> {
        self.cryptographic_constraint(context)
            .map(CryptographicSuite::from_constraint)
            .transpose()
    }

    pub fn certificate_cryptographic_suite(
        &self,
        context: Context,
        sub: SubContext,
    ) -> Result<Option<CryptographicSuite>, PolicyError> {
        self.certificate_cryptographic_constraint(context, sub)
            .map(CryptographicSuite::from_constraint)
            .transpose()
    }

    pub fn timestamp_constraints(&self) -> Option<&TimestampConstraints> {
        self.timestamp.as_ref()
    }

    pub fn revocation_constraints(&self) -> Option<&RevocationConstraints> {
        self.revocation.as_ref()
    }

    pub fn eidas_constraints(&self) -> Option<&EidasConstraints> {
        self.eidas.as_ref()
    }

    pub fn signature_constraints_mut(&mut self) -> &mut SignatureConstraints {
        self.signature.get_or_insert_with(SignatureConstraints::default)
    }

    pub fn timestamp_constraints_mut(&mut self) -> &mut TimestampConstraints {
        self.timestamp.get_or_insert_with(TimestampConstraints::default)
    }

    pub fn revocation_constraints_mut(&mut self) -> &mut RevocationConstraints {
        self.revocation.get_or_insert_with(RevocationConstraints::default)
    }

    pub fn eidas_constraints_mut(&mut self) -> &mut EidasConstraints {
        self.eidas.get_or_insert_with(EidasConstraints::default)
    }

    /// Basic signature constraints of `context`, created when missing.
    ///
    /// A counter-signature without its own group gets a copy of the signature group first.
    pub fn basic_signature_constraints_mut(&mut self, context: Context) -> &mut BasicSignatureConstraints {
        let group = match context {
            Context::Signature => &mut self.signature_constraints_mut().basic_signature_constraints,
            Context::CounterSignature => {
                if self.counter_signature.is_none() {
                    self.counter_signature = Some(self.signature.clone().unwrap_or_default());
                }
                &mut self
                    .counter_signature
                    .get_or_insert_with(SignatureConstraints::default)
                    .basic_signature_constraints
            }
            Context::Timestamp => &mut self.timestamp_constraints_mut().basic_signature_constraints,
            Context::Revocation => &mut self.revocation_constraints_mut().basic_signature_constraints,
        };
        group.get_or_insert_with(BasicSignatureConstraints::default)
    }

    pub fn certificate_constraints_mut(&mut self, context: Context, sub: SubContext) -> &mut CertificateConstraints {
        let basic = self.basic_signature_constraints_mut(context);
        let slot = match sub {
            SubContext::SigningCertificate => &mut basic.signing_certificate,
            SubContext::CaCertificate => &mut basic.ca_certificate,
        };
        slot.get_or_insert_with(CertificateConstraints::default)
    }

    pub fn signed_attributes_mut(&mut self) -> &mut SignedAttributesConstraints {
        self.signature_constraints_mut()
            .signed_attributes
            .get_or_insert_with(SignedAttributesConstraints::default)
    }

    /// The global cryptographic suite, created with a FAIL level when missing.
    pub fn cryptographic_mut(&mut self) -> &mut CryptographicConstraint {
        self.cryptographic.get_or_insert_with(|| CryptographicConstraint {
            level: crate::level::Level::Fail,
            acceptable_encryption_algo: None,
            mini_public_key_size: None,
            acceptable_digest_algo: None,
            algo_expiration_date: None,
        })
    }
}

fn check_oid(value: &str) -> Result<(), PolicyError> {
    if value == ANY_VALUE || OID.is_match(value) {
        Ok(())
    } else {
        Err(PolicyError::InvalidOid(value.to_string()))
    }
}

fn validate_certificate_oids(constraints: &CertificateConstraints) -> Result<(), PolicyError> {
    if let Some(skip) = &constraints.revocation_data_skip {
        for oid in skip.certificate_extensions.iter().chain(&skip.certificate_policies) {
            check_oid(oid)?;
        }
    }
    for list in [
        &constraints.supported_critical_extensions,
        &constraints.forbidden_extensions,
        &constraints.policy_ids,
        &constraints.extended_key_usage,
    ]
    .into_iter()
    .flatten()
    {
        for oid in &list.ids {
            check_oid(oid)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oid_shape_is_enforced() {
        assert!(check_oid("1.3.6.1.5.5.7.48.1.5").is_ok());
        assert!(check_oid("*").is_ok());
        assert!(check_oid("1.03.4").is_err());
        assert!(check_oid("3.1").is_err());
        assert!(check_oid("id-pkix-ocsp-nocheck").is_err());
    }
}
