// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::constraints::{LevelConstraint, TimeConstraint};
use crate::crypto::CryptographicConstraint;
use crate::groups::{
    CertificateConstraints, EidasConstraints, RevocationConstraints, RevocationDataSkipConstraint,
    SignatureConstraints, SignedAttributesConstraints, TimestampConstraints,
};
use crate::level::Level;
use crate::policy::{Context, SubContext, ValidationModel, ValidationPolicy};

/// Fluent construction and modification of a [`ValidationPolicy`].
///
/// ```
/// use ades_validation_policy::{Level, ValidationPolicyBuilder};
///
/// let policy = ValidationPolicyBuilder::from_default()
///     .name("strict")
///     .signing_certificate_digest_algorithm(Some(Level::Fail))
///     .build();
/// assert_eq!(policy.name, "strict");
/// ```
#[derive(Debug, Clone)]
pub struct ValidationPolicyBuilder {
    policy: ValidationPolicy,
}

impl Default for ValidationPolicyBuilder {
    fn default() -> Self {
        Self::new("custom")
    }
}

impl ValidationPolicyBuilder {
    /// Start from an empty policy.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            policy: ValidationPolicy::empty(name),
        }
    }

    /// Start from the built-in default policy.
    pub fn from_default() -> Self {
        Self::from_policy(ValidationPolicy::default_policy())
    }

    pub fn from_policy(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.policy.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.policy.description = Some(description.into());
        self
    }

    pub fn model(mut self, model: ValidationModel) -> Self {
        self.policy.model = model;
        self
    }

    pub fn signature(mut self, configure: impl FnOnce(&mut SignatureConstraints)) -> Self {
        configure(self.policy.signature_constraints_mut());
        self
    }

    pub fn signed_attributes(mut self, configure: impl FnOnce(&mut SignedAttributesConstraints)) -> Self {
        configure(self.policy.signed_attributes_mut());
        self
    }

    pub fn counter_signature(mut self, configure: impl FnOnce(&mut SignatureConstraints)) -> Self {
        if self.policy.counter_signature.is_none() {
            self.policy.counter_signature = Some(self.policy.signature.clone().unwrap_or_default());
        }
        if let Some(counter) = self.policy.counter_signature.as_mut() {
            configure(counter);
        }
        self
    }

    pub fn timestamp(mut self, configure: impl FnOnce(&mut TimestampConstraints)) -> Self {
        configure(self.policy.timestamp_constraints_mut());
        self
    }

    pub fn revocation(mut self, configure: impl FnOnce(&mut RevocationConstraints)) -> Self {
        configure(self.policy.revocation_constraints_mut());
        self
    }

    pub fn eidas(mut self, configure: impl FnOnce(&mut EidasConstraints)) -> Self {
        configure(self.policy.eidas_constraints_mut());
        self
    }

    pub fn certificate(
        mut self,
        context: Context,
        sub: SubContext,
        configure: impl FnOnce(&mut CertificateConstraints),
    ) -> Self {
        configure(self.policy.certificate_constraints_mut(context, sub));
        self
    }

    pub fn cryptographic(mut self, configure: impl FnOnce(&mut CryptographicConstraint)) -> Self {
        configure(self.policy.cryptographic_mut());
        self
    }

    /// Sets or removes (`None`) the enabling constraint for the signing-certificate reference digest.
    pub fn signing_certificate_digest_algorithm(mut self, level: Option<Level>) -> Self {
        self.policy.signed_attributes_mut().signing_certificate_digest_algorithm = level.map(LevelConstraint::new);
        self
    }

    pub fn algo_expiration_date(mut self, name: &str, size: Option<u32>, date: Option<&str>) -> Self {
        self.policy.cryptographic_mut().set_expiration(name, size, date);
        self
    }

    pub fn algo_expiration_level(mut self, level: Level) -> Self {
        self.policy.cryptographic_mut().set_expiration_level(level);
        self
    }

    pub fn revocation_data_skip<E, P>(mut self, context: Context, sub: SubContext, extensions: E, policies: P) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        self.policy.certificate_constraints_mut(context, sub).revocation_data_skip = Some(RevocationDataSkipConstraint {
            certificate_extensions: extensions.into_iter().map(Into::into).collect(),
            certificate_policies: policies.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn revocation_freshness(mut self, context: Context, sub: SubContext, freshness: Option<TimeConstraint>) -> Self {
        self.policy.certificate_constraints_mut(context, sub).revocation_freshness = freshness;
        self
    }

    pub fn timestamp_delay(mut self, delay: Option<TimeConstraint>) -> Self {
        self.policy.signature_constraints_mut().timestamp_delay = delay;
        self
    }

    pub fn build(self) -> ValidationPolicy {
        self.policy
    }
}
