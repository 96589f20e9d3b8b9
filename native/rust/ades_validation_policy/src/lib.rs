// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Validation policy model.
//!
//! A policy is a tree of optional constraints. Each present leaf carries a [`Level`]; an absent
//! leaf means the corresponding check is not run at all. The [`CryptographicSuite`] resolves the
//! algorithm lists and expiration dates of a [`CryptographicConstraint`] for lookups at a point
//! in time.

pub mod builder;
pub mod constraints;
pub mod crypto;
pub mod date_format;
pub mod default_policy;
pub mod error;
pub mod groups;
pub mod level;
pub mod policy;

pub use builder::ValidationPolicyBuilder;
pub use constraints::{
    level_of, IntValueConstraint, LevelConstraint, LeveledConstraint, MultiValuesConstraint, TimeConstraint,
    TimeUnit, ValueConstraint, ANY_VALUE,
};
pub use crypto::{
    Algo, AlgoExpirationDate, CryptographicConstraint, CryptographicSuite, Expiration, ExpirationAlgo, ListAlgo,
};
pub use date_format::{parse_policy_date, DateFormat, DEFAULT_DATE_FORMAT};
pub use default_policy::{DEFAULT_POLICY_NAME, TIMESTAMPING_EKU};
pub use error::PolicyError;
pub use groups::{
    BasicSignatureConstraints, CertificateConstraints, EidasConstraints, RevocationConstraints,
    RevocationDataSkipConstraint, SignatureConstraints, SignedAttributesConstraints, TimestampConstraints,
};
pub use level::Level;
pub use policy::{Context, SubContext, ValidationModel, ValidationPolicy};
