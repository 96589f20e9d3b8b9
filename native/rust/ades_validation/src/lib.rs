// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! AdES validation process over a pre-parsed [`DiagnosticData`] snapshot.
//!
//! [`SignatureProcessExecutor`] runs the basic building blocks of every token, then the
//! long-term and archival levels, and finally the eIDAS qualification of each signature. It
//! returns a [`DetailedReport`] with every evaluated block and a [`SimpleReport`] with one
//! verdict per signature. [`CertificateProcessExecutor`] does the same for a single certificate.
//!
//! Validation never touches the network or the clock: all inputs, including the validation
//! time, come from the snapshot, the [`ValidationPolicy`] and [`ValidationOptions`].
//!
//! [`DiagnosticData`]: ades_validation_diagnostic::DiagnosticData
//! [`ValidationPolicy`]: ades_validation_policy::ValidationPolicy

mod bbb;
mod context;
mod crypto;
mod error;
mod executor;
mod index;
mod options;
mod past;
mod poe;
mod process;
mod qualification;
mod token;

pub mod report;

pub use bbb::{BasicBuildingBlocks, ChainItem};
pub use crypto::{AlgorithmDescription, CryptographicValidation};
pub use error::ValidationError;
pub use executor::{CertificateProcessExecutor, SignatureProcessExecutor};
pub use options::{ValidationLevel, ValidationOptions};
pub use qualification::{CertificateQualification, QualificationTime, SignatureQualification};
pub use report::{
    Block, BlockDetail, BlockKind, CertificateReports, DetailedReport, Reports, SimpleCertificateReport,
    SimpleReport,
};
