// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared result vocabulary of the validation blocks.
//!
//! Every check goes through [`evaluate`], which maps a boolean outcome and a policy [`Level`]
//! to a [`Status`]. A [`ConstraintChain`] runs checks in declared order and folds them into a
//! [`Conclusion`] where the first FAIL-level failure decides the [`SubIndication`].
//!
//! [`Level`]: ades_validation_policy::Level

pub mod chain;
pub mod conclusion;
pub mod constraint;
pub mod indication;
pub mod message;

pub use chain::{Check, ConstraintChain};
pub use conclusion::Conclusion;
pub use constraint::{evaluate, Constraint, Status};
pub use indication::{Indication, SubIndication};
pub use message::{Message, MessageArg, MessageTag};
