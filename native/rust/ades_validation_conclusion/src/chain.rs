// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::conclusion::Conclusion;
use crate::constraint::{evaluate, Constraint, Status};
use crate::indication::{Indication, SubIndication};
use crate::message::Message;
use ades_validation_policy::Level;

/// A single check to run through a [`ConstraintChain`].
#[derive(Debug, Clone)]
pub struct Check {
    name: Message,
    outcome: bool,
    level: Option<Level>,
    indication: Indication,
    sub_indication: Option<SubIndication>,
    answer: Option<Message>,
    success_info: Option<Message>,
    child: Option<(String, Conclusion)>,
    linked_block: Option<String>,
    additional_info: Option<String>,
}

impl Check {
    /// A check with no configured level; it is skipped until [`Check::level`] sets one.
    pub fn new(name: impl Into<Message>, outcome: bool) -> Self {
        Self {
            name: name.into(),
            outcome,
            level: None,
            indication: Indication::Indeterminate,
            sub_indication: None,
            answer: None,
            success_info: None,
            child: None,
            linked_block: None,
            additional_info: None,
        }
    }

    /// A check over a child block: passes when the child passed, and on failure takes the child's
    /// verdict. The child's messages are merged into the chain whatever the outcome.
    pub fn result(name: impl Into<Message>, block_id: impl Into<String>, child: &Conclusion) -> Self {
        Self::result_with(name, block_id, child, child.is_passed())
    }

    /// Like [`Check::result`] with an outcome decided by the caller, for checks that accept some
    /// non-passing child verdicts.
    pub fn result_with(
        name: impl Into<Message>,
        block_id: impl Into<String>,
        child: &Conclusion,
        outcome: bool,
    ) -> Self {
        let mut check = Self::new(name, outcome).level(Some(Level::Fail));
        check.indication = child.indication.unwrap_or(Indication::Indeterminate);
        check.sub_indication = child.sub_indication;
        check.child = Some((block_id.into(), child.clone()));
        check
    }

    pub fn level(mut self, level: Option<Level>) -> Self {
        self.level = level;
        self
    }

    pub fn fail(self) -> Self {
        self.level(Some(Level::Fail))
    }

    pub fn warn(self) -> Self {
        self.level(Some(Level::Warn))
    }

    pub fn inform(self) -> Self {
        self.level(Some(Level::Inform))
    }

    pub fn on_failure(mut self, indication: Indication, sub_indication: impl Into<Option<SubIndication>>) -> Self {
        self.indication = indication;
        self.sub_indication = sub_indication.into();
        self
    }

    /// Message attached as error, warning or info when the check does not pass.
    pub fn answer(mut self, answer: impl Into<Message>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// Info message recorded when the check passes.
    pub fn info_on_success(mut self, info: impl Into<Message>) -> Self {
        self.success_info = Some(info.into());
        self
    }

    /// Links the constraint to a child block without merging its messages.
    pub fn block_id(mut self, block_id: impl Into<String>) -> Self {
        self.linked_block = Some(block_id.into());
        self
    }

    pub fn additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }
}

/// Ordered evaluation of checks for one validation block.
///
/// The first FAIL-level failure fixes the verdict; later failures only add their messages.
#[derive(Debug, Clone, Default)]
pub struct ConstraintChain {
    constraints: Vec<Constraint>,
    conclusion: Conclusion,
}

impl ConstraintChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `check`. Returns false only when it produced a NOT_OK constraint.
    pub fn check(&mut self, check: Check) -> bool {
        let Check {
            name,
            outcome,
            level,
            indication,
            sub_indication,
            answer,
            success_info,
            child,
            linked_block,
            additional_info,
        } = check;

        let block_id = child
            .map(|(id, conclusion)| {
                self.conclusion.merge_messages(&conclusion);
                id
            })
            .or(linked_block);

        let Some(level) = level else {
            return true;
        };

        let status = evaluate(outcome, level);
        let answer = answer.unwrap_or_else(|| name.clone());
        let mut constraint = Constraint {
            name,
            status,
            error: None,
            warning: None,
            info: None,
            block_id,
            additional_info,
        };
        match status {
            Status::NotOk => {
                constraint.error = Some(answer.clone());
                self.conclusion.add_error(answer);
                self.conclusion.set_if_unset(indication, sub_indication);
            }
            Status::Warning => {
                constraint.warning = Some(answer.clone());
                self.conclusion.add_warning(answer);
            }
            Status::Information => {
                constraint.info = Some(answer.clone());
                self.conclusion.add_info(answer);
            }
            Status::Ok => {
                if let Some(info) = success_info {
                    constraint.info = Some(info.clone());
                    self.conclusion.add_info(info);
                }
            }
            Status::Ignored => {}
        }
        self.constraints.push(constraint);
        status != Status::NotOk
    }

    /// True once a FAIL-level check has failed.
    pub fn has_failed(&self) -> bool {
        self.conclusion.indication.is_some()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn conclusion(&self) -> &Conclusion {
        &self.conclusion
    }

    pub fn conclusion_mut(&mut self) -> &mut Conclusion {
        &mut self.conclusion
    }

    pub fn add_info(&mut self, info: impl Into<Message>) {
        self.conclusion.add_info(info.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<Message>) {
        self.conclusion.add_warning(warning.into());
    }

    /// Consumes the chain; an unfinished verdict becomes PASSED.
    pub fn finish(self) -> (Vec<Constraint>, Conclusion) {
        let mut conclusion = self.conclusion;
        conclusion.finish();
        (self.constraints, conclusion)
    }
}
