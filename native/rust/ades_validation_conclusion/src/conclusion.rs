// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::indication::{Indication, SubIndication};
use crate::message::{Message, MessageTag};
use serde::Serialize;

/// Verdict of a validation block, with its ordered messages.
///
/// `indication` is `None` while the owning chain is still running and no FAIL-level check has
/// failed yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conclusion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indication: Option<Indication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub infos: Vec<Message>,
}

fn push_unique(list: &mut Vec<Message>, message: Message) {
    if !list.contains(&message) {
        list.push(message);
    }
}

impl Conclusion {
    pub fn passed() -> Self {
        Self {
            indication: Some(Indication::Passed),
            ..Self::default()
        }
    }

    pub fn new(indication: Indication, sub_indication: Option<SubIndication>) -> Self {
        Self {
            indication: Some(indication),
            sub_indication,
            ..Self::default()
        }
    }

    pub fn indeterminate(sub_indication: SubIndication) -> Self {
        Self::new(Indication::Indeterminate, Some(sub_indication))
    }

    pub fn failed(sub_indication: SubIndication) -> Self {
        Self::new(Indication::Failed, Some(sub_indication))
    }

    pub fn is_passed(&self) -> bool {
        self.indication.is_some_and(|i| i.is_passed())
    }

    pub fn is_failed(&self) -> bool {
        self.indication.is_some_and(|i| i.is_failed())
    }

    pub fn is_indeterminate(&self) -> bool {
        self.indication.is_some_and(|i| i.is_indeterminate())
    }

    pub fn has_sub_indication(&self, sub: SubIndication) -> bool {
        self.sub_indication == Some(sub)
    }

    /// Sets the verdict unless one is already set.
    pub fn set_if_unset(&mut self, indication: Indication, sub_indication: Option<SubIndication>) {
        if self.indication.is_none() {
            self.indication = Some(indication);
            self.sub_indication = sub_indication;
        }
    }

    /// Replaces the verdict, keeping messages.
    pub fn set(&mut self, indication: Indication, sub_indication: Option<SubIndication>) {
        self.indication = Some(indication);
        self.sub_indication = sub_indication;
    }

    /// Copies the verdict of `other`, keeping this conclusion's messages.
    pub fn set_from(&mut self, other: &Conclusion) {
        self.indication = other.indication;
        self.sub_indication = other.sub_indication;
    }

    pub fn add_error(&mut self, message: Message) {
        push_unique(&mut self.errors, message);
    }

    pub fn add_warning(&mut self, message: Message) {
        push_unique(&mut self.warnings, message);
    }

    pub fn add_info(&mut self, message: Message) {
        push_unique(&mut self.infos, message);
    }

    /// Appends the messages of `other` that are not present yet.
    pub fn merge_messages(&mut self, other: &Conclusion) {
        for m in &other.errors {
            push_unique(&mut self.errors, m.clone());
        }
        for m in &other.warnings {
            push_unique(&mut self.warnings, m.clone());
        }
        for m in &other.infos {
            push_unique(&mut self.infos, m.clone());
        }
    }

    pub fn has_error(&self, tag: MessageTag) -> bool {
        self.errors.iter().any(|m| m.tag == tag)
    }

    pub fn has_warning(&self, tag: MessageTag) -> bool {
        self.warnings.iter().any(|m| m.tag == tag)
    }

    pub fn has_info(&self, tag: MessageTag) -> bool {
        self.infos.iter().any(|m| m.tag == tag)
    }

    /// Marks an unfinished conclusion as PASSED.
    pub fn finish(&mut self) {
        if self.indication.is_none() {
            self.indication = Some(Indication::Passed);
        }
    }
}
