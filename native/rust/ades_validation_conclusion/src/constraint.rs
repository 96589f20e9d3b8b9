// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::message::Message;
use ades_validation_policy::Level;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    NotOk,
    Warning,
    Information,
    Ignored,
}

/// Status of a check given its outcome and configured level.
///
/// `IGNORE` always yields [`Status::Ignored`]; a passing check is [`Status::Ok`] at any other level.
pub fn evaluate(outcome: bool, level: Level) -> Status {
    match (level, outcome) {
        (Level::Ignore, _) => Status::Ignored,
        (_, true) => Status::Ok,
        (Level::Fail, false) => Status::NotOk,
        (Level::Warn, false) => Status::Warning,
        (Level::Inform, false) => Status::Information,
    }
}

/// One evaluated check of a validation block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub name: Message,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Message>,
    /// Id of the child block a result check refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl Constraint {
    pub fn is(&self, tag: crate::message::MessageTag) -> bool {
        self.name.tag == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_wins_over_outcome() {
        assert_eq!(evaluate(true, Level::Ignore), Status::Ignored);
        assert_eq!(evaluate(false, Level::Ignore), Status::Ignored);
    }

    #[test]
    fn failing_status_follows_level() {
        assert_eq!(evaluate(false, Level::Fail), Status::NotOk);
        assert_eq!(evaluate(false, Level::Warn), Status::Warning);
        assert_eq!(evaluate(false, Level::Inform), Status::Information);
        assert_eq!(evaluate(true, Level::Fail), Status::Ok);
    }
}
