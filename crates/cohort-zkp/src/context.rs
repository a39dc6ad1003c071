//! # Action Contexts
//!
//! Conventional messages that scope a nullifier to one action. Two bundles
//! from the same member share a nullifier exactly when they share a
//! message, so the message decides what counts as "the same action":
//!
//! | Action | Message | One per member per |
//! |--------|---------|--------------------|
//! | `Upvote(id)` | `upvote-<id>` | feedback item |
//! | `Reply { feedback_id, content }` | `reply-<feedback_id>:<content>` | identical reply |
//! | `Post(content)` | `<content>` | identical post |
//! | `Passport(attributes)` | compact JSON of the attribute set | identical attribute set |
//! | `Custom(message)` | `<message>` | caller-defined |
//!
//! A passport message is the attribute set as compact JSON with keys in
//! name order, e.g. `{"location":"Lisbon","skills":["rust","zk"]}`, so the
//! same attributes always give the same nullifier.

use cohort_core::{AttributeSet, AttributeValue};
use serde_json::{Map, Value};

/// An action a member proves membership for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionContext {
    /// Upvote a feedback item.
    Upvote(String),
    /// Reply to a feedback item.
    Reply {
        /// The item replied to.
        feedback_id: String,
        /// Reply text.
        content: String,
    },
    /// Post new feedback.
    Post(String),
    /// Present a membership passport bound to a set of attributes.
    Passport(AttributeSet),
    /// Any other caller-scoped message.
    Custom(String),
}

impl ActionContext {
    /// The nullifier-scoping message for this action.
    pub fn message(&self) -> String {
        match self {
            Self::Upvote(id) => format!("upvote-{id}"),
            Self::Reply {
                feedback_id,
                content,
            } => format!("reply-{feedback_id}:{content}"),
            Self::Post(content) | Self::Custom(content) => content.clone(),
            Self::Passport(attributes) => passport_message(attributes),
        }
    }
}

fn passport_message(attributes: &AttributeSet) -> String {
    let object: Map<String, Value> = attributes
        .iter()
        .map(|(name, value)| {
            let value = match value {
                AttributeValue::Single(v) => Value::String(v.clone()),
                AttributeValue::Multi(vs) => {
                    Value::Array(vs.iter().cloned().map(Value::String).collect())
                }
            };
            (name.clone(), value)
        })
        .collect();
    Value::Object(object).to_string()
}

impl std::fmt::Display for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}
