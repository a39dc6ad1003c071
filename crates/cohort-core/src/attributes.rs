//! # Member Attributes
//!
//! Self-reported, non-identifying attributes (skills, location, age range).
//! The census aggregates them into histograms and a passport action binds a
//! membership proof to a set of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute name → value, ordered by name.
pub type AttributeSet = BTreeMap<String, AttributeValue>;

/// One attribute value as a member reported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A single discrete value, e.g. an age range or a location.
    Single(String),
    /// Several values, e.g. skills. Each distinct value counts once.
    Multi(Vec<String>),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multi(values.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_serde_forms() {
        let mut set = AttributeSet::new();
        set.insert("location".into(), "Lisbon".into());
        set.insert("skills".into(), vec!["rust", "zk"].into());
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"location":"Lisbon","skills":["rust","zk"]}"#);
        let back: AttributeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
