//! Merge conflict records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Disagreement between two sources contributing the same attribute.
///
/// Indices are source positions in the merged sequence; `-1` denotes the
/// value carried in from outside the sequence (the receiver in a compare).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConflict {
    attribute_name: String,
    index1: i32,
    value1: String,
    index2: i32,
    value2: String,
}

impl MergeConflict {
    pub fn new(
        attribute_name: impl Into<String>,
        index1: i32,
        value1: impl Into<String>,
        index2: i32,
        value2: impl Into<String>,
    ) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            index1,
            value1: value1.into(),
            index2,
            value2: value2.into(),
        }
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// Index of the source that established the resolved value.
    pub fn index1(&self) -> i32 {
        self.index1
    }

    pub fn value1(&self) -> &str {
        &self.value1
    }

    /// Index of the disagreeing source.
    pub fn index2(&self) -> i32 {
        self.index2
    }

    pub fn value2(&self) -> &str {
        &self.value2
    }
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}]={} != [{}]={}",
            self.attribute_name, self.index1, self.value1, self.index2, self.value2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let conflict = MergeConflict::new(
            "isolation-level",
            0,
            "TRANSACTION_NONE",
            2,
            "TRANSACTION_SERIALIZABLE",
        );
        assert_eq!(
            conflict.to_string(),
            "isolation-level: [0]=TRANSACTION_NONE != [2]=TRANSACTION_SERIALIZABLE"
        );
    }

    #[test]
    fn test_accessors() {
        let conflict = MergeConflict::new("binding-name", -1, "jdbc/a", 0, "null");
        assert_eq!(conflict.attribute_name(), "binding-name");
        assert_eq!(conflict.index1(), -1);
        assert_eq!(conflict.value1(), "jdbc/a");
        assert_eq!(conflict.index2(), 0);
        assert_eq!(conflict.value2(), "null");
    }
}
