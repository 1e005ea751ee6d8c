//! Per-attribute merge step.
//!
//! `merge_attribute` is a pure function: the resolved-so-far state goes in,
//! the next state and any conflict come out. The engine threads it through
//! a fold over the sources.

use crate::conflict::MergeConflict;
use crate::values::render;
use std::fmt;

/// Index recorded for a value carried in from outside the source sequence.
pub const CARRIED_IN_INDEX: i32 = -1;

/// How disagreements between sources are judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Absence never conflicts with presence; the first non-null value wins.
    Merge,
    /// Every source must agree, absence included.
    Strict,
}

/// Resolved-so-far value of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: Option<T>,
    /// Source that established `value`; `None` while nothing is established.
    pub index: Option<i32>,
}

impl<T> Resolved<T> {
    pub fn unset() -> Self {
        Self {
            value: None,
            index: None,
        }
    }

    /// State seeded from a value outside the source sequence.
    pub fn carried_in(value: Option<T>) -> Self {
        Self {
            value,
            index: Some(CARRIED_IN_INDEX),
        }
    }

    pub fn is_established(&self) -> bool {
        self.index.is_some()
    }
}

impl<T> Default for Resolved<T> {
    fn default() -> Self {
        Self::unset()
    }
}

/// Fold one source's contribution into the resolved state.
pub fn merge_attribute<T>(
    name: &str,
    previous: Resolved<T>,
    source: Option<&T>,
    index: i32,
    mode: MergeMode,
) -> (Resolved<T>, Option<MergeConflict>)
where
    T: PartialEq + Clone + fmt::Display,
{
    match mode {
        MergeMode::Merge => {
            let Some(value) = source else {
                return (previous, None);
            };
            let (Some(current), Some(current_index)) = (previous.value.as_ref(), previous.index)
            else {
                let established = Resolved {
                    value: Some(value.clone()),
                    index: Some(index),
                };
                return (established, None);
            };
            if current == value {
                return (previous, None);
            }
            let conflict = MergeConflict::new(
                name,
                current_index,
                current.to_string(),
                index,
                value.to_string(),
            );
            (previous, Some(conflict))
        }
        MergeMode::Strict => {
            let Some(current_index) = previous.index else {
                return (
                    Resolved {
                        value: source.cloned(),
                        index: Some(index),
                    },
                    None,
                );
            };
            if previous.value.as_ref() == source {
                (previous, None)
            } else {
                let conflict = MergeConflict::new(
                    name,
                    current_index,
                    render(previous.value.as_ref()),
                    index,
                    render(source),
                );
                (previous, Some(conflict))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_merge_first_value_establishes() {
        let (resolved, conflict) = merge_attribute(
            "binding-name",
            Resolved::unset(),
            Some(&text("jdbc/a")),
            0,
            MergeMode::Merge,
        );
        assert_eq!(resolved.value, Some(text("jdbc/a")));
        assert_eq!(resolved.index, Some(0));
        assert!(conflict.is_none());
    }

    #[test]
    fn test_merge_null_never_conflicts() {
        let previous = Resolved {
            value: Some(text("jdbc/a")),
            index: Some(0),
        };
        let (resolved, conflict) = merge_attribute::<String>(
            "binding-name",
            previous.clone(),
            None,
            1,
            MergeMode::Merge,
        );
        assert_eq!(resolved, previous);
        assert!(conflict.is_none());
    }

    #[test]
    fn test_merge_different_value_conflicts_and_first_wins() {
        let previous = Resolved {
            value: Some(text("jdbc/a")),
            index: Some(0),
        };
        let (resolved, conflict) = merge_attribute(
            "binding-name",
            previous,
            Some(&text("jdbc/b")),
            2,
            MergeMode::Merge,
        );
        assert_eq!(resolved.value, Some(text("jdbc/a")));
        assert_eq!(
            conflict.unwrap().to_string(),
            "binding-name: [0]=jdbc/a != [2]=jdbc/b"
        );
    }

    #[test]
    fn test_merge_equal_value_keeps_first_index() {
        let previous = Resolved {
            value: Some(5),
            index: Some(0),
        };
        let (resolved, conflict) =
            merge_attribute("commit-priority", previous, Some(&5), 3, MergeMode::Merge);
        assert_eq!(resolved.index, Some(0));
        assert!(conflict.is_none());
    }

    #[test]
    fn test_strict_first_source_establishes_absence() {
        let (resolved, conflict) = merge_attribute::<String>(
            "binding-name",
            Resolved::unset(),
            None,
            0,
            MergeMode::Strict,
        );
        assert!(resolved.is_established());
        assert!(resolved.value.is_none());
        assert!(conflict.is_none());
    }

    #[test]
    fn test_strict_null_after_value_conflicts() {
        let previous = Resolved::carried_in(Some(text("jdbc/a")));
        let (_, conflict) =
            merge_attribute::<String>("binding-name", previous, None, 0, MergeMode::Strict);
        assert_eq!(
            conflict.unwrap().to_string(),
            "binding-name: [-1]=jdbc/a != [0]=null"
        );
    }

    #[test]
    fn test_strict_both_absent_agree() {
        let previous: Resolved<String> = Resolved::carried_in(None);
        let (_, conflict) =
            merge_attribute::<String>("binding-name", previous, None, 0, MergeMode::Strict);
        assert!(conflict.is_none());
    }
}
