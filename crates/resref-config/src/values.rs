//! Enumerated attribute values and their symbolic renderings.
//!
//! Isolation level and branch coupling travel as integers on the wire but are
//! always rendered by name in diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw wire value of an unset branch coupling.
pub const BRANCH_COUPLING_UNSET: i32 = -1;

/// Errors decoding an enumerated attribute value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("unknown isolation level: {0}")]
    UnknownIsolationLevel(String),

    #[error("unknown branch coupling: {0}")]
    UnknownBranchCoupling(String),
}

/// Integer or symbolic name, as accepted from descriptor files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSymbol {
    Int(i32),
    Name(String),
}

/// Resource authentication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResAuth {
    #[serde(alias = "container", alias = "CONTAINER")]
    Container,
    #[serde(alias = "application", alias = "APPLICATION")]
    Application,
}

impl ResAuth {
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Container => 0,
            Self::Application => 1,
        }
    }
}

impl fmt::Display for ResAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => write!(f, "Container"),
            Self::Application => write!(f, "Application"),
        }
    }
}

/// Connection sharing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SharingScope {
    #[serde(alias = "shareable", alias = "SHAREABLE")]
    Shareable,
    #[serde(alias = "unshareable", alias = "UNSHAREABLE")]
    Unshareable,
}

impl SharingScope {
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Shareable => 0,
            Self::Unshareable => 1,
        }
    }
}

impl fmt::Display for SharingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shareable => write!(f, "Shareable"),
            Self::Unshareable => write!(f, "Unshareable"),
        }
    }
}

/// JDBC transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSymbol", into = "i32")]
pub enum IsolationLevel {
    None,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub const ALL: [IsolationLevel; 5] = [
        Self::None,
        Self::ReadUncommitted,
        Self::ReadCommitted,
        Self::RepeatableRead,
        Self::Serializable,
    ];

    /// The `java.sql.Connection` constant value.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::ReadUncommitted => 1,
            Self::ReadCommitted => 2,
            Self::RepeatableRead => 4,
            Self::Serializable => 8,
        }
    }

    pub fn from_raw(raw: i32) -> Result<Self, ValueError> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_raw() == raw)
            .ok_or_else(|| ValueError::UnknownIsolationLevel(raw.to_string()))
    }

    pub fn symbolic_name(self) -> &'static str {
        match self {
            Self::None => "TRANSACTION_NONE",
            Self::ReadUncommitted => "TRANSACTION_READ_UNCOMMITTED",
            Self::ReadCommitted => "TRANSACTION_READ_COMMITTED",
            Self::RepeatableRead => "TRANSACTION_REPEATABLE_READ",
            Self::Serializable => "TRANSACTION_SERIALIZABLE",
        }
    }

    pub fn from_symbolic_name(name: &str) -> Result<Self, ValueError> {
        Self::ALL
            .into_iter()
            .find(|level| level.symbolic_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ValueError::UnknownIsolationLevel(name.to_string()))
    }
}

impl TryFrom<RawSymbol> for IsolationLevel {
    type Error = ValueError;

    fn try_from(raw: RawSymbol) -> Result<Self, Self::Error> {
        match raw {
            RawSymbol::Int(i) => Self::from_raw(i),
            RawSymbol::Name(name) => Self::from_symbolic_name(&name),
        }
    }
}

impl From<IsolationLevel> for i32 {
    fn from(level: IsolationLevel) -> i32 {
        level.as_raw()
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbolic_name())
    }
}

/// XA branch coupling.
///
/// The wire sentinel [`BRANCH_COUPLING_UNSET`] decodes to `None`, so an unset
/// coupling is indistinguishable from absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchCoupling {
    Loose,
    Tight,
}

impl BranchCoupling {
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Loose => 0,
            Self::Tight => 1,
        }
    }

    pub fn from_raw(raw: i32) -> Result<Option<Self>, ValueError> {
        match raw {
            BRANCH_COUPLING_UNSET => Ok(None),
            0 => Ok(Some(Self::Loose)),
            1 => Ok(Some(Self::Tight)),
            other => Err(ValueError::UnknownBranchCoupling(other.to_string())),
        }
    }

    pub fn symbolic_name(self) -> &'static str {
        match self {
            Self::Loose => "LOOSE",
            Self::Tight => "TIGHT",
        }
    }

    fn from_symbolic_name(name: &str) -> Result<Option<Self>, ValueError> {
        if name.eq_ignore_ascii_case("LOOSE") {
            Ok(Some(Self::Loose))
        } else if name.eq_ignore_ascii_case("TIGHT") {
            Ok(Some(Self::Tight))
        } else if name.eq_ignore_ascii_case("UNSET") {
            Ok(None)
        } else {
            Err(ValueError::UnknownBranchCoupling(name.to_string()))
        }
    }
}

impl fmt::Display for BranchCoupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbolic_name())
    }
}

/// Serde adapter for `Option<BranchCoupling>` fields using the raw integer form.
pub(crate) mod branch_coupling_raw {
    use super::{BranchCoupling, RawSymbol, BRANCH_COUPLING_UNSET};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<BranchCoupling>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(value.map_or(BRANCH_COUPLING_UNSET, BranchCoupling::as_raw))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BranchCoupling>, D::Error> {
        let raw = Option::<RawSymbol>::deserialize(deserializer)?;
        let decoded = match raw {
            None => Ok(None),
            Some(RawSymbol::Int(i)) => BranchCoupling::from_raw(i),
            Some(RawSymbol::Name(name)) => BranchCoupling::from_symbolic_name(&name),
        };
        decoded.map_err(serde::de::Error::custom)
    }
}

/// A tracked attribute value, as compared and rendered by the merge engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    Integer(i32),
    Auth(ResAuth),
    Sharing(SharingScope),
    Isolation(IsolationLevel),
    Coupling(BranchCoupling),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Auth(a) => write!(f, "{}", a),
            Self::Sharing(s) => write!(f, "{}", s),
            Self::Isolation(l) => write!(f, "{}", l),
            Self::Coupling(c) => write!(f, "{}", c),
        }
    }
}

/// Render an optional value for diagnostics; absence renders as `null`.
pub fn render<T: fmt::Display + ?Sized>(value: Option<&T>) -> String {
    value.map_or_else(|| "null".to_string(), ToString::to_string)
}
