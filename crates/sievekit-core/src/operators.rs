//! Sieve comparison operators and the configurable operator table.
//!
//! See: https://github.com/Biarity/Sieve#operators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators understood by Sieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
    Contains,
    StartsWith,
    EndsWith,
    DoesNotContain,
    DoesNotStartWith,
    DoesNotEndWith,
    #[serde(rename = "CASE_INSENSITIVE_STRING_CONTAINS")]
    CaseInsensitiveContains,
    #[serde(rename = "CASE_INSENSITIVE_STRING_STARTS_WITH")]
    CaseInsensitiveStartsWith,
    #[serde(rename = "CASE_INSENSITIVE_STRING_ENDS_WITH")]
    CaseInsensitiveEndsWith,
    #[serde(rename = "CASE_INSENSITIVE_STRING_EQUALS")]
    CaseInsensitiveEquals,
    #[serde(rename = "CASE_INSENSITIVE_STRING_NOT_EQUALS")]
    CaseInsensitiveNotEquals,
    #[serde(rename = "CASE_INSENSITIVE_STRING_DOES_NOT_CONTAIN")]
    CaseInsensitiveDoesNotContain,
    #[serde(rename = "CASE_INSENSITIVE_STRING_DOES_NOT_START_WITH")]
    CaseInsensitiveDoesNotStartWith,
    #[serde(rename = "CASE_INSENSITIVE_STRING_DOES_NOT_END_WITH")]
    CaseInsensitiveDoesNotEndWith,
}

impl Operator {
    /// All operators in default table order.
    pub const ALL: [Operator; 20] = [
        Self::Equals,
        Self::NotEquals,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterThanOrEqualTo,
        Self::LessThanOrEqualTo,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::DoesNotContain,
        Self::DoesNotStartWith,
        Self::DoesNotEndWith,
        Self::CaseInsensitiveContains,
        Self::CaseInsensitiveStartsWith,
        Self::CaseInsensitiveEndsWith,
        Self::CaseInsensitiveEquals,
        Self::CaseInsensitiveNotEquals,
        Self::CaseInsensitiveDoesNotContain,
        Self::CaseInsensitiveDoesNotStartWith,
        Self::CaseInsensitiveDoesNotEndWith,
    ];

    /// Literal token used on the wire.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqualTo => ">=",
            Self::LessThanOrEqualTo => "<=",
            Self::Contains => "@=",
            Self::StartsWith => "_=",
            Self::EndsWith => "_-=",
            Self::DoesNotContain => "!@=",
            Self::DoesNotStartWith => "!_=",
            Self::DoesNotEndWith => "!_-=",
            Self::CaseInsensitiveContains => "@=*",
            Self::CaseInsensitiveStartsWith => "_=*",
            Self::CaseInsensitiveEndsWith => "_-=*",
            Self::CaseInsensitiveEquals => "==*",
            Self::CaseInsensitiveNotEquals => "!=*",
            Self::CaseInsensitiveDoesNotContain => "!@=*",
            Self::CaseInsensitiveDoesNotStartWith => "!_=*",
            Self::CaseInsensitiveDoesNotEndWith => "!_-=*",
        }
    }

    /// Symbolic name used in the operator table and in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::GreaterThan => "GREATER_THAN",
            Self::LessThan => "LESS_THAN",
            Self::GreaterThanOrEqualTo => "GREATER_THAN_OR_EQUAL_TO",
            Self::LessThanOrEqualTo => "LESS_THAN_OR_EQUAL_TO",
            Self::Contains => "CONTAINS",
            Self::StartsWith => "STARTS_WITH",
            Self::EndsWith => "ENDS_WITH",
            Self::DoesNotContain => "DOES_NOT_CONTAIN",
            Self::DoesNotStartWith => "DOES_NOT_START_WITH",
            Self::DoesNotEndWith => "DOES_NOT_END_WITH",
            Self::CaseInsensitiveContains => "CASE_INSENSITIVE_STRING_CONTAINS",
            Self::CaseInsensitiveStartsWith => "CASE_INSENSITIVE_STRING_STARTS_WITH",
            Self::CaseInsensitiveEndsWith => "CASE_INSENSITIVE_STRING_ENDS_WITH",
            Self::CaseInsensitiveEquals => "CASE_INSENSITIVE_STRING_EQUALS",
            Self::CaseInsensitiveNotEquals => "CASE_INSENSITIVE_STRING_NOT_EQUALS",
            Self::CaseInsensitiveDoesNotContain => "CASE_INSENSITIVE_STRING_DOES_NOT_CONTAIN",
            Self::CaseInsensitiveDoesNotStartWith => "CASE_INSENSITIVE_STRING_DOES_NOT_START_WITH",
            Self::CaseInsensitiveDoesNotEndWith => "CASE_INSENSITIVE_STRING_DOES_NOT_END_WITH",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.token().to_string()
    }
}

/// Ordered `(name, token)` pairs a decoder recognises.
///
/// Order matters: among tokens of equal length the earlier entry wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTable {
    entries: Vec<(String, String)>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::from_pairs(Operator::ALL.iter().map(|op| (op.name(), op.token())))
    }
}

impl OperatorTable {
    /// Table without any operator.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<N, T>(pairs: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, token)| (name.into(), token.into()))
                .collect(),
        }
    }

    /// Replace the token of `name` in place, or append a new entry.
    #[must_use]
    pub fn with_operator(mut self, name: impl Into<String>, token: impl Into<String>) -> Self {
        let name = name.into();
        let token = token.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = token,
            None => self.entries.push((name, token)),
        }
        self
    }

    pub fn token(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_str())
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.entries.iter().any(|(_, t)| t == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
