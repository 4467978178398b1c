//! Process operator data model

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::error::{ProcessError, ProcessResult};

/// How a process combines the states of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    /// Worst child wins
    #[default]
    And,
    /// Best child wins
    Or,
    /// Worst child, inverted
    Not,
    /// The k-th best child wins
    MinOf(NonZeroU32),
}

impl Operator {
    pub const AND_SYMBOL: &'static str = "&";
    pub const OR_SYMBOL: &'static str = "|";
    pub const NOT_SYMBOL: &'static str = "!";

    /// Threshold operator, rejecting zero
    pub fn min_of(k: u32) -> ProcessResult<Self> {
        NonZeroU32::new(k)
            .map(Operator::MinOf)
            .ok_or_else(|| ProcessError::InvalidOperator(k.to_string()))
    }

    /// Short label as shown next to a process
    pub fn label(&self) -> String {
        match self {
            Operator::And => "and".to_string(),
            Operator::Or => "or".to_string(),
            Operator::Not => "not".to_string(),
            Operator::MinOf(k) => format!("min:{}", k),
        }
    }

    /// Symbol joining children in the legacy definition format
    pub fn join_symbol(&self) -> &'static str {
        match self {
            Operator::And => Self::AND_SYMBOL,
            Operator::Or => Self::OR_SYMBOL,
            Operator::Not => Self::NOT_SYMBOL,
            Operator::MinOf(_) => "+",
        }
    }
}

impl FromStr for Operator {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            Self::AND_SYMBOL => Ok(Operator::And),
            Self::OR_SYMBOL => Ok(Operator::Or),
            Self::NOT_SYMBOL => Ok(Operator::Not),
            _ => trimmed
                .parse::<u32>()
                .ok()
                .and_then(NonZeroU32::new)
                .map(Operator::MinOf)
                .ok_or_else(|| ProcessError::InvalidOperator(s.to_string())),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = ProcessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        operator.to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::MinOf(k) => write!(f, "{}", k),
            other => f.write_str(other.join_symbol()),
        }
    }
}
