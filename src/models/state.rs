//! Status data model
//!
//! A [`StatusCode`] packs a [`SeverityRank`] together with the downtime and
//! acknowledgement flags. Leaves and processes both report one, so the
//! aggregation operators never need to know what kind of node they look at.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::error::{ProcessError, ProcessResult};

/// Named status of a node
///
/// Declaration order is the order state summaries are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StateName {
    Ok,
    Warning,
    Critical,
    Unknown,
    Pending,
    Up,
    Down,
    Unreachable,
    Missing,
}

impl StateName {
    /// Every known state, in summary order
    pub const ALL: [StateName; 9] = [
        StateName::Ok,
        StateName::Warning,
        StateName::Critical,
        StateName::Unknown,
        StateName::Pending,
        StateName::Up,
        StateName::Down,
        StateName::Unreachable,
        StateName::Missing,
    ];

    /// States that never count as a problem in a state summary
    pub const ACCEPTABLE: [StateName; 4] = [
        StateName::Ok,
        StateName::Up,
        StateName::Pending,
        StateName::Missing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateName::Ok => "OK",
            StateName::Warning => "WARNING",
            StateName::Critical => "CRITICAL",
            StateName::Unknown => "UNKNOWN",
            StateName::Pending => "PENDING",
            StateName::Up => "UP",
            StateName::Down => "DOWN",
            StateName::Unreachable => "UNREACHABLE",
            StateName::Missing => "MISSING",
        }
    }

    /// Rank used when this state takes part in aggregation
    pub fn sort_rank(&self) -> SeverityRank {
        match self {
            StateName::Ok | StateName::Up => SeverityRank::OK,
            StateName::Pending => SeverityRank::PENDING,
            StateName::Warning => SeverityRank::WARNING,
            StateName::Unknown | StateName::Unreachable | StateName::Missing => {
                SeverityRank::UNKNOWN
            }
            StateName::Critical | StateName::Down => SeverityRank::CRITICAL,
        }
    }

    /// Name a process reports for an aggregated rank
    pub fn from_rank(rank: SeverityRank) -> Self {
        match rank.value() {
            0 => StateName::Ok,
            1 => StateName::Pending,
            2 => StateName::Warning,
            3 => StateName::Unknown,
            _ => StateName::Critical,
        }
    }

    /// Whether a host object can be in this state
    pub fn is_host_state(&self) -> bool {
        matches!(
            self,
            StateName::Up | StateName::Down | StateName::Unreachable | StateName::Pending
        )
    }

    /// Whether a service object can be in this state
    pub fn is_service_state(&self) -> bool {
        matches!(
            self,
            StateName::Ok
                | StateName::Warning
                | StateName::Critical
                | StateName::Unknown
                | StateName::Pending
        )
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateName {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateName::ALL
            .iter()
            .copied()
            .find(|state| state.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProcessError::Config(format!("Unknown state name: {}", s)))
    }
}

/// Severity rank, lower is healthier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SeverityRank(u8);

impl SeverityRank {
    pub const OK: SeverityRank = SeverityRank(0);
    pub const PENDING: SeverityRank = SeverityRank(1);
    pub const WARNING: SeverityRank = SeverityRank(2);
    pub const UNKNOWN: SeverityRank = SeverityRank(3);
    pub const CRITICAL: SeverityRank = SeverityRank(4);

    /// Highest valid rank
    pub const MAX: u8 = 4;

    /// Reflection used by the NOT operator, indexed by rank
    const INVERSION: [u8; 5] = [4, 1, 2, 0, 0];

    pub fn new(value: u8) -> ProcessResult<Self> {
        if value > Self::MAX {
            return Err(ProcessError::InvalidRank(value));
        }
        Ok(SeverityRank(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Inverted counterpart of this rank
    ///
    /// Not a bijection: UNKNOWN and CRITICAL both invert to OK.
    pub fn invert(&self) -> SeverityRank {
        SeverityRank(Self::INVERSION[self.0 as usize])
    }

    pub fn is_better_than(&self, other: SeverityRank) -> bool {
        self.0 < other.0
    }
}

impl TryFrom<u8> for SeverityRank {
    type Error = ProcessError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SeverityRank::new(value)
    }
}

impl From<SeverityRank> for u8 {
    fn from(rank: SeverityRank) -> Self {
        rank.0
    }
}

/// Packed status: `rank << SHIFT_FLAGS | flags`
///
/// Flags ride along with the rank and never take part in ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct StatusCode(u16);

impl StatusCode {
    pub const FLAG_DOWNTIME: u16 = 1;
    pub const FLAG_ACK: u16 = 2;
    pub const SHIFT_FLAGS: u16 = 4;

    const FLAG_MASK: u16 = (1 << Self::SHIFT_FLAGS) - 1;
    const KNOWN_FLAGS: u16 = Self::FLAG_DOWNTIME | Self::FLAG_ACK;

    pub fn new(rank: SeverityRank, in_downtime: bool, acknowledged: bool) -> Self {
        let mut bits = u16::from(rank.value()) << Self::SHIFT_FLAGS;
        if in_downtime {
            bits |= Self::FLAG_DOWNTIME;
        }
        if acknowledged {
            bits |= Self::FLAG_ACK;
        }
        StatusCode(bits)
    }

    /// Unpack a raw code, rejecting unknown ranks and flags
    pub fn from_bits(bits: u16) -> ProcessResult<Self> {
        if bits & Self::FLAG_MASK & !Self::KNOWN_FLAGS != 0 {
            return Err(ProcessError::InvalidStatusBits(bits));
        }
        let rank = bits >> Self::SHIFT_FLAGS;
        if rank > u16::from(SeverityRank::MAX) {
            return Err(ProcessError::InvalidStatusBits(bits));
        }
        Ok(StatusCode(bits))
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn rank(&self) -> SeverityRank {
        SeverityRank((self.0 >> Self::SHIFT_FLAGS) as u8)
    }

    pub fn in_downtime(&self) -> bool {
        self.0 & Self::FLAG_DOWNTIME != 0
    }

    pub fn is_acknowledged(&self) -> bool {
        self.0 & Self::FLAG_ACK != 0
    }

    /// Same flags, different rank
    pub fn with_rank(&self, rank: SeverityRank) -> Self {
        StatusCode(u16::from(rank.value()) << Self::SHIFT_FLAGS | (self.0 & Self::FLAG_MASK))
    }

    /// Rank reflected through the inversion table, flags kept
    pub fn inverted(&self) -> Self {
        self.with_rank(self.rank().invert())
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = ProcessError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        StatusCode::from_bits(bits)
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}
