//! Node status codes and status bookkeeping helpers.

use diffusion_env::NodeId;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Live status of every node, keyed in canonical (ascending id) order.
pub type StatusMap = BTreeMap<NodeId, StatusCode>;

/// Discrete node status.
///
/// Serialized as its integer code. `Recovered` and `Blocked` are reserved:
/// no rule in this crate declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum StatusCode {
    Blocked = -1,
    Susceptible = 0,
    Infected = 1,
    Recovered = 2,
}

impl StatusCode {
    /// Every status code, in ascending code order.
    pub const ALL: [StatusCode; 4] = [
        StatusCode::Blocked,
        StatusCode::Susceptible,
        StatusCode::Infected,
        StatusCode::Recovered,
    ];

    /// Returns the canonical integer code.
    pub fn code(self) -> i64 {
        self as i8 as i64
    }

    /// Returns the canonical status name.
    pub fn name(self) -> &'static str {
        match self {
            StatusCode::Blocked => "Blocked",
            StatusCode::Susceptible => "Susceptible",
            StatusCode::Infected => "Infected",
            StatusCode::Recovered => "Recovered",
        }
    }

    /// Looks a status up by integer code.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Looks a status up by canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StatusCode {
    type Err = String;

    /// Accepts either the status name or the string form of its code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(status) = Self::from_name(s) {
            return Ok(status);
        }
        s.parse::<i64>()
            .ok()
            .and_then(Self::from_code)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

impl TryFrom<i64> for StatusCode {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("Unknown status code: {}", code))
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(*self as i8)
    }
}

struct StatusCodeVisitor;

impl<'de> Visitor<'de> for StatusCodeVisitor {
    type Value = StatusCode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a status code as integer, integer string, or status name")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<StatusCode, E> {
        StatusCode::try_from(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<StatusCode, E> {
        let code = i64::try_from(v).map_err(E::custom)?;
        self.visit_i64(code)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<StatusCode, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `any` so that JSON object keys ("1") and plain numbers (1) both land
        deserializer.deserialize_any(StatusCodeVisitor)
    }
}

/// A status observed outside the running model's declared status set.
///
/// Produced by status normalization; a diagnostic, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Node carrying the invalid status
    pub node: NodeId,

    /// The status that was found
    pub observed: StatusCode,

    /// Iteration index at which it was found
    pub iteration: u64,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {} had undeclared status {} ({}) at iteration {}",
            self.node,
            self.observed,
            self.observed.code(),
            self.iteration
        )
    }
}

/// Point-to-point variation between two status snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusDelta {
    /// Nodes whose status changed, with their new status
    pub changed: BTreeMap<NodeId, StatusCode>,

    /// Node count per status in the new snapshot
    pub node_count: BTreeMap<StatusCode, usize>,

    /// Signed count difference per status (new - old)
    pub count_delta: BTreeMap<StatusCode, i64>,
}

impl StatusDelta {
    /// Returns true if no status count moved.
    pub fn is_still(&self) -> bool {
        self.count_delta.values().all(|d| *d == 0)
    }
}

/// Computes the variation from `previous` to `actual` over `statuses`.
pub fn status_delta(
    previous: &StatusMap,
    actual: &StatusMap,
    statuses: &[StatusCode],
) -> StatusDelta {
    let changed = actual
        .iter()
        .filter(|(node, status)| previous.get(node) != Some(status))
        .map(|(node, status)| (*node, *status))
        .collect();

    let mut node_count = BTreeMap::new();
    let mut count_delta = BTreeMap::new();
    for &status in statuses {
        let now = count_status(actual, status);
        let before = count_status(previous, status);
        node_count.insert(status, now);
        count_delta.insert(status, now as i64 - before as i64);
    }

    StatusDelta {
        changed,
        node_count,
        count_delta,
    }
}

/// Returns true if every node of `actual` has the same status in `previous`.
pub fn check_status_similarity(actual: &StatusMap, previous: &StatusMap) -> bool {
    actual
        .iter()
        .all(|(node, status)| previous.get(node) == Some(status))
}

/// Counts nodes with the given status.
pub fn count_status(map: &StatusMap, status: StatusCode) -> usize {
    map.values().filter(|s| **s == status).count()
}
