//! Status enums, categories, and workflow stages.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! which is also the representation stored in SQL. Status enums with state
//! machines provide `allowed_next_states()` to enforce valid transitions at the
//! application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Parse `s` by matching it against `as_str()` of every variant.
fn parse_variant<T: Copy>(
    s: &str,
    all: &[T],
    as_str: fn(T) -> &'static str,
    kind: &str,
) -> Result<T, CoreError> {
    let needle = s.trim().to_ascii_lowercase().replace('-', "_");
    all.iter()
        .copied()
        .find(|v| as_str(*v) == needle)
        .ok_or_else(|| {
            let expected: Vec<&str> = all.iter().map(|v| as_str(*v)).collect();
            CoreError::Validation(format!(
                "unknown {kind} '{s}' (expected one of: {})",
                expected.join(", ")
            ))
        })
}

// ---------------------------------------------------------------------------
// ExamStatus
// ---------------------------------------------------------------------------

/// Lifecycle of an exam session.
///
/// ```text
/// draft → active → completed → archived
///       → archived
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    Draft,
    Active,
    Completed,
    Archived,
}

impl ExamStatus {
    pub const ALL: &'static [Self] = &[Self::Draft, Self::Active, Self::Completed, Self::Archived];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Active, Self::Archived],
            Self::Active => &[Self::Completed],
            Self::Completed => &[Self::Archived],
            Self::Archived => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, Self::ALL, Self::as_str, "exam status")
    }
}

// ---------------------------------------------------------------------------
// LayoutKind
// ---------------------------------------------------------------------------

/// How a seating plan's seats were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Row-major `rows × cols` grid with coordinates.
    Grid,
    /// Caller-supplied list of codes; coordinates only where a code parses.
    Explicit,
}

impl LayoutKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Explicit => "explicit",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// VerificationOutcome
// ---------------------------------------------------------------------------

/// Identity verification outcome recorded on a check-in.
///
/// `Override` is only ever set by a human after the fact; the workflow itself
/// produces `Match` or `NoMatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    Match,
    NoMatch,
    Override,
}

impl VerificationOutcome {
    pub const ALL: &'static [Self] = &[Self::Match, Self::NoMatch, Self::Override];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::NoMatch => "no_match",
            Self::Override => "override",
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationOutcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, Self::ALL, Self::as_str, "verification outcome")
    }
}

// ---------------------------------------------------------------------------
// DecisionStatus
// ---------------------------------------------------------------------------

/// Machine decision taken at check-in time. Never rewritten afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Approved,
    Flagged,
}

impl DecisionStatus {
    pub const ALL: &'static [Self] = &[Self::Approved, Self::Flagged];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Flagged => "flagged",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, Self::ALL, Self::as_str, "decision status")
    }
}

// ---------------------------------------------------------------------------
// ViolationCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    IdentityMismatch,
    SeatMismatch,
    UnauthorizedMaterials,
    DisruptiveBehavior,
    LateArrival,
    Other,
}

impl ViolationCategory {
    pub const ALL: &'static [Self] = &[
        Self::IdentityMismatch,
        Self::SeatMismatch,
        Self::UnauthorizedMaterials,
        Self::DisruptiveBehavior,
        Self::LateArrival,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdentityMismatch => "identity_mismatch",
            Self::SeatMismatch => "seat_mismatch",
            Self::UnauthorizedMaterials => "unauthorized_materials",
            Self::DisruptiveBehavior => "disruptive_behavior",
            Self::LateArrival => "late_arrival",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, Self::ALL, Self::as_str, "violation category")
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, Self::ALL, Self::as_str, "severity")
    }
}

// ---------------------------------------------------------------------------
// ViolationStatus
// ---------------------------------------------------------------------------

/// Review lifecycle of a violation.
///
/// ```text
/// recorded → reviewed → resolved
///                     → dismissed
/// recorded → resolved
///          → dismissed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStatus {
    Recorded,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ViolationStatus {
    pub const ALL: &'static [Self] = &[
        Self::Recorded,
        Self::Reviewed,
        Self::Resolved,
        Self::Dismissed,
    ];

    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Recorded => &[Self::Reviewed, Self::Resolved, Self::Dismissed],
            Self::Reviewed => &[Self::Resolved, Self::Dismissed],
            Self::Resolved | Self::Dismissed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Entering a closing state stamps resolver identity and time.
    #[must_use]
    pub const fn is_closing(self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::Reviewed => "reviewed",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for ViolationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, Self::ALL, Self::as_str, "violation status")
    }
}

// ---------------------------------------------------------------------------
// ViolationSource
// ---------------------------------------------------------------------------

/// Who raised a violation: the rule engine after a check-in, or a proctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSource {
    Automatic,
    Manual,
}

impl ViolationSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for ViolationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckInStage
// ---------------------------------------------------------------------------

/// Stages one check-in attempt passes through, in order.
///
/// ```text
/// intake → roster_checked → seat_validated → verified → decided → persisted
/// ```
///
/// Rejections leave the machine at the stage that failed; they are reported
/// through `CheckInError`, not through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStage {
    Intake,
    RosterChecked,
    SeatValidated,
    Verified,
    Decided,
    Persisted,
}

impl CheckInStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::RosterChecked => "roster_checked",
            Self::SeatValidated => "seat_validated",
            Self::Verified => "verified",
            Self::Decided => "decided",
            Self::Persisted => "persisted",
        }
    }
}

impl fmt::Display for CheckInStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
