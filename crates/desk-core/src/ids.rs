//! ID prefixes for every persisted entity.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated by the store.

pub const PREFIX_EXAM: &str = "exm";
pub const PREFIX_STUDENT: &str = "stu";
pub const PREFIX_PLAN: &str = "pln";
pub const PREFIX_ASSIGNMENT: &str = "asg";
pub const PREFIX_CHECK_IN: &str = "chk";
pub const PREFIX_VIOLATION: &str = "vio";

/// Every prefix in use, for exhaustive ID tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_EXAM,
    PREFIX_STUDENT,
    PREFIX_PLAN,
    PREFIX_ASSIGNMENT,
    PREFIX_CHECK_IN,
    PREFIX_VIOLATION,
];
