//! # desk-core
//!
//! Core types, ID prefixes, decision rules, and error types for the exam
//! check-in desk.
//!
//! This crate provides the foundational types shared across all desk crates:
//! - Entity structs for exams, students, rosters, seating, check-ins, violations
//! - Status enums with state machine transitions
//! - ID prefix constants
//! - The pure decision and violation-derivation rules applied after a check-in
//! - Response types returned by the service layer

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod rules;
