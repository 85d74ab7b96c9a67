//! Entity structs for all desk domain objects.
//!
//! Each entity maps to a table in the libSQL store. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema`.

mod check_in;
mod exam;
mod roster;
mod seating;
mod student;
mod violation;

pub use check_in::CheckIn;
pub use exam::Exam;
pub use roster::RosterEntry;
pub use seating::{Seat, SeatAssignment, SeatOccupancy, SeatingPlan};
pub use student::Student;
pub use violation::Violation;
