//! Repository methods, one module per table family, all as `impl DeskService`.

pub mod check_in;
pub mod exam;
pub mod report;
pub mod roster;
pub mod seating;
pub mod student;
pub mod violation;
