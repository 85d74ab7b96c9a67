pub mod checkin;
pub mod dispatch;
pub mod exam;
pub mod report;
pub mod roster;
pub mod schema;
pub mod seating;
pub mod shared;
pub mod student;
pub mod violation;
