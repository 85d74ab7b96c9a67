mod checkin;
mod exam;
mod report;
mod roster;
mod seating;
mod student;
mod violation;

pub use checkin::CheckinCommands;
pub use exam::ExamCommands;
pub use report::ReportCommands;
pub use roster::RosterCommands;
pub use seating::SeatingCommands;
pub use student::StudentCommands;
pub use violation::ViolationCommands;
