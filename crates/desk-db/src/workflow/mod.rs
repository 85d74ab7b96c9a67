//! Multi-step operations that span several repositories.

pub mod check_in;

pub use check_in::{CheckInRequest, PhotoUpload};
