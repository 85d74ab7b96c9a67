//! # desk-seating
//!
//! Pure seating logic for exam sessions. Nothing in this crate touches the
//! store; callers persist what it produces.
//!
//! - [`code`]: the `<RowLetters><Column>` seat code grammar (`A1`, `AA12`)
//! - [`layout`]: builds a plan's seat universe from a grid or explicit list
//! - [`validator`]: checks seat assignments, one at a time or as an ordered batch

pub mod code;
mod error;
pub mod layout;
pub mod validator;

pub use code::{SeatCode, format_seat, parse_seat};
pub use error::{SeatCodeError, SeatRejection, LayoutError};
pub use layout::{GeneratedSeat, MAX_SEATS, SeatLayout, generate};
pub use validator::{Admission, BatchValidator, validate_seat};
