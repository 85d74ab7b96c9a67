//! Seat assignment validation.
//!
//! [`validate_seat`] checks one seat against a plan's seat universe and the
//! seats already held. [`BatchValidator`] walks an ordered batch, feeding each
//! accepted seat back into the occupied set so the first claim on a seat wins.

use std::collections::{HashMap, HashSet};

use desk_core::rules::normalize_seat;

use crate::error::SeatRejection;

/// Check one seat code. `code` is compared as given; callers normalize first.
///
/// # Errors
///
/// [`SeatRejection::SeatCodeRequired`] for an empty code,
/// [`SeatRejection::SeatNotFound`] when the plan has no such seat,
/// [`SeatRejection::SeatAlreadyTaken`] when it is already held.
pub fn validate_seat(
    code: &str,
    valid: &HashSet<String>,
    occupied: &HashSet<String>,
) -> Result<(), SeatRejection> {
    if code.is_empty() {
        return Err(SeatRejection::SeatCodeRequired);
    }
    if !valid.contains(code) {
        return Err(SeatRejection::SeatNotFound { code: code.to_string() });
    }
    if occupied.contains(code) {
        return Err(SeatRejection::SeatAlreadyTaken { code: code.to_string() });
    }
    Ok(())
}

/// An accepted batch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub student_id: String,
    pub seat_code: String,
    /// Seat the student held before this entry, if any.
    pub previous_seat: Option<String>,
}

impl Admission {
    /// True when the student already held this seat.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.previous_seat.as_deref() == Some(self.seat_code.as_str())
    }
}

/// Left-to-right validator for one assignment batch.
#[derive(Debug, Clone)]
pub struct BatchValidator {
    valid: HashSet<String>,
    occupied: HashSet<String>,
    seat_of: HashMap<String, String>,
    seen: HashSet<String>,
}

impl BatchValidator {
    /// Seed with the plan's seat codes and its existing `(student, seat)`
    /// assignments.
    pub fn new<V, E>(valid: V, existing: E) -> Self
    where
        V: IntoIterator<Item = String>,
        E: IntoIterator<Item = (String, String)>,
    {
        let seat_of: HashMap<String, String> = existing.into_iter().collect();
        Self {
            valid: valid.into_iter().collect(),
            occupied: seat_of.values().cloned().collect(),
            seat_of,
            seen: HashSet::new(),
        }
    }

    /// Validate the next batch entry and, on success, record it.
    ///
    /// The seat code is trimmed and uppercased. A student may appear once
    /// per batch; a rejected first appearance still counts. Moving a student
    /// releases the seat they held.
    ///
    /// # Errors
    ///
    /// Any [`SeatRejection`] except `NotOnRoster`, which needs the store.
    pub fn admit(&mut self, student_id: &str, seat_code: &str) -> Result<Admission, SeatRejection> {
        let student_id = student_id.trim();
        if student_id.is_empty() {
            return Err(SeatRejection::StudentRequired);
        }
        if !self.seen.insert(student_id.to_string()) {
            return Err(SeatRejection::DuplicateStudent {
                student_id: student_id.to_string(),
            });
        }

        let code = normalize_seat(Some(seat_code)).unwrap_or_default();
        let previous = self.seat_of.get(student_id).cloned();
        if let Some(prev) = &previous {
            self.occupied.remove(prev);
        }

        if let Err(rejection) = validate_seat(&code, &self.valid, &self.occupied) {
            if let Some(prev) = &previous {
                self.occupied.insert(prev.clone());
            }
            return Err(rejection);
        }

        self.occupied.insert(code.clone());
        self.seat_of.insert(student_id.to_string(), code.clone());
        Ok(Admission {
            student_id: student_id.to_string(),
            seat_code: code,
            previous_seat: previous,
        })
    }

    /// Whether a seat is held after the entries admitted so far.
    #[must_use]
    pub fn is_occupied(&self, code: &str) -> bool {
        self.occupied.contains(code)
    }
}
