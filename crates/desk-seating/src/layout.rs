//! Seating plan generation.

use desk_core::enums::LayoutKind;
use desk_core::rules::normalize_seat;
use serde::{Deserialize, Serialize};

use crate::code::{format_seat, parse_seat};
use crate::error::LayoutError;

/// Upper bound on seats in one generated plan.
pub const MAX_SEATS: u32 = 10_000;

/// How a plan's seats are described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeatLayout {
    /// `rows` x `cols` seats, enumerated row-major.
    Grid { rows: u32, cols: u32 },
    /// Free-form seat codes in the given order.
    Explicit { codes: Vec<String> },
}

impl SeatLayout {
    #[must_use]
    pub const fn kind(&self) -> LayoutKind {
        match self {
            Self::Grid { .. } => LayoutKind::Grid,
            Self::Explicit { .. } => LayoutKind::Explicit,
        }
    }

    /// Grid dimensions, `None` for explicit layouts.
    #[must_use]
    pub const fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Grid { rows, cols } => Some((*rows, *cols)),
            Self::Explicit { .. } => None,
        }
    }
}

/// One seat produced by [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSeat {
    pub code: String,
    pub row: Option<u32>,
    pub column: Option<u32>,
}

/// Build the ordered seat list for a layout.
///
/// Grid seats carry coordinates. Explicit codes are trimmed and uppercased,
/// blanks are skipped, and repeats keep their first position; coordinates are
/// filled in only for codes that follow the seat grammar.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidLayout`] for a zero dimension, a layout
/// larger than [`MAX_SEATS`], or an explicit list with no usable codes.
pub fn generate(layout: &SeatLayout) -> Result<Vec<GeneratedSeat>, LayoutError> {
    match layout {
        SeatLayout::Grid { rows, cols } => generate_grid(*rows, *cols),
        SeatLayout::Explicit { codes } => generate_explicit(codes),
    }
}

fn generate_grid(rows: u32, cols: u32) -> Result<Vec<GeneratedSeat>, LayoutError> {
    if rows == 0 || cols == 0 {
        return Err(LayoutError::InvalidLayout(format!(
            "grid needs positive rows and cols, got {rows}x{cols}"
        )));
    }
    let total = u64::from(rows) * u64::from(cols);
    if total > u64::from(MAX_SEATS) {
        return Err(LayoutError::InvalidLayout(format!(
            "grid of {total} seats exceeds the {MAX_SEATS} seat limit"
        )));
    }

    let mut seats = Vec::with_capacity(usize::try_from(total).unwrap_or_default());
    for row in 0..rows {
        for column in 1..=cols {
            seats.push(GeneratedSeat {
                code: format_seat(row, column),
                row: Some(row),
                column: Some(column),
            });
        }
    }
    Ok(seats)
}

fn generate_explicit(codes: &[String]) -> Result<Vec<GeneratedSeat>, LayoutError> {
    let mut seen = std::collections::HashSet::new();
    let mut seats = Vec::new();

    for raw in codes {
        let Some(code) = normalize_seat(Some(raw)) else {
            continue;
        };
        if !seen.insert(code.clone()) {
            continue;
        }
        let (row, column) = parse_seat(&code).map_or((None, None), |(r, c)| (Some(r), Some(c)));
        seats.push(GeneratedSeat { code, row, column });
    }

    if seats.is_empty() {
        return Err(LayoutError::InvalidLayout(
            "explicit layout has no usable seat codes".into(),
        ));
    }
    if seats.len() > MAX_SEATS as usize {
        return Err(LayoutError::InvalidLayout(format!(
            "explicit layout of {} seats exceeds the {MAX_SEATS} seat limit",
            seats.len()
        )));
    }
    Ok(seats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn codes(seats: &[GeneratedSeat]) -> Vec<&str> {
        seats.iter().map(|s| s.code.as_str()).collect()
    }

    #[test]
    fn grid_is_row_major() {
        let seats = generate(&SeatLayout::Grid { rows: 2, cols: 3 }).unwrap();
        assert_eq!(codes(&seats), vec!["A1", "A2", "A3", "B1", "B2", "B3"]);
        assert_eq!(seats[4].row, Some(1));
        assert_eq!(seats[4].column, Some(2));
    }

    #[test]
    fn grid_rolls_over_to_double_letters() {
        let seats = generate(&SeatLayout::Grid { rows: 28, cols: 1 }).unwrap();
        assert_eq!(seats[25].code, "Z1");
        assert_eq!(seats[26].code, "AA1");
        assert_eq!(seats[27].code, "AB1");
    }

    #[rstest]
    #[case(0, 3)]
    #[case(3, 0)]
    #[case(0, 0)]
    #[case(101, 100)]
    fn grid_rejects_bad_dimensions(#[case] rows: u32, #[case] cols: u32) {
        assert!(matches!(
            generate(&SeatLayout::Grid { rows, cols }),
            Err(LayoutError::InvalidLayout(_))
        ));
    }

    #[test]
    fn explicit_normalizes_and_keeps_first() {
        let layout = SeatLayout::Explicit {
            codes: vec!["a1".into(), "A1".into(), " B2 ".into()],
        };
        let seats = generate(&layout).unwrap();
        assert_eq!(codes(&seats), vec!["A1", "B2"]);
    }

    #[test]
    fn explicit_codes_normalize_like_claimed_seats() {
        let raw = ["straße-1", " b2 ", "ǆ3"];
        let layout = SeatLayout::Explicit {
            codes: raw.iter().map(|c| (*c).to_string()).collect(),
        };
        let seats = generate(&layout).unwrap();
        let claimed: Vec<String> = raw.iter().filter_map(|c| normalize_seat(Some(*c))).collect();
        assert_eq!(codes(&seats), claimed.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(seats[0].code, "STRAßE-1");
    }

    #[test]
    fn explicit_keeps_non_grammar_codes_without_coordinates() {
        let layout = SeatLayout::Explicit {
            codes: vec!["window-1".into(), "C4".into()],
        };
        let seats = generate(&layout).unwrap();
        assert_eq!(
            seats,
            vec![
                GeneratedSeat {
                    code: "WINDOW-1".into(),
                    row: None,
                    column: None,
                },
                GeneratedSeat {
                    code: "C4".into(),
                    row: Some(2),
                    column: Some(4),
                },
            ]
        );
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec!["".to_string(), "   ".to_string()])]
    fn explicit_rejects_empty(#[case] codes: Vec<String>) {
        assert!(matches!(
            generate(&SeatLayout::Explicit { codes }),
            Err(LayoutError::InvalidLayout(_))
        ));
    }

    #[test]
    fn layout_deserializes_from_tagged_json() {
        let grid: SeatLayout = serde_json::from_str(r#"{"kind":"grid","rows":2,"cols":2}"#).unwrap();
        assert_eq!(grid, SeatLayout::Grid { rows: 2, cols: 2 });
        assert_eq!(grid.kind(), LayoutKind::Grid);

        let explicit: SeatLayout =
            serde_json::from_str(r#"{"kind":"explicit","codes":["A1"]}"#).unwrap();
        assert_eq!(explicit.kind(), LayoutKind::Explicit);
        assert_eq!(explicit.dimensions(), None);
    }
}
