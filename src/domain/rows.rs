//! Mapping between raw sheet grids and typed records.
//!
//! Participants live in columns A:B with a header in row 1. Form responses
//! live in columns D:G of the same tab and start at row 1 with no header, so
//! the two ranges number their rows differently.

use crate::domain::entities::{DinnerAttendance, FormResponse, Participant, Registration};
use crate::domain::ports::Grid;

pub fn participant_range(sheet: &str) -> String {
    format!("{sheet}!A:B")
}

pub fn participant_row_range(sheet: &str, row: u32) -> String {
    format!("{sheet}!A{row}:B{row}")
}

pub fn points_cell(sheet: &str, row: u32) -> String {
    format!("{sheet}!B{row}")
}

pub fn form_identity_range(sheet: &str) -> String {
    format!("{sheet}!D:D")
}

pub fn form_range(sheet: &str) -> String {
    format!("{sheet}!D:G")
}

pub fn form_row_range(sheet: &str, row: u32) -> String {
    format!("{sheet}!D{row}:G{row}")
}

// Missing trailing cells read as empty.
fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn row_number(index: usize, offset: u32) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |index| index.saturating_add(offset))
}

/// Leading-integer parse: optional sign, then digits up to the first
/// non-digit. Anything unparsable is 0.
pub fn parse_points(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    match digits[..end].parse::<i64>() {
        Ok(points) if negative => -points,
        Ok(points) => points,
        Err(_) => 0,
    }
}

pub fn parse_participants(grid: &Grid) -> Vec<Participant> {
    grid.iter()
        .enumerate()
        .skip(1)
        .map(|(index, row)| Participant {
            name: cell(row, 0).to_string(),
            points: parse_points(cell(row, 1)),
            // index already counts the header, so +1 lands on the sheet row.
            row_number: row_number(index, 1),
        })
        .filter(|participant| !participant.name.is_empty())
        .collect()
}

pub fn parse_form_responses(grid: &Grid) -> Vec<FormResponse> {
    grid.iter()
        .enumerate()
        .map(|(index, row)| FormResponse {
            name: cell(row, 0).to_string(),
            attending_dinner: DinnerAttendance::from_cell(cell(row, 1)),
            allergies: cell(row, 2).to_string(),
            drink_preferences: cell(row, 3).to_string(),
            row_number: row_number(index, 1),
        })
        .filter(|response| !response.name.trim().is_empty())
        .collect()
}

pub fn participant_row(name: &str, points: i64) -> Grid {
    vec![vec![name.to_string(), points.to_string()]]
}

pub fn points_row(points: i64) -> Grid {
    vec![vec![points.to_string()]]
}

pub fn form_response_row(registration: &Registration) -> Grid {
    vec![vec![
        registration.name.clone(),
        registration.attending_dinner.as_cell().to_string(),
        registration.allergies.clone(),
        registration.drinks_cell(),
    ]]
}

// First case-insensitive exact match in a single-column grid.
pub fn find_row_by_name(column: &Grid, name: &str) -> Option<u32> {
    let needle = name.to_lowercase();
    column
        .iter()
        .position(|row| cell(row, 0).to_lowercase() == needle)
        .map(|index| row_number(index, 1))
}

// First blank cell, or one past the scanned rows.
pub fn first_empty_row(column: &Grid) -> u32 {
    let index = column
        .iter()
        .position(|row| cell(row, 0).trim().is_empty())
        .unwrap_or(column.len());
    row_number(index, 1)
}
