//! Spreadsheet layout: where the roster and the queue position live, and how
//! raw cell values become domain types.
//!
//! - Roster: the first worksheet, a header row followed by one broker per row.
//!   Columns are located by header name, so column order does not matter.
//! - Position: cell `A2` of the `Config` worksheet, labelled by `A1`.

use serde_json::Value;

use super::error::SheetsApiError;
use crate::types::{Broker, Roster, StoredPosition};

/// Range covering the first worksheet's roster columns.
pub const ROSTER_RANGE: &str = "A:Z";

/// Worksheet holding the persisted queue position.
pub const CONFIG_SHEET: &str = "Config";

/// Cell holding the persisted queue position.
pub const POSITION_CELL: &str = "Config!A2";

/// Label and value cells written when the config worksheet is created.
pub const POSITION_LABEL_RANGE: &str = "Config!A1:A2";

/// Label stored above the position cell.
pub const POSITION_LABEL: &str = "fila_position";

/// Size of a freshly created config worksheet.
pub const CONFIG_SHEET_ROWS: u32 = 10;
pub const CONFIG_SHEET_COLUMNS: u32 = 2;

const NAME_HEADERS: &[&str] = &["nome", "name"];
const EMAIL_HEADERS: &[&str] = &["email", "e-mail"];
const PHONE_HEADERS: &[&str] = &["telefone", "phone", "whatsapp"];

/// Renders a cell as trimmed text. Numbers keep their JSON rendering, so an
/// unformatted phone number like `5511999990000` survives intact.
fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn find_column(header: &[Value], aliases: &[&str]) -> Option<usize> {
    header.iter().position(|cell| {
        let name = cell_text(Some(cell)).to_lowercase();
        aliases.contains(&name.as_str())
    })
}

/// Builds a roster from the rows of the roster worksheet.
///
/// An empty worksheet yields an empty roster. A header row without a name
/// column is a permanent error: the sheet is not a roster.
pub fn parse_roster(rows: &[Vec<Value>]) -> Result<Roster, SheetsApiError> {
    let Some((header, records)) = rows.split_first() else {
        return Ok(Roster::default());
    };

    let name_col = find_column(header, NAME_HEADERS).ok_or_else(|| {
        SheetsApiError::permanent_without_source(format!(
            "roster header has no name column (expected one of {NAME_HEADERS:?})"
        ))
    })?;
    let email_col = find_column(header, EMAIL_HEADERS);
    let phone_col = find_column(header, PHONE_HEADERS);

    let cell = |row: &Vec<Value>, col: Option<usize>| cell_text(col.and_then(|c| row.get(c)));

    Ok(records
        .iter()
        .map(|row| {
            Broker::new(
                cell(row, Some(name_col)),
                cell(row, email_col),
                cell(row, phone_col),
            )
        })
        .collect())
}

/// Reads the stored position from the `Config!A2` response rows.
///
/// A blank or absent cell means the queue was never advanced: position 0.
pub fn parse_position(rows: &[Vec<Value>]) -> Result<StoredPosition, SheetsApiError> {
    let text = cell_text(rows.first().and_then(|row| row.first()));
    if text.is_empty() {
        return Ok(StoredPosition::START);
    }

    text.parse::<i64>().map(StoredPosition).map_err(|_| {
        SheetsApiError::permanent_without_source(format!(
            "queue position cell {POSITION_CELL} holds {text:?}, expected an integer"
        ))
    })
}

/// The single-cell payload for writing a position.
pub fn position_values(position: StoredPosition) -> Vec<Vec<Value>> {
    vec![vec![Value::from(position.value())]]
}

/// The label + value payload written into a freshly created config sheet.
pub fn initial_config_values(position: StoredPosition) -> Vec<Vec<Value>> {
    vec![
        vec![Value::from(POSITION_LABEL)],
        vec![Value::from(position.value())],
    ]
}
