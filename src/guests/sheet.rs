use std::collections::BTreeMap;

use crate::foundation::error::{RevealError, RevealResult};

/// Sheet tab holding the guest list.
pub const GUEST_SHEET: &str = "Guests";

/// Field names recognised in the header row, with the header spellings that map to them.
const FIELD_HEADERS: &[(&str, &[&str])] = &[
    ("firstName", &["firstname", "first"]),
    ("lastName", &["lastname", "last"]),
    ("party", &["party", "partyname"]),
    ("phone", &["phone", "phonenumber"]),
    ("email", &["email", "emailaddress"]),
    ("address", &["address", "mailingaddress"]),
    ("rehearsalRsvp", &["rehearsalrsvp", "rehearsal"]),
    ("ceremonyRsvp", &["ceremonyrsvp", "ceremony"]),
    ("receptionRsvp", &["receptionrsvp", "reception", "attending"]),
    ("dietaryRestrictions", &["dietaryrestrictions", "dietary"]),
];

/// Where a guest lives in the sheet: a 1-based row and the column of each field.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPosition {
    /// 1-based sheet row (row 1 is the header).
    pub row: u32,
    /// 1-based column per field name.
    #[serde(rename = "columnMap")]
    pub column_by_field: BTreeMap<String, u32>,
}

impl SheetPosition {
    /// A1 address of `field` in this row, e.g. `Guests!L12`.
    pub fn cell(&self, field: &str) -> Option<String> {
        let col = *self.column_by_field.get(field)?;
        Some(a1_address(GUEST_SHEET, self.row, col))
    }
}

/// Column map built from the header row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: BTreeMap<String, u32>,
}

impl HeaderMap {
    /// Map each recognised header cell to its field. Unknown headers are ignored.
    pub fn from_header(header: &[String]) -> RevealResult<Self> {
        let mut columns = BTreeMap::new();
        for (idx, cell) in header.iter().enumerate() {
            let key = normalize_header(cell);
            let Some((field, _)) = FIELD_HEADERS
                .iter()
                .find(|(_, spellings)| spellings.contains(&key.as_str()))
            else {
                continue;
            };
            columns.entry((*field).to_owned()).or_insert(idx as u32 + 1);
        }
        for required in ["firstName", "lastName"] {
            if !columns.contains_key(required) {
                return Err(RevealError::validation(format!(
                    "guest sheet header is missing a '{required}' column"
                )));
            }
        }
        Ok(Self { columns })
    }

    /// 1-based column of `field`.
    pub fn column(&self, field: &str) -> Option<u32> {
        self.columns.get(field).copied()
    }

    /// Trimmed value of `field` in `row`, or empty.
    pub fn value(&self, row: &[String], field: &str) -> String {
        self.column(field)
            .and_then(|c| row.get(c as usize - 1))
            .map(|v| v.trim().to_owned())
            .unwrap_or_default()
    }

    /// Position of data row `row_number` (1-based) under this header.
    pub fn position(&self, row_number: u32) -> SheetPosition {
        SheetPosition {
            row: row_number,
            column_by_field: self.columns.clone(),
        }
    }
}

/// `Sheet!<column letters><row>` for 1-based `row` and `col`.
pub fn a1_address(sheet: &str, row: u32, col: u32) -> String {
    format!("{sheet}!{}{row}", column_letters(col))
}

/// Spreadsheet column letters for a 1-based index: 1 -> A, 26 -> Z, 27 -> AA.
pub fn column_letters(mut col: u32) -> String {
    let mut out = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn normalize_header(cell: &str) -> String {
    cell.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    #[test]
    fn column_letters_roll_over() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(12), "L");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(703), "AAA");
        assert_eq!(a1_address("Guests", 12, 12), "Guests!L12");
    }

    #[test]
    fn header_map_is_spelling_tolerant() {
        let h = HeaderMap::from_header(&row(&[
            "First Name",
            "Last Name",
            "Party",
            "Notes",
            "Reception RSVP",
        ]))
        .unwrap();
        assert_eq!(h.column("firstName"), Some(1));
        assert_eq!(h.column("receptionRsvp"), Some(5));
        assert_eq!(h.column("phone"), None);
        assert_eq!(h.value(&row(&[" Ada ", "Lovelace"]), "firstName"), "Ada");
        assert_eq!(h.value(&row(&["Ada"]), "party"), "");
    }

    #[test]
    fn header_without_names_is_rejected() {
        assert!(HeaderMap::from_header(&row(&["Party", "Email"])).is_err());
    }

    #[test]
    fn position_addresses_cells() {
        let h = HeaderMap::from_header(&row(&["First", "Last", "Ceremony"])).unwrap();
        let pos = h.position(7);
        assert_eq!(pos.cell("ceremonyRsvp").as_deref(), Some("Guests!C7"));
        assert_eq!(pos.cell("email"), None);
    }
}
