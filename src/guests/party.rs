use crate::foundation::error::{RevealError, RevealResult};
use crate::guests::sheet::{HeaderMap, SheetPosition};

/// Party value meaning "not grouped with anyone".
const UNKNOWN_PARTY: &str = "Unknown";

/// RSVP value for an event the guest is not invited to. Never overwritten.
pub const NOT_APPLICABLE: &str = "N/A";

/// First data row; row 1 holds the header.
const FIRST_DATA_ROW: u32 = 2;

/// RSVP fields a guest may change; everything else in the row is read-only.
pub const RSVP_FIELDS: &[&str] = &[
    "rehearsalRsvp",
    "ceremonyRsvp",
    "receptionRsvp",
    "dietaryRestrictions",
];

/// One guest row.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Guest {
    /// Sheet position; stable for the lifetime of the sheet.
    pub id: SheetPosition,
    /// Trimmed first name.
    pub first_name: String,
    /// Trimmed last name.
    pub last_name: String,
    /// Party (household) name; empty or `Unknown` when ungrouped.
    pub party: String,
    /// `"{first_name} {last_name}"`, the name guests type to find themselves.
    pub full_name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Mailing address.
    pub address: String,
    /// Rehearsal dinner answer.
    pub rehearsal_rsvp: String,
    /// Ceremony answer.
    pub ceremony_rsvp: String,
    /// Reception answer.
    pub reception_rsvp: String,
    /// Free-form dietary notes.
    pub dietary_restrictions: String,
}

impl Guest {
    /// Value of an RSVP field by its sheet field name.
    pub fn rsvp_field(&self, field: &str) -> Option<&str> {
        match field {
            "rehearsalRsvp" => Some(&self.rehearsal_rsvp),
            "ceremonyRsvp" => Some(&self.ceremony_rsvp),
            "receptionRsvp" => Some(&self.reception_rsvp),
            "dietaryRestrictions" => Some(&self.dietary_restrictions),
            _ => None,
        }
    }

    fn has_party(&self) -> bool {
        !self.party.is_empty() && self.party != UNKNOWN_PARTY
    }
}

/// One cell write produced by [`changed_cells`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CellUpdate {
    /// A1 range, e.g. `Guests!L12`.
    pub range: String,
    /// New cell value.
    pub value: String,
}

/// `GET /api/guests` response body.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GuestsResponse {
    /// Whether the sheet could be read.
    pub success: bool,
    /// Parsed guests in sheet order.
    pub guests: Vec<Guest>,
}

/// `POST /api/rsvp` request body.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RsvpRequest {
    /// The party's guests with their updated answers.
    pub guests: Vec<Guest>,
    /// Optional note to the couple.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RsvpRequest {
    /// An RSVP must name at least one guest.
    ///
    /// Guests without a sheet row (names typed in by hand) are accepted here and skipped by
    /// [`changed_cells`], so the rest of the party is still recorded.
    pub fn validate(&self) -> RevealResult<()> {
        if self.guests.is_empty() {
            return Err(RevealError::validation("rsvp must include at least one guest"));
        }
        Ok(())
    }
}

/// Parse raw sheet values (header row first) into guests.
///
/// Rows without a first or last name are skipped. Row numbers are 1-based, so the first data
/// row is row 2.
pub fn parse_guest_sheet(values: &[Vec<String>]) -> RevealResult<Vec<Guest>> {
    let Some((header, rows)) = values.split_first() else {
        return Ok(Vec::new());
    };
    let map = HeaderMap::from_header(header)?;

    let mut guests = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let first_name = map.value(row, "firstName");
        let last_name = map.value(row, "lastName");
        if first_name.is_empty() || last_name.is_empty() {
            continue;
        }
        let full_name = format!("{first_name} {last_name}");
        guests.push(Guest {
            id: map.position(i as u32 + FIRST_DATA_ROW),
            party: map.value(row, "party"),
            phone: map.value(row, "phone"),
            email: map.value(row, "email"),
            address: map.value(row, "address"),
            rehearsal_rsvp: map.value(row, "rehearsalRsvp"),
            ceremony_rsvp: map.value(row, "ceremonyRsvp"),
            reception_rsvp: map.value(row, "receptionRsvp"),
            dietary_restrictions: map.value(row, "dietaryRestrictions"),
            first_name,
            last_name,
            full_name,
        });
    }
    tracing::debug!(guests = guests.len(), "parsed guest sheet");
    Ok(guests)
}

/// Exact full-name match, ignoring case and surrounding whitespace.
pub fn find_guest<'a>(guests: &'a [Guest], typed_name: &str) -> Option<&'a Guest> {
    let wanted = typed_name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    guests.iter().find(|g| g.full_name.to_lowercase() == wanted)
}

/// Guests whose full name, or `"Last, First"`, contains `typed` (case-insensitive).
///
/// Blank input suggests nobody.
pub fn suggest_guests<'a>(guests: &'a [Guest], typed: &str) -> Vec<&'a Guest> {
    let needle = typed.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    guests
        .iter()
        .filter(|g| {
            g.full_name.to_lowercase().contains(&needle)
                || format!("{}, {}", g.last_name, g.first_name)
                    .to_lowercase()
                    .contains(&needle)
        })
        .collect()
}

/// Everyone in `guest`'s party, in sheet order. Guests without a party are a party of one.
pub fn party_of<'a>(guests: &'a [Guest], guest: &'a Guest) -> Vec<&'a Guest> {
    if !guest.has_party() {
        return vec![guest];
    }
    guests.iter().filter(|g| g.party == guest.party).collect()
}

/// Cell writes needed to turn `before` into `after`, RSVP fields only.
///
/// Guests are matched by sheet row. Fields without a mapped column, fields that are
/// [`NOT_APPLICABLE`] in `before`, guests without a sheet row and guests missing from `before`
/// produce no writes.
pub fn changed_cells(before: &[Guest], after: &[Guest]) -> Vec<CellUpdate> {
    let mut out = Vec::new();
    for new in after {
        if new.id.row < FIRST_DATA_ROW {
            tracing::debug!(name = %new.full_name, "skipping guest without a sheet row");
            continue;
        }
        let Some(old) = before.iter().find(|g| g.id.row == new.id.row) else {
            tracing::warn!(row = new.id.row, name = %new.full_name, "no baseline row for guest");
            continue;
        };
        for field in RSVP_FIELDS {
            let (Some(a), Some(b)) = (old.rsvp_field(field), new.rsvp_field(field)) else {
                continue;
            };
            if a == b || a == NOT_APPLICABLE {
                continue;
            }
            let Some(range) = old.id.cell(field) else {
                continue;
            };
            out.push(CellUpdate {
                range,
                value: b.to_owned(),
            });
        }
    }
    out
}
