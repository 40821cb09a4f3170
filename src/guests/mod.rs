//! RSVP guest-list reconciliation.
//!
//! Pure data handling for the spreadsheet-backed guest list: parse rows, match a typed name,
//! expand to the guest's party, and compute the minimal set of cell writes for an RSVP. Fetching
//! and writing the sheet is left to the caller.

/// Guest records, party lookup and RSVP diffs.
pub mod party;
/// Header mapping and A1 cell addressing.
pub mod sheet;
