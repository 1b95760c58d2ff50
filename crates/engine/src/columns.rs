//! Column names the dashboard depends on.
//!
//! Sources are matched on these exact header strings. A renamed upstream
//! column is not an error: it reads as all-null.

pub const CASES_ID: &str = "Cases Id";
pub const CASE_TITLE: &str = "Case Title";
pub const CASE_TYPE: &str = "Case Type";
pub const CASE_STATUS: &str = "Case Status";
pub const CASE_LABELS: &str = "Case Labels";

pub const NAME: &str = "Name";
pub const PHONE_NUMBER: &str = "Phone Number";
pub const ADDRESS: &str = "Address";

/// Personal-info columns carried onto each merged row
pub const PERSON_COLUMNS: [&str; 3] = [NAME, PHONE_NUMBER, ADDRESS];

/// Case columns carried onto each merged row
pub const CASE_COLUMNS: [&str; 4] = [CASE_TITLE, CASE_TYPE, CASE_STATUS, CASE_LABELS];

/// Merged table columns, in display order
pub const DISPLAY_COLUMNS: [&str; 7] = [
    NAME,
    PHONE_NUMBER,
    ADDRESS,
    CASE_TITLE,
    CASE_TYPE,
    CASE_STATUS,
    CASE_LABELS,
];

/// `Name` shown for a merged row with no person name
pub const UNKNOWN_NAME: &str = "Unknown";

/// Status values with a dedicated summary counter
pub const STATUS_OPEN: &str = "Open";
pub const STATUS_UNDER_INVESTIGATION: &str = "Under Investigation";
