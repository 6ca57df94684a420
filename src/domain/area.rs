// src/domain/area.rs
//
// Canonical labels and the pattern rules that map free-text
// "Responsibility Areas" values onto them. Rule order matters: the first
// match wins, so CPP values are claimed before the bare PP prefix rule runs.

/// Label families produced by [`map_area`].
pub const AREA_CPP: &str = "CPP (Including Power Plant Areas)";
pub const AREA_NCU: &str = "NCU (Including CCR Areas)";
pub const AREA_PP: &str = "PP";
pub const AREA_OTHERS: &str = "OTHERS";

/// Fixed department columns of the custom summary table. Departments outside
/// this list still count in the raw dataset, they just get no column.
pub const DEPARTMENT_COLUMNS: [&str; 7] = [
    "CES ELECTRICAL",
    "CIVIL",
    "FIRE",
    "HSEF",
    "INSTRUMENTATION",
    "MECHANICAL",
    "PROCESS",
];

/// Plants offered by the plantwise summary selector, in display order.
pub const PLANT_OPTIONS: [&str; 12] = [
    "CPP",
    "HDPE",
    "HSEF",
    "IOP ECR",
    "IOP NCR",
    "IOP SCR",
    "LLDPE",
    "NCAU",
    "NCU",
    "IOP BAGGING",
    "OTHERS",
    "PP",
];

/// Maps a responsibility-areas value to its canonical area label.
///
/// Matching is case-insensitive over the trimmed input; missing input is the
/// empty string and falls through to [`AREA_OTHERS`].
pub fn map_area(responsibility_areas: &str) -> &'static str {
    let value = responsibility_areas.trim().to_uppercase();
    if value.starts_with("CPP") || value.starts_with("POWER PLANT") {
        AREA_CPP
    } else if value.starts_with("NCU")
        || value.starts_with("CCR")
        || value.contains("CCR(SAFETY DISTRICT-2)")
    {
        AREA_NCU
    } else if value.starts_with("PP") {
        AREA_PP
    } else {
        AREA_OTHERS
    }
}
