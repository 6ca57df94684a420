// src/domain/plant.rs
//
// The plantwise summary. CPP, NCU and PP have their own inclusion rules
// (CPP absorbs Power Plant areas, NCU absorbs CCR areas, PP matches on
// prefix only so it never swallows CPP); every other plant is a plain
// case-insensitive substring match against Responsibility Areas.

use crate::domain::area::{AREA_CPP, AREA_NCU, AREA_PP};
use crate::domain::record::PermitRecord;
use std::collections::BTreeMap;

pub const PLANT_AREA_HEADER: &str = "RESPONSIBILITY AREA";
pub const PLANT_DEPT_HEADER: &str = "DEPARTMENT";
pub const PLANT_COUNT_HEADER: &str = "Permit Count";
pub const PLANT_TOTAL_LABEL: &str = "TOTAL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantRow {
    pub area: String,
    pub department: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantSummary {
    /// Sorted by (area, department); the TOTAL row is separate.
    pub rows: Vec<PlantRow>,
    pub total: u64,
}

/// Whether a record belongs to `plant`, per the plant's inclusion rule.
/// Matching is case-insensitive over the trimmed responsibility areas.
pub fn matches_plant(plant: &str, responsibility_areas: &str) -> bool {
    let value = responsibility_areas.trim().to_uppercase();
    match plant {
        "CPP" => value.starts_with("CPP") || value.starts_with("POWER PLANT"),
        "NCU" => {
            value.starts_with("NCU")
                || value.starts_with("CCR")
                || value.contains("CCR(SAFETY DISTRICT-2)")
        }
        // Prefix only: "IOP PP2" must not count as PP.
        "PP" => value.starts_with("PP"),
        _ => value.contains(&plant.trim().to_uppercase()),
    }
}

/// Area label every matched record is relabeled with.
pub fn plant_display_area(plant: &str) -> String {
    match plant {
        "CPP" => AREA_CPP.to_string(),
        "NCU" => AREA_NCU.to_string(),
        "PP" => AREA_PP.to_string(),
        other => other.to_string(),
    }
}

/// Builds the plantwise summary over the working subset, or `None` when no
/// record matches (an empty result, not an error). Departments group on
/// their trimmed upper-cased form, like the custom summary table.
pub fn build_plant_summary(records: &[PermitRecord], plant: &str) -> Option<PlantSummary> {
    let area = plant_display_area(plant);
    let mut groups: BTreeMap<(String, String), u64> = BTreeMap::new();
    for record in records {
        if matches_plant(plant, &record.responsibility_areas) {
            let key = (area.clone(), record.department.trim().to_uppercase());
            *groups.entry(key).or_default() += 1;
        }
    }
    if groups.is_empty() {
        return None;
    }

    let rows: Vec<PlantRow> = groups
        .into_iter()
        .map(|((area, department), count)| PlantRow {
            area,
            department,
            count,
        })
        .collect();
    let total = rows.iter().map(|r| r.count).sum();

    Some(PlantSummary { rows, total })
}
