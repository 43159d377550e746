//! Column catalogue of the sub-division census table.
//!
//! Every column name appears exactly once here. Measure selection goes
//! through the enumerated keys below instead of assembling column names
//! from strings at runtime, so an invalid measure/area/sex combination
//! cannot be expressed.

pub const PROVINCE: &str = "PROVINCE";
pub const DIVISION: &str = "DIVISION";
pub const DISTRICT: &str = "DISTRICT";
pub const SUB_DIVISION: &str = "SUB DIVISION";

pub const ALL_SEXES_RURAL: &str = "ALL SEXES (RURAL)";
pub const ALL_SEXES_URBAN: &str = "ALL SEXES (URBAN)";
pub const MALE_RURAL: &str = "MALE (RURAL)";
pub const MALE_URBAN: &str = "MALE (URBAN)";
pub const FEMALE_RURAL: &str = "FEMALE (RURAL)";
pub const FEMALE_URBAN: &str = "FEMALE (URBAN)";
pub const TRANSGENDER_RURAL: &str = "TRANSGENDER (RURAL)";
pub const TRANSGENDER_URBAN: &str = "TRANSGENDER (URBAN)";
pub const GROWTH_RATE_RURAL: &str = "ANNUAL GROWTH RATE (RURAL)";
pub const GROWTH_RATE_URBAN: &str = "ANNUAL GROWTH RATE (URBAN)";
pub const HOUSEHOLD_SIZE_RURAL: &str = "AVG HOUSEHOLD SIZE (RURAL)";
pub const HOUSEHOLD_SIZE_URBAN: &str = "AVG HOUSEHOLD SIZE (URBAN)";

/// Derived per-row column, never present in the source file.
pub const TOTAL_POPULATION: &str = "TOTAL POPULATION";

/// Columns coerced to Float64 at load; a row with a null in any of them
/// after coercion is dropped entirely.
pub const NUMERIC_COLUMNS: [&str; 12] = [
    ALL_SEXES_RURAL,
    ALL_SEXES_URBAN,
    MALE_RURAL,
    MALE_URBAN,
    FEMALE_RURAL,
    FEMALE_URBAN,
    TRANSGENDER_RURAL,
    TRANSGENDER_URBAN,
    GROWTH_RATE_RURAL,
    GROWTH_RATE_URBAN,
    HOUSEHOLD_SIZE_RURAL,
    HOUSEHOLD_SIZE_URBAN,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Rural,
    Urban,
}

impl Area {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rural" => Some(Area::Rural),
            "urban" => Some(Area::Urban),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Area::Rural => "Rural",
            Area::Urban => "Urban",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    AllSexes,
    Male,
    Female,
    Transgender,
}

/// Enumerated measure key. Each variant maps to exactly one column of the
/// cleaned table; [`Measure::TotalPopulation`] maps to the derived column
/// added by the filter core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    HeadCount(Sex, Area),
    GrowthRate(Area),
    HouseholdSize(Area),
    TotalPopulation,
}

impl Measure {
    pub fn column_name(&self) -> &'static str {
        match self {
            Measure::HeadCount(Sex::AllSexes, Area::Rural) => ALL_SEXES_RURAL,
            Measure::HeadCount(Sex::AllSexes, Area::Urban) => ALL_SEXES_URBAN,
            Measure::HeadCount(Sex::Male, Area::Rural) => MALE_RURAL,
            Measure::HeadCount(Sex::Male, Area::Urban) => MALE_URBAN,
            Measure::HeadCount(Sex::Female, Area::Rural) => FEMALE_RURAL,
            Measure::HeadCount(Sex::Female, Area::Urban) => FEMALE_URBAN,
            Measure::HeadCount(Sex::Transgender, Area::Rural) => TRANSGENDER_RURAL,
            Measure::HeadCount(Sex::Transgender, Area::Urban) => TRANSGENDER_URBAN,
            Measure::GrowthRate(Area::Rural) => GROWTH_RATE_RURAL,
            Measure::GrowthRate(Area::Urban) => GROWTH_RATE_URBAN,
            Measure::HouseholdSize(Area::Rural) => HOUSEHOLD_SIZE_RURAL,
            Measure::HouseholdSize(Area::Urban) => HOUSEHOLD_SIZE_URBAN,
            Measure::TotalPopulation => TOTAL_POPULATION,
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, Measure::TotalPopulation)
    }
}
