use crate::columns::{self, Area, Measure, Sex};
use crate::filter::{self, GroupLevel, Selection};
use log::info;
use polars::prelude::*;

/// Standardized label column of every view table; the remaining columns are
/// the value series, one per measure, under their catalogue names.
pub const LABEL: &str = "label";

/// The twelve fixed pages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    PopulationDistribution,
    GenderRatio,
    DivisionGenderRatio,
    GrowthRate,
    UrbanRural,
    Transgender,
    DivisionHouseholdSize,
    HouseholdSize,
    DistrictInsights,
    DivisionInsights,
    ProvinceInsights,
}

pub const PAGES: [&str; 12] = [
    "home",
    "population-distribution",
    "gender-ratio",
    "division-gender-ratio",
    "growth-rate",
    "urban-rural",
    "transgender",
    "division-household-size",
    "household-size",
    "district-insights",
    "division-insights",
    "province-insights",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderChoice {
    Male,
    Female,
    Comparison,
}

impl GenderChoice {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "male" => Some(GenderChoice::Male),
            "female" => Some(GenderChoice::Female),
            "comparison" => Some(GenderChoice::Comparison),
            _ => None,
        }
    }
}

/// Everything a page needs besides the dataset itself.
#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub selection: Selection,
    pub area: Area,
    pub gender: GenderChoice,
}

/// A built view: title, a table with a `label` column plus one numeric
/// column per series, and the series names in chart order.
#[derive(Debug, Clone)]
pub struct View {
    pub title: String,
    pub table: DataFrame,
    pub series: Vec<String>,
}

impl Page {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "home" => Some(Page::Home),
            "population-distribution" => Some(Page::PopulationDistribution),
            "gender-ratio" => Some(Page::GenderRatio),
            "division-gender-ratio" => Some(Page::DivisionGenderRatio),
            "growth-rate" => Some(Page::GrowthRate),
            "urban-rural" => Some(Page::UrbanRural),
            "transgender" => Some(Page::Transgender),
            "division-household-size" => Some(Page::DivisionHouseholdSize),
            "household-size" => Some(Page::HouseholdSize),
            "district-insights" => Some(Page::DistrictInsights),
            "division-insights" => Some(Page::DivisionInsights),
            "province-insights" => Some(Page::ProvinceInsights),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::PopulationDistribution => "population-distribution",
            Page::GenderRatio => "gender-ratio",
            Page::DivisionGenderRatio => "division-gender-ratio",
            Page::GrowthRate => "growth-rate",
            Page::UrbanRural => "urban-rural",
            Page::Transgender => "transgender",
            Page::DivisionHouseholdSize => "division-household-size",
            Page::HouseholdSize => "household-size",
            Page::DistrictInsights => "district-insights",
            Page::DivisionInsights => "division-insights",
            Page::ProvinceInsights => "province-insights",
        }
    }

    /// How many hierarchy levels the page needs filled in, top down.
    pub fn required_depth(&self) -> usize {
        match self {
            Page::Home => 0,
            Page::PopulationDistribution
            | Page::GenderRatio
            | Page::GrowthRate
            | Page::UrbanRural
            | Page::Transgender
            | Page::HouseholdSize
            | Page::ProvinceInsights => 1,
            Page::DivisionGenderRatio | Page::DivisionHouseholdSize | Page::DivisionInsights => 2,
            Page::DistrictInsights => 3,
        }
    }

    pub fn build(&self, df: &DataFrame, req: &ViewRequest) -> PolarsResult<View> {
        let place = place_name(&req.selection);
        match self {
            Page::Home => {
                let (rural, urban) = grand_totals(df)?;
                info!(
                    "total rural population: {:.0}, urban: {:.0}, overall: {:.0}",
                    rural,
                    urban,
                    rural + urban
                );
                build_figure(
                    df,
                    &req.selection,
                    GroupLevel::Province,
                    &[Measure::TotalPopulation],
                    "Total Population by Province".to_string(),
                )
            }
            Page::PopulationDistribution => build_figure(
                df,
                &req.selection,
                GroupLevel::District,
                &[Measure::TotalPopulation],
                format!("Population Distribution in {}", place),
            ),
            Page::GenderRatio | Page::DivisionGenderRatio => {
                let area = req.area;
                let (measures, title): (Vec<Measure>, String) = match req.gender {
                    GenderChoice::Male => (
                        vec![Measure::HeadCount(Sex::Male, area)],
                        format!("{} Male Population in {}", area.label(), place),
                    ),
                    GenderChoice::Female => (
                        vec![Measure::HeadCount(Sex::Female, area)],
                        format!("{} Female Population in {}", area.label(), place),
                    ),
                    GenderChoice::Comparison => (
                        vec![
                            Measure::HeadCount(Sex::Male, area),
                            Measure::HeadCount(Sex::Female, area),
                        ],
                        format!("{} Male vs Female Population in {}", area.label(), place),
                    ),
                };
                build_figure(df, &req.selection, GroupLevel::District, &measures, title)
            }
            Page::GrowthRate => build_figure(
                df,
                &req.selection,
                GroupLevel::District,
                &[Measure::GrowthRate(req.area)],
                format!("{} Annual Growth Rate in {}", req.area.label(), place),
            ),
            Page::UrbanRural => build_figure(
                df,
                &req.selection,
                GroupLevel::District,
                &[
                    Measure::HeadCount(Sex::AllSexes, Area::Urban),
                    Measure::HeadCount(Sex::AllSexes, Area::Rural),
                ],
                format!("Urban vs Rural Population in {}", place),
            ),
            Page::Transgender => build_figure(
                df,
                &req.selection,
                GroupLevel::District,
                &[
                    Measure::HeadCount(Sex::Transgender, Area::Rural),
                    Measure::HeadCount(Sex::Transgender, Area::Urban),
                ],
                format!("Transgender Population in {}", place),
            ),
            Page::DivisionHouseholdSize | Page::HouseholdSize => build_figure(
                df,
                &req.selection,
                GroupLevel::District,
                &[
                    Measure::HouseholdSize(Area::Rural),
                    Measure::HouseholdSize(Area::Urban),
                ],
                format!("Average Household Size in {}", place),
            ),
            Page::DistrictInsights => build_figure(
                df,
                &req.selection,
                GroupLevel::SubDivision,
                &[Measure::TotalPopulation],
                format!("Total Population in {}", place),
            ),
            Page::DivisionInsights => build_figure(
                df,
                &req.selection,
                GroupLevel::District,
                &[Measure::TotalPopulation],
                format!("Total Population in {}", place),
            ),
            Page::ProvinceInsights => build_figure(
                df,
                &req.selection,
                GroupLevel::Division,
                &[Measure::TotalPopulation],
                format!("Total Population in {}", place),
            ),
        }
    }
}

/// Dataset-wide (rural, urban) population sums.
pub fn grand_totals(df: &DataFrame) -> PolarsResult<(f64, f64)> {
    let rural = df
        .column(columns::ALL_SEXES_RURAL)?
        .f64()?
        .sum()
        .unwrap_or(0.0);
    let urban = df
        .column(columns::ALL_SEXES_URBAN)?
        .f64()?
        .sum()
        .unwrap_or(0.0);
    Ok((rural, urban))
}

fn build_figure(
    df: &DataFrame,
    selection: &Selection,
    level: GroupLevel,
    measures: &[Measure],
    title: String,
) -> PolarsResult<View> {
    let mut table = filter::filter_and_aggregate(df, selection, level, measures)?;
    table.rename(level.column_name(), LABEL)?;
    Ok(View {
        title,
        table,
        series: measures
            .iter()
            .map(|measure| measure.column_name().to_string())
            .collect(),
    })
}

fn place_name(selection: &Selection) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(district) = &selection.district {
        parts.push(district);
    }
    if let Some(division) = &selection.division {
        parts.push(division);
    }
    if let Some(province) = &selection.province {
        parts.push(province);
    }
    if parts.is_empty() {
        "Pakistan".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            columns::PROVINCE => ["Punjab", "Punjab", "Sindh"],
            columns::DIVISION => ["Lahore", "Lahore", "Karachi"],
            columns::DISTRICT => ["Lahore", "Kasur", "Karachi East"],
            columns::SUB_DIVISION => ["X", "Y", "Z"],
            columns::ALL_SEXES_RURAL => [100.0, 50.0, 10.0],
            columns::ALL_SEXES_URBAN => [200.0, 50.0, 40.0],
            columns::MALE_RURAL => [48.0, 24.0, 5.0],
            columns::MALE_URBAN => [98.0, 24.0, 20.0],
            columns::FEMALE_RURAL => [50.0, 25.0, 5.0],
            columns::FEMALE_URBAN => [100.0, 25.0, 19.0],
            columns::TRANSGENDER_RURAL => [2.0, 1.0, 0.0],
            columns::TRANSGENDER_URBAN => [2.0, 1.0, 1.0],
            columns::GROWTH_RATE_RURAL => [2.4, 2.1, 1.8],
            columns::GROWTH_RATE_URBAN => [1.9, 2.0, 2.2],
            columns::HOUSEHOLD_SIZE_RURAL => [6.5, 6.8, 5.9],
            columns::HOUSEHOLD_SIZE_URBAN => [6.1, 6.3, 5.5],
        )
        .unwrap()
    }

    fn punjab_request(gender: GenderChoice) -> ViewRequest {
        ViewRequest {
            selection: Selection {
                province: Some("Punjab".into()),
                ..Default::default()
            },
            area: Area::Rural,
            gender,
        }
    }

    #[test]
    fn page_names_round_trip() {
        for name in PAGES {
            let page = Page::from_str(name).unwrap();
            assert_eq!(page.as_str(), name);
        }
        assert!(Page::from_str("about").is_none());
    }

    #[test]
    fn home_groups_by_province() {
        let req = ViewRequest {
            selection: Selection::default(),
            area: Area::Rural,
            gender: GenderChoice::Comparison,
        };
        let view = Page::Home.build(&sample(), &req).unwrap();
        assert_eq!(view.series, vec![columns::TOTAL_POPULATION]);
        let labels: Vec<&str> = view
            .table
            .column(LABEL)
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(labels, vec!["Punjab", "Sindh"]);
        let totals: Vec<f64> = view
            .table
            .column(columns::TOTAL_POPULATION)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(totals, vec![400.0, 50.0]);
    }

    #[test]
    fn home_honors_supplied_filters() {
        let view = Page::Home
            .build(&sample(), &punjab_request(GenderChoice::Comparison))
            .unwrap();
        let labels: Vec<&str> = view
            .table
            .column(LABEL)
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(labels, vec!["Punjab"]);
        let totals: Vec<f64> = view
            .table
            .column(columns::TOTAL_POPULATION)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(totals, vec![400.0]);
    }

    #[test]
    fn gender_comparison_yields_two_series() {
        let view = Page::GenderRatio
            .build(&sample(), &punjab_request(GenderChoice::Comparison))
            .unwrap();
        assert_eq!(view.series, vec![columns::MALE_RURAL, columns::FEMALE_RURAL]);
        assert_eq!(view.table.height(), 2);
        assert!(view.title.contains("Male vs Female"));
    }

    #[test]
    fn district_insights_groups_sub_divisions() {
        let req = ViewRequest {
            selection: Selection {
                province: Some("Punjab".into()),
                division: Some("Lahore".into()),
                district: Some("Kasur".into()),
            },
            area: Area::Rural,
            gender: GenderChoice::Comparison,
        };
        let view = Page::DistrictInsights.build(&sample(), &req).unwrap();
        assert_eq!(view.table.height(), 1);
        assert_eq!(view.title, "Total Population in Kasur, Lahore, Punjab");
        let totals: Vec<f64> = view
            .table
            .column(columns::TOTAL_POPULATION)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(totals, vec![100.0]);
    }

    #[test]
    fn required_depth_matches_page_filters() {
        assert_eq!(Page::Home.required_depth(), 0);
        assert_eq!(Page::GrowthRate.required_depth(), 1);
        assert_eq!(Page::DivisionInsights.required_depth(), 2);
        assert_eq!(Page::DistrictInsights.required_depth(), 3);
    }

    #[test]
    fn grand_totals_sum_both_areas() {
        let (rural, urban) = grand_totals(&sample()).unwrap();
        assert_eq!(rural, 160.0);
        assert_eq!(urban, 290.0);
    }
}
