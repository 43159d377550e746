use crate::columns::{self, Measure};
use log::debug;
use polars::prelude::*;

/// Hierarchy level a view groups by. One output row per distinct key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLevel {
    Province,
    Division,
    District,
    SubDivision,
}

impl GroupLevel {
    pub fn column_name(&self) -> &'static str {
        match self {
            GroupLevel::Province => columns::PROVINCE,
            GroupLevel::Division => columns::DIVISION,
            GroupLevel::District => columns::DISTRICT,
            GroupLevel::SubDivision => columns::SUB_DIVISION,
        }
    }
}

/// Ordered, dependent hierarchy filter. A division only makes sense under a
/// province, a district only under a division; callers are expected to draw
/// values from the candidate lists below, the way the dropdowns did.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub province: Option<String>,
    pub division: Option<String>,
    pub district: Option<String>,
}

impl Selection {
    pub fn predicate(&self) -> Expr {
        let mut filter_expr = lit(true);
        if let Some(province) = &self.province {
            filter_expr = filter_expr.and(col(columns::PROVINCE).eq(lit(province.as_str())));
        }
        if let Some(division) = &self.division {
            filter_expr = filter_expr.and(col(columns::DIVISION).eq(lit(division.as_str())));
        }
        if let Some(district) = &self.district {
            filter_expr = filter_expr.and(col(columns::DISTRICT).eq(lit(district.as_str())));
        }
        filter_expr
    }

    /// Ungrouped rows matching every non-null filter.
    pub fn apply(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        df.clone().lazy().filter(self.predicate()).collect()
    }

    /// Hierarchy level one below the deepest filter set. Aggregate views
    /// group by this unless they name a level themselves.
    pub fn child_level(&self) -> GroupLevel {
        if self.district.is_some() {
            GroupLevel::SubDivision
        } else if self.division.is_some() {
            GroupLevel::District
        } else if self.province.is_some() {
            GroupLevel::Division
        } else {
            GroupLevel::Province
        }
    }

    pub fn depth(&self) -> usize {
        [&self.province, &self.division, &self.district]
            .iter()
            .filter(|level| level.is_some())
            .count()
    }
}

/// Filter the dataset by `selection`, derive TOTAL POPULATION when asked
/// for, then group by `level` and sum each measure column per group.
///
/// Zero matching rows yield an empty frame, not an error; the renderer is
/// responsible for showing a neutral state. Output is sorted by the group
/// key purely for stable presentation.
pub fn filter_and_aggregate(
    df: &DataFrame,
    selection: &Selection,
    level: GroupLevel,
    measures: &[Measure],
) -> PolarsResult<DataFrame> {
    debug!("filter {:?}, group by {:?}", selection, level);

    let mut q = df.clone().lazy().filter(selection.predicate());
    if measures.iter().any(Measure::is_derived) {
        q = q.with_column(
            (col(columns::ALL_SEXES_RURAL) + col(columns::ALL_SEXES_URBAN))
                .alias(columns::TOTAL_POPULATION),
        );
    }

    let sums: Vec<Expr> = measures
        .iter()
        .map(|measure| col(measure.column_name()).sum())
        .collect();

    q.group_by([col(level.column_name())])
        .agg(sums)
        .sort([level.column_name()], SortMultipleOptions::default())
        .collect()
}

/// Distinct provinces of the whole dataset.
pub fn provinces(df: &DataFrame) -> PolarsResult<Vec<String>> {
    distinct_values(df, &Selection::default(), columns::PROVINCE)
}

/// Distinct divisions within one province.
pub fn divisions(df: &DataFrame, province: &str) -> PolarsResult<Vec<String>> {
    let selection = Selection {
        province: Some(province.to_string()),
        ..Default::default()
    };
    distinct_values(df, &selection, columns::DIVISION)
}

/// Distinct districts within one (province, division) pair.
pub fn districts(df: &DataFrame, province: &str, division: &str) -> PolarsResult<Vec<String>> {
    let selection = Selection {
        province: Some(province.to_string()),
        division: Some(division.to_string()),
        ..Default::default()
    };
    distinct_values(df, &selection, columns::DISTRICT)
}

fn distinct_values(
    df: &DataFrame,
    selection: &Selection,
    column: &str,
) -> PolarsResult<Vec<String>> {
    let narrowed = df
        .clone()
        .lazy()
        .filter(selection.predicate())
        .select([col(column).unique_stable()])
        .collect()?;
    let values = narrowed
        .column(column)?
        .str()?
        .into_no_null_iter()
        .map(str::to_string)
        .collect();
    Ok(values)
}
