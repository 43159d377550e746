use crate::columns;
use log::info;
use polars::prelude::*;

/// 读取csv文件并清洗
///
/// Reads the census csv without schema inference (every column comes in as a
/// string) and runs [`clean`] on the result. The dataset is loaded once per
/// process and treated as read-only afterwards; callers pass it around by
/// reference.
pub fn load(path: &str) -> PolarsResult<DataFrame> {
    let raw = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;
    clean(raw)
}

/// Coerce the numeric columns and drop malformed rows.
///
/// Each numeric column is cast to Float64 non-strictly, so an unparseable
/// value becomes null instead of an error. A row with a null in any numeric
/// column is then dropped entirely; there is no partial-field salvage, so a
/// row broken in one column is absent from every view, including views that
/// never touch that column. Running `clean` on already-clean data is a
/// no-op.
pub fn clean(df: DataFrame) -> PolarsResult<DataFrame> {
    let before = df.height();

    let casts: Vec<Expr> = columns::NUMERIC_COLUMNS
        .iter()
        .map(|name| col(*name).cast(DataType::Float64))
        .collect();
    let subset: Vec<Expr> = columns::NUMERIC_COLUMNS.iter().map(|name| col(*name)).collect();

    let cleaned = df.lazy().with_columns(casts).drop_nulls(Some(subset)).collect()?;

    info!(
        "dataset cleaned: {} rows in, {} rows kept",
        before,
        cleaned.height()
    );
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "PROVINCE,DIVISION,DISTRICT,SUB DIVISION,\
ALL SEXES (RURAL),ALL SEXES (URBAN),MALE (RURAL),MALE (URBAN),\
FEMALE (RURAL),FEMALE (URBAN),TRANSGENDER (RURAL),TRANSGENDER (URBAN),\
ANNUAL GROWTH RATE (RURAL),ANNUAL GROWTH RATE (URBAN),\
AVG HOUSEHOLD SIZE (RURAL),AVG HOUSEHOLD SIZE (URBAN)";

    fn read_raw(body: &str) -> DataFrame {
        let text = format!("{}\n{}", HEADER, body);
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(text))
            .finish()
            .unwrap()
    }

    fn good_row(sub_division: &str) -> String {
        format!(
            "Punjab,Lahore,Lahore,{},100,200,48,98,50,100,2,2,2.4,1.9,6.5,6.1",
            sub_division
        )
    }

    #[test]
    fn malformed_numeric_row_is_dropped() {
        let body = format!(
            "{}\nPunjab,Lahore,Kasur,Broken,100,200,48,98,50,100,2,2,n/a,1.9,6.5,6.1",
            good_row("Model Town")
        );
        let cleaned = clean(read_raw(&body)).unwrap();
        assert_eq!(cleaned.height(), 1);
        let subs: Vec<Option<&str>> = cleaned
            .column(columns::SUB_DIVISION)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(subs, vec![Some("Model Town")]);
    }

    #[test]
    fn missing_numeric_value_drops_row() {
        let body = format!(
            "{}\nPunjab,Lahore,Kasur,Hole,100,200,48,98,50,,2,2,2.4,1.9,6.5,6.1",
            good_row("Model Town")
        );
        let cleaned = clean(read_raw(&body)).unwrap();
        assert_eq!(cleaned.height(), 1);
    }

    #[test]
    fn malformed_row_is_absent_from_views_not_using_that_column() {
        use crate::columns::Measure;
        use crate::filter::{filter_and_aggregate, GroupLevel, Selection};

        // Growth rate is broken; the total-population view never reads it,
        // yet the row must still be gone.
        let body = format!(
            "{}\nPunjab,Lahore,Kasur,Broken,100,200,48,98,50,100,2,2,n/a,1.9,6.5,6.1",
            good_row("Model Town")
        );
        let cleaned = clean(read_raw(&body)).unwrap();
        let selection = Selection {
            province: Some("Punjab".to_string()),
            ..Default::default()
        };
        let view = filter_and_aggregate(
            &cleaned,
            &selection,
            GroupLevel::SubDivision,
            &[Measure::TotalPopulation],
        )
        .unwrap();
        let labels: Vec<&str> = view
            .column(columns::SUB_DIVISION)
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(labels, vec!["Model Town"]);
    }

    #[test]
    fn clean_is_idempotent() {
        let body = format!(
            "{}\n{}\nSindh,Karachi,Karachi East,Bad,x,200,48,98,50,100,2,2,2.4,1.9,6.5,6.1",
            good_row("Model Town"),
            good_row("Cantt")
        );
        let once = clean(read_raw(&body)).unwrap();
        let twice = clean(once.clone()).unwrap();
        assert_eq!(once.height(), 2);
        assert!(once.equals(&twice));
    }

    #[test]
    fn numeric_columns_are_float_after_clean() {
        let cleaned = clean(read_raw(&good_row("Model Town"))).unwrap();
        for name in columns::NUMERIC_COLUMNS {
            assert_eq!(
                cleaned.column(name).unwrap().dtype(),
                &DataType::Float64,
                "{} not coerced",
                name
            );
        }
    }
}
