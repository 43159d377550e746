use polars::prelude::*;

fn main() {
    let path = "sub-division_population_of_pakistan.csv";
    let q = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .unwrap()
        .select(vec![
            col("PROVINCE"),
            col("ALL SEXES (RURAL)"),
            col("ALL SEXES (URBAN)"),
        ])
        .group_by(vec![col("PROVINCE")])
        .agg([col("*").sum()]);

    let df = q.collect().unwrap();

    println!("{}", df)
}
