use census::columns::Area;
use census::dataset;
use census::filter::{self, Selection};
use census::views::{self, GenderChoice, Page, View, ViewRequest, LABEL};
use ui::data::{self, ChartKind, Figure, SliceRow};

use clap::builder::PossibleValuesParser;
use clap::Parser;
use csv::Writer;
use env_logger::Env;
use polars::prelude::*;
use std::process;
use std::{error::Error, fs::File, path::Path};

use log::{debug, error, info};

const DEFAULT_DATA_FILE: &str = "sub-division_population_of_pakistan.csv";
const CONFIG_FILE: &str = ".census-dash.yml";

/// 写入csv文件
///
/// # 参数
/// * `filename` - 文件名
/// * `header` - csv文件头
/// * `data` - csv文件数据
pub fn write_csv<P: AsRef<Path>>(
    filename: P,
    header: Vec<String>,
    data: Vec<Vec<String>>,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(&filename).unwrap();
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(header)?;

    for record in data {
        wtr.write_record(record)?;
    }
    wtr.flush()?;
    info!("CSV file written successfully: {:?}", filename.as_ref());

    Ok(())
}

enum OutputType {
    CSV,
    TABLE,
    POLAR,
    CHART,
}

impl OutputType {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(OutputType::CSV),
            "table" => Some(OutputType::TABLE),
            "polar" => Some(OutputType::POLAR),
            "chart" => Some(OutputType::CHART),
            _ => None,
        }
    }
}

trait Output {
    fn output(&self) -> Result<(), Box<dyn Error>>;
}

struct PolarOutput {
    df: DataFrame,
}

impl PolarOutput {
    fn new(df: DataFrame) -> Self {
        PolarOutput { df }
    }
}

impl Output for PolarOutput {
    fn output(&self) -> Result<(), Box<dyn Error>> {
        println!("{}", self.df);
        Ok(())
    }
}

struct CsvOutput {
    filename: String,
    df: DataFrame,
}

impl CsvOutput {
    fn new(filename: String, df: DataFrame) -> Self {
        CsvOutput { filename, df }
    }
}

impl Output for CsvOutput {
    fn output(&self) -> Result<(), Box<dyn Error>> {
        let mut file = std::fs::File::create(&self.filename).unwrap();
        let mut m_df = self.df.clone();
        Ok(CsvWriter::new(&mut file).finish(&mut m_df).unwrap())
    }
}

struct SeriesCsvOutput {
    filename: String,
    figure: Figure,
}

impl SeriesCsvOutput {
    fn new(filename: String, figure: Figure) -> Self {
        SeriesCsvOutput { filename, figure }
    }
}

impl Output for SeriesCsvOutput {
    fn output(&self) -> Result<(), Box<dyn Error>> {
        let mut header = vec![LABEL.to_string()];
        header.extend(self.figure.series.iter().cloned());
        let rows = self
            .figure
            .rows
            .iter()
            .map(|row| {
                let mut record = vec![row.label.clone()];
                record.extend(row.values.iter().map(|value| data::format_value(*value)));
                record
            })
            .collect();
        write_csv(&self.filename, header, rows)
    }
}

struct ChartOutput {
    figure: Figure,
}

impl ChartOutput {
    fn new(figure: Figure) -> Self {
        ChartOutput { figure }
    }
}

impl Output for ChartOutput {
    fn output(&self) -> Result<(), Box<dyn Error>> {
        ui::tui::run(self.figure.clone())
    }
}

struct TableOutput {
    figure: Figure,
}

impl TableOutput {
    fn new(figure: Figure) -> Self {
        TableOutput { figure }
    }
}

impl Output for TableOutput {
    fn output(&self) -> Result<(), Box<dyn Error>> {
        ui::tui::run_table(self.figure.clone())
    }
}

/// Explore the 2017 Pakistan census at sub-division granularity
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long = "data", help = "census csv file, overrides the config file")]
    data: Option<String>,

    #[arg(
        long = "page",
        value_parser = PossibleValuesParser::new(views::PAGES),
        help = "view to build, defaults to the configured page or home"
    )]
    page: Option<String>,

    #[arg(long = "province", help = "province filter")]
    province: Option<String>,

    #[arg(long = "division", help = "division filter, needs --province")]
    division: Option<String>,

    #[arg(long = "district", help = "district filter, needs --division")]
    district: Option<String>,

    #[arg(
        long = "area",
        value_parser = PossibleValuesParser::new(["rural", "urban"]),
        default_value = "rural",
        help = "area type for the gender and growth pages"
    )]
    area: String,

    #[arg(
        long = "gender",
        value_parser = PossibleValuesParser::new(["male", "female", "comparison"]),
        default_value = "comparison",
        help = "gender choice for the gender-ratio pages"
    )]
    gender: String,

    #[arg(
        long = "chart",
        value_parser = PossibleValuesParser::new(["bar", "pie"]),
        help = "chart kind, defaults to the configured kind or bar"
    )]
    chart: Option<String>,

    #[arg(
        short = 'F',
        long = "format",
        value_parser = PossibleValuesParser::new(["polar", "csv", "table", "chart"]),
        default_value = "polar",
        help = "output format"
    )]
    format: String,

    #[arg(
        long = "list",
        value_parser = PossibleValuesParser::new(["provinces", "divisions", "districts"]),
        help = "print candidate values for a filter level and exit"
    )]
    list: Option<String>,

    #[arg(
        long = "export",
        help = "write filtered detail rows as csv, e.g. --export detail.csv"
    )]
    export: Option<String>,
}

fn get_output(output_type: OutputType, view: &View, figure: Figure) -> Box<dyn Output> {
    match output_type {
        OutputType::POLAR => Box::new(PolarOutput::new(view.table.clone())),
        OutputType::CSV => Box::new(SeriesCsvOutput::new(String::from("report.csv"), figure)),
        OutputType::TABLE => Box::new(TableOutput::new(figure)),
        OutputType::CHART => Box::new(ChartOutput::new(figure)),
    }
}

fn convert_view_to_figure(view: &View, kind: ChartKind) -> Figure {
    let mut d = view.table.clone();

    let mut j = Vec::<u8>::new();
    JsonWriter::new(&mut j)
        .with_json_format(JsonFormat::Json)
        .finish(&mut d)
        .unwrap();
    let raw = serde_json::from_slice::<Vec<serde_json::Value>>(&j).unwrap();

    let rows = raw
        .iter()
        .map(|row| SliceRow {
            label: row[LABEL].as_str().unwrap_or("").to_string(),
            values: view
                .series
                .iter()
                .map(|name| row[name.as_str()].as_f64().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    Figure {
        title: view.title.clone(),
        series: view.series.clone(),
        rows,
        kind,
    }
}

/// The selection UI contract: every supplied value must come from the
/// candidate list narrowed by the levels above it, so the filter core never
/// sees a stale combination.
fn build_selection(df: &DataFrame, args: &Args) -> Selection {
    let selection = Selection {
        province: args.province.clone(),
        division: args.division.clone(),
        district: args.district.clone(),
    };

    if selection.province.is_none()
        && (selection.division.is_some() || selection.district.is_some())
    {
        error!("--division and --district need --province");
        process::exit(1);
    }
    if selection.division.is_none() && selection.district.is_some() {
        error!("--district needs --division");
        process::exit(1);
    }

    if let Some(province) = &selection.province {
        let known = filter::provinces(df).expect("province query failed");
        if !known.contains(province) {
            error!("unknown province: {} (try --list provinces)", province);
            process::exit(1);
        }
    }
    if let Some(division) = &selection.division {
        let province = selection.province.as_ref().unwrap();
        let known = filter::divisions(df, province).expect("division query failed");
        if !known.contains(division) {
            error!(
                "division {} is not in province {} (try --list divisions)",
                division, province
            );
            process::exit(1);
        }
    }
    if let Some(district) = &selection.district {
        let province = selection.province.as_ref().unwrap();
        let division = selection.division.as_ref().unwrap();
        let known = filter::districts(df, province, division).expect("district query failed");
        if !known.contains(district) {
            error!(
                "district {} is not in division {} (try --list districts)",
                district, division
            );
            process::exit(1);
        }
    }

    selection
}

fn list_candidates(df: &DataFrame, level: &str, args: &Args) {
    let values = match level {
        "provinces" => filter::provinces(df),
        "divisions" => match &args.province {
            Some(province) => filter::divisions(df, province),
            None => {
                error!("--list divisions needs --province");
                process::exit(1);
            }
        },
        "districts" => match (&args.province, &args.division) {
            (Some(province), Some(division)) => filter::districts(df, province, division),
            _ => {
                error!("--list districts needs --province and --division");
                process::exit(1);
            }
        },
        _ => unreachable!("clap rejects other levels"),
    }
    .expect("candidate query failed");

    for value in values {
        println!("{}", value);
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let conf = config::Config::load(CONFIG_FILE);

    let data_file = args
        .data
        .clone()
        .or(conf.data_file.clone())
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
    let df = dataset::load(&data_file).expect("dataset load failed");
    info!("dataset ready: {} rows from {}", df.height(), data_file);

    if let Some(level) = &args.list {
        list_candidates(&df, level, &args);
        return;
    }

    let selection = build_selection(&df, &args);

    let page_name = args
        .page
        .clone()
        .or(conf.default_page.clone())
        .unwrap_or_else(|| "home".to_string());
    let page = match Page::from_str(&page_name) {
        Some(page) => page,
        None => {
            error!("unknown page: {}", page_name);
            process::exit(1);
        }
    };
    if selection.depth() < page.required_depth() {
        error!(
            "page {} needs {} filter level(s), got {}",
            page.as_str(),
            page.required_depth(),
            selection.depth()
        );
        process::exit(1);
    }

    let area = Area::from_str(&args.area).unwrap();
    let gender = GenderChoice::from_str(&args.gender).unwrap();
    let request = ViewRequest {
        selection: selection.clone(),
        area,
        gender,
    };
    debug!("view request: {:?}", request);

    let view = page.build(&df, &request).expect("view build failed");
    if view.table.height() == 0 {
        info!("selection matched no rows");
    }

    if let Some(export) = args.export.clone() {
        let detail = selection.apply(&df).expect("detail filter failed");
        info!("detail csv file: {}", export);
        CsvOutput::new(export, detail)
            .output()
            .expect("detail csv output failed");
    }

    let chart_name = args
        .chart
        .clone()
        .or(conf.chart.clone())
        .unwrap_or_else(|| "bar".to_string());
    let kind = match ChartKind::from_str(&chart_name) {
        Some(kind) => kind,
        None => {
            error!("unknown chart kind: {}", chart_name);
            process::exit(1);
        }
    };
    let figure = convert_view_to_figure(&view, kind);

    let out_type = OutputType::from_str(args.format.as_str()).unwrap();
    get_output(out_type, &view, figure)
        .output()
        .expect("output failed");
}
