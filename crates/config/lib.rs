use serde::Deserialize;
use std::fs::File;

/// Optional dashboard settings from `.census-dash.yml`. Every key has a
/// built-in fallback so the file itself is optional.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub data_file: Option<String>,
    pub default_page: Option<String>,
    pub chart: Option<String>,
}

impl Config {
    /// Missing file means defaults; a present but broken file is a hard
    /// error.
    pub fn load(filename: &str) -> Config {
        match File::open(filename) {
            Ok(reader) => serde_yaml::from_reader(reader).unwrap(),
            Err(_) => Config::default(),
        }
    }
}
