use crate::shadow::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "feedTitle")]
    pub feed_title: String,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ImportSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(rename = "barSlots")]
    pub bar_slots: Option<u32>,
    #[serde(rename = "onEachSide")]
    pub on_each_side: Option<u32>,
    #[serde(rename = "perPage")]
    pub per_page: Option<usize>,
    #[serde(rename = "forSymbol")]
    pub for_symbol: Option<String>,
    #[serde(rename = "againstSymbol")]
    pub against_symbol: Option<String>,
    #[serde(rename = "abstainSymbol")]
    pub abstain_symbol: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "importSources")]
    pub import_sources: Vec<ImportSource>,
    pub display: Option<DisplaySettings>,
    /// The dimensions of the breakdown of the shadow votes.
    pub demographics: Option<Vec<String>>,
}

/// Options given on the command line. They take precedence over the
/// configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DisplayOverrides {
    pub page: Option<u32>,
    pub on_each_side: Option<u32>,
    pub bar_slots: Option<u32>,
}

impl ReportConfig {
    pub const DEFAULT_DEMOGRAPHICS: [&'static str; 3] = ["age", "gender", "region"];

    pub fn demographics(&self) -> Vec<String> {
        match &self.demographics {
            Some(dims) => dims.clone(),
            None => ReportConfig::DEFAULT_DEMOGRAPHICS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn display_rules(&self, overrides: &DisplayOverrides) -> DisplayRules {
        let settings = self.display.clone().unwrap_or_default();
        let default_style = BarStyle::default();
        DisplayRules {
            bar_slots: overrides
                .bar_slots
                .or(settings.bar_slots)
                .unwrap_or(DisplayRules::DEFAULT_BAR_SLOTS),
            on_each_side: overrides
                .on_each_side
                .or(settings.on_each_side)
                .unwrap_or(DisplayRules::DEFAULT_ON_EACH_SIDE),
            per_page: settings.per_page.unwrap_or(DisplayRules::DEFAULT_PER_PAGE),
            bar_style: BarStyle {
                for_symbol: settings.for_symbol.unwrap_or(default_style.for_symbol),
                against_symbol: settings
                    .against_symbol
                    .unwrap_or(default_style.against_symbol),
                abstain_symbol: settings
                    .abstain_symbol
                    .unwrap_or(default_style.abstain_symbol),
            },
        }
    }
}

pub fn read_config(path: &str) -> SResult<ReportConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> SResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
