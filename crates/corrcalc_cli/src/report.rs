use anyhow::Result;
use clap::ValueEnum;
use corrcalc_core::{CorrelationResult, Number};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// f64 carries about 15 significant decimal digits.
const MAX_PRECISION: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per coefficient
    #[default]
    Text,
    /// A single JSON object
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: OutputFormat,
    /// Decimal places shown for each coefficient
    pub precision: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            precision: 8,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    first: &'a str,
    second: &'a str,
    observations: usize,
    pearson: f64,
    spearman: f64,
    kendall: f64,
    kendall_variant: &'static str,
}

pub fn render(result: &CorrelationResult, config: &ReportConfig) -> Result<String> {
    let places = config.precision.min(MAX_PRECISION);
    match config.format {
        OutputFormat::Text => {
            let mut text = format!(
                "Calculating statistics for {} and {}\n",
                result.label_x, result.label_y
            );
            for (name, value) in result.coefficients() {
                text.push_str(&format!(
                    "The {name} Coefficient is: {:.*}\n",
                    places as usize,
                    round_to(value, places)
                ));
            }
            Ok(text)
        }
        OutputFormat::Json => {
            let report = JsonReport {
                first: &result.label_x,
                second: &result.label_y,
                observations: result.observations,
                pearson: round_to(result.pearson, places),
                spearman: round_to(result.spearman, places),
                kendall: round_to(result.kendall, places),
                kendall_variant: result.kendall_variant.name(),
            };
            Ok(serde_json::to_string_pretty(&report)? + "\n")
        }
    }
}

pub fn write_report<W: Write>(mut out: W, result: &CorrelationResult, config: &ReportConfig) -> Result<()> {
    out.write_all(render(result, config)?.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn round_to(value: Number, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value.to_num::<f64>() * scale).round() / scale
}
