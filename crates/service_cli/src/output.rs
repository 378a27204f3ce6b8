//! Report rendering for `--format table|json`.

use clap::ValueEnum;
use serde::Serialize;

use crate::Result;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable lines.
    #[default]
    Table,
    /// One pretty-printed JSON document.
    Json,
}

/// A command result that can be printed in either format.
pub trait Report: Serialize {
    /// Plain-text rendering, one line per entry.
    fn table(&self) -> String;
}

/// Renders `report` as a string in the requested format.
pub fn render<R: Report>(report: &R, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(report.table()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Prints `report` to stdout.
pub fn emit<R: Report>(report: &R, format: OutputFormat) -> Result<()> {
    println!("{}", render(report, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Price {
        value: f64,
    }

    impl Report for Price {
        fn table(&self) -> String {
            format!("Price: {:.4}", self.value)
        }
    }

    #[test]
    fn test_render_table_and_json() {
        let report = Price { value: 10.45058 };
        assert_eq!(render(&report, OutputFormat::Table).unwrap(), "Price: 10.4506");

        let json: serde_json::Value =
            serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["value"], 10.45058);
    }
}
