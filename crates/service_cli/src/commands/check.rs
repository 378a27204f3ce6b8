//! Check command implementation
//!
//! Compiles a payoff expression without pricing anything, so users can
//! validate expressions before a long simulation.

use adapter_payoff::{annotate_source, ALLOWED_FUNCTIONS};
use serde::Serialize;
use tracing::info;

use crate::output::{emit, OutputFormat, Report};
use crate::Result;

/// Output of the check command.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub expression: String,
    /// True if the expression never reads `path`.
    pub constant: bool,
}

impl Report for CheckReport {
    fn table(&self) -> String {
        let mut out = format!("OK: {}", self.expression);
        if self.constant {
            out.push_str("\nnote: expression does not depend on the path");
        }
        out
    }
}

/// Compiles `expression`.
pub fn execute(expression: &str) -> Result<CheckReport> {
    let payoff = adapter_payoff::compile(expression)?;
    Ok(CheckReport {
        expression: payoff.source().to_string(),
        constant: payoff.is_constant(),
    })
}

/// Run the check command
pub fn run(expression: &str, format: OutputFormat) -> Result<()> {
    info!(expression, "checking payoff expression");
    match execute(expression) {
        Ok(report) => emit(&report, format),
        Err(err) => {
            if let crate::CliError::Expression(inner) = &err {
                eprintln!("{}", annotate_source(expression, inner.span()));
                eprintln!("available functions: {}", ALLOWED_FUNCTIONS.join(", "));
            }
            Err(err)
        }
    }
}
