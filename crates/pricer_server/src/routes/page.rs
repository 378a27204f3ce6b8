//! HTML rendering for the pricing form.
//!
//! Every value that came from the request goes through [`escape_html`]
//! before it is written into the page.

use std::fmt::Write as _;

use pricer_pricing::MonteCarloResult;

use super::form::PriceForm;

/// What to show under the form.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Priced(MonteCarloResult),
    Failed {
        message: String,
        /// Preformatted context, e.g. the expression with a caret under the error.
        detail: Option<String>,
    },
}

const HEAD: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Monte Carlo Option Pricer</title>
    <style>
      body { font-family: Arial, sans-serif; margin: 2rem auto; max-width: 960px; line-height: 1.5; }
      header { margin-bottom: 1.5rem; }
      form { background: #f8f9fa; padding: 1rem 1.5rem; border-radius: 8px; border: 1px solid #e1e5ea; }
      fieldset { border: none; padding: 0; margin-bottom: 1rem; }
      legend { font-weight: bold; margin-bottom: 0.5rem; }
      label { display: block; margin-top: 0.4rem; font-weight: 600; }
      input, select, textarea { width: 100%; padding: 0.5rem; font-size: 1rem; margin-top: 0.2rem; box-sizing: border-box; }
      textarea { resize: vertical; min-height: 60px; }
      .two-col { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; }
      .actions { margin-top: 1rem; }
      button { padding: 0.6rem 1rem; font-size: 1rem; cursor: pointer; }
      .result { margin-top: 1.5rem; padding: 1rem; background: #e8f5e9; border: 1px solid #c8e6c9; border-radius: 6px; }
      .error { margin-top: 1.5rem; padding: 1rem; background: #fdecea; border: 1px solid #f5c2c7; border-radius: 6px; color: #8a1c1c; }
      code { background: #eef; padding: 0.1rem 0.3rem; border-radius: 4px; }
    </style>
  </head>
  <body>
    <header>
      <h1>Monte Carlo Option Pricer</h1>
      <p>Simulate option payoffs using geometric Brownian motion paths.</p>
    </header>
"#;

const TAIL: &str = "  </body>\n</html>\n";

/// Escapes the five HTML-significant characters.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn number_input(out: &mut String, label: &str, name: &str, step: Option<&str>, value: &str, required: bool) {
    let step = step.map(|s| format!(r#" step="{}""#, s)).unwrap_or_default();
    let required = if required { " required" } else { "" };
    let _ = writeln!(
        out,
        r#"          <label>{label}
            <input type="number"{step} name="{name}" value="{value}"{required}>
          </label>"#,
        value = escape_html(value),
    );
}

fn payoff_option(out: &mut String, value: &str, label: &str, selected: &str) {
    let selected = if value == selected { " selected" } else { "" };
    let _ = writeln!(
        out,
        r#"              <option value="{value}"{selected}>{label}</option>"#
    );
}

/// Renders the full page with `form` echoed back into the inputs.
pub(crate) fn render(form: &PriceForm, outcome: Option<&Outcome>) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str(HEAD);

    out.push_str("    <form method=\"post\" action=\"/\">\n");
    out.push_str("      <fieldset>\n        <legend>Market parameters</legend>\n        <div class=\"two-col\">\n");
    number_input(&mut out, "Spot price", "spot", Some("0.01"), &form.spot, true);
    number_input(&mut out, "Strike price", "strike", Some("0.01"), &form.strike, true);
    number_input(&mut out, "Maturity (years)", "maturity", Some("0.01"), &form.maturity, true);
    number_input(&mut out, "Risk-free rate", "risk_free_rate", Some("0.001"), &form.risk_free_rate, true);
    number_input(&mut out, "Volatility", "volatility", Some("0.001"), &form.volatility, true);
    out.push_str("        </div>\n      </fieldset>\n\n");

    out.push_str("      <fieldset>\n        <legend>Simulation settings</legend>\n        <div class=\"two-col\">\n");
    number_input(&mut out, "Steps per path", "steps", None, &form.steps, true);
    number_input(&mut out, "Number of paths", "paths", None, &form.paths, true);
    number_input(&mut out, "Random seed (optional)", "seed", None, &form.seed, false);
    out.push_str("        </div>\n      </fieldset>\n\n");

    out.push_str("      <fieldset>\n        <legend>Payoff</legend>\n        <div class=\"two-col\">\n");
    out.push_str("          <label>Payoff type\n            <select name=\"payoff_mode\">\n");
    payoff_option(&mut out, "call", "European call (max(S_T - K, 0))", &form.payoff_mode);
    payoff_option(&mut out, "put", "European put (max(K - S_T, 0))", &form.payoff_mode);
    payoff_option(&mut out, "custom", "Custom expression", &form.payoff_mode);
    out.push_str("            </select>\n          </label>\n");
    let _ = writeln!(
        out,
        r#"          <label>Custom payoff expression (uses <code>path</code>)
            <textarea name="payoff_expr" placeholder="max(sum(path)/len(path) - 100, 0)">{}</textarea>
          </label>"#,
        escape_html(&form.payoff_expr)
    );
    out.push_str("        </div>\n");
    out.push_str(
        "        <p>Custom expressions can reference <code>path</code> (indexable, <code>path[-1]</code> is the last price), \
         <code>max</code>, <code>min</code>, <code>sum</code>, <code>len</code>, <code>abs</code>, <code>exp</code>, \
         <code>log</code>, <code>sqrt</code>, <code>pow</code>, <code>floor</code>, <code>ceil</code> \
         and the constants <code>pi</code> and <code>e</code>.</p>\n",
    );
    out.push_str("      </fieldset>\n\n");
    out.push_str("      <div class=\"actions\">\n        <button type=\"submit\">Run simulation</button>\n      </div>\n    </form>\n");

    match outcome {
        Some(Outcome::Priced(result)) => {
            let _ = writeln!(
                out,
                r#"
    <div class="result">
      <strong>Price:</strong> {:.4}<br>
      <strong>95% CI:</strong> ± {:.4}<br>
      <strong>Interval:</strong> [{:.4}, {:.4}]<br>
      <strong>Paths:</strong> {} (seed {})
    </div>"#,
                result.estimate,
                result.half_width(),
                result.ci_low,
                result.ci_high,
                result.n_paths,
                result.seed
            );
        }
        Some(Outcome::Failed { message, detail }) => {
            let _ = write!(
                out,
                "\n    <div class=\"error\">\n      <strong>Error:</strong> {}",
                escape_html(message)
            );
            if let Some(detail) = detail {
                let _ = write!(out, "\n      <pre>{}</pre>", escape_html(detail));
            }
            out.push_str("\n    </div>\n");
        }
        None => {}
    }

    out.push_str(TAIL);
    out
}
