//! Terminal output for the `catalog` binary.
//!
//! Human-readable lines go to stdout and diagnostics to stderr. In `--json`
//! mode only [`Output::emit`] and [`Output::error`] print anything.

use std::io::Write;

use anyhow::{Context as _, Result};
use catalog_engine::prelude::{FacetValue, Price};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Product table columns: liked marker, id, name, price.
const PRODUCT_COLUMNS: [usize; 4] = [1, 26, 32, 20];

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Report a failed command with its cause chain.
    pub fn error(&self, err: &anyhow::Error) {
        if self.json {
            eprintln!("{}", error_report(err));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(err).red());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {}", style("caused by:").dim(), cause);
        }
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Write `value` to stdout as pretty JSON.
    pub fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, value).context("Failed to write JSON output")?;
        writeln!(stdout)?;
        Ok(())
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    pub fn product_header(&self) {
        if self.json {
            return;
        }
        println!("  {}", style(product_line("", "ID", "NAME", "PRICE")).dim());
    }

    /// Print one product table row. `marker` is usually [`liked_marker`].
    pub fn product_row(&self, marker: &str, id: &str, name: &str, price: &str) {
        if self.json {
            return;
        }
        println!("  {}", product_line(marker, id, name, price));
    }

    /// Print a facet value with its count, ticking selected values.
    pub fn facet_value(&self, value: &FacetValue) {
        if self.json {
            return;
        }
        let mark = if value.selected {
            style("✓").green()
        } else {
            style("•").dim()
        };
        println!(
            "  {} {} {}",
            mark,
            value.value,
            style(format!("({})", value.count)).dim()
        );
    }

    /// Spinner shown while a backend call is pending. Hidden in JSON mode.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn product_line(marker: &str, id: &str, name: &str, price: &str) -> String {
    let [marker_w, id_w, name_w, price_w] = PRODUCT_COLUMNS;
    format!(
        "{:marker_w$}  {:id_w$}  {:name_w$}  {:price_w$}",
        marker,
        truncate(id, id_w),
        truncate(name, name_w),
        price,
    )
    .trim_end()
    .to_string()
}

/// JSON body printed for a failed command in `--json` mode.
pub fn error_report(err: &anyhow::Error) -> serde_json::Value {
    let causes: Vec<String> = err.chain().skip(1).map(|c| c.to_string()).collect();
    serde_json::json!({
        "error": err.to_string(),
        "causes": causes,
    })
}

/// Selling price, with the list price when a discount applies.
pub fn price_label(price: Price, discount: Option<Price>) -> String {
    match discount {
        Some(discount) if discount < price => format!("{} (was {})", discount, price),
        _ => price.to_string(),
    }
}

/// Render the page-number window, highlighting the current page.
pub fn page_window(numbers: &[usize], current: usize) -> String {
    numbers
        .iter()
        .map(|n| {
            if *n == current {
                style(format!("[{}]", n)).bold().to_string()
            } else {
                n.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Heart marker for liked products.
pub fn liked_marker(liked: bool) -> String {
    if liked {
        style("♥").red().to_string()
    } else {
        style("·").dim().to_string()
    }
}

/// Truncate text to `max` characters for table cells.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
