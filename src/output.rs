use crate::error::Result;
use crate::models::ScanResult;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Console status lines, routed through the progress bar when one is shown.
#[derive(Clone, Default)]
pub struct Console {
    progress: Option<ProgressBar>,
    details: bool,
}

impl Console {
    pub fn new(progress: Option<ProgressBar>, details: bool) -> Self {
        Console { progress, details }
    }

    /// Progress bar over `targets` URLs.
    pub fn with_progress(targets: u64, details: bool) -> Self {
        let pb = ProgressBar::new(targets);
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}") {
            pb.set_style(style.progress_chars("#>-"));
        }
        Console::new(Some(pb), details)
    }

    pub fn line(&self, msg: impl AsRef<str>) {
        match &self.progress {
            Some(pb) => pb.println(msg.as_ref()),
            None => println!("{}", msg.as_ref()),
        }
    }

    /// Per-parameter chatter; only shown for single-worker or verbose runs.
    pub fn detail(&self, msg: impl AsRef<str>) {
        if self.details {
            self.line(msg);
        }
    }

    pub fn set_message(&self, msg: String) {
        if let Some(pb) = &self.progress {
            pb.set_message(msg);
        }
    }

    pub fn advance(&self) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }

    pub fn finish(&self, msg: &'static str) {
        if let Some(pb) = &self.progress {
            pb.finish_with_message(msg);
        }
    }

    pub fn report_vulnerable(&self, result: &ScanResult) {
        self.line(format!("{} {}", "[+] VULNERABLE:".red().bold(), result.url));
        self.line(format!("    PARAMETER: {}", result.parameter));
        self.line(format!("    PAYLOAD:   {}", result.payload));
        self.line(format!("    PROOF:     {}", result.proof_url.green()));
    }
}

pub fn summary_table(results: &[ScanResult]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Target URL", "Parameter", "Payload"]);

    for (i, result) in results.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            result.url.clone(),
            result.parameter.clone(),
            result.payload.clone(),
        ]);
    }

    table
}

/// Append one proof URL per line, creating the file if needed.
pub fn append_results(path: &Path, results: &[ScanResult]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for result in results {
        writeln!(file, "{}", result.proof_url)?;
    }
    Ok(())
}
