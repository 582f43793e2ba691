use crate::cli::Args;
use crate::error::{HunterError, Result};
use crate::params;
use log::{debug, info};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Keep lines that look like GET URLs with parameters and pass validation,
/// dropping duplicates while preserving first-seen order.
pub fn filter_urls<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() || !line.contains('=') {
            continue;
        }
        if let Err(e) = params::validate(line) {
            debug!("Skipping {}", e);
            continue;
        }
        if seen.insert(line.to_string()) {
            urls.push(line.to_string());
        }
    }

    urls
}

pub fn read_file(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| HunterError::Input(format!("cannot read {}: {}", path.display(), e)))?;
    let lines = BufReader::new(file).lines().collect::<io::Result<Vec<String>>>()?;
    Ok(filter_urls(lines))
}

pub fn read_stdin() -> Result<Vec<String>> {
    let lines = io::stdin().lock().lines().collect::<io::Result<Vec<String>>>()?;
    Ok(filter_urls(lines))
}

/// URLs to scan, from `-f`, `-u` or `--pipe` in that order of precedence.
pub fn resolve(args: &Args) -> Result<Vec<String>> {
    let urls = if let Some(file) = &args.file {
        if args.url.is_some() {
            info!("Both -u and -f given; scanning {}", file);
        }
        info!("Reading URLs from {}", file);
        read_file(Path::new(file))?
    } else if let Some(url) = &args.url {
        params::validate(url).map_err(|e| HunterError::Input(e.to_string()))?;
        vec![url.trim().to_string()]
    } else if args.pipe {
        read_stdin()?
    } else {
        return Err(HunterError::Input(
            "specify -u for a single URL, -f for a file, or --pipe for standard input".to_string(),
        ));
    };

    if urls.is_empty() {
        return Err(HunterError::Input("no valid URLs with GET parameters found".to_string()));
    }
    Ok(urls)
}
