use anyhow::Context;
use clap::Parser;
use colored::*;
use env_logger::Env;
use log::error;
use rust_xss_hunter::cli::Args;
use rust_xss_hunter::config::ScanConfig;
use rust_xss_hunter::input;
use rust_xss_hunter::output::{append_results, summary_table, Console};
use rust_xss_hunter::payloads::PayloadCatalog;
use rust_xss_hunter::runner::ScanRunner;
use rust_xss_hunter::scanner::Scanner;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    println!("{}", r#"
   __  __ ___  ___   _  _              _
   \ \/ // __|/ __| | || |_  _  _ _  | |_  ___  _ _
    >  < \__ \\__ \ | __ | || || ' \ |  _|/ -_)| '_|
   /_/\_\|___/|___/ |_||_|\_,_||_||_| \__|\___||_|
    "#.bright_blue().bold());

    let config = ScanConfig::from_args(&args);
    if let Some(h) = &args.headers {
        println!("[+] HEADERS: {}", h);
    }

    let urls = match input::resolve(&args) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("{} {}", "ERROR:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let catalog = Arc::new(PayloadCatalog::load(config.catalog_path.as_deref()).await);

    let console = if urls.len() > 1 {
        Console::with_progress(urls.len() as u64, config.show_details())
    } else {
        Console::new(None, config.show_details())
    };

    println!(
        "{}",
        format!("[+] SCANNING {} URLs WITH {} THREADS", urls.len(), config.concurrency).green()
    );

    let scanner = Arc::new(Scanner::new(config, catalog, console.clone()));
    let runner = ScanRunner::new(scanner);

    let stop = runner.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.raise();
            eprintln!("\n{}", "[+] SCAN INTERRUPTED BY USER".yellow());
        }
    });

    let summary = runner.run(&urls).await;
    console.finish("Scan Complete");

    let findings = runner.results().snapshot().await;
    if findings.is_empty() {
        println!("{}", "[+] NO VULNERABILITIES FOUND".white());
    } else {
        println!("{}", format!("[+] FOUND {} VULNERABLE URLs", findings.len()).green());
        println!("{}", summary_table(&findings));
    }

    if let Some(output) = &args.output {
        if !findings.is_empty() {
            if let Err(e) = append_results(Path::new(output), &findings).with_context(|| format!("writing {}", output)) {
                error!("{:#}", e);
            }
        }
    }

    println!(
        "[+] SCAN COMPLETED: {} vulnerable, {} clean, {} without parameters, {} invalid, {} cancelled",
        summary.vulnerable, summary.clean, summary.not_applicable, summary.invalid, summary.cancelled
    );

    Ok(())
}
