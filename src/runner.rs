//! Fans the per-target scan out over a bounded pool.

use crate::models::{ScanOutcome, ScanResult};
use crate::scanner::Scanner;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, Semaphore};

/// Run-wide stop flag. Raising it stops dispatch of new targets and abandons
/// in-flight scans; results already recorded are kept.
#[derive(Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        StopSignal { tx: Arc::new(tx) }
    }

    pub fn raise(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_raised(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the signal has been raised.
    pub async fn raised(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Confirmed findings shared by every worker. Each append holds the lock.
#[derive(Clone, Default)]
pub struct ResultCollector {
    inner: Arc<Mutex<Vec<ScanResult>>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, result: ScanResult) {
        self.inner.lock().await.push(result);
    }

    pub async fn snapshot(&self) -> Vec<ScanResult> {
        self.inner.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub vulnerable: usize,
    pub clean: usize,
    pub not_applicable: usize,
    pub invalid: usize,
    /// Abandoned mid-scan or never dispatched because of a stop.
    pub cancelled: usize,
    /// Worker task panicked.
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &ScanOutcome) {
        match outcome {
            ScanOutcome::Vulnerable(_) => self.vulnerable += 1,
            ScanOutcome::Clean => self.clean += 1,
            ScanOutcome::NotApplicable => self.not_applicable += 1,
            ScanOutcome::Invalid(_) => self.invalid += 1,
            ScanOutcome::Cancelled => self.cancelled += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.vulnerable + self.clean + self.not_applicable + self.invalid + self.cancelled + self.failed
    }
}

pub struct ScanRunner {
    scanner: Arc<Scanner>,
    results: ResultCollector,
}

impl ScanRunner {
    pub fn new(scanner: Arc<Scanner>) -> Self {
        ScanRunner {
            scanner,
            results: ResultCollector::new(),
        }
    }

    pub fn results(&self) -> &ResultCollector {
        &self.results
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.scanner.stop_signal()
    }

    /// Scan every URL with at most `concurrency` targets in flight.
    /// Targets finish in whatever order their scans complete.
    pub async fn run(&self, urls: &[String]) -> RunSummary {
        let concurrency = self.scanner.config().concurrency;
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let stop = self.scanner.stop_signal();
        let mut summary = RunSummary::default();
        let mut handles = Vec::with_capacity(urls.len());

        info!("Scanning {} URLs with {} workers", urls.len(), concurrency);

        for url in urls {
            if stop.is_raised() {
                break;
            }
            let permit = tokio::select! {
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => break,
                },
                _ = stop.raised() => break,
            };

            let scanner = self.scanner.clone();
            let results = self.results.clone();
            let stop = stop.clone();
            let target = url.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                scanner.console().set_message(target.clone());

                let outcome = tokio::select! {
                    outcome = scanner.scan_target(&target) => outcome,
                    _ = stop.raised() => ScanOutcome::Cancelled,
                };

                if let ScanOutcome::Vulnerable(ref result) = outcome {
                    results.push(result.clone()).await;
                }
                scanner.console().advance();
                outcome
            });
            handles.push((url.clone(), handle));
        }

        summary.cancelled += urls.len() - handles.len();

        for (url, handle) in handles {
            match handle.await {
                Ok(outcome) => summary.record(&outcome),
                Err(e) => {
                    error!("Scan of {} aborted: {}", url, e);
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}
