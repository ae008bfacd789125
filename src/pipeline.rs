//! Debounced analytics recompute.
//!
//! Edits push ledger snapshots into a watch channel; a background task waits
//! for the edits to go quiet, then recomputes both sides and publishes a
//! revisioned report. Only the newest snapshot is ever processed.

use crate::config::AnalyticsConfig;
use crate::engine::analytics::{aggregate, AnalyticsReport};
use crate::engine::classifier::PlayTextClassifier;
use crate::engine::ledger::{DriveLedger, Side};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsReport {
    /// 0 until the first recompute lands.
    pub revision: u64,
    pub offense: AnalyticsReport,
    pub defense: AnalyticsReport,
}

/// Compute both sides in one go.
pub fn compute(
    ledger: &DriveLedger,
    classifier: &PlayTextClassifier,
    cfg: &AnalyticsConfig,
    revision: u64,
) -> StatsReport {
    StatsReport {
        revision,
        offense: aggregate(ledger.records(Side::Offense), true, classifier, cfg),
        defense: aggregate(ledger.records(Side::Defense), false, classifier, cfg),
    }
}

pub struct StatsPipeline {
    input: watch::Sender<Option<DriveLedger>>,
    output: watch::Receiver<StatsReport>,
    task: JoinHandle<()>,
}

impl StatsPipeline {
    /// Start the recompute task on the current tokio runtime.
    pub fn spawn(
        classifier: Arc<PlayTextClassifier>,
        cfg: AnalyticsConfig,
        debounce: Duration,
    ) -> Self {
        let (input, input_rx) = watch::channel(None);
        let (output_tx, output) = watch::channel(StatsReport::default());
        let task = tokio::spawn(run(input_rx, output_tx, classifier, cfg, debounce));
        Self { input, output, task }
    }

    /// Queue the latest ledger state; older queued states are dropped.
    pub fn submit(&self, ledger: &DriveLedger) {
        self.input.send_replace(Some(ledger.clone()));
    }

    pub fn subscribe(&self) -> watch::Receiver<StatsReport> {
        self.output.clone()
    }

    pub fn latest(&self) -> StatsReport {
        self.output.borrow().clone()
    }

    /// Close the input and wait for the task to finish.
    pub async fn shutdown(self) {
        let Self { input, task, .. } = self;
        drop(input);
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "stats task ended abnormally");
        }
    }
}

async fn run(
    mut rx: watch::Receiver<Option<DriveLedger>>,
    tx: watch::Sender<StatsReport>,
    classifier: Arc<PlayTextClassifier>,
    cfg: AnalyticsConfig,
    debounce: Duration,
) {
    let mut revision = 0u64;
    while rx.changed().await.is_ok() {
        // wait for quiescence; every new edit restarts the timer
        loop {
            tokio::select! {
                _ = tokio::time::sleep(debounce) => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }

        let snapshot = rx.borrow_and_update().clone();
        let Some(ledger) = snapshot else {
            continue;
        };
        revision += 1;
        let report = compute(&ledger, &classifier, &cfg, revision);
        tracing::debug!(
            revision,
            offense = report.offense.plays,
            defense = report.defense.plays,
            "stats published"
        );
        tx.send_replace(report);
    }
    tracing::debug!("stats pipeline closed");
}
