//! Staged governance discovery.
//!
//! A fixed list of progress/label pairs advanced on a timer. It performs no
//! lookup of its own and touches no server state; it paces what a client
//! shows while the allocation is prepared. Cancellation goes through a
//! broadcast channel.

use std::time::Duration;
use tokio::sync::broadcast;

/// Default delay between stages.
pub const STAGE_INTERVAL: Duration = Duration::from_millis(400);

/// Default pause after the final stage before the results are shown.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Progress at which the law count becomes visible.
pub const LAWS_VISIBLE_AT: u8 = 85;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscoveryStage {
    /// Percent complete, 0–100.
    pub progress: u8,
    pub label: &'static str,
}

pub const DISCOVERY_STAGES: [DiscoveryStage; 8] = [
    DiscoveryStage { progress: 10, label: "Verifying jurisdiction..." },
    DiscoveryStage { progress: 25, label: "Discovering local officials..." },
    DiscoveryStage { progress: 40, label: "Discovering county officials..." },
    DiscoveryStage { progress: 55, label: "Discovering state officials..." },
    DiscoveryStage { progress: 70, label: "Discovering federal officials..." },
    DiscoveryStage { progress: 85, label: "Counting applicable laws..." },
    DiscoveryStage { progress: 95, label: "Calculating allocations..." },
    DiscoveryStage { progress: 100, label: "Discovery complete!" },
];

impl DiscoveryStage {
    pub fn laws_visible(&self) -> bool {
        self.progress >= LAWS_VISIBLE_AT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    Completed,
    Cancelled { last_progress: u8 },
}

/// Cancels running discovery sequences.
pub struct DiscoveryCanceller {
    tx: broadcast::Sender<()>,
}

impl DiscoveryCanceller {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for DiscoveryCanceller {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct DiscoverySequence {
    stages: Vec<DiscoveryStage>,
    interval: Duration,
    settle: Duration,
}

impl DiscoverySequence {
    pub fn new() -> Self {
        Self::with_timing(STAGE_INTERVAL, SETTLE_DELAY)
    }

    pub fn with_timing(interval: Duration, settle: Duration) -> Self {
        Self {
            stages: DISCOVERY_STAGES.to_vec(),
            interval,
            settle,
        }
    }

    pub fn stages(&self) -> &[DiscoveryStage] {
        &self.stages
    }

    /// Step through every stage, calling `on_stage` as each one is reached.
    ///
    /// The first stage arrives one interval after the call. After the last
    /// stage one more interval plus the settle delay elapses before
    /// `Completed` is returned. A dropped canceller never cancels.
    pub async fn run<F>(
        &self,
        mut on_stage: F,
        cancel: &mut broadcast::Receiver<()>,
    ) -> DiscoveryOutcome
    where
        F: FnMut(&DiscoveryStage),
    {
        let mut last_progress = 0;

        for stage in &self.stages {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancelled(cancel) => {
                    tracing::debug!(last_progress, "discovery cancelled");
                    return DiscoveryOutcome::Cancelled { last_progress };
                }
            }
            tracing::trace!(progress = stage.progress, stage = stage.label, "discovery stage");
            on_stage(stage);
            last_progress = stage.progress;
        }

        tokio::select! {
            _ = tokio::time::sleep(self.interval + self.settle) => DiscoveryOutcome::Completed,
            _ = cancelled(cancel) => DiscoveryOutcome::Cancelled { last_progress },
        }
    }
}

impl Default for DiscoverySequence {
    fn default() -> Self {
        Self::new()
    }
}

async fn cancelled(rx: &mut broadcast::Receiver<()>) {
    loop {
        match rx.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => return,
            Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}
