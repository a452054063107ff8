use crate::MandiPrice;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Runs ingestion once right away and then every `period`.
pub struct Scheduler {
    app: Arc<MandiPrice>,
    period: Duration,
}

impl Scheduler {
    pub fn new(app: Arc<MandiPrice>, period: Duration) -> Self {
        Self { app, period }
    }

    /// Starts the timer loop. Each run gets its own task, so a slow run does
    /// not hold back the next tick and a failed run does not stop the loop.
    pub fn start(self) -> JoinHandle<()> {
        tracing::info!(period_secs = self.period.as_secs(), "market price scheduler started");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let app = self.app.clone();
                tokio::spawn(async move {
                    let snapshot = app.fetch_and_persist().await;
                    if snapshot.success {
                        tracing::info!(items = snapshot.total_items, "scheduled market price update done");
                    } else {
                        tracing::warn!(
                            error = snapshot.error.as_deref().unwrap_or("unknown"),
                            "scheduled market price update failed"
                        );
                    }
                });
            }
        })
    }
}
