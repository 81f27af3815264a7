use newsdesk_analysis::AnalysisRunner;
use newsdesk_queue::{QueueClient, QueueMessage};
use tracing::{error, info, warn};

use crate::scheduler::SchedulerHandle;

const ML_ANALYZE_QUEUE: &str = "queue:ml.analyze";
const POP_TIMEOUT_SECS: f64 = 5.0;

/// Pops `ml.analyze` messages off the broker and runs them through the
/// analysis runner until `handle` signals stop. `MlAnalyzeSince` is never
/// expected here (§4.12) — it is logged and dropped defensively.
pub async fn run_analysis_consumer(queue: QueueClient, runner: AnalysisRunner, handle: SchedulerHandle) {
    loop {
        if handle.is_stopped().await {
            info!("analysis consumer stopping");
            return;
        }

        let message = match queue.pop(ML_ANALYZE_QUEUE, POP_TIMEOUT_SECS).await {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(e) => {
                error!(error = %e, "queue pop failed");
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                continue;
            }
        };

        let article_ids = match message {
            QueueMessage::MlAnalyze { article_ids } => article_ids,
            QueueMessage::MlAnalyzeSince { .. } => {
                warn!("received MlAnalyzeSince on the analysis queue, expected pre-expanded IDs");
                continue;
            }
            QueueMessage::Scrape { .. } => {
                warn!("received a scrape message on the analysis queue");
                continue;
            }
        };

        match runner.run(&article_ids).await {
            Ok(outcome) => info!(
                analyzed = outcome.analyzed.len(),
                errored = outcome.errors.len(),
                "analysis batch complete"
            ),
            Err(e) => error!(error = %e, "analysis batch failed"),
        }
    }
}
