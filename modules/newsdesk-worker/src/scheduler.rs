use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Default per-source stagger offsets, confirmed as the reference
/// implementation's historical values (§4.7). Not normative — deployments
/// may override via configuration.
pub const DEFAULT_SOURCE_OFFSETS_HOURS: &[(&str, f64)] = &[
    ("Rappler", 1.00),
    ("GMA News", 1.08),
    ("Philstar", 1.17),
    ("Inquirer", 1.25),
    ("Manila Bulletin", 1.33),
    ("Manila Times", 1.42),
    ("SunStar", 1.50),
];

/// One source's scheduling policy: an initial offset before the first
/// tick, then a fixed tick interval thereafter.
#[derive(Debug, Clone, Copy)]
pub struct SourceSchedule {
    pub source: &'static str,
    pub initial_offset: Duration,
    pub interval: Duration,
}

fn hours(h: f64) -> Duration {
    Duration::from_secs_f64(h * 3600.0)
}

/// Builds the default schedule: offset equals interval (each source fires
/// once per its configured hour count, first fire staggered by that same
/// amount so all seven don't start simultaneously).
pub fn default_schedules() -> Vec<SourceSchedule> {
    DEFAULT_SOURCE_OFFSETS_HOURS
        .iter()
        .map(|(source, h)| SourceSchedule {
            source,
            initial_offset: hours(*h),
            interval: hours(*h),
        })
        .collect()
}

/// Stops every per-source loop cooperatively; each loop checks the flag
/// before dispatching and exits once set (§4.7).
#[derive(Clone)]
pub struct SchedulerHandle {
    stop_flag: Arc<RwLock<bool>>,
}

impl SchedulerHandle {
    pub fn new() -> Self {
        Self {
            stop_flag: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn stop(&self) {
        *self.stop_flag.write().await = true;
    }

    async fn should_stop(&self) -> bool {
        *self.stop_flag.read().await
    }

    /// Public alias for loops outside this module (e.g. the analysis
    /// consumer) that want to check the same stop flag.
    pub async fn is_stopped(&self) -> bool {
        self.should_stop().await
    }
}

impl Default for SchedulerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one source's schedule loop: sleep the initial offset, then tick at
/// `interval` forever, invoking `dispatch` once per tick. Uses
/// `MissedTickBehavior::Delay` so a slow tick is never double-fired
/// (§4.7's at-most-once dispatch rule).
pub async fn run_source_schedule<F, Fut>(
    schedule: SourceSchedule,
    handle: SchedulerHandle,
    mut dispatch: F,
) where
    F: FnMut(&'static str) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    tokio::time::sleep(schedule.initial_offset).await;

    let mut interval = tokio::time::interval(schedule.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if handle.should_stop().await {
            info!(source = schedule.source, "scheduler loop stopping");
            return;
        }
        interval.tick().await;
        if handle.should_stop().await {
            info!(source = schedule.source, "scheduler loop stopping after tick");
            return;
        }
        dispatch(schedule.source).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn default_schedules_cover_all_seven_sources() {
        let schedules = default_schedules();
        assert_eq!(schedules.len(), 7);
        let names: Vec<&str> = schedules.iter().map(|s| s.source).collect();
        assert!(names.contains(&"Rappler"));
        assert!(names.contains(&"SunStar"));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_handle_halts_before_first_tick() {
        let schedule = SourceSchedule {
            source: "Test",
            initial_offset: Duration::from_secs(10),
            interval: Duration::from_secs(10),
        };
        let handle = SchedulerHandle::new();
        handle.stop().await;

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        run_source_schedule(schedule, handle, move |_| {
            let count = count_clone.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
            }
        })
        .await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatches_after_initial_offset_then_stops() {
        let schedule = SourceSchedule {
            source: "Test",
            initial_offset: Duration::from_millis(10),
            interval: Duration::from_millis(10),
        };
        let handle = SchedulerHandle::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let handle_clone = handle.clone();
        let task = tokio::spawn(async move {
            run_source_schedule(schedule, handle_clone, move |_| {
                let count = count_clone.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await;
        });

        tokio::time::advance(Duration::from_millis(15)).await;
        handle.stop().await;
        tokio::time::advance(Duration::from_millis(20)).await;
        let _ = task.await;

        assert!(count.load(Ordering::SeqCst) >= 1);
    }
}
