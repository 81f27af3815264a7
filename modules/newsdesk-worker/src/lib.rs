pub mod analysis_task;
pub mod scheduler;
pub mod scrape_task;

pub use analysis_task::run_analysis_consumer;
pub use scheduler::{default_schedules, run_source_schedule, SchedulerHandle, SourceSchedule};
pub use scrape_task::{run_scrape_task, MAX_CONCURRENT_SCRAPES};
