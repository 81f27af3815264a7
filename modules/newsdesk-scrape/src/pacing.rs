use std::time::Duration;

use rand::Rng;

/// Per-adapter stealth-pacing configuration (§5). `base` and `jitter_ms`
/// are adapter-tunable; both must be > 0 — a delay of exactly zero would
/// violate the "lower bound positive" requirement.
#[derive(Debug, Clone, Copy)]
pub struct PacingConfig {
    pub base: Duration,
    pub jitter_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(800),
            jitter_ms: 1200,
        }
    }
}

impl PacingConfig {
    pub fn new(base: Duration, jitter_ms: u64) -> Self {
        assert!(base > Duration::ZERO, "pacing base delay must be positive");
        Self { base, jitter_ms }
    }

    /// Sleep for `base + rand(0..jitter_ms)` before the next fetch. Called
    /// before every request after the first within a run (§5).
    pub async fn wait(&self) {
        let jitter = if self.jitter_ms > 0 {
            rand::rng().random_range(0..self.jitter_ms)
        } else {
            0
        };
        tokio::time::sleep(self.base + Duration::from_millis(jitter)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "positive")]
    fn zero_base_panics() {
        PacingConfig::new(Duration::ZERO, 100);
    }

    #[tokio::test]
    async fn wait_is_at_least_base() {
        let cfg = PacingConfig::new(Duration::from_millis(5), 5);
        let start = std::time::Instant::now();
        cfg.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
