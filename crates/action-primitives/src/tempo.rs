//! Pacing - randomized suspension between interactions

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Closed interval of milliseconds to pause for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DelayWindow {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayWindow {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Ordered bounds; an inverted window is read with its ends swapped.
    pub fn bounds(&self) -> (u64, u64) {
        if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        }
    }

    /// Uniform integer sample from the closed interval.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let (lo, hi) = self.bounds();
        rng.gen_range(lo..=hi)
    }
}

/// Suspends the calling flow. Never fails.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Pause for a duration drawn from `window`; returns the milliseconds chosen.
    async fn pause(&self, window: DelayWindow) -> u64;
}

/// Uniform random pacing backed by `tokio::time::sleep`.
#[derive(Clone, Debug, Default)]
pub struct RandomPacer;

#[async_trait]
impl Pacer for RandomPacer {
    async fn pause(&self, window: DelayWindow) -> u64 {
        let ms = window.sample(&mut rand::thread_rng());
        debug!(delay_ms = ms, "pacing");
        tokio::time::sleep(Duration::from_millis(ms)).await;
        ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_inside_closed_interval() {
        let window = DelayWindow::new(500, 1000);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let ms = window.sample(&mut rng);
            assert!((500..=1000).contains(&ms));
        }
    }

    #[test]
    fn degenerate_and_inverted_windows() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(DelayWindow::new(42, 42).sample(&mut rng), 42);
        let inverted = DelayWindow::new(900, 100);
        assert_eq!(inverted.bounds(), (100, 900));
        let ms = inverted.sample(&mut rng);
        assert!((100..=900).contains(&ms));
    }

    #[tokio::test(start_paused = true)]
    async fn random_pacer_sleeps_for_sampled_duration() {
        let start = tokio::time::Instant::now();
        let ms = RandomPacer.pause(DelayWindow::new(3000, 7000)).await;
        assert!((3000..=7000).contains(&ms));
        assert!(start.elapsed() >= Duration::from_millis(ms));
    }
}
