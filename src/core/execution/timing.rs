use super::config::StageDurations;
use crate::core::types::Stage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Uniform;
use std::thread;
use std::time::Duration;

/// Simulated work: sleeps for a stage's duration, optionally jittered
pub struct StageTimer {
    durations: StageDurations,
    jitter: Option<Uniform<f64>>,
    rng: StdRng,
}

impl StageTimer {
    /// `jitter` is the fractional spread around each base duration.
    /// `seed` makes the jitter reproducible; `None` draws from entropy.
    pub fn new(durations: StageDurations, jitter: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let jitter = (jitter > 0.0).then(|| Uniform::new_inclusive(1.0 - jitter, 1.0 + jitter));
        Self {
            durations,
            jitter,
            rng,
        }
    }

    /// Duration the next hold of `base` will last
    pub fn jittered(&mut self, base: Duration) -> Duration {
        match &self.jitter {
            Some(spread) if !base.is_zero() => base.mul_f64(self.rng.sample(spread)),
            _ => base,
        }
    }

    pub fn hold_stage(&mut self, stage: Stage) {
        let base = self.durations.for_stage(stage);
        self.hold(base);
    }

    pub fn hold(&mut self, base: Duration) {
        let duration = self.jittered(base);
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }

    pub fn durations(&self) -> &StageDurations {
        &self.durations
    }
}
