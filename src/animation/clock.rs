use std::sync::Mutex;
use std::time::Instant;

/// Monotonic time source driving time-based animation.
pub trait Clock: Send + Sync {
    /// Seconds since an arbitrary, fixed origin.
    fn now_secs(&self) -> f64;
}

/// Wall clock measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to. Used for offline renders and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: Mutex<f64>,
}

impl ManualClock {
    pub fn new(secs: f64) -> Self {
        Self {
            secs: Mutex::new(secs),
        }
    }

    pub fn set(&self, secs: f64) {
        *self.secs.lock().unwrap_or_else(|p| p.into_inner()) = secs;
    }

    pub fn advance(&self, dt: f64) {
        *self.secs.lock().unwrap_or_else(|p| p.into_inner()) += dt;
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        *self.secs.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
