use std::time::Instant;

/// Wall-clock frame timer. Ticked once per redraw by the app.
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Seconds since the previous tick; advances the clock.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    /// Discard elapsed time, e.g. after init or a resize drain, so the next
    /// tick doesn't report the stall as animation time.
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn tick_reports_elapsed_time() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();
        assert!(delta >= 0.009, "delta {delta} too small");
        assert!(delta <= 0.100, "delta {delta} too large");
    }

    #[test]
    fn reset_discards_elapsed_time() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(10));
        clock.reset();
        assert!(clock.tick() < 0.005);
    }
}
