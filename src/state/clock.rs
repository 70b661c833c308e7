// Simulation clock: running flag plus the handle of the periodic ticker.
//
// The clock is "running" exactly while it owns a ticker. Stopping drops the
// ticker, and ticker handles cancel themselves on drop, so no tick can fire
// once `stop` has returned.

#[derive(Debug)]
pub struct SimulationClock<T> {
    period_ms: u32,
    ticker: Option<T>,
}

impl<T> SimulationClock<T> {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            ticker: None,
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start ticking via `spawn(period_ms)`. No-op (returns false) if
    /// already running.
    pub fn start(&mut self, spawn: impl FnOnce(u32) -> T) -> bool {
        if self.ticker.is_some() {
            return false;
        }
        self.ticker = Some(spawn(self.period_ms));
        true
    }

    /// Cancel the ticker. No-op (returns false) if not running.
    pub fn stop(&mut self) -> bool {
        self.ticker.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingTicker(Rc<Cell<u32>>);

    impl Drop for CountingTicker {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn start_is_idempotent() {
        let mut clock = SimulationClock::new(200);
        let spawned = Cell::new(0);
        let dropped = Rc::new(Cell::new(0));
        let spawn = |period| {
            assert_eq!(period, 200);
            spawned.set(spawned.get() + 1);
            CountingTicker(dropped.clone())
        };
        assert!(clock.start(spawn));
        assert!(!clock.start(|_| -> CountingTicker { panic!("second ticker spawned") }));
        assert_eq!(spawned.get(), 1);
        assert!(clock.is_running());
        assert_eq!(dropped.get(), 0);
    }

    #[test]
    fn stop_cancels_once() {
        let dropped = Rc::new(Cell::new(0));
        let mut clock = SimulationClock::new(50);
        clock.start(|_| CountingTicker(dropped.clone()));
        assert!(clock.stop());
        assert_eq!(dropped.get(), 1);
        assert!(!clock.stop());
        assert_eq!(dropped.get(), 1);
        assert!(!clock.is_running());
    }
}
