use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct Stat {
    emitted: AtomicU64,
    stale: AtomicU64,
}

impl Stat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_emitted(&self, num: u64) {
        self.emitted.fetch_add(num, Ordering::SeqCst);
    }

    /// An output read that came back empty after the pause.
    pub fn inc_stale(&self, num: u64) {
        self.stale.fetch_add(num, Ordering::SeqCst);
    }

    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::SeqCst)
    }

    pub fn stale(&self) -> u64 {
        self.stale.load(Ordering::SeqCst)
    }

    pub fn summary(&self, elapsed: Duration) -> String {
        format!(
            "cases: [emitted={}, stale={}] in {:.2}s",
            self.emitted(),
            self.stale(),
            elapsed.as_secs_f64()
        )
    }
}
