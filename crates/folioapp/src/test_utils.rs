use crate::clock::ManualClock;
use crate::commands::CmdContext;
use crate::model::Author;
use crate::store::local::LocalStore;
use crate::store::mem_backend::MemBackend;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed starting instant for deterministic tests.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()
}

/// An in-memory overlay plus a hand-driven clock.
pub struct TestEnv {
    pub store: LocalStore<MemBackend>,
    pub clock: ManualClock,
    pub author: Author,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            store: LocalStore::with_backend(MemBackend::new()),
            clock: ManualClock::new(t0()),
            author: Author::new("Dana Kim", "DK"),
        }
    }

    pub fn ctx(&self) -> CmdContext<'_, MemBackend> {
        CmdContext::new(&self.store, &self.clock, &self.author)
    }

    pub fn backend(&self) -> &MemBackend {
        self.store.backend()
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.clock.advance(Duration::minutes(minutes));
    }
}
