use std::sync::{Arc, Mutex};

/// Ordered record of calls made on the mocks, shared so ordering across mocks can be checked.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| *e == entry).count()
    }

    /// Panics unless every entry appears, in the given order.
    pub fn assert_order(&self, expected: &[&str]) {
        let entries = self.entries();
        let mut last = None;
        for entry in expected {
            let pos = entries
                .iter()
                .position(|e| e == entry)
                .unwrap_or_else(|| panic!("`{entry}` never recorded in {entries:?}"));
            if let Some(prev) = last {
                assert!(pos > prev, "`{entry}` recorded out of order in {entries:?}");
            }
            last = Some(pos);
        }
    }
}
