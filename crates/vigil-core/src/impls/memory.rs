//! In-memory monitor.
//!
//! Every scope opened through a `RecordingMonitor` gets its own
//! `ScopeRecord`. Records are kept after the scope is cleared so that tests
//! can inspect what was visible at each step.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{ActivityError, ContextMap};
use crate::ports::{Monitor, MonitorScope, MonitorTransaction, TransactionStatus};

#[derive(Debug, Clone)]
pub enum ScopeEvent {
    TagSet {
        key: String,
        value: String,
    },
    ContextSet {
        key: String,
        value: ContextMap,
    },
    TransactionStarted {
        name: String,
    },
    /// Tags are the scope's tags at the moment the transaction closed.
    TransactionFinished {
        name: String,
        status: TransactionStatus,
        tags: BTreeMap<String, String>,
    },
    Captured {
        error: ActivityError,
        tags: BTreeMap<String, String>,
        contexts: BTreeMap<String, ContextMap>,
    },
    Cleared,
}

/// Everything that happened to one scope.
#[derive(Debug, Clone, Default)]
pub struct ScopeRecord {
    /// Live tag state (empty once cleared).
    pub tags: BTreeMap<String, String>,
    /// Live context state (empty once cleared).
    pub contexts: BTreeMap<String, ContextMap>,
    pub events: Vec<ScopeEvent>,
}

impl ScopeRecord {
    pub fn captured_errors(&self) -> Vec<&ActivityError> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ScopeEvent::Captured { error, .. } => Some(error),
                _ => None,
            })
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ScopeEvent::Cleared))
            .count()
    }

    pub fn started_transactions(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ScopeEvent::TransactionStarted { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// `(name, status, tags at close)` of every finished transaction.
    pub fn finished_transactions(
        &self,
    ) -> Vec<(&str, TransactionStatus, &BTreeMap<String, String>)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ScopeEvent::TransactionFinished { name, status, tags } => {
                    Some((name.as_str(), *status, tags))
                }
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingMonitor {
    scopes: Arc<Mutex<Vec<ScopeRecord>>>,
}

impl RecordingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every scope opened so far, in opening order.
    pub fn scopes(&self) -> Vec<ScopeRecord> {
        lock(&self.scopes).clone()
    }

    pub fn scope(&self, index: usize) -> Option<ScopeRecord> {
        lock(&self.scopes).get(index).cloned()
    }

    pub fn scope_count(&self) -> usize {
        lock(&self.scopes).len()
    }
}

impl Monitor for RecordingMonitor {
    fn open_scope(&self) -> Box<dyn MonitorScope> {
        let mut scopes = lock(&self.scopes);
        scopes.push(ScopeRecord::default());
        Box::new(RecordingScope {
            scopes: Arc::clone(&self.scopes),
            index: scopes.len() - 1,
        })
    }
}

fn lock(scopes: &Mutex<Vec<ScopeRecord>>) -> MutexGuard<'_, Vec<ScopeRecord>> {
    scopes.lock().unwrap_or_else(PoisonError::into_inner)
}

struct RecordingScope {
    scopes: Arc<Mutex<Vec<ScopeRecord>>>,
    index: usize,
}

impl RecordingScope {
    fn with_record<R>(&self, f: impl FnOnce(&mut ScopeRecord) -> R) -> R {
        let mut scopes = lock(&self.scopes);
        f(&mut scopes[self.index])
    }
}

impl MonitorScope for RecordingScope {
    fn set_tag(&mut self, key: &str, value: &str) {
        self.with_record(|r| {
            r.tags.insert(key.to_string(), value.to_string());
            r.events.push(ScopeEvent::TagSet {
                key: key.to_string(),
                value: value.to_string(),
            });
        });
    }

    fn set_context(&mut self, key: &str, value: ContextMap) {
        self.with_record(|r| {
            r.contexts.insert(key.to_string(), value.clone());
            r.events.push(ScopeEvent::ContextSet {
                key: key.to_string(),
                value,
            });
        });
    }

    fn start_transaction(&mut self, name: &str) -> Box<dyn MonitorTransaction> {
        self.with_record(|r| {
            r.events.push(ScopeEvent::TransactionStarted {
                name: name.to_string(),
            })
        });
        Box::new(RecordingTransaction {
            scopes: Arc::clone(&self.scopes),
            index: self.index,
            name: name.to_string(),
        })
    }

    fn capture_error(&mut self, error: &ActivityError) {
        self.with_record(|r| {
            let event = ScopeEvent::Captured {
                error: error.clone(),
                tags: r.tags.clone(),
                contexts: r.contexts.clone(),
            };
            r.events.push(event);
        });
    }

    fn clear(&mut self) {
        self.with_record(|r| {
            r.tags.clear();
            r.contexts.clear();
            r.events.push(ScopeEvent::Cleared);
        });
    }
}

struct RecordingTransaction {
    scopes: Arc<Mutex<Vec<ScopeRecord>>>,
    index: usize,
    name: String,
}

impl MonitorTransaction for RecordingTransaction {
    fn finish(self: Box<Self>, status: TransactionStatus) {
        let mut scopes = lock(&self.scopes);
        let record = &mut scopes[self.index];
        let tags = record.tags.clone();
        record.events.push(ScopeEvent::TransactionFinished {
            name: self.name.clone(),
            status,
            tags,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_scope_gets_its_own_record() {
        let monitor = RecordingMonitor::new();
        let mut a = monitor.open_scope();
        let mut b = monitor.open_scope();
        a.set_tag("k", "a");
        b.set_tag("k", "b");
        a.set_tag("k", "a2");

        let scopes = monitor.scopes();
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[0].tags["k"], "a2");
        assert_eq!(scopes[1].tags["k"], "b");
    }

    #[test]
    fn clear_keeps_history_but_drops_state() {
        let monitor = RecordingMonitor::new();
        let mut scope = monitor.open_scope();
        scope.set_tag("k", "v");
        let txn = scope.start_transaction("t");
        txn.finish(TransactionStatus::Ok);
        scope.capture_error(&ActivityError::msg("x"));
        scope.clear();

        let record = monitor.scope(0).unwrap();
        assert!(record.tags.is_empty());
        assert_eq!(record.clear_count(), 1);
        assert_eq!(record.started_transactions(), vec!["t"]);
        let finished = record.finished_transactions();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].2["k"], "v");
        assert_eq!(record.captured_errors().len(), 1);
    }
}
