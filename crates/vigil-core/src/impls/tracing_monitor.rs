//! Monitor that renders scope activity as `tracing` events.
//!
//! Used when no Sentry DSN is configured: failures still show up in the
//! worker's logs together with the invocation's tags.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{error, info, trace};

use crate::domain::{ActivityError, ContextMap};
use crate::ports::{Monitor, MonitorScope, MonitorTransaction, TransactionStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMonitor;

impl Monitor for TracingMonitor {
    fn open_scope(&self) -> Box<dyn MonitorScope> {
        Box::new(TracingScope::default())
    }
}

#[derive(Debug, Default)]
struct TracingScope {
    tags: BTreeMap<String, String>,
    contexts: BTreeMap<String, ContextMap>,
}

impl MonitorScope for TracingScope {
    fn set_tag(&mut self, key: &str, value: &str) {
        trace!(key, value, "scope tag");
        self.tags.insert(key.to_string(), value.to_string());
    }

    fn set_context(&mut self, key: &str, value: ContextMap) {
        trace!(key, "scope context");
        self.contexts.insert(key.to_string(), value);
    }

    fn start_transaction(&mut self, name: &str) -> Box<dyn MonitorTransaction> {
        Box::new(TracingTransaction {
            name: name.to_string(),
            started: Instant::now(),
        })
    }

    fn capture_error(&mut self, err: &ActivityError) {
        let contexts = serde_json::to_string(&self.contexts).unwrap_or_default();
        error!(
            error = %err,
            tags = ?self.tags,
            contexts = %contexts,
            "activity failure captured"
        );
    }

    fn clear(&mut self) {
        self.tags.clear();
        self.contexts.clear();
    }
}

struct TracingTransaction {
    name: String,
    started: Instant,
}

impl MonitorTransaction for TracingTransaction {
    fn finish(self: Box<Self>, status: TransactionStatus) {
        info!(
            transaction = %self.name,
            status = ?status,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "transaction finished"
        );
    }
}
