//! Sentry backend.
//!
//! Each invocation gets a child `Hub` forked from the current one, so tags
//! and contexts never leak between concurrently running activities. The
//! delegate future is bound to that hub; events the activity body reports on
//! its own carry the same tags.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use sentry::protocol::{Context, SpanStatus};
use sentry::types::Dsn;
use sentry::{ClientInitGuard, ClientOptions, Hub, SentryFutureExt, TransactionContext};
use tracing::debug;

use crate::config::{ConfigError, MonitorConfig};
use crate::domain::{ActivityError, ContextMap};
use crate::ports::{
    ActivityResult, Monitor, MonitorScope, MonitorTransaction, TransactionStatus,
};

/// Span operation recorded on every activity transaction.
pub const TRANSACTION_OP: &str = "temporal.activity";

/// Initialize the Sentry client from `config`.
///
/// Returns `Ok(None)` when no DSN is configured. Keep the guard alive for the
/// lifetime of the worker; dropping it flushes pending events.
pub fn init(config: &MonitorConfig) -> Result<Option<ClientInitGuard>, ConfigError> {
    let Some(dsn) = config.dsn.as_deref() else {
        return Ok(None);
    };
    let dsn = dsn
        .parse::<Dsn>()
        .map_err(|e| ConfigError::InvalidDsn(e.to_string()))?;

    let options = ClientOptions {
        dsn: Some(dsn),
        environment: config.environment.clone().map(Into::into),
        release: config.release.clone().map(Into::into),
        traces_sample_rate: config.traces_sample_rate,
        ..Default::default()
    };
    debug!(
        environment = ?config.environment,
        traces_sample_rate = config.traces_sample_rate,
        "initializing sentry client"
    );
    Ok(Some(sentry::init(options)))
}

/// Monitor backed by the process's Sentry client.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentryMonitor;

impl Monitor for SentryMonitor {
    fn open_scope(&self) -> Box<dyn MonitorScope> {
        Box::new(SentryScope {
            hub: Arc::new(Hub::new_from_top(Hub::current())),
        })
    }
}

struct SentryScope {
    hub: Arc<Hub>,
}

impl MonitorScope for SentryScope {
    fn set_tag(&mut self, key: &str, value: &str) {
        self.hub.configure_scope(|scope| scope.set_tag(key, value));
    }

    fn set_context(&mut self, key: &str, value: ContextMap) {
        let fields: BTreeMap<String, serde_json::Value> = value.into_iter().collect();
        self.hub
            .configure_scope(|scope| scope.set_context(key, Context::Other(fields)));
    }

    fn start_transaction(&mut self, name: &str) -> Box<dyn MonitorTransaction> {
        let transaction = self
            .hub
            .start_transaction(TransactionContext::new(name, TRANSACTION_OP));
        let span = transaction.clone();
        self.hub
            .configure_scope(|scope| scope.set_span(Some(span.into())));
        Box::new(SentryTransaction { transaction })
    }

    fn capture_error(&mut self, error: &ActivityError) {
        let event_id = self.hub.capture_error(error.inner());
        debug!(%event_id, "reported activity failure to sentry");
    }

    fn clear(&mut self) {
        self.hub.configure_scope(|scope| scope.clear());
    }

    fn bind<'a>(&self, fut: BoxFuture<'a, ActivityResult>) -> BoxFuture<'a, ActivityResult> {
        Box::pin(fut.bind_hub(Arc::clone(&self.hub)))
    }
}

struct SentryTransaction {
    transaction: sentry::Transaction,
}

impl MonitorTransaction for SentryTransaction {
    fn finish(self: Box<Self>, status: TransactionStatus) {
        self.transaction.set_status(match status {
            TransactionStatus::Ok => SpanStatus::Ok,
            TransactionStatus::InternalError => SpanStatus::InternalError,
            TransactionStatus::Cancelled => SpanStatus::Cancelled,
        });
        self.transaction.finish();
    }
}
