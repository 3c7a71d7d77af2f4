//! ActivityContext implementations.

use std::sync::{PoisonError, RwLock};

use crate::domain::ActivityInfo;
use crate::ports::ActivityContext;

/// Context whose info never changes during the invocation.
#[derive(Debug, Clone)]
pub struct FixedActivityContext {
    info: ActivityInfo,
}

impl FixedActivityContext {
    pub fn new(info: ActivityInfo) -> Self {
        Self { info }
    }
}

impl ActivityContext for FixedActivityContext {
    fn info(&self) -> ActivityInfo {
        self.info.clone()
    }
}

/// Context the host can update while the invocation runs (heartbeat-driven
/// timeouts, attempt bookkeeping, ...). Readers always see the latest state.
#[derive(Debug)]
pub struct SharedActivityContext {
    info: RwLock<ActivityInfo>,
}

impl SharedActivityContext {
    pub fn new(info: ActivityInfo) -> Self {
        Self {
            info: RwLock::new(info),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut ActivityInfo)) {
        let mut info = self.info.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut info);
    }
}

impl ActivityContext for SharedActivityContext {
    fn info(&self) -> ActivityInfo {
        self.info
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::info::fixtures::activity_info;

    #[test]
    fn shared_context_returns_latest_snapshot() {
        let ctx = SharedActivityContext::new(activity_info("a"));
        let before = ctx.info();
        ctx.update(|info| info.attempt += 1);
        assert_eq!(before.attempt, 1);
        assert_eq!(ctx.info().attempt, 2);
    }
}
