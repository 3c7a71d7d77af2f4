//! Interceptor port - worker 起動時に一度だけ呼ばれる factory

use std::sync::Arc;

use super::activity::ActivityInbound;

/// Worker-level interceptor.
///
/// `intercept_activity` receives the next link of the chain and returns the
/// link the engine should call instead. The default leaves the chain as is.
pub trait Interceptor: Send + Sync {
    fn intercept_activity(&self, next: Arc<dyn ActivityInbound>) -> Arc<dyn ActivityInbound> {
        next
    }
}
