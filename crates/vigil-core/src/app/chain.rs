//! InterceptorChain - interceptor の登録と chain の構築

use std::sync::Arc;

use crate::ports::{ActivityInbound, Interceptor};

/// Ordered interceptors registered with a worker.
///
/// The first registered interceptor ends up outermost: it sees the call
/// first and the result last.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Wrap `terminal` (the link that actually runs activities).
    pub fn build(&self, terminal: Arc<dyn ActivityInbound>) -> Arc<dyn ActivityInbound> {
        self.interceptors
            .iter()
            .rev()
            .fold(terminal, |next, interceptor| {
                interceptor.intercept_activity(next)
            })
    }
}
