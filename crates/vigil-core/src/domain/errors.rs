//! Errors - activity の失敗を表すハンドル
//!
//! interceptor はエラーを観測して報告したあと、**同じオブジェクト**を
//! そのまま返す必要がある。`Arc` で包むことで clone しても同一性を保ち、
//! `ptr_eq` で確認できる。

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Failure returned by an activity (or by any link of the interceptor chain).
///
/// Cloning shares the underlying error; no wrapping or message change ever
/// happens when it passes through an interceptor.
#[derive(Clone)]
pub struct ActivityError {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

/// Plain message error, for activities that fail without a typed error.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MessageError(pub String);

impl ActivityError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(MessageError(message.into()))
    }

    /// True when both handles point at the same error object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Debug for ActivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl fmt::Display for ActivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl StdError for ActivityError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}
