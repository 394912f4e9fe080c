//! Ambient binding of a [`Context`] to the running task.
//!
//! The binding lives in a Tokio task-local slot. Synchronous code sees it
//! through the thread the task is polled on, so the same slot serves both
//! [`Context::with_value`] and [`Context::with_value_async`]. Bindings nest and
//! are restored in reverse order, including on panic unwind and when a
//! scoped future is dropped before completion.

use crate::context::Context;
use crate::error::ContextError;
use std::future::Future;
use tokio::task::futures::TaskLocalFuture;
use tracing::trace;

tokio::task_local! {
    static CURRENT: Option<Context>;
}

impl Context {
    /// The context bound to the calling task, if any.
    ///
    /// Bindings are made with [`with_value`](Context::with_value),
    /// [`with_value_async`](Context::with_value_async) or inherited through
    /// [`task::spawn`](crate::task::spawn).
    pub fn current() -> Option<Context> {
        CURRENT.try_with(|current| current.clone()).ok().flatten()
    }

    /// Like [`current`](Context::current), failing when nothing is bound.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::NoCurrentContext` if no context is bound.
    pub fn try_current() -> Result<Context, ContextError> {
        Self::current().ok_or(ContextError::NoCurrentContext)
    }

    /// Binds `value` as the current context while `operation` runs.
    ///
    /// The previous binding is restored when `operation` returns or panics.
    ///
    /// ```
    /// use sovran_context::Context;
    ///
    /// assert!(Context::current().is_none());
    /// let len = Context::with_value(Some(Context::root()), || {
    ///     Context::current().map(|context| context.len())
    /// });
    /// assert_eq!(len, Some(0));
    /// assert!(Context::current().is_none());
    /// ```
    pub fn with_value<R>(value: Option<Context>, operation: impl FnOnce() -> R) -> R {
        trace!(bound = value.is_some(), "binding current context");
        CURRENT.sync_scope(value, operation)
    }

    /// Binds `value` as the current context while `operation` is polled.
    ///
    /// The binding is only visible inside `operation`, across all of its
    /// suspension points. Dropping the returned future cancels `operation`
    /// without leaking the binding.
    ///
    /// ```
    /// use sovran_context::{Context, Contextual};
    ///
    /// enum Tenant {}
    /// impl Contextual for Tenant {
    ///     type Value = &'static str;
    /// }
    ///
    /// let context = Context::root().with::<Tenant>("acme");
    /// let tenant = tokio_test::block_on(Context::with_value_async(Some(context), async {
    ///     tokio::task::yield_now().await;
    ///     Context::current().and_then(|context| context.get::<Tenant>().copied())
    /// }));
    /// assert_eq!(tenant, Some("acme"));
    /// ```
    pub async fn with_value_async<F: Future>(value: Option<Context>, operation: F) -> F::Output {
        trace!(bound = value.is_some(), "binding current context");
        operation.with_context(value).await
    }
}

/// Extension methods binding a [`Context`] to a future.
pub trait ContextFutureExt: Future + Sized {
    /// Runs this future with `context` bound as the current context
    fn with_context(self, context: Option<Context>) -> TaskLocalFuture<Option<Context>, Self> {
        CURRENT.scope(context, self)
    }

    /// Runs this future with the context that is current now, wherever it
    /// is polled later
    fn in_current_context(self) -> TaskLocalFuture<Option<Context>, Self> {
        self.with_context(Context::current())
    }
}

impl<F: Future> ContextFutureExt for F {}
