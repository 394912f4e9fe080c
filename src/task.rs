//! Spawning helpers that carry the current [`Context`] into the new task.
//!
//! A plain `tokio::spawn` starts the child unbound. These helpers capture
//! [`Context::current`] at spawn time and bind that snapshot for the child's
//! whole lifetime; later changes in the parent are not seen by the child.

use crate::context::Context;
use crate::propagation::ContextFutureExt;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::trace;

/// Spawns `future` on the Tokio runtime, inheriting the current context.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime, like `tokio::spawn`.
///
/// ```
/// use sovran_context::{task, Context, Contextual};
///
/// enum Attempt {}
/// impl Contextual for Attempt {
///     type Value = u32;
/// }
///
/// tokio_test::block_on(async {
///     let context = Context::root().with::<Attempt>(2);
///     let handle = Context::with_value(Some(context), || {
///         task::spawn(async { Context::current().and_then(|c| c.get::<Attempt>().copied()) })
///     });
///     assert_eq!(handle.await.unwrap(), Some(2));
/// });
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let inherited = Context::current();
    trace!(inherited = inherited.is_some(), "spawning task");
    tokio::spawn(future.with_context(inherited))
}

/// Runs `f` on Tokio's blocking pool, inheriting the current context.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
pub fn spawn_blocking<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let inherited = Context::current();
    trace!(inherited = inherited.is_some(), "spawning blocking task");
    tokio::task::spawn_blocking(move || Context::with_value(inherited, f))
}
