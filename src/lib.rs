//! # sovran-context
//!
//! A type-safe, heterogeneous context container for request- and task-scoped
//! metadata.
//!
//! `sovran-context` carries values such as trace ids, deadlines or feature flags
//! through a call graph without every function signature needing to know about
//! every value. Each slot is identified by a key descriptor type, so values are
//! statically typed even though one container holds many unrelated types.
//!
//! ## Key Features
//!
//! - **Type-safe**: Each key declares its value type; reads never need a cast
//! - **Value semantics**: Cloning is cheap and copies never affect each other
//! - **Task propagation**: Bind a context to the running Tokio task and read it anywhere below
//! - **Placeholder tracking**: Stand-in contexts record where they were created, and
//!   the `strict` feature turns them into a process abort
//!
//! ## Usage Examples
//!
//! ### Defining Keys and Accessors
//!
//! Key authors define a descriptor and expose a named accessor instead of the
//! descriptor itself. This keeps control over who may read and who may write.
//!
//! ```rust
//! use sovran_context::{Context, Contextual};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! pub struct TraceId(pub String);
//!
//! enum TraceIdKey {}
//!
//! impl Contextual for TraceIdKey {
//!     type Value = TraceId;
//!     const OVERRIDE: Option<&'static str> = Some("trace-id");
//! }
//!
//! pub trait TraceContext {
//!     fn trace_id(&self) -> Option<&TraceId>;
//!     fn set_trace_id(&mut self, trace_id: Option<TraceId>);
//! }
//!
//! impl TraceContext for Context {
//!     fn trace_id(&self) -> Option<&TraceId> {
//!         self.get::<TraceIdKey>()
//!     }
//!
//!     fn set_trace_id(&mut self, trace_id: Option<TraceId>) {
//!         self.set::<TraceIdKey>(trace_id)
//!     }
//! }
//!
//! let mut context = Context::root();
//! context.set_trace_id(Some(TraceId("4bf92f35".to_string())));
//!
//! assert_eq!(context.trace_id(), Some(&TraceId("4bf92f35".to_string())));
//! assert_eq!(context.len(), 1);
//! ```
//!
//! ### Inspecting a Context
//!
//! ```rust
//! use sovran_context::{Context, Contextual};
//!
//! enum Attempt {}
//! impl Contextual for Attempt {
//!     type Value = u32;
//! }
//!
//! enum Region {}
//! impl Contextual for Region {
//!     type Value = String;
//! }
//!
//! let context = Context::root()
//!     .with::<Attempt>(2)
//!     .with::<Region>("eu-west-1".to_string());
//!
//! // Order is unspecified
//! let mut names: Vec<String> = context.iter().map(|(key, _)| key.name().into_owned()).collect();
//! names.sort();
//! assert_eq!(names, ["Attempt", "Region"]);
//!
//! for (key, value) in context.map() {
//!     if key.is::<Attempt>() {
//!         assert_eq!(value.downcast_ref::<u32>(), Ok(&2));
//!     }
//! }
//! ```
//!
//! ### Propagating Through Tasks
//!
//! ```rust
//! use sovran_context::{task, Context, Contextual};
//!
//! enum RequestId {}
//! impl Contextual for RequestId {
//!     type Value = u64;
//! }
//!
//! fn request_id() -> Option<u64> {
//!     Context::current().and_then(|context| context.get::<RequestId>().copied())
//! }
//!
//! tokio_test::block_on(async {
//!     let context = Context::root().with::<RequestId>(42);
//!
//!     Context::with_value_async(Some(context), async {
//!         assert_eq!(request_id(), Some(42));
//!
//!         // Children spawned through `task::spawn` inherit the binding
//!         let child = task::spawn(async { request_id() });
//!         assert_eq!(child.await.unwrap(), Some(42));
//!     })
//!     .await;
//!
//!     assert_eq!(request_id(), None);
//! });
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_context::{Context, ContextError};
//!
//! match Context::try_current() {
//!     Ok(context) => println!("Current context: {:?}", context),
//!     Err(ContextError::NoCurrentContext) => println!("No context bound"),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

mod any_value;
mod context;
mod error;
mod key;
mod placeholder;
mod propagation;
pub mod task;

pub use any_value::ContextValue;
pub use context::{Context, Iter};
pub use error::ContextError;
pub use key::{Contextual, Keyer};
pub use placeholder::{Placeholder, STRICT_PLACEHOLDERS};
pub use propagation::ContextFutureExt;
