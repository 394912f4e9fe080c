use crate::error::ContextError;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

type DebugFn = fn(&(dyn Any + Send + Sync), &mut fmt::Formatter<'_>) -> fmt::Result;

/// A type-erased value stored in a [`Context`](crate::Context).
///
/// The value keeps its runtime type tag next to it, so it can be recovered
/// through [`downcast_ref`](ContextValue::downcast_ref). Cloning shares the
/// underlying value.
#[derive(Clone)]
pub struct ContextValue {
    type_id: TypeId,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
    debug: DebugFn,
}

impl ContextValue {
    /// Wraps a value, recording its type
    pub(crate) fn new<T: Any + fmt::Debug + Send + Sync>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            value: Arc::new(value),
            debug: debug_value::<T>,
        }
    }

    /// Check if the contained value is of type T
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Get a reference to the contained value if it is of type T
    ///
    /// # Errors
    ///
    /// Returns `ContextError::TypeMismatch` if the value is not a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Result<&T, ContextError> {
        if !self.is::<T>() {
            return Err(self.mismatch::<T>());
        }
        self.value
            .downcast_ref::<T>()
            .ok_or_else(|| self.mismatch::<T>())
    }

    /// The `TypeId` of the stored value
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The full type name of the stored value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn mismatch<T: 'static>(&self) -> ContextError {
        ContextError::TypeMismatch {
            expected: type_name::<T>(),
            found: self.type_name,
        }
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.value, f)
    }
}

fn debug_value<T: Any + fmt::Debug>(
    value: &(dyn Any + Send + Sync),
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(value) => fmt::Debug::fmt(value, f),
        None => f.write_str("<unknown>"),
    }
}
