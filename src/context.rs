use crate::any_value::ContextValue;
use crate::key::{Contextual, Keyer};
use std::collections::hash_map::{self, HashMap};
use std::fmt;
use std::sync::Arc;

/// A type-safe heterogeneous container for request- or task-scoped values.
///
/// `Context` maps [`Contextual`] key descriptors to values of their declared
/// type. It behaves as a plain value: cloning is cheap, and mutating a clone
/// never affects the original.
///
/// # Examples
///
/// ```
/// use sovran_context::{Context, Contextual};
///
/// enum RequestId {}
/// impl Contextual for RequestId {
///     type Value = u64;
/// }
///
/// let mut context = Context::root();
/// context.set::<RequestId>(Some(7));
///
/// let copy = context.clone();
/// context.set::<RequestId>(None);
///
/// assert_eq!(copy.get::<RequestId>(), Some(&7));
/// assert_eq!(context.get::<RequestId>(), None);
/// ```
#[derive(Clone, Default)]
pub struct Context {
    storage: Arc<HashMap<Keyer, ContextValue>>,
}

impl Context {
    /// Creates a new, empty top-level context.
    ///
    /// Frameworks create one of these where processing of a request, message
    /// or background task starts, and populate it before handing it on.
    /// Application code handling a request should be passed a context rather
    /// than create one.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the value stored for `K`, if any.
    ///
    /// Key authors usually wrap this in a named accessor rather than expose
    /// the descriptor itself.
    ///
    /// # Panics
    ///
    /// Panics if the stored value is not a `K::Value`. [`set`](Context::set)
    /// is the only write path, so this cannot happen through the public API.
    pub fn get<K: Contextual>(&self) -> Option<&K::Value> {
        let value = self.storage.get(&Keyer::of::<K>())?;
        match value.downcast_ref::<K::Value>() {
            Ok(value) => Some(value),
            Err(err) => panic!("corrupted context slot `{}`: {}", Keyer::of::<K>(), err),
        }
    }

    /// Stores `value` under `K`, or removes the slot when `value` is `None`.
    pub fn set<K: Contextual>(&mut self, value: Option<K::Value>) {
        let key = Keyer::of::<K>();
        match value {
            Some(value) => {
                Arc::make_mut(&mut self.storage).insert(key, ContextValue::new(value));
            }
            None => {
                if self.storage.contains_key(&key) {
                    Arc::make_mut(&mut self.storage).remove(&key);
                }
            }
        }
    }

    /// Stores `value` under `K`, replacing any previous value
    pub fn insert<K: Contextual>(&mut self, value: K::Value) {
        self.set::<K>(Some(value));
    }

    /// Removes the value stored under `K`.
    ///
    /// Returns `true` if a value was present.
    pub fn remove<K: Contextual>(&mut self) -> bool {
        let present = self.contains::<K>();
        self.set::<K>(None);
        present
    }

    /// Returns this context with `value` stored under `K`
    ///
    /// ```
    /// use sovran_context::{Context, Contextual};
    ///
    /// enum Tenant {}
    /// impl Contextual for Tenant {
    ///     type Value = String;
    /// }
    ///
    /// let context = Context::root().with::<Tenant>("acme".to_string());
    /// assert_eq!(context.get::<Tenant>().map(String::as_str), Some("acme"));
    /// ```
    #[must_use]
    pub fn with<K: Contextual>(mut self, value: K::Value) -> Self {
        self.insert::<K>(value);
        self
    }

    /// Returns true if a value is stored under `K`
    pub fn contains<K: Contextual>(&self) -> bool {
        self.storage.contains_key(&Keyer::of::<K>())
    }

    /// The number of items in the context
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the context holds no items
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Iterates over the stored entries in no particular order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.storage.iter(),
        }
    }

    /// Returns all stored entries.
    ///
    /// The order is unspecified and should not be relied on.
    pub fn items(&self) -> Vec<(Keyer, ContextValue)> {
        self.iter()
            .map(|(key, value)| (*key, value.clone()))
            .collect()
    }

    /// Returns a snapshot of the stored entries.
    ///
    /// Later changes to the context are not reflected in the returned map.
    pub fn map(&self) -> HashMap<Keyer, ContextValue> {
        self.storage.as_ref().clone()
    }

    /// Invokes `visit` once for every stored entry, in no particular order.
    ///
    /// Iteration stops at the first error, which is returned to the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_context::{Context, Contextual};
    ///
    /// enum Attempt {}
    /// impl Contextual for Attempt {
    ///     type Value = u32;
    /// }
    ///
    /// let context = Context::root().with::<Attempt>(3);
    ///
    /// let mut names = Vec::new();
    /// context.for_each(|key, _| {
    ///     names.push(key.name().into_owned());
    ///     Ok::<(), ()>(())
    /// })?;
    /// assert_eq!(names, ["Attempt"]);
    /// # Ok::<(), ()>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `visit`.
    pub fn for_each<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&Keyer, &ContextValue) -> Result<(), E>,
    {
        for (key, value) in self.storage.iter() {
            visit(key, value)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.storage.iter() {
            map.entry(&format_args!("{}", key), value);
        }
        map.finish()
    }
}

/// Iterator over the entries of a [`Context`]
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, Keyer, ContextValue>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Keyer, &'a ContextValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Context {
    type Item = (&'a Keyer, &'a ContextValue);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
