use std::any::{type_name, Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A key descriptor identifying one slot of a [`Context`](crate::Context).
///
/// Descriptors are never instantiated; their identity is their type. The
/// usual shape is an uninhabited enum:
///
/// ```
/// use sovran_context::Contextual;
///
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct TraceId(pub String);
///
/// enum TraceIdKey {}
///
/// impl Contextual for TraceIdKey {
///     type Value = TraceId;
///     const OVERRIDE: Option<&'static str> = Some("trace-id");
/// }
/// ```
///
/// Two descriptors are always distinct slots, even when they share a value
/// type or an override name.
pub trait Contextual: 'static {
    /// The type of value stored under this key
    type Value: Any + fmt::Debug + Send + Sync;

    /// Human-readable name used instead of the type name when the key is printed.
    const OVERRIDE: Option<&'static str> = None;
}

/// A type-erased handle for a [`Contextual`] key.
///
/// Equality and hashing only consider the descriptor's type; the name is
/// cosmetic.
#[derive(Clone, Copy)]
pub struct Keyer {
    type_id: TypeId,
    type_name: &'static str,
    override_name: Option<&'static str>,
}

impl Keyer {
    /// Builds the handle for descriptor `K`
    #[inline]
    pub fn of<K: Contextual>() -> Self {
        Self {
            type_id: TypeId::of::<K>(),
            type_name: type_name::<K>(),
            override_name: K::OVERRIDE,
        }
    }

    /// The display name: the override if one is set, otherwise the
    /// descriptor's type name without module paths.
    pub fn name(&self) -> Cow<'static, str> {
        match self.override_name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(short_type_name(self.type_name)),
        }
    }

    /// The descriptor's `TypeId`
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The descriptor's full type name, including module paths
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if this handle was built from descriptor `K`
    pub fn is<K: Contextual>(&self) -> bool {
        self.type_id == TypeId::of::<K>()
    }
}

impl PartialEq for Keyer {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Keyer {}

impl Hash for Keyer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for Keyer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for Keyer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyer({})", self.name())
    }
}

/// Strips module paths from every segment of a type name, so
/// `app::keys::Tag<app::Id>` becomes `Tag<Id>`.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push(c);
            segment_start = out.len();
        }
    }
    out
}
