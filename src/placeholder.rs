use crate::context::Context;
use crate::key::Contextual;
use std::fmt;
use std::panic::Location;

/// Whether this build was compiled with the `strict` feature, turning every
/// placeholder context into a process abort.
pub const STRICT_PLACEHOLDERS: bool = cfg!(feature = "strict");

/// Carried by a placeholder context.
///
/// Records where the placeholder was created so the call site can be found
/// and replaced by proper context propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    /// Source file where the placeholder context was created
    pub file: &'static str,
    /// Source line where the placeholder context was created
    pub line: u32,
    /// Module that created the placeholder, when known
    pub module: Option<&'static str>,
    /// Why a placeholder was used instead of a propagated context
    pub reason: &'static str,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(module) = self.module {
            write!(f, " (module {})", module)?;
        }
        write!(f, ", reason: {}", self.reason)
    }
}

enum PlaceholderKey {}

impl Contextual for PlaceholderKey {
    type Value = Placeholder;
    const OVERRIDE: Option<&'static str> = Some("Placeholder");
}

/// Creates a placeholder context recording the calling module, file and line.
///
/// Expands to [`Context::placeholder_in`]; see [`Context::placeholder`].
///
/// ```
/// # #[cfg(not(feature = "strict"))] {
/// let context = sovran_context::placeholder!("cron trigger has no request");
/// assert_eq!(context.placeholder_origin().unwrap().module, Some(module_path!()));
/// # }
/// ```
#[macro_export]
macro_rules! placeholder {
    ($reason:expr) => {
        $crate::Context::placeholder_in($reason, module_path!(), file!(), line!())
    };
}

impl Context {
    /// A context intended as a placeholder until a real one can be passed
    /// through.
    ///
    /// Only use this while prototyping, or where a library on the call path
    /// does not hand a context on yet. The returned context records the
    /// caller's file and line, see [`placeholder_origin`](Context::placeholder_origin).
    ///
    /// ```
    /// # #[cfg(not(feature = "strict"))] {
    /// use sovran_context::Context;
    ///
    /// let context = Context::placeholder("queue consumer does not pass a context yet");
    /// let origin = context.placeholder_origin().unwrap();
    /// assert_eq!(origin.file, file!());
    /// # }
    /// ```
    ///
    /// # Aborts
    ///
    /// When built with the `strict` feature this writes the caller's location
    /// to stderr and aborts the process.
    #[track_caller]
    pub fn placeholder(reason: &'static str) -> Self {
        let location = Location::caller();
        Self::placeholder_at(reason, location.file(), location.line())
    }

    /// Like [`placeholder`](Context::placeholder), with an explicit origin.
    ///
    /// # Aborts
    ///
    /// When built with the `strict` feature this always aborts the process.
    pub fn placeholder_at(reason: &'static str, file: &'static str, line: u32) -> Self {
        mark(Placeholder {
            file,
            line,
            module: None,
            reason,
        })
    }

    /// Like [`placeholder_at`](Context::placeholder_at), also naming the
    /// creating module. Usually reached through [`placeholder!`].
    ///
    /// # Aborts
    ///
    /// When built with the `strict` feature this always aborts the process.
    pub fn placeholder_in(
        reason: &'static str,
        module: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        mark(Placeholder {
            file,
            line,
            module: Some(module),
            reason,
        })
    }

    /// Where this context was created, if it is a placeholder
    pub fn placeholder_origin(&self) -> Option<&Placeholder> {
        self.get::<PlaceholderKey>()
    }

    /// Returns true if this context was created as a placeholder
    pub fn is_placeholder(&self) -> bool {
        self.contains::<PlaceholderKey>()
    }
}

#[cfg(not(feature = "strict"))]
fn mark(origin: Placeholder) -> Context {
    tracing::warn!(
        file = origin.file,
        line = origin.line,
        module = origin.module,
        reason = origin.reason,
        "placeholder context created"
    );
    Context::root().with::<PlaceholderKey>(origin)
}

// Must not unwind; a panic here could be caught or confined to one Tokio task.
#[cfg(feature = "strict")]
fn mark(origin: Placeholder) -> Context {
    use std::io::Write;

    tracing::error!(
        file = origin.file,
        line = origin.line,
        module = origin.module,
        reason = origin.reason,
        "placeholder context created in strict build"
    );
    let _ = writeln!(
        std::io::stderr(),
        "placeholder context created @ {}",
        origin
    );
    std::process::abort()
}
