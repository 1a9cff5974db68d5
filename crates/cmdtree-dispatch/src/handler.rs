//! Command handler types.
//!
//! A node in the command tree owns one [`Handler`], which is one of:
//!
//! - [`Handler::Plain`]: a function that always runs with the arguments it is given
//! - [`Handler::Gated`]: a function guarded by a minimum argument count, with a
//!   fallback (usually a help renderer) when the count is not met
//! - [`Handler::Nested`]: another [`CommandTree`], dispatched recursively
//!
//! Subcommand maps hold an [`Entry`], which is either a handler or a value that
//! cannot be run. Reaching the latter produces
//! [`DispatchError::InvalidHandler`](crate::DispatchError::InvalidHandler).
//!
//! Handler functions are stored behind `Arc` and must be `Send + Sync`, so a
//! finished tree can be cloned cheaply and shared across threads.

use std::fmt;
use std::sync::Arc;

use crate::tree::CommandTree;

/// The handler function signature.
///
/// Takes the argument list that reached the handler and returns the command's
/// result. Errors are opaque to the dispatcher.
pub type HandlerFn<T> = Arc<dyn Fn(&[String]) -> anyhow::Result<T> + Send + Sync>;

/// Creates a handler function from a closure.
///
/// The closure may return any error type convertible into [`anyhow::Error`];
/// it is converted without adding context, so callers can still
/// `downcast_ref` to the original type.
pub fn from_fn<T, E, F>(f: F) -> HandlerFn<T>
where
    F: Fn(&[String]) -> Result<T, E> + Send + Sync + 'static,
    E: Into<anyhow::Error> + 'static,
    T: 'static,
{
    Arc::new(move |args: &[String]| f(args).map_err(Into::into))
}

/// A handler guarded by a minimum argument count.
///
/// The same `min_args` value plays two roles:
///
/// - during descent it is the number of leading arguments reserved before the
///   subcommand token (see [`CommandTree::gate`])
/// - at invocation it is the threshold for running `invoke` instead of `fallback`
///
/// A `min_args` of zero reserves nothing *and* always runs the fallback. This is
/// what router-only nodes want ("a subcommand is required"), but it means a node
/// cannot express "no minimum, still run `invoke`". Use [`Handler::Plain`] for that.
pub struct Gated<T> {
    invoke: HandlerFn<T>,
    min_args: usize,
    fallback: HandlerFn<T>,
}

impl<T> Gated<T> {
    /// Creates a gated handler from closures.
    pub fn new<I, F, E1, E2>(min_args: usize, invoke: I, fallback: F) -> Self
    where
        I: Fn(&[String]) -> Result<T, E1> + Send + Sync + 'static,
        F: Fn(&[String]) -> Result<T, E2> + Send + Sync + 'static,
        E1: Into<anyhow::Error> + 'static,
        E2: Into<anyhow::Error> + 'static,
        T: 'static,
    {
        Self::from_parts(min_args, from_fn(invoke), from_fn(fallback))
    }

    /// Creates a gated handler from already-shared handler functions.
    ///
    /// Useful when several nodes share one fallback.
    pub fn from_parts(min_args: usize, invoke: HandlerFn<T>, fallback: HandlerFn<T>) -> Self {
        Self {
            invoke,
            min_args,
            fallback,
        }
    }

    /// The minimum argument count.
    pub fn min_args(&self) -> usize {
        self.min_args
    }

    /// Returns true if `run` would call `invoke` for these arguments.
    pub fn will_invoke(&self, args: &[String]) -> bool {
        self.min_args != 0 && args.len() >= self.min_args
    }

    /// Runs `invoke` when enough arguments are present, `fallback` otherwise.
    pub fn run(&self, args: &[String]) -> anyhow::Result<T> {
        if self.will_invoke(args) {
            (self.invoke)(args)
        } else {
            (self.fallback)(args)
        }
    }
}

impl<T> Clone for Gated<T> {
    fn clone(&self) -> Self {
        Self {
            invoke: Arc::clone(&self.invoke),
            min_args: self.min_args,
            fallback: Arc::clone(&self.fallback),
        }
    }
}

impl<T> fmt::Debug for Gated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gated")
            .field("min_args", &self.min_args)
            .finish_non_exhaustive()
    }
}

/// The handler owned by a tree node.
pub enum Handler<T> {
    /// Runs directly with the given arguments.
    Plain(HandlerFn<T>),
    /// Runs `invoke` or `fallback` depending on the argument count.
    Gated(Gated<T>),
    /// Dispatches into another tree with the same arguments.
    Nested(Box<CommandTree<T>>),
}

impl<T> Handler<T> {
    /// Creates a plain handler from a closure.
    pub fn plain<E, F>(f: F) -> Self
    where
        F: Fn(&[String]) -> Result<T, E> + Send + Sync + 'static,
        E: Into<anyhow::Error> + 'static,
        T: 'static,
    {
        Handler::Plain(from_fn(f))
    }

    /// Creates a gated handler from closures.
    pub fn gated<I, F, E1, E2>(min_args: usize, invoke: I, fallback: F) -> Self
    where
        I: Fn(&[String]) -> Result<T, E1> + Send + Sync + 'static,
        F: Fn(&[String]) -> Result<T, E2> + Send + Sync + 'static,
        E1: Into<anyhow::Error> + 'static,
        E2: Into<anyhow::Error> + 'static,
        T: 'static,
    {
        Handler::Gated(Gated::new(min_args, invoke, fallback))
    }

    /// Wraps a tree so it can be used as a handler.
    pub fn nested(tree: CommandTree<T>) -> Self {
        Handler::Nested(Box::new(tree))
    }

    /// Returns true if this is a plain handler.
    pub fn is_plain(&self) -> bool {
        matches!(self, Handler::Plain(_))
    }

    /// Returns true if this is a gated handler.
    pub fn is_gated(&self) -> bool {
        matches!(self, Handler::Gated(_))
    }

    /// Returns true if this is a nested tree.
    pub fn is_nested(&self) -> bool {
        matches!(self, Handler::Nested(_))
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        match self {
            Handler::Plain(f) => Handler::Plain(Arc::clone(f)),
            Handler::Gated(g) => Handler::Gated(g.clone()),
            Handler::Nested(tree) => Handler::Nested(tree.clone()),
        }
    }
}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Plain(_) => f.write_str("Plain(..)"),
            Handler::Gated(g) => f.debug_tuple("Gated").field(g).finish(),
            Handler::Nested(tree) => f.debug_tuple("Nested").field(tree).finish(),
        }
    }
}

impl<T> From<Gated<T>> for Handler<T> {
    fn from(gated: Gated<T>) -> Self {
        Handler::Gated(gated)
    }
}

impl<T> From<CommandTree<T>> for Handler<T> {
    fn from(tree: CommandTree<T>) -> Self {
        Handler::nested(tree)
    }
}

/// A value stored in a subcommand map.
pub enum Entry<T> {
    /// A runnable handler or nested tree.
    Handler(Handler<T>),
    /// A value that is neither; reaching it is a tree construction error.
    ///
    /// The string describes the offending value and is carried into the error.
    Invalid(String),
}

impl<T> Entry<T> {
    /// Creates an entry that fails when dispatched to.
    pub fn invalid(value: impl Into<String>) -> Self {
        Entry::Invalid(value.into())
    }

    /// Returns the handler, if this entry holds one.
    pub fn handler(&self) -> Option<&Handler<T>> {
        match self {
            Entry::Handler(h) => Some(h),
            Entry::Invalid(_) => None,
        }
    }

    /// Returns true if dispatching into this entry fails.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Entry::Invalid(_))
    }
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        match self {
            Entry::Handler(h) => Entry::Handler(h.clone()),
            Entry::Invalid(v) => Entry::Invalid(v.clone()),
        }
    }
}

impl<T> fmt::Debug for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Handler(h) => fmt::Debug::fmt(h, f),
            Entry::Invalid(v) => f.debug_tuple("Invalid").field(v).finish(),
        }
    }
}

impl<T> From<Handler<T>> for Entry<T> {
    fn from(handler: Handler<T>) -> Self {
        Entry::Handler(handler)
    }
}

impl<T> From<Gated<T>> for Entry<T> {
    fn from(gated: Gated<T>) -> Self {
        Entry::Handler(Handler::Gated(gated))
    }
}

impl<T> From<CommandTree<T>> for Entry<T> {
    fn from(tree: CommandTree<T>) -> Self {
        Entry::Handler(Handler::nested(tree))
    }
}
