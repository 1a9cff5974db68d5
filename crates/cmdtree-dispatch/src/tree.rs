//! The command tree and the dispatch walk.
//!
//! # Routing Rules
//!
//! Each node looks at exactly one token. Given a node and an argument list:
//!
//! ```text
//! gate = min_args of the node's handler if it is Gated, else 0
//! if len(args) > gate and the node has subcommands:
//!     candidate = args[gate]
//!     if candidate names a subcommand:
//!         recurse into it with args minus the element at `gate`
//! otherwise run the node's own handler with args unchanged
//! ```
//!
//! So `tool remote add origin url` on a tree `remote -> add` reaches the `add`
//! handler with `["origin", "url"]`. A node whose handler reserves a prefix
//! (`min_args = 1`) matches the token right after that prefix:
//! `["pre", "sub", "rest"]` reaches `sub` with `["pre", "rest"]`.
//!
//! An unknown token is not an error; the current node's handler runs with the
//! full argument list, which is usually a help fallback.
//!
//! Dispatch never mutates the tree or the caller's argument slice. Each level
//! of descent gets its own copy of the shortened list.

use std::collections::HashMap;
use std::fmt;

use crate::error::DispatchError;
use crate::handler::{Entry, Gated, Handler, HandlerFn};
use crate::path::{path_to_string, remove_at};

/// A node in the command tree: a handler plus named subcommands.
///
/// Build the tree once, then dispatch as often as needed. A finished tree is
/// `Send + Sync` and can be dispatched from several threads at once.
///
/// # Example
///
/// ```rust
/// use cmdtree_dispatch::{CommandTree, Handler};
///
/// let tree = CommandTree::new(Handler::plain(|args: &[String]| {
///     Ok::<_, anyhow::Error>(format!("help {:?}", args))
/// }))
/// .subcommand(
///     "greet",
///     Handler::gated(
///         1,
///         |args: &[String]| Ok::<_, anyhow::Error>(format!("hello {}", args[0])),
///         |_args: &[String]| Ok::<_, anyhow::Error>("usage: greet <name>".to_string()),
///     ),
/// );
///
/// assert_eq!(tree.dispatch_from(["greet", "ada"])?, "hello ada");
/// assert_eq!(tree.dispatch_from(["greet"])?, "usage: greet <name>");
/// assert_eq!(tree.dispatch_from(["wave"])?, "help [\"wave\"]");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct CommandTree<T> {
    handler: Handler<T>,
    subcommands: HashMap<String, Entry<T>>,
}

impl<T> CommandTree<T> {
    /// Creates a leaf node with the given handler.
    pub fn new(handler: impl Into<Handler<T>>) -> Self {
        Self {
            handler: handler.into(),
            subcommands: HashMap::new(),
        }
    }

    /// Adds a subcommand.
    ///
    /// Names are unique; adding an existing name replaces its entry.
    pub fn subcommand(mut self, name: impl Into<String>, entry: impl Into<Entry<T>>) -> Self {
        self.subcommands.insert(name.into(), entry.into());
        self
    }

    /// Adds several subcommands at once.
    pub fn subcommands<I, S, E>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, E)>,
        S: Into<String>,
        E: Into<Entry<T>>,
    {
        self.subcommands
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The node's own handler.
    pub fn handler(&self) -> &Handler<T> {
        &self.handler
    }

    /// Looks up a subcommand by exact name.
    pub fn get(&self, name: &str) -> Option<&Entry<T>> {
        self.subcommands.get(name)
    }

    /// Returns true if the node has no subcommands.
    pub fn is_leaf(&self) -> bool {
        self.subcommands.is_empty()
    }

    /// Subcommand names in sorted order.
    pub fn subcommand_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.subcommands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of leading arguments reserved before the subcommand token.
    ///
    /// This is `min_args` when the node's handler is gated and zero otherwise.
    pub fn gate(&self) -> usize {
        match &self.handler {
            Handler::Gated(g) => g.min_args(),
            _ => 0,
        }
    }

    /// Walks the tree for `args` without running anything.
    ///
    /// Returns the handler that [`dispatch`](Self::dispatch) would run, along
    /// with the arguments it would receive and the subcommand names matched on
    /// the way. Fails only when the walk reaches an [`Entry::Invalid`].
    pub fn resolve(&self, args: &[String]) -> Result<Resolution<'_, T>, DispatchError> {
        self.resolve_into(args.to_vec(), Vec::new())
    }

    /// Routes `args` through the tree and runs the handler it reaches.
    ///
    /// Handler errors are returned unchanged. The only error the dispatcher
    /// raises itself is [`DispatchError::InvalidHandler`], wrapped in the
    /// returned [`anyhow::Error`].
    pub fn dispatch(&self, args: &[String]) -> anyhow::Result<T> {
        let resolution = self.resolve(args)?;
        resolution.invoke()
    }

    /// Like [`dispatch`](Self::dispatch), accepting any iterable of strings.
    pub fn dispatch_from<I, S>(&self, args: I) -> anyhow::Result<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.dispatch(&args)
    }

    /// Dispatches the process arguments, minus the program name.
    pub fn dispatch_env(&self) -> anyhow::Result<T> {
        self.dispatch_from(std::env::args().skip(1))
    }

    fn resolve_into(
        &self,
        args: Vec<String>,
        mut path: Vec<String>,
    ) -> Result<Resolution<'_, T>, DispatchError> {
        let gate = self.gate();
        if args.len() > gate && !self.subcommands.is_empty() {
            if let Some((name, entry)) = self.subcommands.get_key_value(&args[gate]) {
                path.push(name.clone());
                let rest = remove_at(&args, gate);
                tracing::trace!(
                    command = %path_to_string(&path),
                    gate,
                    remaining = rest.len(),
                    "descending into subcommand"
                );
                return resolve_entry(entry, rest, path);
            }
            tracing::trace!(token = %args[gate], gate, "no subcommand matched");
        }
        resolve_handler(&self.handler, args, path)
    }
}

fn resolve_entry<T>(
    entry: &Entry<T>,
    args: Vec<String>,
    path: Vec<String>,
) -> Result<Resolution<'_, T>, DispatchError> {
    match entry {
        Entry::Handler(handler) => resolve_handler(handler, args, path),
        Entry::Invalid(value) => Err(DispatchError::invalid_handler(args, value.as_str())),
    }
}

fn resolve_handler<T>(
    handler: &Handler<T>,
    args: Vec<String>,
    path: Vec<String>,
) -> Result<Resolution<'_, T>, DispatchError> {
    let target = match handler {
        Handler::Nested(tree) => return tree.resolve_into(args, path),
        Handler::Gated(g) => Target::Gated(g),
        Handler::Plain(f) => Target::Plain(f),
    };
    Ok(Resolution { path, args, target })
}

impl<T> Clone for CommandTree<T> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            subcommands: self.subcommands.clone(),
        }
    }
}

impl<T> fmt::Debug for CommandTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("handler", &self.handler)
            .field("subcommands", &self.subcommand_names())
            .finish()
    }
}

/// What a resolved handler will run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A plain handler.
    Plain,
    /// A gated handler with enough arguments; runs `invoke`.
    Invoke,
    /// A gated handler without enough arguments; runs `fallback`.
    Fallback,
}

enum Target<'a, T> {
    Plain(&'a HandlerFn<T>),
    Gated(&'a Gated<T>),
}

/// The outcome of walking the tree: a terminal handler and its arguments.
pub struct Resolution<'a, T> {
    path: Vec<String>,
    args: Vec<String>,
    target: Target<'a, T>,
}

impl<'a, T> Resolution<'a, T> {
    /// Subcommand names matched during descent, outermost first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The arguments the handler will receive.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// What [`invoke`](Self::invoke) will run.
    pub fn action(&self) -> Action {
        match self.target {
            Target::Plain(_) => Action::Plain,
            Target::Gated(g) if g.will_invoke(&self.args) => Action::Invoke,
            Target::Gated(_) => Action::Fallback,
        }
    }

    /// Runs the resolved handler.
    pub fn invoke(&self) -> anyhow::Result<T> {
        tracing::trace!(
            command = %path_to_string(&self.path),
            action = ?self.action(),
            args = self.args.len(),
            "invoking handler"
        );
        match self.target {
            Target::Plain(f) => f(self.args.as_slice()),
            Target::Gated(g) => g.run(&self.args),
        }
    }
}

impl<T> fmt::Debug for Resolution<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("path", &self.path)
            .field("args", &self.args)
            .field("action", &self.action())
            .finish()
    }
}
