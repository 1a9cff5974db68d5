//! Hierarchical command dispatch.
//!
//! `cmdtree-dispatch` routes a flat argument list to a handler by walking a
//! tree of named subcommands. It is a routing primitive, not a CLI framework:
//! it does not parse flags, validate argument types or generate help text.
//!
//! # Features
//!
//! - **Tree routing**: each level consumes at most one token, so
//!   `tool <sub1> <sub2> <leaf-args...>` maps to nested [`CommandTree`]s
//! - **Minimum-argument gating**: [`Gated`] handlers run a fallback (usually
//!   help) when too few arguments are present
//! - **Prefix reservation**: a gated node reserves its first `min_args` tokens
//!   and matches the subcommand right after them
//! - **Dry resolution**: [`CommandTree::resolve`] reports where arguments would
//!   go without running anything
//!
//! # Usage
//!
//! ```rust
//! use cmdtree_dispatch::{CommandTree, Handler};
//!
//! let help = |args: &[String]| Ok::<_, anyhow::Error>(format!("usage ({} args)", args.len()));
//!
//! let tree = CommandTree::new(Handler::plain(help))
//!     .subcommand(
//!         "remote",
//!         CommandTree::new(Handler::gated(0, help, help))
//!             .subcommand("add", Handler::gated(
//!                 2,
//!                 |args: &[String]| Ok::<_, anyhow::Error>(format!("{} -> {}", args[0], args[1])),
//!                 help,
//!             )),
//!     );
//!
//! assert_eq!(tree.dispatch_from(["remote", "add", "origin", "url"])?, "origin -> url");
//! assert_eq!(tree.dispatch_from(["remote", "add"])?, "usage (0 args)");
//! assert_eq!(tree.dispatch_from(["remote", "rename"])?, "usage (1 args)");
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Errors
//!
//! Handler errors come back unchanged. The dispatcher's own error,
//! [`DispatchError::InvalidHandler`], is raised when the walk reaches an
//! [`Entry::Invalid`] and is returned inside the [`anyhow::Error`]; use
//! `downcast_ref::<DispatchError>()` to tell it apart.

mod error;
mod handler;
mod path;
mod tree;

pub use error::DispatchError;

pub use handler::{from_fn, Entry, Gated, Handler, HandlerFn};

pub use path::{path_to_string, remove_at};

pub use tree::{Action, CommandTree, Resolution};
