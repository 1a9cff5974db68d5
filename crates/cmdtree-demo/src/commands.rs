//! The `cmdtree` command tree.
//!
//! ```text
//! cmdtree                              usage
//! cmdtree list                         target names
//! cmdtree dump                         the whole file as YAML
//! cmdtree target                       target usage
//! cmdtree target create <name> <type>
//! cmdtree target show <name>
//! cmdtree target delete <name>
//! cmdtree target set <name> <key> <value>
//! cmdtree target get <name> <key>
//! cmdtree target unset <name> <key>
//! ```
//!
//! Handlers share one [`Session`] holding the loaded config. Commands that
//! change it mark the session dirty; the caller persists it afterwards.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail};
use cmdtree_config::ConfigFile;
use cmdtree_dispatch::{CommandTree, Gated, Handler};

pub const USAGE: &str = "\
usage: cmdtree [--config <PATH>] [-v] <command> [args...]

commands:
  list     list target names
  dump     print the config file
  target   manage targets (run `cmdtree target` for details)";

pub const TARGET_USAGE: &str = "\
usage: cmdtree target <command> [args...]

commands:
  create <name> <type>         add a target
  show <name>                  print a target's values
  delete <name>                remove a target
  set <name> <key> <value>     assign a value
  get <name> <key>             print a value
  unset <name> <key>           remove a value";

/// The loaded config plus a flag recording unsaved changes.
#[derive(Debug)]
pub struct Session {
    config: ConfigFile,
    dirty: bool,
}

/// A session shared by every handler in the tree.
pub type SharedSession = Arc<Mutex<Session>>;

impl Session {
    /// Wraps a freshly loaded config with no unsaved changes.
    pub fn new(config: ConfigFile) -> Self {
        Self {
            config,
            dirty: false,
        }
    }

    /// Creates a session ready to hand to [`build`].
    pub fn shared(config: ConfigFile) -> SharedSession {
        Arc::new(Mutex::new(Self::new(config)))
    }

    /// The current config, including unsaved changes.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Returns true if a command changed the config since it was loaded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn config_mut(&mut self) -> &mut ConfigFile {
        self.dirty = true;
        &mut self.config
    }
}

type Reply = anyhow::Result<String>;

fn lock(session: &SharedSession) -> anyhow::Result<MutexGuard<'_, Session>> {
    session
        .lock()
        .map_err(|_| anyhow!("config session is unusable after a failed command"))
}

/// Builds the command tree over a shared session.
pub fn build(session: SharedSession) -> CommandTree<String> {
    let target = CommandTree::new(Handler::gated(0, target_help, target_help))
        .subcommand("create", gated(2, "create <name> <type>", &session, create))
        .subcommand("show", gated(1, "show <name>", &session, show))
        .subcommand("delete", gated(1, "delete <name>", &session, delete))
        .subcommand("set", gated(3, "set <name> <key> <value>", &session, set))
        .subcommand("get", gated(2, "get <name> <key>", &session, get))
        .subcommand("unset", gated(2, "unset <name> <key>", &session, unset));

    CommandTree::new(Handler::plain(root_help))
        .subcommand("list", plain(&session, list))
        .subcommand("dump", plain(&session, dump))
        .subcommand("target", target)
}

// Binds a session-aware command to the session.
fn bind(
    session: &SharedSession,
    command: fn(&mut Session, &[String]) -> Reply,
) -> impl Fn(&[String]) -> Reply + Send + Sync + 'static {
    let session = Arc::clone(session);
    move |args: &[String]| {
        let mut guard = lock(&session)?;
        command(&mut guard, args)
    }
}

fn plain(session: &SharedSession, command: fn(&mut Session, &[String]) -> Reply) -> Handler<String> {
    Handler::plain(bind(session, command))
}

fn gated(
    min_args: usize,
    synopsis: &'static str,
    session: &SharedSession,
    command: fn(&mut Session, &[String]) -> Reply,
) -> Gated<String> {
    Gated::new(min_args, bind(session, command), move |_args: &[String]| -> Reply {
        bail!("usage: cmdtree target {}", synopsis)
    })
}

fn root_help(args: &[String]) -> Reply {
    match args.first() {
        None => Ok(USAGE.to_string()),
        Some(unknown) => bail!("unknown command {:?}\n\n{}", unknown, USAGE),
    }
}

fn target_help(args: &[String]) -> Reply {
    match args.first() {
        None => Ok(TARGET_USAGE.to_string()),
        Some(unknown) => bail!("unknown target command {:?}\n\n{}", unknown, TARGET_USAGE),
    }
}

fn list(session: &mut Session, _args: &[String]) -> Reply {
    Ok(session.config().names().join("\n"))
}

fn dump(session: &mut Session, _args: &[String]) -> Reply {
    Ok(session.config().to_string().trim_end().to_string())
}

fn create(session: &mut Session, args: &[String]) -> Reply {
    let (name, store_type) = (&args[0], &args[1]);
    if session.config().target(name).is_ok() {
        bail!("target {} already exists", name);
    }
    session.config_mut().create(name.as_str(), store_type.as_str());
    Ok(format!("created target {} ({})", name, store_type))
}

fn show(session: &mut Session, args: &[String]) -> Reply {
    let target = session.config().target(&args[0])?;
    let lines: Vec<String> = target.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
    Ok(lines.join("\n"))
}

fn delete(session: &mut Session, args: &[String]) -> Reply {
    let name = &args[0];
    session.config().target(name)?;
    session.config_mut().delete(name);
    Ok(format!("deleted target {}", name))
}

fn set(session: &mut Session, args: &[String]) -> Reply {
    let (name, key, value) = (&args[0], &args[1], &args[2]);
    session.config().target(name)?;
    session
        .config_mut()
        .target_mut(name)?
        .set(key.as_str(), value.as_str());
    Ok(format!("{}.{} = {}", name, key, value))
}

fn get(session: &mut Session, args: &[String]) -> Reply {
    let (name, key) = (&args[0], &args[1]);
    session
        .config()
        .target(name)?
        .get(key)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("{} is not set on target {}", key, name))
}

fn unset(session: &mut Session, args: &[String]) -> Reply {
    let (name, key) = (&args[0], &args[1]);
    if !session.config().target(name)?.contains(key) {
        bail!("{} is not set on target {}", key, name);
    }
    session.config_mut().target_mut(name)?.delete(key);
    Ok(format!("unset {}.{}", name, key))
}
