use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::{Command, CommandContext};
use crate::error::CommandError;
use crate::registration::Registration;

type Commands = RwLock<Vec<Arc<Command>>>;

/// Predicate-filtered action list (e.g. for a context menu).
///
/// Pure filter: no I/O, no state beyond the registered commands.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: Arc<Commands>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with `DuplicateId` on collision; the prior command is kept.
    pub fn register(&self, cmd: Command) -> Result<Registration, CommandError> {
        let mut commands = self.commands.write();

        if commands.iter().any(|c| c.id() == cmd.id()) {
            warn!(command_id = %cmd.id(), "duplicate command registration rejected");
            return Err(CommandError::DuplicateId(cmd.id().to_string()));
        }

        let entry = Arc::new(cmd);
        let id = entry.id().to_string();
        commands.push(Arc::clone(&entry));
        debug!(command_id = %id, "command registered");

        let table: Weak<Commands> = Arc::downgrade(&self.commands);
        let target: Weak<Command> = Arc::downgrade(&entry);

        Ok(Registration::new(id, move || {
            let Some(table) = table.upgrade() else {
                return false;
            };
            let mut commands = table.write();
            let before = commands.len();
            commands.retain(|c| !std::ptr::eq(Arc::as_ptr(c), target.as_ptr()));
            before != commands.len()
        }))
    }

    /// Commands whose predicate is absent or accepts `ctx`, in registration order.
    pub fn list(&self, ctx: &CommandContext) -> Vec<Arc<Command>> {
        self.commands
            .read()
            .iter()
            .filter(|c| c.applies_to(ctx))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }
}
