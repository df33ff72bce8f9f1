pub mod context_menu;
pub mod registry;

pub use context_menu::{ContextMenuItem, ContextMenuModel, build_context_menu};
pub use registry::CommandRegistry;

use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether a command applies to a context.
pub type CommandPredicate = Arc<dyn Fn(&CommandContext) -> bool + Send + Sync + 'static>;

/// Action run when a command is invoked.
pub type CommandAction = Arc<dyn Fn(&CommandContext) + Send + Sync + 'static>;

/// Where/when a command was requested (e.g. the chart point under a right-click).
///
/// Every field is optional: not every invocation site knows the full
/// spatial/temporal position. Absent means "unknown", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CommandContext {
    /// Unix seconds under the pointer.
    pub time: Option<i64>,
    /// Price under the pointer.
    pub price: Option<f64>,
    /// Fractional bar index under the pointer.
    pub logical_index: Option<f64>,
}

pub struct Command {
    id: String,
    label: String,
    shortcut: Option<String>,
    /// Icon name; the UI layer decides how to draw it.
    icon: Option<String>,
    when: Option<CommandPredicate>,
    run: CommandAction,
}

impl Command {
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, run: F) -> Self
    where
        F: Fn(&CommandContext) + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            shortcut: None,
            icon: None,
            when: None,
            run: Arc::new(run),
        }
    }

    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&CommandContext) -> bool + Send + Sync + 'static,
    {
        self.when = Some(Arc::new(predicate));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shortcut_hint(&self) -> Option<&str> {
        self.shortcut.as_deref()
    }

    pub fn icon_name(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// True when there is no predicate or the predicate accepts `ctx`.
    pub fn applies_to(&self, ctx: &CommandContext) -> bool {
        self.when.as_ref().is_none_or(|p| p(ctx))
    }

    pub fn run(&self, ctx: &CommandContext) {
        (self.run)(ctx)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("shortcut", &self.shortcut)
            .field("icon", &self.icon)
            .field("has_when", &self.when.is_some())
            .finish_non_exhaustive()
    }
}
