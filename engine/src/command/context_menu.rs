use std::sync::Arc;

use super::{Command, CommandContext, CommandRegistry};

/// One entry of a context menu, bound to the context it was built for.
#[derive(Debug, Clone)]
pub struct ContextMenuItem {
    pub id: String,
    pub label: String,
    pub shortcut: Option<String>,
    pub disabled: bool,
    command: Arc<Command>,
    ctx: CommandContext,
}

impl ContextMenuItem {
    /// Runs the command with the captured context.
    ///
    /// `disabled` is a display hint only; whether a disabled item can be
    /// clicked is up to the menu widget.
    pub fn invoke(&self) {
        self.command.run(&self.ctx);
    }
}

/// Menu anchored at surface coordinates (`x`, `y`).
#[derive(Debug, Clone)]
pub struct ContextMenuModel {
    pub x: f64,
    pub y: f64,
    pub items: Vec<ContextMenuItem>,
}

impl ContextMenuModel {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Builds a menu from the commands applicable to `ctx`.
///
/// `disabled` re-evaluates each command's predicate, so a predicate that
/// changes its mind between listing and building shows up greyed out.
pub fn build_context_menu(
    registry: &CommandRegistry,
    ctx: CommandContext,
    x: f64,
    y: f64,
) -> ContextMenuModel {
    let items = registry
        .list(&ctx)
        .into_iter()
        .map(|command| ContextMenuItem {
            id: command.id().to_string(),
            label: command.label().to_string(),
            shortcut: command.shortcut_hint().map(str::to_string),
            disabled: !command.applies_to(&ctx),
            command,
            ctx,
        })
        .collect();

    ContextMenuModel { x, y, items }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn items_capture_context_and_invoke_command() {
        let reg = CommandRegistry::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        reg.register(
            Command::new("set-alert", "Set alert", move |ctx| {
                *sink.lock().unwrap() = ctx.price;
            })
            .shortcut("Alt+A")
            .when(|ctx| ctx.price.is_some()),
        )
        .unwrap();

        let ctx = CommandContext {
            time: Some(1_700_000_000),
            price: Some(42.5),
            logical_index: Some(12.3),
        };
        let menu = build_context_menu(&reg, ctx, 10.0, 20.0);

        assert_eq!((menu.x, menu.y), (10.0, 20.0));
        assert_eq!(menu.items.len(), 1);

        let item = &menu.items[0];
        assert_eq!(item.label, "Set alert");
        assert_eq!(item.shortcut.as_deref(), Some("Alt+A"));
        assert!(!item.disabled);

        item.invoke();
        assert_eq!(*seen.lock().unwrap(), Some(42.5));
    }

    #[test]
    fn empty_context_hides_gated_commands() {
        let reg = CommandRegistry::new();
        reg.register(Command::new("gated", "Gated", |_| {}).when(|ctx| ctx.time.is_some()))
            .unwrap();

        let menu = build_context_menu(&reg, CommandContext::default(), 0.0, 0.0);
        assert!(menu.is_empty());
    }

    #[test]
    fn disabled_item_still_runs_when_invoked() {
        let reg = CommandRegistry::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let checks = AtomicUsize::new(0);

        // applies while listing, refuses when the menu re-checks it
        reg.register(
            Command::new("flaky", "Flaky", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .when(move |_| checks.fetch_add(1, Ordering::SeqCst) == 0),
        )
        .unwrap();

        let menu = build_context_menu(&reg, CommandContext::default(), 0.0, 0.0);
        assert_eq!(menu.items.len(), 1);
        assert!(menu.items[0].disabled);

        menu.items[0].invoke();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
