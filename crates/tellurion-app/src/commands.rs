//! Shell-level commands that reconfigure the location widget.

use tellurion_core::command::{Command, CommandContext, CommandOutput};
use tellurion_core::config::StrategyKind;
use tellurion_widget::LocationWidget;

/// Run a closure against the focused location widget, or report why not.
fn with_focused_widget(
    ctx: &mut CommandContext,
    f: impl FnOnce(&mut LocationWidget) -> Vec<String>,
) -> CommandOutput {
    let Some(slot) = ctx.registry.focused_slot().map(str::to_string) else {
        return CommandOutput::Lines(vec!["no widget focused".into()]);
    };
    let Some(widget) = ctx.registry.get_mut(&slot) else {
        return CommandOutput::Lines(vec![format!("no widget mounted at '{slot}'")]);
    };
    match widget.as_any_mut().downcast_mut::<LocationWidget>() {
        Some(widget) => CommandOutput::Lines(f(widget)),
        None => CommandOutput::Lines(vec![format!(
            "widget at '{slot}' is not a location widget"
        )]),
    }
}

/// `strategy <canvas|frames|text>` — hot-swap the render backend.
pub struct StrategyCommand;

impl Command for StrategyCommand {
    fn name(&self) -> &str {
        "strategy"
    }
    fn description(&self) -> &str {
        "Switch the focused widget's render backend"
    }
    fn usage(&self) -> &str {
        "strategy <canvas|frames|text>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let Some(raw) = args.first() else {
            return with_focused_widget(ctx, |widget| {
                vec![format!("strategy: {}", widget.strategy_kind())]
            });
        };
        let Some(kind) = StrategyKind::parse(raw) else {
            return CommandOutput::Lines(vec![format!(
                "unknown strategy '{raw}' (canvas, frames, text)"
            )]);
        };
        with_focused_widget(ctx, |widget| {
            widget.set_strategy(kind);
            vec![format!("strategy switched to {kind}")]
        })
    }
}

/// `privacy [on|off]` — inspect or flip the privacy policy.
pub struct PrivacyCommand;

impl Command for PrivacyCommand {
    fn name(&self) -> &str {
        "privacy"
    }
    fn description(&self) -> &str {
        "Show or set the focused widget's privacy mode"
    }
    fn usage(&self) -> &str {
        "privacy [on|off]"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        match args.first() {
            None => with_focused_widget(ctx, |widget| {
                vec![format!(
                    "privacy: {}",
                    if widget.privacy_mode() { "on" } else { "off" }
                )]
            }),
            Some(&"on") => with_focused_widget(ctx, |widget| {
                widget.set_privacy(true);
                vec!["privacy: on".into()]
            }),
            Some(&"off") => with_focused_widget(ctx, |widget| {
                widget.set_privacy(false);
                vec!["privacy: off".into()]
            }),
            Some(other) => {
                CommandOutput::Lines(vec![format!("usage: privacy [on|off], got '{other}'")])
            }
        }
    }
}

/// `where` — print the current formatted location lines to the console.
pub struct WhereCommand;

impl Command for WhereCommand {
    fn name(&self) -> &str {
        "where"
    }
    fn aliases(&self) -> &[&str] {
        &["whoami"]
    }
    fn description(&self) -> &str {
        "Print the focused widget's location lines"
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        with_focused_widget(ctx, |widget| {
            widget
                .display_lines()
                .iter()
                .map(|line| line.text.clone())
                .collect()
        })
    }
}
