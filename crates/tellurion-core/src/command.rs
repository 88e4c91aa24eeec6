use std::collections::HashMap;
use std::time::Instant;

use crate::console::Console;
use crate::registry::WidgetRegistry;
use crate::ticks::TickRate;

/// Output from a command execution.
pub enum CommandOutput {
    /// Lines to display in the console.
    Lines(Vec<String>),
    /// Signal that the shell should quit.
    Quit,
}

/// Context available to commands during execution.
pub struct CommandContext<'a> {
    pub registry: &'a mut WidgetRegistry,
    pub console: &'a mut Console,
    pub ticks: &'a TickRate,
    pub started_at: Instant,
}

/// A console command.
pub trait Command: Send + Sync {
    fn name(&self) -> &str;
    fn aliases(&self) -> &[&str] {
        &[]
    }
    fn description(&self) -> &str;
    fn usage(&self) -> &str {
        self.name()
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> CommandOutput;
}

/// Registry of console commands.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    lookup: HashMap<String, usize>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let idx = self.commands.len();
        self.lookup.insert(cmd.name().to_string(), idx);
        for alias in cmd.aliases() {
            self.lookup.insert(alias.to_string(), idx);
        }
        self.commands.push(cmd);
    }

    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandOutput {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&name, args)) = parts.split_first() else {
            return CommandOutput::Lines(vec![]);
        };

        match self.lookup.get(name) {
            Some(&idx) => self.commands[idx].execute(args, ctx),
            None => CommandOutput::Lines(vec![format!(
                "unknown command: '{name}'. Type 'help' for available commands."
            )]),
        }
    }

    pub fn commands(&self) -> &[Box<dyn Command>] {
        &self.commands
    }
}

// ── Built-in commands ──

pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }
    fn aliases(&self) -> &[&str] {
        &["?"]
    }
    fn description(&self) -> &str {
        "List commands or show specific help"
    }
    fn usage(&self) -> &str {
        "help [command]"
    }

    fn execute(&self, args: &[&str], _ctx: &mut CommandContext) -> CommandOutput {
        // The full listing needs the registry itself, so the shell
        // special-cases bare "help"; this handles the argument form.
        if let Some(cmd) = args.first() {
            return CommandOutput::Lines(vec![format!(
                "help for '{cmd}' — use 'help' to list all commands"
            )]);
        }
        CommandOutput::Lines(vec!["Type 'help' to list all commands.".into()])
    }
}

pub struct ClearCommand;

impl Command for ClearCommand {
    fn name(&self) -> &str {
        "clear"
    }
    fn aliases(&self) -> &[&str] {
        &["cls"]
    }
    fn description(&self) -> &str {
        "Clear console log"
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        ctx.console.clear_logs();
        CommandOutput::Lines(vec![])
    }
}

pub struct WidgetsCommand;

impl Command for WidgetsCommand {
    fn name(&self) -> &str {
        "widgets"
    }
    fn description(&self) -> &str {
        "List mounted widgets"
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        if ctx.registry.is_empty() {
            return CommandOutput::Lines(vec!["no widgets mounted".into()]);
        }
        let focused = ctx.registry.focused_slot().map(str::to_string);
        let lines = ctx
            .registry
            .list()
            .iter()
            .map(|(slot, title)| {
                let marker = if focused.as_deref() == Some(*slot) {
                    " *"
                } else {
                    ""
                };
                format!("  {slot} — {title}{marker}")
            })
            .collect();
        CommandOutput::Lines(lines)
    }
}

pub struct FocusCommand;

impl Command for FocusCommand {
    fn name(&self) -> &str {
        "focus"
    }
    fn description(&self) -> &str {
        "Focus the widget in a mount slot"
    }
    fn usage(&self) -> &str {
        "focus <slot>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let Some(slot) = args.first() else {
            return CommandOutput::Lines(vec!["usage: focus <slot>".into()]);
        };
        if ctx.registry.focus(slot) {
            CommandOutput::Lines(vec![format!("focused: {slot}")])
        } else {
            CommandOutput::Lines(vec![format!("no widget mounted at '{slot}'")])
        }
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    fn name(&self) -> &str {
        "quit"
    }
    fn aliases(&self) -> &[&str] {
        &["exit", "q"]
    }
    fn description(&self) -> &str {
        "Exit tellurion"
    }

    fn execute(&self, _args: &[&str], _ctx: &mut CommandContext) -> CommandOutput {
        CommandOutput::Quit
    }
}

pub struct UptimeCommand;

impl Command for UptimeCommand {
    fn name(&self) -> &str {
        "uptime"
    }
    fn description(&self) -> &str {
        "Show shell uptime"
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let secs = ctx.started_at.elapsed().as_secs();
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        let s = secs % 60;
        CommandOutput::Lines(vec![format!("Uptime: {hours:02}:{mins:02}:{s:02}")])
    }
}

pub struct TpsCommand;

impl Command for TpsCommand {
    fn name(&self) -> &str {
        "tps"
    }
    fn aliases(&self) -> &[&str] {
        &["fps"]
    }
    fn description(&self) -> &str {
        "Show ticks-per-second"
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        CommandOutput::Lines(vec![format!("TPS: {:.1}", ctx.ticks.per_second())])
    }
}

pub struct EchoCommand;

impl Command for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Print message to console"
    }
    fn usage(&self) -> &str {
        "echo <message>"
    }

    fn execute(&self, args: &[&str], _ctx: &mut CommandContext) -> CommandOutput {
        CommandOutput::Lines(vec![args.join(" ")])
    }
}

/// Create a CommandRegistry pre-loaded with the built-in commands.
pub fn builtin_registry() -> CommandRegistry {
    let mut reg = CommandRegistry::new();
    reg.register(Box::new(HelpCommand));
    reg.register(Box::new(ClearCommand));
    reg.register(Box::new(WidgetsCommand));
    reg.register(Box::new(FocusCommand));
    reg.register(Box::new(QuitCommand));
    reg.register(Box::new(UptimeCommand));
    reg.register(Box::new(TpsCommand));
    reg.register(Box::new(EchoCommand));
    reg
}
