mod commands;

use std::any::Any;
use std::collections::HashMap;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};

use tellurion_core::{
    bus::EventBus,
    command::{self, CommandContext, CommandOutput, CommandRegistry},
    config::AppConfig,
    console::Console,
    event::Event,
    logging::{self, LogBuffer, LogEntry, LogLevel},
    registry::WidgetRegistry,
    state::AppState,
    ticks::TickRate,
    widget::Widget,
};
use tellurion_geo::EnvConnectivity;
use tellurion_ui::{
    console::render_console,
    layout::{shell_layout, ShellRects, HERO_SLOT},
    renderer::SlotRenderer,
    shell::{render_shell, ShellView},
};
use tellurion_widget::LocationWidget;

use commands::{PrivacyCommand, StrategyCommand, WhereCommand};

/// A type-erased render function that downcasts a widget via `Any` and
/// draws its slot.
type RenderFn = Box<dyn Fn(&dyn Any, &mut Frame, Rect)>;

const FOOTER_HEIGHT: u16 = 5;

struct App {
    state: AppState,
    registry: WidgetRegistry,
    bus: EventBus,
    log_buffer: LogBuffer,
    console: Console,
    ticks: TickRate,
    commands: CommandRegistry,
    render_map: HashMap<String, RenderFn>,
}

/// Mount a widget that also implements `SlotRenderer`.
///
/// Captures a type-aware render closure so the shell can draw the widget
/// without knowing its concrete type; mount lifecycle events land on the
/// bus.
fn mount_widget<W: Widget + SlotRenderer + 'static>(
    registry: &mut WidgetRegistry,
    render_map: &mut HashMap<String, RenderFn>,
    bus: &mut EventBus,
    widget: W,
) {
    let slot = widget.slot().to_string();
    let (handle, events) = registry.mount(Box::new(widget));
    if handle.is_mounted() {
        render_map.insert(
            slot,
            Box::new(|any, f, area| {
                if let Some(w) = any.downcast_ref::<W>() {
                    w.render_slot(f, area);
                }
            }),
        );
    }
    bus.publish_all(events);
}

impl App {
    fn new(log_buffer: LogBuffer, config: &AppConfig) -> Self {
        let mut registry = WidgetRegistry::new([HERO_SLOT]);
        let mut render_map: HashMap<String, RenderFn> = HashMap::new();
        let mut bus = EventBus::new();

        let widget = LocationWidget::create(HERO_SLOT, config.widget.clone(), &EnvConnectivity);
        mount_widget(&mut registry, &mut render_map, &mut bus, widget);

        let mut commands = command::builtin_registry();
        commands.register(Box::new(StrategyCommand));
        commands.register(Box::new(PrivacyCommand));
        commands.register(Box::new(WhereCommand));

        Self {
            state: AppState::new(),
            registry,
            bus,
            log_buffer,
            console: Console::default(),
            ticks: TickRate::default(),
            commands,
            render_map,
        }
    }

    /// Drain new entries from the shared log buffer into the console.
    fn sync_logs(&mut self) {
        if let Ok(mut buf) = self.log_buffer.lock() {
            for entry in buf.drain(..) {
                self.console.push_log(entry);
            }
        }
    }

    /// Execute a console command. Returns `true` when the shell should quit.
    fn dispatch_command(&mut self, input: &str) -> bool {
        if input.trim().is_empty() {
            return false;
        }

        // Echo the command itself.
        self.console.push_log(LogEntry {
            level: LogLevel::Info,
            target: "console".into(),
            message: format!("> {input}"),
        });

        let trimmed = input.trim();

        // Bare "help" lists every command from the registry.
        if trimmed == "help" || trimmed == "?" {
            let lines: Vec<String> = self
                .commands
                .commands()
                .iter()
                .map(|cmd| {
                    let aliases = cmd.aliases();
                    if aliases.is_empty() {
                        format!("  {:24} {}", cmd.usage(), cmd.description())
                    } else {
                        format!(
                            "  {:24} {} (aliases: {})",
                            cmd.usage(),
                            cmd.description(),
                            aliases.join(", ")
                        )
                    }
                })
                .collect();
            for line in lines {
                self.console.push_log(LogEntry {
                    level: LogLevel::Info,
                    target: "help".into(),
                    message: line,
                });
            }
            return false;
        }

        let output = {
            let mut ctx = CommandContext {
                registry: &mut self.registry,
                console: &mut self.console,
                ticks: &self.ticks,
                started_at: self.state.started_at,
            };
            self.commands.execute(trimmed, &mut ctx)
        };

        match output {
            CommandOutput::Lines(lines) => {
                for line in lines {
                    self.console.push_log(LogEntry {
                        level: LogLevel::Info,
                        target: "console".into(),
                        message: line,
                    });
                }
                false
            }
            CommandOutput::Quit => true,
        }
    }

    fn draw(&mut self, f: &mut Frame) {
        let rects: ShellRects = shell_layout(f.area(), FOOTER_HEIGHT);

        let (title, footer) = match self.registry.focused() {
            Some(widget) => (widget.title(), widget.footer()),
            None => ("(no widget)", Default::default()),
        };

        let mut hints = footer.hints;
        hints.push("~: console   q: quit".into());

        let view = ShellView {
            widget_title: title,
            status_line: &self.state.status_line,
            hints,
            status: footer.status,
        };

        let registry = &self.registry;
        let render_map = &self.render_map;
        render_shell(f, rects, view, |f, hero_area| {
            if let Some(widget) = registry.get(HERO_SLOT) {
                if let Some(render_fn) = render_map.get(HERO_SLOT) {
                    render_fn(widget.as_any(), f, hero_area);
                }
            }
        });

        if self.console.visible {
            render_console(f, f.area(), &self.console, self.ticks.per_second());
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> Result<()> {
    let log_buffer = logging::init();
    tracing::info!("tellurion starting up");

    let config = AppConfig::load_or_default();
    let mut terminal = setup_terminal()?;
    let res = run(&mut terminal, log_buffer, &config);
    restore_terminal(terminal)?;
    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    log_buffer: LogBuffer,
    config: &AppConfig,
) -> Result<()> {
    let mut app = App::new(log_buffer, config);
    let tick_interval = Duration::from_millis(config.tick_ms.max(16));
    let poll_timeout = Duration::from_millis(16);
    let mut last_tick = Instant::now();

    loop {
        // ── Sync logs from tracing into the console ──
        app.sync_logs();

        // ── Render ──
        terminal.draw(|f| app.draw(f))?;

        // ── Poll → Publish ──
        if event::poll(poll_timeout)? {
            match event::read()? {
                CEvent::Key(key) => {
                    // Tilde always toggles the console.
                    if key.code == KeyCode::Char('`') || key.code == KeyCode::Char('~') {
                        app.console.toggle();
                    } else if app.console.visible {
                        // Console captures all keys while open.
                        match key.code {
                            KeyCode::Enter => {
                                let input = app.console.submit_input();
                                if app.dispatch_command(&input) {
                                    return Ok(());
                                }
                            }
                            KeyCode::Backspace => app.console.backspace(),
                            KeyCode::Left => app.console.cursor_left(),
                            KeyCode::Right => app.console.cursor_right(),
                            KeyCode::Up => app.console.history_prev(),
                            KeyCode::Down => app.console.history_next(),
                            KeyCode::PageUp => app.console.scroll_up(10),
                            KeyCode::PageDown => app.console.scroll_down(10),
                            KeyCode::Esc => app.console.toggle(),
                            KeyCode::Char(c) => app.console.insert_char(c),
                            _ => {}
                        }
                    } else {
                        match key.code {
                            KeyCode::Char('q') => {
                                app.bus.publish(Event::Quit);
                            }
                            KeyCode::Tab => {
                                app.registry.cycle_focus();
                                if let Some(w) = app.registry.focused() {
                                    app.state.set_status(format!("FOCUS: {}", w.title()));
                                }
                            }
                            _ => {
                                app.bus.publish(Event::Key(key));
                            }
                        }
                    }
                }
                CEvent::Resize(cols, rows) => {
                    app.bus.publish(Event::Resize { cols, rows });
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_interval {
            last_tick = Instant::now();
            app.ticks.record(last_tick);
            app.bus.publish(Event::Tick { now: last_tick });
        }

        // ── Drain → Broadcast ──
        for ev in app.bus.drain() {
            if matches!(ev, Event::Quit) {
                return Ok(());
            }
            app.registry.broadcast(&ev);
        }
    }
}
