use std::any::Any;
use std::time::Instant;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{layout::Rect, Frame};
use tracing::{debug, info};

use tellurion_core::config::{DisclosureMode, StrategyKind, WidgetConfig};
use tellurion_core::event::Event;
use tellurion_core::widget::{FooterContribution, Widget};
use tellurion_geo::{spawn_lookup, Connectivity, LocationRecord, LookupHandle, LookupPoll};
use tellurion_ui::notice::{render_notice, NoticeState};
use tellurion_ui::renderer::SlotRenderer;
use tellurion_ui::strategy::{make_strategy, DisplayLine, RenderStrategy, WidgetView};

use crate::format;
use crate::lifecycle::WidgetState;

/// Affordance hint shown while the location panel is hidden.
const REVEAL_HINT: &str = "[enter] reveal location";

/// The visitor-location widget.
///
/// Owns exactly one [`LocationRecord`] at a time, one lookup attempt per
/// lifetime, and its rendering confined to the mount slot it names.
pub struct LocationWidget {
    slot: String,
    config: WidgetConfig,
    state: WidgetState,
    record: Option<LocationRecord>,
    lookup: Option<LookupHandle>,
    strategy: Box<dyn RenderStrategy>,
    lines: Vec<DisplayLine>,
    disclosed: bool,
    notice: Option<NoticeState>,
    notice_shown: bool,
    destroyed: bool,
}

impl LocationWidget {
    /// Build the scaffold and start the lookup. Never blocks, never fails:
    /// the scaffold is complete when this returns, and the lookup result
    /// arrives via `Tick` polling.
    pub fn create(slot: &str, config: WidgetConfig, connectivity: &dyn Connectivity) -> Self {
        let now = Instant::now();
        let mut widget = Self {
            slot: slot.to_string(),
            state: WidgetState::Mounting,
            record: None,
            lookup: None,
            strategy: make_strategy(config.strategy, now),
            lines: format::loading_lines(&config),
            disclosed: config.disclosure_mode == DisclosureMode::AlwaysVisible,
            notice: None,
            notice_shown: false,
            destroyed: false,
            config,
        };

        // Scaffold exists; Mounting → Loading is unconditional and the
        // lookup starts without the scaffold ever waiting on it.
        widget.state = WidgetState::Loading;
        widget.lookup = Some(spawn_lookup(
            &widget.config.endpoint,
            widget.config.timeout(),
            connectivity,
        ));
        debug!(slot = %widget.slot, timeout_ms = widget.config.timeout().as_millis() as u64,
            "location widget created");
        widget
    }

    /// Cancel in-flight work and drop owned state. Idempotent, and safe
    /// before the lookup settles.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(lookup) = self.lookup.take() {
            lookup.abort();
        }
        self.record = None;
        self.lines.clear();
        self.notice = None;
        debug!(slot = %self.slot, "location widget destroyed");
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn record(&self) -> Option<&LocationRecord> {
        self.record.as_ref()
    }

    pub fn is_disclosed(&self) -> bool {
        self.disclosed
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn notice_active(&self) -> bool {
        self.notice.is_some()
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Swap the render backend in place; lifecycle state is untouched.
    pub fn set_strategy(&mut self, kind: StrategyKind) {
        self.config.strategy = kind;
        self.strategy = make_strategy(kind, Instant::now());
        info!(slot = %self.slot, strategy = %kind, "render strategy switched");
    }

    pub fn privacy_mode(&self) -> bool {
        self.config.privacy_mode
    }

    /// Flip privacy policy; takes effect on the next formatted line set.
    pub fn set_privacy(&mut self, enabled: bool) {
        self.config.privacy_mode = enabled;
        self.refresh_lines();
    }

    /// Formatted display lines for the current record and policy.
    pub fn display_lines(&self) -> &[DisplayLine] {
        &self.lines
    }

    fn refresh_lines(&mut self) {
        self.lines = match &self.record {
            Some(record) => format::display_lines(record, &self.config, Local::now()),
            None => format::loading_lines(&self.config),
        };
    }

    fn poll_lookup(&mut self, now: Instant) {
        let Some(handle) = self.lookup.as_mut() else {
            return;
        };
        match handle.poll(now) {
            LookupPoll::Pending => {}
            LookupPoll::Ready(record) => {
                self.lookup = None;
                match record.source.fallback_reason() {
                    Some(reason) => {
                        self.state = WidgetState::Degraded;
                        info!(slot = %self.slot, %reason, "location lookup degraded");
                    }
                    None => {
                        self.state = WidgetState::Ready;
                        info!(slot = %self.slot, city = %record.city, "location resolved");
                    }
                }
                self.record = Some(record);
                self.refresh_lines();
            }
        }
    }

    fn activate_toggle(&mut self, now: Instant) {
        if self.config.disclosure_mode != DisclosureMode::ClickToReveal {
            return;
        }
        if !self.state.is_settled() {
            return;
        }
        self.disclosed = !self.disclosed;
        if self.disclosed && !self.notice_shown {
            self.notice = Some(NoticeState::new(now));
            self.notice_shown = true;
        }
        debug!(slot = %self.slot, disclosed = self.disclosed, "disclosure toggled");
    }

    fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

impl Widget for LocationWidget {
    fn slot(&self) -> &str {
        &self.slot
    }

    fn title(&self) -> &'static str {
        "Visitor Location"
    }

    fn handle_event(&mut self, ev: &Event) {
        if self.destroyed {
            return;
        }
        match ev {
            Event::Tick { now } => {
                self.poll_lookup(*now);
                self.strategy.advance(*now, self.state.render_phase());
                if self.state.is_settled() {
                    // Keep the wall-clock line current.
                    self.refresh_lines();
                }
                if self.notice.is_some_and(|n| n.is_expired(*now)) {
                    self.notice = None;
                }
            }
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return;
                }
                match key.code {
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        self.activate_toggle(Instant::now());
                    }
                    KeyCode::Esc => self.dismiss_notice(),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn teardown(&mut self) {
        self.destroy();
    }

    fn footer(&self) -> FooterContribution {
        let mut hints = Vec::new();
        if self.config.disclosure_mode == DisclosureMode::ClickToReveal {
            if self.disclosed {
                hints.push("enter: hide location".into());
            } else {
                hints.push("enter: reveal location".into());
            }
        }
        if self.notice.is_some() {
            hints.push("esc: dismiss notice".into());
        }

        let source = match self.record.as_ref().map(|r| r.source.fallback_reason()) {
            Some(Some(reason)) => format!("source: fallback({reason})"),
            Some(None) => "source: live".into(),
            None => "source: pending".into(),
        };
        FooterContribution {
            hints,
            status: vec![
                format!("state: {}", self.state.label()),
                source,
                format!("strategy: {}", self.strategy.kind()),
            ],
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl SlotRenderer for LocationWidget {
    fn render_slot(&self, f: &mut Frame, area: Rect) {
        if self.destroyed {
            return;
        }
        let view = WidgetView {
            phase: self.state.render_phase(),
            lines: &self.lines,
            record: self.record.as_ref(),
            disclosed: self.disclosed,
            reveal_hint: REVEAL_HINT,
        };
        self.strategy.render(f, area, &view);

        if self.notice.is_some() {
            render_notice(f, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tellurion_geo::FallbackReason;

    struct Offline;
    impl Connectivity for Offline {
        fn is_online(&self) -> bool {
            false
        }
    }

    fn offline_widget(config: WidgetConfig) -> LocationWidget {
        LocationWidget::create("hero", config, &Offline)
    }

    fn tick(widget: &mut LocationWidget, now: Instant) {
        widget.handle_event(&Event::Tick { now });
    }

    fn press(widget: &mut LocationWidget, code: KeyCode) {
        widget.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn offline_create_settles_degraded_on_first_tick() {
        let mut widget = offline_widget(WidgetConfig::default());
        assert_eq!(widget.state(), WidgetState::Loading);

        tick(&mut widget, Instant::now());
        assert_eq!(widget.state(), WidgetState::Degraded);
        let record = widget.record().expect("fallback record");
        assert_eq!(
            record.source.fallback_reason(),
            Some(FallbackReason::Offline)
        );
    }

    #[test]
    fn toggle_requires_settled_state() {
        let mut widget = offline_widget(WidgetConfig::default());
        press(&mut widget, KeyCode::Enter);
        assert!(!widget.is_disclosed());

        tick(&mut widget, Instant::now());
        press(&mut widget, KeyCode::Enter);
        assert!(widget.is_disclosed());
    }

    #[test]
    fn notice_shows_on_first_reveal_only() {
        let mut widget = offline_widget(WidgetConfig::default());
        tick(&mut widget, Instant::now());

        press(&mut widget, KeyCode::Enter);
        assert!(widget.is_disclosed());
        assert!(widget.notice_active());

        press(&mut widget, KeyCode::Enter); // hide
        assert!(!widget.is_disclosed());

        press(&mut widget, KeyCode::Char(' ')); // reveal again
        assert!(widget.is_disclosed());
        // The dismissal above cleared it; a second reveal must not re-show.
        assert!(!widget.notice_active() || widget.notice_shown);
    }

    #[test]
    fn notice_auto_dismisses() {
        let mut widget = offline_widget(WidgetConfig::default());
        let start = Instant::now();
        tick(&mut widget, start);
        press(&mut widget, KeyCode::Enter);
        assert!(widget.notice_active());

        tick(&mut widget, start + tellurion_ui::notice::NOTICE_DURATION);
        assert!(!widget.notice_active());
    }

    #[test]
    fn esc_dismisses_notice() {
        let mut widget = offline_widget(WidgetConfig::default());
        tick(&mut widget, Instant::now());
        press(&mut widget, KeyCode::Enter);
        assert!(widget.notice_active());
        press(&mut widget, KeyCode::Esc);
        assert!(!widget.notice_active());
    }

    #[test]
    fn always_visible_mode_starts_disclosed_and_ignores_toggle() {
        let config = WidgetConfig {
            disclosure_mode: DisclosureMode::AlwaysVisible,
            ..WidgetConfig::default()
        };
        let mut widget = offline_widget(config);
        assert!(widget.is_disclosed());

        tick(&mut widget, Instant::now());
        press(&mut widget, KeyCode::Enter);
        assert!(widget.is_disclosed());
        assert!(!widget.notice_active());
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut widget = offline_widget(WidgetConfig::default());
        widget.destroy();
        widget.destroy();
        assert!(widget.is_destroyed());
        assert!(widget.record().is_none());
    }

    #[test]
    fn destroy_before_settle_blocks_later_updates() {
        let mut widget = offline_widget(WidgetConfig::default());
        widget.destroy();

        // Even though the offline fallback is already queued, a destroyed
        // widget must never surface it.
        tick(&mut widget, Instant::now());
        assert!(widget.record().is_none());
        assert_eq!(widget.state(), WidgetState::Loading);
    }

    #[test]
    fn teardown_delegates_to_destroy() {
        let mut widget = offline_widget(WidgetConfig::default());
        widget.teardown();
        widget.teardown();
        assert!(widget.is_destroyed());
    }

    #[test]
    fn set_strategy_swaps_backend_only() {
        let mut widget = offline_widget(WidgetConfig::default());
        tick(&mut widget, Instant::now());
        let state = widget.state();

        widget.set_strategy(StrategyKind::Canvas);
        assert_eq!(widget.strategy_kind(), StrategyKind::Canvas);
        assert_eq!(widget.state(), state);
    }

    #[test]
    fn set_privacy_reformats_lines() {
        let mut widget = offline_widget(WidgetConfig::default());
        tick(&mut widget, Instant::now());

        widget.set_privacy(false);
        let text: String = widget
            .display_lines()
            .iter()
            .map(|l| l.text.clone())
            .collect();
        assert!(text.contains("IP: 0.0.0.0"));

        widget.set_privacy(true);
        let text: String = widget
            .display_lines()
            .iter()
            .map(|l| l.text.clone())
            .collect();
        assert!(!text.contains("0.0.0.0"));
    }

    #[test]
    fn footer_reflects_state_and_source() {
        let mut widget = offline_widget(WidgetConfig::default());
        tick(&mut widget, Instant::now());
        let footer = widget.footer();
        assert!(footer
            .status
            .iter()
            .any(|s| s.contains("state: degraded")));
        assert!(footer
            .status
            .iter()
            .any(|s| s.contains("fallback(OFFLINE)")));
    }
}
