//! Line formatting for the location widget.
//!
//! This module is the single place privacy policy is applied: with
//! `privacy_mode` on, country, IP, and coordinates never reach a display
//! line regardless of what the record holds. Render strategies consume the
//! output verbatim.

use chrono::{DateTime, Local};

use tellurion_core::config::WidgetConfig;
use tellurion_geo::LocationRecord;
use tellurion_ui::strategy::DisplayLine;

/// The prompt line shown in every state.
fn prompt_line(config: &WidgetConfig) -> DisplayLine {
    DisplayLine::prompt(format!(
        "visitor@{}:~$ whoami --location",
        config.prompt_host
    ))
}

/// Line set before the lookup settles.
pub fn loading_lines(config: &WidgetConfig) -> Vec<DisplayLine> {
    vec![prompt_line(config)]
}

/// The full fixed-format line set for a settled record.
pub fn display_lines(
    record: &LocationRecord,
    config: &WidgetConfig,
    now: DateTime<Local>,
) -> Vec<DisplayLine> {
    let mut lines = vec![prompt_line(config)];

    let location = match record.source.fallback_reason() {
        Some(reason) => format!("Location: [{reason}]"),
        None if config.privacy_mode => format!("{}, {}", record.city, record.region),
        None => format!("{}, {}, {}", record.city, record.region, record.country),
    };
    lines.push(DisplayLine::output(location));

    if !config.privacy_mode {
        if let Some((lat, lon)) = record.coordinates() {
            lines.push(DisplayLine::output(format!(
                "Coordinates: {lat:.2}, {lon:.2}"
            )));
        }
        lines.push(DisplayLine::output(format!("IP: {}", record.ip)));
    }

    lines.push(DisplayLine::output(format!("Timezone: {}", record.timezone)));
    lines.push(DisplayLine::output(format!(
        "Time: {}",
        now.format("%H:%M:%S")
    )));

    if record.is_fallback() {
        lines.push(DisplayLine::warning("⚠ using fallback data"));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tellurion_geo::{FallbackReason, SourceStatus};

    fn resolved_record() -> LocationRecord {
        LocationRecord {
            latitude: Some(51.9225),
            longitude: Some(4.47917),
            city: "Rotterdam".into(),
            region: "South Holland".into(),
            country: "Netherlands".into(),
            ip: "203.0.113.9".into(),
            timezone: "Europe/Amsterdam".into(),
            source: SourceStatus::Resolved,
        }
    }

    fn config(privacy: bool) -> WidgetConfig {
        WidgetConfig {
            privacy_mode: privacy,
            prompt_host: "example.io".into(),
            ..WidgetConfig::default()
        }
    }

    fn joined(lines: &[DisplayLine]) -> String {
        lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn privacy_mode_shows_only_city_and_region() {
        let text = joined(&display_lines(
            &resolved_record(),
            &config(true),
            Local::now(),
        ));
        assert!(text.contains("Rotterdam, South Holland"));
        assert!(!text.contains("Netherlands"));
        assert!(!text.contains("203.0.113.9"));
        assert!(!text.contains("Coordinates"));
    }

    #[test]
    fn full_mode_adds_country_coordinates_and_ip() {
        let text = joined(&display_lines(
            &resolved_record(),
            &config(false),
            Local::now(),
        ));
        assert!(text.contains("Rotterdam, South Holland, Netherlands"));
        assert!(text.contains("Coordinates: 51.92, 4.48"));
        assert!(text.contains("IP: 203.0.113.9"));
    }

    #[test]
    fn coordinates_round_to_two_decimals() {
        let mut record = resolved_record();
        record.latitude = Some(-0.186);
        record.longitude = Some(-78.4678);
        let text = joined(&display_lines(&record, &config(false), Local::now()));
        assert!(text.contains("Coordinates: -0.19, -78.47"));
        assert!(!text.contains("-78.4678"));
    }

    #[test]
    fn fallback_record_shows_reason_tag_and_warning() {
        let record = LocationRecord::fallback(FallbackReason::Timeout);
        let lines = display_lines(&record, &config(true), Local::now());
        let text = joined(&lines);
        assert!(text.contains("Location: [TIMEOUT]"));
        assert!(text.contains("using fallback data"));
        assert!(!text.contains("Unknown, Unknown"));
    }

    #[test]
    fn fallback_in_full_mode_still_suppresses_placeholder_fields() {
        let record = LocationRecord::fallback(FallbackReason::Offline);
        let text = joined(&display_lines(&record, &config(false), Local::now()));
        assert!(text.contains("Location: [OFFLINE]"));
        // No coordinates exist on a fallback record.
        assert!(!text.contains("Coordinates"));
    }

    #[test]
    fn prompt_uses_configured_host() {
        let lines = loading_lines(&config(true));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "visitor@example.io:~$ whoami --location");
    }

    #[test]
    fn timezone_and_time_lines_present() {
        let now = Local::now();
        let text = joined(&display_lines(&resolved_record(), &config(true), now));
        assert!(text.contains("Timezone: Europe/Amsterdam"));
        assert!(text.contains(&format!("Time: {}", now.format("%H:%M:%S"))));
    }
}
