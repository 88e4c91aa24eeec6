use std::fmt;

/// Placeholder shown for text fields a lookup could not resolve.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder IP for fallback records.
pub const UNKNOWN_IP: &str = "0.0.0.0";

/// Why a lookup fell back to placeholder data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The connectivity probe reported no network; no request was issued.
    Offline,
    /// The request did not settle within the configured deadline.
    Timeout,
    /// The endpoint was reachable but the exchange failed (non-2xx or
    /// transport error).
    HttpError,
    /// The response body was malformed or missing usable city/coordinates.
    ParseError,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Offline => write!(f, "OFFLINE"),
            FallbackReason::Timeout => write!(f, "TIMEOUT"),
            FallbackReason::HttpError => write!(f, "HTTP ERROR"),
            FallbackReason::ParseError => write!(f, "PARSE ERROR"),
        }
    }
}

/// Provenance of a [`LocationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// Built from a well-formed endpoint response.
    Resolved,
    /// Placeholder data substituted after a failed lookup.
    Fallback(FallbackReason),
}

impl SourceStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SourceStatus::Fallback(_))
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            SourceStatus::Resolved => None,
            SourceStatus::Fallback(reason) => Some(*reason),
        }
    }
}

/// Result of one geolocation lookup.
///
/// Immutable once constructed: a new lookup produces a new record, and a
/// widget holds exactly one live record at a time. Fallback records are
/// fully populated with placeholders so the render path never sees a gap.
#[derive(Debug, Clone)]
pub struct LocationRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: String,
    pub region: String,
    pub country: String,
    pub ip: String,
    pub timezone: String,
    pub source: SourceStatus,
}

impl LocationRecord {
    /// Build the placeholder record for a failed lookup.
    pub fn fallback(reason: FallbackReason) -> Self {
        Self {
            latitude: None,
            longitude: None,
            city: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            ip: UNKNOWN_IP.to_string(),
            timezone: local_timezone(),
            source: SourceStatus::Fallback(reason),
        }
    }

    /// Both coordinates, when the lookup resolved them.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    pub fn is_fallback(&self) -> bool {
        self.source.is_fallback()
    }
}

/// The locally resolved timezone, used when the endpoint omits one.
///
/// Prefers the `TZ` environment variable (an IANA name when set), else the
/// local UTC offset rendered as `UTC±HH:MM`.
pub fn local_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.trim().is_empty() {
            return tz;
        }
    }
    format!("UTC{}", chrono::Local::now().offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_record_is_fully_populated() {
        let rec = LocationRecord::fallback(FallbackReason::Timeout);
        assert_eq!(rec.city, UNKNOWN);
        assert_eq!(rec.region, UNKNOWN);
        assert_eq!(rec.country, UNKNOWN);
        assert_eq!(rec.ip, UNKNOWN_IP);
        assert!(!rec.timezone.is_empty());
        assert_eq!(
            rec.source,
            SourceStatus::Fallback(FallbackReason::Timeout)
        );
    }

    #[test]
    fn fallback_record_has_no_coordinates() {
        let rec = LocationRecord::fallback(FallbackReason::Offline);
        assert!(rec.coordinates().is_none());
    }

    #[test]
    fn coordinates_require_both_axes() {
        let mut rec = LocationRecord::fallback(FallbackReason::HttpError);
        rec.latitude = Some(51.5);
        assert!(rec.coordinates().is_none());
        rec.longitude = Some(-0.13);
        assert_eq!(rec.coordinates(), Some((51.5, -0.13)));
    }

    #[test]
    fn reason_display_is_screaming_case() {
        assert_eq!(FallbackReason::Offline.to_string(), "OFFLINE");
        assert_eq!(FallbackReason::Timeout.to_string(), "TIMEOUT");
        assert_eq!(FallbackReason::HttpError.to_string(), "HTTP ERROR");
        assert_eq!(FallbackReason::ParseError.to_string(), "PARSE ERROR");
    }

    #[test]
    fn source_status_fallback_reason() {
        assert_eq!(SourceStatus::Resolved.fallback_reason(), None);
        assert_eq!(
            SourceStatus::Fallback(FallbackReason::ParseError).fallback_reason(),
            Some(FallbackReason::ParseError)
        );
        assert!(!SourceStatus::Resolved.is_fallback());
    }
}
