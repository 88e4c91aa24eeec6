use serde::{Deserialize, Deserializer};

use crate::record::{local_timezone, LocationRecord, SourceStatus, UNKNOWN, UNKNOWN_IP};

/// Response body of an IP-geolocation endpoint.
///
/// Field set follows ipapi.co, with the alternate names other free
/// providers use (`region_name`, `country_name`) carried as separate
/// optional fields — some providers send both spellings in one body, so
/// serde aliases would reject them as duplicates.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default, deserialize_with = "coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "coordinate")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl ProviderResponse {
    /// Validate and convert into a resolved [`LocationRecord`].
    ///
    /// Returns `None` when the body has no usable city or is missing either
    /// coordinate — the caller treats that as a parse failure.
    pub fn into_record(self) -> Option<LocationRecord> {
        let city = non_empty(self.city)?;
        let latitude = self.latitude?;
        let longitude = self.longitude?;

        Some(LocationRecord {
            latitude: Some(latitude),
            longitude: Some(longitude),
            city,
            region: non_empty(self.region)
                .or_else(|| non_empty(self.region_name))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            country: non_empty(self.country_name)
                .or_else(|| non_empty(self.country))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            ip: non_empty(self.ip).unwrap_or_else(|| UNKNOWN_IP.to_string()),
            timezone: non_empty(self.timezone).unwrap_or_else(local_timezone),
            source: SourceStatus::Resolved,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Accept a coordinate as either a JSON number or a numeric string —
/// free geolocation endpoints disagree on which they send.
fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
