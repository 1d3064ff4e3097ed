use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// A resolved IP address as returned by the geolocation API.
///
/// Immutable once received. The app only ever holds these in transient UI
/// state: created from a successful lookup response, dropped when the entry
/// is removed or the list is cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpRecord {
    pub ip: String,
    /// Address family reported by the API, "IPv4" or "IPv6".
    #[serde(rename = "type")]
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub region: String,
    pub country: String,
    /// Not every address resolves to a postal code.
    #[serde(default)]
    pub postal: Option<String>,
    pub capital: String,
    pub calling_code: String,
    pub connection: Connection,
    pub timezone: TimezoneInfo,
    pub flag: CountryFlag,
}

/// Network operator details for a resolved IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub asn: u32,
    pub org: String,
    pub isp: String,
}

/// Timezone descriptor for a resolved IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneInfo {
    /// IANA identifier, e.g. "Asia/Dhaka".
    pub id: String,
    /// UTC offset as the API formats it, e.g. "+06:00".
    pub utc: String,
    /// Local time at the location when the record was produced, RFC 3339.
    pub current_time: String,
}

/// Country flag as an emoji, straight from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryFlag {
    pub emoji: String,
}

impl IpRecord {
    /// (latitude, longitude) in decimal degrees.
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Postal code with the display fallback the details card uses.
    pub fn postal_label(&self) -> &str {
        self.postal.as_deref().unwrap_or("N/A")
    }
}

impl TimezoneInfo {
    /// Reformats `current_time` for the details card.
    ///
    /// Returns the raw API string unchanged if it does not parse as RFC 3339.
    pub fn local_time_label(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.current_time) {
            Ok(t) => t.format("%Y-%m-%d %H:%M").to_string(),
            Err(_) => self.current_time.clone(),
        }
    }
}
