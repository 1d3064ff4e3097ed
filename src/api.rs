use crate::models::IpRecord;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Why a lookup produced no record.
///
/// Only two of these are ever shown to the user, via [`user_message`]
/// (`user_message`): rejections get the "invalid IP" line, everything else
/// the "try again" line. The full error goes to the log.
///
/// [`user_message`]: LookupError::user_message
#[derive(Debug, Error)]
pub enum LookupError {
    /// The API answered but reported failure (invalid or unknown address).
    #[error("lookup rejected: {}", message.as_deref().unwrap_or("no reason given"))]
    Rejected { message: Option<String> },
    /// The request never completed or the body was not JSON.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body was JSON but not the envelope we expect.
    #[error("unexpected response body: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl LookupError {
    /// Short message surfaced under the input bar.
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::Rejected { .. } => "Invalid IP address or lookup failed",
            LookupError::Transport(_) | LookupError::Malformed(_) => {
                "Failed to fetch IP details. Please try again."
            }
        }
    }
}

/// Client for the remote geolocation API.
#[derive(Clone)]
pub struct LocationProvider {
    client: Client,
    base_url: String,
}

impl LocationProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolves the location of the machine making the request.
    pub async fn my_location(&self) -> Result<IpRecord, LookupError> {
        let url = format!("{}/api/my-location", self.base_url);
        let body = self.client.get(&url).send().await?.json::<Value>().await?;
        parse_envelope(body)
    }

    /// Resolves the location of the given IP address.
    pub async fn lookup(&self, ip: &str) -> Result<IpRecord, LookupError> {
        let url = format!("{}/api/ip-lookup", self.base_url);
        let body = self
            .client
            .get(&url)
            .query(&[("ip", ip)])
            .send()
            .await?
            .json::<Value>()
            .await?;
        parse_envelope(body)
    }
}

/// Splits the success envelope from the record fields.
///
/// The API flattens the record alongside `"success": true`; failures come
/// back as `{"success": false, "message": "..."}`. A body without a boolean
/// `success` field counts as a rejection.
pub fn parse_envelope(body: Value) -> Result<IpRecord, LookupError> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);
        return Err(LookupError::Rejected { message });
    }
    Ok(serde_json::from_value(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success_body() -> Value {
        json!({
            "ip": "8.8.8.8",
            "success": true,
            "type": "IPv4",
            "country": "United States",
            "region": "California",
            "city": "Mountain View",
            "latitude": 37.386,
            "longitude": -122.0838,
            "postal": "94039",
            "calling_code": "1",
            "capital": "Washington D.C.",
            "flag": {"emoji": "🇺🇸"},
            "connection": {"asn": 15169, "org": "Google LLC", "isp": "Google LLC"},
            "timezone": {
                "id": "America/Los_Angeles",
                "utc": "-07:00",
                "current_time": "2025-08-26T06:04:23-07:00"
            }
        })
    }

    #[test]
    fn success_envelope_yields_a_record() {
        let record = parse_envelope(success_body()).unwrap();
        assert_eq!(record.ip, "8.8.8.8");
        assert_eq!(record.connection.org, "Google LLC");
    }

    #[test]
    fn failure_envelope_is_rejected_with_the_api_message() {
        let err = parse_envelope(json!({"success": false, "message": "Invalid IP address"}))
            .unwrap_err();
        match err {
            LookupError::Rejected { ref message } => {
                assert_eq!(message.as_deref(), Some("Invalid IP address"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert_eq!(err.user_message(), "Invalid IP address or lookup failed");
    }

    #[test]
    fn body_without_a_success_flag_is_rejected() {
        let err = parse_envelope(json!({"weird": true})).unwrap_err();
        assert!(matches!(err, LookupError::Rejected { message: None }));
    }

    #[test]
    fn success_flag_with_missing_fields_is_malformed() {
        let err = parse_envelope(json!({"success": true, "ip": "8.8.8.8"})).unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
        assert_eq!(
            err.user_message(),
            "Failed to fetch IP details. Please try again."
        );
    }
}
