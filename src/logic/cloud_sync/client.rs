//! Supabase table client
//!
//! Blocking HTTP client inserting rows through the PostgREST endpoint
//! (`POST {url}/rest/v1/{table}`).

use std::time::Duration;

use thiserror::Error;

use crate::logic::config::RemoteConfig;

use super::record::ReadingRecord;

/// Destination for published readings
pub trait ReadingSink {
    fn insert(&self, record: &ReadingRecord) -> Result<(), PublishError>;
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected insert ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Remote table client
pub struct SupabaseClient {
    agent: ureq::Agent,
    endpoint: String,
    key: String,
}

impl SupabaseClient {
    pub fn new(config: &RemoteConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build();

        let endpoint = format!("{}/rest/v1/{}", config.url, config.table);
        log::info!("Supabase client initialized for table '{}'", config.table);

        Self {
            agent,
            endpoint,
            key: config.key.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ReadingSink for SupabaseClient {
    fn insert(&self, record: &ReadingRecord) -> Result<(), PublishError> {
        let body = serde_json::to_string(record)?;

        let response = self
            .agent
            .post(&self.endpoint)
            .set("apikey", &self.key)
            .set("Authorization", &format!("Bearer {}", self.key))
            .set("Content-Type", "application/json")
            .set("Prefer", "return=minimal")
            .send_string(&body);

        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, resp)) => Err(PublishError::Rejected {
                status,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(e) => Err(PublishError::Network(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::cloud_sync::VitalSigns;
    use chrono::Utc;

    #[test]
    fn test_endpoint_layout() {
        let config = RemoteConfig::new("https://abc.supabase.co/", "anon-key", "glucose_readings", 5).unwrap();
        let client = SupabaseClient::new(&config);
        assert_eq!(client.endpoint(), "https://abc.supabase.co/rest/v1/glucose_readings");
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        // Port 9 on localhost: nothing listens, connection is refused
        let config = RemoteConfig::new("http://127.0.0.1:9", "anon-key", "glucose_readings", 2).unwrap();
        let client = SupabaseClient::new(&config);
        let record = ReadingRecord::new(0.5, 110.0, VitalSigns { heart_rate: 80, spo2: 96 }, Utc::now());

        assert!(matches!(client.insert(&record), Err(PublishError::Network(_))));
    }
}
