pub mod errors;

use std::time::Duration;
use serde_json::Value;
use ureq::Agent;
use crate::config::FetchParameters;
use crate::manager_forecast::errors::FetchError;
use crate::models::city::{url_for, City};

/// Anything able to deliver a raw forecast document for a city
pub trait ForecastSource: Sync {
    fn fetch(&self, city: &City) -> Result<Value, FetchError>;
}

/// Struct for retrieving raw forecasts over http
pub struct ForecastClient {
    agent: Agent,
    base_url: String,
}

impl ForecastClient {
    /// Returns a ForecastClient ready for fetching forecasts.
    ///
    /// The agent carries a global timeout so that a hung request fails
    /// like any other request instead of stalling the whole run
    ///
    /// # Arguments
    ///
    /// * 'config' - fetch section of the configuration
    pub fn new(config: &FetchParameters) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        let agent = agent_config.into();

        Self { agent, base_url: config.base_url.to_string() }
    }
}

impl ForecastSource for ForecastClient {
    /// Retrieves the raw forecast document for the given city
    ///
    /// # Arguments
    ///
    /// * 'city' - the city to get a forecast for
    fn fetch(&self, city: &City) -> Result<Value, FetchError> {
        let url = url_for(&self.base_url, &city.id);

        let json = self.agent
            .get(&url)
            .call()?
            .body_mut()
            .read_to_string()?;

        let document: Value = serde_json::from_str(&json)?;
        check_not_empty(document)
    }
}

/// Rejects documents that carry no content at all
///
/// # Arguments
///
/// * 'document' - the document to check
pub fn check_not_empty(document: Value) -> Result<Value, FetchError> {
    let empty = match &document {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(list) => list.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    };

    if empty { Err(FetchError::Empty) } else { Ok(document) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_documents_are_rejected() {
        assert!(matches!(check_not_empty(Value::Null), Err(FetchError::Empty)));
        assert!(matches!(check_not_empty(json!({})), Err(FetchError::Empty)));
        assert!(matches!(check_not_empty(json!([])), Err(FetchError::Empty)));
        assert!(check_not_empty(json!({"forecasts": []})).is_ok());
    }
}
