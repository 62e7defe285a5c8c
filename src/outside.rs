//! Outdoor temperature from an InfluxDB 1.x query endpoint.
//!
//! Asks for the most recent reading within a trailing 10 minute window and
//! pulls the single value out of the nested results/series/values shape.

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;

/// Most-recent-value query over the trailing window the station reports into.
pub const DEFAULT_QUERY: &str =
    r#"SELECT last("value") FROM "temp" WHERE ("type" = '5N1') AND time >= now() - 10m"#;

pub struct OutsideTempClient {
    http: Client,
    base: String,
    database: String,
    username: String,
    password: String,
    query: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    series: Vec<Series>,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl OutsideTempClient {
    pub fn new(
        http: Client,
        base: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base: base.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
            query: DEFAULT_QUERY.to_string(),
        }
    }

    fn query_url(&self) -> Result<String> {
        let url = Url::parse_with_params(
            &format!("{}/query", self.base.trim_end_matches('/')),
            &[("q", self.query.as_str()), ("db", self.database.as_str())],
        )
        .context("invalid influx base url")?;
        // InfluxDB accepts form-style space encoding in the query string.
        Ok(url.as_str().replace("%20", "+"))
    }

    /// Latest outdoor reading in degrees C.
    pub async fn fetch_latest(&self) -> Result<f64> {
        let response: QueryResponse = self
            .http
            .get(self.query_url()?)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .context("influx request failed")?
            .json()
            .await
            .context("influx response was not json")?;
        extract_latest(&response).context("no outdoor reading in the last 10 minutes")
    }
}

// A `last()` query yields one series with one row: [time, value].
fn extract_latest(response: &QueryResponse) -> Option<f64> {
    response
        .results
        .first()?
        .series
        .first()?
        .values
        .first()?
        .get(1)?
        .as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_single_last_value() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"results":[{"statement_id":0,"series":[{"name":"temp",
                "columns":["time","last"],
                "values":[["2023-11-14T19:00:00Z", 12.6]]}]}]}"#,
        )
        .unwrap();
        assert_eq!(extract_latest(&response), Some(12.6));
    }

    #[test]
    fn empty_window_yields_nothing() {
        // Influx omits `series` entirely when the window has no points.
        let response: QueryResponse =
            serde_json::from_str(r#"{"results":[{"statement_id":0}]}"#).unwrap();
        assert_eq!(extract_latest(&response), None);

        let response: QueryResponse = serde_json::from_str(r#"{"results":[]}"#).unwrap();
        assert_eq!(extract_latest(&response), None);
    }

    #[test]
    fn query_url_uses_plus_for_spaces() {
        let client = OutsideTempClient::new(
            Client::new(),
            "http://influx.local:8086",
            "wunderground",
            "thermostat",
            "thermostat",
        );
        let url = client.query_url().unwrap();
        assert!(url.starts_with("http://influx.local:8086/query?q="));
        assert!(url.contains("db=wunderground"));
        assert!(!url.contains("%20"));
        assert!(url.contains("SELECT+last"));
    }
}
