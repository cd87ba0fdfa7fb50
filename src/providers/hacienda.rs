use crate::core::config::ProviderConfig;
use crate::core::{RateError, RateResult, RateSnapshot, RateSource};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, error, instrument};

/// Path of the exchange rate indicator below the API base URL.
pub const INDICATOR_PATH: &str = "/indicadores/tc";

// Wire format of the indicator document. Keys are lowercased before
// deserialising since the publisher capitalises them inconsistently.
#[derive(Debug, Default, Deserialize)]
struct IndicatorResponse {
    #[serde(default)]
    dolar: Option<DollarQuote>,
    #[serde(default)]
    euro: Option<EuroQuote>,
}

#[derive(Debug, Deserialize)]
struct DollarQuote {
    #[serde(default)]
    venta: Option<Quote>,
    #[serde(default)]
    compra: Option<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    fecha: Option<String>,
    #[serde(default)]
    valor: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct EuroQuote {
    #[serde(default)]
    fecha: Option<String>,
    #[serde(default)]
    dolares: Option<Decimal>,
    #[serde(default)]
    colones: Option<Decimal>,
    #[serde(default, deserialize_with = "string_or_number")]
    valor: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl IndicatorResponse {
    fn into_snapshot(self) -> RateSnapshot {
        let (venta, compra) = match self.dolar {
            Some(dolar) => (dolar.venta, dolar.compra),
            None => (None, None),
        };
        let (dollar_sale, dollar_date) = match venta {
            Some(q) => (q.valor, q.fecha),
            None => (None, None),
        };
        let (dollar_purchase, dollar_purchase_date) = match compra {
            Some(q) => (q.valor, q.fecha),
            None => (None, None),
        };

        let mut snapshot = RateSnapshot {
            dollar_sale,
            dollar_purchase,
            dollar_date,
            dollar_purchase_date,
            ..Default::default()
        };
        if let Some(euro) = self.euro {
            snapshot.euro_date = euro.fecha;
            snapshot.euro_in_dollars = euro.dolares;
            snapshot.euro_in_colones = euro.colones;
            snapshot.euro_raw_value = euro.valor;
        }
        snapshot
    }
}

// Object keys that differ only in case collapse into one entry.
fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Parses an indicator document, matching keys regardless of case. A `null`
/// or `{}` body is a snapshot with every rate missing.
pub fn parse_snapshot(body: &str) -> RateResult<RateSnapshot> {
    let response = serde_json::from_str::<Value>(body)
        .map(lowercase_keys)
        .and_then(serde_json::from_value::<Option<IndicatorResponse>>);
    match response {
        Ok(data) => Ok(data.unwrap_or_default().into_snapshot()),
        Err(e) => {
            error!(
                error = ?e,
                response = %body,
                "Failed to parse exchange rate response"
            );
            Err(RateError::Parse(e.to_string()))
        }
    }
}

/// Client for the Ministerio de Hacienda indicator API.
pub struct HaciendaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HaciendaProvider {
    pub fn new(config: &ProviderConfig) -> RateResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RateError::Upstream(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(&config.base_url, client))
    }

    /// Uses a caller-supplied HTTP client as the transport.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        HaciendaProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, INDICATOR_PATH)
    }
}

#[async_trait]
impl RateSource for HaciendaProvider {
    #[instrument(name = "HaciendaRateFetch", skip(self))]
    async fn fetch_snapshot(&self) -> RateResult<RateSnapshot> {
        let url = self.url();
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::Upstream(format!("Request error: {e} URL: {url}")))?;

        debug!(status = %response.status(), "Received Hacienda response");

        if !response.status().is_success() {
            return Err(RateError::Upstream(format!(
                "HTTP error: {} URL: {}",
                response.status(),
                url
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RateError::Upstream(format!("Failed to read response body: {e}")))?;

        parse_snapshot(&text)
    }
}
