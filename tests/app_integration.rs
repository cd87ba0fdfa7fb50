use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;
use tracing::{error, info};

use crcx::core::config::ProviderConfig;
use crcx::providers::HaciendaProvider;
use crcx::providers::hacienda::INDICATOR_PATH;
use crcx::{AppCommand, CancelHandle, Currency, ExchangeRateConverter, RateError};

const FULL_RESPONSE: &str = r#"{
    "dolar": {
        "venta": { "fecha": "2025-01-15", "valor": 515.50 },
        "compra": { "fecha": "2025-01-15", "valor": 505.25 }
    },
    "euro": {
        "fecha": "2025-01-15",
        "dolares": 1.08,
        "colones": 545.00,
        "valor": "1.08"
    }
}"#;

mod test_utils {
    use super::INDICATOR_PATH;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(
        body: &str,
        delay: Option<Duration>,
        expected_calls: Option<u64>,
    ) -> MockServer {
        let mock_server = MockServer::start().await;

        let mut response = ResponseTemplate::new(200).set_body_string(body);
        if let Some(delay) = delay {
            response = response.set_delay(delay);
        }
        let mut mock = Mock::given(method("GET"))
            .and(path(INDICATOR_PATH))
            .respond_with(response);
        if let Some(n) = expected_calls {
            mock = mock.expect(n);
        }
        mock.mount(&mock_server).await;

        mock_server
    }

    pub fn write_config(dir: &tempfile::TempDir, base_url: &str, cache_seconds: u64) -> String {
        let config_path = dir.path().join("config.yaml");
        let config_content = format!(
            r#"
provider:
  base_url: {base_url}
  timeout_seconds: 10
cache_seconds: {cache_seconds}
"#
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path.to_str().unwrap().to_string()
    }
}

fn converter_for(base_url: &str, cache: Duration) -> ExchangeRateConverter<HaciendaProvider> {
    let provider = HaciendaProvider::new(&ProviderConfig {
        base_url: base_url.to_string(),
        ..Default::default()
    })
    .expect("Failed to build provider");
    ExchangeRateConverter::new(provider, cache)
}

#[test_log::test(tokio::test)]
async fn test_conversions_against_mock_server() {
    let mock_server = test_utils::create_mock_server(FULL_RESPONSE, None, None).await;
    let converter = converter_for(&mock_server.uri(), Duration::ZERO);

    assert_eq!(
        converter.dollars_to_colones(dec!(10), None).await.unwrap(),
        dec!(5155.00)
    );
    assert_eq!(
        converter.euros_to_colones(dec!(10), None).await.unwrap(),
        dec!(5450.00)
    );
    let euros = converter.colones_to_euros(dec!(545), None).await.unwrap();
    assert!((euros - Decimal::ONE).abs() < dec!(0.0000001));
}

#[test_log::test(tokio::test)]
async fn test_caching_makes_single_upstream_call() {
    let mock_server = test_utils::create_mock_server(FULL_RESPONSE, None, Some(1)).await;
    let converter = converter_for(&mock_server.uri(), Duration::from_secs(300));

    converter.dollars_to_colones(dec!(10), None).await.unwrap();
    converter.colones_to_dollars(dec!(10), None).await.unwrap();
    converter.euro_rate(None).await.unwrap();

    mock_server.verify().await;
}

#[test_log::test(tokio::test)]
async fn test_disabled_cache_calls_upstream_each_time() {
    let mock_server = test_utils::create_mock_server(FULL_RESPONSE, None, Some(2)).await;
    let converter = converter_for(&mock_server.uri(), Duration::ZERO);

    converter.dollars_to_colones(dec!(10), None).await.unwrap();
    converter.colones_to_dollars(dec!(10), None).await.unwrap();

    mock_server.verify().await;
}

#[test_log::test(tokio::test)]
async fn test_empty_document_yields_zero() {
    let mock_server = test_utils::create_mock_server("{}", None, None).await;
    let converter = converter_for(&mock_server.uri(), Duration::ZERO);

    assert!(
        converter
            .dollars_to_colones(dec!(100), None)
            .await
            .unwrap()
            .is_zero()
    );
    assert!(
        converter
            .euros_to_colones(dec!(100), None)
            .await
            .unwrap()
            .is_zero()
    );
    let dollar = converter.dollar_rate(None).await.unwrap();
    assert!(dollar.date.is_none());
    assert!(dollar.sale.is_zero() && dollar.purchase.is_zero());
}

#[test_log::test(tokio::test)]
async fn test_cancel_slow_upstream() {
    let mock_server =
        test_utils::create_mock_server(FULL_RESPONSE, Some(Duration::from_secs(10)), None).await;
    let converter = converter_for(&mock_server.uri(), Duration::ZERO);
    let handle = CancelHandle::new();
    let signal = handle.signal();

    let started = std::time::Instant::now();
    let (result, _) = tokio::join!(converter.dollars_to_colones(dec!(10), Some(&signal)), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
    });

    assert!(matches!(result, Err(RateError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let config_dir = tempfile::TempDir::new().expect("Failed to create temp dir");

    for command in [
        AppCommand::Convert {
            amount: dec!(1000),
            from: Currency::Usd,
            to: Currency::Crc,
        },
        AppCommand::Rates,
        AppCommand::Summary { amount: dec!(1000) },
    ] {
        // Rates fetches dollar and euro rates, still one upstream call with caching on.
        let mock_server = test_utils::create_mock_server(FULL_RESPONSE, None, Some(1)).await;
        let config_path = test_utils::write_config(&config_dir, &mock_server.uri(), 300);

        let result = crcx::run_command(command, Some(&config_path), Duration::from_secs(10)).await;
        assert!(
            result.is_ok(),
            "Command failed with: {:?}",
            result.err()
        );
        mock_server.verify().await;
    }
}

#[test_log::test(tokio::test)]
async fn test_app_rejects_same_currency() {
    let mock_server = test_utils::create_mock_server(FULL_RESPONSE, None, None).await;
    let config_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&config_dir, &mock_server.uri(), 0);

    let result = crcx::run_command(
        AppCommand::Convert {
            amount: dec!(10),
            from: Currency::Eur,
            to: Currency::Eur,
        },
        Some(&config_path),
        Duration::from_secs(10),
    )
    .await;

    assert!(result.unwrap_err().to_string().contains("Nothing to convert"));
}

#[test_log::test(tokio::test)]
async fn test_app_times_out_on_slow_upstream() {
    let mock_server =
        test_utils::create_mock_server(FULL_RESPONSE, Some(Duration::from_secs(10)), None).await;
    let config_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&config_dir, &mock_server.uri(), 0);

    let result = crcx::run_command(
        AppCommand::Rates,
        Some(&config_path),
        Duration::from_millis(200),
    )
    .await;

    let err = result.unwrap_err();
    assert!(
        matches!(err.downcast_ref::<RateError>(), Some(RateError::Cancelled)),
        "Unexpected error: {err}"
    );
}

#[test_log::test(tokio::test)]
async fn test_app_reports_upstream_failure() {
    let mock_server = wiremock::MockServer::start().await;
    let config_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&config_dir, &mock_server.uri(), 0);

    // No mock mounted: wiremock answers 404.
    let result = crcx::run_command(
        AppCommand::Summary { amount: dec!(1) },
        Some(&config_path),
        Duration::from_secs(10),
    )
    .await;

    let err = result.unwrap_err();
    assert!(
        matches!(err.downcast_ref::<RateError>(), Some(RateError::Upstream(_))),
        "Unexpected error: {err}"
    );
}

#[test_log::test(tokio::test)]
#[ignore = "hits the live Ministerio de Hacienda API"]
async fn test_real_hacienda_api() {
    let converter = converter_for(crcx::core::config::DEFAULT_BASE_URL, Duration::from_secs(60));

    info!("Fetching rates from the Ministerio de Hacienda API");
    match converter.dollar_rate(None).await {
        Ok(rate) => {
            info!(?rate, "Received dollar rate");
            assert!(rate.date.is_some(), "Dollar rate should carry a date");
            assert!(rate.sale > Decimal::ZERO, "Sale rate should be positive");
            assert!(rate.purchase > Decimal::ZERO, "Purchase rate should be positive");
        }
        Err(e) => {
            error!("Hacienda API request failed: {e}\n{e:?}");
            panic!("Hacienda API request failed: {e}");
        }
    }

    let euro = converter.euro_rate(None).await.unwrap();
    info!(?euro, "Received euro rate");
    assert!(euro.dollars > Decimal::ZERO);
    assert!(euro.colones.is_none_or(|c| c > Decimal::ZERO));
}
