//! Weather API client for fetching short-term forecasts
//!
//! Each provider's native payload is passed through as one of the
//! [`ForecastShape`] variants; summarizing is left to the shared crate.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::{Coordinate, DailyArrays, DailyList, ForecastShape, Sample, WeatherForecast};

use crate::config::{WeatherConfig, WeatherProviderKind};
use crate::error::UpstreamError;

use super::get_json;

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    provider: WeatherProviderKind,
    api_key: Option<String>,
    base_url: String,
}

/// OpenWeatherMap 5 day / 3 hour forecast response
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    #[serde(default)]
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: Option<i64>,
    dt_txt: Option<String>,
    main: Option<OWMMain>,
    rain: Option<OWMForecastRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastRain {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

/// Open-Meteo forecast response
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    daily: Option<DailyArrays>,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &WeatherConfig, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            provider: config.provider,
            api_key: config.api_key().map(str::to_string),
            base_url: config.endpoint().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the forecast for a coordinate. One request, no retries.
    pub async fn fetch_forecast(
        &self,
        coordinate: &Coordinate,
    ) -> Result<WeatherForecast, UpstreamError> {
        let shape = match self.provider {
            WeatherProviderKind::OpenWeatherMap => {
                ForecastShape::DailyArrays(self.fetch_three_hourly(coordinate).await?)
            }
            WeatherProviderKind::OpenWeatherMapOneCall => {
                ForecastShape::DailyList(self.fetch_one_call(coordinate).await?)
            }
            WeatherProviderKind::OpenMeteo => {
                ForecastShape::DailyArrays(self.fetch_open_meteo(coordinate).await?)
            }
        };
        Ok(WeatherForecast::measured(shape))
    }

    fn require_api_key(&self) -> Result<&str, UpstreamError> {
        self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)
    }

    fn owm_query(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Vec<(&'static str, String)>, UpstreamError> {
        Ok(vec![
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("appid", self.require_api_key()?.to_string()),
            ("units", "metric".to_string()),
        ])
    }

    async fn fetch_three_hourly(
        &self,
        coordinate: &Coordinate,
    ) -> Result<DailyArrays, UpstreamError> {
        let query = self.owm_query(coordinate)?;
        let url = format!("{}/forecast", self.base_url);
        let data: OWMForecastResponse = get_json(&self.client, &url, &query).await?;
        Ok(bucket_by_day(&data.list))
    }

    async fn fetch_one_call(&self, coordinate: &Coordinate) -> Result<DailyList, UpstreamError> {
        let mut query = self.owm_query(coordinate)?;
        query.push(("exclude", "minutely,hourly,alerts".to_string()));
        let url = format!("{}/onecall", self.base_url);
        get_json(&self.client, &url, &query).await
    }

    async fn fetch_open_meteo(
        &self,
        coordinate: &Coordinate,
    ) -> Result<DailyArrays, UpstreamError> {
        let query = [
            ("latitude", coordinate.latitude.to_string()),
            ("longitude", coordinate.longitude.to_string()),
            ("daily", "temperature_2m_mean,precipitation_sum".to_string()),
            ("forecast_days", "7".to_string()),
            ("timezone", "auto".to_string()),
        ];
        let url = format!("{}/forecast", self.base_url);
        let data: OpenMeteoResponse = get_json(&self.client, &url, &query).await?;
        data.daily.ok_or(UpstreamError::MissingField("daily"))
    }
}

/// Calendar day of a 3-hourly slot, from `dt_txt` or else the unix timestamp
fn slot_day(item: &OWMForecastItem) -> Option<NaiveDate> {
    let from_text = item
        .dt_txt
        .as_deref()
        .and_then(|text| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").ok())
        .map(|dt| dt.date());

    from_text.or_else(|| {
        item.dt
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .map(|dt| dt.date_naive())
    })
}

/// Collapse 3-hourly slots into per-day mean temperature and summed rain.
///
/// Days are taken in order of appearance. A day without any temperature
/// reading adds no temperature entry but still adds its rain total. Slots
/// with no recognisable time join the current day.
fn bucket_by_day(items: &[OWMForecastItem]) -> DailyArrays {
    struct Day {
        date: Option<NaiveDate>,
        temps: Vec<f64>,
        rain: f64,
    }

    let mut days: Vec<Day> = Vec::new();
    for item in items {
        let date = slot_day(item);
        let starts_new_day = match days.last() {
            None => true,
            Some(current) => date.is_some() && date != current.date,
        };
        if starts_new_day {
            days.push(Day {
                date,
                temps: Vec::new(),
                rain: 0.0,
            });
        }

        if let Some(day) = days.last_mut() {
            if let Some(temp) = item.main.as_ref().and_then(|m| m.temp) {
                day.temps.push(temp);
            }
            day.rain += item.rain.as_ref().and_then(|r| r.three_hour).unwrap_or(0.0);
        }
    }

    DailyArrays {
        temperature_2m_mean: days
            .iter()
            .filter(|day| !day.temps.is_empty())
            .map(|day| Sample::from(day.temps.iter().sum::<f64>() / day.temps.len() as f64))
            .collect(),
        precipitation_sum: days.iter().map(|day| Sample::from(day.rain)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(provider: WeatherProviderKind, base_url: &str, api_key: Option<&str>) -> WeatherClient {
        let config = WeatherConfig {
            provider,
            api_endpoint: Some(base_url.to_string()),
            api_key: api_key.map(str::to_string),
        };
        WeatherClient::new(&config, Duration::from_secs(2)).unwrap()
    }

    fn slot(dt_txt: &str, temp: Option<f64>, rain: Option<f64>) -> serde_json::Value {
        let mut item = json!({"dt_txt": dt_txt, "main": {}});
        if let Some(t) = temp {
            item["main"]["temp"] = json!(t);
        }
        if let Some(r) = rain {
            item["rain"] = json!({"3h": r});
        }
        item
    }

    #[test]
    fn test_bucket_by_day_groups_slots() {
        let data: OWMForecastResponse = serde_json::from_value(json!({
            "list": [
                slot("2024-06-01 12:00:00", Some(20.0), Some(1.0)),
                slot("2024-06-01 15:00:00", Some(24.0), None),
                slot("2024-06-02 00:00:00", None, Some(2.5)),
                slot("2024-06-03 00:00:00", Some(10.0), Some(0.5)),
                slot("2024-06-03 03:00:00", Some(0.0), None)
            ]
        }))
        .unwrap();

        let arrays = bucket_by_day(&data.list);
        assert_eq!(arrays.temperature_2m_mean, vec![Sample::from(22.0), Sample::from(5.0)]);
        assert_eq!(
            arrays.precipitation_sum,
            vec![Sample::from(1.0), Sample::from(2.5), Sample::from(0.5)]
        );
    }

    #[test]
    fn test_bucket_by_day_uses_timestamp_without_dt_txt() {
        let data: OWMForecastResponse = serde_json::from_value(json!({
            "list": [
                {"dt": 1717236000, "main": {"temp": 18.0}},
                {"dt": 1717246800, "main": {"temp": 20.0}},
                {"dt": 1717322400, "main": {"temp": 30.0}}
            ]
        }))
        .unwrap();

        let arrays = bucket_by_day(&data.list);
        assert_eq!(arrays.temperature_2m_mean, vec![Sample::from(19.0), Sample::from(30.0)]);
        assert_eq!(arrays.precipitation_sum.len(), 2);
    }

    #[test]
    fn test_bucket_by_day_empty_list() {
        let arrays = bucket_by_day(&[]);
        assert!(arrays.temperature_2m_mean.is_empty());
        assert!(arrays.precipitation_sum.is_empty());
    }

    #[tokio::test]
    async fn test_three_hourly_forecast_becomes_daily_arrays() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    slot("2024-06-01 12:00:00", Some(26.0), Some(3.0)),
                    slot("2024-06-02 12:00:00", Some(28.0), Some(4.0))
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(WeatherProviderKind::OpenWeatherMap, &mock_server.uri(), Some("test_key"));
        let forecast = client.fetch_forecast(&Coordinate::new(13.75, 100.5)).await.unwrap();

        assert!(!forecast.is_degraded());
        match forecast.shape {
            ForecastShape::DailyArrays(arrays) => {
                assert_eq!(arrays.temperature_2m_mean.len(), 2);
                assert_eq!(arrays.precipitation_sum, vec![Sample::from(3.0), Sample::from(4.0)]);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_one_call_passes_daily_list_through() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": {"temp": 21.0},
                "daily": [
                    {"temp": {"day": 22.0, "min": 15.0}, "rain": 3.2},
                    {"temp": {"day": 24.0}}
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(WeatherProviderKind::OpenWeatherMapOneCall, &mock_server.uri(), Some("k"));
        let forecast = client.fetch_forecast(&Coordinate::new(10.0, 10.0)).await.unwrap();

        match forecast.shape {
            ForecastShape::DailyList(list) => {
                assert_eq!(list.daily.len(), 2);
                assert_eq!(list.daily[1].rain, None);
                assert!(list.current.is_some());
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_meteo_needs_no_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("latitude", "52.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "daily": {
                    "time": ["2024-06-01", "2024-06-02"],
                    "temperature_2m_mean": [15.2, null],
                    "precipitation_sum": [0.4, 1.1]
                }
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(WeatherProviderKind::OpenMeteo, &mock_server.uri(), None);
        let forecast = client.fetch_forecast(&Coordinate::new(52.5, 13.4)).await.unwrap();

        match forecast.shape {
            ForecastShape::DailyArrays(arrays) => {
                assert_eq!(arrays.temperature_2m_mean[0], Sample::from(15.2));
                assert_eq!(arrays.temperature_2m_mean[1].as_f64(), None);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_meteo_without_daily_block() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": false})))
            .mount(&mock_server)
            .await;

        let client = client_for(WeatherProviderKind::OpenMeteo, &mock_server.uri(), None);
        let err = client.fetch_forecast(&Coordinate::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingField("daily")));
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(WeatherProviderKind::OpenWeatherMap, &mock_server.uri(), None);
        let err = client.fetch_forecast(&Coordinate::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = client_for(WeatherProviderKind::OpenWeatherMap, &mock_server.uri(), Some("bad"));
        let err = client.fetch_forecast(&Coordinate::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status(401)));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"list": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let config = WeatherConfig {
            provider: WeatherProviderKind::OpenWeatherMap,
            api_endpoint: Some(mock_server.uri()),
            api_key: Some("k".to_string()),
        };
        let client = WeatherClient::new(&config, Duration::from_millis(50)).unwrap();
        let err = client.fetch_forecast(&Coordinate::new(0.0, 0.0)).await.unwrap_err();
        assert!(err.is_timeout());
    }
}
