use super::{WeatherFetch, WeatherReport};
use crate::config::ConfigStore;
use crate::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const TIMEOUT: Duration = Duration::from_secs(5);

/// OpenWeather current-conditions client (imperial units).
pub struct OpenWeatherClient {
    http: reqwest::Client,
    store: Arc<ConfigStore>,
    base_url: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    main: ApiMain,
    #[serde(default)]
    weather: Vec<ApiCondition>,
}

#[derive(Deserialize)]
struct ApiMain {
    temp: f64,
}

#[derive(Deserialize, Default, Clone)]
struct ApiCondition {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
}

fn symbol_for_condition(main: &str) -> &'static str {
    let main = main.to_lowercase();
    if main.contains("thunder") {
        "⛈️"
    } else if main.contains("drizzle") {
        "🌦️"
    } else if main.contains("rain") {
        "🌧️"
    } else if main.contains("snow") {
        "❄️"
    } else if main.contains("clear") {
        "☀️"
    } else if main.contains("cloud") {
        "☁️"
    } else if main.contains("mist") || main.contains("fog") || main.contains("haze") {
        "🌫️"
    } else {
        "🌤️"
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Static report used when no API key is configured. Absence of a secret
/// degrades the widget, it never fails the request.
fn fallback_report() -> WeatherReport {
    WeatherReport {
        temperature_f: 72.0,
        description: "Clear skies (fallback)".into(),
        symbol: "☀️".into(),
    }
}

impl OpenWeatherClient {
    pub fn new(http: reqwest::Client, store: Arc<ConfigStore>) -> Self {
        Self {
            http,
            store,
            base_url: OPENWEATHER_URL.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherFetch for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReport, FetchError> {
        let api_key = self.store.secret("OPENWEATHER_API_KEY");
        if api_key.is_empty() {
            tracing::warn!("no OPENWEATHER_API_KEY set, using fallback weather");
            return Ok(fallback_report());
        }

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("appid", api_key.as_str()), ("units", "imperial")])
            .timeout(TIMEOUT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| FetchError::Request {
                service: "openweather".into(),
                message: e.to_string(),
            })?;

        let data: ApiResponse = response.json().await.map_err(|e| FetchError::Decode {
            service: "openweather".into(),
            message: e.to_string(),
        })?;

        let condition = data.weather.first().cloned().unwrap_or_default();
        Ok(WeatherReport {
            temperature_f: (data.main.temp * 10.0).round() / 10.0,
            description: capitalize(&condition.description),
            symbol: symbol_for_condition(&condition.main).into(),
        })
    }
}
