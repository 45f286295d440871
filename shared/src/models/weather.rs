//! Weather forecast models and the weekly summary derived from them

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Literal seven-day series served when no provider data is available
pub const FALLBACK_TEMPERATURE_C: [f64; 7] = [24.0, 25.5, 26.0, 25.0, 23.5, 24.5, 25.0];
pub const FALLBACK_PRECIPITATION_MM: [f64; 7] = [4.0, 12.5, 0.0, 8.0, 15.0, 2.5, 6.0];

/// A single reading as it appears in a provider payload.
///
/// Providers occasionally put `null` or strings into numeric slots. Anything
/// that is not a finite JSON number is kept but never counted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Sample {
    Number(f64),
    Other(serde_json::Value),
}

impl Sample {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Sample::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample::Number(value)
    }
}

/// Shape A: parallel per-day sequences keyed by variable
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyArrays {
    #[serde(default)]
    pub temperature_2m_mean: Vec<Sample>,
    #[serde(default)]
    pub precipitation_sum: Vec<Sample>,
}

/// Shape B: one object per day, plus optional current conditions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyList {
    #[serde(default)]
    pub daily: Vec<DayEntry>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub current: Option<CurrentConditions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayEntry {
    /// A `temp` of any other JSON type reads as missing for that day only
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub temp: Option<DayTemperature>,
    /// Daily precipitation in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Sample>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayTemperature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Sample>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<Sample>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Provider response in one of the supported shapes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ForecastShape {
    DailyArrays(DailyArrays),
    DailyList(DailyList),
}

/// Short-term forecast for one coordinate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherForecast {
    pub shape: ForecastShape,
    /// Set when the data is the synthetic fallback rather than provider output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl WeatherForecast {
    pub fn measured(shape: ForecastShape) -> Self {
        Self {
            shape,
            degraded: None,
        }
    }

    /// Fixed seven-day forecast tagged with the reason the provider was skipped
    pub fn fallback(reason: impl Into<String>) -> Self {
        let arrays = DailyArrays {
            temperature_2m_mean: FALLBACK_TEMPERATURE_C.iter().copied().map(Sample::from).collect(),
            precipitation_sum: FALLBACK_PRECIPITATION_MM.iter().copied().map(Sample::from).collect(),
        };
        Self {
            shape: ForecastShape::DailyArrays(arrays),
            degraded: Some(reason.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Canonical weekly weather summary
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct WeatherSummary {
    #[serde(rename = "avg_temp_c")]
    pub average_temperature_celsius: Option<f64>,
    #[serde(rename = "weekly_rain_mm")]
    pub total_rainfall_mm: Option<f64>,
}

/// Reduce a forecast to its weekly average temperature and total rainfall.
///
/// Temperature is a mean over the samples that are present. Rainfall differs
/// per shape: Shape A sums the numeric entries, Shape B counts a missing day
/// as zero rain.
pub fn summarize(forecast: &WeatherForecast) -> WeatherSummary {
    match &forecast.shape {
        ForecastShape::DailyArrays(arrays) => summarize_daily_arrays(arrays),
        ForecastShape::DailyList(list) => summarize_daily_list(list),
    }
}

fn summarize_daily_arrays(arrays: &DailyArrays) -> WeatherSummary {
    WeatherSummary {
        average_temperature_celsius: mean(
            arrays.temperature_2m_mean.iter().filter_map(Sample::as_f64),
        ),
        total_rainfall_mm: total(arrays.precipitation_sum.iter().filter_map(Sample::as_f64)),
    }
}

fn summarize_daily_list(list: &DailyList) -> WeatherSummary {
    let day_temperatures = list
        .daily
        .iter()
        .filter_map(|day| day.temp.as_ref()?.day.as_ref()?.as_f64());

    let average_temperature_celsius = mean(day_temperatures)
        .or_else(|| list.current.as_ref()?.temp.as_ref()?.as_f64());

    let total_rainfall_mm = total(
        list.daily
            .iter()
            .map(|day| day.rain.as_ref().and_then(Sample::as_f64).unwrap_or(0.0)),
    );

    WeatherSummary {
        average_temperature_celsius,
        total_rainfall_mm,
    }
}

// Finite inputs can still overflow; an infinite aggregate is reported as absent.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    Some(sum / count as f64).filter(|avg| count > 0 && avg.is_finite())
}

fn total(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    Some(sum).filter(|sum| count > 0 && sum.is_finite())
}
