//! Crop recommendation rules
//!
//! A fixed, ordered table of threshold rules over weekly temperature,
//! weekly rainfall and soil pH. Every rule is evaluated; matches are returned
//! in table order. The result is never empty: a sentinel entry stands in when
//! inputs are missing or nothing matches.

use serde::{Deserialize, Serialize};

use crate::models::{SoilResult, WeatherSummary};

/// Crop name used when an input needed by the rules is absent
pub const INSUFFICIENT_DATA_CROP: &str = "insufficient-data";

/// Crop name used when no rule matches
pub const NO_MATCH_CROP: &str = "none";

/// A single recommendation entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub crop: String,
    pub reason: String,
}

impl Recommendation {
    pub fn new(crop: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            reason: reason.into(),
        }
    }

    /// True for the insufficient-data and no-match placeholders
    pub fn is_sentinel(&self) -> bool {
        self.crop == INSUFFICIENT_DATA_CROP || self.crop == NO_MATCH_CROP
    }
}

/// Closed numeric interval; both bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn between(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub const fn at_least(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    pub const fn at_most(max: f64) -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Complete numeric inputs for rule evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowingConditions {
    pub temperature_c: f64,
    pub rainfall_mm: f64,
    pub ph: f64,
}

impl GrowingConditions {
    /// Collect the rule inputs, or the names of the ones that are absent
    pub fn from_inputs(
        summary: &WeatherSummary,
        soil: &SoilResult,
    ) -> Result<Self, Vec<&'static str>> {
        match (
            summary.average_temperature_celsius,
            summary.total_rainfall_mm,
            soil.ph,
        ) {
            (Some(temperature_c), Some(rainfall_mm), Some(ph)) => Ok(Self {
                temperature_c,
                rainfall_mm,
                ph,
            }),
            (temperature, rainfall, ph) => {
                let missing = [
                    (temperature.is_none(), "average temperature"),
                    (rainfall.is_none(), "weekly rainfall"),
                    (ph.is_none(), "soil pH"),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                Err(missing)
            }
        }
    }
}

/// One row of the rule table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRule {
    pub crop: &'static str,
    pub reason: &'static str,
    /// Weekly rainfall in mm
    pub rainfall_mm: Bounds,
    /// Weekly mean temperature in °C
    pub temperature_c: Bounds,
    pub ph: Bounds,
}

impl CropRule {
    pub fn matches(&self, conditions: &GrowingConditions) -> bool {
        self.rainfall_mm.contains(conditions.rainfall_mm)
            && self.temperature_c.contains(conditions.temperature_c)
            && self.ph.contains(conditions.ph)
    }

    pub fn recommendation(&self) -> Recommendation {
        Recommendation::new(self.crop, self.reason)
    }
}

/// Rule table in evaluation order
pub const CROP_RULES: [CropRule; 4] = [
    CropRule {
        crop: "rice",
        reason: "high rainfall, warm temp, mildly acidic pH",
        rainfall_mm: Bounds::at_least(100.0),
        temperature_c: Bounds::between(20.0, 32.0),
        ph: Bounds::between(5.5, 6.5),
    },
    CropRule {
        crop: "wheat",
        reason: "moderate rainfall, cool temp, neutral pH",
        rainfall_mm: Bounds::between(10.0, 60.0),
        temperature_c: Bounds::between(12.0, 25.0),
        ph: Bounds::between(6.0, 7.5),
    },
    CropRule {
        crop: "millet",
        reason: "low rainfall, warm temp, neutral pH",
        rainfall_mm: Bounds::at_most(40.0),
        temperature_c: Bounds::between(18.0, 35.0),
        ph: Bounds::between(6.0, 7.5),
    },
    CropRule {
        crop: "maize",
        reason: "moderate rainfall, warm temp, slightly acidic pH",
        rainfall_mm: Bounds::between(40.0, 120.0),
        temperature_c: Bounds::between(18.0, 30.0),
        ph: Bounds::between(5.5, 7.0),
    },
];

/// Recommend crops for a weekly summary and soil reading using [`CROP_RULES`]
pub fn recommend(summary: &WeatherSummary, soil: &SoilResult) -> Vec<Recommendation> {
    recommend_with_rules(summary, soil, &CROP_RULES)
}

/// Recommend crops against an arbitrary ordered rule table
pub fn recommend_with_rules(
    summary: &WeatherSummary,
    soil: &SoilResult,
    rules: &[CropRule],
) -> Vec<Recommendation> {
    match GrowingConditions::from_inputs(summary, soil) {
        Ok(conditions) => evaluate_rules(&conditions, rules),
        Err(missing) => vec![Recommendation::new(
            INSUFFICIENT_DATA_CROP,
            format!(
                "Missing required data for crop recommendation: {}",
                missing.join(", ")
            ),
        )],
    }
}

/// Evaluate every rule in order and append the no-match sentinel if needed
pub fn evaluate_rules(conditions: &GrowingConditions, rules: &[CropRule]) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = rules
        .iter()
        .filter(|rule| rule.matches(conditions))
        .map(CropRule::recommendation)
        .collect();

    if recommendations.is_empty() {
        recommendations.push(Recommendation::new(
            NO_MATCH_CROP,
            format!(
                "No suitable crops (T:{:.1}°C, R:{:.0}mm, pH:{:.1})",
                conditions.temperature_c, conditions.rainfall_mm, conditions.ph
            ),
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(temp: f64, rain: f64) -> WeatherSummary {
        WeatherSummary {
            average_temperature_celsius: Some(temp),
            total_rainfall_mm: Some(rain),
        }
    }

    fn soil(ph: f64) -> SoilResult {
        SoilResult {
            ph: Some(ph),
            ..SoilResult::default()
        }
    }

    fn crops(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.crop.as_str()).collect()
    }

    #[test]
    fn test_rice_first_in_table_order() {
        let recs = recommend(&summary(25.0, 110.0), &soil(6.0));
        assert_eq!(crops(&recs), vec!["rice", "maize"]);
    }

    #[test]
    fn test_wheat_and_maize_overlap() {
        let recs = recommend(&summary(20.0, 50.0), &soil(6.5));
        assert_eq!(crops(&recs), vec!["wheat", "maize"]);
    }

    #[test]
    fn test_millet_and_wheat_below_maize_rain_floor() {
        let recs = recommend(&summary(25.0, 20.0), &soil(6.5));
        assert_eq!(crops(&recs), vec!["wheat", "millet"]);
        assert!(!crops(&recs).contains(&"maize"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        // maize lower corner: rain 40, temp 18, pH 5.5
        let recs = recommend(&summary(18.0, 40.0), &soil(5.5));
        assert!(crops(&recs).contains(&"maize"));

        // rice upper temperature and pH edge
        let recs = recommend(&summary(32.0, 100.0), &soil(6.5));
        assert_eq!(crops(&recs), vec!["rice"]);
    }

    #[test]
    fn test_no_match_sentinel_formats_inputs() {
        let recs = recommend(&summary(25.04, 149.6), &soil(8.04));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].crop, NO_MATCH_CROP);
        assert_eq!(recs[0].reason, "No suitable crops (T:25.0°C, R:150mm, pH:8.0)");
        assert!(recs[0].is_sentinel());
    }

    #[test]
    fn test_missing_ph_yields_single_insufficient_data_entry() {
        let recs = recommend(&summary(25.0, 110.0), &SoilResult::unknown());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].crop, INSUFFICIENT_DATA_CROP);
        assert!(recs[0].reason.ends_with("soil pH"));
    }

    #[test]
    fn test_missing_inputs_are_all_named() {
        let recs = recommend(&WeatherSummary::default(), &SoilResult::unknown());
        assert_eq!(
            recs[0].reason,
            "Missing required data for crop recommendation: average temperature, weekly rainfall, soil pH"
        );
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = [CropRule {
            crop: "sorghum",
            reason: "dry and hot",
            rainfall_mm: Bounds::at_most(30.0),
            temperature_c: Bounds::at_least(25.0),
            ph: Bounds::between(5.0, 8.5),
        }];
        let recs = recommend_with_rules(&summary(30.0, 5.0), &soil(7.0), &rules);
        assert_eq!(recs, vec![Recommendation::new("sorghum", "dry and hot")]);
    }
}
