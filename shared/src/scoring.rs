//! Suitability scoring engine
//!
//! Maps a weather sample and an event category to a heuristic 0-100 score,
//! with category-specific threshold tables for temperature, precipitation
//! probability, wind speed, and a condition bonus. Deterministic and
//! side-effect free.

use rust_decimal::Decimal;

use crate::models::{EventCategory, SuitabilityAssessment, SuitabilityLevel, WeatherSample};

/// Inclusive temperature band in whole degrees Celsius
struct TempBand {
    min: i64,
    max: i64,
    points: i32,
}

/// Strict upper-bound band (precipitation probability %, wind km/h)
struct UpperBand {
    below: i64,
    points: i32,
}

/// Condition-code bonus: first set containing the sample's condition wins
struct ConditionBonus {
    conditions: &'static [&'static str],
    points: i32,
}

/// Per-category scoring profile. Bands are evaluated top to bottom and the
/// first matching band wins; bands are not cumulative.
struct CategoryProfile {
    temperature: &'static [TempBand],
    precipitation: &'static [UpperBand],
    wind: &'static [UpperBand],
    condition: &'static [ConditionBonus],
}

const OUTDOOR_SPORTS: CategoryProfile = CategoryProfile {
    temperature: &[
        TempBand { min: 15, max: 30, points: 30 },
        TempBand { min: 10, max: 35, points: 20 },
        TempBand { min: 5, max: 40, points: 10 },
    ],
    precipitation: &[
        UpperBand { below: 20, points: 25 },
        UpperBand { below: 40, points: 15 },
        UpperBand { below: 60, points: 5 },
    ],
    wind: &[
        UpperBand { below: 20, points: 20 },
        UpperBand { below: 30, points: 10 },
        UpperBand { below: 40, points: 5 },
    ],
    condition: &[
        ConditionBonus { conditions: &["Clear", "Clouds"], points: 25 },
        ConditionBonus { conditions: &["Mist"], points: 10 },
    ],
};

const WEDDING: CategoryProfile = CategoryProfile {
    temperature: &[
        TempBand { min: 18, max: 28, points: 30 },
        TempBand { min: 15, max: 32, points: 20 },
        TempBand { min: 10, max: 35, points: 10 },
    ],
    precipitation: &[
        UpperBand { below: 10, points: 30 },
        UpperBand { below: 20, points: 15 },
        UpperBand { below: 30, points: 5 },
    ],
    wind: &[
        UpperBand { below: 15, points: 25 },
        UpperBand { below: 25, points: 15 },
        UpperBand { below: 35, points: 5 },
    ],
    condition: &[
        ConditionBonus { conditions: &["Clear"], points: 15 },
        ConditionBonus { conditions: &["Clouds"], points: 10 },
    ],
};

const HIKING: CategoryProfile = CategoryProfile {
    temperature: &[
        TempBand { min: 10, max: 25, points: 30 },
        TempBand { min: 5, max: 30, points: 20 },
        TempBand { min: 0, max: 35, points: 10 },
    ],
    precipitation: &[
        UpperBand { below: 15, points: 25 },
        UpperBand { below: 30, points: 15 },
        UpperBand { below: 50, points: 5 },
    ],
    wind: &[
        UpperBand { below: 25, points: 20 },
        UpperBand { below: 35, points: 15 },
        UpperBand { below: 45, points: 10 },
    ],
    condition: &[
        ConditionBonus { conditions: &["Clear", "Clouds"], points: 25 },
        ConditionBonus { conditions: &["Mist"], points: 15 },
    ],
};

/// Generic outdoor profile for corporate outings and uncategorized events
const GENERIC: CategoryProfile = CategoryProfile {
    temperature: &[TempBand { min: 15, max: 30, points: 25 }],
    precipitation: &[UpperBand { below: 20, points: 25 }],
    wind: &[UpperBand { below: 25, points: 25 }],
    condition: &[ConditionBonus { conditions: &["Clear", "Clouds"], points: 25 }],
};

fn profile(category: EventCategory) -> &'static CategoryProfile {
    match category {
        EventCategory::OutdoorSports => &OUTDOOR_SPORTS,
        EventCategory::Wedding => &WEDDING,
        EventCategory::Hiking => &HIKING,
        EventCategory::CorporateOuting | EventCategory::Other => &GENERIC,
    }
}

fn temperature_points(bands: &[TempBand], temp: Decimal) -> i32 {
    bands
        .iter()
        .find(|b| temp >= Decimal::from(b.min) && temp <= Decimal::from(b.max))
        .map(|b| b.points)
        .unwrap_or(0)
}

fn upper_band_points(bands: &[UpperBand], value: Decimal) -> i32 {
    bands
        .iter()
        .find(|b| value < Decimal::from(b.below))
        .map(|b| b.points)
        .unwrap_or(0)
}

fn condition_points(bonuses: &[ConditionBonus], condition: &str) -> i32 {
    bonuses
        .iter()
        .find(|b| b.conditions.contains(&condition))
        .map(|b| b.points)
        .unwrap_or(0)
}

/// Compute the suitability score for a weather sample and event category.
/// Always in [0, 100]. A missing precipitation probability scores as 0%.
pub fn score(sample: &WeatherSample, category: EventCategory) -> i32 {
    let profile = profile(category);
    let precipitation = sample
        .precipitation_probability_percent
        .unwrap_or(Decimal::ZERO);

    let total = temperature_points(profile.temperature, sample.temperature_celsius)
        + upper_band_points(profile.precipitation, precipitation)
        + upper_band_points(profile.wind, sample.wind_speed_kmh)
        + condition_points(profile.condition, &sample.condition);

    total.clamp(0, 100)
}

/// Five fixed recommendation tiers at thresholds 80/60/40/20
pub fn recommendation(score: i32) -> &'static str {
    if score >= 80 {
        "Excellent conditions for your event!"
    } else if score >= 60 {
        "Good conditions with minor considerations"
    } else if score >= 40 {
        "Fair conditions - monitor weather closely"
    } else if score >= 20 {
        "Poor conditions - consider rescheduling"
    } else {
        "Unsuitable conditions - strongly recommend rescheduling"
    }
}

/// Level thresholds (70/40) are intentionally distinct from the
/// recommendation thresholds; the two scales stay independent.
pub fn level(score: i32) -> SuitabilityLevel {
    if score >= 70 {
        SuitabilityLevel::Good
    } else if score >= 40 {
        SuitabilityLevel::Okay
    } else {
        SuitabilityLevel::Poor
    }
}

/// Score a sample and bundle the derived level and recommendation
pub fn assess(sample: &WeatherSample, category: EventCategory) -> SuitabilityAssessment {
    let score = score(sample, category);
    SuitabilityAssessment {
        score,
        level: level(score),
        recommendation: recommendation(score).to_string(),
    }
}
