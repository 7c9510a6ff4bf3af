//! Suitability scoring for a single weather sample
//!
//! Pure function: no side effects, no clock. Starts at 100, applies
//! independent additive adjustments, clamps to 0-100 only at the end.

use shared::{AlertLevel, Recommendation, ScoreResult, Suitability, WeatherSample};

/// Score one sample for drying suitability.
pub fn score_sample(sample: &WeatherSample) -> ScoreResult {
    let condition = sample.condition_lower();
    let mut score: i32 = 100;
    let mut issues: Vec<String> = Vec::new();
    let mut recommendations: Vec<String> = Vec::new();

    // Precipitation probability, highest threshold first
    let pop_percent = (sample.pop * 100.0).round() as i32;
    if sample.pop > 0.7 {
        score -= 50;
        issues.push(format!("High chance of precipitation ({}%)", pop_percent));
    } else if sample.pop > 0.5 {
        score -= 35;
        issues.push(format!("Moderate chance of precipitation ({}%)", pop_percent));
    } else if sample.pop > 0.3 {
        score -= 20;
        issues.push(format!("Some chance of precipitation ({}%)", pop_percent));
    }

    // Actual rain amount
    if sample.rain_3h_mm > 2.0 {
        score -= 45;
        issues.push(format!("Heavy rain expected ({:.1}mm)", sample.rain_3h_mm));
    } else if sample.rain_3h_mm > 0.5 {
        score -= 30;
        issues.push(format!("Moderate rain expected ({:.1}mm)", sample.rain_3h_mm));
    } else if sample.rain_3h_mm > 0.0 {
        score -= 15;
        issues.push(format!("Light rain expected ({:.1}mm)", sample.rain_3h_mm));
    }

    // Rain in the condition category, on top of the amount penalty
    if condition.contains("rain") || condition.contains("drizzle") {
        score -= 25;
        if !issues.iter().any(|issue| issue.to_lowercase().contains("rain")) {
            issues.push("Rain expected".to_string());
        }
    }

    if condition.contains("snow") || sample.snow_3h_mm > 0.0 {
        score -= 50;
        issues.push("Snow expected".to_string());
    }

    if condition.contains("thunderstorm") {
        score -= 60;
        issues.push("Thunderstorm expected".to_string());
    }

    // Humidity
    if sample.humidity_percent > 80.0 {
        score -= 25;
        issues.push("Very high humidity".to_string());
    } else if sample.humidity_percent > 65.0 {
        score -= 15;
        issues.push("High humidity".to_string());
    }

    // Temperature
    if sample.temperature_celsius < 5.0 {
        score -= 20;
        issues.push("Very cold temperature".to_string());
    } else if sample.temperature_celsius < 10.0 {
        score -= 10;
        issues.push("Cold temperature".to_string());
    }

    // Wind is good for drying
    if sample.wind_speed_mps > 5.0 {
        score += 10;
        recommendations.push("Good wind for drying".to_string());
    }

    if condition.contains("clear") || condition.contains("sun") {
        score += 15;
        recommendations.push("Sunny weather ideal for drying".to_string());
    }

    let score = score.clamp(0, 100);

    ScoreResult {
        score,
        issues,
        recommendations,
        suitability: Suitability::from_score(f64::from(score)),
        pop: sample.pop,
        rain_amount_mm: sample.rain_3h_mm,
    }
}

/// Turn a score result into a one-line verdict with an alert level.
///
/// The base message follows the suitability bucket; rain-amount suffixes
/// apply on top and heavy rain forces the destructive level.
pub fn recommendation_message(result: &ScoreResult) -> Recommendation {
    let pop_percent = (result.pop * 100.0).round() as i64;
    let mut level = AlertLevel::Default;

    let mut message = match result.suitability {
        Suitability::Excellent => {
            let mut text =
                "\u{1F31F} Perfect day for laundry! Excellent drying conditions.".to_string();
            if result.pop > 0.0 {
                text.push_str(&format!(" Low rain chance ({}%).", pop_percent));
            }
            text
        }
        Suitability::Good => {
            let mut text =
                "\u{2705} Good day for laundry! Generally favorable conditions.".to_string();
            if result.pop > 0.3 {
                text.push_str(&format!(
                    " Watch for possible rain ({}% chance).",
                    pop_percent
                ));
            }
            text
        }
        Suitability::Fair => {
            let mut text = "\u{26A0}\u{FE0F} Fair conditions for laundry.".to_string();
            if result.pop > 0.5 {
                text.push_str(&format!(
                    " High rain chance ({}%) - consider waiting.",
                    pop_percent
                ));
            } else {
                text.push_str(" Consider waiting for better weather.");
            }
            text
        }
        Suitability::Poor => {
            level = AlertLevel::Destructive;
            let mut text = "\u{274C} Not recommended for laundry today.".to_string();
            if result.pop > 0.7 {
                text.push_str(&format!(" Very high rain chance ({}%).", pop_percent));
            } else if result.rain_amount_mm > 0.0 {
                text.push_str(&format!(" Rain expected ({:.1}mm).", result.rain_amount_mm));
            } else {
                text.push_str(" Poor drying conditions.");
            }
            text
        }
    };

    if result.rain_amount_mm > 2.0 {
        message.push_str(" \u{26C8}\u{FE0F} Heavy rain expected - definitely avoid laundry!");
        level = AlertLevel::Destructive;
    } else if result.rain_amount_mm > 0.5 {
        message.push_str(" \u{1F327}\u{FE0F} Moderate rain expected.");
    }

    Recommendation { message, level }
}
