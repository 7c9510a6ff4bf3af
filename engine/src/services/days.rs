//! Day-level aggregation and ranking
//!
//! Groups forecast samples by local calendar day, averages their scores,
//! applies day-level precipitation penalties on top, and ranks the days
//! best-first.

use chrono::NaiveDate;
use shared::{DayAggregate, ForecastSeries, RainRisk, Suitability, WeatherSample};

use crate::services::scoring::score_sample;

/// Rank the forecast's days for drying, best first.
///
/// The sort is stable, so days with equal scores keep their chronological
/// order.
pub fn rank_days(forecast: &ForecastSeries) -> Vec<DayAggregate> {
    let mut groups: Vec<(NaiveDate, Vec<&WeatherSample>)> = Vec::new();
    for sample in &forecast.samples {
        let date = forecast.local_date(sample.timestamp);
        match groups.iter_mut().find(|(day, _)| *day == date) {
            Some((_, members)) => members.push(sample),
            None => groups.push((date, vec![sample])),
        }
    }

    let mut days: Vec<DayAggregate> = groups
        .into_iter()
        .map(|(date, members)| aggregate_day(date, &members))
        .collect();

    days.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    days
}

fn aggregate_day(date: NaiveDate, members: &[&WeatherSample]) -> DayAggregate {
    let count = members.len().max(1) as f64;

    let mut score_sum = 0.0;
    let mut has_rain = false;
    let mut max_pop: f64 = 0.0;
    let mut total_rain_mm = 0.0;
    let mut humidity_sum = 0.0;
    let mut temp_sum = 0.0;
    let mut wind_sum = 0.0;
    let mut conditions: Vec<String> = Vec::new();

    for sample in members {
        score_sum += f64::from(score_sample(sample).score);

        if sample.pop > 0.3 || sample.rain_3h_mm > 0.0 {
            has_rain = true;
        }
        max_pop = max_pop.max(sample.pop);
        total_rain_mm += sample.rain_3h_mm;

        humidity_sum += sample.humidity_percent;
        temp_sum += sample.temperature_celsius;
        wind_sum += sample.wind_speed_mps;

        if !conditions.contains(&sample.condition) {
            conditions.push(sample.condition.clone());
        }
    }

    let mut score = score_sum / count;

    // Day-level penalty from the worst precipitation probability
    if max_pop > 0.7 {
        score -= 30.0;
    } else if max_pop > 0.5 {
        score -= 20.0;
    } else if max_pop > 0.3 {
        score -= 10.0;
    }

    // Day-level penalty from accumulated rain
    if total_rain_mm > 5.0 {
        score -= 25.0;
    } else if total_rain_mm > 2.0 {
        score -= 15.0;
    } else if total_rain_mm > 0.0 {
        score -= 5.0;
    }

    // Floor at zero; no upper clamp at day level
    let score = score.max(0.0);

    DayAggregate {
        date,
        score,
        suitability: Suitability::from_score(score),
        rain_risk: RainRisk::from_max_pop(max_pop),
        has_rain,
        max_pop,
        total_rain_mm,
        avg_humidity: humidity_sum / count,
        avg_temp: temp_sum / count,
        avg_wind: wind_sum / count,
        conditions,
    }
}
