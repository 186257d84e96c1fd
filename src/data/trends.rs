//! Hourly battery and temperature trends over the last 24 hours.
//!
//! Samples are bucketed by the UTC hour of their timestamp. The output always
//! has 24 points labelled `0:00` to `23:00`; hours without samples report
//! zeros.

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::Serialize;
use sparkx_types::TelemetrySample;

use super::fleet::{round_half_up, round_tenth};

const HOURS: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryTrendPoint {
    pub time: String,
    pub avg_battery: i64,
    pub min_battery: f64,
    pub max_battery: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureTrendPoint {
    pub time: String,
    pub avg_temp: f64,
    pub max_temp: f64,
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    total: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl Bucket {
    fn new(value: f64) -> Self {
        Self {
            total: value,
            count: 1,
            min: value,
            max: value,
        }
    }

    fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn mean(&self) -> f64 {
        self.total / self.count as f64
    }
}

fn hour_label(hour: usize) -> String {
    format!("{}:00", hour)
}

/// Fold `(timestamp, value)` pairs inside `[now - 24h, now]` into hour buckets.
fn bucket_by_hour(
    values: impl Iterator<Item = (DateTime<Utc>, f64)>,
    now: DateTime<Utc>,
) -> [Option<Bucket>; HOURS] {
    let since = now - TimeDelta::hours(24);
    let mut buckets: [Option<Bucket>; HOURS] = [None; HOURS];

    for (at, value) in values {
        if at < since || at > now || !value.is_finite() {
            continue;
        }
        match &mut buckets[at.hour() as usize] {
            Some(bucket) => bucket.add(value),
            empty => *empty = Some(Bucket::new(value)),
        }
    }

    buckets
}

pub fn battery_trends(samples: &[TelemetrySample], now: DateTime<Utc>) -> Vec<BatteryTrendPoint> {
    let buckets = bucket_by_hour(samples.iter().map(|s| (s.recorded_at, s.battery)), now);

    buckets
        .iter()
        .enumerate()
        .map(|(hour, bucket)| match bucket {
            Some(b) => BatteryTrendPoint {
                time: hour_label(hour),
                avg_battery: round_half_up(b.mean()),
                min_battery: b.min,
                max_battery: b.max,
            },
            None => BatteryTrendPoint {
                time: hour_label(hour),
                avg_battery: 0,
                min_battery: 0.0,
                max_battery: 0.0,
            },
        })
        .collect()
}

/// Temperature trend. Samples without a temperature are skipped.
pub fn temperature_trends(
    samples: &[TelemetrySample],
    now: DateTime<Utc>,
) -> Vec<TemperatureTrendPoint> {
    let readings = samples
        .iter()
        .filter_map(|s| s.temperature.map(|t| (s.recorded_at, t)));
    let buckets = bucket_by_hour(readings, now);

    buckets
        .iter()
        .enumerate()
        .map(|(hour, bucket)| TemperatureTrendPoint {
            time: hour_label(hour),
            avg_temp: bucket.map_or(0.0, |b| round_tenth(b.mean())),
            max_temp: bucket.map_or(0.0, |b| round_tenth(b.max)),
        })
        .collect()
}
