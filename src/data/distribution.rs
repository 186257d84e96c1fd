//! Categorical breakdowns of a robot collection.
//!
//! Status and regional distributions list only the categories that occur,
//! in the order they are first seen. Battery and temperature distributions
//! always list every bucket, including empty ones.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use serde::Serialize;
use sparkx_types::RobotSnapshot;

use super::classify::{classify_battery, status_color, BatteryLevel, TemperatureBand, GRAY};
use super::thresholds::{BatteryThresholds, TemperatureThresholds};

/// One slice of a distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub name: String,
    pub value: usize,
    pub fill: &'static str,
}

/// Count occurrences of each key, keeping keys in first-seen order.
pub(crate) fn count_first_seen<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts
}

pub fn status_distribution(robots: &[RobotSnapshot]) -> Vec<DistributionEntry> {
    count_first_seen(robots.iter().map(|r| &r.status))
        .into_iter()
        .map(|(status, value)| DistributionEntry {
            name: status.label(),
            value,
            fill: status_color(status),
        })
        .collect()
}

pub fn battery_distribution(
    robots: &[RobotSnapshot],
    thresholds: &BatteryThresholds,
) -> Vec<DistributionEntry> {
    let mut counts = [0usize; 5];
    for robot in robots {
        counts[classify_battery(robot.battery, thresholds) as usize] += 1;
    }

    BatteryLevel::ALL
        .iter()
        .zip(counts)
        .map(|(level, value)| DistributionEntry {
            name: level.range_label(thresholds),
            value,
            fill: level.color(),
        })
        .collect()
}

pub fn temperature_distribution(
    robots: &[RobotSnapshot],
    thresholds: &TemperatureThresholds,
) -> Vec<DistributionEntry> {
    let mut counts = [0usize; 3];
    for robot in robots {
        counts[TemperatureBand::classify(robot.temperature, thresholds) as usize] += 1;
    }

    TemperatureBand::ALL
        .iter()
        .zip(counts)
        .map(|(band, value)| DistributionEntry {
            name: band.range_label(thresholds),
            value,
            fill: band.color(),
        })
        .collect()
}

fn region_color(region: &str) -> &'static str {
    match region {
        "North America" => "#3b82f6",
        "Europe" => "#10b981",
        "Asia Pacific" => "#f59e0b",
        "South America" => "#ef4444",
        _ => GRAY,
    }
}

pub fn regional_distribution(robots: &[RobotSnapshot]) -> Vec<DistributionEntry> {
    count_first_seen(robots.iter().map(|r| r.region.as_str()))
        .into_iter()
        .map(|(region, value)| DistributionEntry {
            name: region.to_string(),
            value,
            fill: region_color(region),
        })
        .collect()
}

/// Distinct values available for filtering, each sorted ascending.
/// Empty strings are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub countries: Vec<String>,
    pub states: Vec<String>,
    pub regions: Vec<String>,
}

pub fn filter_options(robots: &[RobotSnapshot]) -> FilterOptions {
    fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
        values
            .filter(|v| !v.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    FilterOptions {
        locations: distinct(robots.iter().map(|r| &r.location)),
        countries: distinct(robots.iter().map(|r| &r.country)),
        states: distinct(robots.iter().map(|r| &r.state)),
        regions: distinct(robots.iter().map(|r| &r.region)),
    }
}

/// Robot count at one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceCount {
    pub name: String,
    pub count: usize,
}

fn ranked<'a>(places: impl Iterator<Item = &'a str>) -> Vec<PlaceCount> {
    let mut stats: Vec<PlaceCount> = count_first_seen(places)
        .into_iter()
        .map(|(name, count)| PlaceCount {
            name: name.to_string(),
            count,
        })
        .collect();
    // Stable: equal counts keep first-seen order.
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Robots per location, most populated first.
pub fn location_stats(robots: &[RobotSnapshot]) -> Vec<PlaceCount> {
    ranked(robots.iter().map(|r| r.location.as_str()))
}

/// Robots per country, most populated first.
pub fn country_stats(robots: &[RobotSnapshot]) -> Vec<PlaceCount> {
    ranked(robots.iter().map(|r| r.country.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ThresholdConfig;
    use sparkx_types::RobotStatus;

    const T: ThresholdConfig = ThresholdConfig::DEFAULT;

    fn with_status(status: RobotStatus) -> RobotSnapshot {
        RobotSnapshot::builder("r").status(status).build()
    }

    fn at(id: &str, location: &str, country: &str, region: &str) -> RobotSnapshot {
        RobotSnapshot::builder(id)
            .place(location, "", country, region)
            .build()
    }

    #[test]
    fn test_status_distribution_only_present_statuses() {
        let robots = vec![
            with_status(RobotStatus::Online),
            with_status(RobotStatus::Offline),
            with_status(RobotStatus::Charging),
        ];

        let dist = status_distribution(&robots);
        assert_eq!(dist.len(), 3);
        assert!(dist.iter().all(|e| e.value == 1));
        let names: Vec<&str> = dist.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Online", "Offline", "Charging"]);
        assert_eq!(dist[2].fill, "#3b82f6");
    }

    #[test]
    fn test_status_distribution_unknown_is_gray() {
        let robots = vec![
            with_status(RobotStatus::Unknown("maintenance".into())),
            with_status(RobotStatus::Error),
            with_status(RobotStatus::Unknown("maintenance".into())),
        ];

        let dist = status_distribution(&robots);
        assert_eq!(
            dist[0],
            DistributionEntry {
                name: "Maintenance".into(),
                value: 2,
                fill: GRAY,
            }
        );
        assert_eq!(dist[1].fill, "#ef4444");
    }

    #[test]
    fn test_battery_distribution_always_five_entries() {
        for n in [0usize, 1, 7] {
            let robots: Vec<_> = (0..n)
                .map(|i| RobotSnapshot::builder(i.to_string()).battery(i as f64 * 15.0).build())
                .collect();
            let dist = battery_distribution(&robots, &T.battery);
            assert_eq!(dist.len(), 5);
            assert_eq!(dist.iter().map(|e| e.value).sum::<usize>(), n);
        }
    }

    #[test]
    fn test_battery_distribution_buckets() {
        let robots: Vec<_> = [20.0, 21.0, 55.0, 90.0, 91.0, 100.0]
            .iter()
            .map(|&b| RobotSnapshot::builder("r").battery(b).build())
            .collect();

        let values: Vec<usize> = battery_distribution(&robots, &T.battery)
            .iter()
            .map(|e| e.value)
            .collect();
        assert_eq!(values, vec![1, 1, 1, 1, 2]);
    }

    #[test]
    fn test_temperature_distribution() {
        let robots: Vec<_> = [30.0, 45.0, 60.0, 61.0]
            .iter()
            .map(|&t| RobotSnapshot::builder("r").temperature(t).build())
            .collect();

        let dist = temperature_distribution(&robots, &T.temperature);
        let values: Vec<usize> = dist.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![1, 2, 1]);
        assert_eq!(dist[0].name, "Normal (<45°C)");
        assert_eq!(dist[2].fill, "#ef4444");

        assert!(temperature_distribution(&[], &T.temperature)
            .iter()
            .all(|e| e.value == 0));
    }

    #[test]
    fn test_regional_distribution_first_seen() {
        let robots = vec![
            at("a", "", "", "Europe"),
            at("b", "", "", "North America"),
            at("c", "", "", "Europe"),
            at("d", "", "", "Antarctica"),
        ];

        let dist = regional_distribution(&robots);
        assert_eq!(dist.len(), 3);
        assert_eq!(dist[0].name, "Europe");
        assert_eq!(dist[0].value, 2);
        assert_eq!(dist[1].fill, "#3b82f6");
        assert_eq!(dist[2].fill, GRAY);
    }

    #[test]
    fn test_filter_options_sorted_unique_non_empty() {
        let robots = vec![
            at("a", "Plant B", "USA", "North America"),
            at("b", "Plant A", "Germany", "Europe"),
            at("c", "Plant B", "", "Europe"),
        ];

        let opts = filter_options(&robots);
        assert_eq!(opts.locations, vec!["Plant A", "Plant B"]);
        assert_eq!(opts.countries, vec!["Germany", "USA"]);
        assert_eq!(opts.regions, vec!["Europe", "North America"]);
        assert!(opts.states.is_empty());
    }

    #[test]
    fn test_location_stats_sorted_by_count_stable() {
        let robots = vec![
            at("a", "Dock", "USA", ""),
            at("b", "Lab", "Japan", ""),
            at("c", "Yard", "Japan", ""),
            at("d", "Lab", "USA", ""),
            at("e", "Yard", "Brazil", ""),
        ];

        let locations = location_stats(&robots);
        let names: Vec<&str> = locations.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Lab", "Yard", "Dock"]);
        assert_eq!(locations[0].count, 2);

        let countries = country_stats(&robots);
        let names: Vec<&str> = countries.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["USA", "Japan", "Brazil"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(status_distribution(&[]).is_empty());
        assert!(regional_distribution(&[]).is_empty());
        assert!(location_stats(&[]).is_empty());
        assert_eq!(filter_options(&[]), FilterOptions::default());
    }
}
