//! Robot selection by status and place.

use serde::{Deserialize, Serialize};
use sparkx_types::{RobotSnapshot, RobotStatus};

/// Exact-match filter over robots. Every criterion that is set must match;
/// an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotFilter {
    pub status: Option<RobotStatus>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub location: Option<String>,
}

impl RobotFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.country.is_none()
            && self.region.is_none()
            && self.location.is_none()
    }

    pub fn matches(&self, robot: &RobotSnapshot) -> bool {
        fn field_matches(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().is_none_or(|w| w == actual)
        }

        self.status.as_ref().is_none_or(|s| *s == robot.status)
            && field_matches(&self.country, &robot.country)
            && field_matches(&self.region, &robot.region)
            && field_matches(&self.location, &robot.location)
    }

    /// Robots matching the filter, in input order.
    pub fn apply<'a>(&'a self, robots: &'a [RobotSnapshot]) -> impl Iterator<Item = &'a RobotSnapshot> {
        robots.iter().filter(move |r| self.matches(r))
    }

    /// Query parameters for `GET /api/robots`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(country) = &self.country {
            pairs.push(("country", country.clone()));
        }
        if let Some(region) = &self.region {
            pairs.push(("region", region.clone()));
        }
        if let Some(location) = &self.location {
            pairs.push(("location", location.clone()));
        }
        pairs
    }

    /// Short human-readable form, e.g. `status=online country=USA`.
    pub fn describe(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> Vec<RobotSnapshot> {
        vec![
            RobotSnapshot::builder("a")
                .status(RobotStatus::Online)
                .place("Dock", "CA", "USA", "North America")
                .build(),
            RobotSnapshot::builder("b")
                .status(RobotStatus::Error)
                .place("Dock", "CA", "USA", "North America")
                .build(),
            RobotSnapshot::builder("c")
                .status(RobotStatus::Online)
                .place("Lab", "", "Germany", "Europe")
                .build(),
        ]
    }

    fn ids<'a>(robots: impl Iterator<Item = &'a RobotSnapshot>) -> Vec<&'a str> {
        robots.map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let robots = fleet();
        let filter = RobotFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(filter.apply(&robots)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_all_criteria_must_match() {
        let robots = fleet();
        let filter = RobotFilter {
            status: Some(RobotStatus::Online),
            country: Some("USA".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&robots)), vec!["a"]);
    }

    #[test]
    fn test_match_is_exact() {
        let robots = fleet();
        let filter = RobotFilter {
            location: Some("dock".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&robots).count(), 0);
    }

    #[test]
    fn test_query_pairs() {
        let filter = RobotFilter {
            status: Some(RobotStatus::Charging),
            region: Some("Europe".into()),
            ..Default::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("status", "charging".to_string()), ("region", "Europe".to_string())]
        );
        assert_eq!(filter.describe(), "status=charging region=Europe");
    }
}
