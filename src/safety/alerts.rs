use super::model::{ Alert, AlertType };

use chrono::{ DateTime, Utc };
use serde::Deserialize;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertFilter {
    #[default]
    All,
    Critical,
    Warning,
    Info,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        match self {
            AlertFilter::All => true,
            AlertFilter::Critical => alert.alert_type == AlertType::Critical,
            AlertFilter::Warning => alert.alert_type == AlertType::Warning,
            AlertFilter::Info => alert.alert_type == AlertType::Info,
        }
    }
}

impl FromStr for AlertFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(AlertFilter::All),
            "critical" => Ok(AlertFilter::Critical),
            "warning" => Ok(AlertFilter::Warning),
            "info" => Ok(AlertFilter::Info),
            other => Err(format!("Unknown alert filter: {}", other)),
        }
    }
}

/// Alert list owned by one view.
#[derive(Debug, Clone, Default)]
pub struct AlertFeed {
    alerts: Vec<Alert>,
}

impl AlertFeed {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn filter(&self, filter: AlertFilter) -> Vec<&Alert> {
        self.alerts
            .iter()
            .filter(|a| filter.matches(a))
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| !a.read)
            .count()
    }

    /// Returns false when no alert has this id.
    pub fn mark_as_read(&mut self, id: u32) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.read = true;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: u32) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }
}

/// `"30m ago"`, `"2h ago"`, `"3d ago"`.
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes().max(0);
    if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::provider::{ MockSafetyData, SafetyDataProvider };
    use chrono::Duration;

    async fn feed() -> AlertFeed {
        AlertFeed::new(MockSafetyData::new().fetch_alerts().await.unwrap())
    }

    #[tokio::test]
    async fn filters_by_type() {
        let feed = feed().await;
        assert_eq!(feed.filter(AlertFilter::All).len(), 5);
        assert_eq!(feed.filter(AlertFilter::Critical).len(), 2);
        assert_eq!(feed.filter(AlertFilter::Warning).len(), 2);
        assert_eq!(feed.filter(AlertFilter::Info).len(), 1);
    }

    #[tokio::test]
    async fn mark_as_read_lowers_unread_count() {
        let mut feed = feed().await;
        assert_eq!(feed.unread_count(), 2);
        assert!(feed.mark_as_read(1));
        assert_eq!(feed.unread_count(), 1);
        assert!(feed.mark_as_read(1));
        assert_eq!(feed.unread_count(), 1);
        assert!(!feed.mark_as_read(42));
    }

    #[tokio::test]
    async fn delete_removes_only_that_alert() {
        let mut feed = feed().await;
        assert!(feed.delete(2));
        assert!(!feed.delete(2));
        assert_eq!(feed.all().len(), 4);
        assert_eq!(feed.unread_count(), 1);
    }

    #[test]
    fn parses_filter_names() {
        assert_eq!("".parse::<AlertFilter>().unwrap(), AlertFilter::All);
        assert_eq!("Critical".parse::<AlertFilter>().unwrap(), AlertFilter::Critical);
        assert!("urgent".parse::<AlertFilter>().is_err());
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative(now - Duration::minutes(30), now), "30m ago");
        assert_eq!(format_relative(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(format_relative(now - Duration::hours(2), now), "2h ago");
        assert_eq!(format_relative(now - Duration::hours(23), now), "23h ago");
        assert_eq!(format_relative(now - Duration::hours(49), now), "2d ago");
        assert_eq!(format_relative(now + Duration::minutes(5), now), "0m ago");
    }
}
