use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Critical,
    Warning,
    Info,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Urgent,
    Moderate,
    Low,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u32,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub message: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub priority: AlertPriority,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    High,
    Medium,
    Low,
}

impl SafetyLevel {
    /// Above 70 is high, above 40 medium.
    pub fn from_score(score: u8) -> Self {
        match score {
            71.. => SafetyLevel::High,
            41..=70 => SafetyLevel::Medium,
            _ => SafetyLevel::Low,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport {
    pub location: String,
    pub safety_score: u8,
    pub level: SafetyLevel,
    pub nearby_services: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Active,
    Upcoming,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: u32,
    pub title: String,
    pub dates: String,
    pub location: String,
    pub duration: String,
    pub status: TripStatus,
    pub progress: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
    Current,
    Upcoming,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Transport,
    Accommodation,
    Sightseeing,
    Dining,
    Activity,
    Shopping,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Completed,
    Current,
    Pending,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub time: String,
    pub activity: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub status: ActivityStatus,
    pub safety: SafetyLevel,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub date: String,
    pub title: String,
    pub status: DayStatus,
    pub activities: Vec<Activity>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactCategory {
    Emergency,
    Travel,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub number: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub category: ContactCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_thresholds() {
        assert_eq!(SafetyLevel::from_score(85), SafetyLevel::High);
        assert_eq!(SafetyLevel::from_score(71), SafetyLevel::High);
        assert_eq!(SafetyLevel::from_score(70), SafetyLevel::Medium);
        assert_eq!(SafetyLevel::from_score(41), SafetyLevel::Medium);
        assert_eq!(SafetyLevel::from_score(40), SafetyLevel::Low);
        assert_eq!(SafetyLevel::from_score(0), SafetyLevel::Low);
    }

    #[test]
    fn alert_type_field_is_renamed() {
        let value = serde_json::to_value(AlertType::Critical).unwrap();
        assert_eq!(value, "critical");
    }
}
