use super::model::*;

use async_trait::async_trait;
use chrono::{ DateTime, Duration, Utc };
use std::error::Error;

const NEARBY_SERVICES: [&str; 3] = ["Police Station - 0.5km", "Hospital - 1.2km", "Embassy - 2.1km"];

/// Source of the dashboard data. A real backend replaces [`MockSafetyData`] without
/// touching the HTTP handlers.
#[async_trait]
pub trait SafetyDataProvider: Send + Sync {
    async fn fetch_alerts(&self) -> Result<Vec<Alert>, Box<dyn Error + Send + Sync>>;
    async fn fetch_trips(&self) -> Result<Vec<Trip>, Box<dyn Error + Send + Sync>>;
    async fn fetch_itinerary(&self) -> Result<Vec<ItineraryDay>, Box<dyn Error + Send + Sync>>;
    async fn fetch_safety_score(
        &self,
        location: &str
    ) -> Result<SafetyReport, Box<dyn Error + Send + Sync>>;
    async fn fetch_contacts(&self) -> Result<Vec<Contact>, Box<dyn Error + Send + Sync>>;
}

/// Fixed sample data. Alert ages are measured from `anchor`.
#[derive(Debug, Clone)]
pub struct MockSafetyData {
    anchor: Option<DateTime<Utc>>,
}

impl Default for MockSafetyData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSafetyData {
    /// Alert ages are measured from the time of each fetch.
    pub fn new() -> Self {
        Self { anchor: None }
    }

    pub fn anchored(anchor: DateTime<Utc>) -> Self {
        Self { anchor: Some(anchor) }
    }

    fn now(&self) -> DateTime<Utc> {
        self.anchor.unwrap_or_else(Utc::now)
    }
}

/// Stable 0..=99 score for a place name. Paris keeps the dashboard's 85.
pub fn mock_score(location: &str) -> u8 {
    let normalized = location.trim().to_lowercase();
    let city = normalized.split(',').next().unwrap_or("").trim();
    if city == "paris" {
        return 85;
    }
    let hash = city.bytes().fold(0xcbf29ce484222325u64, |acc, b| {
        (acc ^ (b as u64)).wrapping_mul(0x100000001b3)
    });
    (hash % 100) as u8
}

fn alert(
    id: u32,
    alert_type: AlertType,
    title: &str,
    message: &str,
    location: &str,
    timestamp: DateTime<Utc>,
    read: bool,
    priority: AlertPriority
) -> Alert {
    Alert {
        id,
        alert_type,
        title: title.into(),
        message: message.into(),
        location: location.into(),
        timestamp,
        read,
        priority,
    }
}

fn act(
    time: &str,
    activity: &str,
    activity_type: ActivityType,
    status: ActivityStatus,
    safety: SafetyLevel
) -> Activity {
    Activity { time: time.into(), activity: activity.into(), activity_type, status, safety }
}

fn contact(
    name: &str,
    number: &str,
    description: &str,
    address: Option<&str>,
    category: ContactCategory
) -> Contact {
    Contact {
        name: name.into(),
        number: number.into(),
        description: description.into(),
        address: address.map(String::from),
        category,
    }
}

#[async_trait]
impl SafetyDataProvider for MockSafetyData {
    async fn fetch_alerts(&self) -> Result<Vec<Alert>, Box<dyn Error + Send + Sync>> {
        use AlertPriority::*;
        use AlertType::*;
        let now = self.now();
        Ok(
            vec![
                alert(
                    1,
                    Critical,
                    "High Crime Area Alert",
                    "You are approaching a high-risk area. Consider taking an alternative route after 9 PM.",
                    "Downtown District, 5th Street",
                    now - Duration::minutes(30),
                    false,
                    Urgent
                ),
                alert(
                    2,
                    Warning,
                    "Weather Advisory",
                    "Heavy rainfall expected in your area. Flooding possible on low-lying roads.",
                    "Paris, France",
                    now - Duration::hours(2),
                    false,
                    Moderate
                ),
                alert(
                    3,
                    Info,
                    "Travel Tip",
                    "Local festival happening nearby. Expect crowded streets and road closures.",
                    "City Center",
                    now - Duration::hours(4),
                    true,
                    Low
                ),
                alert(
                    4,
                    Warning,
                    "Embassy Advisory",
                    "US Embassy advises tourists to avoid political demonstrations in the area.",
                    "Government Quarter",
                    now - Duration::hours(6),
                    true,
                    Moderate
                ),
                alert(
                    5,
                    Critical,
                    "Emergency Services Alert",
                    "Medical emergency reported. Emergency vehicles may cause delays.",
                    "Main Highway, Exit 15",
                    now - Duration::hours(8),
                    true,
                    Urgent
                )
            ]
        )
    }

    async fn fetch_trips(&self) -> Result<Vec<Trip>, Box<dyn Error + Send + Sync>> {
        Ok(
            vec![
                Trip {
                    id: 1,
                    title: "Paris Adventure".into(),
                    dates: "Sep 1 - Sep 7, 2025".into(),
                    location: "Paris, France".into(),
                    duration: "7 days".into(),
                    status: TripStatus::Active,
                    progress: 60,
                },
                Trip {
                    id: 2,
                    title: "Tokyo Explorer".into(),
                    dates: "Oct 15 - Oct 22, 2025".into(),
                    location: "Tokyo, Japan".into(),
                    duration: "8 days".into(),
                    status: TripStatus::Upcoming,
                    progress: 0,
                }
            ]
        )
    }

    async fn fetch_itinerary(&self) -> Result<Vec<ItineraryDay>, Box<dyn Error + Send + Sync>> {
        use ActivityStatus::{ Completed as Done, Current as Now, Pending };
        use ActivityType::{ Accommodation, Dining, Shopping, Sightseeing, Transport };
        use SafetyLevel::{ High, Medium };

        let day = |day: u32, date: &str, title: &str, status: DayStatus, activities: Vec<Activity>| ItineraryDay {
            day,
            date: date.into(),
            title: title.into(),
            status,
            activities,
        };

        Ok(
            vec![
                day(1, "Sep 1, 2025", "Arrival & City Overview", DayStatus::Completed, vec![
                    act("10:00", "Flight arrival CDG", Transport, Done, High),
                    act("12:00", "Hotel check-in - Le Marais", Accommodation, Done, High),
                    act("15:00", "Walking tour - Notre Dame area", Sightseeing, Done, Medium),
                    act("19:00", "Dinner at local bistro", Dining, Done, High)
                ]),
                day(2, "Sep 2, 2025", "Museums & Culture", DayStatus::Completed, vec![
                    act("09:00", "Louvre Museum visit", Sightseeing, Done, High),
                    act("13:00", "Lunch at museum café", Dining, Done, High),
                    act("15:00", "Seine River cruise", ActivityType::Activity, Done, High),
                    act("18:00", "Champs-Élysées shopping", Shopping, Done, Medium)
                ]),
                day(3, "Sep 3, 2025", "Montmartre Exploration", DayStatus::Current, vec![
                    act("09:30", "Metro to Montmartre", Transport, Done, Medium),
                    act("10:00", "Sacré-Cœur visit", Sightseeing, Now, High),
                    act("12:30", "Local artist street tour", ActivityType::Activity, Pending, Medium),
                    act("15:00", "Café break - Place du Tertre", Dining, Pending, High),
                    act("18:00", "Sunset at Sacré-Cœur", Sightseeing, Pending, Medium)
                ]),
                day(4, "Sep 4, 2025", "Palace of Versailles", DayStatus::Upcoming, vec![
                    act("08:00", "Train to Versailles", Transport, Pending, High),
                    act("10:00", "Palace tour", Sightseeing, Pending, High),
                    act("14:00", "Gardens exploration", ActivityType::Activity, Pending, High),
                    act("17:00", "Return to Paris", Transport, Pending, High)
                ])
            ]
        )
    }

    async fn fetch_safety_score(
        &self,
        location: &str
    ) -> Result<SafetyReport, Box<dyn Error + Send + Sync>> {
        let score = mock_score(location);
        Ok(SafetyReport {
            location: location.trim().to_string(),
            safety_score: score,
            level: SafetyLevel::from_score(score),
            nearby_services: NEARBY_SERVICES.iter().map(|s| s.to_string()).collect(),
        })
    }

    async fn fetch_contacts(&self) -> Result<Vec<Contact>, Box<dyn Error + Send + Sync>> {
        use ContactCategory::{ Emergency, Travel };
        Ok(
            vec![
                contact("Emergency Services", "112", "Police, Fire, Medical Emergency", None, Emergency),
                contact("Police", "100", "Non-emergency police assistance", None, Emergency),
                contact("Medical Emergency", "102", "Ambulance and medical help", None, Emergency),
                contact("Fire Department", "101", "Fire emergency and rescue", None, Emergency),
                contact(
                    "US Embassy",
                    "+33-1-43-12-22-22",
                    "American citizens emergency assistance",
                    Some("2 Avenue Gabriel, 75008 Paris"),
                    Travel
                ),
                contact("Tourist Helpline", "+33-1-42-96-70-00", "24/7 tourist information and help", None, Travel),
                contact("Hotel Reception", "+33-1-55-555-555", "Your accommodation front desk", None, Travel)
            ]
        )
    }
}
