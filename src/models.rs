use crate::clock::DaySelector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type RecipientId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipient {
    pub id: RecipientId,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SleepInterval {
    pub id: u64,
    pub recipient_id: RecipientId,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl SleepInterval {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedingEvent {
    pub id: u64,
    pub recipient_id: RecipientId,
    pub amount_ml: u32,
    pub timestamp: DateTime<Utc>,
}

/// The whole persisted record store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub recipients: BTreeMap<RecipientId, Recipient>,
    #[serde(default)]
    pub sleeps: Vec<SleepInterval>,
    #[serde(default)]
    pub feedings: Vec<FeedingEvent>,
    #[serde(default)]
    pub next_sleep_id: u64,
    #[serde(default)]
    pub next_feeding_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Feeding,
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Period {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    /// The last 90 days.
    #[serde(rename = "all")]
    All,
}

impl Period {
    pub fn days(self) -> u32 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::All => 90,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Week => "last 7 days",
            Period::Month => "last 30 days",
            Period::All => "all time",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub recipient_id: RecipientId,
    pub display_name: String,
}

/// Empty body means "now"; `time` switches to manual entry.
#[derive(Debug, Deserialize, Default)]
pub struct SleepActionRequest {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub day: DaySelector,
}

#[derive(Debug, Deserialize)]
pub struct FeedingRequest {
    pub amount: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub metric: Metric,
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipientResponse {
    pub recipient_id: RecipientId,
    pub display_name: String,
    pub created: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SleepStartedResponse {
    pub recipient_id: RecipientId,
    pub start: DateTime<Utc>,
    pub start_local: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SleepEndedResponse {
    pub recipient_id: RecipientId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub minutes: u64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStateResponse {
    pub recipient_id: RecipientId,
    pub open: bool,
    pub start: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedingResponse {
    pub recipient_id: RecipientId,
    pub amount_ml: u32,
    pub timestamp: DateTime<Utc>,
    pub sleep_open: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Buckets {
    pub day: u64,
    pub night: u64,
}

impl Buckets {
    pub fn total(&self) -> u64 {
        self.day + self.night
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyBuckets {
    pub date: String,
    pub feeding_ml: Buckets,
    pub sleep_minutes: Buckets,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RollingTotals {
    pub since: String,
    pub feeding_ml: u64,
    pub sleep_minutes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub recipient_id: RecipientId,
    pub today: DailyBuckets,
    pub last_7_days: RollingTotals,
    pub last_30_days: RollingTotals,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub metric: Metric,
    pub period: Period,
    pub points: Vec<SeriesPoint>,
}
