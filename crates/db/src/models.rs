use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAccount {
    pub id: Uuid,
    pub role: String,
    pub display_name: String,
    pub email: String,
    pub api_token: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAd {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub ad_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub weekdays: Vec<i16>,
    pub priority: i16,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSchedule {
    pub id: Uuid,
    pub ad_id: Uuid,
    pub time_slot_id: Uuid,
    pub run_date: NaiveDate,
    pub status: String,
    pub retry_count: i32,
    pub max_retries: i32,
    pub failure_reason: Option<String>,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbExecutionLog {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub action: String,
    pub status: String,
    pub message: Option<String>,
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbChatMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Projection returned by the conflict query: just enough of the ad to show
/// the caller what blocks the window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbConflictingAd {
    pub id: Uuid,
    pub title: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEventTotals {
    pub impressions: i64,
    pub clicks: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTopAdRow {
    pub id: Uuid,
    pub title: String,
    pub impressions: i64,
    pub clicks: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRevenueRow {
    pub orders: i64,
    pub revenue_cents: i64,
}
