use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Click-through rate as a percentage. Zero impressions yield 0 rather than
/// a division error.
pub fn ctr(clicks: i64, impressions: i64) -> f64 {
    if impressions == 0 {
        0.0
    } else {
        clicks as f64 * 100.0 / impressions as f64
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub active: i64,
    pub expired: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleCounts {
    pub scheduled: i64,
    pub running: i64,
    pub completed: i64,
    pub failed: i64,
    pub cancelled: i64,
    pub paused: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub ads: AdCounts,
    pub schedules: ScheduleCounts,
    pub impressions: i64,
    pub clicks: i64,
    pub ctr: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopAdEntry {
    pub id: Uuid,
    pub title: String,
    pub impressions: i64,
    pub clicks: i64,
    pub ctr: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopAdsResponse {
    pub ads: Vec<TopAdEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueResponse {
    pub orders: i64,
    pub revenue_cents: i64,
}
