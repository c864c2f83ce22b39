//! Dashboard summary shown on the landing page.

use crate::activity::{ActivityStatus, StatusBreakdown};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub id: u64,
    pub title: String,
    pub date: String,
    pub status: ActivityStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_activities: u64,
    #[serde(default)]
    pub by_status: StatusBreakdown,
    #[serde(default)]
    pub by_type: BTreeMap<String, u64>,
    #[serde(default)]
    pub recent_activities: Vec<RecentActivity>,
}
