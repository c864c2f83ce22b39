//! Reporting analytics.

use crate::loading::LoadingFlag;
use rcap_core::analytics::{
    AnalyticsFilters, DateRange, EngagementMetric, EngagementReport, EngagementTrend, Heatmap,
    HeatmapFilters, StatusBreakdown,
};
use rcap_core::envelope::{Data, Envelope};
use rcap_core::error::Result;
use rcap_interaction::ApiClient;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct AnalyticsState {
    status_breakdown: Option<StatusBreakdown>,
    heatmap: Heatmap,
    engagement_metrics: Vec<EngagementMetric>,
    engagement_trends: Vec<EngagementTrend>,
}

pub struct AnalyticsStore {
    client: Arc<ApiClient>,
    state: RwLock<AnalyticsState>,
    loading: LoadingFlag,
}

impl AnalyticsStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(AnalyticsState::default()),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn status_breakdown(&self) -> Option<StatusBreakdown> {
        self.state.read().await.status_breakdown
    }

    pub async fn heatmap(&self) -> Heatmap {
        self.state.read().await.heatmap.clone()
    }

    pub async fn engagement_metrics(&self) -> Vec<EngagementMetric> {
        self.state.read().await.engagement_metrics.clone()
    }

    pub async fn engagement_trends(&self) -> Vec<EngagementTrend> {
        self.state.read().await.engagement_trends.clone()
    }

    pub async fn fetch_status_breakdown(&self, filters: &AnalyticsFilters) -> Result<StatusBreakdown> {
        let _loading = self.loading.begin();
        let breakdown = self
            .client
            .get_with::<Envelope<StatusBreakdown>, _>("/analytics/activities/status", filters)
            .await?
            .into_inner();

        self.state.write().await.status_breakdown = Some(breakdown);
        Ok(breakdown)
    }

    /// Activity counts per day.
    pub async fn fetch_heatmap(&self, filters: &HeatmapFilters) -> Result<Heatmap> {
        let _loading = self.loading.begin();
        let heatmap = self
            .client
            .get_with::<Envelope<Heatmap>, _>("/analytics/activities/heatmap", filters)
            .await?
            .into_inner();

        self.state.write().await.heatmap = heatmap.clone();
        Ok(heatmap)
    }

    /// Loads the engagement report; a report without metrics clears the list.
    pub async fn fetch_engagement_metrics(&self, filters: &AnalyticsFilters) -> Result<EngagementReport> {
        let _loading = self.loading.begin();
        let report = self
            .client
            .get_with::<Data<EngagementReport>, _>("/analytics/engagement", filters)
            .await?
            .into_inner();

        self.state.write().await.engagement_metrics = report.metrics.clone();
        Ok(report)
    }

    pub async fn fetch_engagement_trends(&self, range: &DateRange) -> Result<Vec<EngagementTrend>> {
        let _loading = self.loading.begin();
        let trends = self
            .client
            .get_with::<Envelope<Vec<EngagementTrend>>, _>("/analytics/engagement/trends", range)
            .await?
            .into_inner();

        self.state.write().await.engagement_trends = trends.clone();
        Ok(trends)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, user_with_role};
    use rcap_core::user::Role;
    use rcap_interaction::Method;
    use serde_json::json;

    fn range() -> DateRange {
        DateRange {
            start_date: "2024-01-01".to_string(),
            end_date: "2024-03-31".to_string(),
        }
    }

    #[tokio::test]
    async fn test_status_and_heatmap() {
        let h = Harness::signed_in(user_with_role(1, Role::SuperAdmin)).await;
        h.transport
            .respond(
                Method::Get,
                "/analytics/activities/status",
                200,
                json!({ "data": { "draft": 1, "submitted": 2, "approved": 3, "rejected": 0 } }),
            )
            .respond(
                Method::Get,
                "/analytics/activities/heatmap",
                200,
                json!({ "data": { "2024-03-01": 2, "2024-03-02": 5 } }),
            );
        let store = AnalyticsStore::new(h.client.clone());

        let breakdown = store
            .fetch_status_breakdown(&AnalyticsFilters {
                organisation_id: Some(4),
                ..AnalyticsFilters::default()
            })
            .await
            .unwrap();
        let heatmap = store
            .fetch_heatmap(&HeatmapFilters {
                start_date: "2024-03-01".to_string(),
                end_date: "2024-03-31".to_string(),
                organisation_id: None,
                activity_type: Some("workshop".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(breakdown.total(), 6);
        assert_eq!(heatmap.get("2024-03-02"), Some(&5));
        let sent = &h.transport.requests_to(Method::Get, "/analytics/activities/heatmap")[0];
        assert_eq!(sent.query_value("type"), Some("workshop"));
        assert_eq!(sent.query_value("start_date"), Some("2024-03-01"));
    }

    #[tokio::test]
    async fn test_engagement_metrics_default_to_empty() {
        let h = Harness::signed_in(user_with_role(1, Role::Admin)).await;
        h.transport
            .respond(
                Method::Get,
                "/analytics/engagement",
                200,
                json!({ "data": { "metrics": [{
                    "activity_id": 1, "metric_type": "attendance", "value": 42.0,
                    "recorded_at": "2024-03-01T12:00:00Z"
                }], "summary": { "average": 42.0 } } }),
            )
            .respond(Method::Get, "/analytics/engagement", 200, json!({ "data": {} }));
        let store = AnalyticsStore::new(h.client.clone());

        let report = store
            .fetch_engagement_metrics(&AnalyticsFilters::default())
            .await
            .unwrap();
        assert_eq!(report.metrics.len(), 1);
        assert!(report.extra.contains_key("summary"));

        store
            .fetch_engagement_metrics(&AnalyticsFilters::default())
            .await
            .unwrap();
        assert!(store.engagement_metrics().await.is_empty());
    }

    #[tokio::test]
    async fn test_unwrapped_engagement_report_is_decode_error() {
        let h = Harness::signed_in(user_with_role(1, Role::Admin)).await;
        h.transport.respond(
            Method::Get,
            "/analytics/engagement",
            200,
            json!({ "summary": { "average": 42.0 } }),
        );
        let store = AnalyticsStore::new(h.client.clone());

        let err = store
            .fetch_engagement_metrics(&AnalyticsFilters::default())
            .await
            .unwrap_err();

        assert!(err.is_decode());
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_trends() {
        let h = Harness::signed_in(user_with_role(1, Role::Admin)).await;
        h.transport.respond(
            Method::Get,
            "/analytics/engagement/trends",
            200,
            json!({ "data": [{ "date": "2024-03-01", "average": 3.5, "total": 7.0 }] }),
        );
        let store = AnalyticsStore::new(h.client.clone());

        let trends = store.fetch_engagement_trends(&range()).await.unwrap();

        assert_eq!(trends.len(), 1);
        assert_eq!(store.engagement_trends().await[0].total, 7.0);
    }
}
