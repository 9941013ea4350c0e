use super::ApiClient;
use crate::domain::{
    AlertFilter, AlertQueueItem, QueueFilter, RiskAlert, RiskAlertListResponse,
    RiskAnalysisRequest,
};
use crate::error::ApiError;
use reqwest::Method;

impl ApiClient {
    /// `POST /api/risk/surveillance`
    pub async fn analyze_risk(&self, request: &RiskAnalysisRequest) -> Result<RiskAlert, ApiError> {
        self.send_json(Method::POST, "/api/risk/surveillance", request)
            .await
    }

    /// `GET /api/risk/alerts?severity=<s>&client_id=<id>`
    pub async fn risk_alerts(&self, filter: &AlertFilter) -> Result<RiskAlertListResponse, ApiError> {
        self.get_filtered("/api/risk/alerts", filter).await
    }

    /// `GET /api/alerts/open`, ordered by SLA due date on the server side.
    pub async fn open_alerts(&self, filter: &QueueFilter) -> Result<Vec<AlertQueueItem>, ApiError> {
        self.get_filtered("/api/alerts/open", filter).await
    }
}
