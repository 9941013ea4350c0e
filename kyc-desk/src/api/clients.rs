use super::ApiClient;
use crate::domain::{Case, ClientInsights, KycRecord, RiskAlert};
use crate::error::ApiError;
use serde_json::Value;

impl ApiClient {
    /// `GET /api/clients/<id>/insights`
    pub async fn client_insights(&self, client_id: u64) -> Result<ClientInsights, ApiError> {
        self.get_json(&format!("/api/clients/{client_id}/insights"))
            .await
    }

    /// `GET /api/clients/<id>/kyc-history`
    pub async fn client_kyc_history(&self, client_id: u64) -> Result<Vec<KycRecord>, ApiError> {
        self.get_json(&format!("/api/clients/{client_id}/kyc-history"))
            .await
    }

    /// `GET /api/clients/<id>/alerts`
    pub async fn client_alerts(&self, client_id: u64) -> Result<Vec<RiskAlert>, ApiError> {
        self.get_json(&format!("/api/clients/{client_id}/alerts"))
            .await
    }

    /// `GET /api/clients/<id>/cases`
    pub async fn client_cases(&self, client_id: u64) -> Result<Vec<Case>, ApiError> {
        self.get_json(&format!("/api/clients/{client_id}/cases"))
            .await
    }

    /// `GET /api/clients/<id>/activity`; the payload shape is not fixed.
    pub async fn client_activity(&self, client_id: u64) -> Result<Value, ApiError> {
        self.get_json(&format!("/api/clients/{client_id}/activity"))
            .await
    }
}
