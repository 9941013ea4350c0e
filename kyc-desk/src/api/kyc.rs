use super::ApiClient;
use crate::domain::{Client, ClientListResponse, KycAnalysisRequest};
use crate::error::ApiError;
use reqwest::Method;

impl ApiClient {
    /// `POST /api/kyc/analyze`
    pub async fn analyze_kyc(&self, request: &KycAnalysisRequest) -> Result<Client, ApiError> {
        self.send_json(Method::POST, "/api/kyc/analyze", request)
            .await
    }

    /// `GET /api/kyc/clients`
    pub async fn clients(&self) -> Result<ClientListResponse, ApiError> {
        self.get_json("/api/kyc/clients").await
    }

    /// `GET /api/kyc/clients/<id>`
    pub async fn client(&self, id: u64) -> Result<Client, ApiError> {
        self.get_json(&format!("/api/kyc/clients/{id}")).await
    }
}
