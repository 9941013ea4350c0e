use super::ApiClient;
use crate::domain::{Case, CaseCreate, CaseFilter, CaseUpdate};
use crate::error::ApiError;
use reqwest::Method;

impl ApiClient {
    /// `GET /api/cases?status=<s>&priority=<p>&assigned_to=<a>`
    pub async fn cases(&self, filter: &CaseFilter) -> Result<Vec<Case>, ApiError> {
        self.get_filtered("/api/cases", filter).await
    }

    /// `GET /api/cases/<id>`
    pub async fn case(&self, id: u64) -> Result<Case, ApiError> {
        self.get_json(&format!("/api/cases/{id}")).await
    }

    /// `POST /api/cases`
    pub async fn create_case(&self, case: &CaseCreate) -> Result<Case, ApiError> {
        self.send_json(Method::POST, "/api/cases", case).await
    }

    /// `PUT /api/cases/<id>`
    pub async fn update_case(&self, id: u64, update: &CaseUpdate) -> Result<Case, ApiError> {
        self.send_json(Method::PUT, &format!("/api/cases/{id}"), update)
            .await
    }
}
