use super::ApiClient;
use crate::domain::{WorkflowRequest, WorkflowResult};
use crate::error::ApiError;
use crate::workflow::Orchestrator;
use reqwest::Method;
use serde_json::Value;

impl ApiClient {
    /// `POST /agents/orchestrate`
    pub async fn orchestrate(&self, request: &WorkflowRequest) -> Result<WorkflowResult, ApiError> {
        self.send_json(Method::POST, "/agents/orchestrate", request)
            .await
    }

    /// `GET /agents/workflow-info`
    pub async fn workflow_info(&self) -> Result<Value, ApiError> {
        self.get_json("/agents/workflow-info").await
    }
}

#[async_trait::async_trait]
impl Orchestrator for ApiClient {
    async fn orchestrate(&self, request: &WorkflowRequest) -> Result<WorkflowResult, ApiError> {
        ApiClient::orchestrate(self, request).await
    }
}
