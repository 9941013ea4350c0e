use super::ApiClient;
use crate::domain::DashboardStats;
use crate::error::ApiError;

impl ApiClient {
    /// `GET /api/dashboard/stats`
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("/api/dashboard/stats").await
    }
}
