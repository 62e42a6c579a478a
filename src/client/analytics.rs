//! Revenue and internal income analytics
//!
//! - `GET /revenue/summary`, `GET /revenue/history?days=`, `POST /revenue/seed`
//! - `GET /internal/income/summary`, `GET /internal/income/history?days=`,
//!   `POST /internal/income/seed` (superusers only)

use reqwest::Method;

use super::api::ApiClient;
use super::error::ClientResult;
use super::types::{DaysQuery, IncomePoint, IncomeSummary, RevenuePoint, RevenueSummary, SeedResult};

impl ApiClient {
    pub async fn revenue_summary(&self) -> ClientResult<RevenueSummary> {
        self.send_json(self.request(Method::GET, "/revenue/summary"))
            .await
    }

    pub async fn revenue_history(&self, days: u32) -> ClientResult<Vec<RevenuePoint>> {
        let builder = self
            .request(Method::GET, "/revenue/history")
            .query(&DaysQuery { days });
        self.send_json(builder).await
    }

    /// Populate demo revenue data for the account
    pub async fn seed_revenue(&self) -> ClientResult<SeedResult> {
        self.send_json(self.request(Method::POST, "/revenue/seed"))
            .await
    }

    pub async fn income_summary(&self) -> ClientResult<IncomeSummary> {
        self.send_json(self.request(Method::GET, "/internal/income/summary"))
            .await
    }

    pub async fn income_history(&self, days: u32) -> ClientResult<Vec<IncomePoint>> {
        let builder = self
            .request(Method::GET, "/internal/income/history")
            .query(&DaysQuery { days });
        self.send_json(builder).await
    }

    pub async fn seed_income(&self) -> ClientResult<SeedResult> {
        self.send_json(self.request(Method::POST, "/internal/income/seed"))
            .await
    }
}
