//! Data Transfer Objects
//!
//! Query and response types for the edge endpoints.

use serde::{Deserialize, Serialize};

use crate::embed::{EmbedKind, EmbedPosition, EmbedTheme};
use crate::pricing::{
    CostEstimate, PricingTier, RoiEstimate, UsageInput, DEFAULT_COST_PER_MINUTE,
    HUMAN_AGENT_HOURLY_RATE,
};

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "ok", "missing" or "disabled"
    pub static_site: String,
    pub uptime_seconds: u64,
    pub version: String,
}

// ============================================
// PRICING DTOs
// ============================================

/// Published plans
#[derive(Debug, Serialize)]
pub struct TiersResponse {
    pub cost_per_minute: f64,
    pub tiers: &'static [PricingTier],
}

/// `GET /api/pricing/estimate` query
#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    pub calls_per_month: u64,
    pub avg_duration_minutes: f64,
    #[serde(default)]
    pub cost_per_minute: Option<f64>,
}

impl EstimateQuery {
    pub fn usage(&self) -> UsageInput {
        UsageInput {
            calls_per_month: self.calls_per_month,
            avg_duration_minutes: self.avg_duration_minutes,
            cost_per_minute: self.cost_per_minute.unwrap_or(DEFAULT_COST_PER_MINUTE),
        }
    }
}

/// `GET /api/pricing/roi` query
#[derive(Debug, Deserialize)]
pub struct RoiQuery {
    pub calls_per_month: u64,
    pub avg_duration_minutes: f64,
    #[serde(default)]
    pub cost_per_minute: Option<f64>,
    #[serde(default)]
    pub human_hourly_rate: Option<f64>,
}

impl RoiQuery {
    pub fn usage(&self) -> UsageInput {
        UsageInput {
            calls_per_month: self.calls_per_month,
            avg_duration_minutes: self.avg_duration_minutes,
            cost_per_minute: self.cost_per_minute.unwrap_or(DEFAULT_COST_PER_MINUTE),
        }
    }

    pub fn hourly_rate(&self) -> f64 {
        self.human_hourly_rate.unwrap_or(HUMAN_AGENT_HOURLY_RATE)
    }
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub input: UsageInput,
    #[serde(flatten)]
    pub estimate: CostEstimate,
}

#[derive(Debug, Serialize)]
pub struct RoiResponse {
    pub input: UsageInput,
    pub human_hourly_rate: f64,
    #[serde(flatten)]
    pub roi: RoiEstimate,
}

// ============================================
// EMBED DTOs
// ============================================

/// `GET /api/embed/snippet` query
#[derive(Debug, Deserialize)]
pub struct SnippetQuery {
    #[serde(default)]
    pub agent_id: String,
    pub position: Option<String>,
    pub theme: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SnippetResponse {
    pub agent_id: String,
    pub kind: EmbedKind,
    pub position: EmbedPosition,
    pub theme: EmbedTheme,
    pub widget_url: String,
    pub snippet: String,
}
