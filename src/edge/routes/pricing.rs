//! Pricing Routes
//!
//! Calculator endpoints backing the marketing site's pricing page.
//!
//! - GET /api/pricing/tiers - Published plans
//! - GET /api/pricing/estimate - Monthly cost for a usage profile
//! - GET /api/pricing/roi - Savings against human agents

use axum::{
    extract::{rejection::QueryRejection, Query},
    Json,
};

use crate::edge::dto::{EstimateQuery, EstimateResponse, RoiQuery, RoiResponse, TiersResponse};
use crate::edge::error::EdgeResult;
use crate::pricing::{self, DEFAULT_COST_PER_MINUTE, TIERS};

/// GET /api/pricing/tiers
pub async fn list_tiers() -> Json<TiersResponse> {
    Json(TiersResponse {
        cost_per_minute: DEFAULT_COST_PER_MINUTE,
        tiers: &TIERS,
    })
}

/// GET /api/pricing/estimate
pub async fn estimate(
    query: Result<Query<EstimateQuery>, QueryRejection>,
) -> EdgeResult<Json<EstimateResponse>> {
    let Query(query) = query?;
    let input = query.usage();
    let estimate = pricing::estimate(&input)?;
    Ok(Json(EstimateResponse { input, estimate }))
}

/// GET /api/pricing/roi
pub async fn roi(
    query: Result<Query<RoiQuery>, QueryRejection>,
) -> EdgeResult<Json<RoiResponse>> {
    let Query(query) = query?;
    let input = query.usage();
    let human_hourly_rate = query.hourly_rate();
    let roi = pricing::roi(&input, human_hourly_rate)?;
    Ok(Json(RoiResponse {
        input,
        human_hourly_rate,
        roi,
    }))
}
