//! Embed Routes
//!
//! - GET /api/embed/snippet - Copy-paste widget snippet for an agent

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

use crate::edge::dto::{SnippetQuery, SnippetResponse};
use crate::edge::error::EdgeResult;
use crate::edge::state::EdgeState;
use crate::embed::{EmbedKind, EmbedOptions};

/// GET /api/embed/snippet?agent_id=..&position=..&theme=..&kind=script|iframe
pub async fn snippet(
    State(state): State<Arc<EdgeState>>,
    query: Result<Query<SnippetQuery>, QueryRejection>,
) -> EdgeResult<Json<SnippetResponse>> {
    let Query(query) = query?;
    let options = EmbedOptions::parse(
        &query.agent_id,
        query.position.as_deref(),
        query.theme.as_deref(),
    )?;
    let kind = match query.kind.as_deref() {
        Some(k) => k.parse()?,
        None => EmbedKind::default(),
    };

    let base = state.widget_url();
    Ok(Json(SnippetResponse {
        widget_url: options.widget_url(base),
        snippet: options.snippet(kind, base),
        agent_id: options.agent_id,
        kind,
        position: options.position,
        theme: options.theme,
    }))
}
