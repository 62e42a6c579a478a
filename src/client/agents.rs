//! Agent embed settings
//!
//! - `GET /agents/:agent_id/embed-settings`
//! - `PATCH /agents/:agent_id/embed-settings`

use reqwest::Method;

use super::api::ApiClient;
use super::error::ClientResult;
use super::types::{EmbedSettings, EmbedSettingsUpdate};

impl ApiClient {
    pub async fn embed_settings(&self, agent_id: &str) -> ClientResult<EmbedSettings> {
        self.send_json(self.request(Method::GET, &embed_path(agent_id)))
            .await
    }

    pub async fn update_embed_settings(
        &self,
        agent_id: &str,
        update: &EmbedSettingsUpdate,
    ) -> ClientResult<EmbedSettings> {
        let builder = self
            .request(Method::PATCH, &embed_path(agent_id))
            .json(update);
        self.send_json(builder).await
    }
}

fn embed_path(agent_id: &str) -> String {
    format!("/agents/{}/embed-settings", urlencoding::encode(agent_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::spawn_backend;
    use crate::client::{ApiClient, ClientConfig};
    use crate::embed::{EmbedPosition, EmbedTheme};
    use crate::session::MemoryTokenStore;
    use axum::{extract::Path, routing::get, Json, Router};
    use std::sync::Arc;

    #[test]
    fn test_embed_path_encodes_id() {
        assert_eq!(embed_path("agt 1"), "/agents/agt%201/embed-settings");
    }

    #[tokio::test]
    async fn test_get_and_update() {
        let router = Router::new().route(
            "/api/v1/agents/:agent_id/embed-settings",
            get(|Path(agent_id): Path<String>| async move {
                Json(serde_json::json!({ "agent_id": agent_id, "enabled": true }))
            })
            .patch(
                |Path(agent_id): Path<String>, Json(body): Json<serde_json::Value>| async move {
                    Json(serde_json::json!({
                        "agent_id": agent_id,
                        "enabled": true,
                        "position": body.get("position").cloned().unwrap_or("bottom-right".into()),
                        "theme": body.get("theme").cloned().unwrap_or("light".into())
                    }))
                },
            ),
        );
        let base = spawn_backend(router).await;
        let client =
            ApiClient::new(ClientConfig::new(base), Arc::new(MemoryTokenStore::with_token("tok")))
                .unwrap();

        let settings = client.embed_settings("agt_1").await.unwrap();
        assert_eq!(settings.agent_id, "agt_1");
        assert_eq!(settings.position, EmbedPosition::BottomRight);
        assert_eq!(settings.theme, EmbedTheme::Light);
        assert!(settings.allowed_domains.is_empty());

        let updated = client
            .update_embed_settings(
                "agt_1",
                &EmbedSettingsUpdate {
                    position: Some(EmbedPosition::TopLeft),
                    theme: Some(EmbedTheme::Dark),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.position, EmbedPosition::TopLeft);
        assert_eq!(updated.theme, EmbedTheme::Dark);
    }
}
