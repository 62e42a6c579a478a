//! Phone number endpoints
//!
//! - `GET /phone-numbers` - Paged list of the account's numbers
//! - `GET /phone-numbers/:id` - One number
//! - `POST /phone-numbers` - Register an existing number
//! - `PATCH /phone-numbers/:id` - Rename or reassign
//! - `DELETE /phone-numbers/:id` - Remove
//! - `GET /phone-numbers/search` - Numbers available for purchase
//! - `POST /phone-numbers/purchase` - Buy a number
//! - `POST /phone-numbers/:id/release` - Give a purchased number back

use reqwest::Method;

use super::api::ApiClient;
use super::error::ClientResult;
use super::types::{
    AvailableNumber, NewPhoneNumber, NumberSearch, Page, PageQuery, PhoneNumber,
    PhoneNumberUpdate, PurchaseRequest,
};

impl ApiClient {
    pub async fn list_phone_numbers(&self, page: PageQuery) -> ClientResult<Page<PhoneNumber>> {
        let builder = self.request(Method::GET, "/phone-numbers").query(&page);
        self.send_json(builder).await
    }

    pub async fn get_phone_number(&self, id: i64) -> ClientResult<PhoneNumber> {
        self.send_json(self.request(Method::GET, &format!("/phone-numbers/{}", id)))
            .await
    }

    pub async fn create_phone_number(&self, number: &NewPhoneNumber) -> ClientResult<PhoneNumber> {
        let builder = self.request(Method::POST, "/phone-numbers").json(number);
        self.send_json(builder).await
    }

    pub async fn update_phone_number(
        &self,
        id: i64,
        update: &PhoneNumberUpdate,
    ) -> ClientResult<PhoneNumber> {
        let builder = self
            .request(Method::PATCH, &format!("/phone-numbers/{}", id))
            .json(update);
        self.send_json(builder).await
    }

    pub async fn delete_phone_number(&self, id: i64) -> ClientResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/phone-numbers/{}", id)))
            .await
    }

    pub async fn search_available_numbers(
        &self,
        search: &NumberSearch,
    ) -> ClientResult<Vec<AvailableNumber>> {
        let builder = self
            .request(Method::GET, "/phone-numbers/search")
            .query(search);
        self.send_json(builder).await
    }

    pub async fn purchase_phone_number(
        &self,
        purchase: &PurchaseRequest,
    ) -> ClientResult<PhoneNumber> {
        let builder = self
            .request(Method::POST, "/phone-numbers/purchase")
            .json(purchase);
        self.send_json(builder).await
    }

    pub async fn release_phone_number(&self, id: i64) -> ClientResult<PhoneNumber> {
        self.send_json(self.request(Method::POST, &format!("/phone-numbers/{}/release", id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::spawn_backend;
    use crate::client::{
        ApiClient, ClientConfig, NumberSearch, PageQuery, PhoneNumberUpdate, PurchaseRequest,
    };
    use crate::session::MemoryTokenStore;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use std::collections::HashMap;
    use std::sync::Arc;

    fn number(id: i64, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "phone_number": format!("+1555010{}", id),
            "friendly_name": "Front desk",
            "status": status,
            "created_at": "2026-09-01T12:00:00Z"
        })
    }

    async fn client() -> ApiClient {
        let router = Router::new()
            .route(
                "/api/v1/phone-numbers",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let page: u32 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
                    let page_size: u32 =
                        q.get("page_size").and_then(|p| p.parse().ok()).unwrap_or(0);
                    Json(serde_json::json!({
                        "items": [number(1, "active"), number(2, "active")],
                        "total": 2,
                        "page": page,
                        "page_size": page_size,
                        "total_pages": 1
                    }))
                }),
            )
            .route(
                "/api/v1/phone-numbers/:id",
                get(|Path(id): Path<i64>| async move {
                    if id == 1 {
                        Ok(Json(number(1, "active")))
                    } else {
                        Err((
                            StatusCode::NOT_FOUND,
                            Json(serde_json::json!({ "detail": "Not found" })),
                        ))
                    }
                })
                .patch(|Path(id): Path<i64>, Json(body): Json<serde_json::Value>| async move {
                    let mut n = number(id, "active");
                    n["friendly_name"] = body["friendly_name"].clone();
                    Json(n)
                })
                .delete(|| async { StatusCode::NO_CONTENT }),
            )
            .route(
                "/api/v1/phone-numbers/search",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let area = q.get("area_code").cloned().unwrap_or_default();
                    Json(serde_json::json!([{
                        "phone_number": format!("+1{}5550123", area),
                        "locality": "Springfield",
                        "country": q.get("country").cloned(),
                        "monthly_cost": 1.15
                    }]))
                }),
            )
            .route(
                "/api/v1/phone-numbers/purchase",
                post(|Json(body): Json<serde_json::Value>| async move {
                    let mut n = number(9, "active");
                    n["phone_number"] = body["phone_number"].clone();
                    (StatusCode::CREATED, Json(n))
                }),
            )
            .route(
                "/api/v1/phone-numbers/:id/release",
                post(|Path(id): Path<i64>| async move { Json(number(id, "released")) }),
            );

        let base = spawn_backend(router).await;
        ApiClient::new(
            ClientConfig::new(base),
            Arc::new(MemoryTokenStore::with_token("tok")),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_sends_pagination() {
        let client = client().await;
        let page = client
            .list_phone_numbers(PageQuery { page: 3, page_size: 50 })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 50);
        assert!(!page.has_next());
        assert!(page.items[0].created_at.is_some());
    }

    #[tokio::test]
    async fn test_get_and_missing() {
        let client = client().await;
        assert_eq!(client.get_phone_number(1).await.unwrap().id, 1);

        let err = client.get_phone_number(404).await.unwrap_err();
        assert_eq!(err.to_string(), "Not found");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let client = client().await;
        let updated = client
            .update_phone_number(
                1,
                &PhoneNumberUpdate {
                    friendly_name: Some("Support line".to_string()),
                    agent_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.friendly_name.as_deref(), Some("Support line"));

        client.delete_phone_number(1).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_purchase_release() {
        let client = client().await;
        let found = client
            .search_available_numbers(&NumberSearch {
                area_code: Some("415".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found[0].phone_number, "+14155550123");
        assert_eq!(found[0].country.as_deref(), Some("US"));

        let bought = client
            .purchase_phone_number(&PurchaseRequest {
                phone_number: found[0].phone_number.clone(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(bought.phone_number, "+14155550123");

        let released = client.release_phone_number(bought.id).await.unwrap();
        assert_eq!(released.status.as_deref(), Some("released"));
    }
}
