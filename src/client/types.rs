//! Request and response shapes of the SpaceVoice backend API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::embed::{EmbedPosition, EmbedTheme};

// ============================================
// Auth
// ============================================

/// The signed-in user, as returned by `/auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default)]
    pub onboarding_step: u32,
    #[serde(default)]
    pub is_superuser: bool,
}

impl UserProfile {
    /// Superusers never go through onboarding
    pub fn needs_onboarding(&self) -> bool {
        !self.onboarding_completed && !self.is_superuser
    }
}

/// Bearer token issued by login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Token issued in exchange for a shared access code
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedeemedToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RedeemRequest<'a> {
    pub code: &'a str,
}

// ============================================
// Pagination
// ============================================

/// Paginated list envelope
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// `page` / `page_size` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

// ============================================
// Phone numbers
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub id: i64,
    pub phone_number: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Register an existing number
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPhoneNumber {
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

/// Partial update; absent fields are left untouched server-side
#[derive(Debug, Clone, Default, Serialize)]
pub struct PhoneNumberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

/// Search criteria for purchasable numbers
#[derive(Debug, Clone, Serialize)]
pub struct NumberSearch {
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for NumberSearch {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            area_code: None,
            contains: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableNumber {
    pub phone_number: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub monthly_cost: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PurchaseRequest {
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

// ============================================
// Telephony
// ============================================

/// Place an outbound call from one of the account's numbers
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    pub phone_number_id: i64,
    pub to_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_id: String,
    pub status: String,
    #[serde(default)]
    pub from_number: Option<String>,
    #[serde(default)]
    pub to_number: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

// ============================================
// Revenue & internal income analytics
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub monthly_recurring_revenue: f64,
    pub active_subscriptions: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub total_income: f64,
    pub this_month: f64,
    pub last_month: f64,
    #[serde(default)]
    pub growth_percent: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomePoint {
    pub date: NaiveDate,
    pub amount: f64,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Result of a demo-data seed call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedResult {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DaysQuery {
    pub days: u32,
}

// ============================================
// Agent embed settings
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedSettings {
    /// Public identifier referenced by embed snippets
    pub agent_id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub position: EmbedPosition,
    #[serde(default)]
    pub theme: EmbedTheme,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default)]
    pub greeting: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EmbedSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<EmbedPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<EmbedTheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}
