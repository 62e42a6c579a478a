//! SpaceVoice Backend Client
//!
//! Typed wrappers around the backend REST API. Every call reads the bearer
//! token from the injected [`TokenStore`](crate::session::TokenStore), issues
//! exactly one request, and normalizes failures into [`ClientError`].
//!
//! ## Endpoint groups
//!
//! - **auth**: login, register, me, access-code redemption
//! - **phone numbers**: CRUD, search, purchase, release
//! - **telephony**: initiate and hang up calls (shorter timeout)
//! - **analytics**: revenue and internal income summaries, history, seeding
//! - **agents**: embed settings
//!
//! Nothing is retried or cached here.

mod agents;
mod analytics;
mod api;
mod auth;
mod error;
mod phone_numbers;
mod telephony;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ClientConfig, API_PREFIX};
pub use error::{ClientError, ClientResult};
pub use types::{
    AvailableNumber, CallRecord, CallRequest, EmbedSettings, EmbedSettingsUpdate, IncomePoint,
    IncomeSummary, NewPhoneNumber, NumberSearch, Page, PageQuery, PhoneNumber, PhoneNumberUpdate,
    PurchaseRequest, RedeemedToken, RegisterRequest, RevenuePoint, RevenueSummary, SeedResult,
    TokenResponse, UserProfile,
};
