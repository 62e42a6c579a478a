//! Telephony endpoints
//!
//! - `POST /telephony/calls` - Place an outbound call
//! - `POST /telephony/calls/:call_id/hangup` - End a call
//!
//! Both use the shorter telephony timeout; when it fires the request is
//! aborted locally and surfaces as [`ClientError::Timeout`]. Nothing is
//! sent to the server to cancel the call.
//!
//! [`ClientError::Timeout`]: super::ClientError::Timeout

use reqwest::Method;
use std::time::Duration;

use super::api::ApiClient;
use super::error::ClientResult;
use super::types::{CallRecord, CallRequest};

impl ApiClient {
    fn telephony_timeout(&self) -> Duration {
        Duration::from_millis(self.config().telephony_timeout_ms)
    }

    pub async fn initiate_call(&self, call: &CallRequest) -> ClientResult<CallRecord> {
        tracing::info!(phone_number_id = call.phone_number_id, "Initiating outbound call");
        let builder = self
            .request(Method::POST, "/telephony/calls")
            .timeout(self.telephony_timeout())
            .json(call);
        self.send_json(builder).await
    }

    pub async fn hangup_call(&self, call_id: &str) -> ClientResult<CallRecord> {
        let path = format!("/telephony/calls/{}/hangup", urlencoding::encode(call_id));
        let builder = self
            .request(Method::POST, &path)
            .timeout(self.telephony_timeout());
        self.send_json(builder).await
    }
}
