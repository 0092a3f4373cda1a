//! Reqwest-backed implementation of [`QuizApi`].

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::models::{Flags, Question, Selection, UserData};
use crate::protocol::{
    Ack, AnswerRequest, AnswerVerdict, ClearUnitRequest, ErrorBody, FlagsUpdate, ProgressSave,
    StarAction, StarRequest, StarResponse, StartRequest, StartResponse,
};

use super::{ApiError, QuizApi};

const USER_DATA: &str = "/api/user/data";
const FLAGS: &str = "/api/flags";
const QUESTION: &str = "/api/question";
const ANSWER: &str = "/api/answer";
const STAR: &str = "/api/star";
const PROGRESS_SAVE: &str = "/api/progress/save";
const START: &str = "/api/start";
const CLEAR_UNIT: &str = "/api/clear_unit";

/// HTTP client for the quiz backend.
#[derive(Debug, Clone)]
pub struct HttpQuizApi {
    client: Client,
    base_url: String,
}

impl HttpQuizApi {
    /// Build a client from configuration (timeout and optional session cookie).
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|_| ApiError::Config("session cookie is not a valid header value".into()))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Plain client against `base_url`, mostly for tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(endpoint, "GET");
        Self::decode(endpoint, builder.send().await?).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(endpoint, "POST");
        let response = self.client.post(self.url(endpoint)).json(body).send().await?;
        Self::decode(endpoint, response).await
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn user_data(&self) -> Result<UserData, ApiError> {
        self.get_json(USER_DATA, self.client.get(self.url(USER_DATA)))
            .await
    }

    async fn flags(&self) -> Result<Flags, ApiError> {
        self.get_json(FLAGS, self.client.get(self.url(FLAGS))).await
    }

    async fn update_flags(&self, update: FlagsUpdate) -> Result<Flags, ApiError> {
        self.post_json(FLAGS, &update).await
    }

    async fn question(&self, uid: &str, reveal: bool) -> Result<Question, ApiError> {
        let mut builder = self.client.get(self.url(QUESTION)).query(&[("uid", uid)]);
        if reveal {
            builder = builder.query(&[("reveal", "1")]);
        }
        self.get_json(QUESTION, builder).await
    }

    async fn answer(&self, uid: &str, selected: &Selection) -> Result<AnswerVerdict, ApiError> {
        self.post_json(ANSWER, &AnswerRequest { uid, selected }).await
    }

    async fn toggle_star(&self, uid: &str) -> Result<bool, ApiError> {
        let response: StarResponse = self
            .post_json(
                STAR,
                &StarRequest {
                    uid,
                    action: StarAction::Toggle,
                },
            )
            .await?;
        Ok(response.starred)
    }

    async fn save_progress(&self, key: &str, pos: usize) -> Result<(), ApiError> {
        let _: Ack = self.post_json(PROGRESS_SAVE, &ProgressSave { key, pos }).await?;
        Ok(())
    }

    async fn start(&self, request: &StartRequest) -> Result<StartResponse, ApiError> {
        self.post_json(START, request).await
    }

    async fn clear_unit(&self, unit: &str) -> Result<(), ApiError> {
        let _: Ack = self.post_json(CLEAR_UNIT, &ClearUnitRequest { unit }).await?;
        Ok(())
    }
}
