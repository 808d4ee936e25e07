//! # REST Client
//!
//! HTTP client for the Q&A REST service.
//!
//! | Method & path | Used for |
//! |---------------|----------|
//! | `GET /questions/All` | the complete question list (the only question read) |
//! | `POST /questions/Ask` | submitting a question |
//! | `DELETE /questions/delete/{id}` | removing a question |
//! | `PATCH /questions/vote/{id}` | voting on a question |
//! | `PATCH /answer/post/{id}` | submitting an answer |
//! | `PATCH /answer/delete/{id}` | removing an answer |
//! | `POST /user/login`, `POST /user/signup` | obtaining a bearer token |
//! | `GET /user/getAllUsers` | the community page |
//! | `PATCH /user/update/{id}` | profile edits |
//!
//! The persisted profile is consulted before every request; when a token
//! is present it rides along as an `Authorization: Bearer` header.

use reqwest::{Client, Method, RequestBuilder, Response};

use super::wire::{
    AskQuestionBody, DeleteAnswerBody, LoginBody, PostAnswerBody, SignupBody, UpdateUserBody,
    VoteQuestionBody, WireAuthResponse, WireQuestion, WireUser,
};
use crate::{BackendError, ProfileStore, Result};

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Unavailable(e.to_string())
    }
}

/// HTTP client for the REST service.
///
/// The client is cheaply cloneable and can be shared across components.
///
/// # Examples
///
/// ```rust,ignore
/// use agora_backend::rest::RestClient;
/// use agora_backend::ProfileStore;
///
/// let client = RestClient::new("http://localhost:5000", ProfileStore::open_default());
/// let questions = client.fetch_questions().await?;
/// ```
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    http: Client,
    profile: ProfileStore,
}

impl RestClient {
    /// Creates a new client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, profile: ProfileStore) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to create HTTP client"),
            profile,
        }
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The profile store this client reads tokens from.
    #[must_use]
    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    /// Builds a request with the bearer token attached when signed in.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = self.profile.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    // ==================== Questions ====================

    /// Retrieves every question on the board.
    ///
    /// # Errors
    ///
    /// * [`BackendError::Unavailable`] - the service was unreachable or
    ///   answered with a server error / unparseable body
    /// * [`BackendError::Rejected`] - the service refused the request
    pub async fn fetch_questions(&self) -> Result<Vec<WireQuestion>> {
        let res = self.request(Method::GET, "/questions/All").send().await?;
        let res = check(res, "question", "").await?;
        res.json()
            .await
            .map_err(|e| BackendError::unavailable(format!("invalid response: {e}")))
    }

    /// Submits a new question.
    pub async fn ask_question(&self, body: &AskQuestionBody) -> Result<()> {
        let res = self
            .request(Method::POST, "/questions/Ask")
            .json(body)
            .send()
            .await?;
        check(res, "question", "").await?;
        Ok(())
    }

    /// Removes a question.
    pub async fn delete_question(&self, id: &str) -> Result<()> {
        let res = self
            .request(Method::DELETE, &format!("/questions/delete/{id}"))
            .send()
            .await?;
        check(res, "question", id).await?;
        Ok(())
    }

    /// Votes on a question.
    pub async fn vote_question(&self, id: &str, body: &VoteQuestionBody) -> Result<()> {
        let res = self
            .request(Method::PATCH, &format!("/questions/vote/{id}"))
            .json(body)
            .send()
            .await?;
        check(res, "question", id).await?;
        Ok(())
    }

    // ==================== Answers ====================

    /// Submits an answer to the question named in the path and body.
    pub async fn post_answer(&self, question_id: &str, body: &PostAnswerBody) -> Result<()> {
        let res = self
            .request(Method::PATCH, &format!("/answer/post/{question_id}"))
            .json(body)
            .send()
            .await?;
        check(res, "question", question_id).await?;
        Ok(())
    }

    /// Removes an answer from a question.
    pub async fn delete_answer(&self, question_id: &str, body: &DeleteAnswerBody) -> Result<()> {
        let res = self
            .request(Method::PATCH, &format!("/answer/delete/{question_id}"))
            .json(body)
            .send()
            .await?;
        check(res, "question", question_id).await?;
        Ok(())
    }

    // ==================== Users ====================

    /// Signs in and returns the account plus its bearer token.
    pub async fn login(&self, body: &LoginBody) -> Result<WireAuthResponse> {
        let res = self
            .request(Method::POST, "/user/login")
            .json(body)
            .send()
            .await?;
        let res = check(res, "user", &body.email).await?;
        res.json()
            .await
            .map_err(|e| BackendError::unavailable(format!("invalid response: {e}")))
    }

    /// Creates an account and returns it plus its bearer token.
    pub async fn signup(&self, body: &SignupBody) -> Result<WireAuthResponse> {
        let res = self
            .request(Method::POST, "/user/signup")
            .json(body)
            .send()
            .await?;
        let res = check(res, "user", &body.email).await?;
        res.json()
            .await
            .map_err(|e| BackendError::unavailable(format!("invalid response: {e}")))
    }

    /// Retrieves every account on the service.
    pub async fn fetch_users(&self) -> Result<Vec<WireUser>> {
        let res = self.request(Method::GET, "/user/getAllUsers").send().await?;
        let res = check(res, "user", "").await?;
        res.json()
            .await
            .map_err(|e| BackendError::unavailable(format!("invalid response: {e}")))
    }

    /// Updates an account's editable fields.
    pub async fn update_user(&self, id: &str, body: &UpdateUserBody) -> Result<WireUser> {
        let res = self
            .request(Method::PATCH, &format!("/user/update/{id}"))
            .json(body)
            .send()
            .await?;
        let res = check(res, "user", id).await?;
        res.json()
            .await
            .map_err(|e| BackendError::unavailable(format!("invalid response: {e}")))
    }
}

/// Folds a non-success status into the error taxonomy.
///
/// Server errors are `Unavailable`, a 404 is `NotFound` for the subject
/// entity, a refusal whose body mentions an existing vote is
/// `AlreadyVoted`, and everything else is `Rejected` with the service's
/// own message.
async fn check(res: Response, kind: &'static str, id: &str) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let code = status.as_u16();
    let message = res.text().await.unwrap_or_default();
    if code >= 500 {
        return Err(BackendError::unavailable(format!("HTTP {code}: {message}")));
    }
    if code == 404 {
        return Err(BackendError::not_found(kind, id));
    }
    if message.to_ascii_lowercase().contains("already voted") {
        return Err(BackendError::AlreadyVoted {
            target: format!("{kind} {id}"),
        });
    }
    if message.is_empty() {
        return Err(BackendError::rejected(format!("HTTP {code}")));
    }
    Err(BackendError::rejected(message))
}
