//! The REST variant of [`BoardBackend`].

use super::client::RestClient;
use super::wire::{
    AskQuestionBody, DeleteAnswerBody, LoginBody, PostAnswerBody, SignupBody, UpdateUserBody,
    VoteQuestionBody,
};
use crate::{BackendError, BoardBackend, ProfileStore, Result, StoredProfile};
use agora_types::{
    AnswerId, AuthorRef, NewAnswer, NewQuestion, Question, QuestionId, UserId, UserProfile,
    VoteDirection, VoteTarget,
};
use async_trait::async_trait;

/// Board backend over the Q&A REST service.
///
/// Two service quirks shape this implementation. The service exposes no
/// single-question read, so `fetch_question` pulls the full list and
/// selects. And the per-question answer count is denormalized and
/// client-maintained, so answer writes first read the current count and
/// send the adjusted value along.
pub struct RestBackend {
    client: RestClient,
}

impl RestBackend {
    /// Wraps an existing client.
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Creates a backend for the service at `base_url`.
    pub fn open(base_url: impl Into<String>, profile: ProfileStore) -> Self {
        Self::new(RestClient::new(base_url, profile))
    }

    /// The underlying HTTP client.
    #[must_use]
    pub fn client(&self) -> &RestClient {
        &self.client
    }

    // ==================== Session ====================

    /// Signs in and persists the profile for subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let auth = self
            .client
            .login(&LoginBody {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        let user = UserProfile::from(auth.result);
        self.persist(&auth.token, &user);
        Ok(user)
    }

    /// Creates an account and persists the profile.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<UserProfile> {
        let auth = self
            .client
            .signup(&SignupBody {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        let user = UserProfile::from(auth.result);
        self.persist(&auth.token, &user);
        Ok(user)
    }

    /// Forgets the persisted profile.
    pub fn logout(&self) -> std::io::Result<()> {
        self.client.profile().clear()
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.client.profile().load().map(|p| p.user)
    }

    /// Every account on the service.
    pub async fn users(&self) -> Result<Vec<UserProfile>> {
        let users = self.client.fetch_users().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    /// Updates the signed-in user's editable fields and re-persists the
    /// profile.
    pub async fn update_profile(
        &self,
        name: &str,
        about: Option<String>,
        tags: Vec<String>,
    ) -> Result<UserProfile> {
        let stored = self
            .client
            .profile()
            .load()
            .ok_or_else(|| BackendError::rejected("not signed in"))?;
        let updated = self
            .client
            .update_user(
                stored.user.id.as_str(),
                &UpdateUserBody {
                    name: name.to_string(),
                    about,
                    tags,
                },
            )
            .await?;
        let user = UserProfile::from(updated);
        self.persist(&stored.token, &user);
        Ok(user)
    }

    fn persist(&self, token: &str, user: &UserProfile) {
        let stored = StoredProfile {
            token: token.to_string(),
            user: user.clone(),
        };
        if let Err(e) = self.client.profile().save(&stored) {
            tracing::warn!(error = %e, "Signed in but failed to persist profile");
        }
    }
}

#[async_trait]
impl BoardBackend for RestBackend {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn fetch_all(&self) -> Result<Vec<Question>> {
        let wire = self.client.fetch_questions().await?;
        let mut questions: Vec<Question> = wire.into_iter().map(Question::from).collect();
        // The service returns insertion order; the board wants newest
        // first. Stable, so same-second questions keep their order.
        questions.sort_by(|a, b| b.asked_at.cmp(&a.asked_at));
        Ok(questions)
    }

    async fn fetch_question(&self, id: &QuestionId) -> Result<Question> {
        let questions = self.fetch_all().await?;
        questions
            .into_iter()
            .find(|q| &q.id == id)
            .ok_or_else(|| BackendError::not_found("question", id.as_str()))
    }

    async fn create_question(&self, draft: &NewQuestion, author: &AuthorRef) -> Result<()> {
        draft.validate()?;
        self.client
            .ask_question(&AskQuestionBody {
                question_title: draft.title.clone(),
                question_body: draft.body.clone(),
                question_tags: draft.tags.clone(),
                user_posted: author.label.clone(),
                user_id: author.id.as_str().to_string(),
            })
            .await
    }

    async fn create_answer(
        &self,
        question_id: &QuestionId,
        draft: &NewAnswer,
        author: &AuthorRef,
    ) -> Result<()> {
        draft.validate()?;
        let question = self.fetch_question(question_id).await?;
        self.client
            .post_answer(
                question_id.as_str(),
                &PostAnswerBody {
                    id: question_id.as_str().to_string(),
                    no_of_answers: question.answers.len() as u32 + 1,
                    answer_body: draft.body.clone(),
                    user_answered: author.label.clone(),
                    user_id: author.id.as_str().to_string(),
                },
            )
            .await
    }

    async fn vote_question(
        &self,
        id: &QuestionId,
        direction: VoteDirection,
        voter: &UserId,
    ) -> Result<()> {
        self.client
            .vote_question(id.as_str(), &VoteQuestionBody::new(direction, voter))
            .await
    }

    async fn vote_answer(
        &self,
        _question_id: &QuestionId,
        _answer_id: &AnswerId,
        _direction: VoteDirection,
        _voter: &UserId,
    ) -> Result<()> {
        Err(BackendError::rejected(
            "the REST service has no answer-vote route",
        ))
    }

    async fn has_voted(&self, target: &VoteTarget, voter: &UserId) -> Result<bool> {
        let question = self.fetch_question(target.question_id()).await?;
        match target {
            VoteTarget::Question(_) => Ok(question.votes.contains(voter)),
            // The service does not track votes on answers.
            VoteTarget::Answer { .. } => Ok(false),
        }
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<()> {
        self.client.delete_question(id.as_str()).await
    }

    async fn delete_answer(&self, question_id: &QuestionId, answer_id: &AnswerId) -> Result<()> {
        let question = self.fetch_question(question_id).await?;
        if question.answer(answer_id).is_none() {
            return Err(BackendError::not_found("answer", answer_id.as_str()));
        }
        self.client
            .delete_answer(
                question_id.as_str(),
                &DeleteAnswerBody {
                    answer_id: answer_id.as_str().to_string(),
                    no_of_answers: (question.answers.len() as u32).saturating_sub(1),
                },
            )
            .await
    }
}
