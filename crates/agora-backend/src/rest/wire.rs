//! Wire types for the REST service.
//!
//! The service speaks in its MongoDB document shapes: `_id` keys,
//! camelCase field names, voter-id arrays on each question, ISO-8601
//! creation times, and a denormalized `noOfAnswers` that clients keep in
//! step. These types mirror that surface exactly; conversion into the
//! normalized model happens here and nowhere else.

use agora_types::{
    Answer, AuthorRef, Question, QuestionId, Timestamp, UserId, UserProfile,
    VoteDirection, VoteTally,
};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// A question document as the service returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireQuestion {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    pub question_title: String,
    #[serde(default)]
    pub question_body: String,
    #[serde(default)]
    pub question_tags: Vec<String>,
    #[serde(default)]
    pub no_of_answers: u32,
    /// Ids of users who upvoted.
    #[serde(default)]
    pub up_vote: Vec<String>,
    /// Ids of users who downvoted.
    #[serde(default)]
    pub down_vote: Vec<String>,
    /// Display name of the asker.
    #[serde(default)]
    pub user_posted: String,
    /// Account id of the asker.
    #[serde(default)]
    pub user_id: String,
    /// ISO-8601 creation time.
    #[serde(default)]
    pub asked_on: String,
    #[serde(default, rename = "answer")]
    pub answers: Vec<WireAnswer>,
}

/// An answer subdocument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAnswer {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub answer_body: String,
    /// Display name of the answerer.
    #[serde(default)]
    pub user_answered: String,
    /// Account id of the answerer.
    #[serde(default)]
    pub user_id: String,
    /// ISO-8601 creation time.
    #[serde(default)]
    pub answered_on: String,
}

/// A user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    /// Tags the user follows.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub joined_on: Option<String>,
}

/// Response to login and signup.
#[derive(Debug, Clone, Deserialize)]
pub struct WireAuthResponse {
    /// The account that signed in.
    pub result: WireUser,
    /// Bearer token for subsequent requests.
    pub token: String,
}

// ==================== Request bodies ====================

/// Body of `POST /questions/Ask`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskQuestionBody {
    pub question_title: String,
    pub question_body: String,
    pub question_tags: Vec<String>,
    pub user_posted: String,
    pub user_id: String,
}

/// Body of `PATCH /questions/vote/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteQuestionBody {
    /// `"upVote"` or `"downVote"`.
    pub value: &'static str,
    pub user_id: String,
}

impl VoteQuestionBody {
    /// Builds the body from a direction and voter.
    #[must_use]
    pub fn new(direction: VoteDirection, voter: &UserId) -> Self {
        Self {
            value: match direction {
                VoteDirection::Up => "upVote",
                VoteDirection::Down => "downVote",
            },
            user_id: voter.as_str().to_string(),
        }
    }
}

/// Body of `PATCH /answer/post/{id}`.
///
/// `no_of_answers` is the count *after* this answer is added; the service
/// stores whatever the client sends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAnswerBody {
    pub id: String,
    pub no_of_answers: u32,
    pub answer_body: String,
    pub user_answered: String,
    pub user_id: String,
}

/// Body of `PATCH /answer/delete/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAnswerBody {
    pub answer_id: String,
    /// The count after removal.
    pub no_of_answers: u32,
}

/// Body of `POST /user/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Body of `POST /user/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignupBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `PATCH /user/update/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserBody {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

// ==================== Conversions ====================

/// Parses an ISO-8601 instant, falling back to the epoch.
fn parse_instant(raw: &str, context: &str) -> Timestamp {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Timestamp::from_secs(dt.timestamp()),
        Err(e) => {
            tracing::warn!(raw, context, error = %e, "Unparseable timestamp from REST service");
            Timestamp::epoch()
        }
    }
}

impl WireAnswer {
    /// Converts into the normalized model under its owning question.
    #[must_use]
    pub fn into_answer(self, question_id: &QuestionId) -> Answer {
        let answered_at = parse_instant(&self.answered_on, "answeredOn");
        Answer::new(
            self.id,
            question_id.clone(),
            self.answer_body,
            AuthorRef::new(self.user_id, self.user_answered),
            answered_at,
        )
    }
}

impl From<WireQuestion> for Question {
    fn from(wire: WireQuestion) -> Self {
        let id = QuestionId::new(wire.id);
        let asked_at = parse_instant(&wire.asked_on, "askedOn");
        let answers = wire
            .answers
            .into_iter()
            .map(|a| a.into_answer(&id))
            .collect();
        let votes = VoteTally::from_voters(
            wire.up_vote.into_iter().map(UserId::new).collect(),
            wire.down_vote.into_iter().map(UserId::new).collect(),
        );
        Self {
            id,
            title: wire.question_title,
            body: wire.question_body,
            tags: wire.question_tags,
            author: AuthorRef::new(wire.user_id, wire.user_posted),
            asked_at,
            answer_count: wire.no_of_answers,
            answers,
            votes,
        }
    }
}

impl From<WireUser> for UserProfile {
    fn from(wire: WireUser) -> Self {
        let joined_at = wire
            .joined_on
            .as_deref()
            .map(|raw| parse_instant(raw, "joinedOn"));
        Self {
            id: UserId::new(wire.id),
            name: wire.name,
            email: wire.email,
            about: wire.about,
            tags_watched: wire.tags,
            joined_at,
        }
    }
}
