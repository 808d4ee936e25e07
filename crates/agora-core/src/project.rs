//! # Read Projector
//!
//! Pure shaping of stored entities into what a view renders: truncated
//! titles, net scores, relative times. No I/O, no clocks (callers pass
//! `now`), no caching; projection is recomputed on every read because it
//! is free next to a network round trip, and it never mutates the
//! underlying entity.

use agora_types::{Answer, AnswerId, Question, QuestionId, Timestamp};

/// Title budget for the regular question list.
pub const DEFAULT_TITLE_BUDGET: usize = 90;

/// Title budget for narrow layouts.
pub const NARROW_TITLE_BUDGET: usize = 70;

/// Author labels are clipped hard; wallet addresses would otherwise eat
/// the row.
const AUTHOR_LABEL_BUDGET: usize = 10;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const YEAR: i64 = 365 * DAY;

/// One row of the question list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSummary {
    /// Question id, for navigation.
    pub id: QuestionId,
    /// Title, truncated to the caller's budget.
    pub title: String,
    /// Tags as stored.
    pub tags: Vec<String>,
    /// Number of answers.
    pub answer_count: u32,
    /// Upvotes minus downvotes.
    pub net_score: i64,
    /// Clipped author label.
    pub author: String,
    /// "3 hours ago" style rendering of the ask time.
    pub asked: String,
}

/// A question page: full body plus projected answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDetail {
    /// Question id.
    pub id: QuestionId,
    /// Full title.
    pub title: String,
    /// Full markdown body, untouched.
    pub body: String,
    /// Tags as stored.
    pub tags: Vec<String>,
    /// Upvotes minus downvotes.
    pub net_score: i64,
    /// Full author label.
    pub author: String,
    /// Relative ask time.
    pub asked: String,
    /// Projected answers in stored order.
    pub answers: Vec<AnswerView>,
}

/// One rendered answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView {
    /// Answer id.
    pub id: AnswerId,
    /// Full markdown body, untouched.
    pub body: String,
    /// Upvotes minus downvotes.
    pub net_score: i64,
    /// Full author label.
    pub author: String,
    /// Relative answer time.
    pub answered: String,
}

/// Projects a question into a list row.
#[must_use]
pub fn summarize(question: &Question, now: Timestamp, title_budget: usize) -> QuestionSummary {
    QuestionSummary {
        id: question.id.clone(),
        title: truncate(&question.title, title_budget),
        tags: question.tags.clone(),
        answer_count: question.answer_count,
        net_score: question.net_score(),
        author: truncate(&question.author.label, AUTHOR_LABEL_BUDGET),
        asked: relative_time(now, question.asked_at),
    }
}

/// Projects a question into its detail page shape.
#[must_use]
pub fn detail(question: &Question, now: Timestamp) -> QuestionDetail {
    QuestionDetail {
        id: question.id.clone(),
        title: question.title.clone(),
        body: question.body.clone(),
        tags: question.tags.clone(),
        net_score: question.net_score(),
        author: question.author.label.clone(),
        asked: relative_time(now, question.asked_at),
        answers: question
            .answers
            .iter()
            .map(|a| project_answer(a, now))
            .collect(),
    }
}

fn project_answer(answer: &Answer, now: Timestamp) -> AnswerView {
    AnswerView {
        id: answer.id.clone(),
        body: answer.body.clone(),
        net_score: answer.net_score(),
        author: answer.author.label.clone(),
        answered: relative_time(now, answer.answered_at),
    }
}

/// Net score from raw tallies. Signed; downvote-heavy entities go
/// negative.
#[must_use]
pub fn net_score(up: u64, down: u64) -> i64 {
    let up = i64::try_from(up).unwrap_or(i64::MAX);
    let down = i64::try_from(down).unwrap_or(i64::MAX);
    up.saturating_sub(down)
}

/// Renders how long ago `then` was, seen from `now`.
///
/// Future or equal instants render "just now"; the clock that produced
/// `then` belongs to the backend and may run ahead of the caller's.
#[must_use]
pub fn relative_time(now: Timestamp, then: Timestamp) -> String {
    let elapsed = now.seconds_since(then);
    if elapsed < MINUTE {
        return "just now".to_string();
    }
    if elapsed < HOUR {
        return plural(elapsed / MINUTE, "minute");
    }
    if elapsed < DAY {
        return plural(elapsed / HOUR, "hour");
    }
    if elapsed < YEAR {
        return plural(elapsed / DAY, "day");
    }
    plural(elapsed / YEAR, "year")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Clips `text` to `budget` characters, appending an ellipsis when
/// anything was cut. Counts characters, not bytes; titles are markdown
/// text and may be non-ASCII.
fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(budget).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::{AuthorRef, VoteTally};
    use proptest::prelude::*;

    fn question_asked_at(secs: i64) -> Question {
        Question::new(
            "q1",
            "How do slices work?",
            "The full body.",
            vec!["go".to_string()],
            AuthorRef::new("u1", "Ada"),
            Timestamp::from_secs(secs),
        )
    }

    #[test]
    fn test_summary_keeps_short_titles_whole() {
        let question = question_asked_at(1_000);
        let summary = summarize(&question, Timestamp::from_secs(1_030), DEFAULT_TITLE_BUDGET);

        assert_eq!(summary.title, "How do slices work?");
        assert_eq!(summary.answer_count, 0);
        assert_eq!(summary.net_score, 0);
        assert_eq!(summary.asked, "just now");
    }

    #[test]
    fn test_summary_truncates_long_titles_with_ellipsis() {
        let mut question = question_asked_at(0);
        question.title = "x".repeat(200);
        let summary = summarize(&question, Timestamp::from_secs(0), NARROW_TITLE_BUDGET);

        assert_eq!(summary.title.chars().count(), NARROW_TITLE_BUDGET + 1);
        assert!(summary.title.ends_with('…'));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let clipped = truncate("déjà-vu", 4);
        assert_eq!(clipped, "déjà…");
    }

    #[test]
    fn test_summary_clips_wallet_address_authors() {
        let mut question = question_asked_at(0);
        question.author = AuthorRef::new(
            "0x1234567890abcdef",
            "0x1234567890abcdef1234567890abcdef12345678",
        );
        let summary = summarize(&question, Timestamp::from_secs(0), DEFAULT_TITLE_BUDGET);
        assert_eq!(summary.author, "0x12345678…");
    }

    #[test]
    fn test_net_score_is_signed() {
        assert_eq!(net_score(3, 1), 2);
        assert_eq!(net_score(1, 5), -4);
        assert_eq!(net_score(0, 0), 0);
    }

    #[test]
    fn test_detail_projects_answers_without_mutating() {
        let mut question = question_asked_at(0);
        question.answers.push(Answer::new(
            "a1",
            "q1",
            "With rev().",
            AuthorRef::new("u2", "Grace"),
            Timestamp::from_secs(100),
        ));
        question.answers[0].votes = VoteTally::from_counts(4, 1);
        question.normalize();
        let before = question.clone();

        let page = detail(&question, Timestamp::from_secs(2 * 60 * 60));

        assert_eq!(page.body, "The full body.");
        assert_eq!(page.answers.len(), 1);
        assert_eq!(page.answers[0].net_score, 3);
        assert_eq!(page.answers[0].answered, "1 hour ago");
        assert_eq!(question, before);
    }

    #[test]
    fn test_relative_time_buckets() {
        let t0 = Timestamp::from_secs(0);
        let at = |secs| relative_time(Timestamp::from_secs(secs), t0);

        assert_eq!(at(0), "just now");
        assert_eq!(at(59), "just now");
        assert_eq!(at(60), "1 minute ago");
        assert_eq!(at(45 * 60), "45 minutes ago");
        assert_eq!(at(3 * 60 * 60), "3 hours ago");
        assert_eq!(at(26 * 60 * 60), "1 day ago");
        assert_eq!(at(40 * 24 * 60 * 60), "40 days ago");
        assert_eq!(at(800 * 24 * 60 * 60), "2 years ago");
    }

    #[test]
    fn test_future_timestamps_render_just_now() {
        let now = Timestamp::from_secs(100);
        let future = Timestamp::from_secs(5_000);
        assert_eq!(relative_time(now, future), "just now");
    }

    proptest! {
        #[test]
        fn test_truncation_never_exceeds_budget_plus_ellipsis(
            text in ".{0,200}",
            budget in 0usize..120,
        ) {
            let clipped = truncate(&text, budget);
            prop_assert!(clipped.chars().count() <= budget + 1);
            if text.chars().count() <= budget {
                prop_assert_eq!(clipped, text);
            } else {
                prop_assert!(clipped.ends_with('…'));
            }
        }

        #[test]
        fn test_relative_time_is_total(now in i64::MIN / 4..i64::MAX / 4, then in i64::MIN / 4..i64::MAX / 4) {
            let rendered = relative_time(
                Timestamp::from_secs(now),
                Timestamp::from_secs(then),
            );
            prop_assert!(!rendered.is_empty());
            if now <= then {
                prop_assert_eq!(rendered, "just now");
            }
        }
    }
}
