//! CLI command implementations.

use agora_backend::{
    BoardBackend, LedgerBackend, MemoryBackend, MemoryLedger, ProfileStore, RestBackend,
};
use agora_core::{detail, summarize, Synchronizer, DEFAULT_TITLE_BUDGET};
use agora_types::{
    AnswerId, AuthorRef, NewAnswer, NewQuestion, QuestionId, Timestamp, VoteDirection, VoteTarget,
};
use anyhow::{bail, Context};
use clap::ValueEnum;
use std::sync::Arc;

pub type Result<T> = anyhow::Result<T>;

/// Vote direction as a CLI argument.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Direction {
    /// Upvote
    Up,
    /// Downvote
    Down,
}

impl From<Direction> for VoteDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
        }
    }
}

/// One CLI invocation's backend, synchronizer, and identity.
pub struct Session {
    sync: Synchronizer,
    rest: Option<Arc<RestBackend>>,
    ledger: Option<Arc<LedgerBackend<MemoryLedger>>>,
    local_user: Option<String>,
}

impl Session {
    /// A session against the REST service, authenticated by the
    /// persisted profile.
    #[must_use]
    pub fn rest(api_url: &str) -> Self {
        Self::rest_with_profile(api_url, ProfileStore::open_default())
    }

    fn rest_with_profile(api_url: &str, profile: ProfileStore) -> Self {
        let rest = Arc::new(RestBackend::open(api_url, profile));
        let backend: Arc<dyn BoardBackend> = rest.clone();
        Self {
            sync: Synchronizer::new(backend),
            rest: Some(rest),
            ledger: None,
            local_user: None,
        }
    }

    /// A session against an in-process board, gone when the command
    /// exits. Useful for trying the tool without a service running.
    #[must_use]
    pub fn memory(user: &str) -> Self {
        Self {
            sync: Synchronizer::new(Arc::new(MemoryBackend::new())),
            rest: None,
            ledger: None,
            local_user: Some(user.to_string()),
        }
    }

    /// A session against the in-process contract stand-in, with `wallet`
    /// as the connected address. Gone when the command exits.
    #[must_use]
    pub fn ledger_sim(wallet: &str) -> Self {
        let ledger = Arc::new(LedgerBackend::new(MemoryLedger::with_caller(wallet)));
        let backend: Arc<dyn BoardBackend> = ledger.clone();
        Self {
            sync: Synchronizer::new(backend),
            rest: None,
            ledger: Some(ledger),
            local_user: Some(wallet.to_string()),
        }
    }

    fn rest_backend(&self) -> Result<&RestBackend> {
        match &self.rest {
            Some(rest) => Ok(rest),
            None => bail!("this command needs the REST backend (--backend rest)"),
        }
    }

    fn ledger_backend(&self) -> Result<&LedgerBackend<MemoryLedger>> {
        match &self.ledger {
            Some(ledger) => Ok(ledger),
            None => bail!("this command needs the ledger backend (--backend ledger-sim)"),
        }
    }

    /// Who writes and votes in this session.
    fn author(&self) -> Result<AuthorRef> {
        if let Some(rest) = &self.rest {
            return match rest.current_user() {
                Some(profile) => Ok(profile.author()),
                None => bail!("not signed in; run `agora login` first"),
            };
        }
        let user = self
            .local_user
            .as_deref()
            .unwrap_or("demo");
        Ok(AuthorRef::new(user, user))
    }
}

/// Fetch and print the question list.
pub async fn list(session: &Session, json: bool) -> Result<()> {
    session
        .sync
        .refresh()
        .await
        .context("fetching the question list")?;

    let questions = session.sync.store().questions();
    if json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }
    if questions.is_empty() {
        println!("No questions yet.");
        return Ok(());
    }
    let now = Timestamp::now();
    for question in &questions {
        let row = summarize(question, now, DEFAULT_TITLE_BUDGET);
        println!(
            "[{:>4}] {}  {} ({} answers) [{}] - {}, {}",
            row.net_score,
            row.id,
            row.title,
            row.answer_count,
            row.tags.join(", "),
            row.author,
            row.asked,
        );
    }
    Ok(())
}

/// Fetch and print one question with its answers.
pub async fn show(session: &Session, id: &str, json: bool) -> Result<()> {
    let question_id = QuestionId::new(id);
    session
        .sync
        .refresh_question(&question_id)
        .await
        .with_context(|| format!("fetching question {id}"))?;

    let question = session
        .sync
        .store()
        .question(&question_id)
        .context("question disappeared between refresh and read")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&question)?);
        return Ok(());
    }

    let page = detail(&question, Timestamp::now());
    println!("# {}", page.title);
    println!(
        "score {} | [{}] | {} asked {}",
        page.net_score,
        page.tags.join(", "),
        page.author,
        page.asked
    );
    println!("\n{}\n", page.body);
    println!("--- {} answer(s) ---", page.answers.len());
    for answer in &page.answers {
        println!(
            "\n({}) score {} | {} answered {}",
            answer.id, answer.net_score, answer.author, answer.answered
        );
        println!("{}", answer.body);
    }
    Ok(())
}

/// Submit a new question and print the refreshed board position.
pub async fn ask(session: &Session, title: String, body: String, tags: Vec<String>) -> Result<()> {
    let author = session.author()?;
    session
        .sync
        .ask_question(&NewQuestion::new(title, body, tags), &author)
        .await?;
    let top = session.sync.store().questions();
    match top.first() {
        Some(question) => println!("Asked question {}", question.id),
        None => println!("Question submitted."),
    }
    Ok(())
}

/// Submit an answer to a question.
pub async fn answer(session: &Session, question: &str, body: String) -> Result<()> {
    let author = session.author()?;
    let question_id = QuestionId::new(question);
    session
        .sync
        .post_answer(&question_id, &NewAnswer::new(body), &author)
        .await?;
    let count = session
        .sync
        .store()
        .question(&question_id)
        .map_or(0, |q| q.answer_count);
    println!("Answered question {question} ({count} answers now)");
    Ok(())
}

/// Cast a vote on a question or one of its answers.
pub async fn vote(
    session: &Session,
    question: &str,
    answer: Option<&str>,
    direction: Direction,
) -> Result<()> {
    let voter = session.author()?.id;
    let target = match answer {
        Some(answer_id) => VoteTarget::Answer {
            question: QuestionId::new(question),
            answer: AnswerId::new(answer_id),
        },
        None => VoteTarget::Question(QuestionId::new(question)),
    };
    session
        .sync
        .vote(&target, VoteDirection::from(direction), &voter)
        .await?;
    let score = session
        .sync
        .store()
        .question(&QuestionId::new(question))
        .map_or(0, |q| q.net_score());
    println!("Voted {} on {target} (question score now {score})", VoteDirection::from(direction));
    Ok(())
}

/// Delete a question or one of its answers.
pub async fn delete(session: &Session, question: &str, answer: Option<&str>) -> Result<()> {
    let question_id = QuestionId::new(question);
    match answer {
        Some(answer_id) => {
            session
                .sync
                .delete_answer(&question_id, &AnswerId::new(answer_id))
                .await?;
            println!("Deleted answer {answer_id} of question {question}");
        }
        None => {
            session.sync.delete_question(&question_id).await?;
            println!("Deleted question {question}");
        }
    }
    Ok(())
}

/// Sign in to the REST service and persist the profile.
pub async fn login(session: &Session, email: &str, password: &str) -> Result<()> {
    let rest = session.rest_backend()?;
    let user = rest.login(email, password).await.context("signing in")?;
    session.sync.switch_identity();
    println!("Signed in as {} ({})", user.name, user.id);
    Ok(())
}

/// Create an account on the REST service and persist the profile.
pub async fn signup(session: &Session, name: &str, email: &str, password: &str) -> Result<()> {
    let rest = session.rest_backend()?;
    let user = rest
        .sign_up(name, email, password)
        .await
        .context("creating the account")?;
    session.sync.switch_identity();
    println!("Welcome, {} ({})", user.name, user.id);
    Ok(())
}

/// Print every account on the REST service.
pub async fn users(session: &Session) -> Result<()> {
    let rest = session.rest_backend()?;
    let users = rest.users().await.context("fetching accounts")?;
    if users.is_empty() {
        println!("No accounts yet.");
        return Ok(());
    }
    for user in users {
        let watched = if user.tags_watched.is_empty() {
            String::new()
        } else {
            format!(" [{}]", user.tags_watched.join(", "))
        };
        println!("{} ({}){}", user.name, user.id, watched);
    }
    Ok(())
}

/// Print the connected wallet's token accounting.
pub async fn stats(session: &Session) -> Result<()> {
    let ledger = session.ledger_backend()?;
    let wallet = session.author()?.id;
    let stats = ledger.user_stats(&wallet).await?;
    println!(
        "{}: earned {} | withdrawn {} | balance {}",
        wallet, stats.total_earned, stats.total_withdrawn, stats.current_balance
    );
    Ok(())
}

/// Withdraw the connected wallet's earned tokens.
pub async fn withdraw(session: &Session) -> Result<()> {
    let ledger = session.ledger_backend()?;
    ledger.withdraw().await?;
    println!("Withdrew earned tokens.");
    Ok(())
}

/// Print the built-in tag catalog, or one entry of it.
pub fn tags(name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        return match agora_types::find_tag(name) {
            Some(tag) => {
                println!("{:<12} {}", tag.name, tag.description);
                Ok(())
            }
            None => bail!("no built-in tag named '{name}'"),
        };
    }
    for tag in agora_types::BUILTIN_TAGS {
        println!("{:<12} {}", tag.name, tag.description);
    }
    Ok(())
}

/// Forget the persisted profile.
pub fn logout(session: &Session) -> Result<()> {
    let rest = session.rest_backend()?;
    rest.logout().context("clearing the stored profile")?;
    session.sync.switch_identity();
    println!("Signed out.");
    Ok(())
}

/// Print the signed-in identity.
pub fn whoami(session: &Session) -> Result<()> {
    if let Some(rest) = &session.rest {
        match rest.current_user() {
            Some(user) => println!("{} ({})", user.name, user.id),
            None => println!("Not signed in."),
        }
        return Ok(());
    }
    let author = session.author()?;
    println!("{} (local backend)", author.label);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_session_runs_a_full_conversation() {
        let session = Session::memory("ada");

        ask(
            &session,
            "How do I test CLIs?".to_string(),
            "Without a server.".to_string(),
            vec!["rust".to_string()],
        )
        .await
        .unwrap();

        let question_id = session.sync.store().questions()[0].id.clone();
        answer(&session, question_id.as_str(), "Use the memory backend.".to_string())
            .await
            .unwrap();

        // The asker cannot be stopped from voting on their own question
        // here; the memory board has no such rule.
        vote(&session, question_id.as_str(), None, Direction::Up)
            .await
            .unwrap();

        let stored = session.sync.store().question(&question_id).unwrap();
        assert_eq!(stored.answer_count, 1);
        assert_eq!(stored.net_score(), 1);

        delete(&session, question_id.as_str(), None).await.unwrap();
        assert!(session.sync.store().is_empty());
    }

    #[tokio::test]
    async fn test_ledger_sim_session_earns_posting_rewards() {
        let wallet = "0x4b20993bc481177ec7e8f571cecae8a9e22c02db";
        let session = Session::ledger_sim(wallet);

        ask(
            &session,
            "Why tokens?".to_string(),
            "Asking earns them.".to_string(),
            vec!["solidity".to_string()],
        )
        .await
        .unwrap();
        stats(&session).await.unwrap();
        withdraw(&session).await.unwrap();

        let after = session
            .ledger_backend()
            .unwrap()
            .user_stats(&session.author().unwrap().id)
            .await
            .unwrap();
        assert_eq!(after.current_balance.to_string(), "0");
        assert_eq!(after.total_withdrawn.to_string(), "10");
    }

    #[tokio::test]
    async fn test_rest_session_requires_sign_in_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let profile = ProfileStore::at_path(dir.path().join("profile.json"));
        let session = Session::rest_with_profile("http://localhost:1", profile);

        let err = session.author().unwrap_err();
        assert!(err.to_string().contains("not signed in"));
    }

    #[test]
    fn test_memory_session_identity_comes_from_the_flag() {
        let session = Session::memory("grace");
        let author = session.author().unwrap();
        assert_eq!(author.label, "grace");
        assert_eq!(author.id.as_str(), "grace");
    }
}
