use super::practice_models::{
    DifficultSentence, NewPracticeSession, PracticeSession, SentenceAttempt, SentenceResult,
    SentenceUpdate, SentenceUpdateOutcome, SessionOrder,
};
use anyhow::Result;
use chrono::{DateTime, Utc};

pub trait PracticeStore: Send + Sync {
    /// Stores a session with its grammar issues and vocabulary entries.
    /// When `speech_id` names a speech of the same user, that speech's
    /// practice counter is incremented in the same transaction; otherwise
    /// the session is stored as free practice.
    fn create_practice_session(
        &self,
        user_id: usize,
        session: &NewPracticeSession,
    ) -> Result<PracticeSession>;

    /// The user's sessions ordered by practice date, optionally truncated.
    fn get_practice_sessions(
        &self,
        user_id: usize,
        order: SessionOrder,
        limit: Option<usize>,
    ) -> Result<Vec<PracticeSession>>;

    /// Sessions of one speech, oldest first.
    fn get_speech_practice_sessions(
        &self,
        user_id: usize,
        speech_id: usize,
    ) -> Result<Vec<PracticeSession>>;

    /// Returns Ok(None) if the session does not exist or belongs to someone else.
    fn get_practice_session(&self, user_id: usize, session_id: usize)
        -> Result<Option<PracticeSession>>;

    /// Deletes the session and returns it. A linked speech counter is
    /// decremented, never below zero.
    fn delete_practice_session(
        &self,
        user_id: usize,
        session_id: usize,
    ) -> Result<Option<PracticeSession>>;

    /// Id of the user's latest session for `speech_id` (or free practice when
    /// `None`) practiced at or after `since`.
    fn find_session_since(
        &self,
        user_id: usize,
        speech_id: Option<usize>,
        since: DateTime<Utc>,
    ) -> Result<Option<usize>>;

    /// Records an attempt on the sentence at `attempt.sentence_index` of the
    /// session: the first attempt creates the result, later ones bump its
    /// counters.
    fn upsert_sentence_result(
        &self,
        session_id: usize,
        attempt: &SentenceAttempt,
        now: DateTime<Utc>,
    ) -> Result<SentenceResult>;

    fn update_sentence_result(
        &self,
        user_id: usize,
        session_id: usize,
        sentence_id: usize,
        update: &SentenceUpdate,
    ) -> Result<SentenceUpdateOutcome>;

    /// Sentences flagged as difficult across all the user's sessions, most
    /// recently practiced first.
    fn get_difficult_sentences(&self, user_id: usize) -> Result<Vec<DifficultSentence>>;
}
