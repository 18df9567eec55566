use super::speech_models::{NewSpeech, Speech, SpeechUpdate};
use anyhow::Result;

/// Saved speech drafts. Every user-facing operation is scoped to the owner:
/// a speech of another user behaves as if it did not exist.
pub trait SpeechStore: Send + Sync {
    /// Creates a speech and returns its id.
    fn create_speech(&self, user_id: usize, speech: &NewSpeech) -> Result<usize>;

    /// Returns Ok(None) if the speech does not exist or belongs to someone else.
    fn get_speech(&self, user_id: usize, speech_id: usize) -> Result<Option<Speech>>;

    /// The user's speeches, most recently updated first.
    fn get_user_speeches(&self, user_id: usize) -> Result<Vec<Speech>>;

    /// Applies the non-empty fields of the update and bumps `updated_at`.
    /// Returns the updated speech, or Ok(None) if not found.
    fn update_speech(
        &self,
        user_id: usize,
        speech_id: usize,
        update: &SpeechUpdate,
    ) -> Result<Option<Speech>>;

    /// Returns false if the speech was not found.
    fn delete_speech(&self, user_id: usize, speech_id: usize) -> Result<bool>;

    /// Increments the practice counter and stamps `last_practiced_at`.
    /// Returns the new counter value, or Ok(None) if not found.
    fn record_speech_practice(&self, user_id: usize, speech_id: usize) -> Result<Option<usize>>;

    /// Every speech of every user, newest first.
    fn get_all_speeches(&self) -> Result<Vec<Speech>>;

    /// Deletes a speech regardless of its owner.
    fn delete_any_speech(&self, speech_id: usize) -> Result<bool>;
}
