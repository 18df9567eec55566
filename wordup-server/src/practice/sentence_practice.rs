use super::{NewPracticeSession, SentenceAttempt, SentenceResult, SessionMetrics};
use crate::store::FullStore;
use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};

pub fn utc_day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Attaches the attempt to today's session for the same speech, creating a
/// one-sentence session when there is none yet.
pub fn record_sentence_practice<S: FullStore + ?Sized>(
    store: &S,
    user_id: usize,
    attempt: &SentenceAttempt,
    now: DateTime<Utc>,
) -> Result<SentenceResult> {
    // Someone else's speech is practiced as free practice, like full sessions.
    let speech_id = match attempt.speech_id {
        Some(id) if store.get_speech(user_id, id)?.is_some() => Some(id),
        _ => None,
    };

    let session_id = match store.find_session_since(user_id, speech_id, utc_day_start(now))? {
        Some(id) => id,
        None => {
            let session = store.create_practice_session(
                user_id,
                &NewPracticeSession {
                    speech_id,
                    transcript: attempt.sentence_text.clone(),
                    score: attempt.score,
                    metrics: SessionMetrics {
                        word_count: attempt.sentence_text.split(' ').count() as u32,
                        sentence_count: 1,
                        ..Default::default()
                    },
                    practice_date: Some(now),
                    ..Default::default()
                },
            )?;
            session.id
        }
    };

    store.upsert_sentence_result(session_id, attempt, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::{PracticeStore, SessionOrder};
    use crate::speech::{NewSpeech, SpeechStore};
    use crate::sqlite_persistence::SqliteStore;
    use crate::user::{NewUser, UserStore};
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn setup() -> (SqliteStore, usize, usize, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteStore::new(temp_dir.path().join("test.db")).unwrap();
        let user_id = store
            .create_user(&NewUser {
                name: "Speaker".to_string(),
                email: "a@example.com".to_string(),
                role: Default::default(),
                user_type: Default::default(),
                usage_context: Default::default(),
            })
            .unwrap();
        let speech_id = store
            .create_speech(
                user_id,
                &NewSpeech {
                    title: "Toast".to_string(),
                    original_draft: "To friendship. To us.".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        (store, user_id, speech_id, temp_dir)
    }

    fn attempt(speech_id: Option<usize>, index: i64, score: u32) -> SentenceAttempt {
        SentenceAttempt {
            speech_id,
            sentence_text: "To friendship and to us".to_string(),
            sentence_index: index,
            score,
            flag_as_difficult: None,
            notes: None,
        }
    }

    #[test]
    fn day_start_truncates_to_midnight_utc() {
        let now = Utc.with_ymd_and_hms(2025, 5, 4, 23, 59, 59).unwrap();
        assert_eq!(
            utc_day_start(now),
            Utc.with_ymd_and_hms(2025, 5, 4, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn reuses_todays_session_for_same_speech() {
        let (store, user_id, speech_id, _dir) = setup();
        let now = Utc.with_ymd_and_hms(2025, 5, 4, 9, 0, 0).unwrap();

        let first = record_sentence_practice(&store, user_id, &attempt(Some(speech_id), 0, 70), now)
            .unwrap();
        let second = record_sentence_practice(
            &store,
            user_id,
            &attempt(Some(speech_id), 1, 80),
            now + Duration::hours(2),
        )
        .unwrap();
        assert_eq!(first.session_id, second.session_id);

        let sessions = store
            .get_practice_sessions(user_id, SessionOrder::OldestFirst, None)
            .unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].metrics.word_count, 5);
        assert_eq!(sessions[0].metrics.sentence_count, 1);
        assert_eq!(sessions[0].sentence_results.len(), 2);
    }

    #[test]
    fn starts_new_session_on_next_day_or_other_speech() {
        let (store, user_id, speech_id, _dir) = setup();
        let now = Utc.with_ymd_and_hms(2025, 5, 4, 9, 0, 0).unwrap();

        let today = record_sentence_practice(&store, user_id, &attempt(Some(speech_id), 0, 70), now)
            .unwrap();
        let free = record_sentence_practice(&store, user_id, &attempt(None, 0, 70), now).unwrap();
        let tomorrow = record_sentence_practice(
            &store,
            user_id,
            &attempt(Some(speech_id), 0, 70),
            now + Duration::days(1),
        )
        .unwrap();

        assert_ne!(today.session_id, free.session_id);
        assert_ne!(today.session_id, tomorrow.session_id);
        assert_eq!(tomorrow.attempts, 1);
    }
}
