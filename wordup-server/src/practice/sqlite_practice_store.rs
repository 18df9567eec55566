use super::practice_models::*;
use super::PracticeStore;
use crate::sqlite_persistence::{datetime_from_unix, unix_now, SqliteStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SESSION_SELECT: &str = "SELECT p.id, p.user_id, p.speech_id, s.title, p.transcript, p.score, \
    p.word_count, p.sentence_count, p.filler_word_count, p.overall_feedback, p.duration, \
    p.practice_date, p.created, p.clarity_score, p.clarity_feedback, p.pace_score, p.pace_feedback, \
    p.filler_words_score, p.filler_words_feedback, p.vocabulary_score, p.vocabulary_feedback, \
    p.structure_score, p.structure_feedback, p.words_per_minute, p.strengths, p.improvements \
    FROM practice_session p LEFT JOIN speech s ON s.id = p.speech_id";

const SENTENCE_COLUMNS: &str = "id, session_id, sentence_text, sentence_index, attempts, scores, \
    best_score, last_score, flagged_as_difficult, notes, timestamp";

fn criterion_from_row(row: &Row, score_idx: usize) -> rusqlite::Result<Option<CriterionScore>> {
    let score = row.get::<usize, Option<i64>>(score_idx)?;
    let feedback = row.get::<usize, Option<String>>(score_idx + 1)?;
    Ok(score.map(|score| CriterionScore {
        score: score.clamp(0, MAX_SCORE as i64) as u32,
        feedback: feedback.unwrap_or_default(),
    }))
}

fn string_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

fn opt_u32(value: Option<i64>) -> Option<u32> {
    value.map(|v| v.max(0) as u32)
}

fn session_from_row(row: &Row) -> rusqlite::Result<PracticeSession> {
    Ok(PracticeSession {
        id: row.get::<usize, i64>(0)? as usize,
        user_id: row.get::<usize, i64>(1)? as usize,
        speech_id: row.get::<usize, Option<i64>>(2)?.map(|id| id as usize),
        speech_title: row.get(3)?,
        transcript: row.get(4)?,
        score: row.get::<usize, i64>(5)?.max(0) as u32,
        metrics: SessionMetrics {
            word_count: row.get::<usize, i64>(6)?.max(0) as u32,
            sentence_count: row.get::<usize, i64>(7)?.max(0) as u32,
            filler_word_count: row.get::<usize, i64>(8)?.max(0) as u32,
            duration: opt_u32(row.get(10)?),
            words_per_minute: opt_u32(row.get(23)?),
        },
        feedback: SessionFeedback {
            strengths: string_list(&row.get::<usize, String>(24)?),
            improvements: string_list(&row.get::<usize, String>(25)?),
            overall_feedback: row.get(9)?,
        },
        practice_date: datetime_from_unix(row.get(11)?),
        created_at: datetime_from_unix(row.get(12)?),
        detailed_scores: DetailedScores {
            clarity: criterion_from_row(row, 13)?,
            pace: criterion_from_row(row, 15)?,
            filler_words: criterion_from_row(row, 17)?,
            vocabulary: criterion_from_row(row, 19)?,
            structure: criterion_from_row(row, 21)?,
        },
        sentence_results: vec![],
        grammar_issues: vec![],
        vocabulary_learned: vec![],
    })
}

fn sentence_from_row(row: &Row) -> rusqlite::Result<SentenceResult> {
    Ok(SentenceResult {
        id: row.get::<usize, i64>(0)? as usize,
        session_id: row.get::<usize, i64>(1)? as usize,
        sentence_text: row.get(2)?,
        sentence_index: row.get(3)?,
        attempts: row.get::<usize, i64>(4)?.max(0) as u32,
        scores: serde_json::from_str(&row.get::<usize, String>(5)?).unwrap_or_default(),
        best_score: opt_u32(row.get(6)?),
        last_score: opt_u32(row.get(7)?),
        flagged_as_difficult: row.get::<usize, i64>(8)? != 0,
        notes: row.get(9)?,
        timestamp: datetime_from_unix(row.get(10)?),
    })
}

fn load_children(conn: &Connection, session: &mut PracticeSession) -> Result<()> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM sentence_result WHERE session_id = ?1 ORDER BY sentence_index, id",
        SENTENCE_COLUMNS
    ))?;
    session.sentence_results = stmt
        .query_map(params![session.id as i64], sentence_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT id, issue, suggestion, sentence, resolved FROM grammar_issue WHERE session_id = ?1 ORDER BY id",
    )?;
    session.grammar_issues = stmt
        .query_map(params![session.id as i64], |row| {
            Ok(GrammarIssue {
                id: row.get::<usize, i64>(0)? as usize,
                issue: row.get(1)?,
                suggestion: row.get(2)?,
                sentence: row.get(3)?,
                resolved: row.get::<usize, i64>(4)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT id, word, definition, usage, date_added FROM vocabulary_entry WHERE session_id = ?1 ORDER BY id",
    )?;
    session.vocabulary_learned = stmt
        .query_map(params![session.id as i64], |row| {
            Ok(VocabularyEntry {
                id: row.get::<usize, i64>(0)? as usize,
                word: row.get(1)?,
                definition: row.get(2)?,
                usage: row.get(3)?,
                date_added: datetime_from_unix(row.get(4)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(())
}

fn query_sessions<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<PracticeSession>> {
    let mut stmt = conn.prepare(sql)?;
    let mut sessions = stmt
        .query_map(params, session_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    for session in sessions.iter_mut() {
        load_children(conn, session)?;
    }
    Ok(sessions)
}

fn select_owned_session(
    conn: &Connection,
    user_id: usize,
    session_id: usize,
) -> Result<Option<PracticeSession>> {
    let session = conn
        .query_row(
            &format!("{} WHERE p.id = ?1 AND p.user_id = ?2", SESSION_SELECT),
            params![session_id as i64, user_id as i64],
            session_from_row,
        )
        .optional()?;
    match session {
        Some(mut session) => {
            load_children(conn, &mut session)?;
            Ok(Some(session))
        }
        None => Ok(None),
    }
}

fn select_sentence(conn: &Connection, sentence_id: i64) -> Result<SentenceResult> {
    conn.query_row(
        &format!("SELECT {} FROM sentence_result WHERE id = ?1", SENTENCE_COLUMNS),
        params![sentence_id],
        sentence_from_row,
    )
    .with_context(|| format!("Failed to read sentence result {}", sentence_id))
}

fn criterion_params(criterion: &Option<CriterionScore>) -> (Option<i64>, Option<&str>) {
    match criterion {
        Some(c) => (Some(c.score as i64), Some(c.feedback.as_str())),
        None => (None, None),
    }
}

impl PracticeStore for SqliteStore {
    fn create_practice_session(
        &self,
        user_id: usize,
        session: &NewPracticeSession,
    ) -> Result<PracticeSession> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let speech_id = match session.speech_id {
            Some(speech_id) => tx
                .query_row(
                    "SELECT id FROM speech WHERE id = ?1 AND user_id = ?2",
                    params![speech_id as i64, user_id as i64],
                    |row| row.get::<usize, i64>(0),
                )
                .optional()?,
            None => None,
        };

        let practice_date = session
            .practice_date
            .map(|d| d.timestamp())
            .unwrap_or_else(unix_now);
        let scores = &session.detailed_scores;
        let (clarity_score, clarity_feedback) = criterion_params(&scores.clarity);
        let (pace_score, pace_feedback) = criterion_params(&scores.pace);
        let (filler_score, filler_feedback) = criterion_params(&scores.filler_words);
        let (vocabulary_score, vocabulary_feedback) = criterion_params(&scores.vocabulary);
        let (structure_score, structure_feedback) = criterion_params(&scores.structure);

        tx.execute(
            "INSERT INTO practice_session (user_id, speech_id, transcript, score, word_count, \
             sentence_count, filler_word_count, overall_feedback, duration, practice_date, \
             clarity_score, clarity_feedback, pace_score, pace_feedback, filler_words_score, \
             filler_words_feedback, vocabulary_score, vocabulary_feedback, structure_score, \
             structure_feedback, words_per_minute, strengths, improvements) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, \
             ?18, ?19, ?20, ?21, ?22, ?23)",
            params![
                user_id as i64,
                speech_id,
                session.transcript,
                session.score as i64,
                session.metrics.word_count as i64,
                session.metrics.sentence_count as i64,
                session.metrics.filler_word_count as i64,
                session.feedback.overall_feedback,
                session.metrics.duration.map(|d| d as i64),
                practice_date,
                clarity_score,
                clarity_feedback,
                pace_score,
                pace_feedback,
                filler_score,
                filler_feedback,
                vocabulary_score,
                vocabulary_feedback,
                structure_score,
                structure_feedback,
                session.metrics.words_per_minute.map(|w| w as i64),
                serde_json::to_string(&session.feedback.strengths)?,
                serde_json::to_string(&session.feedback.improvements)?,
            ],
        )
        .with_context(|| format!("Failed to store practice session of user {}", user_id))?;
        let session_id = tx.last_insert_rowid();

        for issue in &session.grammar_issues {
            tx.execute(
                "INSERT INTO grammar_issue (session_id, issue, suggestion, sentence) VALUES (?1, ?2, ?3, ?4)",
                params![session_id, issue.issue, issue.suggestion, issue.sentence],
            )?;
        }
        for entry in &session.vocabulary_learned {
            tx.execute(
                "INSERT INTO vocabulary_entry (session_id, word, definition, usage, date_added) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![session_id, entry.word, entry.definition, entry.usage, practice_date],
            )?;
        }

        if let Some(speech_id) = speech_id {
            tx.execute(
                "UPDATE speech SET practice_count = practice_count + 1, last_practiced_at = ?1 WHERE id = ?2",
                params![practice_date, speech_id],
            )?;
        }
        tx.commit()?;

        select_owned_session(&conn, user_id, session_id as usize)?
            .context("Practice session vanished right after creation")
    }

    fn get_practice_sessions(
        &self,
        user_id: usize,
        order: SessionOrder,
        limit: Option<usize>,
    ) -> Result<Vec<PracticeSession>> {
        let conn = self.conn.lock().unwrap();
        let direction = match order {
            SessionOrder::OldestFirst => "ASC",
            SessionOrder::NewestFirst => "DESC",
        };
        // LIMIT -1 means no limit in SQLite.
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        query_sessions(
            &conn,
            &format!(
                "{} WHERE p.user_id = ?1 ORDER BY p.practice_date {dir}, p.id {dir} LIMIT ?2",
                SESSION_SELECT,
                dir = direction
            ),
            params![user_id as i64, limit],
        )
    }

    fn get_speech_practice_sessions(
        &self,
        user_id: usize,
        speech_id: usize,
    ) -> Result<Vec<PracticeSession>> {
        let conn = self.conn.lock().unwrap();
        query_sessions(
            &conn,
            &format!(
                "{} WHERE p.user_id = ?1 AND p.speech_id = ?2 ORDER BY p.practice_date ASC, p.id ASC",
                SESSION_SELECT
            ),
            params![user_id as i64, speech_id as i64],
        )
    }

    fn get_practice_session(
        &self,
        user_id: usize,
        session_id: usize,
    ) -> Result<Option<PracticeSession>> {
        let conn = self.conn.lock().unwrap();
        select_owned_session(&conn, user_id, session_id)
    }

    fn delete_practice_session(
        &self,
        user_id: usize,
        session_id: usize,
    ) -> Result<Option<PracticeSession>> {
        let mut conn = self.conn.lock().unwrap();
        let Some(session) = select_owned_session(&conn, user_id, session_id)? else {
            return Ok(None);
        };

        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM practice_session WHERE id = ?1",
            params![session_id as i64],
        )?;
        if let Some(speech_id) = session.speech_id {
            tx.execute(
                "UPDATE speech SET practice_count = MAX(practice_count - 1, 0) WHERE id = ?1",
                params![speech_id as i64],
            )?;
        }
        tx.commit()?;
        Ok(Some(session))
    }

    fn find_session_since(
        &self,
        user_id: usize,
        speech_id: Option<usize>,
        since: DateTime<Utc>,
    ) -> Result<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        let id = conn
            .query_row(
                "SELECT id FROM practice_session WHERE user_id = ?1 AND speech_id IS ?2 \
                 AND practice_date >= ?3 ORDER BY practice_date DESC, id DESC LIMIT 1",
                params![
                    user_id as i64,
                    speech_id.map(|id| id as i64),
                    since.timestamp()
                ],
                |row| row.get::<usize, i64>(0),
            )
            .optional()?;
        Ok(id.map(|id| id as usize))
    }

    fn upsert_sentence_result(
        &self,
        session_id: usize,
        attempt: &SentenceAttempt,
        now: DateTime<Utc>,
    ) -> Result<SentenceResult> {
        let conn = self.conn.lock().unwrap();
        let existing = conn
            .query_row(
                &format!(
                    "SELECT {} FROM sentence_result WHERE session_id = ?1 AND sentence_index = ?2",
                    SENTENCE_COLUMNS
                ),
                params![session_id as i64, attempt.sentence_index],
                sentence_from_row,
            )
            .optional()?;

        let notes = attempt.notes.as_deref().filter(|n| !n.is_empty());
        let sentence_id = match existing {
            Some(mut sentence) => {
                sentence.attempts += 1;
                sentence.scores.push(attempt.score);
                let best = sentence.best_score.unwrap_or(0).max(attempt.score);
                conn.execute(
                    "UPDATE sentence_result SET attempts = ?1, scores = ?2, last_score = ?3, \
                     best_score = ?4, timestamp = ?5, \
                     flagged_as_difficult = COALESCE(?6, flagged_as_difficult), \
                     notes = COALESCE(?7, notes) WHERE id = ?8",
                    params![
                        sentence.attempts as i64,
                        serde_json::to_string(&sentence.scores)?,
                        attempt.score as i64,
                        best as i64,
                        now.timestamp(),
                        attempt.flag_as_difficult,
                        notes,
                        sentence.id as i64,
                    ],
                )?;
                sentence.id as i64
            }
            None => {
                conn.execute(
                    "INSERT INTO sentence_result (session_id, sentence_index, sentence_text, attempts, \
                     scores, best_score, last_score, flagged_as_difficult, notes, timestamp) \
                     VALUES (?1, ?2, ?3, 1, ?4, ?5, ?5, ?6, ?7, ?8)",
                    params![
                        session_id as i64,
                        attempt.sentence_index,
                        attempt.sentence_text,
                        serde_json::to_string(&[attempt.score])?,
                        attempt.score as i64,
                        attempt.flag_as_difficult.unwrap_or(false),
                        notes,
                        now.timestamp(),
                    ],
                )
                .with_context(|| format!("Failed to store sentence of session {}", session_id))?;
                conn.last_insert_rowid()
            }
        };
        select_sentence(&conn, sentence_id)
    }

    fn update_sentence_result(
        &self,
        user_id: usize,
        session_id: usize,
        sentence_id: usize,
        update: &SentenceUpdate,
    ) -> Result<SentenceUpdateOutcome> {
        let conn = self.conn.lock().unwrap();
        let session_exists = conn
            .query_row(
                "SELECT 1 FROM practice_session WHERE id = ?1 AND user_id = ?2",
                params![session_id as i64, user_id as i64],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !session_exists {
            return Ok(SentenceUpdateOutcome::SessionNotFound);
        }

        let updated = conn.execute(
            "UPDATE sentence_result SET flagged_as_difficult = COALESCE(?1, flagged_as_difficult), \
             notes = COALESCE(?2, notes) WHERE id = ?3 AND session_id = ?4",
            params![
                update.flag_as_difficult,
                update.notes,
                sentence_id as i64,
                session_id as i64
            ],
        )?;
        if updated == 0 {
            return Ok(SentenceUpdateOutcome::SentenceNotFound);
        }
        Ok(SentenceUpdateOutcome::Updated(select_sentence(
            &conn,
            sentence_id as i64,
        )?))
    }

    fn get_difficult_sentences(&self, user_id: usize) -> Result<Vec<DifficultSentence>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT r.id, r.sentence_text, r.sentence_index, r.attempts, r.scores, r.best_score, \
             r.last_score, r.notes, s.title, p.speech_id, p.id, r.timestamp \
             FROM sentence_result r \
             JOIN practice_session p ON p.id = r.session_id \
             LEFT JOIN speech s ON s.id = p.speech_id \
             WHERE p.user_id = ?1 AND r.flagged_as_difficult = 1 \
             ORDER BY r.timestamp DESC, r.id DESC",
        )?;
        let sentences = stmt
            .query_map(params![user_id as i64], |row| {
                Ok(DifficultSentence {
                    id: row.get::<usize, i64>(0)? as usize,
                    text: row.get(1)?,
                    sentence_index: row.get(2)?,
                    attempts: row.get::<usize, i64>(3)?.max(0) as u32,
                    scores: serde_json::from_str(&row.get::<usize, String>(4)?)
                        .unwrap_or_default(),
                    best_score: opt_u32(row.get(5)?),
                    last_score: opt_u32(row.get(6)?),
                    notes: row.get(7)?,
                    speech_title: row
                        .get::<usize, Option<String>>(8)?
                        .unwrap_or_else(|| "Unknown Speech".to_string()),
                    speech_id: row.get::<usize, Option<i64>>(9)?.map(|id| id as usize),
                    session_id: row.get::<usize, i64>(10)? as usize,
                    last_practiced: datetime_from_unix(row.get(11)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sentences)
    }
}
