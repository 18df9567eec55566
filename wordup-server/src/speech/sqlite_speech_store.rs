use super::{NewSpeech, Speech, SpeechAnalysis, SpeechStore, SpeechUpdate};
use crate::sqlite_persistence::{datetime_from_unix, unix_now, SqliteStore};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

const SPEECH_COLUMNS: &str = "id, user_id, title, original_draft, improved_version, \
    ai_suggestions, analysis, practice_count, last_practiced_at, created, updated";

fn speech_from_row(row: &Row) -> rusqlite::Result<Speech> {
    let id = row.get::<usize, i64>(0)? as usize;
    let analysis = match row.get::<usize, Option<String>>(6)? {
        Some(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
            warn!("Speech {} has unreadable analysis: {}", id, err);
            SpeechAnalysis::default()
        }),
        None => SpeechAnalysis::default(),
    };
    Ok(Speech {
        id,
        user_id: row.get::<usize, i64>(1)? as usize,
        title: row.get(2)?,
        original_draft: row.get(3)?,
        improved_version: row.get(4)?,
        ai_suggestions: row.get(5)?,
        analysis,
        practice_count: row.get::<usize, i64>(7)?.max(0) as usize,
        last_practiced_at: row.get::<usize, Option<i64>>(8)?.map(datetime_from_unix),
        created_at: datetime_from_unix(row.get(9)?),
        updated_at: datetime_from_unix(row.get(10)?),
    })
}

fn analysis_json(analysis: &SpeechAnalysis) -> Result<Option<String>> {
    if analysis.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(analysis)?))
}

fn select_owned_speech(conn: &Connection, user_id: usize, speech_id: usize) -> Result<Option<Speech>> {
    let speech = conn
        .query_row(
            &format!(
                "SELECT {} FROM speech WHERE id = ?1 AND user_id = ?2",
                SPEECH_COLUMNS
            ),
            params![speech_id as i64, user_id as i64],
            speech_from_row,
        )
        .optional()?;
    Ok(speech)
}

impl SpeechStore for SqliteStore {
    fn create_speech(&self, user_id: usize, speech: &NewSpeech) -> Result<usize> {
        let analysis = match &speech.analysis {
            Some(analysis) => analysis_json(analysis)?,
            None => None,
        };
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO speech (user_id, title, original_draft, improved_version, ai_suggestions, analysis) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id as i64,
                speech.title.trim(),
                speech.original_draft,
                speech.improved_version.as_deref().unwrap_or_default(),
                speech.ai_suggestions.as_deref().unwrap_or_default(),
                analysis,
            ],
        )
        .with_context(|| format!("Failed to create speech for user {}", user_id))?;
        Ok(conn.last_insert_rowid() as usize)
    }

    fn get_speech(&self, user_id: usize, speech_id: usize) -> Result<Option<Speech>> {
        let conn = self.conn.lock().unwrap();
        select_owned_speech(&conn, user_id, speech_id)
    }

    fn get_user_speeches(&self, user_id: usize) -> Result<Vec<Speech>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM speech WHERE user_id = ?1 ORDER BY updated DESC, id DESC",
            SPEECH_COLUMNS
        ))?;
        let speeches = stmt
            .query_map(params![user_id as i64], speech_from_row)?
            .collect::<Result<Vec<Speech>, _>>()?;
        Ok(speeches)
    }

    fn update_speech(
        &self,
        user_id: usize,
        speech_id: usize,
        update: &SpeechUpdate,
    ) -> Result<Option<Speech>> {
        let conn = self.conn.lock().unwrap();
        let Some(mut speech) = select_owned_speech(&conn, user_id, speech_id)? else {
            return Ok(None);
        };

        if let Some(title) = SpeechUpdate::non_empty(&update.title) {
            speech.title = title.trim().to_string();
        }
        if let Some(draft) = SpeechUpdate::non_empty(&update.original_draft) {
            speech.original_draft = draft.to_string();
        }
        if let Some(improved) = SpeechUpdate::non_empty(&update.improved_version) {
            speech.improved_version = improved.to_string();
        }
        if let Some(suggestions) = SpeechUpdate::non_empty(&update.ai_suggestions) {
            speech.ai_suggestions = suggestions.to_string();
        }
        if let Some(analysis) = &update.analysis {
            speech.analysis = analysis.clone();
        }

        conn.execute(
            "UPDATE speech SET title = ?1, original_draft = ?2, improved_version = ?3, \
             ai_suggestions = ?4, analysis = ?5, updated = ?6 WHERE id = ?7",
            params![
                speech.title,
                speech.original_draft,
                speech.improved_version,
                speech.ai_suggestions,
                analysis_json(&speech.analysis)?,
                unix_now(),
                speech_id as i64,
            ],
        )?;
        select_owned_speech(&conn, user_id, speech_id)
    }

    fn delete_speech(&self, user_id: usize, speech_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM speech WHERE id = ?1 AND user_id = ?2",
            params![speech_id as i64, user_id as i64],
        )?;
        Ok(deleted > 0)
    }

    fn record_speech_practice(&self, user_id: usize, speech_id: usize) -> Result<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        let now = unix_now();
        let count = conn
            .query_row(
                "UPDATE speech SET practice_count = practice_count + 1, last_practiced_at = ?1, updated = ?1 \
                 WHERE id = ?2 AND user_id = ?3 RETURNING practice_count",
                params![now, speech_id as i64, user_id as i64],
                |row| row.get::<usize, i64>(0),
            )
            .optional()?;
        Ok(count.map(|c| c.max(0) as usize))
    }

    fn get_all_speeches(&self) -> Result<Vec<Speech>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM speech ORDER BY created DESC, id DESC",
            SPEECH_COLUMNS
        ))?;
        let speeches = stmt
            .query_map([], speech_from_row)?
            .collect::<Result<Vec<Speech>, _>>()?;
        Ok(speeches)
    }

    fn delete_any_speech(&self, speech_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM speech WHERE id = ?1", params![speech_id as i64])?;
        Ok(deleted > 0)
    }
}
