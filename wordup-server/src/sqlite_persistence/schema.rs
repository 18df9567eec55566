//! Table layout of `wordup.db`.
//!
//! Version 0 stores practice sessions with flat metrics and a free-text
//! `feedback` column. Version 1 is the current shape: per-criterion scores,
//! structured feedback and per-session child tables. Legacy rows are carried
//! over by [`migrate_practice_session_v1`] and keep `NULL` criterion scores.

use super::versioned_schema::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use crate::sqlite_column;
use anyhow::Result;
use rusqlite::Connection;

const USER_FK: ForeignKey = ForeignKey {
    foreign_table: "user",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const SPEECH_FK: ForeignKey = ForeignKey {
    foreign_table: "speech",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const PRACTICE_SESSION_FK: ForeignKey = ForeignKey {
    foreign_table: "practice_session",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// V 0
pub const USER_TABLE_V_0: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "role",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'user'")
        ),
        sqlite_column!(
            "user_type",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'other'")
        ),
        sqlite_column!(
            "usage_context",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'other'")
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "updated",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_user_email", "email")],
    unique_constraints: &[],
};

pub const USER_PASSWORD_CREDENTIALS_TABLE_V_0: Table = Table {
    name: "user_password_credentials",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            is_primary_key = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const SPEECH_TABLE_V_0: Table = Table {
    name: "speech",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("original_draft", &SqlType::Text, non_null = true),
        sqlite_column!(
            "improved_version",
            &SqlType::Text,
            non_null = true,
            default_value = Some("''")
        ),
        sqlite_column!(
            "ai_suggestions",
            &SqlType::Text,
            non_null = true,
            default_value = Some("''")
        ),
        sqlite_column!("analysis", &SqlType::Text),
        sqlite_column!(
            "practice_count",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("last_practiced_at", &SqlType::Integer),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "updated",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_speech_user_id", "user_id")],
    unique_constraints: &[],
};

pub const PRACTICE_SESSION_TABLE_V_0: Table = Table {
    name: "practice_session",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!(
            "speech_id",
            &SqlType::Integer,
            foreign_key = Some(&SPEECH_FK)
        ),
        sqlite_column!("transcript", &SqlType::Text, non_null = true),
        sqlite_column!("score", &SqlType::Integer, non_null = true),
        sqlite_column!("word_count", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "sentence_count",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "filler_word_count",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("feedback", &SqlType::Text),
        sqlite_column!("duration", &SqlType::Integer),
        sqlite_column!(
            "practice_date",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_practice_session_user_date", "user_id, practice_date"),
        ("idx_practice_session_speech_id", "speech_id"),
    ],
    unique_constraints: &[],
};

/// V 1
pub const PRACTICE_SESSION_TABLE_V_1: Table = Table {
    name: "practice_session",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!(
            "speech_id",
            &SqlType::Integer,
            foreign_key = Some(&SPEECH_FK)
        ),
        sqlite_column!("transcript", &SqlType::Text, non_null = true),
        sqlite_column!("score", &SqlType::Integer, non_null = true),
        sqlite_column!("word_count", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "sentence_count",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "filler_word_count",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("overall_feedback", &SqlType::Text),
        sqlite_column!("duration", &SqlType::Integer),
        sqlite_column!(
            "practice_date",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("clarity_score", &SqlType::Integer),
        sqlite_column!("clarity_feedback", &SqlType::Text),
        sqlite_column!("pace_score", &SqlType::Integer),
        sqlite_column!("pace_feedback", &SqlType::Text),
        sqlite_column!("filler_words_score", &SqlType::Integer),
        sqlite_column!("filler_words_feedback", &SqlType::Text),
        sqlite_column!("vocabulary_score", &SqlType::Integer),
        sqlite_column!("vocabulary_feedback", &SqlType::Text),
        sqlite_column!("structure_score", &SqlType::Integer),
        sqlite_column!("structure_feedback", &SqlType::Text),
        sqlite_column!("words_per_minute", &SqlType::Integer),
        sqlite_column!(
            "strengths",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'[]'")
        ),
        sqlite_column!(
            "improvements",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'[]'")
        ),
    ],
    indices: &[
        ("idx_practice_session_user_date", "user_id, practice_date"),
        ("idx_practice_session_speech_id", "speech_id"),
    ],
    unique_constraints: &[],
};

pub const SENTENCE_RESULT_TABLE_V_1: Table = Table {
    name: "sentence_result",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "session_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PRACTICE_SESSION_FK)
        ),
        sqlite_column!("sentence_index", &SqlType::Integer, non_null = true),
        sqlite_column!("sentence_text", &SqlType::Text, non_null = true),
        sqlite_column!(
            "attempts",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("1")
        ),
        sqlite_column!(
            "scores",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'[]'")
        ),
        sqlite_column!("best_score", &SqlType::Integer),
        sqlite_column!("last_score", &SqlType::Integer),
        sqlite_column!(
            "flagged_as_difficult",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("notes", &SqlType::Text),
        sqlite_column!(
            "timestamp",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_sentence_result_session_id", "session_id")],
    unique_constraints: &[&["session_id", "sentence_index"]],
};

pub const GRAMMAR_ISSUE_TABLE_V_1: Table = Table {
    name: "grammar_issue",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "session_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PRACTICE_SESSION_FK)
        ),
        sqlite_column!("issue", &SqlType::Text, non_null = true),
        sqlite_column!("suggestion", &SqlType::Text),
        sqlite_column!("sentence", &SqlType::Text),
        sqlite_column!(
            "resolved",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
    ],
    indices: &[("idx_grammar_issue_session_id", "session_id")],
    unique_constraints: &[],
};

pub const VOCABULARY_ENTRY_TABLE_V_1: Table = Table {
    name: "vocabulary_entry",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "session_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PRACTICE_SESSION_FK)
        ),
        sqlite_column!("word", &SqlType::Text, non_null = true),
        sqlite_column!("definition", &SqlType::Text),
        sqlite_column!("usage", &SqlType::Text),
        sqlite_column!(
            "date_added",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_vocabulary_entry_session_id", "session_id")],
    unique_constraints: &[],
};

const CRITERION_COLUMNS: &[(&str, &str)] = &[
    ("clarity_score", "INTEGER"),
    ("clarity_feedback", "TEXT"),
    ("pace_score", "INTEGER"),
    ("pace_feedback", "TEXT"),
    ("filler_words_score", "INTEGER"),
    ("filler_words_feedback", "TEXT"),
    ("vocabulary_score", "INTEGER"),
    ("vocabulary_feedback", "TEXT"),
    ("structure_score", "INTEGER"),
    ("structure_feedback", "TEXT"),
    ("words_per_minute", "INTEGER"),
];

/// Brings legacy flat practice rows to the current shape. Flat metrics are
/// kept, criterion scores stay `NULL`.
fn migrate_practice_session_v1(conn: &Connection) -> Result<()> {
    conn.execute(
        "ALTER TABLE practice_session RENAME COLUMN feedback TO overall_feedback",
        [],
    )?;
    for (name, sql_type) in CRITERION_COLUMNS {
        conn.execute(
            &format!("ALTER TABLE practice_session ADD COLUMN {} {}", name, sql_type),
            [],
        )?;
    }
    conn.execute(
        "ALTER TABLE practice_session ADD COLUMN strengths TEXT NOT NULL DEFAULT '[]'",
        [],
    )?;
    conn.execute(
        "ALTER TABLE practice_session ADD COLUMN improvements TEXT NOT NULL DEFAULT '[]'",
        [],
    )?;
    SENTENCE_RESULT_TABLE_V_1.create(conn)?;
    GRAMMAR_ISSUE_TABLE_V_1.create(conn)?;
    VOCABULARY_ENTRY_TABLE_V_1.create(conn)?;
    Ok(())
}

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[
            USER_TABLE_V_0,
            USER_PASSWORD_CREDENTIALS_TABLE_V_0,
            SPEECH_TABLE_V_0,
            PRACTICE_SESSION_TABLE_V_0,
        ],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[
            USER_TABLE_V_0,
            USER_PASSWORD_CREDENTIALS_TABLE_V_0,
            SPEECH_TABLE_V_0,
            PRACTICE_SESSION_TABLE_V_1,
            SENTENCE_RESULT_TABLE_V_1,
            GRAMMAR_ISSUE_TABLE_V_1,
            VOCABULARY_ENTRY_TABLE_V_1,
        ],
        migration: Some(migrate_practice_session_v1),
    },
];
