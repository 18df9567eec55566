//! Test fixture creation for the database

use super::constants::*;
use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;
use wordup_server::sqlite_persistence::SqliteStore;
use wordup_server::user::{
    NewUser, PasswordCredentials, UserAuthCredentialsStore, UserRole, UserStore,
};

/// Creates a temporary test database with a regular and an admin user.
/// Returns (temp_dir, db_path)
pub fn create_test_db_with_users() -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("wordup.db");

    {
        let store = SqliteStore::new(&db_path)?;

        let user_id = create_user_with_password_and_role(
            &store,
            TEST_USER_NAME,
            TEST_USER_EMAIL,
            TEST_PASS,
            UserRole::User,
        )?;
        eprintln!("Created test user {} with id {}", TEST_USER_EMAIL, user_id);

        let admin_id = create_user_with_password_and_role(
            &store,
            ADMIN_USER_NAME,
            ADMIN_EMAIL,
            ADMIN_PASS,
            UserRole::Admin,
        )?;
        eprintln!("Created admin user {} with id {}", ADMIN_EMAIL, admin_id);
    }

    Ok((temp_dir, db_path))
}

fn create_user_with_password_and_role(
    store: &SqliteStore,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> Result<usize> {
    let user_id = store.create_user(&NewUser {
        name: name.to_string(),
        email: email.to_string(),
        role,
        user_type: Default::default(),
        usage_context: Default::default(),
    })?;
    store.set_password_credentials(&PasswordCredentials::create(user_id, password)?)?;
    Ok(user_id)
}
