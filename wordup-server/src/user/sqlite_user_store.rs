use crate::sqlite_persistence::{datetime_from_unix, unix_now, SqliteStore};
use crate::user::*;
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};
use std::str::FromStr;

const USER_COLUMNS: &str = "id, name, email, role, user_type, usage_context, created, updated";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get::<usize, i64>(0)? as usize,
        name: row.get(1)?,
        email: row.get(2)?,
        role: UserRole::from_db(&row.get::<usize, String>(3)?),
        user_type: UserType::parse_lossy(&row.get::<usize, String>(4)?),
        usage_context: UsageContext::parse_lossy(&row.get::<usize, String>(5)?),
        created_at: datetime_from_unix(row.get(6)?),
        updated_at: datetime_from_unix(row.get(7)?),
    })
}

impl UserStore for SqliteStore {
    fn create_user(&self, new_user: &NewUser) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user (name, email, role, user_type, usage_context) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new_user.name,
                normalize_email(&new_user.email),
                new_user.role.as_str(),
                new_user.user_type.as_str(),
                new_user.usage_context.as_str(),
            ],
        )
        .with_context(|| format!("Failed to create user {}", new_user.email))?;
        Ok(conn.last_insert_rowid() as usize)
    }

    fn get_user(&self, user_id: usize) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let user = conn
            .query_row(
                &format!("SELECT {} FROM user WHERE id = ?1", USER_COLUMNS),
                params![user_id as i64],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let user = conn
            .query_row(
                &format!("SELECT {} FROM user WHERE email = ?1", USER_COLUMNS),
                params![normalize_email(email)],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_all_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM user ORDER BY created DESC, id DESC",
            USER_COLUMNS
        ))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<User>, _>>()?;
        Ok(users)
    }

    fn set_user_role(&self, user_id: usize, role: UserRole) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE user SET role = ?1, updated = ?2 WHERE id = ?3",
            params![role.as_str(), unix_now(), user_id as i64],
        )?;
        Ok(updated > 0)
    }

    fn delete_user(&self, user_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM user WHERE id = ?1", params![user_id as i64])
            .with_context(|| format!("Failed to delete user {}", user_id))?;
        Ok(deleted > 0)
    }
}

impl UserAuthCredentialsStore for SqliteStore {
    fn get_password_credentials(&self, user_id: usize) -> Result<Option<PasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT salt, hash, hasher, created FROM user_password_credentials WHERE user_id = ?1",
                params![user_id as i64],
                |row| {
                    Ok((
                        row.get::<usize, String>(0)?,
                        row.get::<usize, String>(1)?,
                        row.get::<usize, String>(2)?,
                        row.get::<usize, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((salt, hash, hasher, created)) = row else {
            return Ok(None);
        };
        Ok(Some(PasswordCredentials {
            user_id,
            salt,
            hash,
            hasher: PasswordHasher::from_str(&hasher)?,
            created: datetime_from_unix(created),
        }))
    }

    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user_password_credentials (user_id, salt, hash, hasher, created) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(user_id) DO UPDATE SET salt = excluded.salt, hash = excluded.hash, \
             hasher = excluded.hasher, created = excluded.created",
            params![
                credentials.user_id as i64,
                credentials.salt,
                credentials.hash,
                credentials.hasher.to_string(),
                credentials.created.timestamp(),
            ],
        )
        .with_context(|| format!("Failed to store credentials of user {}", credentials.user_id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let temp_file_path = temp_dir.path().join("test.db");
        let store = SqliteStore::new(&temp_file_path).unwrap();
        (store, temp_dir)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            role: UserRole::User,
            user_type: UserType::Student,
            usage_context: UsageContext::default(),
        }
    }

    #[test]
    fn test_create_user() {
        let (store, _temp_dir) = create_tmp_store();

        let user_id = store.create_user(&new_user("Test@Example.com")).unwrap();
        assert_eq!(user_id, 1);

        let duplicate_id = store.create_user(&new_user("test@example.com"));
        assert!(duplicate_id.is_err());

        let user = store.get_user_by_email("TEST@example.com ").unwrap().unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.user_type, UserType::Student);
        assert_eq!(user.usage_context, UsageContext::Other);
    }

    #[test]
    fn returns_none_for_missing_user() {
        let (store, _temp_dir) = create_tmp_store();

        assert!(store.get_user(42).unwrap().is_none());
        assert!(store.get_user_by_email("nobody@example.com").unwrap().is_none());
        assert!(!store.delete_user(42).unwrap());
        assert!(!store.set_user_role(42, UserRole::Admin).unwrap());
    }

    #[test]
    fn stores_and_replaces_password_credentials() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&new_user("a@example.com")).unwrap();
        assert!(store.get_password_credentials(user_id).unwrap().is_none());

        let credentials = PasswordCredentials::create(user_id, "first-pw").unwrap();
        store.set_password_credentials(&credentials).unwrap();
        let replaced = PasswordCredentials::create(user_id, "second-pw").unwrap();
        store.set_password_credentials(&replaced).unwrap();

        let stored = store.get_password_credentials(user_id).unwrap().unwrap();
        assert!(stored.verify("second-pw").unwrap());
        assert!(!stored.verify("first-pw").unwrap());
    }

    #[test]
    fn deleting_user_removes_credentials() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&new_user("a@example.com")).unwrap();
        store
            .set_password_credentials(&PasswordCredentials::create(user_id, "pw1234").unwrap())
            .unwrap();

        assert!(store.delete_user(user_id).unwrap());
        assert!(store.get_user(user_id).unwrap().is_none());
        assert!(store.get_password_credentials(user_id).unwrap().is_none());
    }

    #[test]
    fn promotes_user_to_admin() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&new_user("a@example.com")).unwrap();

        assert!(store.set_user_role(user_id, UserRole::Admin).unwrap());
        assert!(store.get_user(user_id).unwrap().unwrap().is_admin());
        assert_eq!(store.get_all_users().unwrap().len(), 1);
    }
}
