use super::auth::PasswordCredentials;
use super::user_models::{NewUser, User, UserRole};
use anyhow::Result;

pub trait UserAuthCredentialsStore: Send + Sync {
    /// Returns the password credentials of the given user.
    /// Returns Ok(None) if the user has none.
    /// Returns Err if there is a database error.
    fn get_password_credentials(&self, user_id: usize) -> Result<Option<PasswordCredentials>>;

    /// Inserts or replaces the password credentials of a user.
    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()>;
}

pub trait UserStore: UserAuthCredentialsStore + Send + Sync {
    /// Creates a new user and returns its id.
    /// Fails if the email is already taken.
    fn create_user(&self, new_user: &NewUser) -> Result<usize>;

    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, user_id: usize) -> Result<Option<User>>;

    /// Looks a user up by (normalized) email.
    /// Returns Ok(None) if no user has that email.
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// All users, newest first.
    fn get_all_users(&self) -> Result<Vec<User>>;

    /// Returns false if the user does not exist.
    fn set_user_role(&self, user_id: usize, role: UserRole) -> Result<bool>;

    /// Deletes a user with everything they own.
    /// Returns false if the user does not exist.
    fn delete_user(&self, user_id: usize) -> Result<bool>;
}
