pub mod auth;
mod sqlite_user_store;
mod user_manager;
pub mod user_models;
mod user_store;

pub use auth::{generate_jwt_secret, AuthClaims, JwtKeys, PasswordCredentials, PasswordHasher};
pub use user_manager::{AuthError, UserManager};
pub use user_models::{normalize_email, NewUser, UsageContext, User, UserRole, UserType};
pub use user_store::{UserAuthCredentialsStore, UserStore};
