//! Password hashing and session tokens

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use rand_distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::user_models::UserRole;

mod wordup_argon2 {
    use anyhow::{anyhow, Result};
    use argon2::{
        password_hash::{
            rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        },
        Argon2,
    };

    pub fn generate_b64_salt() -> String {
        SaltString::generate(&mut OsRng).to_string()
    }

    pub fn hash<T: AsRef<str>>(plain: &[u8], b64_salt: T) -> Result<String> {
        let salt = SaltString::from_b64(b64_salt.as_ref()).map_err(|err| anyhow!("{}", err))?;
        let hash_string = Argon2::default()
            .hash_password(plain, &salt)
            .map_err(|err| anyhow!("{}", err))?
            .to_string();
        Ok(hash_string)
    }

    pub fn verify<T: AsRef<str>>(plain_pw: &[u8], target_hash: T) -> Result<bool> {
        let password_hash =
            PasswordHash::new(target_hash.as_ref()).map_err(|err| anyhow!("{}", err))?;
        Ok(Argon2::default()
            .verify_password(plain_pw, &password_hash)
            .is_ok())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordHasher {
    Argon2,
}

impl FromStr for PasswordHasher {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2" => Ok(PasswordHasher::Argon2),
            _ => bail!("Unknown hasher {}", s),
        }
    }
}

impl fmt::Display for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordHasher::Argon2 => f.write_str("argon2"),
        }
    }
}

impl PasswordHasher {
    pub fn generate_b64_salt(&self) -> String {
        match self {
            PasswordHasher::Argon2 => wordup_argon2::generate_b64_salt(),
        }
    }

    pub fn hash<T: AsRef<str>>(&self, plain: &[u8], b64_salt: T) -> Result<String> {
        match self {
            PasswordHasher::Argon2 => wordup_argon2::hash(plain, b64_salt),
        }
    }

    pub fn verify<T: AsRef<str>>(&self, plain_pw: &str, target_hash: T) -> Result<bool> {
        match self {
            PasswordHasher::Argon2 => wordup_argon2::verify(plain_pw.as_bytes(), target_hash),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PasswordCredentials {
    pub user_id: usize,
    pub salt: String,
    pub hash: String,
    pub hasher: PasswordHasher,
    pub created: DateTime<Utc>,
}

impl PasswordCredentials {
    pub fn create(user_id: usize, plain_pw: &str) -> Result<Self> {
        let hasher = PasswordHasher::Argon2;
        let salt = hasher.generate_b64_salt();
        let hash = hasher.hash(plain_pw.as_bytes(), &salt)?;
        Ok(PasswordCredentials {
            user_id,
            salt,
            hash,
            hasher,
            created: Utc::now(),
        })
    }

    pub fn verify(&self, plain_pw: &str) -> Result<bool> {
        self.hasher.verify(plain_pw, &self.hash)
    }
}

/// What a valid token tells about the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthClaims {
    pub user_id: usize,
    pub role: UserRole,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: usize,
    role: UserRole,
    iat: i64,
    exp: i64,
}

/// A random A-z0-9 secret, used when no JWT secret is configured.
pub fn generate_jwt_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// HS256 signing and verification of session tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: usize, role: UserRole) -> Result<String> {
        self.issue_at(user_id, role, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: usize, role: UserRole, iat: i64) -> Result<String> {
        let claims = TokenClaims {
            sub: user_id,
            role,
            iat,
            exp: iat + self.ttl.as_secs() as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("Failed to sign session token")
    }

    pub fn verify(&self, token: &str) -> Result<AuthClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .context("Invalid session token")?;
        Ok(AuthClaims {
            user_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn argon2_hash() {
        let b64_salt = PasswordHasher::Argon2.generate_b64_salt();

        let hash1 = PasswordHasher::Argon2
            .hash("123mypw".as_bytes(), &b64_salt)
            .unwrap();
        let hash2 = PasswordHasher::Argon2.hash(b"123mypw", &b64_salt).unwrap();
        assert_eq!(hash1, hash2);

        assert!(PasswordHasher::Argon2.verify("123mypw", &hash1).unwrap());
        assert!(!PasswordHasher::Argon2.verify("not the pw", &hash1).unwrap());
    }

    #[test]
    fn password_credentials_verify() {
        let credentials = PasswordCredentials::create(4, "secret123").unwrap();
        assert_eq!(credentials.hasher.to_string(), "argon2");
        assert!(credentials.verify("secret123").unwrap());
        assert!(!credentials.verify("secret124").unwrap());
    }

    #[test]
    fn jwt_round_trip() {
        let keys = JwtKeys::new("a-secret", Duration::from_secs(3600));
        let token = keys.issue(12, UserRole::Admin).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(
            claims,
            AuthClaims {
                user_id: 12,
                role: UserRole::Admin
            }
        );
    }

    #[test]
    fn jwt_rejects_other_secret_and_expired_tokens() {
        let keys = JwtKeys::new("a-secret", Duration::from_secs(3600));
        let other = JwtKeys::new("another-secret", Duration::from_secs(3600));
        let token = keys.issue(1, UserRole::User).unwrap();
        assert!(other.verify(&token).is_err());

        let expired = keys
            .issue_at(1, UserRole::User, Utc::now().timestamp() - 2 * 3600)
            .unwrap();
        assert!(keys.verify(&expired).is_err());
        assert!(keys.verify("garbage").is_err());
    }

    #[test]
    fn generated_secret_is_alphanumeric() {
        let secret = generate_jwt_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
