use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use std::collections::HashMap;
use videosvc_core::{AppError, UserCredential};

/// Users allowed to obtain tokens, with argon2 password hashes.
pub struct UserDirectory {
    users: HashMap<String, String>,
    // Verified against for unknown usernames so lookups take the same time.
    dummy_hash: String,
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_hash(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

impl UserDirectory {
    pub fn new(credentials: &[UserCredential]) -> Result<Self, AppError> {
        let users = credentials
            .iter()
            .map(|c| Ok((c.username.clone(), hash_password(&c.password)?)))
            .collect::<Result<HashMap<_, _>, AppError>>()?;

        Ok(Self {
            users,
            dummy_hash: hash_password("unused-dummy-password")?,
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(hash) => verify_hash(password, hash),
            None => {
                verify_hash(password, &self.dummy_hash);
                false
            }
        }
    }
}
