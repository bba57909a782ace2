use pbkdf2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Pbkdf2,
};
use rand::rngs::OsRng;
use tracing::error;

/// PBKDF2-HMAC-SHA256 digest in PHC string form: algorithm, parameters and
/// salt travel inside the output, so verification needs no external state.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Pbkdf2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "pbkdf2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, digest: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(digest).map_err(|e| {
        error!(error = %e, "pbkdf2 parse digest error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Pbkdf2.verify_password(plain.as_bytes(), &parsed).is_ok())
}
