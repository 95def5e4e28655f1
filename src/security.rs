use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password with Argon2id (default parameters) and a random salt
///
/// Returns the PHC string, which embeds algorithm, parameters and salt.
/// This is CPU-heavy; call it from a blocking task.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| format!("Failed to hash password: {}", e))
}

/// Verify a password against a stored PHC string
///
/// Comparison is constant-time. A malformed stored hash never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Session Tokens
// =============================================================================

/// Compute the hex HMAC-SHA256 of `data`
fn sign(data: &str, secret: &str) -> Option<String> {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return None;
        }
    };
    mac.update(data.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a hex HMAC-SHA256 signature in constant time
pub fn verify_hmac(data: &str, signature: &str, secret: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    mac.update(data.as_bytes());

    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format");
            return false;
        }
    };

    mac.verify_slice(&sig_bytes).is_ok()
}

/// Issue a session token: `<user_id>.<expires_at>.<hex hmac>`
pub fn issue_session_token(user_id: i64, expires_at: i64, secret: &str) -> Option<String> {
    let payload = format!("{}.{}", user_id, expires_at);
    let signature = sign(&payload, secret)?;
    Some(format!("{}.{}", payload, signature))
}

/// Validate a session token and return the user id it carries
///
/// Rejects malformed tokens, bad signatures and tokens expired at `now`
/// (Unix seconds).
pub fn verify_session_token(token: &str, secret: &str, now: i64) -> Option<i64> {
    let mut parts = token.splitn(3, '.');
    let user_id_part = parts.next()?;
    let expires_part = parts.next()?;
    let signature = parts.next()?;

    let user_id: i64 = user_id_part.parse().ok()?;
    let expires_at: i64 = expires_part.parse().ok()?;

    let payload = format!("{}.{}", user_id_part, expires_part);
    if !verify_hmac(&payload, signature, secret) {
        tracing::warn!("Session token with invalid signature");
        return None;
    }

    if now >= expires_at {
        tracing::debug!("Session token expired for user {}", user_id);
        return None;
    }

    Some(user_id)
}
