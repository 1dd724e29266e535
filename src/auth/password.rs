use anyhow::Context;
use tracing::error;

/// bcrypt work factor.
pub const HASH_COST: u32 = 10;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    bcrypt::hash(plain, HASH_COST)
        .map_err(|e| {
            error!(error = %e, "bcrypt hash error");
            e
        })
        .context("hash password")
}

/// Returns `Ok(false)` on mismatch; errors only when `hash` is not a bcrypt digest.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash)
        .map_err(|e| {
            error!(error = %e, "bcrypt parse hash error");
            e
        })
        .context("verify password")
}
