use anyhow::anyhow;
use rand::{distr::Alphanumeric, prelude::*};
use sha2::{Digest, Sha256};
use tower_sessions::Session;

use crate::web::CSRF_TOKEN;

fn gen_token(session_id: &str) -> String {
    let rng = rand::rng();
    let nonce: String = rng
        .sample_iter(&Alphanumeric)
        .take(42)
        .map(char::from)
        .collect();

    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(b":");
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}

/// Token for the forms of this session, created on first use
pub async fn gen_csrf(session: &Session) -> Result<String, anyhow::Error> {
    if let Some(session_token) = session.get::<String>(CSRF_TOKEN).await? {
        Ok(session_token)
    } else {
        let token = gen_token(&session.id().unwrap_or_default().to_string());
        session.insert(CSRF_TOKEN, &token).await?;
        Ok(token)
    }
}

pub async fn verify_csrf(csrf_token: &str, session: &Session) -> Result<(), anyhow::Error> {
    match session.get::<String>(CSRF_TOKEN).await? {
        Some(session_token) if !csrf_token.is_empty() && csrf_token == session_token => Ok(()),
        _ => Err(anyhow!("invalid csrf")),
    }
}
