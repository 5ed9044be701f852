use super::ui;
use crate::api::payload::NewUser;
use crate::api::{Backend, TokenFile};
use anyhow::{Context, Result};
use tracing::{error, info};

pub fn login(tokens: &TokenFile, token: &str) -> Result<()> {
    if token.trim().is_empty() {
        anyhow::bail!("Token must not be empty");
    }
    tokens.save(token)?;
    info!(path = %tokens.path().display(), "Logged in");
    println!("Logged in. Token stored at {}", tokens.path().display());
    Ok(())
}

pub fn logout(tokens: &TokenFile) -> Result<()> {
    if tokens.discard()? {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

/// Session-invalidated hook: forget the stored token and ask for a new login.
pub fn invalidate_session(tokens: &TokenFile) {
    if let Err(e) = tokens.discard() {
        error!(error = %e, "Could not remove session token");
    }
    eprintln!(
        "{}",
        ui::style_text(
            "Session expired or invalid. Run `kastoko login --token <TOKEN>` to sign in again.",
            ui::StyleType::Error,
        )
    );
}

pub async fn register(backend: &dyn Backend, user: &NewUser) -> Result<()> {
    user.validate()?;
    ui::with_spinner("Registering...", backend.register(user))
        .await
        .with_context(|| format!("Failed to register {}", user.email))?;
    info!(email = %user.email, "Registered");
    println!("Registered {}. Log in with the token issued for this account.", user.email);
    Ok(())
}
