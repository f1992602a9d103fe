// ABOUTME: Shared helpers for the cli handlers
// ABOUTME: Session wiring and small text utilities

use llc_cli::Config;
use llc_client::{ApiClient, ClientConfig, SessionStore};
use llc_core::UserProfile;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Client and loaded session store, token not yet required.
pub async fn client_and_store(config: &Config) -> Result<(ApiClient, SessionStore), Box<dyn std::error::Error>> {
    let mut store = SessionStore::new()?;
    store.init().await?;
    let mut client = ApiClient::new(ClientConfig {
        api_url: config.api_url.clone(),
        backend_url: config.backend_url.clone(),
    })?;
    if let Some(session) = store.session() {
        client.set_access_token(session.token.clone());
    }
    Ok((client, store))
}

/// Client for commands that need a signed-in user, plus the profile.
pub async fn signed_in_client(
    config: &Config,
) -> Result<(ApiClient, SessionStore, UserProfile), Box<dyn std::error::Error>> {
    let (client, store) = client_and_store(config).await?;
    let user = store
        .user()
        .cloned()
        .ok_or("Not signed in. Run 'llc auth signin'")?;
    Ok((client, store, user))
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}\u{2026}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text_intact() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate("much too long for this", 8), "much to\u{2026}");
    }
}
