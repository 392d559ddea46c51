//! Built-in provider profiles: endpoints and credential headers

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Marker in header values replaced with the stored credential per request.
pub const API_KEY_PLACEHOLDER: &str = "{api_key}";

/// Endpoint and required headers for one direct provider.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub chat_url: String,
    /// Header values may contain `{api_key}`.
    pub headers: Vec<(String, String)>,
}

fn entry(chat_url: &str, headers: &[(&str, &str)]) -> ProviderProfile {
    ProviderProfile {
        chat_url: chat_url.to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
    }
}

static PROFILES: Lazy<HashMap<&'static str, ProviderProfile>> = Lazy::new(|| {
    HashMap::from([
        (
            "openai",
            entry(
                "https://api.openai.com/v1/chat/completions",
                &[("Authorization", "Bearer {api_key}")],
            ),
        ),
        (
            "anthropic",
            entry(
                "https://api.anthropic.com/v1/messages",
                &[
                    ("x-api-key", "{api_key}"),
                    ("anthropic-version", "2023-06-01"),
                ],
            ),
        ),
        (
            "google",
            entry(
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent",
                &[("x-goog-api-key", "{api_key}")],
            ),
        ),
    ])
});

/// Look up a built-in profile by provider name.
pub fn profile(name: &str) -> Option<&'static ProviderProfile> {
    PROFILES.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_providers_present() {
        for name in ["openai", "anthropic", "google"] {
            assert!(profile(name).is_some(), "missing profile for {name}");
        }
        assert!(profile("deepmind").is_none());
    }

    #[test]
    fn test_profiles_carry_credential_placeholder() {
        for name in ["openai", "anthropic", "google"] {
            let profile = profile(name).unwrap();
            assert!(
                profile
                    .headers
                    .iter()
                    .any(|(_, value)| value.contains(API_KEY_PLACEHOLDER)),
                "{name} profile has no credential header"
            );
        }
    }

    #[test]
    fn test_openai_uses_bearer_auth() {
        let profile = profile("openai").unwrap();
        let auth = profile
            .headers
            .iter()
            .find(|(name, _)| name == "Authorization")
            .unwrap();
        assert_eq!(auth.1, "Bearer {api_key}");
    }
}
