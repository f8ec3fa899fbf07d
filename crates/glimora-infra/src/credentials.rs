//! Environment variable credential lookup.
//!
//! API keys come from the environment only; there is no vault or
//! keychain. Each collaborator gets its own variable, and a missing key
//! degrades that collaborator instead of aborting startup (the turn
//! controller reports the failure per turn).

use secrecy::SecretString;

/// Environment variable holding the OpenRouter API key.
pub const MODEL_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Environment variable holding the Tavily API key.
pub const SEARCH_KEY_VAR: &str = "TAVILY_API_KEY";

/// Read an API key from the environment.
///
/// Blank values count as absent so an `export OPENROUTER_API_KEY=` line
/// in a shell profile does not masquerade as a configured key.
pub fn api_key_from_env(var: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val)),
        Ok(_) => None,
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(_)) => {
            // Env var exists but has invalid Unicode -- treat as not found
            // rather than erroring, since keys must be valid strings
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_reads_existing_key() {
        // SAFETY: This test runs serially and we clean up after.
        unsafe { std::env::set_var("GLIMORA_TEST_KEY_1", "sk-test-123") };

        let key = api_key_from_env("GLIMORA_TEST_KEY_1").unwrap();
        assert_eq!(key.expose_secret(), "sk-test-123");

        // SAFETY: This test runs serially and the var was just set above.
        unsafe { std::env::remove_var("GLIMORA_TEST_KEY_1") };
    }

    #[test]
    fn test_missing_key_is_none() {
        assert!(api_key_from_env("GLIMORA_NONEXISTENT_KEY_XYZ").is_none());
    }

    #[test]
    fn test_blank_key_is_none() {
        // SAFETY: This test runs serially and we clean up after.
        unsafe { std::env::set_var("GLIMORA_TEST_KEY_2", "   ") };

        assert!(api_key_from_env("GLIMORA_TEST_KEY_2").is_none());

        // SAFETY: This test runs serially and the var was just set above.
        unsafe { std::env::remove_var("GLIMORA_TEST_KEY_2") };
    }
}
