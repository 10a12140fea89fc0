use crate::error::AnalysisError;

pub const DEFAULT_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
pub const LEGACY_KEY_ENV_VAR: &str = "API_KEY";

/// Ordered API keys, tried in rotation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialPool {
    keys: Vec<String>,
}

impl CredentialPool {
    /// Split a comma-separated list, dropping blank entries.
    pub fn parse(raw: &str) -> Self {
        let keys = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

/// Where the credential pool comes from. Resolved again on every analysis.
#[derive(Clone, Debug)]
pub enum CredentialSource {
    Env(String),
    Inline(String),
}

impl Default for CredentialSource {
    fn default() -> Self {
        CredentialSource::Env(DEFAULT_KEY_ENV_VAR.to_string())
    }
}

impl CredentialSource {
    pub fn name(&self) -> String {
        match self {
            CredentialSource::Env(var) => format!("{} environment variable", var),
            CredentialSource::Inline(_) => "--api-keys".to_string(),
        }
    }

    pub fn resolve(&self) -> Result<CredentialPool, AnalysisError> {
        let raw = match self {
            CredentialSource::Env(var) => std::env::var(var)
                .or_else(|_| std::env::var(LEGACY_KEY_ENV_VAR))
                .unwrap_or_default(),
            CredentialSource::Inline(raw) => raw.clone(),
        };

        let pool = CredentialPool::parse(&raw);
        if pool.is_empty() {
            return Err(AnalysisError::Configuration {
                source_name: self.name(),
            });
        }
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_blank_entries_and_keeps_order() {
        let pool = CredentialPool::parse(" b-key , ,a-key,, c-key ");
        assert_eq!(pool.iter().collect::<Vec<_>>(), ["b-key", "a-key", "c-key"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let pool = CredentialPool::parse("k1,k1");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn inline_source_without_keys_is_a_configuration_error() {
        let err = CredentialSource::Inline(" , ".into()).resolve().unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration { .. }));
    }

    // Each test owns a distinct primary variable; only the fallback test touches API_KEY.
    fn set_env(var: &str, value: &str) {
        // SAFETY: no other test reads or writes these variables.
        unsafe { std::env::set_var(var, value) }
    }

    fn remove_env(var: &str) {
        // SAFETY: see set_env.
        unsafe { std::env::remove_var(var) }
    }

    #[test]
    fn env_source_reads_primary_variable() {
        set_env("DOOZE_TEST_KEYS_PRIMARY", "k1, k2");
        let pool = CredentialSource::Env("DOOZE_TEST_KEYS_PRIMARY".into())
            .resolve()
            .unwrap();
        remove_env("DOOZE_TEST_KEYS_PRIMARY");

        assert_eq!(pool.iter().collect::<Vec<_>>(), ["k1", "k2"]);
    }

    #[test]
    fn unset_primary_falls_back_to_legacy_variable() {
        remove_env("DOOZE_TEST_KEYS_UNSET");
        set_env(LEGACY_KEY_ENV_VAR, "legacy-key");
        let resolved = CredentialSource::Env("DOOZE_TEST_KEYS_UNSET".into()).resolve();
        remove_env(LEGACY_KEY_ENV_VAR);

        assert_eq!(resolved.unwrap().iter().collect::<Vec<_>>(), ["legacy-key"]);
    }

    #[test]
    fn empty_primary_is_a_configuration_error() {
        set_env("DOOZE_TEST_KEYS_EMPTY", "");
        let err = CredentialSource::Env("DOOZE_TEST_KEYS_EMPTY".into())
            .resolve()
            .unwrap_err();
        remove_env("DOOZE_TEST_KEYS_EMPTY");

        assert_eq!(
            err.to_string(),
            "No API key found: DOOZE_TEST_KEYS_EMPTY environment variable is empty or unset"
        );
    }
}
