//! Environment variable access.

use std::collections::HashMap;

/// Read-only view of environment variables.
pub trait Environment: Send + Sync {
    /// Get the value of a variable, or `None` if it is not set.
    fn get_var(&self, name: &str) -> Option<String>;
}

/// Process environment via [`std::env`].
pub struct NativeEnvironment;

impl Environment for NativeEnvironment {
    fn get_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed in-memory environment, handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    /// Empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn get_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_reads_path() {
        assert!(NativeEnvironment.get_var("PATH").is_some());
    }

    #[test]
    fn native_missing_var_is_none() {
        assert!(
            NativeEnvironment
                .get_var("SAKURA_DEFINITELY_NOT_SET_9876")
                .is_none()
        );
    }

    #[test]
    fn map_environment_lookup() {
        let env = MapEnvironment::new().with_var("SAKURA_CONFIG", "/etc/sakura.json");
        assert_eq!(
            env.get_var("SAKURA_CONFIG").as_deref(),
            Some("/etc/sakura.json")
        );
        assert!(env.get_var("HOME").is_none());
    }
}
