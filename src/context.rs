//! Application context - Resolves an application id to its base directory
//!
//! Provides:
//! - The [`PathResolver`] seam consumed by the cache loader
//! - An in-memory/JSON application registry
//! - An environment-variable resolver (default for the global instance)

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::paths::env_key;

/// Fallback variable consulted when no per-application variable is set
pub const ENV_PATH_FALLBACK: &str = "FORMCACHE_PATH";

/// Prefix of per-application path variables (`FORMCACHE_PATH_<ID>`)
pub const ENV_PATH_PREFIX: &str = "FORMCACHE_PATH_";

/// Resolves the base directory for an application id
pub trait PathResolver: Send + Sync {
    fn resolve_path(&self, application_id: &str) -> Option<PathBuf>;
}

/// Adapter turning a closure into a resolver
pub struct FnResolver<F>(pub F);

impl<F> PathResolver for FnResolver<F>
where
    F: Fn(&str) -> Option<PathBuf> + Send + Sync,
{
    fn resolve_path(&self, application_id: &str) -> Option<PathBuf> {
        (self.0)(application_id)
    }
}

/// Registry of application ids and their directories
#[derive(Debug, Clone, Default)]
pub struct ApplicationContext {
    paths: BTreeMap<String, PathBuf>,
}

impl ApplicationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the directory of an application
    pub fn register(&mut self, application_id: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(application_id.into(), path.into());
    }

    pub fn with_application(
        mut self,
        application_id: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.register(application_id, path);
        self
    }

    /// Parse a JSON object of `{"<application id>": "<directory>"}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let paths: BTreeMap<String, PathBuf> =
            serde_json::from_str(json).context("Invalid application registry JSON")?;
        Ok(Self { paths })
    }

    /// Load a registry file. Relative directories are resolved against the
    /// registry file's own directory.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read application registry: {:?}", path))?;
        let mut context = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse application registry: {:?}", path))?;

        if let Some(parent) = path.parent() {
            for dir in context.paths.values_mut() {
                if dir.is_relative() {
                    *dir = parent.join(&*dir);
                }
            }
        }

        Ok(context)
    }

    pub fn application_ids(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }
}

impl PathResolver for ApplicationContext {
    fn resolve_path(&self, application_id: &str) -> Option<PathBuf> {
        self.paths.get(application_id).cloned()
    }
}

/// Resolves through `FORMCACHE_PATH_<ID>`, then `FORMCACHE_PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvPathResolver;

impl PathResolver for EnvPathResolver {
    fn resolve_path(&self, application_id: &str) -> Option<PathBuf> {
        let specific = format!("{}{}", ENV_PATH_PREFIX, env_key(application_id));
        let non_empty = |name: &str| std::env::var_os(name).filter(|value| !value.is_empty());
        non_empty(specific.as_str())
            .or_else(|| non_empty(ENV_PATH_FALLBACK))
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_registry_resolves_registered_ids() {
        let context = ApplicationContext::new()
            .with_application("payroll", "/srv/payroll/forms")
            .with_application("default", "/srv/forms");

        assert_eq!(
            context.resolve_path("payroll"),
            Some(PathBuf::from("/srv/payroll/forms"))
        );
        assert_eq!(context.resolve_path("unknown"), None);
        assert_eq!(
            context.application_ids().collect::<Vec<_>>(),
            vec!["default", "payroll"]
        );
    }

    #[test]
    fn test_registry_from_json_str() {
        let context = ApplicationContext::from_json_str(r#"{"tax": "/etc/forms"}"#).unwrap();
        assert_eq!(context.resolve_path("tax"), Some(PathBuf::from("/etc/forms")));
    }

    #[test]
    fn test_registry_from_invalid_json() {
        let err = ApplicationContext::from_json_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("Invalid application registry JSON"));
    }

    #[test]
    fn test_registry_from_json_file_relative_paths() {
        let temp = tempdir().unwrap();
        let registry = temp.path().join("apps.json");
        std::fs::write(&registry, r#"{"tax": "forms", "abs": "/opt/forms"}"#).unwrap();

        let context = ApplicationContext::from_json_file(&registry).unwrap();
        assert_eq!(context.resolve_path("tax"), Some(temp.path().join("forms")));
        assert_eq!(context.resolve_path("abs"), Some(PathBuf::from("/opt/forms")));
    }

    #[test]
    fn test_registry_from_missing_file() {
        let temp = tempdir().unwrap();
        let result = ApplicationContext::from_json_file(&temp.path().join("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_fn_resolver() {
        let resolver = FnResolver(|id: &str| (id == "a").then(|| PathBuf::from("/a")));
        assert_eq!(resolver.resolve_path("a"), Some(PathBuf::from("/a")));
        assert_eq!(resolver.resolve_path("b"), None);
    }

    #[test]
    fn test_env_resolver_specific_variable() {
        // Unique id so the variable cannot collide with other tests
        std::env::set_var("FORMCACHE_PATH_ENV_RESOLVER_TEST", "/env/forms");
        let resolved = EnvPathResolver.resolve_path("env-resolver-test");
        std::env::remove_var("FORMCACHE_PATH_ENV_RESOLVER_TEST");
        assert_eq!(resolved, Some(PathBuf::from("/env/forms")));
    }

    #[test]
    fn test_env_resolver_empty_specific_variable_is_unset() {
        std::env::set_var("FORMCACHE_PATH_ENV_EMPTY_TEST", "");
        std::env::set_var(ENV_PATH_FALLBACK, "/shared/forms");
        let resolved = EnvPathResolver.resolve_path("env-empty-test");
        std::env::remove_var("FORMCACHE_PATH_ENV_EMPTY_TEST");
        std::env::remove_var(ENV_PATH_FALLBACK);
        assert_eq!(resolved, Some(PathBuf::from("/shared/forms")));
    }
}
