//! Process-wide form cache
//!
//! [`FormCacheCell`] runs the bulk load at most once, on first access, and
//! hands out shared handles to the result. The global instance is a
//! `FormCacheCell` whose configuration can be adjusted until that first
//! access.

use once_cell::sync::{Lazy, OnceCell};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::store::FormDataCache;
use crate::config::FormCacheConfig;
use crate::context::{EnvPathResolver, PathResolver};
use crate::core::error::FormDataError;

/// Load-once holder of a [`FormDataCache`]
pub struct FormCacheCell {
    settings: Mutex<Settings>,
    cache: OnceCell<Arc<FormDataCache>>,
    loads: AtomicUsize,
}

struct Settings {
    config: FormCacheConfig,
    resolver: Arc<dyn PathResolver>,
    /// Set once a load has taken its copy of the settings
    frozen: bool,
}

impl FormCacheCell {
    pub fn new(config: FormCacheConfig, resolver: Arc<dyn PathResolver>) -> Self {
        Self {
            settings: Mutex::new(Settings {
                config,
                resolver,
                frozen: false,
            }),
            cache: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// The loaded cache, loading it if this is the first access.
    ///
    /// Concurrent first callers block until the single load finishes.
    pub fn get(&self) -> Arc<FormDataCache> {
        self.cache
            .get_or_init(|| {
                let (config, resolver) = {
                    let mut settings = self.lock_settings();
                    settings.frozen = true;
                    (settings.config.clone(), Arc::clone(&settings.resolver))
                };
                self.loads.fetch_add(1, Ordering::SeqCst);
                Arc::new(FormDataCache::load(&config, resolver.as_ref()))
            })
            .clone()
    }

    /// The loaded cache without triggering a load
    pub fn get_if_loaded(&self) -> Option<Arc<FormDataCache>> {
        self.cache.get().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Number of times the bulk load ran (0 or 1)
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Replace the configuration used by the pending load.
    ///
    /// Fails once the load has started.
    pub fn configure(&self, config: FormCacheConfig) -> Result<(), FormDataError> {
        let mut settings = self.lock_settings();
        if settings.frozen {
            return Err(FormDataError::AlreadyInitialized);
        }
        settings.config = config;
        Ok(())
    }

    /// Replace the resolver used by the pending load
    pub fn set_path_resolver(&self, resolver: Arc<dyn PathResolver>) -> Result<(), FormDataError> {
        let mut settings = self.lock_settings();
        if settings.frozen {
            return Err(FormDataError::AlreadyInitialized);
        }
        settings.resolver = resolver;
        Ok(())
    }

    /// Overwrite the application id of the pending load.
    ///
    /// Returns `false` (and changes nothing) once the load has started.
    pub fn set_application_id(&self, application_id: impl Into<String>) -> bool {
        let application_id = application_id.into();
        let mut settings = self.lock_settings();
        if settings.frozen {
            tracing::warn!(
                application_id = %application_id,
                "form cache load already started, application id change ignored"
            );
            return false;
        }
        settings.config.application_id = application_id;
        true
    }

    /// Application id the pending (or completed) load uses
    pub fn application_id(&self) -> String {
        self.lock_settings()
            .config
            .effective_application_id()
            .to_string()
    }

    fn lock_settings(&self) -> MutexGuard<'_, Settings> {
        // Settings stay consistent even if a holder panicked
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

static GLOBAL: Lazy<FormCacheCell> = Lazy::new(|| {
    let config = FormCacheConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!("ignoring invalid form cache environment: {:#}", err);
        FormCacheConfig::default()
    });
    FormCacheCell::new(config, Arc::new(EnvPathResolver))
});

/// The process-wide form cache, loaded on first call
pub fn instance() -> Arc<FormDataCache> {
    GLOBAL.get()
}

/// The process-wide holder, for diagnostics
pub fn global() -> &'static FormCacheCell {
    &GLOBAL
}

/// Set the application id the process-wide cache loads from.
///
/// Only effective before the first [`instance`] call.
pub fn set_application_id(application_id: impl Into<String>) -> bool {
    GLOBAL.set_application_id(application_id)
}

/// Replace the whole configuration of the process-wide cache
pub fn configure(config: FormCacheConfig) -> Result<(), FormDataError> {
    GLOBAL.configure(config)
}

/// Replace the path resolver of the process-wide cache
pub fn set_path_resolver(resolver: Arc<dyn PathResolver>) -> Result<(), FormDataError> {
    GLOBAL.set_path_resolver(resolver)
}
