//! formcache - A process-wide cache of XML form templates
//!
//! formcache provides:
//! - Load-once, thread-safe access to a fixed set of form templates
//! - Application directory resolution through a pluggable resolver
//! - A load report that tells missing forms apart from empty ones
//!
//! ```rust,no_run
//! use formcache::FormId;
//!
//! formcache::set_application_id("payroll");
//! let forms = formcache::instance();
//! let w2 = forms.get_form_data(FormId::W2);
//! ```

pub mod cache;
pub mod config;
pub mod context;
pub mod core;

pub use crate::cache::global::{
    configure, global, instance, set_application_id, set_path_resolver, FormCacheCell,
};
pub use crate::cache::store::FormDataCache;
pub use crate::config::FormCacheConfig;
pub use crate::context::{ApplicationContext, EnvPathResolver, FnResolver, PathResolver};
pub use crate::core::error::FormDataError;
pub use crate::core::file_reader::{EncodingStrategy, FileReadConfig};
pub use crate::core::model::{
    FailureCode, FormId, FormLoad, LoadReport, LoadStatus, DEFAULT_APPLICATION_ID,
};
