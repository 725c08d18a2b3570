//! Cache store - The loaded set of form templates

use std::collections::HashMap;

use crate::config::FormCacheConfig;
use crate::context::PathResolver;
use crate::core::error::FormDataError;
use crate::core::file_reader::read_form_file;
use crate::core::model::{FailureCode, FormId, FormLoad, LoadReport, LoadStatus};
use crate::core::paths::{form_path, normalize_path};
use crate::core::util::hash_bytes;

/// Immutable mapping from resource key to template content
#[derive(Debug)]
pub struct FormDataCache {
    forms: HashMap<&'static str, String>,
    report: LoadReport,
}

impl FormDataCache {
    /// Resolve the application directory and read every known form.
    ///
    /// Never fails: each unreadable form is left out of the mapping and
    /// recorded in the load report.
    pub fn load(config: &FormCacheConfig, resolver: &dyn PathResolver) -> Self {
        let application_id = config.effective_application_id();
        tracing::debug!(application_id, "loading form data files");

        let Some(base_dir) = resolver.resolve_path(application_id) else {
            let err = FormDataError::PathUnresolved {
                application_id: application_id.to_string(),
            };
            tracing::warn!(application_id, "{}", err);

            let mut report = LoadReport::new(application_id, None);
            for form in FormId::ALL {
                report.push(FormLoad {
                    form,
                    path: None,
                    status: LoadStatus::Failed {
                        code: FailureCode::PathUnresolved,
                        message: err.to_string(),
                    },
                });
            }
            return Self {
                forms: HashMap::new(),
                report,
            };
        };

        let mut forms = HashMap::with_capacity(FormId::ALL.len());
        let mut report = LoadReport::new(application_id, Some(normalize_path(&base_dir)));

        for form in FormId::ALL {
            let path = form_path(&base_dir, form);
            tracing::debug!(form = %form, path = %path.display(), "reading form file");

            let status = match read_form_file(&path, &config.read) {
                Ok(content) => {
                    let status = LoadStatus::Loaded {
                        bytes: content.text.len(),
                        hash: hash_bytes(content.text.as_bytes()),
                        lossy: content.lossy,
                    };
                    forms.insert(form.resource_key(), content.text);
                    status
                }
                Err(err) => {
                    tracing::warn!(form = %form, "skipping form: {}", err);
                    LoadStatus::Failed {
                        code: err.failure_code().unwrap_or(FailureCode::ReadFailed),
                        message: err.to_string(),
                    }
                }
            };

            report.push(FormLoad {
                form,
                path: Some(normalize_path(&path)),
                status,
            });
        }

        tracing::debug!(
            application_id,
            loaded = report.loaded_count(),
            failed = report.failures().count(),
            "form data files loaded"
        );

        Self { forms, report }
    }

    /// Content of a form, or `""` if it was never loaded
    pub fn get_form_data(&self, form: FormId) -> &str {
        self.try_form_data(form).unwrap_or("")
    }

    /// Content of a form, `None` if it failed to load
    pub fn try_form_data(&self, form: FormId) -> Option<&str> {
        self.forms.get(form.resource_key()).map(String::as_str)
    }

    pub fn contains(&self, form: FormId) -> bool {
        self.forms.contains_key(form.resource_key())
    }

    /// Number of loaded forms
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Loaded forms in load order
    pub fn iter(&self) -> impl Iterator<Item = (FormId, &str)> {
        FormId::ALL
            .into_iter()
            .filter_map(|form| self.try_form_data(form).map(|data| (form, data)))
    }

    /// Diagnostics of the load that built this cache
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }
}
