//! Path utilities

use std::path::{Path, PathBuf};

use crate::core::model::FormId;

/// Full path of a form template under the application directory
pub fn form_path(base_dir: &Path, form: FormId) -> PathBuf {
    base_dir.join(form.file_name())
}

/// Normalize a path to use '/' as separator (for stable report output)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Environment variable suffix for an application id: upper-cased,
/// non-alphanumerics replaced with '_'
pub fn env_key(application_id: &str) -> String {
    application_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
