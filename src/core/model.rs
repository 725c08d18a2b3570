//! Form model
//!
//! The closed set of form identifiers, their static key/file tables, and the
//! load report produced by the one-time bulk load.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::FormDataError;

/// Built-in application identifier used when none (or an empty one) is set
pub const DEFAULT_APPLICATION_ID: &str = "default";

/// Known form templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormId {
    It201,
    It201v,
    It214,
    W2,
    DepExempt,
    Hmbr,
    Payment,
}

impl FormId {
    /// Every form, in load order
    pub const ALL: [FormId; 7] = [
        FormId::It201,
        FormId::It201v,
        FormId::It214,
        FormId::W2,
        FormId::DepExempt,
        FormId::Hmbr,
        FormId::Payment,
    ];

    /// Key the form's content is stored under in the cache
    pub fn resource_key(&self) -> &'static str {
        match self {
            FormId::It201 => "IT201",
            FormId::It201v => "IT201V",
            FormId::It214 => "IT214",
            FormId::W2 => "W2",
            FormId::DepExempt => "DEPEXEMPT",
            FormId::Hmbr => "HMBR",
            FormId::Payment => "PAYMENT",
        }
    }

    /// File name of the form template inside the application directory
    pub fn file_name(&self) -> &'static str {
        match self {
            FormId::It201 => "IT201.xml",
            FormId::It201v => "IT201V.xml",
            FormId::It214 => "IT214.xml",
            FormId::W2 => "W2.xml",
            FormId::DepExempt => "DEPEXEMPT.xml",
            FormId::Hmbr => "HMBR.xml",
            FormId::Payment => "Payment.xml",
        }
    }

    /// Reverse lookup from a resource key
    pub fn from_resource_key(key: &str) -> Option<FormId> {
        FormId::ALL.into_iter().find(|id| id.resource_key() == key)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource_key())
    }
}

impl FromStr for FormId {
    type Err = FormDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        FormId::from_resource_key(&upper).ok_or_else(|| FormDataError::UnknownForm(s.to_string()))
    }
}

/// Stable failure codes recorded in the load report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    PathUnresolved,
    FileNotFound,
    PermissionDenied,
    FileTooLarge,
    InvalidEncoding,
    ReadFailed,
}

impl FailureCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCode::PathUnresolved => "PATH_UNRESOLVED",
            FailureCode::FileNotFound => "FILE_NOT_FOUND",
            FailureCode::PermissionDenied => "PERMISSION_DENIED",
            FailureCode::FileTooLarge => "FILE_TOO_LARGE",
            FailureCode::InvalidEncoding => "INVALID_ENCODING",
            FailureCode::ReadFailed => "READ_FAILED",
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of loading a single form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoadStatus {
    Loaded {
        /// Length of the stored content in bytes
        bytes: usize,
        /// xxh3 hash of the stored content
        hash: String,
        /// Whether invalid UTF-8 had to be replaced
        #[serde(default)]
        lossy: bool,
    },
    Failed {
        code: FailureCode,
        message: String,
    },
}

impl LoadStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadStatus::Loaded { .. })
    }

    pub fn failure_code(&self) -> Option<FailureCode> {
        match self {
            LoadStatus::Loaded { .. } => None,
            LoadStatus::Failed { code, .. } => Some(*code),
        }
    }
}

/// One entry of the load report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLoad {
    pub form: FormId,

    /// Path the form was read from, if a base directory was resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(flatten)]
    pub status: LoadStatus,
}

/// Diagnostics for the one-time bulk load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    /// Application id actually used for path resolution
    pub application_id: String,

    /// Resolved base directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,

    /// Timestamp of the load (ms since epoch)
    pub loaded_at_ms: i64,

    /// Per-form outcomes, in load order
    pub forms: Vec<FormLoad>,
}

impl LoadReport {
    pub fn new(application_id: impl Into<String>, base_dir: Option<String>) -> Self {
        Self {
            application_id: application_id.into(),
            base_dir,
            loaded_at_ms: crate::core::util::now_ms(),
            forms: Vec::with_capacity(FormId::ALL.len()),
        }
    }

    pub fn push(&mut self, entry: FormLoad) {
        self.forms.push(entry);
    }

    /// Outcome for a given form
    pub fn status(&self, form: FormId) -> Option<&LoadStatus> {
        self.forms
            .iter()
            .find(|entry| entry.form == form)
            .map(|entry| &entry.status)
    }

    /// Entries that failed to load
    pub fn failures(&self) -> impl Iterator<Item = &FormLoad> {
        self.forms.iter().filter(|entry| !entry.status.is_loaded())
    }

    pub fn loaded_count(&self) -> usize {
        self.forms.iter().filter(|entry| entry.status.is_loaded()).count()
    }

    /// True when every known form loaded
    pub fn is_complete(&self) -> bool {
        self.loaded_count() == FormId::ALL.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
