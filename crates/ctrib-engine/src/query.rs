//! Product query: the matcher's input.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A product to classify.
///
/// Only `merchandise_code` is required. `description` is a fallback signal
/// — it never participates in candidate selection, only in the hints
/// produced when nothing matched. `context` supplies condition attributes
/// (scenario, operation indicator) that rules may require; `as_of` is the
/// reference date for rules carrying validity windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductQuery {
    /// The product's NCM/NBS code, raw form accepted.
    pub merchandise_code: String,

    /// Free-text product description, fallback signal only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Condition attributes available for rule filtering.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,

    /// Reference date for validity-window checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

impl ProductQuery {
    /// Create a query for a merchandise code.
    pub fn new(merchandise_code: impl Into<String>) -> Self {
        Self {
            merchandise_code: merchandise_code.into(),
            description: None,
            context: BTreeMap::new(),
            as_of: None,
        }
    }

    /// Attach a free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the condition context wholesale.
    pub fn with_context(mut self, context: BTreeMap<String, String>) -> Self {
        self.context = context;
        self
    }

    /// Add a single condition attribute.
    pub fn with_context_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Set the reference date for validity windows.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }
}
