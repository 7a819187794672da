//! Localized message lookup
//!
//! The facade never hard-codes user-facing phrases. It asks a [`Translator`]
//! for a template key such as `created.singular` and passes replacements
//! like `attribute => "User"`. Placeholders in templates are written
//! `:name`.
//!
//! [`MessageCatalog`] is the built-in translator. Its templates come from
//! [`MessageTemplates`], which is part of [`Config`](crate::config::Config)
//! so deployments can reword or translate every phrase.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Resolves a message key into display text
pub trait Translator: Send + Sync {
    /// Look up `key` and substitute every `:name` placeholder listed in
    /// `replacements`. Unknown keys are returned unchanged.
    fn translate(&self, key: &str, replacements: &[(&str, &str)]) -> String;
}

/// Singular and plural wording for one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Used when a single resource is concerned
    pub singular: String,
    /// Used when several resources are concerned
    pub plural: String,
}

impl Template {
    fn new(singular: &str, plural: &str) -> Self {
        Self {
            singular: singular.to_string(),
            plural: plural.to_string(),
        }
    }
}

/// Message templates used by the resource helpers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplates {
    /// Fallback attribute name when none is given
    #[serde(default = "default_attribute")]
    pub attribute: Template,

    /// Phrase for a created resource
    #[serde(default = "default_created")]
    pub created: Template,

    /// Phrase for an updated resource
    #[serde(default = "default_updated")]
    pub updated: Template,

    /// Phrase for a deleted resource
    #[serde(default = "default_deleted")]
    pub deleted: Template,

    /// Phrase for a resource that could not be found
    #[serde(default = "default_not_found")]
    pub not_found: Template,
}

fn default_attribute() -> Template {
    Template::new("Resource", "Resources")
}

fn default_created() -> Template {
    Template::new(":attribute created", ":attribute created")
}

fn default_updated() -> Template {
    Template::new(":attribute updated", ":attribute updated")
}

fn default_deleted() -> Template {
    Template::new(":attribute deleted", ":attribute deleted")
}

fn default_not_found() -> Template {
    Template::new(":attribute not found", ":attribute not found")
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            attribute: default_attribute(),
            created: default_created(),
            updated: default_updated(),
            deleted: default_deleted(),
            not_found: default_not_found(),
        }
    }
}

/// In-memory translator keyed by `"{message}.singular"` / `"{message}.plural"`
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    entries: HashMap<String, String>,
}

impl MessageCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from configured templates
    pub fn from_templates(templates: &MessageTemplates) -> Self {
        let mut catalog = Self::new();
        for (name, template) in [
            ("attribute", &templates.attribute),
            ("created", &templates.created),
            ("updated", &templates.updated),
            ("deleted", &templates.deleted),
            ("not_found", &templates.not_found),
        ] {
            catalog.insert(format!("{name}.singular"), template.singular.clone());
            catalog.insert(format!("{name}.plural"), template.plural.clone());
        }
        catalog
    }

    /// Add or replace a single entry
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Add or replace a single entry, builder style
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    /// Number of entries in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        let Some(template) = self.entries.get(key) else {
            tracing::debug!(key, "No message template found");
            return key.to_string();
        };

        // Longest names first so `:attribute` is not clobbered by `:attr`.
        let mut ordered = replacements.to_vec();
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        ordered
            .into_iter()
            .fold(template.clone(), |text, (name, value)| {
                text.replace(&format!(":{name}"), value)
            })
    }
}
