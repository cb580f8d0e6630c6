//! Curriculum data model.
//!
//! The corpus is supplied by an external loader and is read-only from the
//! resolver's point of view. Field names follow the JSON layout of the
//! curriculum data files (`keyTakeaways` is camel-cased on the wire).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tool tier: the daily-driver core stack or the specialised asset layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Core,
    Asset,
}

impl Tier {
    /// Lower-case identifier as it appears in the corpus.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Core => "core",
            Tier::Asset => "asset",
        }
    }

    /// Human-readable label used in tool results.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Core => "Core Stack",
            Tier::Asset => "Asset Layer",
        }
    }
}

/// An AI tool taught by the curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub tier: Tier,
}

/// A single lesson within a module. `id` looks like `"01.2"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// Markdown body.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Ids of the tools this section uses.
    #[serde(default)]
    pub tools: Vec<String>,
}

/// A curriculum module (also called a phase). `number` is two digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub number: String,
    pub title: String,
    pub subtitle: String,
    pub objective: String,
    pub duration: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_takeaways: Vec<String>,
}

/// The complete, immutable corpus the resolver searches over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub tools: Vec<Tool>,
}

impl Corpus {
    /// Parse a corpus from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse curriculum JSON")
    }

    /// Find a module by its two-digit number (e.g. `"01"`).
    pub fn module_by_number(&self, number: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.number == number)
    }

    /// Find a module by its id (e.g. `"module-01"`).
    pub fn module_by_id(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Find a section by exact id across all modules, with its parent module.
    pub fn section(&self, id: &str) -> Option<(&Module, &Section)> {
        self.modules
            .iter()
            .find_map(|m| m.sections.iter().find(|s| s.id == id).map(|s| (m, s)))
    }

    /// Find a tool by id.
    pub fn tool(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }

    /// All sections, across all modules, whose `tools` list includes `tool_id`.
    pub fn sections_using_tool<'a>(&'a self, tool_id: &'a str) -> impl Iterator<Item = &'a Section> {
        self.modules
            .iter()
            .flat_map(|m| m.sections.iter())
            .filter(move |s| s.tools.iter().any(|t| t == tool_id))
    }

    /// Every section in curriculum order, paired with its module.
    pub fn sections(&self) -> impl Iterator<Item = (&Module, &Section)> {
        self.modules
            .iter()
            .flat_map(|m| m.sections.iter().map(move |s| (m, s)))
    }

    pub fn section_count(&self) -> usize {
        self.modules.iter().map(|m| m.sections.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.tools.is_empty()
    }
}
