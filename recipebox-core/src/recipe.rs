//! Recipe documents as stored and served
//!
//! Wire format keys are capitalized (`ID`, `Name`, `Time`, `Method`,
//! `Ingredients`). Drafts match keys case-insensitively on input, and when
//! a key appears twice under different casings the last one wins.

use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A stored recipe with its generated identifier
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "Name")]
    pub name: String,

    /// Preparation time, free text ("45 minutes", "1h")
    #[serde(rename = "Time")]
    pub time: String,

    #[serde(rename = "Method")]
    pub method: String,

    /// Ingredient lines in the order the author wrote them
    #[serde(rename = "Ingredients")]
    pub ingredients: Vec<String>,
}

/// Recipe fields as sent by clients on add and edit.
///
/// Any `ID` in the body is ignored; identifiers belong to the store.
/// Only JSON objects deserialize into a draft. Missing or `null` fields
/// stay empty and unknown keys are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecipeDraft {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Time")]
    pub time: String,

    #[serde(rename = "Method")]
    pub method: String,

    #[serde(rename = "Ingredients")]
    pub ingredients: Vec<String>,
}

enum DraftField {
    Name,
    Time,
    Method,
    Ingredients,
    Other,
}

impl DraftField {
    fn from_key(key: &str) -> Self {
        if key.eq_ignore_ascii_case("name") {
            Self::Name
        } else if key.eq_ignore_ascii_case("time") {
            Self::Time
        } else if key.eq_ignore_ascii_case("method") {
            Self::Method
        } else if key.eq_ignore_ascii_case("ingredients") {
            Self::Ingredients
        } else {
            Self::Other
        }
    }
}

struct DraftVisitor;

impl<'de> Visitor<'de> for DraftVisitor {
    type Value = RecipeDraft;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a recipe object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<RecipeDraft, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut draft = RecipeDraft::default();
        while let Some(key) = map.next_key::<String>()? {
            match DraftField::from_key(&key) {
                DraftField::Name => set(&mut draft.name, map.next_value()?),
                DraftField::Time => set(&mut draft.time, map.next_value()?),
                DraftField::Method => set(&mut draft.method, map.next_value()?),
                DraftField::Ingredients => set(&mut draft.ingredients, map.next_value()?),
                DraftField::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(draft)
    }
}

// null leaves the field as it was
fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

impl<'de> Deserialize<'de> for RecipeDraft {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DraftVisitor)
    }
}

impl Recipe {
    /// Attach an identifier to a draft.
    pub fn from_draft(id: impl Into<String>, draft: RecipeDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            time: draft.time,
            method: draft.method,
            ingredients: draft.ingredients,
        }
    }

    /// Drop the identifier, keeping the document fields.
    pub fn into_draft(self) -> RecipeDraft {
        RecipeDraft {
            name: self.name,
            time: self.time,
            method: self.method,
            ingredients: self.ingredients,
        }
    }
}
