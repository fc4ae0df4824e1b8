// src/dictionary/types.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One field of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub entry: i64,
    pub name: String,
    pub source: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub usage: String,
    pub len: String,
    #[serde(rename = "occMin")]
    pub occ_min: i64,
    #[serde(rename = "occMax")]
    pub occ_max: i64,
    #[serde(rename = "virtual")]
    pub is_virtual: String,
    #[serde(rename = "isDate")]
    pub is_date: String,
    #[serde(rename = "idxType")]
    pub idx_type: String,
}

/// A named record layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct View {
    pub entry: i64,
    pub name: String,
    pub source: String,
    pub style: String,
    #[serde(rename = "uniqueField")]
    pub unique_field: String,
    #[serde(rename = "streamField")]
    pub stream_field: String,
    #[serde(rename = "fields_ne")]
    pub fields_count: i64,
    pub fields: BTreeMap<String, Field>,
}

/// Top level of a dictionary export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSchema {
    pub database: String,
    pub model: String,
    #[serde(rename = "created")]
    pub file_created: String,
    #[serde(rename = "views_ne")]
    pub views_count: i64,
    pub views: BTreeMap<String, View>,
}
