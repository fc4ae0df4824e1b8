// src/dictionary/store.rs

use std::{fs, path::Path};

use tracing::debug;

use super::types::{DatabaseSchema, Field, View};
use crate::error::{HvuError, Result};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

impl DatabaseSchema {
    /// Parse a dictionary held in memory. A leading UTF-8 BOM is skipped.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        Ok(serde_json::from_slice(data)?)
    }

    /// Read and parse a dictionary file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| HvuError::io(path, e))?;
        let schema = Self::from_slice(&data)?;
        debug!(
            path = %path.display(),
            views = schema.views.len(),
            "loaded dictionary"
        );
        Ok(schema)
    }

    /// Look up a view; the name is upper-cased first.
    pub fn view(&self, name: &str) -> Result<&View> {
        let key = name.to_uppercase();
        self.views.get(&key).ok_or(HvuError::ViewNotFound(key))
    }

    /// Look up `view.field`; both names are upper-cased first.
    pub fn field(&self, view: &str, field: &str) -> Result<(&View, &Field)> {
        let v = self.view(view)?;
        let key = field.to_uppercase();
        let f = v.fields.get(&key).ok_or_else(|| HvuError::FieldNotFound {
            view: view.to_uppercase(),
            field: key,
        })?;
        Ok((v, f))
    }
}
