// src/dictionary/render.rs

use std::{fmt, io::Write};

use super::types::{DatabaseSchema, Field, View};

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Field: {}", self.name)?;
        writeln!(f, "    Entry: {}", self.entry)?;
        writeln!(f, "    Source: {}", self.source)?;
        writeln!(f, "    Type: {}", self.ty)?;
        writeln!(f, "    Usage: {}", self.usage)?;
        writeln!(f, "    Len: {}", self.len)?;
        writeln!(f, "    Occurs Min: {}", self.occ_min)?;
        writeln!(f, "    Occurs Max: {}", self.occ_max)?;
        writeln!(f, "    Is Virtual: {}", self.is_virtual)?;
        writeln!(f, "    Is Date: {}", self.is_date)?;
        writeln!(f, "    Index Type: {}", self.idx_type)
    }
}

/// Only the view's own attributes; fields are printed separately.
impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "View: {}", self.name)?;
        writeln!(f, "  Entry: {}", self.entry)?;
        writeln!(f, "  Source: {}", self.source)?;
        writeln!(f, "  Style: {}", self.style)?;
        writeln!(f, "  Unique Field: {}", self.unique_field)?;
        writeln!(f, "  Stream Field: {}", self.stream_field)?;
        writeln!(f, "  Number of Fields: {}", self.fields_count)
    }
}

/// A view followed by every one of its fields and a blank line.
pub fn write_view<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    write!(out, "{}", view)?;
    for field in view.fields.values() {
        write!(out, "{}", field)?;
    }
    writeln!(out)
}

/// A view header followed by a single field.
pub fn write_view_field<W: Write>(out: &mut W, view: &View, field: &Field) -> std::io::Result<()> {
    write!(out, "{}{}", view, field)
}

/// The dictionary header and every view with its fields.
pub fn write_all<W: Write>(out: &mut W, schema: &DatabaseSchema) -> std::io::Result<()> {
    writeln!(out, "Database: {}", schema.database)?;
    writeln!(out, "Model: {}", schema.model)?;
    writeln!(out, "File Created: {}", schema.file_created)?;
    writeln!(out, "Number of Views: {}\n", schema.views_count)?;
    for view in schema.views.values() {
        write_view(out, view)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DatabaseSchema {
        let field = |entry, name: &str| Field {
            entry,
            name: name.to_string(),
            ty: "A".into(),
            len: "10".into(),
            occ_min: 1,
            occ_max: 1,
            ..Field::default()
        };
        let view = View {
            entry: 1,
            name: "DEPT".into(),
            style: "flat".into(),
            fields_count: 2,
            fields: [("NAME".to_string(), field(2, "NAME")), ("CODE".to_string(), field(1, "CODE"))]
                .into_iter()
                .collect(),
            ..View::default()
        };
        DatabaseSchema {
            database: "TOUR".into(),
            model: "LCS".into(),
            file_created: "today".into(),
            views_count: 1,
            views: [("DEPT".to_string(), view)].into_iter().collect(),
        }
    }

    #[test]
    fn test_field_layout() {
        let schema = sample();
        let text = schema.views["DEPT"].fields["CODE"].to_string();
        assert!(text.starts_with("  Field: CODE\n    Entry: 1\n    Source: \n    Type: A\n"));
        assert!(text.ends_with("    Index Type: \n"));
    }

    #[test]
    fn test_write_all_is_ordered() -> anyhow::Result<()> {
        let schema = sample();
        let mut buf = Vec::new();
        write_all(&mut buf, &schema)?;
        let text = String::from_utf8(buf)?;

        assert!(text.starts_with("Database: TOUR\nModel: LCS\nFile Created: today\nNumber of Views: 1\n\nView: DEPT\n"));
        let code = text.find("Field: CODE").unwrap();
        let name = text.find("Field: NAME").unwrap();
        assert!(code < name);
        assert!(text.ends_with("Index Type: \n\n"));
        Ok(())
    }

    #[test]
    fn test_view_field_output() -> anyhow::Result<()> {
        let schema = sample();
        let view = &schema.views["DEPT"];
        let mut buf = Vec::new();
        write_view_field(&mut buf, view, &view.fields["NAME"])?;
        let text = String::from_utf8(buf)?;

        assert!(text.contains("  Number of Fields: 2\n  Field: NAME\n"));
        assert!(!text.contains("CODE"));
        Ok(())
    }
}
