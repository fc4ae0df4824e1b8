// src/stream/convert.rs

use std::{
    collections::{BTreeMap, BTreeSet},
    io::Write,
};

use csv::{QuoteStyle, WriterBuilder};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use serde_json::{json, Map, Number, Value};
use tracing::{debug, warn};

use super::line::{parse_line, StreamLine};
use crate::error::{HvuError, Result};

/// Subfield values of a multi-valued field are joined with this in
/// delimited output.
const SUBFIELD_SEPARATOR: &str = ";";

/// One record of a stream dump with its field values in occurrence order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamRecord {
    pub name: String,
    pub fields: BTreeMap<String, Vec<Value>>,
}

impl StreamRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: BTreeMap::new(),
        }
    }

    fn push(&mut self, field: &str, raw: &str) {
        if let Some(v) = typed_value(raw) {
            self.fields.entry(field.to_string()).or_default().push(v);
        }
    }

    /// Fields as JSON: a single value stays scalar, several become an array.
    pub fn fields_json(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(k, values)| {
                let v = match values.as_slice() {
                    [single] => single.clone(),
                    many => Value::Array(many.to_vec()),
                };
                (k.clone(), v)
            })
            .collect()
    }

    fn cell(&self, field: &str) -> String {
        self.fields
            .get(field)
            .map(|values| {
                values
                    .iter()
                    .map(value_text)
                    .collect::<Vec<_>>()
                    .join(SUBFIELD_SEPARATOR)
            })
            .unwrap_or_default()
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Integer, then finite float, else string. Empty values yield nothing.
pub fn typed_value(raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Some(Value::Number(n));
    }
    Some(Value::String(raw.to_string()))
}

/// Group the lines of a dump into records.
///
/// A record starts at every `R` line. Text fields (`E`) collect the payload
/// of the `L`/`D` lines after them; lines with an unknown code continue the
/// open text since text may hold raw line breaks.
pub fn read_records(text: &str) -> Vec<StreamRecord> {
    let mut records: Vec<StreamRecord> = Vec::new();
    let mut current: Option<StreamRecord> = None;
    let mut open_text: Option<(String, String)> = None;

    fn close_text(current: &mut Option<StreamRecord>, open_text: &mut Option<(String, String)>) {
        if let (Some(rec), Some((field, value))) = (current.as_mut(), open_text.take()) {
            rec.push(&field, &value);
        }
    }

    for (idx, raw) in text.lines().enumerate() {
        match parse_line(raw) {
            StreamLine::Record { name } => {
                close_text(&mut current, &mut open_text);
                if let Some(done) = current.replace(StreamRecord::new(name)) {
                    records.push(done);
                }
            }
            StreamLine::Value { field, value } => {
                close_text(&mut current, &mut open_text);
                match current.as_mut() {
                    Some(rec) => rec.push(field.name, value),
                    None => warn!("value before any record at line {}", idx + 1),
                }
            }
            StreamLine::Text { field } => {
                close_text(&mut current, &mut open_text);
                open_text = Some((field.name.to_string(), String::new()));
            }
            StreamLine::TextLine(part) | StreamLine::DataLine(part) => {
                if let Some((_, value)) = open_text.as_mut() {
                    value.push_str(part);
                }
            }
            StreamLine::Short | StreamLine::Unknown(_) => {
                if let Some((_, value)) = open_text.as_mut() {
                    value.push_str(raw.trim_end());
                } else {
                    debug!("ignoring line {} outside any text field", idx + 1);
                }
            }
            StreamLine::Key(_) | StreamLine::Comment(_) => {}
        }
    }
    close_text(&mut current, &mut open_text);
    records.extend(current);
    records
}

/// `{"RECORDS": [{name: {fields}}...], "RECORDS_COUNT": n}`, pretty printed.
pub fn write_json<W: Write>(records: &[StreamRecord], out: W) -> Result<()> {
    let list: Vec<Value> = records
        .iter()
        .map(|r| {
            let mut obj = Map::new();
            obj.insert(r.name.clone(), Value::Object(r.fields_json()));
            Value::Object(obj)
        })
        .collect();
    let doc = json!({
        "RECORDS": list,
        "RECORDS_COUNT": records.len(),
    });
    serde_json::to_writer_pretty(out, &doc)?;
    Ok(())
}

fn xml_error(e: impl std::fmt::Display) -> HvuError {
    HvuError::Xml(e.to_string())
}

fn write_xml_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

/// Same layout as [`write_json`]: `<RECORDS>` holding one element per record,
/// followed by `<RECORDS_COUNT>`. A multi-valued field repeats its element.
pub fn write_xml<W: Write>(records: &[StreamRecord], out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("RECORDS")))
        .map_err(xml_error)?;
    for rec in records {
        writer
            .write_event(Event::Start(BytesStart::new(rec.name.as_str())))
            .map_err(xml_error)?;
        for (field, values) in &rec.fields {
            for v in values {
                write_xml_element(&mut writer, field, &value_text(v))?;
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(rec.name.as_str())))
            .map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("RECORDS")))
        .map_err(xml_error)?;
    write_xml_element(&mut writer, "RECORDS_COUNT", &records.len().to_string())?;
    Ok(())
}

/// One row per record under a header of every field name in the dump.
pub fn write_delimited<W: Write>(records: &[StreamRecord], out: W, delimiter: u8) -> Result<()> {
    let header: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.fields.keys().map(String::as_str))
        .collect();
    debug!("{} fields in header", header.len());

    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(out);
    wtr.write_record(&header)?;
    for rec in records {
        wtr.write_record(header.iter().map(|f| rec.cell(f)))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
R  EMPLOYEE                            <<< record # 1 >>>
K  0001
V  NAME(1)=SMITH
V  COMM(1)=400.50
V  COMM(2)=10
V  EMPTY(1)=
E  DISPLAY_TI(1)
L70La monnaie
D   et la suite
broken line
R  EMPLOYEE                            <<< record # 2 >>>
V  NAME(1)=JONES
";

    #[test]
    fn test_typed_values() {
        assert_eq!(typed_value(""), None);
        assert_eq!(typed_value("42"), Some(json!(42)));
        assert_eq!(typed_value("-1.5"), Some(json!(-1.5)));
        assert_eq!(typed_value("NaN"), Some(json!("NaN")));
        assert_eq!(typed_value("CHF 10"), Some(json!("CHF 10")));
    }

    #[test]
    fn test_read_records_groups_fields() {
        let records = read_records(DUMP);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.name, "EMPLOYEE");
        assert_eq!(first.fields["NAME"], vec![json!("SMITH")]);
        assert_eq!(first.fields["COMM"], vec![json!(400.5), json!(10)]);
        assert!(!first.fields.contains_key("EMPTY"));
        assert_eq!(
            first.fields["DISPLAY_TI"],
            vec![json!("La monnaie et la suitebroken line")]
        );

        assert_eq!(records[1].fields["NAME"], vec![json!("JONES")]);
    }

    #[test]
    fn test_json_output() -> anyhow::Result<()> {
        let records = read_records(DUMP);
        let mut buf = Vec::new();
        write_json(&records, &mut buf)?;
        let doc: Value = serde_json::from_slice(&buf)?;

        assert_eq!(doc["RECORDS_COUNT"], json!(2));
        assert_eq!(doc["RECORDS"][0]["EMPLOYEE"]["COMM"], json!([400.5, 10]));
        assert_eq!(doc["RECORDS"][0]["EMPLOYEE"]["NAME"], json!("SMITH"));
        assert_eq!(doc["RECORDS"][1]["EMPLOYEE"]["NAME"], json!("JONES"));
        Ok(())
    }

    #[test]
    fn test_xml_output() -> anyhow::Result<()> {
        let mut records = read_records(DUMP);
        records[1].push("NOTE", "a < b & c");
        let mut buf = Vec::new();
        write_xml(&records, &mut buf)?;
        let out = String::from_utf8(buf)?;

        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        let pos = |needle: &str| {
            out.find(needle)
                .unwrap_or_else(|| panic!("missing {needle} in {out}"))
        };
        assert!(pos("<COMM>400.5</COMM>") < pos("<COMM>10</COMM>"));
        assert!(pos("<NAME>SMITH</NAME>") < pos("<NAME>JONES</NAME>"));
        assert!(out.contains("<NOTE>a &lt; b &amp; c</NOTE>"));
        assert_eq!(out.matches("<EMPLOYEE>").count(), 2);
        assert!(pos("</RECORDS>") < pos("<RECORDS_COUNT>2</RECORDS_COUNT>"));
        Ok(())
    }

    #[test]
    fn test_delimited_output() -> anyhow::Result<()> {
        let records = read_records(DUMP);
        let mut buf = Vec::new();
        write_delimited(&records, &mut buf, b'#')?;
        let out = String::from_utf8(buf)?;

        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("COMM#DISPLAY_TI#NAME"));
        assert_eq!(
            lines.next(),
            Some("400.5;10#La monnaie et la suitebroken line#SMITH")
        );
        assert_eq!(lines.next(), Some("##JONES"));
        assert_eq!(lines.next(), None);
        Ok(())
    }
}
