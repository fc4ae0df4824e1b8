//! views_json_description.rs
//!
//! Describe the views and fields of a JSON dictionary export.
//!
//!   views_json_description dict.json              every view and field
//!   views_json_description dict.json VIEW         one view and its fields
//!   views_json_description dict.json VIEW FIELD   one field of one view

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use hvutools::{dictionary, logging};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "views_json_description")]
#[command(about = "Describe views and fields of a JSON dictionary")]
struct Args {
    /// Dictionary file
    file: PathBuf,
    /// View name (case-insensitive)
    view: Option<String>,
    /// Field name (case-insensitive), requires a view
    #[arg(requires = "view")]
    field: Option<String>,
}

fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();

    let schema = dictionary::DatabaseSchema::load(&args.file)
        .with_context(|| format!("loading dictionary {}", args.file.display()))?;

    let mut out = std::io::stdout().lock();
    match (args.view.as_deref(), args.field.as_deref()) {
        (Some(view), Some(field)) => {
            let (v, f) = schema.field(view, field)?;
            dictionary::write_view_field(&mut out, v, f)?;
        }
        (Some(view), None) => {
            let v = schema.view(view)?;
            dictionary::write_view(&mut out, v)?;
        }
        _ => dictionary::write_all(&mut out, &schema)?,
    }
    out.flush()?;

    info!("normal termination");
    Ok(())
}
