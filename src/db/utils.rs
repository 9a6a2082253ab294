//! Database reporting functions
//!
//! This module contains the functions behind the command-line tool: loading
//! with a progress bar and printing tables, fields and records.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use super::{Database, DatabaseFiles, DecodeOptions, SourceFile, Table, Value};
use crate::utils::{create_glob_matcher, format_size, matches_filter};

/// Open a database, showing a progress bar while records are decoded
pub fn open_with_progress(base: &Path, options: &DecodeOptions) -> Result<Database> {
    println!("Loading database: {}", base.display());

    let files = DatabaseFiles::read(base)
        .with_context(|| format!("Failed to read database {}", base.display()))?;
    let schema = files.load_schema().context("Failed to parse schema file")?;
    let index = files.load_index().context("Failed to parse index file")?;

    let pb = ProgressBar::new(index.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let (records, stats) = {
        let mut decoder = files.decoder(&schema, *options);
        let mut records = Vec::with_capacity(index.len());
        for entry in index.into_entries() {
            let name = entry.name.to_string();
            let record = decoder
                .decode(entry)
                .with_context(|| format!("Failed to decode record {}", name))?;
            records.push(record);
            pb.inc(1);
        }
        (records, decoder.stats())
    };

    pb.finish_with_message("Done");

    Ok(Database::from_parts(files, schema, records, stats))
}

/// Display database summary
pub fn show_db_info(db: &Database) {
    let schema = db.schema();
    let stats = db.stats();

    println!("\nDatabase Info:");
    for kind in SourceFile::ALL {
        println!(
            "  .{} size: {}",
            kind.extension(),
            format_size(db.files().bytes(kind).len() as u64)
        );
    }
    println!("  Tables: {}", schema.tables().len());
    println!("  Fields: {}", schema.fields().len());
    println!("  Records: {}", db.len());

    println!("\nTolerated input:");
    println!("  Retired fields: {}", stats.retired_fields);
    println!("  Orphan fields: {}", schema.orphan_fields().count());
    println!("  Orphan values: {}", stats.orphan_values);
    println!("  Short values: {}", stats.short_values);
    println!("  Values of unknown type: {}", stats.unknown_type_values);
    println!("  Truncated records: {}", stats.truncated_records);
    println!("  Records without table: {}", stats.unresolved_records);
}

/// List all tables with their field and record counts
pub fn list_tables(db: &Database) {
    println!("{:>6} {:>7} {:>8}  NAME", "ID", "FIELDS", "RECORDS");
    for table in db.schema().tables().values() {
        println!(
            "{:>6} {:>7} {:>8}  {}",
            table.id,
            db.schema().fields_of(table.id).count(),
            db.records_of(table.id).count(),
            table.name
        );
    }
}

/// List fields, optionally only those of one table
pub fn list_fields(db: &Database, table: Option<&str>) -> Result<()> {
    let table_id = table.map(|name| find_table(db, name).map(|t| t.id)).transpose()?;

    println!("{:>6} {:>6} {:>8}  NAME", "ID", "TABLE", "TYPE");
    for field in db.schema().fields().values() {
        if table_id.is_some_and(|id| id != field.table_id) {
            continue;
        }
        println!(
            "{:>6} {:>6} {:>8}  {}",
            field.id,
            field.table_id,
            field.field_type.to_string(),
            field.name
        );
    }
    Ok(())
}

/// List records whose name matches `filter`, optionally within one table
pub fn list_records(db: &Database, filter: Option<&str>, table: Option<&str>) -> Result<()> {
    let matcher = filter.map(create_glob_matcher).transpose()?;
    let table_id = table.map(|name| find_table(db, name).map(|t| t.id)).transpose()?;

    let mut count = 0u64;
    for record in db.records() {
        if table_id.is_some_and(|id| id != record.table_id()) {
            continue;
        }
        if !matches_filter(&record.name().to_string_lossy(), matcher.as_ref()) {
            continue;
        }

        let table_name = db
            .table_of(record)
            .map(|t| t.name.to_string())
            .unwrap_or_else(|| format!("<table {}>", record.table_id()));
        println!(
            "{:<20} {:<32} {:>3} values",
            table_name,
            record.name(),
            record.values.len()
        );
        count += 1;
    }

    println!("\nTotal: {} records", count);
    Ok(())
}

/// Print every value of the record called `name`
pub fn show_record(db: &Database, name: &str) -> Result<()> {
    let Some(record) = db.record_by_name(name) else {
        bail!("Record not found: {}", name);
    };

    let table_name = db
        .table_of(record)
        .map(|t| t.name.to_string())
        .unwrap_or_else(|| "<unknown>".to_string());
    println!("{} (table {} {})", record.name(), record.table_id(), table_name);
    println!(
        "  data: offset {} length {}",
        record.entry.offset, record.entry.length
    );

    for fv in &record.values {
        let field_name = db
            .schema()
            .field(fv.field_id)
            .map(|f| f.name.to_string())
            .unwrap_or_default();
        let value = match &fv.value {
            Value::Text(s) => format!("{:?}", s),
            other => other.to_string(),
        };
        println!("  {:<24} = {}", field_name, value);
    }
    Ok(())
}

fn find_table<'a>(db: &'a Database, name: &str) -> Result<&'a Table> {
    db.schema()
        .table_by_name(name)
        .with_context(|| format!("Table not found: {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{index_bytes, push_value, schema_bytes};

    fn sample() -> Database {
        let mut data = Vec::new();
        push_value(&mut data, 10, b"Sword");
        let files = DatabaseFiles::from_bytes(
            schema_bytes(&[(1, "ITEM")], &[(1, 10, "NAME", 0)]),
            index_bytes(&[(1, "sword", 0, data.len() as u32)]),
            data,
        );
        Database::from_files(files, &DecodeOptions::default()).unwrap()
    }

    #[test]
    fn test_unknown_table_is_an_error() {
        let db = sample();
        assert!(list_fields(&db, Some("NOPE")).is_err());
        assert!(list_records(&db, None, Some("NOPE")).is_err());
        assert!(list_records(&db, Some("sw*"), Some("ITEM")).is_ok());
    }

    #[test]
    fn test_show_record() {
        let db = sample();
        assert!(show_record(&db, "sword").is_ok());
        assert!(show_record(&db, "shield").is_err());
    }
}
