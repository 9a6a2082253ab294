//! A.I.M. database format parser
//!
//! A database is three files sharing a base name:
//!
//! - `.tab` schema: table and field definitions
//! - `.ind` index: one entry per record (table, name, byte range in `.dat`)
//! - `.dat` data: per-record sequences of `{field_id, size, payload}`
//!
//! ## Format Overview
//!
//! All integers are little-endian. Text is a u32 length followed by that
//! many bytes, NUL padded.
//!
//! ```text
//! .tab  tables: u32, fields: u32
//!       table  { id: i32, name: text, reserved: u32 } * tables
//!       field  { table_id: i32, id: i32, name: text, type: u8 } * fields
//! .ind  count: u32
//!       entry  { table_id: i32, name: text, offset: u32, length: u32 } * count
//! .dat  value  { field_id: u32, size: u32, payload: [u8; size] } * ...
//! ```
//!
//! Field type tags: 0 = string, 1 = integer, 2 = float. A field whose
//! table id is -1 is retired and ignored.
//!
//! ## Example
//!
//! ```rust,no_run
//! use aimdb::db::Database;
//!
//! let db = Database::open("data/quest")?;
//! let info = db.schema().table_by_name("INFORMATION").expect("no INFORMATION table");
//! let text = db.schema().field_by_name(info.id, "TEXT").expect("no TEXT field");
//! for record in db.records_of(info.id) {
//!     if let Some(s) = record.text(text.id) {
//!         println!("{} = {}", record.name(), s);
//!     }
//! }
//! # Ok::<(), aimdb::Error>(())
//! ```

mod database;
#[cfg(test)]
mod fixtures;
mod index;
mod options;
mod record;
mod schema;
mod types;
pub mod utils;

pub use database::{Database, DatabaseFiles, SourceFile};
pub use index::{IndexEntry, RecordIndex};
pub use options::{DecodeOptions, ScalarWidth};
pub use record::{DecodeStats, FieldValue, Record, RecordDecoder};
pub use schema::{Field, Schema, Table};
pub use types::*;
pub use utils::{
    list_fields, list_records, list_tables, open_with_progress, show_db_info, show_record,
};
