//! # aimdb
//!
//! A Rust library for reading the binary databases of the game A.I.M.
//! (Abandoned Inhabited Moons).
//!
//! ## Overview
//!
//! A database is stored as three files sharing a base name: a `.tab` schema,
//! an `.ind` record index and a `.dat` data file. This library provides:
//!
//! - Windowed, bounds-checked byte cursors over shared buffers
//! - Schema, index and record decoding into a typed in-memory model
//! - Tolerant decoding of values for fields missing from the schema,
//!   values narrower than their type and retired field definitions
//! - Linear-scan lookups by table, field and record name
//!
//! ## Example
//!
//! ```rust,no_run
//! use aimdb::Database;
//!
//! fn main() -> anyhow::Result<()> {
//!     let db = Database::open("data/db")?;
//!
//!     for table in db.schema().tables().values() {
//!         println!("{}: {} records", table.name, db.records_of(table.id).count());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod db;
pub mod error;
pub mod utils;

pub use buffer::{BufferArena, Cursor};
pub use db::{
    Database, DatabaseFiles, DbString, DecodeOptions, Field, FieldType, FieldValue, Record,
    ScalarWidth, Schema, Table, Value,
};
pub use error::{Error, Result};
pub use utils::{create_glob_matcher, format_size, matches_filter};
