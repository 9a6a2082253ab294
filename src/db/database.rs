//! Database aggregate tying the `.tab`, `.ind` and `.dat` files together

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::buffer::{BufferArena, Cursor};
use crate::db::index::RecordIndex;
use crate::db::options::DecodeOptions;
use crate::db::record::{DecodeStats, Record, RecordDecoder};
use crate::db::schema::{Schema, Table};
use crate::db::types::TableId;
use crate::error::{Error, Result};

/// The three files making up a database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFile {
    Schema,
    Index,
    Data,
}

impl SourceFile {
    pub const ALL: [SourceFile; 3] = [SourceFile::Schema, SourceFile::Index, SourceFile::Data];

    pub fn extension(self) -> &'static str {
        match self {
            SourceFile::Schema => "tab",
            SourceFile::Index => "ind",
            SourceFile::Data => "dat",
        }
    }

    /// Path of this file for a database base path such as `data/db`
    ///
    /// The extension is appended, so `data/quest.v2` maps to
    /// `data/quest.v2.tab` rather than replacing `.v2`.
    pub fn path_for(self, base: &Path) -> PathBuf {
        let mut path = OsString::from(base.as_os_str());
        path.push(".");
        path.push(self.extension());
        PathBuf::from(path)
    }
}

/// Raw contents of the three files, held in one arena
#[derive(Debug)]
pub struct DatabaseFiles {
    arena: BufferArena,
    schema: Cursor,
    index: Cursor,
    data: Cursor,
}

impl DatabaseFiles {
    /// Read all three files of the database at `base` into memory
    pub fn read<P: AsRef<Path>>(base: P) -> Result<Self> {
        let base = base.as_ref();
        let [schema, index, data] = SourceFile::ALL.map(|kind| {
            let path = kind.path_for(base);
            fs::read(&path).map_err(|e| Error::from_io(path, e))
        });
        Ok(Self::from_bytes(schema?, index?, data?))
    }

    pub fn from_bytes(schema: Vec<u8>, index: Vec<u8>, data: Vec<u8>) -> Self {
        let mut arena = BufferArena::new();
        let schema = arena.insert(schema);
        let index = arena.insert(index);
        let data = arena.insert(data);
        DatabaseFiles {
            arena,
            schema,
            index,
            data,
        }
    }

    pub fn load_schema(&self) -> Result<Schema> {
        let mut cursor = self.schema;
        Schema::parse(&self.arena, &mut cursor)
    }

    pub fn load_index(&self) -> Result<RecordIndex> {
        let mut cursor = self.index;
        RecordIndex::parse(&self.arena, &mut cursor)
    }

    /// Record decoder over the data file
    pub fn decoder<'a>(&'a self, schema: &'a Schema, options: DecodeOptions) -> RecordDecoder<'a> {
        RecordDecoder::new(schema, &self.arena, self.data, options)
    }

    /// Raw bytes of one of the files
    pub fn bytes(&self, kind: SourceFile) -> &[u8] {
        let cursor = match kind {
            SourceFile::Schema => &self.schema,
            SourceFile::Index => &self.index,
            SourceFile::Data => &self.data,
        };
        self.arena.bytes(cursor).unwrap_or_default()
    }
}

/// A fully decoded database
///
/// Loading is all-or-nothing: the schema is decoded first, then the index,
/// then every record's values against the complete schema.
///
/// ```rust,no_run
/// use aimdb::Database;
///
/// let db = Database::open("data/db")?;
/// for record in db.records() {
///     println!("{} ({} values)", record.name(), record.values.len());
/// }
/// # Ok::<(), aimdb::Error>(())
/// ```
#[derive(Debug)]
pub struct Database {
    files: DatabaseFiles,
    schema: Schema,
    records: Vec<Record>,
    stats: DecodeStats,
}

impl Database {
    /// Open the database at `base` (path without extension)
    pub fn open<P: AsRef<Path>>(base: P) -> Result<Self> {
        Self::open_with(base, &DecodeOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(base: P, options: &DecodeOptions) -> Result<Self> {
        let files = DatabaseFiles::read(base)?;
        Self::from_files(files, options)
    }

    /// Decode a database from files already in memory
    pub fn from_files(files: DatabaseFiles, options: &DecodeOptions) -> Result<Self> {
        let schema = files.load_schema()?;
        let index = files.load_index()?;

        let (records, stats) = {
            let mut decoder = files.decoder(&schema, *options);
            let records = decoder.decode_all(index.into_entries())?;
            (records, decoder.stats())
        };

        Ok(Self::from_parts(files, schema, records, stats))
    }

    /// Assemble a database from separately decoded pieces
    pub fn from_parts(
        files: DatabaseFiles,
        schema: Schema,
        records: Vec<Record>,
        stats: DecodeStats,
    ) -> Self {
        info!(
            tables = schema.tables().len(),
            fields = schema.fields().len(),
            records = records.len(),
            orphan_values = stats.orphan_values,
            unresolved_records = stats.unresolved_records,
            "database loaded"
        );
        Database {
            files,
            schema,
            records,
            stats,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    pub fn files(&self) -> &DatabaseFiles {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one table, in index order
    pub fn records_of(&self, table_id: TableId) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.table_id() == table_id)
    }

    /// First record called `name`
    pub fn record_by_name(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| *r.name() == name)
    }

    /// Table a record belongs to, if the schema knows it
    pub fn table_of(&self, record: &Record) -> Option<&Table> {
        self.schema.table(record.table_id())
    }

    /// Records whose table id is not in the schema
    pub fn unresolved_records(&self) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(|r| self.schema.table(r.table_id()).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{index_bytes, push_value, schema_bytes};
    use crate::db::types::Value;

    fn write_db(dir: &Path, schema: &[u8], index: &[u8], data: &[u8]) -> PathBuf {
        let base = dir.join("db");
        fs::write(SourceFile::Schema.path_for(&base), schema).unwrap();
        fs::write(SourceFile::Index.path_for(&base), index).unwrap();
        fs::write(SourceFile::Data.path_for(&base), data).unwrap();
        base
    }

    #[test]
    fn test_path_for_appends_extension() {
        assert_eq!(
            SourceFile::Schema.path_for(Path::new("data/quest.v2")),
            PathBuf::from("data/quest.v2.tab")
        );
        assert_eq!(
            SourceFile::Data.path_for(Path::new("db")),
            PathBuf::from("db.dat")
        );
    }

    #[test]
    fn test_open_single_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = Vec::new();
        push_value(&mut data, 10, b"Excalibr");
        let base = write_db(
            dir.path(),
            &schema_bytes(&[(1, "ITEM")], &[(1, 10, "NAME", 0)]),
            &index_bytes(&[(1, "sword", 0, 16)]),
            &data,
        );

        let db = Database::open(&base).unwrap();
        assert_eq!(db.len(), 1);
        let record = &db.records()[0];
        assert_eq!(*record.name(), "sword");
        assert_eq!(record.values.len(), 1);
        assert_eq!(record.values[0].field_id, 10);
        assert_eq!(record.text(10).unwrap(), "Excalibr");
        assert_eq!(db.table_of(record).unwrap().name, "ITEM");
        assert_eq!(db.files().bytes(SourceFile::Data), &data[..]);
    }

    #[test]
    fn test_padded_text_in_short_region() {
        // twelve byte region: header plus a four byte padded name
        let mut data = Vec::new();
        push_value(&mut data, 10, b"ax\0\0");
        let files = DatabaseFiles::from_bytes(
            schema_bytes(&[(1, "ITEM")], &[(1, 10, "NAME", 0)]),
            index_bytes(&[(1, "sword", 0, 12)]),
            data,
        );

        let db = Database::from_files(files, &DecodeOptions::default()).unwrap();
        assert_eq!(db.records()[0].text(10).unwrap(), "ax");
    }

    #[test]
    fn test_queries() {
        let mut data = Vec::new();
        push_value(&mut data, 10, b"Sword");
        push_value(&mut data, 11, &150i32.to_le_bytes());
        let first = data.len() as u32;
        push_value(&mut data, 20, b"Hello");

        let files = DatabaseFiles::from_bytes(
            schema_bytes(
                &[(1, "ITEM"), (2, "INFORMATION")],
                &[(1, 10, "NAME", 0), (1, 11, "PRICE", 1), (2, 20, "TEXT", 0)],
            ),
            index_bytes(&[
                (1, "sword", 0, first),
                (2, "greeting", first, 13),
                (3, "stray", first, 13),
            ]),
            data,
        );
        let db = Database::from_files(files, &DecodeOptions::default()).unwrap();

        let info = db.schema().table_by_name("INFORMATION").unwrap();
        assert_eq!(db.records_of(info.id).count(), 1);
        let sword = db.record_by_name("sword").unwrap();
        assert_eq!(sword.value(11), Some(&Value::Integer(150)));
        assert_eq!(db.unresolved_records().count(), 1);
        assert_eq!(db.stats().unresolved_records, 1);
        assert!(db.record_by_name("shield").is_none());
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("db");
        fs::write(SourceFile::Schema.path_for(&base), schema_bytes(&[], &[])).unwrap();
        fs::write(SourceFile::Index.path_for(&base), index_bytes(&[])).unwrap();

        match Database::open(&base) {
            Err(Error::FileNotFound(path)) => assert_eq!(path, SourceFile::Data.path_for(&base)),
            other => panic!("expected FileNotFound, got {:?}", other.map(|db| db.len())),
        }
    }

    #[test]
    fn test_truncated_index_aborts_load() {
        let mut index = index_bytes(&[(1, "sword", 0, 0)]);
        index.pop();
        let files = DatabaseFiles::from_bytes(schema_bytes(&[(1, "ITEM")], &[]), index, Vec::new());
        assert!(matches!(
            Database::from_files(files, &DecodeOptions::default()),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_empty_database() {
        let files = DatabaseFiles::from_bytes(schema_bytes(&[], &[]), index_bytes(&[]), Vec::new());
        let db = Database::from_files(files, &DecodeOptions::default()).unwrap();
        assert!(db.is_empty());
        assert!(db.schema().tables().is_empty());
    }
}
