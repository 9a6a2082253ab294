//! Index file (`.ind`) parsing

use tracing::debug;

use crate::buffer::{BufferArena, Cursor};
use crate::db::types::{DbString, TableId};
use crate::error::Result;

/// One record's entry in the index file
///
/// Points at the record's field values in the data file. The table id is
/// not checked against the schema here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub table_id: TableId,
    pub name: DbString,
    /// Byte offset of the record in the data file
    pub offset: u32,
    /// Byte length of the record in the data file
    pub length: u32,
}

impl IndexEntry {
    fn parse(arena: &BufferArena, cursor: &mut Cursor) -> Result<Self> {
        Ok(IndexEntry {
            table_id: cursor.read_i32(arena)?,
            name: cursor.read_string(arena)?,
            offset: cursor.read_u32(arena)?,
            length: cursor.read_u32(arena)?,
        })
    }

    /// Offset one past the record's last byte in the data file
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }
}

/// All entries of an index file, in file order
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    entries: Vec<IndexEntry>,
}

impl RecordIndex {
    /// Parse an index file: entry count (u32) followed by the entries
    pub fn parse(arena: &BufferArena, cursor: &mut Cursor) -> Result<Self> {
        let count = cursor.read_u32(arena)?;
        let mut entries = Vec::with_capacity(count.min(1 << 16) as usize);
        for _ in 0..count {
            entries.push(IndexEntry::parse(arena, cursor)?);
        }
        debug!(entries = entries.len(), "index loaded");
        Ok(RecordIndex { entries })
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::index_bytes;
    use crate::error::Error;

    #[test]
    fn test_parse_entries() {
        let mut arena = BufferArena::new();
        let mut cursor = arena.insert(index_bytes(&[(1, "sword", 0, 12), (99, "ghost", 12, 4)]));
        let index = RecordIndex::parse(&arena, &mut cursor).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0].name, "sword");
        // unknown table ids are accepted at this stage
        assert_eq!(index.entries()[1].table_id, 99);
        assert_eq!(index.entries()[1].end(), 16);
        assert!(cursor.at_end());
    }

    #[test]
    fn test_truncated_entry_is_out_of_range() {
        let mut bytes = index_bytes(&[(1, "sword", 0, 12)]);
        bytes.truncate(bytes.len() - 1);
        let mut arena = BufferArena::new();
        let mut cursor = arena.insert(bytes);
        assert!(matches!(
            RecordIndex::parse(&arena, &mut cursor),
            Err(Error::OutOfRange { .. })
        ));
    }
}
