//! Schema file (`.tab`) parsing

use std::collections::BTreeMap;
use tracing::debug;

use crate::buffer::{BufferArena, Cursor};
use crate::db::types::{DbString, FieldId, FieldType, TableId, NO_TABLE};
use crate::error::Result;

/// Table definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: DbString,
    /// Unknown 32-bit value following the name, passed through as-is
    pub reserved: u32,
}

impl Table {
    fn parse(arena: &BufferArena, cursor: &mut Cursor) -> Result<Self> {
        Ok(Table {
            id: cursor.read_i32(arena)?,
            name: cursor.read_string(arena)?,
            reserved: cursor.read_u32(arena)?,
        })
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Owning table, or [`NO_TABLE`] for a retired field
    pub table_id: TableId,
    pub id: FieldId,
    pub name: DbString,
    pub field_type: FieldType,
}

impl Field {
    fn parse(arena: &BufferArena, cursor: &mut Cursor) -> Result<Self> {
        Ok(Field {
            table_id: cursor.read_i32(arena)?,
            id: cursor.read_i32(arena)?,
            name: cursor.read_string(arena)?,
            field_type: FieldType::from(cursor.read_u8(arena)?),
        })
    }

    pub fn is_retired(&self) -> bool {
        self.table_id == NO_TABLE
    }
}

/// Tables and fields decoded from the schema file
///
/// Both maps are keyed by id; a duplicate id in the file replaces the
/// earlier definition. Fields may point at a table that does not exist.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: BTreeMap<TableId, Table>,
    fields: BTreeMap<FieldId, Field>,
    retired_fields: usize,
}

impl Schema {
    /// Parse a schema file from `cursor`
    ///
    /// Layout: table count (u32), field count (u32), tables, fields. A file
    /// that ends before all announced fields are present is accepted.
    pub fn parse(arena: &BufferArena, cursor: &mut Cursor) -> Result<Self> {
        let table_count = cursor.read_u32(arena)?;
        let field_count = cursor.read_u32(arena)?;

        let mut schema = Schema::default();

        for _ in 0..table_count {
            let table = Table::parse(arena, cursor)?;
            schema.tables.insert(table.id, table);
        }

        for n in 0..field_count {
            if cursor.at_end() {
                debug!(read = n, announced = field_count, "schema ends before last field");
                break;
            }
            let field = Field::parse(arena, cursor)?;
            if field.is_retired() {
                schema.retired_fields += 1;
                continue;
            }
            schema.fields.insert(field.id, field);
        }

        debug!(
            tables = schema.tables.len(),
            fields = schema.fields.len(),
            retired = schema.retired_fields,
            "schema loaded"
        );
        Ok(schema)
    }

    pub fn tables(&self) -> &BTreeMap<TableId, Table> {
        &self.tables
    }

    pub fn fields(&self) -> &BTreeMap<FieldId, Field> {
        &self.fields
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(&id)
    }

    /// Number of field definitions dropped because they carry [`NO_TABLE`]
    pub fn retired_fields(&self) -> usize {
        self.retired_fields
    }

    /// First table called `name`
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.values().find(|t| t.name == name)
    }

    /// Fields belonging to `table_id`, in field id order
    pub fn fields_of(&self, table_id: TableId) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(move |f| f.table_id == table_id)
    }

    /// Field called `name` within `table_id`
    pub fn field_by_name(&self, table_id: TableId, name: &str) -> Option<&Field> {
        self.fields_of(table_id).find(|f| f.name == name)
    }

    /// Fields whose table id does not resolve to a table
    pub fn orphan_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .values()
            .filter(|f| !self.tables.contains_key(&f.table_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::schema_bytes;
    use crate::error::Error;

    fn parse(bytes: Vec<u8>) -> Result<Schema> {
        let mut arena = BufferArena::new();
        let mut cursor = arena.insert(bytes);
        Schema::parse(&arena, &mut cursor)
    }

    #[test]
    fn test_parse_tables_and_fields() {
        let schema = parse(schema_bytes(
            &[(1, "ITEM"), (2, "INFORMATION")],
            &[(1, 10, "NAME", 0), (1, 11, "PRICE", 1), (2, 20, "WEIGHT", 2)],
        ))
        .unwrap();

        assert_eq!(schema.tables().len(), 2);
        assert_eq!(schema.table(2).unwrap().name, "INFORMATION");
        assert_eq!(schema.field(11).unwrap().field_type, FieldType::Integer);
        assert_eq!(schema.table_by_name("ITEM").unwrap().id, 1);
        assert_eq!(schema.field_by_name(2, "WEIGHT").unwrap().id, 20);
        assert!(schema.field_by_name(1, "WEIGHT").is_none());
        assert_eq!(schema.fields_of(1).count(), 2);
    }

    #[test]
    fn test_retired_field_is_dropped() {
        let mut bytes = schema_bytes(
            &[(1, "ITEM")],
            &[(NO_TABLE, 10, "OLD", 0), (1, 11, "NAME", 0)],
        );
        bytes.push(0xFF);
        let mut arena = BufferArena::new();
        let mut cursor = arena.insert(bytes);
        let schema = Schema::parse(&arena, &mut cursor).unwrap();

        assert!(schema.field(10).is_none());
        assert_eq!(schema.field(11).unwrap().name, "NAME");
        assert_eq!(schema.retired_fields(), 1);
        // both field records consumed, only the trailing byte is left
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let schema = parse(schema_bytes(
            &[(1, "FIRST"), (1, "SECOND")],
            &[(1, 5, "A", 0), (1, 5, "B", 1)],
        ))
        .unwrap();

        assert_eq!(schema.tables().len(), 1);
        assert_eq!(schema.table(1).unwrap().name, "SECOND");
        assert_eq!(schema.field(5).unwrap().name, "B");
    }

    #[test]
    fn test_orphan_field_is_kept() {
        let schema = parse(schema_bytes(&[(1, "ITEM")], &[(7, 70, "GHOST", 0)])).unwrap();
        assert!(schema.field(70).is_some());
        assert_eq!(schema.orphan_fields().count(), 1);
    }

    #[test]
    fn test_short_field_tail_stops_gracefully() {
        let mut bytes = schema_bytes(&[(1, "ITEM")], &[(1, 10, "NAME", 0)]);
        // announce three fields while only one is present
        bytes[4] = 3;
        let schema = parse(bytes).unwrap();
        assert_eq!(schema.fields().len(), 1);
    }

    #[test]
    fn test_truncated_table_is_out_of_range() {
        let mut bytes = schema_bytes(&[(1, "ITEM")], &[]);
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(parse(bytes), Err(Error::OutOfRange { .. })));
    }
}
