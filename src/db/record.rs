//! Record decoding from the data file (`.dat`)
//!
//! Each index entry addresses a region of the data file. A region is a
//! sequence of `{field_id: u32, size: u32, payload: [u8; size]}` tuples;
//! the size is the only way to step over a value, so every payload is
//! consumed through its own sub-window whether or not it gets decoded.

use tracing::{debug, warn};

use crate::buffer::{BufferArena, Cursor};
use crate::db::index::IndexEntry;
use crate::db::options::{DecodeOptions, ScalarWidth};
use crate::db::schema::{Field, Schema};
use crate::db::types::{DbString, FieldId, FieldType, TableId, Value};
use crate::error::Result;

/// Size of the `{field_id, size}` header in front of each payload
const VALUE_HEADER_SIZE: usize = 8;

/// A decoded field value
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub field_id: FieldId,
    /// Declared payload size in the data file
    pub size: u32,
    pub value: Value,
}

/// An index entry together with its decoded field values
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entry: IndexEntry,
    pub values: Vec<FieldValue>,
}

impl Record {
    pub fn name(&self) -> &DbString {
        &self.entry.name
    }

    pub fn table_id(&self) -> TableId {
        self.entry.table_id
    }

    /// First value stored for `field_id`
    pub fn value(&self, field_id: FieldId) -> Option<&Value> {
        self.values
            .iter()
            .find(|v| v.field_id == field_id)
            .map(|v| &v.value)
    }

    pub fn text(&self, field_id: FieldId) -> Option<&DbString> {
        self.value(field_id).and_then(Value::as_text)
    }
}

/// Counters for input the decoder tolerated instead of failing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Field definitions dropped for carrying the "no table" id
    pub retired_fields: usize,
    /// Values whose field id is not in the schema
    pub orphan_values: usize,
    /// Integer/float values narrower than the configured width
    pub short_values: usize,
    /// Values of fields with an unrecognised type tag
    pub unknown_type_values: usize,
    /// Records whose region ended inside a value
    pub truncated_records: usize,
    /// Records whose table id is not in the schema
    pub unresolved_records: usize,
}

/// Decodes records out of the data file using a loaded schema
pub struct RecordDecoder<'a> {
    schema: &'a Schema,
    arena: &'a BufferArena,
    data: Cursor,
    options: DecodeOptions,
    stats: DecodeStats,
}

impl<'a> RecordDecoder<'a> {
    /// `data` is any cursor on the data file's store, normally its root
    pub fn new(
        schema: &'a Schema,
        arena: &'a BufferArena,
        data: Cursor,
        options: DecodeOptions,
    ) -> Self {
        RecordDecoder {
            schema,
            arena,
            data,
            options,
            stats: DecodeStats {
                retired_fields: schema.retired_fields(),
                ..DecodeStats::default()
            },
        }
    }

    /// Decode the field values of one index entry
    ///
    /// Fails only when the entry's region lies outside the data file.
    pub fn decode(&mut self, entry: IndexEntry) -> Result<Record> {
        let schema = self.schema;
        let mut region =
            self.data
                .sub_window_at(self.arena, entry.offset as usize, entry.length as usize)?;

        let mut values = Vec::new();
        while !region.at_end() {
            if region.remaining() < VALUE_HEADER_SIZE {
                self.truncated(&entry, region.remaining());
                break;
            }
            let field_id = region.read_i32(self.arena)?;
            let size = region.read_u32(self.arena)?;
            if size as usize > region.remaining() {
                self.truncated(&entry, region.remaining());
                break;
            }
            let mut payload = region.sub_window(size as usize)?;

            let Some(field) = schema.field(field_id) else {
                debug!(record = %entry.name, field_id, size, "discarding value of unknown field");
                self.stats.orphan_values += 1;
                continue;
            };

            if let Some(value) = self.decode_value(field, &mut payload)? {
                values.push(FieldValue {
                    field_id,
                    size,
                    value,
                });
            }
        }

        if schema.table(entry.table_id).is_none() {
            self.stats.unresolved_records += 1;
        }

        Ok(Record { entry, values })
    }

    /// Decode every entry in order
    pub fn decode_all<I>(&mut self, entries: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = IndexEntry>,
    {
        entries.into_iter().map(|e| self.decode(e)).collect()
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    fn decode_value(&mut self, field: &Field, payload: &mut Cursor) -> Result<Option<Value>> {
        let arena = self.arena;
        let size = payload.len();

        let value = match field.field_type {
            FieldType::String => {
                Value::Text(DbString::from_padded(payload.read_slice(arena, size)?))
            }
            FieldType::Integer => {
                let width = self.options.integer_width;
                if size < width.bytes() {
                    self.short_value(field, size, width);
                    return Ok(None);
                }
                Value::Integer(match width {
                    ScalarWidth::Four => payload.read_i32(arena)? as i64,
                    ScalarWidth::Eight => payload.read_i64(arena)?,
                })
            }
            FieldType::Float => {
                let width = self.options.float_width;
                if size < width.bytes() {
                    self.short_value(field, size, width);
                    return Ok(None);
                }
                Value::Float(match width {
                    ScalarWidth::Four => payload.read_f32(arena)? as f64,
                    ScalarWidth::Eight => payload.read_f64(arena)?,
                })
            }
            FieldType::Unknown(tag) => {
                warn!(field = %field.name, tag, size, "skipping value of unknown type");
                self.stats.unknown_type_values += 1;
                return Ok(None);
            }
        };
        Ok(Some(value))
    }

    fn short_value(&mut self, field: &Field, size: usize, width: ScalarWidth) {
        warn!(
            field = %field.name,
            field_type = %field.field_type,
            size,
            expected = width.bytes(),
            "value narrower than its type, skipped"
        );
        self.stats.short_values += 1;
    }

    fn truncated(&mut self, entry: &IndexEntry, left: usize) {
        warn!(record = %entry.name, left, "record region ends inside a value");
        self.stats.truncated_records += 1;
    }
}
