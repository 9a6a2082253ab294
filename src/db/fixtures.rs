//! Byte-level builders for test databases

use byteorder::{LittleEndian, WriteBytesExt};

fn text(out: &mut Vec<u8>, s: &[u8]) {
    out.write_u32::<LittleEndian>(s.len() as u32).unwrap();
    out.extend_from_slice(s);
}

/// `.tab` bytes: tables are `(id, name)`, fields `(table_id, id, name, tag)`
pub(crate) fn schema_bytes(tables: &[(i32, &str)], fields: &[(i32, i32, &str, u8)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(tables.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(fields.len() as u32).unwrap();
    for (id, name) in tables {
        out.write_i32::<LittleEndian>(*id).unwrap();
        text(&mut out, name.as_bytes());
        out.write_u32::<LittleEndian>(0).unwrap();
    }
    for (table_id, id, name, tag) in fields {
        out.write_i32::<LittleEndian>(*table_id).unwrap();
        out.write_i32::<LittleEndian>(*id).unwrap();
        text(&mut out, name.as_bytes());
        out.write_u8(*tag).unwrap();
    }
    out
}

/// `.ind` bytes: entries are `(table_id, name, offset, length)`
pub(crate) fn index_bytes(entries: &[(i32, &str, u32, u32)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(entries.len() as u32).unwrap();
    for (table_id, name, offset, length) in entries {
        out.write_i32::<LittleEndian>(*table_id).unwrap();
        text(&mut out, name.as_bytes());
        out.write_u32::<LittleEndian>(*offset).unwrap();
        out.write_u32::<LittleEndian>(*length).unwrap();
    }
    out
}

/// Append one `{field_id, size, payload}` tuple to a `.dat` region
pub(crate) fn push_value(out: &mut Vec<u8>, field_id: u32, payload: &[u8]) {
    out.write_u32::<LittleEndian>(field_id).unwrap();
    out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
    out.extend_from_slice(payload);
}
