//! Redb table definitions and key encoding utilities.
//!
//! Redb requires static table definitions, so every logical table shares
//! one physical table and is distinguished by a key prefix.

use redb::TableDefinition;

/// The physical table that stores all key-value pairs.
/// Logical table names are prefixed to keys.
pub const DATA_TABLE: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("slugdb_data");

/// Separator byte between table name and key in the encoded key.
pub const KEY_SEPARATOR: u8 = 0x00;

/// Encode a logical table name and key into a physical key.
///
/// The format is `<table_name><separator><key>`. Table names never contain
/// the separator, so keys of one table are contiguous and keep their order.
pub fn encode_key(table: &str, key: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(table.len() + 1 + key.len());
    encoded.extend_from_slice(table.as_bytes());
    encoded.push(KEY_SEPARATOR);
    encoded.extend_from_slice(key);
    encoded
}

/// Decode a physical key into its logical table name and original key.
///
/// Returns `None` if the key is malformed (missing separator).
pub fn decode_key(encoded: &[u8]) -> Option<(&str, &[u8])> {
    let sep_pos = encoded.iter().position(|&b| b == KEY_SEPARATOR)?;
    let table = std::str::from_utf8(&encoded[..sep_pos]).ok()?;
    Some((table, &encoded[sep_pos + 1..]))
}

/// The first physical key of a logical table.
pub fn table_start_key(table: &str) -> Vec<u8> {
    encode_key(table, &[])
}

/// The first physical key that does NOT belong to the table.
pub fn table_end_key(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(table.len() + 1);
    key.extend_from_slice(table.as_bytes());
    key.push(KEY_SEPARATOR + 1);
    key
}

/// Logical tables backing the `SlugDB` root document.
pub mod names {
    /// Primary table: `(pk, sk)` to item.
    pub const MAIN: &str = "main";

    /// Index schema registry: index name to schema.
    pub const INDEXES: &str = "indexes";

    /// Index entries: `(index name, partition value, sort value, pk, sk)` to item.
    pub const INDEX_DATA: &str = "index_data";
}
