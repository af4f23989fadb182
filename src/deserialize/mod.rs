mod page;
mod plain;

pub use page::{decode_data_page, decode_dict_page};

/// A single decoded value. Values are physical: converted types such as UTF8
/// or DECIMAL are reported through the schema, not applied here.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    /// A 96-bit value as three little-endian `u32` words, least significant
    /// first. Used by legacy writers for nanosecond timestamps.
    Int96([u32; 3]),
    Float(f32),
    Double(f64),
    /// Both BYTE_ARRAY and FIXED_LEN_BYTE_ARRAY values.
    ByteArray(Vec<u8>),
    /// The values of a repeated leaf within one row, in writer order. Only
    /// row iteration produces lists; page decoding yields flat values.
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}
