//! Reader for the thrift compact binary protocol, the encoding used by
//! Parquet footers and page headers.
//!
//! Only the decode direction is implemented. The reader advances the
//! underlying cursor and has no other side effects; any truncation or
//! unrecognized wire type surfaces as [`Error::MalformedMetadata`].
use std::io::Read;

use crate::error::{Error, Result};

/// Wire types of the compact protocol. Booleans carry their value in the
/// field header itself, hence the two variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    BooleanTrue,
    BooleanFalse,
    Byte,
    I16,
    I32,
    I64,
    Double,
    Binary,
    List,
    Set,
    Map,
    Struct,
}

impl FieldType {
    fn from_nibble(nibble: u8) -> Result<Self> {
        Ok(match nibble {
            1 => FieldType::BooleanTrue,
            2 => FieldType::BooleanFalse,
            3 => FieldType::Byte,
            4 => FieldType::I16,
            5 => FieldType::I32,
            6 => FieldType::I64,
            7 => FieldType::Double,
            8 => FieldType::Binary,
            9 => FieldType::List,
            10 => FieldType::Set,
            11 => FieldType::Map,
            12 => FieldType::Struct,
            _ => {
                return Err(Error::MalformedMetadata(format!(
                    "unrecognized compact wire type {}",
                    nibble
                )))
            }
        })
    }
}

/// Nested structs deeper than this are rejected while skipping unknown
/// fields, bounding recursion on adversarial input.
const MAX_SKIP_DEPTH: usize = 10;

/// Maximum bytes of a single varint (64 bits in groups of 7).
const MAX_VARINT_LEN: usize = 10;

/// A cursor decoding compact-protocol values from `reader`.
pub struct CompactReader<R: Read> {
    reader: R,
    last_field_id: i16,
    field_id_stack: Vec<i16>,
}

impl<R: Read> CompactReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            last_field_id: 0,
            field_id_stack: vec![],
        }
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.reader
            .read_exact(&mut buf)
            .map_err(|_| Error::MalformedMetadata("truncated compact input".to_string()))?;
        Ok(buf[0])
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        let mut shift = 0;
        for _ in 0..MAX_VARINT_LEN {
            let byte = self.read_byte()?;
            result |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        Err(Error::MalformedMetadata(
            "varint larger than 10 bytes".to_string(),
        ))
    }

    fn read_zigzag(&mut self) -> Result<i64> {
        let u = self.read_varint()?;
        Ok((u >> 1) as i64 ^ -((u & 1) as i64))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let value = self.read_zigzag()?;
        value
            .try_into()
            .map_err(|_| Error::MalformedMetadata(format!("i16 out of range ({})", value)))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let value = self.read_zigzag()?;
        value
            .try_into()
            .map_err(|_| Error::MalformedMetadata(format!("i32 out of range ({})", value)))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_zigzag()
    }

    pub fn read_binary(&mut self) -> Result<Vec<u8>> {
        let length = self.read_varint()? as usize;
        let mut buffer = vec![];
        buffer.try_reserve(length).map_err(|_| {
            Error::MalformedMetadata(format!("binary length {} exceeds memory", length))
        })?;
        (&mut self.reader)
            .take(length as u64)
            .read_to_end(&mut buffer)
            .map_err(|_| Error::MalformedMetadata("truncated compact input".to_string()))?;
        if buffer.len() != length {
            return Err(Error::MalformedMetadata(
                "truncated compact input".to_string(),
            ));
        }
        Ok(buffer)
    }

    pub fn read_string(&mut self) -> Result<String> {
        String::from_utf8(self.read_binary()?)
            .map_err(|_| Error::MalformedMetadata("string is not valid utf8".to_string()))
    }

    /// Marks the start of a nested struct, saving the field-id counter.
    pub fn read_struct_begin(&mut self) {
        self.field_id_stack.push(self.last_field_id);
        self.last_field_id = 0;
    }

    pub fn read_struct_end(&mut self) {
        self.last_field_id = self.field_id_stack.pop().unwrap_or(0);
    }

    /// Reads the next field header, or `None` at the stop marker.
    ///
    /// Field ids are delta-encoded in the header's upper nibble; a zero
    /// delta means the id follows as a zigzag varint.
    pub fn read_field_header(&mut self) -> Result<Option<(i16, FieldType)>> {
        let byte = self.read_byte()?;
        if byte == 0 {
            return Ok(None);
        }
        let delta = (byte & 0xf0) >> 4;
        let kind = FieldType::from_nibble(byte & 0x0f)?;
        let field_id = if delta == 0 {
            self.read_i16()?
        } else {
            self.last_field_id.checked_add(delta as i16).ok_or_else(|| {
                Error::MalformedMetadata("field id overflow".to_string())
            })?
        };
        self.last_field_id = field_id;
        Ok(Some((field_id, kind)))
    }

    /// Reads a list (or set) header: element type and declared size.
    pub fn read_list_header(&mut self) -> Result<(FieldType, usize)> {
        let byte = self.read_byte()?;
        let kind = FieldType::from_nibble(byte & 0x0f)?;
        let size = (byte >> 4) as usize;
        let size = if size == 15 {
            self.read_varint()? as usize
        } else {
            size
        };
        Ok((kind, size))
    }

    /// Skips over one value of the given wire type.
    pub fn skip(&mut self, kind: FieldType) -> Result<()> {
        self.skip_at_depth(kind, 0)
    }

    fn skip_bytes(&mut self, length: usize) -> Result<()> {
        let mut remaining = length as u64;
        let mut buf = [0u8; 256];
        while remaining > 0 {
            let chunk = remaining.min(buf.len() as u64) as usize;
            self.reader
                .read_exact(&mut buf[..chunk])
                .map_err(|_| Error::MalformedMetadata("truncated compact input".to_string()))?;
            remaining -= chunk as u64;
        }
        Ok(())
    }

    fn skip_at_depth(&mut self, kind: FieldType, depth: usize) -> Result<()> {
        if depth > MAX_SKIP_DEPTH {
            return Err(Error::MalformedMetadata(
                "compact structs nested too deeply".to_string(),
            ));
        }
        match kind {
            // the value lives in the field header
            FieldType::BooleanTrue | FieldType::BooleanFalse => Ok(()),
            FieldType::Byte => self.skip_bytes(1),
            FieldType::I16 | FieldType::I32 | FieldType::I64 => {
                self.read_varint().map(|_| ())
            }
            FieldType::Double => self.skip_bytes(8),
            FieldType::Binary => {
                let length = self.read_varint()? as usize;
                self.skip_bytes(length)
            }
            FieldType::List | FieldType::Set => {
                let (element, size) = self.read_list_header()?;
                for _ in 0..size {
                    // list elements of boolean type occupy one byte each
                    match element {
                        FieldType::BooleanTrue | FieldType::BooleanFalse => self.skip_bytes(1)?,
                        _ => self.skip_at_depth(element, depth + 1)?,
                    }
                }
                Ok(())
            }
            FieldType::Map => {
                let size = self.read_varint()? as usize;
                if size == 0 {
                    return Ok(());
                }
                let kinds = self.read_byte()?;
                let key = FieldType::from_nibble((kinds & 0xf0) >> 4)?;
                let value = FieldType::from_nibble(kinds & 0x0f)?;
                for _ in 0..size {
                    self.skip_at_depth(key, depth + 1)?;
                    self.skip_at_depth(value, depth + 1)?;
                }
                Ok(())
            }
            FieldType::Struct => {
                self.read_struct_begin();
                while let Some((_, kind)) = self.read_field_header()? {
                    self.skip_at_depth(kind, depth + 1)?;
                }
                self.read_struct_end();
                Ok(())
            }
        }
    }
}
