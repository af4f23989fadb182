//! Typed views of the compact-protocol structures Parquet stores on disk.
//!
//! Field ids and enum integers follow parquet.thrift. Enum-valued fields are
//! kept as raw `i32` here and bridged into Rust enums in
//! [`crate::parquet_bridge`]; unknown fields are skipped so that files
//! written by newer writers still decode.
use std::io::Read;

use super::compact::{CompactReader, FieldType};
use crate::error::{Error, Result};

fn missing(struct_: &str, field: &str) -> Error {
    Error::MalformedMetadata(format!("{} is missing required field {}", struct_, field))
}

fn read_list<R: Read, T>(
    reader: &mut CompactReader<R>,
    element_type: FieldType,
    mut element: impl FnMut(&mut CompactReader<R>) -> Result<T>,
) -> Result<Vec<T>> {
    let (kind, size) = reader.read_list_header()?;
    if kind != element_type {
        return Err(Error::MalformedMetadata(format!(
            "list of {:?} where a list of {:?} was expected",
            kind, element_type
        )));
    }
    let mut values = Vec::new();
    for _ in 0..size {
        values.push(element(reader)?);
    }
    Ok(values)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaData {
    pub version: i32,
    pub schema: Vec<SchemaElement>,
    pub num_rows: i64,
    pub row_groups: Vec<RowGroup>,
    pub key_value_metadata: Option<Vec<KeyValue>>,
    pub created_by: Option<String>,
}

impl FileMetaData {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut version = None;
        let mut schema = None;
        let mut num_rows = None;
        let mut row_groups = None;
        let mut key_value_metadata = None;
        let mut created_by = None;

        reader.read_struct_begin();
        while let Some((id, kind)) = reader.read_field_header()? {
            match (id, kind) {
                (1, FieldType::I32) => version = Some(reader.read_i32()?),
                (2, FieldType::List) => {
                    schema = Some(read_list(reader, FieldType::Struct, SchemaElement::read_from)?)
                }
                (3, FieldType::I64) => num_rows = Some(reader.read_i64()?),
                (4, FieldType::List) => {
                    row_groups = Some(read_list(reader, FieldType::Struct, RowGroup::read_from)?)
                }
                (5, FieldType::List) => {
                    key_value_metadata =
                        Some(read_list(reader, FieldType::Struct, KeyValue::read_from)?)
                }
                (6, FieldType::Binary) => created_by = Some(reader.read_string()?),
                (_, kind) => reader.skip(kind)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            version: version.ok_or_else(|| missing("FileMetaData", "version"))?,
            schema: schema.ok_or_else(|| missing("FileMetaData", "schema"))?,
            num_rows: num_rows.ok_or_else(|| missing("FileMetaData", "num_rows"))?,
            row_groups: row_groups.ok_or_else(|| missing("FileMetaData", "row_groups"))?,
            key_value_metadata,
            created_by,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaElement {
    pub type_: Option<i32>,
    pub type_length: Option<i32>,
    pub repetition_type: Option<i32>,
    pub name: String,
    pub num_children: Option<i32>,
    pub converted_type: Option<i32>,
}

impl SchemaElement {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut type_ = None;
        let mut type_length = None;
        let mut repetition_type = None;
        let mut name = None;
        let mut num_children = None;
        let mut converted_type = None;

        reader.read_struct_begin();
        while let Some((id, kind)) = reader.read_field_header()? {
            match (id, kind) {
                (1, FieldType::I32) => type_ = Some(reader.read_i32()?),
                (2, FieldType::I32) => type_length = Some(reader.read_i32()?),
                (3, FieldType::I32) => repetition_type = Some(reader.read_i32()?),
                (4, FieldType::Binary) => name = Some(reader.read_string()?),
                (5, FieldType::I32) => num_children = Some(reader.read_i32()?),
                (6, FieldType::I32) => converted_type = Some(reader.read_i32()?),
                (_, kind) => reader.skip(kind)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            type_,
            type_length,
            repetition_type,
            name: name.ok_or_else(|| missing("SchemaElement", "name"))?,
            num_children,
            converted_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    pub columns: Vec<ColumnChunk>,
    pub total_byte_size: i64,
    pub num_rows: i64,
}

impl RowGroup {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut columns = None;
        let mut total_byte_size = None;
        let mut num_rows = None;

        reader.read_struct_begin();
        while let Some((id, kind)) = reader.read_field_header()? {
            match (id, kind) {
                (1, FieldType::List) => {
                    columns = Some(read_list(reader, FieldType::Struct, ColumnChunk::read_from)?)
                }
                (2, FieldType::I64) => total_byte_size = Some(reader.read_i64()?),
                (3, FieldType::I64) => num_rows = Some(reader.read_i64()?),
                (_, kind) => reader.skip(kind)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            columns: columns.ok_or_else(|| missing("RowGroup", "columns"))?,
            total_byte_size: total_byte_size
                .ok_or_else(|| missing("RowGroup", "total_byte_size"))?,
            num_rows: num_rows.ok_or_else(|| missing("RowGroup", "num_rows"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChunk {
    pub file_path: Option<String>,
    pub file_offset: i64,
    pub meta_data: Option<ColumnMetaData>,
}

impl ColumnChunk {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut file_path = None;
        let mut file_offset = None;
        let mut meta_data = None;

        reader.read_struct_begin();
        while let Some((id, kind)) = reader.read_field_header()? {
            match (id, kind) {
                (1, FieldType::Binary) => file_path = Some(reader.read_string()?),
                (2, FieldType::I64) => file_offset = Some(reader.read_i64()?),
                (3, FieldType::Struct) => meta_data = Some(ColumnMetaData::read_from(reader)?),
                (_, kind) => reader.skip(kind)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            file_path,
            file_offset: file_offset.ok_or_else(|| missing("ColumnChunk", "file_offset"))?,
            meta_data,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetaData {
    pub type_: i32,
    pub encodings: Vec<i32>,
    pub path_in_schema: Vec<String>,
    pub codec: i32,
    pub num_values: i64,
    pub total_uncompressed_size: i64,
    pub total_compressed_size: i64,
    pub data_page_offset: i64,
    pub index_page_offset: Option<i64>,
    pub dictionary_page_offset: Option<i64>,
}

impl ColumnMetaData {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut type_ = None;
        let mut encodings = None;
        let mut path_in_schema = None;
        let mut codec = None;
        let mut num_values = None;
        let mut total_uncompressed_size = None;
        let mut total_compressed_size = None;
        let mut data_page_offset = None;
        let mut index_page_offset = None;
        let mut dictionary_page_offset = None;

        reader.read_struct_begin();
        while let Some((id, kind)) = reader.read_field_header()? {
            match (id, kind) {
                (1, FieldType::I32) => type_ = Some(reader.read_i32()?),
                (2, FieldType::List) => {
                    encodings = Some(read_list(reader, FieldType::I32, |r| r.read_i32())?)
                }
                (3, FieldType::List) => {
                    path_in_schema =
                        Some(read_list(reader, FieldType::Binary, |r| r.read_string())?)
                }
                (4, FieldType::I32) => codec = Some(reader.read_i32()?),
                (5, FieldType::I64) => num_values = Some(reader.read_i64()?),
                (6, FieldType::I64) => total_uncompressed_size = Some(reader.read_i64()?),
                (7, FieldType::I64) => total_compressed_size = Some(reader.read_i64()?),
                (9, FieldType::I64) => data_page_offset = Some(reader.read_i64()?),
                (10, FieldType::I64) => index_page_offset = Some(reader.read_i64()?),
                (11, FieldType::I64) => dictionary_page_offset = Some(reader.read_i64()?),
                (_, kind) => reader.skip(kind)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            type_: type_.ok_or_else(|| missing("ColumnMetaData", "type"))?,
            encodings: encodings.ok_or_else(|| missing("ColumnMetaData", "encodings"))?,
            path_in_schema: path_in_schema
                .ok_or_else(|| missing("ColumnMetaData", "path_in_schema"))?,
            codec: codec.ok_or_else(|| missing("ColumnMetaData", "codec"))?,
            num_values: num_values.ok_or_else(|| missing("ColumnMetaData", "num_values"))?,
            total_uncompressed_size: total_uncompressed_size
                .ok_or_else(|| missing("ColumnMetaData", "total_uncompressed_size"))?,
            total_compressed_size: total_compressed_size
                .ok_or_else(|| missing("ColumnMetaData", "total_compressed_size"))?,
            data_page_offset: data_page_offset
                .ok_or_else(|| missing("ColumnMetaData", "data_page_offset"))?,
            index_page_offset,
            dictionary_page_offset,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Option<String>,
}

impl KeyValue {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut key = None;
        let mut value = None;

        reader.read_struct_begin();
        while let Some((id, kind)) = reader.read_field_header()? {
            match (id, kind) {
                (1, FieldType::Binary) => key = Some(reader.read_string()?),
                (2, FieldType::Binary) => value = Some(reader.read_string()?),
                (_, kind) => reader.skip(kind)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            key: key.ok_or_else(|| missing("KeyValue", "key"))?,
            value,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageHeader {
    pub type_: i32,
    pub uncompressed_page_size: i32,
    pub compressed_page_size: i32,
    pub data_page_header: Option<DataPageHeader>,
    pub dictionary_page_header: Option<DictionaryPageHeader>,
}

impl PageHeader {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut type_ = None;
        let mut uncompressed_page_size = None;
        let mut compressed_page_size = None;
        let mut data_page_header = None;
        let mut dictionary_page_header = None;

        reader.read_struct_begin();
        while let Some((id, kind)) = reader.read_field_header()? {
            match (id, kind) {
                (1, FieldType::I32) => type_ = Some(reader.read_i32()?),
                (2, FieldType::I32) => uncompressed_page_size = Some(reader.read_i32()?),
                (3, FieldType::I32) => compressed_page_size = Some(reader.read_i32()?),
                (5, FieldType::Struct) => {
                    data_page_header = Some(DataPageHeader::read_from(reader)?)
                }
                (7, FieldType::Struct) => {
                    dictionary_page_header = Some(DictionaryPageHeader::read_from(reader)?)
                }
                (_, kind) => reader.skip(kind)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            type_: type_.ok_or_else(|| missing("PageHeader", "type"))?,
            uncompressed_page_size: uncompressed_page_size
                .ok_or_else(|| missing("PageHeader", "uncompressed_page_size"))?,
            compressed_page_size: compressed_page_size
                .ok_or_else(|| missing("PageHeader", "compressed_page_size"))?,
            data_page_header,
            dictionary_page_header,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataPageHeader {
    pub num_values: i32,
    pub encoding: i32,
    pub definition_level_encoding: i32,
    pub repetition_level_encoding: i32,
}

impl DataPageHeader {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut num_values = None;
        let mut encoding = None;
        let mut definition_level_encoding = None;
        let mut repetition_level_encoding = None;

        reader.read_struct_begin();
        while let Some((id, kind)) = reader.read_field_header()? {
            match (id, kind) {
                (1, FieldType::I32) => num_values = Some(reader.read_i32()?),
                (2, FieldType::I32) => encoding = Some(reader.read_i32()?),
                (3, FieldType::I32) => definition_level_encoding = Some(reader.read_i32()?),
                (4, FieldType::I32) => repetition_level_encoding = Some(reader.read_i32()?),
                (_, kind) => reader.skip(kind)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            num_values: num_values.ok_or_else(|| missing("DataPageHeader", "num_values"))?,
            encoding: encoding.ok_or_else(|| missing("DataPageHeader", "encoding"))?,
            definition_level_encoding: definition_level_encoding
                .ok_or_else(|| missing("DataPageHeader", "definition_level_encoding"))?,
            repetition_level_encoding: repetition_level_encoding
                .ok_or_else(|| missing("DataPageHeader", "repetition_level_encoding"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryPageHeader {
    pub num_values: i32,
    pub encoding: i32,
    pub is_sorted: Option<bool>,
}

impl DictionaryPageHeader {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut num_values = None;
        let mut encoding = None;
        let mut is_sorted = None;

        reader.read_struct_begin();
        while let Some((id, kind)) = reader.read_field_header()? {
            match (id, kind) {
                (1, FieldType::I32) => num_values = Some(reader.read_i32()?),
                (2, FieldType::I32) => encoding = Some(reader.read_i32()?),
                (3, FieldType::BooleanTrue) => is_sorted = Some(true),
                (3, FieldType::BooleanFalse) => is_sorted = Some(false),
                (_, kind) => reader.skip(kind)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            num_values: num_values
                .ok_or_else(|| missing("DictionaryPageHeader", "num_values"))?,
            encoding: encoding.ok_or_else(|| missing("DictionaryPageHeader", "encoding"))?,
            is_sorted,
        })
    }
}
