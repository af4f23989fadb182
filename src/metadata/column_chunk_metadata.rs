use super::column_descriptor::ColumnDescriptor;
use crate::error::{Error, Result};
use crate::parquet_bridge::{Compression, PhysicalType};
use crate::thrift::format::ColumnChunk;

/// Metadata of a column chunk: where its pages live in the file and how they
/// were encoded and compressed.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChunkMetaData {
    descriptor: ColumnDescriptor,
    compression: Compression,
    encodings: Vec<i32>,
    num_values: i64,
    total_uncompressed_size: i64,
    total_compressed_size: i64,
    data_page_offset: i64,
    dictionary_page_offset: Option<i64>,
}

impl ColumnChunkMetaData {
    pub fn try_from_thrift(descriptor: ColumnDescriptor, chunk: &ColumnChunk) -> Result<Self> {
        let metadata = chunk.meta_data.as_ref().ok_or_else(|| {
            Error::MalformedMetadata("column chunk is missing its metadata".to_string())
        })?;
        let compression = metadata.codec.try_into()?;
        if let Some(dictionary) = metadata.dictionary_page_offset {
            if dictionary > metadata.data_page_offset {
                return Err(Error::MalformedMetadata(format!(
                    "column chunk \"{}\" places its dictionary page after its data pages",
                    descriptor.name()
                )));
            }
        }
        if metadata.type_ != thrift_int(descriptor.physical_type()) {
            return Err(Error::MalformedMetadata(format!(
                "column chunk \"{}\" disagrees with the schema about its physical type",
                descriptor.name()
            )));
        }
        Ok(Self {
            descriptor,
            compression,
            encodings: metadata.encodings.clone(),
            num_values: metadata.num_values,
            total_uncompressed_size: metadata.total_uncompressed_size,
            total_compressed_size: metadata.total_compressed_size,
            data_page_offset: metadata.data_page_offset,
            dictionary_page_offset: metadata.dictionary_page_offset,
        })
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    pub fn physical_type(&self) -> PhysicalType {
        self.descriptor.physical_type()
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// The raw encoding integers declared by the writer. Unknown values are
    /// kept as-is; pages using them fail at decode time, not here.
    pub fn encodings(&self) -> &[i32] {
        &self.encodings
    }

    /// The number of values in this chunk, nulls included.
    pub fn num_values(&self) -> i64 {
        self.num_values
    }

    pub fn uncompressed_size(&self) -> i64 {
        self.total_uncompressed_size
    }

    pub fn compressed_size(&self) -> i64 {
        self.total_compressed_size
    }

    pub fn data_page_offset(&self) -> i64 {
        self.data_page_offset
    }

    pub fn dictionary_page_offset(&self) -> Option<i64> {
        self.dictionary_page_offset
    }

    /// The file offset of the chunk's first page. The dictionary page, when
    /// present, precedes the data pages.
    pub fn start_offset(&self) -> i64 {
        match self.dictionary_page_offset {
            Some(dictionary) if dictionary < self.data_page_offset => dictionary,
            _ => self.data_page_offset,
        }
    }
}

fn thrift_int(type_: PhysicalType) -> i32 {
    match type_ {
        PhysicalType::Boolean => 0,
        PhysicalType::Int32 => 1,
        PhysicalType::Int64 => 2,
        PhysicalType::Int96 => 3,
        PhysicalType::Float => 4,
        PhysicalType::Double => 5,
        PhysicalType::ByteArray => 6,
        PhysicalType::FixedLenByteArray(_) => 7,
    }
}
