use super::column_chunk_metadata::ColumnChunkMetaData;
use super::schema_descriptor::SchemaDescriptor;
use crate::error::{Error, Result};
use crate::thrift::format::RowGroup;

/// Metadata of a row group: one column chunk per leaf column, in schema
/// order, plus the row count shared by all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroupMetaData {
    columns: Vec<ColumnChunkMetaData>,
    num_rows: i64,
    total_byte_size: i64,
}

impl RowGroupMetaData {
    pub fn try_from_thrift(schema_descr: &SchemaDescriptor, rg: &RowGroup) -> Result<Self> {
        let columns = rg
            .columns
            .iter()
            .map(|chunk| {
                let metadata = chunk.meta_data.as_ref().ok_or_else(|| {
                    Error::MalformedMetadata("column chunk is missing its metadata".to_string())
                })?;
                // a path that does not resolve to a leaf is a footer defect,
                // not a projection mistake
                let descriptor = schema_descr
                    .leaf_by_path(&metadata.path_in_schema)
                    .map_err(|_| {
                        Error::MalformedMetadata(format!(
                            "column chunk path \"{}\" is not a leaf of the schema",
                            metadata.path_in_schema.join(".")
                        ))
                    })?
                    .clone();
                ColumnChunkMetaData::try_from_thrift(descriptor, chunk)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            columns,
            num_rows: rg.num_rows,
            total_byte_size: rg.total_byte_size,
        })
    }

    /// The column chunks of this row group, in schema order.
    pub fn columns(&self) -> &[ColumnChunkMetaData] {
        &self.columns
    }

    /// The number of rows in this row group.
    pub fn num_rows(&self) -> i64 {
        self.num_rows
    }

    /// The total (compressed) size of this row group in bytes.
    pub fn total_byte_size(&self) -> i64 {
        self.total_byte_size
    }
}
