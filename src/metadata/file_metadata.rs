use super::row_metadata::RowGroupMetaData;
use super::schema_descriptor::SchemaDescriptor;
use crate::error::Result;
use crate::thrift::format;

pub use crate::thrift::format::KeyValue;

/// Metadata of a Parquet file, decoded from its footer.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaData {
    /// The format version declared by the writer.
    pub version: i32,
    /// The number of rows in the file, summed over all row groups.
    pub num_rows: i64,
    /// The writer's self-description, e.g. `parquet-mr version 1.8.0`.
    pub created_by: Option<String>,
    /// Application-defined key/value pairs.
    pub key_value_metadata: Option<Vec<KeyValue>>,
    /// The schema and its flattened leaves.
    pub schema_descr: SchemaDescriptor,
    /// The row groups, in file order.
    pub row_groups: Vec<RowGroupMetaData>,
}

impl FileMetaData {
    pub fn try_from_thrift(metadata: format::FileMetaData) -> Result<Self> {
        let schema_descr = SchemaDescriptor::try_from_thrift(&metadata.schema)?;
        let row_groups = metadata
            .row_groups
            .iter()
            .map(|rg| RowGroupMetaData::try_from_thrift(&schema_descr, rg))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            version: metadata.version,
            num_rows: metadata.num_rows,
            created_by: metadata.created_by,
            key_value_metadata: metadata.key_value_metadata,
            schema_descr,
            row_groups,
        })
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema_descr
    }
}
