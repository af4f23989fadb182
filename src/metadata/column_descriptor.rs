use crate::parquet_bridge::PhysicalType;
use crate::schema::types::ParquetType;

/// A leaf column of the schema, together with the maximum definition and
/// repetition levels derived from its ancestry.
#[derive(Debug, PartialEq, Clone)]
pub struct ColumnDescriptor {
    primitive_type: ParquetType,
    max_def_level: i16,
    max_rep_level: i16,
    path_in_schema: Vec<String>,
}

impl ColumnDescriptor {
    pub fn new(
        primitive_type: ParquetType,
        max_def_level: i16,
        max_rep_level: i16,
        path_in_schema: Vec<String>,
    ) -> Self {
        Self {
            primitive_type,
            max_def_level,
            max_rep_level,
            path_in_schema,
        }
    }

    /// The maximum definition level of this column.
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// The maximum repetition level of this column.
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }

    /// The path of this column through the schema, root excluded.
    pub fn path_in_schema(&self) -> &[String] {
        &self.path_in_schema
    }

    /// The path joined with `.`, as used to address columns by name.
    pub fn name(&self) -> String {
        self.path_in_schema.join(".")
    }

    pub fn physical_type(&self) -> PhysicalType {
        match self.primitive_type {
            ParquetType::PrimitiveType { physical_type, .. } => physical_type,
            // the constructor only accepts primitive nodes
            ParquetType::GroupType { .. } => unreachable!(),
        }
    }

    pub fn type_(&self) -> &ParquetType {
        &self.primitive_type
    }
}
