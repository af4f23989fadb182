use super::column_descriptor::ColumnDescriptor;
use crate::error::{Error, Result};
use crate::parquet_bridge::Repetition;
use crate::schema::types::ParquetType;
use crate::thrift::format::SchemaElement;

/// The schema of a file: the root group plus a flat view of its leaves, in
/// schema order, each with the levels needed to decode its pages.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    name: String,
    fields: Vec<ParquetType>,
    leaves: Vec<ColumnDescriptor>,
}

impl SchemaDescriptor {
    pub fn new(schema: ParquetType) -> Result<Self> {
        let (name, fields) = match schema {
            ParquetType::GroupType { name, fields, .. } => (name, fields),
            _ => {
                return Err(Error::MalformedMetadata(
                    "the schema root must be a group".to_string(),
                ))
            }
        };
        let mut leaves = Vec::new();
        for field in &fields {
            build_tree(field, 0, 0, &mut Vec::new(), &mut leaves);
        }
        Ok(Self {
            name,
            fields,
            leaves,
        })
    }

    pub fn try_from_thrift(elements: &[SchemaElement]) -> Result<Self> {
        Self::new(ParquetType::try_from_thrift(elements)?)
    }

    /// The name of the root group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The top-level fields of the schema.
    pub fn fields(&self) -> &[ParquetType] {
        &self.fields
    }

    /// The leaf columns, in schema order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.leaves
    }

    pub fn num_columns(&self) -> usize {
        self.leaves.len()
    }

    /// The dot-joined names of the leaf columns, in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.leaves.iter().map(|leaf| leaf.name()).collect()
    }

    /// Resolves a column by its path through the schema.
    pub fn leaf_by_path(&self, path: &[String]) -> Result<&ColumnDescriptor> {
        self.leaves
            .iter()
            .find(|leaf| leaf.path_in_schema() == path)
            .ok_or_else(|| Error::UnknownColumn(path.join(".")))
    }

    /// Resolves a column by its dot-joined name.
    pub fn leaf_by_name(&self, name: &str) -> Result<&ColumnDescriptor> {
        self.leaves
            .iter()
            .find(|leaf| leaf.name() == name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// Whether the column never holds nulls, i.e. every node on its path is
    /// required.
    pub fn is_required(&self, name: &str) -> Result<bool> {
        Ok(self.leaf_by_name(name)?.max_def_level() == 0)
    }
}

fn build_tree<'a>(
    node: &'a ParquetType,
    mut max_rep_level: i16,
    mut max_def_level: i16,
    path_so_far: &mut Vec<&'a str>,
    leaves: &mut Vec<ColumnDescriptor>,
) {
    path_so_far.push(node.name());
    match node.repetition() {
        Some(Repetition::Optional) => max_def_level += 1,
        Some(Repetition::Repeated) => {
            max_def_level += 1;
            max_rep_level += 1;
        }
        _ => {}
    }

    match node {
        ParquetType::PrimitiveType { .. } => {
            let path_in_schema = path_so_far.iter().map(|s| s.to_string()).collect();
            leaves.push(ColumnDescriptor::new(
                node.clone(),
                max_def_level,
                max_rep_level,
                path_in_schema,
            ));
        }
        ParquetType::GroupType { fields, .. } => {
            for field in fields {
                build_tree(field, max_rep_level, max_def_level, path_so_far, leaves);
            }
        }
    }
    path_so_far.pop();
}
