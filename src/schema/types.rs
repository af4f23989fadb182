use crate::error::{Error, Result};
use crate::parquet_bridge::{ConvertedType, PhysicalType, Repetition};
use crate::thrift::format::SchemaElement;

/// A node of the schema tree. Leaves carry a physical type; groups carry
/// children. The root is a group without a repetition.
#[derive(Debug, Clone, PartialEq)]
pub enum ParquetType {
    PrimitiveType {
        name: String,
        physical_type: PhysicalType,
        repetition: Repetition,
        converted_type: Option<ConvertedType>,
    },
    GroupType {
        name: String,
        repetition: Option<Repetition>,
        converted_type: Option<ConvertedType>,
        fields: Vec<ParquetType>,
    },
}

impl ParquetType {
    pub fn name(&self) -> &str {
        match self {
            ParquetType::PrimitiveType { name, .. } => name,
            ParquetType::GroupType { name, .. } => name,
        }
    }

    pub fn repetition(&self) -> Option<Repetition> {
        match self {
            ParquetType::PrimitiveType { repetition, .. } => Some(*repetition),
            ParquetType::GroupType { repetition, .. } => *repetition,
        }
    }

    /// Rebuilds the schema tree from the flat depth-first element sequence
    /// stored in the footer. `elements[0]` is the root; children are
    /// consumed according to each element's declared child count.
    pub fn try_from_thrift(elements: &[SchemaElement]) -> Result<ParquetType> {
        if elements.is_empty() {
            return Err(Error::MalformedMetadata("empty schema".to_string()));
        }
        let mut index = 0;
        let mut nodes = Vec::new();
        while index < elements.len() {
            let (next_index, node) = from_thrift_helper(elements, index)?;
            index = next_index;
            nodes.push(node);
        }
        if nodes.len() != 1 {
            return Err(Error::MalformedMetadata(format!(
                "expected exactly one schema root, found {}",
                nodes.len()
            )));
        }
        Ok(nodes.remove(0))
    }
}

/// Constructs the node starting at `elements[index]`, returning the index of
/// the next sibling and the node itself.
fn from_thrift_helper(elements: &[SchemaElement], index: usize) -> Result<(usize, ParquetType)> {
    let is_root_node = index == 0;

    let element = &elements[index];
    let name = element.name.clone();
    let converted_type = element
        .converted_type
        .map(ConvertedType::try_from)
        .transpose()?;
    match element.num_children {
        // parquet-cpp sometimes writes 0 children on primitive elements
        None | Some(0) => {
            let repetition = element
                .repetition_type
                .ok_or_else(|| {
                    Error::MalformedMetadata(
                        "a primitive schema element requires a repetition".to_string(),
                    )
                })?
                .try_into()?;
            let type_ = element.type_.ok_or_else(|| {
                Error::MalformedMetadata(
                    "a primitive schema element requires a physical type".to_string(),
                )
            })?;
            let physical_type = PhysicalType::try_from_thrift(type_, element.type_length)?;

            Ok((
                index + 1,
                ParquetType::PrimitiveType {
                    name,
                    physical_type,
                    repetition,
                    converted_type,
                },
            ))
        }
        Some(n) => {
            let n: usize = n.try_into().map_err(|_| {
                Error::MalformedMetadata(format!("negative child count ({})", n))
            })?;
            let repetition = element
                .repetition_type
                .map(Repetition::try_from)
                .transpose()?;
            let mut fields = Vec::with_capacity(n);
            let mut next_index = index + 1;
            for _ in 0..n {
                if next_index >= elements.len() {
                    return Err(Error::MalformedMetadata(
                        "schema element declares more children than present".to_string(),
                    ));
                }
                let (index, field) = from_thrift_helper(elements, next_index)?;
                next_index = index;
                fields.push(field);
            }

            let repetition = if is_root_node { None } else { repetition };
            Ok((
                next_index,
                ParquetType::GroupType {
                    name,
                    repetition,
                    converted_type,
                    fields,
                },
            ))
        }
    }
}
