mod chunk;
mod metadata;
mod row;

use std::io::{Read, Seek};

pub use chunk::read_column_chunk;
pub use metadata::read_metadata;
pub use row::RowIterator;

use crate::error::Result;
use crate::metadata::FileMetaData;

/// Returns an iterator of the file's rows, restricted to `columns` when
/// given (dot-joined leaf names, in the order rows should carry them).
pub fn rows<R: Read + Seek>(
    reader: R,
    metadata: FileMetaData,
    columns: Option<Vec<String>>,
) -> Result<RowIterator<R>> {
    RowIterator::new(reader, metadata, columns)
}
