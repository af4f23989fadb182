use std::io::{Read, Seek};

use log::debug;

use super::chunk::read_column_chunk;
use crate::deserialize::Value;
use crate::error::{Error, Result};
use crate::metadata::FileMetaData;

/// An iterator of rows, materialized row group by row group.
///
/// Each item is one row: the values of the selected columns in the order they
/// were selected. Row groups are read lazily, so the first row of a group
/// pays for reading the group's chunks.
pub struct RowIterator<R: Read + Seek> {
    reader: R,
    metadata: FileMetaData,
    columns: Vec<String>,
    row_group: usize,
    rows: std::vec::IntoIter<Vec<Value>>,
    failed: bool,
}

impl<R: Read + Seek> RowIterator<R> {
    /// Creates an iterator over `columns`, or over every column of the schema
    /// when `columns` is `None`.
    ///
    /// Every requested name must resolve to a leaf of the schema; an
    /// unresolvable name fails here with [`Error::UnknownColumn`], before any
    /// page is read.
    pub fn new(reader: R, metadata: FileMetaData, columns: Option<Vec<String>>) -> Result<Self> {
        let columns = match columns {
            Some(columns) => {
                for column in &columns {
                    metadata.schema().leaf_by_name(column)?;
                }
                columns
            }
            None => metadata.schema().column_names(),
        };
        Ok(Self {
            reader,
            metadata,
            columns,
            row_group: 0,
            rows: Vec::new().into_iter(),
            failed: false,
        })
    }

    /// The names of the columns each row holds, in row order.
    pub fn field_names(&self) -> &[String] {
        &self.columns
    }

    /// Reads the next row group and transposes its chunks into rows.
    fn load_row_group(&mut self) -> Result<Vec<Vec<Value>>> {
        let rg = &self.metadata.row_groups[self.row_group];
        let num_rows: usize = rg.num_rows().try_into().map_err(|_| {
            Error::MalformedMetadata(format!("row group declares {} rows", rg.num_rows()))
        })?;
        debug!(
            "reading row group {} ({} rows, {} columns)",
            self.row_group,
            num_rows,
            self.columns.len()
        );

        let mut columns = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            let chunk = rg
                .columns()
                .iter()
                .find(|chunk| &chunk.descriptor().name() == name)
                .ok_or_else(|| Error::UnknownColumn(name.clone()))?;
            let (values, rep_levels) = read_column_chunk(&mut self.reader, chunk)?;
            let values = if chunk.descriptor().max_rep_level() > 0 {
                group_repeated(name, values, &rep_levels, num_rows)?
            } else {
                if values.len() != num_rows {
                    return Err(Error::CorruptPage(format!(
                        "column \"{}\" holds {} values for a row group of {} rows",
                        name,
                        values.len(),
                        num_rows
                    )));
                }
                values
            };
            columns.push(values.into_iter());
        }

        let mut rows = Vec::with_capacity(num_rows);
        for _ in 0..num_rows {
            // every column was checked to hold exactly num_rows values
            rows.push(columns.iter_mut().map(|c| c.next().unwrap()).collect());
        }
        Ok(rows)
    }
}

/// Groups the flat values of a repeated leaf into one [`Value::List`] per
/// row. A repetition level of 0 starts a new row; a null placeholder marks a
/// row whose list is empty (or missing) and contributes no element.
fn group_repeated(
    name: &str,
    values: Vec<Value>,
    rep_levels: &[u32],
    num_rows: usize,
) -> Result<Vec<Value>> {
    if values.len() != rep_levels.len() {
        return Err(Error::CorruptPage(format!(
            "column \"{}\" holds {} values for {} repetition levels",
            name,
            values.len(),
            rep_levels.len()
        )));
    }
    let mut rows: Vec<Value> = Vec::with_capacity(num_rows);
    let mut current: Option<Vec<Value>> = None;
    for (value, rep) in values.into_iter().zip(rep_levels) {
        if *rep == 0 {
            if let Some(row) = current.take() {
                rows.push(Value::List(row));
            }
            current = Some(Vec::new());
        }
        let row = current.as_mut().ok_or_else(|| {
            Error::CorruptPage(format!(
                "column \"{}\" opens with a nonzero repetition level",
                name
            ))
        })?;
        if !value.is_null() {
            row.push(value);
        }
    }
    if let Some(row) = current.take() {
        rows.push(Value::List(row));
    }
    if rows.len() != num_rows {
        return Err(Error::CorruptPage(format!(
            "column \"{}\" holds {} rows for a row group of {} rows",
            name,
            rows.len(),
            num_rows
        )));
    }
    Ok(rows)
}

impl<R: Read + Seek> Iterator for RowIterator<R> {
    type Item = Result<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(row) = self.rows.next() {
                return Some(Ok(row));
            }
            if self.row_group == self.metadata.row_groups.len() {
                return None;
            }
            match self.load_row_group() {
                Ok(rows) => {
                    self.row_group += 1;
                    self.rows = rows.into_iter();
                }
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
    }
}
