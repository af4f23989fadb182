//! Prints a human-readable report of a file's metadata and page structure.
use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::{Error, Result};
use crate::metadata::{ColumnChunkMetaData, FileMetaData};
use crate::parquet_bridge::{Encoding, PageType, Repetition};
use crate::read::read_metadata;
use crate::schema::types::ParquetType;
use crate::thrift::compact::CompactReader;
use crate::thrift::format::PageHeader;

fn encoding_name(encoding: i32) -> String {
    Encoding::try_from(encoding)
        .map(|e| e.name().to_string())
        .unwrap_or_else(|_| format!("UNKNOWN({})", encoding))
}

fn repetition_name(repetition: Option<Repetition>) -> &'static str {
    match repetition {
        Some(Repetition::Required) => "REQUIRED",
        Some(Repetition::Optional) => "OPTIONAL",
        Some(Repetition::Repeated) => "REPEATED",
        None => "ROOT",
    }
}

fn dump_schema<W: Write>(out: &mut W, node: &ParquetType, depth: usize) -> Result<()> {
    let indent = "  ".repeat(depth + 1);
    match node {
        ParquetType::PrimitiveType {
            name,
            physical_type,
            repetition,
            converted_type,
        } => {
            write!(
                out,
                "{}{} {} {:?}",
                indent,
                repetition_name(Some(*repetition)),
                name,
                physical_type
            )?;
            if let Some(converted) = converted_type {
                write!(out, " ({:?})", converted)?;
            }
            writeln!(out)?;
        }
        ParquetType::GroupType {
            name,
            repetition,
            fields,
            ..
        } => {
            writeln!(out, "{}{} group {}", indent, repetition_name(*repetition), name)?;
            for field in fields {
                dump_schema(out, field, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn dump_pages<R: Read + Seek, W: Write>(
    reader: &mut R,
    out: &mut W,
    chunk: &ColumnChunkMetaData,
) -> Result<()> {
    reader.seek(SeekFrom::Start(chunk.start_offset() as u64))?;
    let mut values_seen = 0i64;
    while values_seen < chunk.num_values() {
        let header = {
            let mut thrift_reader = CompactReader::new(&mut *reader);
            PageHeader::read_from(&mut thrift_reader).map_err(|error| match error {
                Error::MalformedMetadata(message) => {
                    Error::CorruptPage(format!("could not decode a page header: {}", message))
                }
                error => error,
            })?
        };
        match PageType::try_from(header.type_) {
            Ok(PageType::DataPage) => {
                let data_header = header.data_page_header.as_ref();
                let num_values = data_header.map(|h| h.num_values).unwrap_or(0);
                let encoding = data_header
                    .map(|h| encoding_name(h.encoding))
                    .unwrap_or_else(|| "?".to_string());
                writeln!(
                    out,
                    "      data page: {} values, {} encoded, {} bytes ({} compressed)",
                    num_values,
                    encoding,
                    header.uncompressed_page_size,
                    header.compressed_page_size
                )?;
                values_seen += num_values as i64;
            }
            Ok(PageType::DictionaryPage) => {
                let num_values = header
                    .dictionary_page_header
                    .as_ref()
                    .map(|h| h.num_values)
                    .unwrap_or(0);
                writeln!(
                    out,
                    "      dictionary page: {} entries, {} bytes ({} compressed)",
                    num_values, header.uncompressed_page_size, header.compressed_page_size
                )?;
            }
            Ok(other) => {
                writeln!(out, "      {:?} page: skipped", other)?;
            }
            Err(_) => {
                writeln!(out, "      unknown page type ({}): skipped", header.type_)?;
            }
        }
        reader.seek(SeekFrom::Current(header.compressed_page_size as i64))?;
    }
    Ok(())
}

/// Writes a report of the file's metadata to `out`: schema, key/value
/// metadata, row groups, column chunks and the pages each chunk holds.
///
/// Page payloads are not decoded; the walk only reads page headers and seeks
/// past their bodies.
pub fn dump_metadata<R: Read + Seek, W: Write>(reader: &mut R, out: &mut W) -> Result<()> {
    let metadata = read_metadata(reader)?;
    dump(reader, out, &metadata)
}

fn dump<R: Read + Seek, W: Write>(
    reader: &mut R,
    out: &mut W,
    metadata: &FileMetaData,
) -> Result<()> {
    writeln!(out, "version: {}", metadata.version)?;
    writeln!(out, "num rows: {}", metadata.num_rows)?;
    if let Some(created_by) = &metadata.created_by {
        writeln!(out, "created by: {}", created_by)?;
    }
    if let Some(key_values) = &metadata.key_value_metadata {
        writeln!(out, "key/value metadata:")?;
        for kv in key_values {
            writeln!(out, "  {}: {}", kv.key, kv.value.as_deref().unwrap_or(""))?;
        }
    }

    writeln!(out, "schema: {}", metadata.schema().name())?;
    for field in metadata.schema().fields() {
        dump_schema(out, field, 0)?;
    }

    for (index, rg) in metadata.row_groups.iter().enumerate() {
        writeln!(
            out,
            "row group {}: {} rows, {} bytes",
            index,
            rg.num_rows(),
            rg.total_byte_size()
        )?;
        for chunk in rg.columns() {
            let encodings = chunk
                .encodings()
                .iter()
                .map(|e| encoding_name(*e))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                out,
                "    column {}: {:?}, {:?}, {} values, encodings [{}], {} bytes ({} compressed)",
                chunk.descriptor().name(),
                chunk.physical_type(),
                chunk.compression(),
                chunk.num_values(),
                encodings,
                chunk.uncompressed_size(),
                chunk.compressed_size()
            )?;
            dump_pages(reader, out, chunk)?;
        }
    }
    Ok(())
}
