use std::io::{Read, Seek, SeekFrom};

use log::{debug, warn};

use crate::compression::decompress;
use crate::deserialize::{decode_data_page, decode_dict_page, Value};
use crate::error::{Error, Result};
use crate::metadata::ColumnChunkMetaData;
use crate::parquet_bridge::PageType;
use crate::thrift::compact::CompactReader;
use crate::thrift::format::PageHeader;

fn read_payload<R: Read>(reader: &mut R, header: &PageHeader) -> Result<Vec<u8>> {
    let compressed_size: usize = header.compressed_page_size.try_into().map_err(|_| {
        Error::CorruptPage(format!(
            "page declares a compressed size of {} bytes",
            header.compressed_page_size
        ))
    })?;
    let mut payload = vec![0u8; compressed_size];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

fn decompress_payload(
    chunk: &ColumnChunkMetaData,
    header: &PageHeader,
    payload: &[u8],
) -> Result<Vec<u8>> {
    let uncompressed_size: usize = header.uncompressed_page_size.try_into().map_err(|_| {
        Error::CorruptPage(format!(
            "page declares an uncompressed size of {} bytes",
            header.uncompressed_page_size
        ))
    })?;
    let mut buffer = vec![0u8; uncompressed_size];
    decompress(chunk.compression(), payload, &mut buffer)?;
    Ok(buffer)
}

/// Reads all values of a column chunk, nulls included, in writer order,
/// together with the chunk's repetition levels (empty for non-repeated
/// leaves).
///
/// Pages are visited sequentially from the chunk's first page until the
/// declared number of values has been seen. Index pages, v2 data pages and
/// pages of unknown type are skipped.
pub fn read_column_chunk<R: Read + Seek>(
    reader: &mut R,
    chunk: &ColumnChunkMetaData,
) -> Result<(Vec<Value>, Vec<u32>)> {
    reader.seek(SeekFrom::Start(chunk.start_offset() as u64))?;

    let num_values: usize = chunk.num_values().try_into().map_err(|_| {
        Error::MalformedMetadata(format!("column chunk declares {} values", chunk.num_values()))
    })?;

    let mut dict: Option<Vec<Value>> = None;
    let mut values = Vec::with_capacity(num_values);
    let mut rep_levels = Vec::new();
    while values.len() < num_values {
        let header = {
            let mut thrift_reader = CompactReader::new(&mut *reader);
            PageHeader::read_from(&mut thrift_reader).map_err(|error| match error {
                Error::MalformedMetadata(message) => {
                    Error::CorruptPage(format!("could not decode a page header: {}", message))
                }
                error => error,
            })?
        };
        let payload = read_payload(reader, &header)?;

        match PageType::try_from(header.type_) {
            Ok(PageType::DataPage) => {
                let data_header = header.data_page_header.as_ref().ok_or_else(|| {
                    Error::CorruptPage("data page without a data page header".to_string())
                })?;
                let buffer = decompress_payload(chunk, &header, &payload)?;
                let (page_values, page_rep_levels) = decode_data_page(
                    &buffer,
                    data_header,
                    chunk.descriptor(),
                    dict.as_deref(),
                )?;
                debug!(
                    "read a data page of column \"{}\" holding {} values",
                    chunk.descriptor().name(),
                    page_values.len()
                );
                values.extend(page_values);
                rep_levels.extend(page_rep_levels);
            }
            Ok(PageType::DictionaryPage) => {
                if dict.is_some() {
                    return Err(Error::CorruptPage(format!(
                        "column chunk \"{}\" holds more than one dictionary page",
                        chunk.descriptor().name()
                    )));
                }
                if !values.is_empty() {
                    return Err(Error::CorruptPage(format!(
                        "column chunk \"{}\" holds a dictionary page after its data pages",
                        chunk.descriptor().name()
                    )));
                }
                let dict_header = header.dictionary_page_header.as_ref().ok_or_else(|| {
                    Error::CorruptPage(
                        "dictionary page without a dictionary page header".to_string(),
                    )
                })?;
                let buffer = decompress_payload(chunk, &header, &payload)?;
                let entries = decode_dict_page(&buffer, dict_header, chunk.descriptor())?;
                debug!(
                    "read a dictionary page of column \"{}\" holding {} entries",
                    chunk.descriptor().name(),
                    entries.len()
                );
                dict = Some(entries);
            }
            Ok(other) => {
                warn!(
                    "skipping a {:?} page in column \"{}\"",
                    other,
                    chunk.descriptor().name()
                );
            }
            Err(_) => {
                warn!(
                    "skipping a page of unknown type ({}) in column \"{}\"",
                    header.type_,
                    chunk.descriptor().name()
                );
            }
        }
    }

    if values.len() != num_values {
        return Err(Error::CorruptPage(format!(
            "column chunk \"{}\" declares {} values but its pages hold {}",
            chunk.descriptor().name(),
            num_values,
            values.len()
        )));
    }
    Ok((values, rep_levels))
}
