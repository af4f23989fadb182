use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};
use crate::metadata::FileMetaData;
use crate::thrift::compact::CompactReader;
use crate::thrift::format;
use crate::{DEFAULT_FOOTER_READ_SIZE, FOOTER_SIZE, HEADER_SIZE, PARQUET_MAGIC};

pub(super) fn stream_len(seek: &mut impl Seek) -> std::io::Result<u64> {
    let old_pos = seek.stream_position()?;
    let len = seek.seek(SeekFrom::End(0))?;

    if old_pos != len {
        seek.seek(SeekFrom::Start(old_pos))?;
    }

    Ok(len)
}

/// The number of bytes of metadata at the end of the file, decoded from the
/// footer's trailing 8 bytes.
fn metadata_len(buffer: &[u8], remainder: usize) -> i32 {
    i32::from_le_bytes(buffer[remainder..remainder + 4].try_into().unwrap())
}

/// Reads a file's metadata from its footer.
///
/// The tail of the file is read speculatively, [`DEFAULT_FOOTER_READ_SIZE`]
/// bytes at most, so that most footers cost a single seek and read.
pub fn read_metadata<R: Read + Seek>(reader: &mut R) -> Result<FileMetaData> {
    let file_size = stream_len(reader)?;

    if file_size < (HEADER_SIZE + FOOTER_SIZE) as u64 {
        return Err(Error::NotAParquetFile(format!(
            "a {}-byte file cannot hold a header and a footer",
            file_size
        )));
    }

    let mut magic = [0u8; 4];
    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut magic)?;
    if magic != PARQUET_MAGIC {
        return Err(Error::NotAParquetFile(
            "the file does not start with the magic bytes".to_string(),
        ));
    }

    // read the end of the file, hoping it covers the whole footer
    let default_end_len = std::cmp::min(DEFAULT_FOOTER_READ_SIZE, file_size) as usize;
    reader.seek(SeekFrom::End(-(default_end_len as i64)))?;

    let mut buffer = Vec::with_capacity(default_end_len);
    reader
        .by_ref()
        .take(default_end_len as u64)
        .read_to_end(&mut buffer)?;

    if buffer[default_end_len - 4..] != PARQUET_MAGIC {
        return Err(Error::NotAParquetFile(
            "the file does not end with the magic bytes".to_string(),
        ));
    }

    let metadata_len = metadata_len(&buffer, default_end_len - FOOTER_SIZE as usize);
    let metadata_len: u64 = metadata_len.try_into().map_err(|_| {
        Error::MalformedMetadata(format!("negative footer length ({})", metadata_len))
    })?;

    let footer_len = FOOTER_SIZE as u64 + metadata_len;
    if footer_len > file_size - HEADER_SIZE as u64 {
        return Err(Error::MalformedMetadata(format!(
            "the file is shorter ({} bytes) than its declared footer ({} bytes)",
            file_size, footer_len
        )));
    }

    let metadata = if (footer_len as usize) <= buffer.len() {
        // the speculative read covered the whole footer
        let start = buffer.len() - footer_len as usize;
        let end = buffer.len() - FOOTER_SIZE as usize;
        decode(&buffer[start..end])?
    } else {
        reader.seek(SeekFrom::End(-(footer_len as i64)))?;
        let mut buffer = Vec::with_capacity(metadata_len as usize);
        reader.by_ref().take(metadata_len).read_to_end(&mut buffer)?;
        decode(&buffer)?
    };

    FileMetaData::try_from_thrift(metadata)
}

fn decode(mut slice: &[u8]) -> Result<format::FileMetaData> {
    let mut reader = CompactReader::new(&mut slice);
    // the slice covers the declared footer, so hitting its end is a
    // decoding problem, not an io problem
    format::FileMetaData::read_from(&mut reader).map_err(|error| match error {
        Error::Io(message) => {
            Error::MalformedMetadata(format!("could not decode the footer: {}", message))
        }
        error => error,
    })
}
