//! Read-only implementation of the Parquet file format: decoding of the
//! thrift-compact footer, page decompression and decoding, and row
//! iteration. There is no write path.
#![forbid(unsafe_code)]

pub mod compression;
pub mod deserialize;
pub mod dump;
pub mod encoding;
pub mod error;
pub mod metadata;
mod parquet_bridge;
pub mod read;
pub mod schema;
pub mod thrift;
pub mod types;

pub use error::{Error, Result};
pub use parquet_bridge::{
    Compression, ConvertedType, Encoding, PageType, PhysicalType, Repetition,
};

/// The file starts with these bytes and, after the footer, ends with them.
pub const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];

/// The number of bytes of the header.
pub const HEADER_SIZE: u64 = PARQUET_MAGIC.len() as u64;

/// The number of bytes at the end of the file: the metadata length and the
/// closing magic.
pub const FOOTER_SIZE: u64 = 8;

/// The number of bytes read speculatively from the end of the file when
/// reading metadata, in the hope of covering the whole footer in one read.
const DEFAULT_FOOTER_READ_SIZE: u64 = 64 * 1024;
