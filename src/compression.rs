//! Functions to decompress page payloads.
//!
//! Each codec is behind a cargo feature; a page compressed with a codec whose
//! feature is off fails with [`Error::UnsupportedCodec`] rather than at build
//! time.
use crate::error::{Error, Result};

pub use crate::parquet_bridge::Compression;

#[cfg(any(feature = "gzip", feature = "brotli"))]
fn fill_exactly(mut reader: impl std::io::Read, output_buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < output_buf.len() {
        let read = reader.read(&mut output_buf[total..])?;
        if read == 0 {
            return Ok(total);
        }
        total += read;
    }
    // the stream must end exactly here, even when no bytes were declared
    let mut overflow = [0u8; 1];
    if reader.read(&mut overflow)? != 0 {
        return Ok(total + 1);
    }
    Ok(total)
}

/// Decompresses `input_buf` into `output_buf`, whose length must equal the
/// uncompressed size declared in the page header. A payload that inflates to
/// any other size is a [`Error::CorruptPage`].
pub fn decompress(compression: Compression, input_buf: &[u8], output_buf: &mut [u8]) -> Result<()> {
    let read = match compression {
        Compression::Uncompressed => {
            if input_buf.len() != output_buf.len() {
                return Err(Error::CorruptPage(format!(
                    "uncompressed page declares {} bytes but holds {}",
                    output_buf.len(),
                    input_buf.len()
                )));
            }
            output_buf.copy_from_slice(input_buf);
            return Ok(());
        }
        #[cfg(feature = "snappy")]
        Compression::Snappy => snap::raw::Decoder::new()
            .decompress(input_buf, output_buf)
            .map_err(|e| Error::CorruptPage(format!("snappy: {}", e)))?,
        #[cfg(feature = "gzip")]
        Compression::Gzip => {
            let decoder = flate2::read::MultiGzDecoder::new(input_buf);
            fill_exactly(decoder, output_buf)
                .map_err(|e| Error::CorruptPage(format!("gzip: {}", e)))?
        }
        #[cfg(feature = "brotli")]
        Compression::Brotli => {
            let decoder = brotli::Decompressor::new(input_buf, 4096);
            fill_exactly(decoder, output_buf)
                .map_err(|e| Error::CorruptPage(format!("brotli: {}", e)))?
        }
        #[cfg(feature = "zstd")]
        Compression::Zstd => zstd::bulk::decompress_to_buffer(input_buf, output_buf)
            .map_err(|e| Error::CorruptPage(format!("zstd: {}", e)))?,
        #[cfg(feature = "lz4")]
        Compression::Lz4Raw => lz4_flex::block::decompress_into(input_buf, output_buf)
            .map_err(|e| Error::CorruptPage(format!("lz4: {}", e)))?,
        other => {
            return Err(Error::UnsupportedCodec(format!(
                "compression {:?} is not supported by this build",
                other
            )))
        }
    };
    if read != output_buf.len() {
        return Err(Error::CorruptPage(format!(
            "page declares {} uncompressed bytes but inflates to {}",
            output_buf.len(),
            read
        )));
    }
    Ok(())
}
