/// Errors that can arise when decoding a Parquet file.
///
/// Every variant is fatal for the operation that raised it: this is a pure
/// decode path over a fixed byte source, so an error always means either a
/// malformed file or a feature this crate does not implement. Errors are
/// never retried internally.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The magic marker at the start or end of the source is not `PAR1`,
    /// or the source is too small to hold one.
    NotAParquetFile(String),
    /// The compact-protocol-encoded metadata (footer or page header) could
    /// not be decoded.
    MalformedMetadata(String),
    /// A page's content contradicts its header, e.g. the decompressed byte
    /// count does not match the declared uncompressed size.
    CorruptPage(String),
    /// The column declares a compression codec this crate does not support.
    UnsupportedCodec(String),
    /// The page declares a value or level encoding this crate does not
    /// support (e.g. BIT_PACKED levels).
    UnsupportedEncoding(String),
    /// A schema lookup did not resolve to a leaf column.
    UnknownColumn(String),
    /// Underlying I/O failure while reading the byte source.
    Io(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::NotAParquetFile(message) => {
                write!(fmt, "not a parquet file: {}", message)
            }
            Error::MalformedMetadata(message) => {
                write!(fmt, "malformed metadata: {}", message)
            }
            Error::CorruptPage(message) => {
                write!(fmt, "corrupt page: {}", message)
            }
            Error::UnsupportedCodec(codec) => {
                write!(fmt, "unsupported codec: {}", codec)
            }
            Error::UnsupportedEncoding(encoding) => {
                write!(fmt, "unsupported encoding: {}", encoding)
            }
            Error::UnknownColumn(name) => {
                write!(fmt, "unknown column: {}", name)
            }
            Error::Io(message) => {
                write!(fmt, "underlying IO error: {}", message)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e.to_string())
    }
}

/// A specialized `Result` for Parquet decode errors.
pub type Result<T> = std::result::Result<T, Error>;
