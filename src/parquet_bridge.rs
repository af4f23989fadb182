// Bridges raw thrift enum integers to Rust enums.
use crate::error::Error;

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Repetition {
    Required,
    Optional,
    Repeated,
}

impl TryFrom<i32> for Repetition {
    type Error = Error;

    fn try_from(repetition: i32) -> Result<Self, Self::Error> {
        Ok(match repetition {
            0 => Repetition::Required,
            1 => Repetition::Optional,
            2 => Repetition::Repeated,
            _ => {
                return Err(Error::MalformedMetadata(format!(
                    "repetition type {} out of range",
                    repetition
                )))
            }
        })
    }
}

/// The physical type of a leaf column, as declared in the file schema.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray(usize),
}

impl PhysicalType {
    /// Converts the thrift `Type` integer; `type_length` is only meaningful
    /// for FIXED_LEN_BYTE_ARRAY.
    pub fn try_from_thrift(type_: i32, type_length: Option<i32>) -> Result<Self, Error> {
        Ok(match type_ {
            0 => PhysicalType::Boolean,
            1 => PhysicalType::Int32,
            2 => PhysicalType::Int64,
            3 => PhysicalType::Int96,
            4 => PhysicalType::Float,
            5 => PhysicalType::Double,
            6 => PhysicalType::ByteArray,
            7 => {
                let length = type_length.ok_or_else(|| {
                    Error::MalformedMetadata(
                        "FIXED_LEN_BYTE_ARRAY requires a type_length".to_string(),
                    )
                })?;
                let length: usize = length.try_into().map_err(|_| {
                    Error::MalformedMetadata(format!("negative type_length ({})", length))
                })?;
                PhysicalType::FixedLenByteArray(length)
            }
            _ => {
                return Err(Error::MalformedMetadata(format!(
                    "physical type {} out of range",
                    type_
                )))
            }
        })
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Compression {
    Uncompressed,
    Snappy,
    Gzip,
    Lzo,
    Brotli,
    Lz4,
    Zstd,
    Lz4Raw,
}

impl TryFrom<i32> for Compression {
    type Error = Error;

    fn try_from(codec: i32) -> Result<Self, Self::Error> {
        Ok(match codec {
            0 => Compression::Uncompressed,
            1 => Compression::Snappy,
            2 => Compression::Gzip,
            3 => Compression::Lzo,
            4 => Compression::Brotli,
            5 => Compression::Lz4,
            6 => Compression::Zstd,
            7 => Compression::Lz4Raw,
            _ => {
                return Err(Error::MalformedMetadata(format!(
                    "compression codec {} out of range",
                    codec
                )))
            }
        })
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum PageType {
    DataPage,
    IndexPage,
    DictionaryPage,
    DataPageV2,
}

impl TryFrom<i32> for PageType {
    type Error = Error;

    fn try_from(type_: i32) -> Result<Self, Self::Error> {
        Ok(match type_ {
            0 => PageType::DataPage,
            1 => PageType::IndexPage,
            2 => PageType::DictionaryPage,
            3 => PageType::DataPageV2,
            _ => {
                return Err(Error::MalformedMetadata(format!(
                    "page type {} out of range",
                    type_
                )))
            }
        })
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Encoding {
    Plain,
    /// Deprecated dictionary encoding: in data pages newer writers use
    /// `RleDictionary` instead; the index stream is identical.
    PlainDictionary,
    Rle,
    /// Bit-packed (non-hybrid) levels. Known but not supported by this crate.
    BitPacked,
    DeltaBinaryPacked,
    DeltaLengthByteArray,
    DeltaByteArray,
    RleDictionary,
    ByteStreamSplit,
}

impl Encoding {
    /// The name used in error messages, matching parquet.thrift.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Plain => "PLAIN",
            Encoding::PlainDictionary => "PLAIN_DICTIONARY",
            Encoding::Rle => "RLE",
            Encoding::BitPacked => "BIT_PACKED",
            Encoding::DeltaBinaryPacked => "DELTA_BINARY_PACKED",
            Encoding::DeltaLengthByteArray => "DELTA_LENGTH_BYTE_ARRAY",
            Encoding::DeltaByteArray => "DELTA_BYTE_ARRAY",
            Encoding::RleDictionary => "RLE_DICTIONARY",
            Encoding::ByteStreamSplit => "BYTE_STREAM_SPLIT",
        }
    }
}

impl TryFrom<i32> for Encoding {
    type Error = Error;

    fn try_from(encoding: i32) -> Result<Self, Self::Error> {
        Ok(match encoding {
            0 => Encoding::Plain,
            2 => Encoding::PlainDictionary,
            3 => Encoding::Rle,
            4 => Encoding::BitPacked,
            5 => Encoding::DeltaBinaryPacked,
            6 => Encoding::DeltaLengthByteArray,
            7 => Encoding::DeltaByteArray,
            8 => Encoding::RleDictionary,
            9 => Encoding::ByteStreamSplit,
            _ => {
                return Err(Error::MalformedMetadata(format!(
                    "encoding {} out of range",
                    encoding
                )))
            }
        })
    }
}

/// Converted (logical) types carried by schema elements. Decoding returns
/// physical values; this is exposed as metadata only.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum ConvertedType {
    Utf8,
    Map,
    MapKeyValue,
    List,
    Enum,
    Decimal,
    Date,
    TimeMillis,
    TimeMicros,
    TimestampMillis,
    TimestampMicros,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Json,
    Bson,
    Interval,
}

impl TryFrom<i32> for ConvertedType {
    type Error = Error;

    fn try_from(converted: i32) -> Result<Self, Self::Error> {
        use ConvertedType::*;
        Ok(match converted {
            0 => Utf8,
            1 => Map,
            2 => MapKeyValue,
            3 => List,
            4 => Enum,
            5 => Decimal,
            6 => Date,
            7 => TimeMillis,
            8 => TimeMicros,
            9 => TimestampMillis,
            10 => TimestampMicros,
            11 => Uint8,
            12 => Uint16,
            13 => Uint32,
            14 => Uint64,
            15 => Int8,
            16 => Int16,
            17 => Int32,
            18 => Int64,
            19 => Json,
            20 => Bson,
            21 => Interval,
            _ => {
                return Err(Error::MalformedMetadata(format!(
                    "converted type {} out of range",
                    converted
                )))
            }
        })
    }
}
