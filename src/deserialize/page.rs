//! Decoders of v1 data pages and dictionary pages into materialized values.
use super::{plain, Value};
use crate::encoding::{get_bit_width, hybrid_rle::HybridRleDecoder};
use crate::error::{Error, Result};
use crate::metadata::ColumnDescriptor;
use crate::parquet_bridge::Encoding;
use crate::thrift::format::{DataPageHeader, DictionaryPageHeader};

fn page_encoding(encoding: i32) -> Result<Encoding> {
    Encoding::try_from(encoding)
        .map_err(|_| Error::UnsupportedEncoding(format!("encoding {} is not known", encoding)))
}

/// Splits off a level run: a 4-byte little-endian length prefix followed by
/// that many bytes of RLE/bit-packed data.
fn split_levels(values: &[u8]) -> Result<(&[u8], &[u8])> {
    if values.len() < 4 {
        return Err(Error::CorruptPage(
            "page too short for its level run length".to_string(),
        ));
    }
    let (prefix, rest) = values.split_at(4);
    let length = u32::from_le_bytes(prefix.try_into().unwrap()) as usize;
    if rest.len() < length {
        return Err(Error::CorruptPage(format!(
            "page declares a {}-byte level run but holds {} bytes",
            length,
            rest.len()
        )));
    }
    Ok(rest.split_at(length))
}

fn ensure_levels_are_rle(encoding: i32, what: &str) -> Result<()> {
    match page_encoding(encoding)? {
        Encoding::Rle => Ok(()),
        other => Err(Error::UnsupportedEncoding(format!(
            "{} levels encoded as {}",
            what,
            other.name()
        ))),
    }
}

/// Decodes a v1 data page into exactly `num_values` values, nulls included,
/// in the order the writer produced them, together with the page's
/// repetition levels (empty for non-repeated leaves).
///
/// `dict` is the column chunk's dictionary, required when the page is
/// dictionary-encoded. Values of repeated fields come out flat; the caller
/// delimits rows with the repetition levels.
pub fn decode_data_page(
    buffer: &[u8],
    header: &DataPageHeader,
    descriptor: &ColumnDescriptor,
    dict: Option<&[Value]>,
) -> Result<(Vec<Value>, Vec<u32>)> {
    let num_values: usize = header.num_values.try_into().map_err(|_| {
        Error::CorruptPage(format!("page declares {} values", header.num_values))
    })?;
    let mut values = buffer;

    let rep_levels = if descriptor.max_rep_level() > 0 {
        ensure_levels_are_rle(header.repetition_level_encoding, "repetition")?;
        let (run, rest) = split_levels(values)?;
        values = rest;
        let num_bits = get_bit_width(descriptor.max_rep_level());
        let levels = HybridRleDecoder::new(run, num_bits, num_values).collect::<Vec<_>>();
        if levels.len() != num_values {
            return Err(Error::CorruptPage(format!(
                "page declares {} values but its repetition levels cover {}",
                num_values,
                levels.len()
            )));
        }
        levels
    } else {
        Vec::new()
    };

    let def_levels = if descriptor.max_def_level() > 0 {
        ensure_levels_are_rle(header.definition_level_encoding, "definition")?;
        let (run, rest) = split_levels(values)?;
        values = rest;
        let num_bits = get_bit_width(descriptor.max_def_level());
        Some(HybridRleDecoder::new(run, num_bits, num_values).collect::<Vec<_>>())
    } else {
        None
    };

    let max_def_level = descriptor.max_def_level() as u32;
    let num_nulls = def_levels
        .as_ref()
        .map(|levels| levels.iter().filter(|level| **level != max_def_level).count())
        .unwrap_or(0);
    let num_non_null = num_values - num_nulls;

    let non_null = match page_encoding(header.encoding)? {
        Encoding::Plain => plain::decode(values, descriptor.physical_type(), num_non_null)?,
        Encoding::PlainDictionary | Encoding::RleDictionary => {
            let dict = dict.ok_or_else(|| {
                Error::CorruptPage(format!(
                    "column \"{}\" has a dictionary-encoded page but no dictionary page",
                    descriptor.name()
                ))
            })?;
            decode_dict_indices(values, dict, num_non_null)?
        }
        other => {
            return Err(Error::UnsupportedEncoding(format!(
                "values encoded as {}",
                other.name()
            )))
        }
    };
    if non_null.len() != num_non_null {
        return Err(Error::CorruptPage(format!(
            "page declares {} non-null values but holds {}",
            num_non_null,
            non_null.len()
        )));
    }

    let values = match def_levels {
        None => non_null,
        Some(levels) => {
            if levels.len() != num_values {
                return Err(Error::CorruptPage(format!(
                    "page declares {} values but its definition levels cover {}",
                    num_values,
                    levels.len()
                )));
            }
            let mut non_null = non_null.into_iter();
            levels
                .into_iter()
                .map(|level| {
                    if level == max_def_level {
                        // counted above; the iterator holds exactly enough
                        non_null.next().unwrap()
                    } else {
                        Value::Null
                    }
                })
                .collect()
        }
    };
    Ok((values, rep_levels))
}

/// Decodes a dictionary-index stream: a one-byte bit width followed by an
/// unprefixed RLE/bit-packed run of indices into `dict`.
fn decode_dict_indices(values: &[u8], dict: &[Value], num_values: usize) -> Result<Vec<Value>> {
    if num_values == 0 {
        return Ok(Vec::new());
    }
    let (bit_width, indices) = values.split_first().ok_or_else(|| {
        Error::CorruptPage("page too short for its dictionary index bit width".to_string())
    })?;
    if *bit_width > 32 {
        return Err(Error::CorruptPage(format!(
            "dictionary index bit width {} out of range",
            bit_width
        )));
    }
    HybridRleDecoder::new(indices, *bit_width as u32, num_values)
        .map(|index| {
            dict.get(index as usize).cloned().ok_or_else(|| {
                Error::CorruptPage(format!(
                    "dictionary index {} out of range ({} entries)",
                    index,
                    dict.len()
                ))
            })
        })
        .collect()
}

/// Decodes a dictionary page into its entries, in index order.
pub fn decode_dict_page(
    buffer: &[u8],
    header: &DictionaryPageHeader,
    descriptor: &ColumnDescriptor,
) -> Result<Vec<Value>> {
    match page_encoding(header.encoding)? {
        // the entries themselves are always PLAIN
        Encoding::Plain | Encoding::PlainDictionary => {}
        other => {
            return Err(Error::UnsupportedEncoding(format!(
                "dictionary page encoded as {}",
                other.name()
            )))
        }
    }
    let num_values: usize = header.num_values.try_into().map_err(|_| {
        Error::CorruptPage(format!(
            "dictionary page declares {} entries",
            header.num_values
        ))
    })?;
    plain::decode(buffer, descriptor.physical_type(), num_values)
}
