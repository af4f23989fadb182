//! Decoder of PLAIN-encoded values.
use super::Value;
use crate::error::{Error, Result};
use crate::parquet_bridge::PhysicalType;
use crate::types::NativeType;

fn truncated(type_: PhysicalType) -> Error {
    Error::CorruptPage(format!("page too short for its {:?} values", type_))
}

fn native<T: NativeType>(values: &mut &[u8], type_: PhysicalType) -> Result<T> {
    let size = std::mem::size_of::<T>();
    if values.len() < size {
        return Err(truncated(type_));
    }
    let (chunk, rest) = values.split_at(size);
    *values = rest;
    let chunk: T::Bytes = match chunk.try_into() {
        Ok(chunk) => chunk,
        _ => unreachable!(),
    };
    Ok(T::from_le_bytes(chunk))
}

fn byte_array(values: &mut &[u8]) -> Result<Vec<u8>> {
    let length = native::<i32>(values, PhysicalType::ByteArray)?;
    let length: usize = length
        .try_into()
        .map_err(|_| Error::CorruptPage(format!("negative byte array length ({})", length)))?;
    if values.len() < length {
        return Err(truncated(PhysicalType::ByteArray));
    }
    let (chunk, rest) = values.split_at(length);
    *values = rest;
    Ok(chunk.to_vec())
}

/// Decodes `num_values` PLAIN-encoded values of the given physical type from
/// the start of `values`. Trailing bytes are ignored; a slice too short for
/// the declared count is a [`Error::CorruptPage`].
pub fn decode(
    mut values: &[u8],
    physical_type: PhysicalType,
    num_values: usize,
) -> Result<Vec<Value>> {
    let mut decoded = Vec::with_capacity(num_values);
    match physical_type {
        PhysicalType::Boolean => {
            // one bit per value, packed LSB-first
            if values.len() * 8 < num_values {
                return Err(truncated(physical_type));
            }
            for i in 0..num_values {
                let bit = values[i / 8] >> (i % 8) & 1;
                decoded.push(Value::Boolean(bit == 1));
            }
        }
        PhysicalType::Int32 => {
            for _ in 0..num_values {
                decoded.push(Value::Int32(native(&mut values, physical_type)?));
            }
        }
        PhysicalType::Int64 => {
            for _ in 0..num_values {
                decoded.push(Value::Int64(native(&mut values, physical_type)?));
            }
        }
        PhysicalType::Int96 => {
            for _ in 0..num_values {
                let mut words = [0u32; 3];
                for word in words.iter_mut() {
                    let value: i32 = native(&mut values, physical_type)?;
                    *word = value as u32;
                }
                decoded.push(Value::Int96(words));
            }
        }
        PhysicalType::Float => {
            for _ in 0..num_values {
                decoded.push(Value::Float(native(&mut values, physical_type)?));
            }
        }
        PhysicalType::Double => {
            for _ in 0..num_values {
                decoded.push(Value::Double(native(&mut values, physical_type)?));
            }
        }
        PhysicalType::ByteArray => {
            for _ in 0..num_values {
                decoded.push(Value::ByteArray(byte_array(&mut values)?));
            }
        }
        PhysicalType::FixedLenByteArray(length) => {
            for _ in 0..num_values {
                if values.len() < length {
                    return Err(truncated(physical_type));
                }
                let (chunk, rest) = values.split_at(length);
                values = rest;
                decoded.push(Value::ByteArray(chunk.to_vec()));
            }
        }
    }
    Ok(decoded)
}
