pub mod hybrid_rle;
pub mod uleb128;

/// Returns the ceil of value/8.
#[inline]
pub fn ceil8(value: usize) -> usize {
    value / 8 + ((value % 8 != 0) as usize)
}

/// Returns the number of bits needed to store the given maximum definition
/// or repetition level.
#[inline]
pub fn get_bit_width(max_level: i16) -> u32 {
    16 - max_level.leading_zeros()
}
