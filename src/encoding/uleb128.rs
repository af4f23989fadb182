/// Decodes an ULEB128-encoded integer from the start of `values`, returning
/// the value and the number of bytes consumed. A truncated or empty input
/// consumes the whole slice; callers detect that by comparing lengths.
pub fn decode(values: &[u8]) -> (u64, usize) {
    let mut result = 0;
    let mut shift = 0;

    let mut consumed = 0;
    for byte in values {
        consumed += 1;

        result |= u64::from(byte & 0x7f) << shift;

        if byte & 0x80 == 0 {
            break;
        }

        shift += 7;
        if shift > 63 {
            break;
        }
    }
    (result, consumed)
}
