//! Decoder of the RLE/bit-packed hybrid encoding, used for definition and
//! repetition levels and for dictionary indices.
//! See <https://github.com/apache/parquet-format/blob/master/Encodings.md#run-length-encoding--bit-packing-hybrid-rle--3>
use super::{ceil8, uleb128};

/// One run of the hybrid encoding.
#[derive(Debug, PartialEq, Eq)]
pub enum HybridEncoded<'a> {
    /// A bit-packed run: `length` values of `num_bits` bits each, packed
    /// LSB-first across the (byte-aligned) slice.
    Bitpacked { values: &'a [u8], length: usize },
    /// An RLE run: `value` repeated `length` times.
    Rle { value: u32, length: usize },
}

/// An iterator over the runs of a hybrid-encoded slice.
///
/// Exhaustion of the slice before a further run header is natural
/// termination, not an error; a slice truncated mid-run yields a run capped
/// to the bytes that are present.
pub struct Decoder<'a> {
    values: &'a [u8],
    num_bits: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(values: &'a [u8], num_bits: usize) -> Self {
        Self { values, num_bits }
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = HybridEncoded<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.values.is_empty() || self.num_bits == 0 {
            return None;
        }
        let (indicator, consumed) = uleb128::decode(self.values);
        self.values = &self.values[consumed..];
        if indicator & 1 == 1 {
            // bit-packed run: (indicator >> 1) groups of 8 values
            let num_bytes = (indicator as usize >> 1) * self.num_bits;
            let num_bytes = num_bytes.min(self.values.len());
            let run = HybridEncoded::Bitpacked {
                values: &self.values[..num_bytes],
                length: num_bytes * 8 / self.num_bits,
            };
            self.values = &self.values[num_bytes..];
            Some(run)
        } else {
            // rle run: the repeated value uses a fixed width of
            // round-up-to-next-byte(bit width)
            let rle_bytes = ceil8(self.num_bits);
            if self.values.len() < rle_bytes {
                self.values = &[];
                return None;
            }
            let mut bytes = [0u8; std::mem::size_of::<u32>()];
            self.values[..rle_bytes]
                .iter()
                .enumerate()
                .for_each(|(i, byte)| bytes[i] = *byte);
            let value = u32::from_le_bytes(bytes);
            self.values = &self.values[rle_bytes..];
            Some(HybridEncoded::Rle {
                value,
                length: indicator as usize >> 1,
            })
        }
    }
}

/// A bit-packed run unpacked value by value, LSB-first within each byte.
struct Bitpacked<'a> {
    values: &'a [u8],
    num_bits: usize,
    // absolute bit position of the next value
    position: usize,
    remaining: usize,
}

impl<'a> Bitpacked<'a> {
    fn new(values: &'a [u8], num_bits: usize, length: usize) -> Self {
        debug_assert!(num_bits > 0 && num_bits <= 32);
        Self {
            values,
            num_bits,
            position: 0,
            remaining: length,
        }
    }
}

impl<'a> Iterator for Bitpacked<'a> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let mut value: u32 = 0;
        let mut read = 0;
        while read < self.num_bits {
            let byte = *self.values.get(self.position / 8)?;
            let offset = self.position % 8;
            let take = (8 - offset).min(self.num_bits - read);
            let mask = ((1u16 << take) - 1) as u8;
            value |= (((byte >> offset) & mask) as u32) << read;
            read += take;
            self.position += take;
        }
        self.remaining -= 1;
        Some(value)
    }
}

enum State<'a> {
    Bitpacked(Bitpacked<'a>),
    Rle { value: u32, length: usize },
    Finished,
}

/// Decoder of the hybrid encoding at value granularity: an iterator of
/// `u32` bounded by an explicit `length`.
///
/// `num_bits == 0` is the degenerate case in which every value is zero and
/// no bytes are consumed per value.
pub struct HybridRleDecoder<'a> {
    runs: Decoder<'a>,
    state: State<'a>,
    num_bits: usize,
    remaining: usize,
}

impl<'a> HybridRleDecoder<'a> {
    pub fn new(values: &'a [u8], num_bits: u32, length: usize) -> Self {
        let num_bits = num_bits as usize;
        let mut this = Self {
            runs: Decoder::new(values, num_bits),
            state: State::Finished,
            num_bits,
            remaining: length,
        };
        this.load_run();
        this
    }

    fn load_run(&mut self) {
        self.state = match self.runs.next() {
            Some(HybridEncoded::Bitpacked { values, length }) => {
                State::Bitpacked(Bitpacked::new(values, self.num_bits, length))
            }
            Some(HybridEncoded::Rle { value, length }) => State::Rle { value, length },
            None => State::Finished,
        };
    }
}

impl<'a> Iterator for HybridRleDecoder<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        if self.num_bits == 0 {
            self.remaining -= 1;
            return Some(0);
        }
        loop {
            match &mut self.state {
                State::Finished => return None,
                State::Bitpacked(decoder) => match decoder.next() {
                    Some(value) => {
                        self.remaining -= 1;
                        return Some(value);
                    }
                    None => self.load_run(),
                },
                State::Rle { value, length } => {
                    if *length == 0 {
                        self.load_run();
                    } else {
                        *length -= 1;
                        let value = *value;
                        self.remaining -= 1;
                        return Some(value);
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
