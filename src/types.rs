/// A physical in-memory representation of a Parquet fixed-width type.
pub trait NativeType: Sized + Copy + std::fmt::Debug {
    type Bytes: AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! native {
    ($type:ty) => {
        impl NativeType for $type {
            type Bytes = [u8; std::mem::size_of::<Self>()];

            #[inline]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                Self::from_le_bytes(bytes)
            }
        }
    };
}

native!(i32);
native!(i64);
native!(f32);
native!(f64);

/// Converts an INT96 (nanoseconds within a day, julian day) into
/// nanoseconds since the unix epoch.
#[inline]
pub fn int96_to_i64_ns(value: [u32; 3]) -> i64 {
    const JULIAN_DAY_OF_EPOCH: i64 = 2_440_588;
    const SECONDS_PER_DAY: i64 = 86_400;
    const NANOS_PER_SECOND: i64 = 1_000_000_000;

    let day = value[2] as i64;
    let nanoseconds = ((value[1] as i64) << 32) + value[0] as i64;
    let seconds = (day - JULIAN_DAY_OF_EPOCH) * SECONDS_PER_DAY;

    seconds * NANOS_PER_SECOND + nanoseconds
}
