//! Byte order reversal for fixed-width scalars.

/// Scalars whose byte order can be reversed.
///
/// Implemented per fixed-width type, so the width is part of the type rather than a runtime
/// size. Swapping is an involution: `x.endian_swap().endian_swap() == x`.
pub trait EndianSwap: Copy {
    /// Returns `self` with its bytes in reverse order.
    fn endian_swap(self) -> Self;
}

#[inline(always)]
const fn swap16(x: u16) -> u16 {
    (x << 8) | (x >> 8)
}

#[inline(always)]
const fn swap32(x: u32) -> u32 {
    // Exchange adjacent bytes, then the two half-words.
    let x = ((x & 0x00FF_00FF) << 8) | ((x >> 8) & 0x00FF_00FF);
    x.rotate_left(16)
}

#[inline(always)]
const fn swap64(x: u64) -> u64 {
    let x = ((x & 0x00FF_00FF_00FF_00FF) << 8) | ((x >> 8) & 0x00FF_00FF_00FF_00FF);
    let x = ((x & 0x0000_FFFF_0000_FFFF) << 16) | ((x >> 16) & 0x0000_FFFF_0000_FFFF);
    x.rotate_left(32)
}

macro_rules! impl_endian_swap {
    ($($ty:ty => |$x:ident| $body:expr),* $(,)?) => {
        $(
            impl EndianSwap for $ty {
                #[inline]
                fn endian_swap(self) -> Self {
                    let $x = self;
                    $body
                }
            }
        )*
    };
}

impl_endian_swap! {
    u8 => |x| x,
    i8 => |x| x,
    u16 => |x| swap16(x),
    i16 => |x| swap16(x as u16) as i16,
    u32 => |x| swap32(x),
    i32 => |x| swap32(x as u32) as i32,
    u64 => |x| swap64(x),
    i64 => |x| swap64(x as u64) as i64,
    f32 => |x| f32::from_bits(swap32(x.to_bits())),
    f64 => |x| f64::from_bits(swap64(x.to_bits())),
}

#[cfg(target_pointer_width = "64")]
impl_endian_swap! {
    usize => |x| swap64(x as u64) as usize,
    isize => |x| swap64(x as u64) as isize,
}

#[cfg(target_pointer_width = "32")]
impl_endian_swap! {
    usize => |x| swap32(x as u32) as usize,
    isize => |x| swap32(x as u32) as isize,
}

/// Returns `x` with its bytes in reverse order.
#[inline]
pub fn endian_swap<T: EndianSwap>(x: T) -> T {
    x.endian_swap()
}

/// Reverses the byte order of every element of `v` in place.
pub fn endian_swap_slice<T: EndianSwap>(v: &mut [T]) {
    for x in v {
        *x = x.endian_swap();
    }
}

/// Converts a native-endian value to big endian.
#[inline]
pub fn to_big_endian<T: EndianSwap>(x: T) -> T {
    if cfg!(target_endian = "big") {
        x
    } else {
        x.endian_swap()
    }
}

/// Converts a native-endian value to little endian.
#[inline]
pub fn to_little_endian<T: EndianSwap>(x: T) -> T {
    if cfg!(target_endian = "little") {
        x
    } else {
        x.endian_swap()
    }
}
