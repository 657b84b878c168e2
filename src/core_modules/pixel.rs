// THEORY:
// The `Pixel` module defines the single fixed in-memory pixel format shared by every
// buffer in the engine. A pixel is one packed 32-bit value so that the bitwise blend
// modes (or, xor, and) operate on a whole pixel in a single instruction.
//
// Byte layout: the codec hands us RGBA8 bytes, which are packed little-endian. Red
// lands in the lowest byte and alpha in the highest:
//
//     bits 31..24  23..16  15..8  7..0
//          alpha   blue    green  red
//
// `Rgba` is the "dumb" unpacked view for code that needs to look at channels
// individually (the codec and tests). The hot paths never unpack.

pub mod pixel {
    pub type Byte = u8;
    pub type Bytes = Vec<Byte>;
    pub type Channel = Byte;
    pub type PackedPixel = u32;

    pub const CHANNELS: usize = 4;

    /// Packs four channels into the engine's pixel format.
    #[inline]
    pub fn pack(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> PackedPixel {
        PackedPixel::from_le_bytes([red, green, blue, alpha])
    }

    /// An unpacked RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Rgba {
        pub red: Channel,
        pub green: Channel,
        pub blue: Channel,
        pub alpha: Channel,
    }

    impl Rgba {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Rgba {
                red,
                green,
                blue,
                alpha,
            }
        }

        #[inline]
        pub fn packed(&self) -> PackedPixel {
            pack(self.red, self.green, self.blue, self.alpha)
        }
    }

    impl From<PackedPixel> for Rgba {
        fn from(value: PackedPixel) -> Self {
            let [red, green, blue, alpha] = value.to_le_bytes();
            Rgba::new(red, green, blue, alpha)
        }
    }

    impl From<Rgba> for PackedPixel {
        fn from(pixel: Rgba) -> Self {
            pixel.packed()
        }
    }

    impl TryFrom<&[Byte]> for Rgba {
        type Error = usize;

        /// Fails with the offending length when the slice is not exactly one pixel.
        fn try_from(bytes: &[Byte]) -> Result<Self, Self::Error> {
            match bytes {
                [red, green, blue, alpha] => Ok(Rgba::new(*red, *green, *blue, *alpha)),
                _ => Err(bytes.len()),
            }
        }
    }

    impl From<Rgba> for Bytes {
        fn from(pixel: Rgba) -> Self {
            vec![pixel.red, pixel.green, pixel.blue, pixel.alpha]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn alpha_lives_in_the_high_byte() {
        let packed = pack(0x11, 0x22, 0x33, 0x44);
        assert_eq!(packed, 0x4433_2211);
        assert_eq!(packed >> 24, 0x44);
    }

    #[test]
    fn unpack_reverses_pack() {
        let rgba = Rgba::new(1, 2, 3, 255);
        assert_eq!(Rgba::from(rgba.packed()), rgba);
        assert_eq!(Bytes::from(rgba), vec![1, 2, 3, 255]);
    }

    #[test]
    fn byte_slices_must_hold_exactly_one_pixel() {
        let bytes: &[Byte] = &[9, 8, 7, 6];
        assert_eq!(Rgba::try_from(bytes), Ok(Rgba::new(9, 8, 7, 6)));

        let short: &[Byte] = &[1, 2, 3];
        assert_eq!(Rgba::try_from(short), Err(3));
    }
}
