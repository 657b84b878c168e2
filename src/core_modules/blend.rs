// THEORY:
// A `BlendMode` decides what happens when an incoming chunk pixel lands on a pixel
// that is already in the destination. Every mode is a pure function of the two
// packed values. The set is closed and matched exhaustively.
//
// `Average` is a cheap halve-and-add rather than a true per-channel mean: each
// operand is shifted right once and masked so no bit leaks from one channel into
// the next, then the halves are added. The sum of two halved bytes never exceeds
// 0xFE, so there is no carry between channels and no saturation step.

use std::fmt;
use std::str::FromStr;

use crate::core_modules::pixel::pixel::PackedPixel;

/// Mask applied after the halving shift in `BlendMode::Average`.
pub const AVERAGE_MASK: PackedPixel = 0xFF7F_7F7F;

/// How a chunk pixel is combined with the destination pixel under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Bitwise OR of old and new.
    Or,
    /// Bitwise XOR of old and new.
    Xor,
    /// Bitwise AND of old and new.
    And,
    /// Halve-and-add approximate average.
    Average,
    /// New replaces old.
    Overwrite,
}

impl BlendMode {
    pub const ALL: [BlendMode; 5] = [
        BlendMode::Or,
        BlendMode::Xor,
        BlendMode::And,
        BlendMode::Average,
        BlendMode::Overwrite,
    ];

    /// Combines a destination pixel with an incoming source pixel.
    #[inline]
    pub fn blend(self, dest: PackedPixel, source: PackedPixel) -> PackedPixel {
        match self {
            BlendMode::Or => dest | source,
            BlendMode::Xor => dest ^ source,
            BlendMode::And => dest & source,
            BlendMode::Average => ((dest >> 1) & AVERAGE_MASK) + ((source >> 1) & AVERAGE_MASK),
            BlendMode::Overwrite => source,
        }
    }

    /// Blends one row of source pixels onto a destination row of the same length.
    pub fn blend_row(self, dest: &mut [PackedPixel], source: &[PackedPixel]) {
        if self == BlendMode::Overwrite {
            dest.copy_from_slice(source);
            return;
        }
        for (d, s) in dest.iter_mut().zip(source) {
            *d = self.blend(*d, *s);
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlendMode::Or => "or",
            BlendMode::Xor => "xor",
            BlendMode::And => "and",
            BlendMode::Average => "average",
            BlendMode::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendMode {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "or" => Ok(BlendMode::Or),
            "xor" => Ok(BlendMode::Xor),
            "and" => Ok(BlendMode::And),
            "average" | "avg" => Ok(BlendMode::Average),
            "overwrite" | "copy" => Ok(BlendMode::Overwrite),
            other => Err(format!(
                "unknown blend mode '{}' (expected or / xor / and / average / overwrite)",
                other
            )),
        }
    }
}
