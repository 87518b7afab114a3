
//! A color type, with utility methods for modifying colors and parsing colors
//! from hex integers and strings.

use std::str::FromStr;

use gl::types::*;

use crate::shader::UniformValue;

/// A color with red, green, blue and alpha components. All components are
/// expected to be between 0 and 1, both inclusive.
///
/// The struct is `repr(C)`, so it can be embedded directly in vertex types.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Creates a new, completely opaque (alpha = 1), color.
    ///
    /// All parameters are clamped so that they are between 0 and 1, both inclusive.
    pub fn rgb(r: f32, g: f32, b: f32) -> Color {
        Color {
            r: clamp(r, 0.0, 1.0),
            g: clamp(g, 0.0, 1.0),
            b: clamp(b, 0.0, 1.0),
            a: 1.0,
        }
    }

    /// Creates a new color.
    ///
    /// All parameters are clamped so that they are between 0 and 1, both inclusive.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color {
            r: clamp(r, 0.0, 1.0),
            g: clamp(g, 0.0, 1.0),
            b: clamp(b, 0.0, 1.0),
            a: clamp(a, 0.0, 1.0),
        }
    }

    /// Creates a color from a hex string. The string should be of the format
    /// "#rrggbb" or "rrggbb", where each of r, g and b is a hexadecimal digit.
    /// Note that this currently does not support colors with a alpha channel;
    /// all colors created will be completely opaque.
    pub fn hex_str(string: &str) -> Option<Color> {
        let value = {
            if string.len() == 6 {
                u32::from_str_radix(string, 16)
            } else if string.len() == 7 {
                u32::from_str_radix(&string[1..], 16)
            } else {
                return None;
            }
        };

        match value {
            Ok(value) => Some(Color::hex_int(value)),
            Err(_) =>    None,
        }
    }

    /// Creates a color from a hex int. Bits `16..24` are the red channel, bits
    /// `8..16` the green channel and bits `0..8` the blue channel. The alpha
    /// channel is set to 1.
    ///
    /// # Example
    /// ```rust
    /// # use kvarts::Color;
    /// let color = Color::hex_int(0xff00ff);
    ///
    /// assert_eq!(color, Color::rgb(1.0, 0.0, 1.0));
    /// ```
    pub fn hex_int(value: u32) -> Color {
        let r = (value >> 16 & 0xff) as f32 / 255.0;
        let g = (value >> 8 & 0xff) as f32 / 255.0;
        let b = (value & 0xff) as f32 / 255.0;

        Color { r, g, b, a: 1.0 }
    }

    /// Converts this color to a hex string like "#ffa13b". Note that this
    /// function ignores the alpha channel.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0) as u32;
        let g = (self.g * 255.0) as u32;
        let b = (self.b * 255.0) as u32;
        let value = r << 16 | g << 8 | b;
        format!("#{:06x}", value)
    }

    /// Creates a new color based on this color, with the red, green and blue
    /// components multiplied by the given factor.
    pub fn with_lightness(&self, factor: f32) -> Color {
        Color {
            r: clamp(self.r*factor, 0.0, 1.0),
            g: clamp(self.g*factor, 0.0, 1.0),
            b: clamp(self.b*factor, 0.0, 1.0),
            a: self.a,
        }
    }

    /// Linearly interpolates between this color and the given other color.
    /// `t` should be between 0 and 1. Values outside of this range will lead
    /// to extrapolation.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color {
            r: self.r*(1.0 - t) + other.r*t,
            g: self.g*(1.0 - t) + other.g*t,
            b: self.b*(1.0 - t) + other.b*t,
            a: self.a*(1.0 - t) + other.a*t,
        }
    }
}

// Does not properly handle NaN, which should not really matter
fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { return min; }
    if value > max { return max; }
    value
}

impl UniformValue for Color {
    unsafe fn set_uniform(color: &Color, location: GLint) {
        gl::Uniform4f(location, color.r, color.g, color.b, color.a);
    }
}

impl From<u32> for Color {
    fn from(v: u32) -> Color {
        Color::hex_int(v)
    }
}

impl FromStr for Color {
    type Err = (); // User can probably see why their color failed to parse on inspection

    fn from_str(s: &str) -> Result<Color, ()> {
        match Color::hex_str(s) {
            Some(c) => Ok(c),
            None    => Err(()),
        }
    }
}

// Custom serialization
#[cfg(feature = "serialize")]
mod serialize {
    use super::*;

    use std::fmt;
    use serde::de::{Error, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Color {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for Color {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_str(ColorVisitor)
        }
    }

    struct ColorVisitor;
    impl<'de> Visitor<'de> for ColorVisitor {
        type Value = Color;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("A string representing a valid hex color")
        }

        fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
            match Color::hex_str(v) {
                Some(color) => Ok(color),
                None =>        Err(E::custom(format!("\"{}\" is not a valid color string", v))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_hex_roundtrip() {
        assert_eq!("#ffa3b1", Color::hex_str("#ffa3b1").unwrap().to_hex());
        assert_eq!("#a300f1", Color::hex_str("#a300f1").unwrap().to_hex());
        assert_eq!("#000000", Color::hex_str("#000000").unwrap().to_hex());
        assert_eq!("#000001", Color::hex_str("#000001").unwrap().to_hex());
        assert_eq!("#100000", Color::hex_str("#100000").unwrap().to_hex());
    }

    #[test]
    fn hex_str_rejects_garbage() {
        assert_eq!(None, Color::hex_str(""));
        assert_eq!(None, Color::hex_str("#ff"));
        assert_eq!(None, Color::hex_str("zzzzzz"));
        assert_eq!(None, Color::hex_str("#ff00ff00"));
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::rgb(0.0, 0.2, 0.4);
        let b = Color::rgb(1.0, 0.8, 0.6);
        assert_eq!(a, a.lerp(b, 0.0));
        assert_eq!(b, a.lerp(b, 1.0));
    }
}
