//! Colour helpers: serde adapters for [`peniko::Color`] and the atom colouring
//! schemes.

use peniko::Color;
use serde::{Deserialize, Serialize};

pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color { r, g, b, a: 255 }
}

pub const BLACK: Color = rgb(0, 0, 0);
pub const RED: Color = rgb(255, 0, 0);
pub const HIGHLIGHT: Color = rgb(255, 135, 0);

/// Serializes a colour as `[r, g, b, a]`.
pub mod rgba {
    use peniko::Color;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(color: &Color, s: S) -> Result<S::Ok, S::Error> {
        [color.r, color.g, color.b, color.a].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Color, D::Error> {
        let [r, g, b, a] = <[u8; 4]>::deserialize(d)?;
        Ok(Color { r, g, b, a })
    }
}

/// Optional colour, `null` or `[r, g, b, a]`.
pub mod opt_rgba {
    use peniko::Color;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(color: &Option<Color>, s: S) -> Result<S::Ok, S::Error> {
        color.map(|c| [c.r, c.g, c.b, c.a]).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Color>, D::Error> {
        let raw = Option::<[u8; 4]>::deserialize(d)?;
        Ok(raw.map(|[r, g, b, a]| Color { r, g, b, a }))
    }
}

/// How atom symbols are coloured. The colour of carbon doubles as the
/// foreground colour for bonds, donuts and brackets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomColors {
    /// Every atom the same colour.
    Uniform(#[serde(with = "rgba")] Color),
    /// The classic 2D scheme: heteroatoms tinted, carbon and hydrogen black.
    Cdk2d,
}

impl Default for AtomColors {
    fn default() -> Self {
        AtomColors::Uniform(BLACK)
    }
}

impl AtomColors {
    pub fn color_of(&self, atomic_num: u8) -> Color {
        match self {
            AtomColors::Uniform(c) => *c,
            AtomColors::Cdk2d => match atomic_num {
                7 => rgb(48, 80, 248),
                8 => rgb(255, 13, 13),
                9 | 17 => rgb(31, 240, 31),
                15 => rgb(255, 128, 0),
                16 => rgb(198, 198, 0),
                35 => rgb(166, 41, 41),
                53 => rgb(148, 0, 148),
                5 => rgb(255, 181, 181),
                _ => BLACK,
            },
        }
    }

    pub fn foreground(&self) -> Color {
        self.color_of(crate::element::CARBON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "rgba")]
        c: Color,
        #[serde(with = "opt_rgba", default)]
        o: Option<Color>,
    }

    #[test]
    fn rgba_json() {
        let h: Holder = serde_json::from_str(r#"{"c":[1,2,3,4],"o":[5,6,7,8]}"#).unwrap();
        assert_eq!(h.c, Color { r: 1, g: 2, b: 3, a: 4 });
        assert_eq!(h.o, Some(Color { r: 5, g: 6, b: 7, a: 8 }));
        let out = serde_json::to_string(&h).unwrap();
        assert_eq!(out, r#"{"c":[1,2,3,4],"o":[5,6,7,8]}"#);
    }

    #[test]
    fn missing_optional_color() {
        let h: Holder = serde_json::from_str(r#"{"c":[0,0,0,255]}"#).unwrap();
        assert_eq!(h.o, None);
    }

    #[test]
    fn foreground_is_carbon() {
        assert_eq!(AtomColors::Cdk2d.foreground(), BLACK);
        assert_eq!(AtomColors::Uniform(RED).foreground(), RED);
        assert_ne!(AtomColors::Cdk2d.color_of(8), BLACK);
    }
}
