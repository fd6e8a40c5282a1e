//! Cor RGB de 8 bits por canal

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::ColorParseError;

/// Canal de cor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Cor RGB (0-255 por canal)
///
/// Tipo valor: duas cores são a mesma cor se todos os canais forem iguais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Cria cor a partir de componentes em ponto flutuante (arredonda e satura em 0..=255)
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: channel_from_f32(r),
            g: channel_from_f32(g),
            b: channel_from_f32(b),
        }
    }

    /// Cria cor a partir de `0xRRGGBB`
    pub const fn from_u32(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Retorna `0xRRGGBB`
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Componentes como array `[r, g, b]`
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub const fn from_array(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    /// Soma dos canais, usada como medida grosseira de brilho
    pub fn brightness_sum(self) -> u16 {
        self.r as u16 + self.g as u16 + self.b as u16
    }

    /// Distância absoluta por canal
    pub fn channel_delta(self, other: Color) -> [u8; 3] {
        [
            self.r.abs_diff(other.r),
            self.g.abs_diff(other.g),
            self.b.abs_diff(other.b),
        ]
    }

    /// Maior distância entre canais (norma de Chebyshev)
    pub fn max_channel_delta(self, other: Color) -> u8 {
        self.channel_delta(other).into_iter().max().unwrap_or(0)
    }

    /// Todos os canais diferem menos que `tolerance`?
    pub fn within_tolerance(self, other: Color, tolerance: u8) -> bool {
        self.channel_delta(other).iter().all(|&d| d < tolerance)
    }

    /// Multiplica todos os canais por `factor` (0.0..=1.0)
    pub fn scaled(self, factor: f32) -> Color {
        let f = factor.clamp(0.0, 1.0);
        Color::from_f32(self.r as f32 * f, self.g as f32 * f, self.b as f32 * f)
    }

    /// Interpolação linear entre `self` (t=0) e `other` (t=1)
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| a as f32 + (b as f32 - a as f32) * t;
        Color::from_f32(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Canal dominante (empates resolvidos na ordem R, G, B)
    pub fn dominant_channel(self) -> Channel {
        if self.r >= self.g && self.r >= self.b {
            Channel::Red
        } else if self.g >= self.b {
            Channel::Green
        } else {
            Channel::Blue
        }
    }

    /// Formato `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn channel_from_f32(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Aceita `ff8800`, `#FF8800` ou `r,g,b`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(ColorParseError::ComponentCount(parts.len()));
            }
            let mut rgb = [0u8; 3];
            for (slot, part) in rgb.iter_mut().zip(&parts) {
                *slot = part
                    .parse::<u8>()
                    .map_err(|_| ColorParseError::Component(part.to_string()))?;
            }
            return Ok(Color::from_array(rgb));
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError::HexLength(hex.len()));
        }
        let value = u32::from_str_radix(hex, 16)
            .map_err(|_| ColorParseError::Hex(hex.to_string()))?;
        Ok(Color::from_u32(value))
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Color::from_array(rgb)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b)
    }
}
