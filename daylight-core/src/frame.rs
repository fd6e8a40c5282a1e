//! Quadro de imagem decodificado

use std::time::SystemTime;
use serde::{Deserialize, Serialize};

/// Layout dos bytes de cada pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    #[default]
    Rgb8,
    /// Ordem usada pelo OpenCV
    Bgr8,
    Rgba8,
    Gray8,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
            PixelFormat::Rgba8 => 4,
            PixelFormat::Gray8 => 1,
        }
    }

    /// Extrai `[r, g, b]` de um pixel no formato
    ///
    /// `px` deve ter exatamente `bytes_per_pixel()` bytes.
    #[inline]
    pub fn rgb_of(self, px: &[u8]) -> [u8; 3] {
        match self {
            PixelFormat::Rgb8 | PixelFormat::Rgba8 => [px[0], px[1], px[2]],
            PixelFormat::Bgr8 => [px[2], px[1], px[0]],
            PixelFormat::Gray8 => [px[0], px[0], px[0]],
        }
    }
}

/// Buffer de imagem entregue por uma [`CameraSource`](crate::traits::CameraSource)
///
/// Não é validado na construção: quem consome (o analisador) rejeita buffers
/// vazios, sem dimensão ou com tamanho inconsistente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
    /// Instante da captura
    pub captured_at: SystemTime,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            data,
            captured_at: SystemTime::now(),
        }
    }

    /// Quadro RGB de cor única
    pub fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 3);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self::new(width, height, PixelFormat::Rgb8, data)
    }

    pub fn with_timestamp(mut self, captured_at: SystemTime) -> Self {
        self.captured_at = captured_at;
        self
    }

    /// Número de pixels declarado pelas dimensões
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Tamanho em bytes esperado para as dimensões e o formato
    pub fn expected_len(&self) -> usize {
        self.pixel_count() * self.format.bytes_per_pixel()
    }
}
