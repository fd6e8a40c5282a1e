//! Câmera sintética: simula um ciclo dia/noite sem hardware

use std::f64::consts::PI;
use serde::{Deserialize, Serialize};
use daylight_core::{CameraSource, CaptureError, ImageBuffer, PixelFormat};
use crate::error::{PhotonicError, PhotonicResult};

/// Configuração da câmera sintética
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Quadros por ciclo completo noite → dia → noite
    pub frames_per_cycle: u32,
    /// Falha transitória a cada N quadros (0 = nunca)
    pub fail_every: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            format: PixelFormat::Rgb8,
            frames_per_cycle: 120,
            fail_every: 0,
        }
    }
}

/// Câmera que gera quadros com gradiente horizontal e nível de luz senoidal
#[derive(Debug, Clone)]
pub struct SyntheticCamera {
    config: SyntheticConfig,
    frame_count: u64,
    attempts: u64,
}

impl SyntheticCamera {
    pub fn new() -> PhotonicResult<Self> {
        Self::with_config(SyntheticConfig::default())
    }

    pub fn with_config(config: SyntheticConfig) -> PhotonicResult<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(PhotonicError::InvalidConfig(
                "Width and height must be > 0".into(),
            ));
        }
        if config.frames_per_cycle == 0 {
            return Err(PhotonicError::InvalidConfig(
                "frames_per_cycle must be > 0".into(),
            ));
        }

        Ok(Self {
            config,
            frame_count: 0,
            attempts: 0,
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Quadros entregues com sucesso
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Nível de luz [0, 1] do quadro `n`: 0 na noite, 1 no meio-dia
    pub fn daylight_level(&self, n: u64) -> f64 {
        let phase = (n % self.config.frames_per_cycle as u64) as f64
            / self.config.frames_per_cycle as f64;
        (1.0 - (2.0 * PI * phase).cos()) / 2.0
    }

    fn render(&self, level: f64) -> ImageBuffer {
        let SyntheticConfig { width, height, format, .. } = self.config;
        let bpp = format.bytes_per_pixel();
        let mut data = Vec::with_capacity(width as usize * height as usize * bpp);

        for _y in 0..height {
            for x in 0..width {
                // Gradiente: borda direita 25% mais clara
                let fx = x as f64 / width as f64;
                let v = level * (0.75 + 0.25 * fx) * 255.0;
                // Noite puxa para o vermelho, dia para o azul
                let rgb = [v, v * 0.95, v * (0.7 + 0.3 * level)].map(|c| c.round().clamp(0.0, 255.0) as u8);

                match format {
                    PixelFormat::Rgb8 => data.extend_from_slice(&rgb),
                    PixelFormat::Bgr8 => data.extend_from_slice(&[rgb[2], rgb[1], rgb[0]]),
                    PixelFormat::Rgba8 => data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]),
                    PixelFormat::Gray8 => data.push(((rgb[0] as u16 + rgb[1] as u16 + rgb[2] as u16) / 3) as u8),
                }
            }
        }

        ImageBuffer::new(width, height, format, data)
    }
}

impl CameraSource for SyntheticCamera {
    fn fetch_frame(&mut self) -> Result<ImageBuffer, CaptureError> {
        self.attempts += 1;

        let every = self.config.fail_every as u64;
        if every > 0 && self.attempts % every == 0 {
            return Err(CaptureError::transient(format!(
                "synthetic dropout on attempt {}",
                self.attempts
            )));
        }

        let frame = self.render(self.daylight_level(self.frame_count));
        self.frame_count += 1;
        Ok(frame)
    }

    fn name(&self) -> &str {
        "synthetic-camera"
    }
}
