use crate::richtext::structured_document::TextColor;
use serde::{Deserialize, Serialize};

/// Editor color themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    Light,
    #[default]
    Midnight,
    Graphite,
    Slate,
}

impl ThemeVariant {
    pub fn label(self) -> &'static str {
        match self {
            ThemeVariant::Light => "Light",
            ThemeVariant::Midnight => "Midnight",
            ThemeVariant::Graphite => "Graphite",
            ThemeVariant::Slate => "Slate",
        }
    }
}

/// Concrete RGBA colors used to render the editor surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: u32,
    pub foreground: u32,
    pub accent: u32,
}

const BLACK: u32 = 0x000000FF;
const WHITE: u32 = 0xFFFFFFFF;
const GREEN: u32 = 0x34C759FF;

impl Palette {
    pub fn for_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Light => Palette {
                background: 0xF2F2F5FF,
                foreground: 0x1F2126FF,
                accent: GREEN,
            },
            ThemeVariant::Midnight => Palette {
                background: 0x1A1A1CFF,
                foreground: WHITE,
                accent: GREEN,
            },
            ThemeVariant::Graphite => Palette {
                background: 0x1C1F24FF,
                foreground: WHITE,
                accent: GREEN,
            },
            ThemeVariant::Slate => Palette {
                background: 0x1A1C1FFF,
                foreground: WHITE,
                accent: GREEN,
            },
        }
    }

    /// Black or white, whichever stands out against the background
    pub fn contrasting_foreground(&self) -> u32 {
        if luminance(self.background) > 0.5 {
            BLACK
        } else {
            WHITE
        }
    }

    /// RGBA for default text. Never equal to the background.
    pub fn text_rgba(&self) -> u32 {
        if self.foreground == self.background {
            self.contrasting_foreground()
        } else {
            self.foreground
        }
    }

    /// Resolve a semantic color. An accent that matches the background falls
    /// back to the default text color.
    pub fn resolve(&self, color: TextColor) -> u32 {
        match color {
            TextColor::Default => self.text_rgba(),
            TextColor::Accent if self.accent != self.background => self.accent,
            TextColor::Accent => self.text_rgba(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_variant(ThemeVariant::default())
    }
}

/// Relative luminance in 0.0..=1.0 of an RGBA value
fn luminance(rgba: u32) -> f32 {
    let r = ((rgba >> 24) & 0xFF) as f32 / 255.0;
    let g = ((rgba >> 16) & 0xFF) as f32 / 255.0;
    let b = ((rgba >> 8) & 0xFF) as f32 / 255.0;
    0.2126 * r + 0.7152 * g + 0.0722 * b
}
