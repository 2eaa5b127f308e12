//! Configuration schema types for `pxsprite.toml`
//!
//! ```toml
//! [palette]
//! colors = ["#000", "white", "rgb(255, 0, 0)"]
//! cell_size = 40
//! margin = 5
//!
//! [creator]
//! width = 16
//! height = 16
//! zoom = 20
//! grid = true
//!
//! [sheet]
//! tile_size = 16
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{parse_color, ColorError, DEFAULT_COLORS};
use crate::creator::CreatorOptions;
use crate::palette::Palette;
use crate::sheet::SheetOptions;
use crate::swatch::SwatchLayout;

/// Palette section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Seed colors as CSS color strings. Omitted means the built-in defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    /// Swatch geometry
    #[serde(flatten)]
    pub layout: SwatchLayout,
}

/// Root of `pxsprite.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub creator: CreatorOptions,
    #[serde(default)]
    pub sheet: SheetOptions,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "palette.colors[2]")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pxsprite.toml: '{}' {}", self.field, self.message)
    }
}

impl SpriteConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut positive = |field: &str, value: u32| {
            if value == 0 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a positive integer".to_string(),
                });
            }
        };

        positive("palette.cell_size", self.palette.layout.cell_size);
        positive("creator.width", self.creator.width);
        positive("creator.height", self.creator.height);
        positive("creator.zoom", self.creator.zoom);
        positive("sheet.tile_size", self.sheet.tile_size);

        // Both grid states must fit, since the overlay can be toggled later
        let bordered = CreatorOptions { grid: true, ..self.creator };
        if bordered.surface_size().is_none() {
            errors.push(ConfigValidationError {
                field: "creator".to_string(),
                message: "makes the drawing surface too large".to_string(),
            });
        }
        let seed_colors = self.palette.colors.as_ref().map_or(DEFAULT_COLORS.len(), Vec::len);
        if self.palette.layout.surface_size(seed_colors).is_none() {
            errors.push(ConfigValidationError {
                field: "palette".to_string(),
                message: "makes the swatch surface too large".to_string(),
            });
        }

        for (i, color) in self.palette.colors.iter().flatten().enumerate() {
            if let Err(e) = parse_color(color) {
                errors.push(ConfigValidationError {
                    field: format!("palette.colors[{}]", i),
                    message: format!("is not a valid color ({})", e),
                });
            }
        }

        errors
    }

    /// Build the seed palette described by `[palette]`.
    pub fn build_palette(&self) -> Result<Palette, ColorError> {
        match &self.palette.colors {
            Some(colors) => {
                let parsed = colors.iter().map(|c| parse_color(c)).collect::<Result<Vec<_>, _>>()?;
                Ok(Palette::new(parsed))
            }
            None => Ok(Palette::default()),
        }
    }
}
