use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Packing strategies.
///
/// Only `Shelf` has an implementation; the other variants are accepted so
/// configuration files stay forward compatible, and pack with `Shelf`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PackMethod {
    /// Rows of fixed height filled left-to-right, tallest items first.
    #[default]
    Shelf,
    /// Free-rectangle list (not implemented yet, packs as `Shelf`).
    MaxRects,
    /// Guillotine splitting (not implemented yet, packs as `Shelf`).
    Guillotine,
}

impl PackMethod {
    /// Whether this method has its own placement implementation.
    pub fn is_implemented(self) -> bool {
        matches!(self, Self::Shelf)
    }

    /// The method that will actually run for this selection.
    pub fn effective(self) -> Self {
        if self.is_implemented() {
            self
        } else {
            Self::Shelf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shelf => "shelf",
            Self::MaxRects => "maxrects",
            Self::Guillotine => "guillotine",
        }
    }
}

impl FromStr for PackMethod {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shelf" => Ok(Self::Shelf),
            "maxrects" | "max_rects" => Ok(Self::MaxRects),
            "guillotine" => Ok(Self::Guillotine),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// Pixels reserved to the right of and below every item.
    #[serde(default)]
    pub padding: u32,
    #[serde(default)]
    pub method: PackMethod,
    /// Round final width and height up to powers of two.
    #[serde(default)]
    pub power_of_two: bool,
    /// Try 90° rotated orientations when the upright one does not fit.
    #[serde(default)]
    pub allow_rotation: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_width: 1024,
            max_height: 1024,
            padding: 0,
            method: PackMethod::Shelf,
            power_of_two: false,
            allow_rotation: false,
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns `InvalidDimensions` if either maximum dimension is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(crate::error::PackerError::InvalidDimensions {
                width: self.max_width,
                height: self.max_height,
            });
        }
        Ok(())
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.max_width = w;
        self.cfg.max_height = h;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn method(mut self, v: PackMethod) -> Self {
        self.cfg.method = v;
        self
    }
    pub fn pow2(mut self, v: bool) -> Self {
        self.cfg.power_of_two = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}
