//! Core library for packing named rectangles into a single texture atlas.
//!
//! - Registry: `RectanglePacker` owns named images with an opaque per-image tag
//! - Algorithm: shelf packing, tallest first, optional padding, power-of-two and rotation
//! - Results: per-image placement, packed size, efficiency, atlas construction and iteration
//! - Exporters (JSON/Plist) and RGBA compositing (feature `image`) build on the result.
//!
//! Quick example:
//! ```
//! use rect_packer_core::prelude::*;
//! # fn main() -> rect_packer_core::Result<()> {
//! let mut packer: RectanglePacker<()> = RectanglePacker::new();
//! packer.set_max_size(128, 256)?;
//! packer.add_image("a", 64, 32, ())?;
//! packer.add_image("b", 32, 32, ())?;
//! packer.add_image("c", 64, 64, ())?;
//! packer.pack()?;
//! assert_eq!(packer.packed_size(), (128, 96));
//! let atlas: Atlas = packer.build_atlas("ui")?;
//! assert_eq!(atlas.regions.len(), 3);
//! # Ok(()) }
//! ```

pub mod atlas;
#[cfg(feature = "image")]
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod export_plist;
pub mod model;
pub mod packer;

pub use atlas::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use export_plist::*;
pub use model::*;
pub use packer::*;

/// Convenience prelude for common types and functions.
/// Importing `rect_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::atlas::{Atlas, AtlasRegion, AtlasTarget, Region};
    #[cfg(feature = "image")]
    pub use crate::compositing::compose_rgba;
    pub use crate::config::{PackMethod, PackerConfig, PackerConfigBuilder};
    pub use crate::error::PackerError;
    pub use crate::model::{PackItem, PackStats, PackedImage, Placement, Rect};
    pub use crate::packer::RectanglePacker;
    pub use crate::{to_json_array, to_json_hash, to_plist_hash};
}
