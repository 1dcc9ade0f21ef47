//! Downstream atlas contract and the in-crate atlas model.
//!
//! `RectanglePacker::create_atlas` only talks to [`AtlasTarget`], so engines
//! can plug in their own atlas/texture types. [`Atlas`] is the plain-data
//! implementation used by the exporters and the CLI.

use crate::model::{Meta, Rect};
use serde::{Deserialize, Serialize};

/// A named rectangular region created inside an atlas.
pub trait AtlasRegion {
    fn set_rotated(&mut self, rotated: bool);
}

/// Anything that can be filled from a packing result.
pub trait AtlasTarget {
    type Region: AtlasRegion;

    /// Creates an empty atlas called `name`.
    fn named(name: &str) -> Self;
    fn set_size(&mut self, width: u32, height: u32);
    /// Adds a region and returns it so the caller can finish configuring it.
    fn add_region_rect(&mut self, name: &str, x: u32, y: u32, w: u32, h: u32)
    -> &mut Self::Region;
}

/// A region of an [`Atlas`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    /// Placed rectangle within the atlas (post-rotation width/height).
    pub frame: Rect,
    /// True if the source image is stored rotated 90° clockwise.
    pub rotated: bool,
}

impl Region {
    /// Original (unrotated) image size.
    pub fn source_size(&self) -> (u32, u32) {
        if self.rotated {
            (self.frame.h, self.frame.w)
        } else {
            (self.frame.w, self.frame.h)
        }
    }

    /// Normalized `(u0, v0, u1, v1)` texture coordinates within an atlas of
    /// `width x height`. Returns zeros for an empty atlas.
    pub fn uv(&self, width: u32, height: u32) -> (f32, f32, f32, f32) {
        if width == 0 || height == 0 {
            return (0.0, 0.0, 0.0, 0.0);
        }
        let (w, h) = (width as f32, height as f32);
        (
            self.frame.x as f32 / w,
            self.frame.y as f32 / h,
            (self.frame.x + self.frame.w) as f32 / w,
            (self.frame.y + self.frame.h) as f32 / h,
        )
    }
}

impl AtlasRegion for Region {
    fn set_rotated(&mut self, rotated: bool) {
        self.rotated = rotated;
    }
}

/// Single-texture atlas: size, regions in insertion order and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Atlas {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub regions: Vec<Region>,
    pub meta: Meta,
}

impl Atlas {
    /// Looks up a region by name.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl AtlasTarget for Atlas {
    type Region = Region;

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            width: 0,
            height: 0,
            regions: Vec::new(),
            meta: Meta::default(),
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn add_region_rect(&mut self, name: &str, x: u32, y: u32, w: u32, h: u32) -> &mut Region {
        self.regions.push(Region {
            name: name.to_string(),
            frame: Rect::new(x, y, w, h),
            rotated: false,
        });
        let last = self.regions.len() - 1;
        &mut self.regions[last]
    }
}
