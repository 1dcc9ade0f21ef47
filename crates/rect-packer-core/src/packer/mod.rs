use crate::atlas::{Atlas, AtlasRegion, AtlasTarget};
use crate::config::{PackMethod, PackerConfig};
use crate::error::{PackerError, Result};
use crate::model::{Meta, PackItem, PackStats, PackedImage, Placement};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

pub mod shelf;

use shelf::ShelfPacker;

/// A placement strategy fills one region item by item.
///
/// Implementations must never return overlapping placements and must keep
/// every placement inside their configured bounds. Sizes include padding.
pub trait Packer {
    /// Places a `w x h` item, or returns `None` when it cannot fit.
    fn place(&mut self, w: u32, h: u32) -> Option<Placement>;
    /// Width and height covered by everything placed so far.
    fn extent(&self) -> (u32, u32);
}

/// Registry of named rectangles plus the latest packing result.
///
/// `T` is an opaque per-image tag handed back by lookups (an image handle,
/// a file path, `()`...). The packer never inspects it.
#[derive(Debug, Clone)]
pub struct RectanglePacker<T = ()> {
    cfg: PackerConfig,
    items: Vec<PackItem<T>>,
    index: HashMap<String, usize>,
    packed_width: u32,
    packed_height: u32,
    is_packed: bool,
}

impl<T> Default for RectanglePacker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RectanglePacker<T> {
    /// Creates an empty packer with the default configuration.
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
            items: Vec::new(),
            index: HashMap::new(),
            packed_width: 0,
            packed_height: 0,
            is_packed: false,
        }
    }

    /// Creates an empty packer after validating `cfg`.
    pub fn with_config(cfg: PackerConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &PackerConfig {
        &self.cfg
    }

    // ---------- configuration ----------

    pub fn set_max_size(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(PackerError::InvalidDimensions { width, height });
        }
        self.cfg.max_width = width;
        self.cfg.max_height = height;
        self.invalidate();
        Ok(())
    }

    pub fn set_padding(&mut self, padding: u32) {
        self.cfg.padding = padding;
        self.invalidate();
    }

    /// Selects the packing method. Methods without an implementation pack
    /// as [`PackMethod::Shelf`].
    pub fn set_method(&mut self, method: PackMethod) {
        if !method.is_implemented() {
            debug!(
                method = method.as_str(),
                "method not implemented, packing will use shelf"
            );
        }
        self.cfg.method = method;
        self.invalidate();
    }

    pub fn set_power_of_two(&mut self, v: bool) {
        self.cfg.power_of_two = v;
        self.invalidate();
    }

    pub fn set_allow_rotation(&mut self, v: bool) {
        self.cfg.allow_rotation = v;
        self.invalidate();
    }

    // ---------- registry ----------

    /// Registers an image. Fails without touching the registry when the name
    /// is taken or a dimension is zero.
    pub fn add_image(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        user_tag: T,
    ) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(PackerError::DuplicateImage(name));
        }
        if width == 0 || height == 0 {
            return Err(PackerError::InvalidImageSize {
                name,
                width,
                height,
            });
        }
        self.index.insert(name.clone(), self.items.len());
        self.items.push(PackItem::new(name, width, height, user_tag));
        self.invalidate();
        Ok(())
    }

    /// Removes an image and returns it.
    pub fn remove_image(&mut self, name: &str) -> Result<PackItem<T>> {
        let idx = self
            .index
            .remove(name)
            .ok_or_else(|| PackerError::UnknownImage(name.to_string()))?;
        let item = self.items.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        self.invalidate();
        Ok(item)
    }

    /// Removes every image and resets the packed size.
    pub fn clear_images(&mut self) {
        self.items.clear();
        self.index.clear();
        self.packed_width = 0;
        self.packed_height = 0;
        self.invalidate();
    }

    pub fn image_count(&self) -> usize {
        self.items.len()
    }

    pub fn contains_image(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered images in insertion order.
    pub fn items(&self) -> &[PackItem<T>] {
        &self.items
    }

    fn item(&self, name: &str) -> Option<&PackItem<T>> {
        self.index.get(name).map(|&i| &self.items[i])
    }

    fn invalidate(&mut self) {
        self.is_packed = false;
    }

    // ---------- packing ----------

    /// Computes placements for every registered image from scratch.
    ///
    /// Either every image is placed, or the call fails and the packer is left
    /// unpacked with a zero packed size.
    #[instrument(skip_all, fields(items = self.items.len()))]
    pub fn pack(&mut self) -> Result<()> {
        if self.items.is_empty() {
            return Err(PackerError::Empty);
        }
        self.is_packed = false;
        self.packed_width = 0;
        self.packed_height = 0;
        for item in &mut self.items {
            item.reset_placement();
        }

        let mut packer = self.strategy();
        let result = self
            .place_all(packer.as_mut())
            .and_then(|extent| self.round_extent(extent));

        match result {
            Ok((w, h)) => {
                self.packed_width = w;
                self.packed_height = h;
                self.is_packed = true;
                debug!(
                    width = w,
                    height = h,
                    efficiency = self.efficiency(),
                    "packed"
                );
                Ok(())
            }
            Err(e) => {
                for item in &mut self.items {
                    item.reset_placement();
                }
                Err(e)
            }
        }
    }

    fn round_extent(&self, (w, h): (u32, u32)) -> Result<(u32, u32)> {
        if !self.cfg.power_of_two {
            return Ok((w, h));
        }
        match (next_pow2(w), next_pow2(h)) {
            (Some(pw), Some(ph)) => Ok((pw, ph)),
            _ => Err(PackerError::SizeOverflow {
                width: w,
                height: h,
            }),
        }
    }

    fn strategy(&self) -> Box<dyn Packer> {
        match self.cfg.method {
            PackMethod::Shelf => Box::new(ShelfPacker::new(&self.cfg)),
            PackMethod::MaxRects | PackMethod::Guillotine => {
                warn!(
                    method = self.cfg.method.as_str(),
                    "packing method not implemented, falling back to shelf"
                );
                Box::new(ShelfPacker::new(&self.cfg))
            }
        }
    }

    /// Places items tallest-first. Equal heights keep registration order.
    fn place_all(&mut self, packer: &mut dyn Packer) -> Result<(u32, u32)> {
        let pad = self.cfg.padding;
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by(|&a, &b| self.items[b].height.cmp(&self.items[a].height));

        for idx in order {
            let item = &mut self.items[idx];
            let w = item.width.saturating_add(pad);
            let h = item.height.saturating_add(pad);
            let Some(p) = packer.place(w, h) else {
                return Err(PackerError::DoesNotFit {
                    name: item.name.clone(),
                    width: item.width,
                    height: item.height,
                });
            };
            item.packed_x = p.x;
            item.packed_y = p.y;
            item.rotated = p.rotated;
            item.packed = true;
        }
        Ok(packer.extent())
    }

    // ---------- results ----------

    pub fn is_packed(&self) -> bool {
        self.is_packed
    }

    pub fn packed_width(&self) -> u32 {
        if self.is_packed { self.packed_width } else { 0 }
    }

    pub fn packed_height(&self) -> u32 {
        if self.is_packed { self.packed_height } else { 0 }
    }

    pub fn packed_size(&self) -> (u32, u32) {
        (self.packed_width(), self.packed_height())
    }

    /// Unpadded packed area divided by the packed region area, in `[0, 1]`.
    pub fn efficiency(&self) -> f64 {
        let total = (self.packed_width() as u64) * (self.packed_height() as u64);
        if total == 0 {
            return 0.0;
        }
        let used: u64 = self.iter_packed().map(|p| p.frame().area()).sum();
        used as f64 / total as f64
    }

    /// Placement of `name`, if it is registered and the packer is packed.
    pub fn image_position(&self, name: &str) -> Option<Placement> {
        if !self.is_packed {
            return None;
        }
        self.item(name).filter(|it| it.packed).map(|it| Placement {
            x: it.packed_x,
            y: it.packed_y,
            rotated: it.rotated,
        })
    }

    /// The tag registered with `name`, packed or not.
    pub fn image_user_tag(&self, name: &str) -> Option<&T> {
        self.item(name).map(|it| &it.user_tag)
    }

    /// Packed images in registration order. Empty unless packed.
    pub fn iter_packed(&self) -> impl Iterator<Item = PackedImage<'_, T>> {
        let n = if self.is_packed { self.items.len() } else { 0 };
        self.items[..n]
            .iter()
            .filter(|it| it.packed)
            .map(|it| PackedImage {
                name: &it.name,
                width: it.width,
                height: it.height,
                x: it.packed_x,
                y: it.packed_y,
                rotated: it.rotated,
                user_tag: &it.user_tag,
            })
    }

    /// Builds an atlas of the packed size with one region per packed image.
    pub fn create_atlas<A: AtlasTarget>(&self, name: &str) -> Result<A> {
        if !self.is_packed {
            warn!(atlas = name, "create_atlas called before a successful pack");
            return Err(PackerError::NotPacked);
        }
        let mut atlas = A::named(name);
        atlas.set_size(self.packed_width, self.packed_height);
        for img in self.iter_packed() {
            let f = img.frame();
            atlas
                .add_region_rect(img.name, f.x, f.y, f.w, f.h)
                .set_rotated(img.rotated);
        }
        Ok(atlas)
    }

    /// [`create_atlas`](Self::create_atlas) into the in-crate [`Atlas`],
    /// with metadata describing the current configuration.
    pub fn build_atlas(&self, name: &str) -> Result<Atlas> {
        let mut atlas: Atlas = self.create_atlas(name)?;
        atlas.meta = Meta::from(&self.cfg);
        Ok(atlas)
    }

    pub fn stats(&self) -> PackStats {
        let mut stats = PackStats {
            num_items: self.items.len(),
            packed_width: self.packed_width(),
            packed_height: self.packed_height(),
            ..Default::default()
        };
        for img in self.iter_packed() {
            stats.num_packed += 1;
            if img.rotated {
                stats.num_rotated += 1;
            }
            stats.used_area += img.frame().area();
        }
        stats.total_area = (stats.packed_width as u64) * (stats.packed_height as u64);
        stats.efficiency = if stats.total_area > 0 {
            stats.used_area as f64 / stats.total_area as f64
        } else {
            0.0
        };
        stats
    }
}

/// Smallest power of two >= `v` (1 for 0), or `None` above `2^31`.
pub fn next_pow2(v: u32) -> Option<u32> {
    v.max(1).checked_next_power_of_two()
}
