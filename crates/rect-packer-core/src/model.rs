use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if the two rectangles share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        if self.w == 0 || self.h == 0 || r.w == 0 || r.h == 0 {
            return false;
        }
        self.x < r.x + r.w && r.x < self.x + self.w && self.y < r.y + r.h && r.y < self.y + self.h
    }
}

/// Where an image ended up after packing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    /// True if the image was rotated 90° when placed.
    pub rotated: bool,
}

/// One registered image.
///
/// The `packed_*` fields and `rotated` only describe the latest successful
/// pack; check `RectanglePacker::is_packed` before trusting them.
#[derive(Debug, Clone)]
pub struct PackItem<T> {
    pub name: String,
    /// Source width in pixels (before padding).
    pub width: u32,
    /// Source height in pixels (before padding).
    pub height: u32,
    pub user_tag: T,
    pub packed_x: u32,
    pub packed_y: u32,
    pub rotated: bool,
    pub packed: bool,
}

impl<T> PackItem<T> {
    pub(crate) fn new(name: String, width: u32, height: u32, user_tag: T) -> Self {
        Self {
            name,
            width,
            height,
            user_tag,
            packed_x: 0,
            packed_y: 0,
            rotated: false,
            packed: false,
        }
    }

    /// Size as placed: width and height swap when rotated.
    pub fn footprint(&self) -> (u32, u32) {
        if self.rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    pub fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }

    pub(crate) fn reset_placement(&mut self) {
        self.packed_x = 0;
        self.packed_y = 0;
        self.rotated = false;
        self.packed = false;
    }
}

/// Borrowed view of a packed image, yielded by `RectanglePacker::iter_packed`.
#[derive(Debug, Clone, Copy)]
pub struct PackedImage<'a, T> {
    pub name: &'a str,
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
    pub user_tag: &'a T,
}

impl<T> PackedImage<'_, T> {
    /// Placed rectangle without padding (post-rotation width/height).
    pub fn frame(&self) -> Rect {
        if self.rotated {
            Rect::new(self.x, self.y, self.height, self.width)
        } else {
            Rect::new(self.x, self.y, self.width, self.height)
        }
    }

    pub fn placement(&self) -> Placement {
        Placement {
            x: self.x,
            y: self.y,
            rotated: self.rotated,
        }
    }
}

/// Atlas-level metadata (common fields used by exporters).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meta {
    pub app: String,
    pub version: String,
    pub format: String,
    pub method: String,
    pub power_of_two: bool,
    pub max_dim: (u32, u32),
    pub padding: u32,
    pub allow_rotation: bool,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            app: "rect-packer".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            format: "RGBA8888".into(),
            method: "shelf".into(),
            power_of_two: false,
            max_dim: (0, 0),
            padding: 0,
            allow_rotation: false,
        }
    }
}

impl From<&crate::config::PackerConfig> for Meta {
    fn from(cfg: &crate::config::PackerConfig) -> Self {
        Self {
            method: cfg.method.effective().as_str().into(),
            power_of_two: cfg.power_of_two,
            max_dim: (cfg.max_width, cfg.max_height),
            padding: cfg.padding,
            allow_rotation: cfg.allow_rotation,
            ..Default::default()
        }
    }
}

/// Statistics about packing efficiency.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    /// Number of registered images.
    pub num_items: usize,
    /// Number of images holding a placement from the latest pack.
    pub num_packed: usize,
    /// Number of packed images that were rotated.
    pub num_rotated: usize,
    pub packed_width: u32,
    pub packed_height: u32,
    /// Sum of unpadded packed image areas.
    pub used_area: u64,
    /// `packed_width * packed_height`.
    pub total_area: u64,
    /// used_area / total_area (0.0 to 1.0).
    pub efficiency: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Images: {}/{}, Size: {}x{}, Efficiency: {:.2}%, Used Area: {} px², Total Area: {} px², Rotated: {}",
            self.num_packed,
            self.num_items,
            self.packed_width,
            self.packed_height,
            self.efficiency * 100.0,
            self.used_area,
            self.total_area,
            self.num_rotated,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_area > 0 {
            (self.wasted_area() as f64 / self.total_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
