use super::Packer;
use crate::config::PackerConfig;
use crate::model::Placement;
use tracing::debug;

/// One horizontal row. Its height is fixed when the row is opened.
#[derive(Clone, Copy, Debug)]
struct ShelfRow {
    y: u32,
    height: u32,
    x_used: u32,
}

impl ShelfRow {
    #[inline]
    fn admits(&self, w: u32, h: u32, max_width: u32) -> bool {
        h <= self.height && self.x_used.saturating_add(w) <= max_width
    }
}

/// First-fit shelf packer.
///
/// Sizes passed to [`Packer::place`] already include padding. Rows are
/// scanned in creation order; an item that fits no row opens a new one
/// below the last.
pub struct ShelfPacker {
    max_width: u32,
    max_height: u32,
    allow_rotation: bool,
    shelves: Vec<ShelfRow>,
    total_width: u32,
    total_height: u32,
}

impl ShelfPacker {
    pub fn new(config: &PackerConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            allow_rotation: config.allow_rotation,
            shelves: Vec::new(),
            total_width: 0,
            total_height: 0,
        }
    }

    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    fn find_shelf(&self, w: u32, h: u32) -> Option<usize> {
        self.shelves
            .iter()
            .position(|s| s.admits(w, h, self.max_width))
    }

    fn place_in(&mut self, idx: usize, w: u32, rotated: bool) -> Placement {
        let shelf = &mut self.shelves[idx];
        let placement = Placement {
            x: shelf.x_used,
            y: shelf.y,
            rotated,
        };
        shelf.x_used += w;
        self.total_width = self.total_width.max(shelf.x_used);
        placement
    }

    fn open_shelf(&mut self, w: u32, h: u32, rotated: bool) -> Option<Placement> {
        let y = self.shelves.last().map_or(0, |s| s.y + s.height);
        if w > self.max_width || y.checked_add(h)? > self.max_height {
            return None;
        }
        debug!(y, height = h, "opening shelf");
        self.shelves.push(ShelfRow {
            y,
            height: h,
            x_used: w,
        });
        self.total_width = self.total_width.max(w);
        self.total_height = y + h;
        Some(Placement { x: 0, y, rotated })
    }
}

impl Packer for ShelfPacker {
    fn place(&mut self, w: u32, h: u32) -> Option<Placement> {
        if let Some(idx) = self.find_shelf(w, h) {
            return Some(self.place_in(idx, w, false));
        }
        if self.allow_rotation && w != h {
            if let Some(idx) = self.find_shelf(h, w) {
                return Some(self.place_in(idx, h, true));
            }
        }
        if let Some(p) = self.open_shelf(w, h, false) {
            return Some(p);
        }
        if self.allow_rotation && w != h {
            return self.open_shelf(h, w, true);
        }
        None
    }

    fn extent(&self) -> (u32, u32) {
        (self.total_width, self.total_height)
    }
}
