use serde::{Deserialize, Serialize};

/// A named rectangular sub-image within a [`Page`].
///
/// `xy` and `size` describe the stored rectangle as it lies in the page
/// bitmap, pre-rotation. `orig`/`offset` carry the un-trimmed sprite extent
/// and its placement delta so a consumer can reposition the cropped pixels as
/// if nothing had been trimmed away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    /// Top-left position in the owning page (stored, pre-rotation).
    pub xy: (i32, i32),
    /// Stored width/height (pre-rotation).
    pub size: (u32, u32),
    /// Un-trimmed original width/height; equals `size` when never trimmed.
    pub orig: (u32, u32),
    /// Placement delta from the un-trimmed sprite's top-left.
    pub offset: (i32, i32),
    /// True if the stored rectangle is rotated 90 degrees in the page.
    pub rotate: bool,
    /// Sequence number; -1 means not part of a numbered sequence.
    pub index: i32,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xy: (0, 0),
            size: (0, 0),
            orig: (0, 0),
            offset: (0, 0),
            rotate: false,
            index: -1,
        }
    }
}

/// One source bitmap and the regions laid out across it.
///
/// `name` is the bitmap filename and doubles as the lookup key for the
/// collaborator-provided bitmap map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub name: String,
    /// Page dimensions; may be unknown until the bitmap itself is decoded.
    pub size: Option<(u32, u32)>,
    /// Free-form pixel format tag, e.g. "RGBA8888".
    pub format: String,
    /// (min, mag) filter names.
    pub filter: (String, String),
    pub repeat: String,
    pub regions: Vec<Region>,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            format: String::new(),
            filter: (String::new(), String::new()),
            repeat: String::new(),
            regions: Vec::new(),
        }
    }
}

/// Parsed sidecar: ordered pages, each owning its regions in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Atlas {
    pub pages: Vec<Page>,
}

impl Atlas {
    /// Linear scan across pages and regions in parse order; the first region
    /// with a matching name wins, so duplicate names resolve to the earliest
    /// occurrence.
    pub fn find_region(&self, name: &str) -> Option<(&Page, &Region)> {
        for page in &self.pages {
            for region in &page.regions {
                if region.name == name {
                    return Some((page, region));
                }
            }
        }
        None
    }

    /// All region names in parse order.
    pub fn region_names(&self) -> Vec<String> {
        self.pages
            .iter()
            .flat_map(|p| p.regions.iter().map(|r| r.name.clone()))
            .collect()
    }

    pub fn region_count(&self) -> usize {
        self.pages.iter().map(|p| p.regions.len()).sum()
    }
}

/// A region's placement within the repacked composite canvas.
///
/// `width`/`height` are the stored dimensions after any pack-time rotation;
/// `orig`, `offset` and `index` are carried through from the source region
/// untouched; packing never alters trim metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackedRegion {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// True if the sprite was rotated 90 degrees when placed.
    pub rotate: bool,
    pub orig: (u32, u32),
    pub offset: (i32, i32),
    pub index: i32,
}
