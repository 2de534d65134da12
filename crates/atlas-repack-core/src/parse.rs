//! Sidecar text parser.
//!
//! The grammar is line-oriented with implicit context: a non-indented line
//! ending in a page-image suffix opens a page, `key: value` lines fill the
//! current page or region, and any other non-indented line names a region.
//! The parser is a single forward pass over the lines with an explicit
//! three-state machine; an in-progress region is flushed whenever a boundary
//! line (new region or new page) or end of input is reached.
//!
//! Faults are recovered locally: a malformed value drops only that key, a
//! property-less region is dropped as stray text, a region before any page is
//! dropped. Each recovery is reported through [`Diagnostics`].

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::diag::Diagnostics;
use crate::error::Result;
use crate::model::{Atlas, Page, Region};

/// Suffixes that mark a non-indented line as the start of a new page.
pub const PAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    ExpectPageOrRegion,
    InPageProperties,
    InRegionProperties,
}

struct RegionDraft {
    region: Region,
    orig_set: bool,
    props_seen: bool,
}

impl RegionDraft {
    fn new(name: &str) -> Self {
        Self {
            region: Region::new(name),
            orig_set: false,
            props_seen: false,
        }
    }
}

/// Line-fed sidecar parser. Feed raw lines (newline stripped, leading spaces
/// preserved) in order, then call [`AtlasParser::finish`].
pub struct AtlasParser<'d> {
    diag: &'d dyn Diagnostics,
    state: ParserState,
    pages: Vec<Page>,
    page: Option<Page>,
    draft: Option<RegionDraft>,
}

impl<'d> AtlasParser<'d> {
    pub fn new(diag: &'d dyn Diagnostics) -> Self {
        Self {
            diag,
            state: ParserState::ExpectPageOrRegion,
            pages: Vec::new(),
            page: None,
            draft: None,
        }
    }

    /// Process one line. Boundary lines that close a region are handled and
    /// then reinterpreted in the same call, so the caller never re-feeds.
    pub fn feed(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            // Blank lines separate blocks but terminate nothing.
            return;
        }

        if self.state == ParserState::InRegionProperties {
            if line.starts_with("  ") {
                if trimmed.contains(':') {
                    self.region_property(trimmed);
                } else {
                    self.diag.stray_line(line);
                }
                return;
            }
            if line.starts_with(' ') {
                // One leading space: neither a property line nor a boundary.
                self.diag.stray_line(line);
                return;
            }
            // Non-indented, non-blank: the region block is over. Flush and
            // reinterpret this line below.
            self.flush_region();
            self.state = ParserState::ExpectPageOrRegion;
        }

        if !line.starts_with(' ') && is_page_name(trimmed) {
            self.flush_region();
            self.flush_page();
            self.page = Some(Page::new(trimmed));
            self.state = ParserState::InPageProperties;
            return;
        }

        if self.state == ParserState::InPageProperties {
            if trimmed.contains(':') {
                self.page_property(trimmed);
                return;
            }
            // First non-key:value line ends the page property block; it is
            // the name of a region, handled below.
            self.state = ParserState::ExpectPageOrRegion;
        }

        if line.starts_with(' ') || trimmed.contains(':') {
            self.diag.stray_line(line);
            return;
        }

        if self.page.is_none() {
            self.diag.region_without_page(trimmed);
            return;
        }
        self.flush_region();
        self.draft = Some(RegionDraft::new(trimmed));
        self.state = ParserState::InRegionProperties;
    }

    /// Flush any in-progress region and page and return the parsed model.
    pub fn finish(mut self) -> Atlas {
        self.flush_page();
        Atlas { pages: self.pages }
    }

    fn page_property(&mut self, trimmed: &str) {
        let Some((key, value)) = split_property(trimmed) else {
            return;
        };
        let Some(page) = self.page.as_mut() else {
            return;
        };
        match key {
            "size" => match parse_pair::<u32>(value) {
                Some(pair) => page.size = Some(pair),
                None => self.diag.format_error("page", key, value),
            },
            "format" => page.format = value.to_string(),
            "filter" => match value.split_once(',') {
                Some((min, mag)) => {
                    page.filter = (min.trim().to_string(), mag.trim().to_string());
                }
                None => self.diag.format_error("page", key, value),
            },
            "repeat" => page.repeat = value.to_string(),
            // Unknown page keys are ignored for forward compatibility.
            _ => {}
        }
    }

    fn region_property(&mut self, trimmed: &str) {
        let Some((key, value)) = split_property(trimmed) else {
            return;
        };
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        // Any key:value line counts as a property sighting, even when the
        // value turns out to be malformed; only the value itself is dropped.
        draft.props_seen = true;
        let name = draft.region.name.clone();
        match key {
            "rotate" => {
                if value.eq_ignore_ascii_case("true") {
                    draft.region.rotate = true;
                } else if value.eq_ignore_ascii_case("false") {
                    draft.region.rotate = false;
                } else {
                    self.diag.format_error(&name, key, value);
                }
            }
            "xy" => match parse_pair::<i32>(value) {
                Some(pair) => draft.region.xy = pair,
                None => self.diag.format_error(&name, key, value),
            },
            "size" => match parse_pair::<u32>(value) {
                Some(pair) => draft.region.size = pair,
                None => self.diag.format_error(&name, key, value),
            },
            "orig" => match parse_pair::<u32>(value) {
                Some(pair) => {
                    draft.region.orig = pair;
                    draft.orig_set = true;
                }
                None => self.diag.format_error(&name, key, value),
            },
            "offset" => match parse_pair::<i32>(value) {
                Some(pair) => draft.region.offset = pair,
                None => self.diag.format_error(&name, key, value),
            },
            "index" => match value.parse::<i32>() {
                Ok(v) => draft.region.index = v,
                Err(_) => self.diag.format_error(&name, key, value),
            },
            _ => {}
        }
    }

    fn flush_region(&mut self) {
        let Some(mut draft) = self.draft.take() else {
            return;
        };
        if !draft.props_seen {
            // Stray text, not a real entry.
            self.diag.empty_region(&draft.region.name);
            return;
        }
        if !draft.orig_set {
            draft.region.orig = draft.region.size;
        }
        if let Some(page) = self.page.as_mut() {
            page.regions.push(draft.region);
        } else {
            self.diag.region_without_page(&draft.region.name);
        }
    }

    fn flush_page(&mut self) {
        self.flush_region();
        if let Some(page) = self.page.take() {
            self.pages.push(page);
        }
        self.state = ParserState::ExpectPageOrRegion;
    }
}

/// Parse sidecar text into the page/region model. Never fails: every fault in
/// the text is recovered locally and reported through `diag`.
pub fn parse_atlas(text: &str, diag: &dyn Diagnostics) -> Atlas {
    let mut parser = AtlasParser::new(diag);
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Read and parse a sidecar file. An unreadable file aborts only this parse.
pub fn parse_file(path: impl AsRef<Path>, diag: &dyn Diagnostics) -> Result<Atlas> {
    let text = fs::read_to_string(path)?;
    Ok(parse_atlas(&text, diag))
}

fn is_page_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    PAGE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

fn split_property(trimmed: &str) -> Option<(&str, &str)> {
    let (key, value) = trimmed.split_once(':')?;
    Some((key.trim(), value.trim()))
}

fn parse_pair<T: FromStr>(value: &str) -> Option<(T, T)> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let (a, b) = compact.split_once(',')?;
    Some((a.parse().ok()?, b.parse().ok()?))
}
