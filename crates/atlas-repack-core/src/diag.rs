//! Injectable diagnostics observer.
//!
//! Parsing, extraction and packing recover from most faults locally (dropped
//! fields, clamped rectangles, skipped sprites). Those recoveries are worth
//! reporting but are not core logic, so they flow through this trait instead
//! of being logged inline; the algorithmic code stays pure and testable.

use tracing::{debug, warn};

/// Observer for recovered faults. All methods default to no-ops, so an
/// implementation only overrides the events it cares about.
pub trait Diagnostics: Sync {
    /// A malformed `key: value` pair; only that key was dropped.
    fn format_error(&self, context: &str, key: &str, value: &str) {
        let _ = (context, key, value);
    }
    /// A region-name line with no properties before the next boundary.
    fn empty_region(&self, name: &str) {
        let _ = name;
    }
    /// A region-start line encountered before any page line.
    fn region_without_page(&self, name: &str) {
        let _ = name;
    }
    /// A line no grammar rule claimed; it was skipped.
    fn stray_line(&self, line: &str) {
        let _ = line;
    }
    /// A region rectangle exceeded its page bitmap and was clamped.
    fn bounds_clamped(&self, name: &str, requested: (i32, i32, u32, u32), clamped: (u32, u32, u32, u32)) {
        let _ = (name, requested, clamped);
    }
    /// Extraction failed past recovery; a placeholder sprite was substituted.
    fn extract_fallback(&self, name: &str) {
        let _ = name;
    }
    /// A requested region name was not present in the atlas.
    fn lookup_failed(&self, name: &str) {
        let _ = name;
    }
    /// No free node could hold the sprite in either orientation.
    fn unplaced(&self, name: &str, width: u32, height: u32) {
        let _ = (name, width, height);
    }
    /// Nothing was placed; a minimal fallback canvas was emitted.
    fn composite_fallback(&self) {}
}

/// No-op observer for callers that do not want diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiag;

impl Diagnostics for NullDiag {}

/// Observer that forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiag;

impl Diagnostics for TracingDiag {
    fn format_error(&self, context: &str, key: &str, value: &str) {
        warn!(context, key, value, "malformed property value dropped");
    }
    fn empty_region(&self, name: &str) {
        warn!(name, "region without properties dropped");
    }
    fn region_without_page(&self, name: &str) {
        warn!(name, "region before any page dropped");
    }
    fn stray_line(&self, line: &str) {
        debug!(line, "unrecognized line skipped");
    }
    fn bounds_clamped(&self, name: &str, requested: (i32, i32, u32, u32), clamped: (u32, u32, u32, u32)) {
        warn!(name, ?requested, ?clamped, "region rectangle clamped to page bounds");
    }
    fn extract_fallback(&self, name: &str) {
        warn!(name, "extraction failed, placeholder sprite substituted");
    }
    fn lookup_failed(&self, name: &str) {
        warn!(name, "region not found in atlas");
    }
    fn unplaced(&self, name: &str, width: u32, height: u32) {
        warn!(name, width, height, "no free space, sprite left out of composite");
    }
    fn composite_fallback(&self) {
        warn!("no sprites placed, emitting fallback canvas");
    }
}
