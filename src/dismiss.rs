//! Outside-click dismissal for dropdowns.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegionId {
    SearchResults,
    Favorites,
}

/// An open dropdown together with the elements that count as "inside"
/// (the search region is the input plus the result list).
#[derive(Debug, Clone, Default)]
pub struct Region {
    bounds: Vec<Rect>,
}

impl Region {
    pub fn new(bounds: Vec<Rect>) -> Self {
        Self { bounds }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds.iter().any(|r| r.contains(point))
    }
}

#[derive(Debug, Default)]
pub struct DismissDispatcher {
    open: BTreeMap<RegionId, Region>,
}

impl DismissDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, id: RegionId, region: Region) {
        self.open.insert(id, region);
    }

    pub fn close(&mut self, id: RegionId) {
        self.open.remove(&id);
    }

    pub fn is_open(&self, id: RegionId) -> bool {
        self.open.contains_key(&id)
    }

    /// Closes every open region the point falls outside of and returns them.
    pub fn pointer_down(&mut self, point: Point) -> Vec<RegionId> {
        let closed: Vec<RegionId> = self
            .open
            .iter()
            .filter(|(_, region)| !region.contains(point))
            .map(|(id, _)| *id)
            .collect();
        for id in &closed {
            self.open.remove(id);
        }
        closed
    }
}
