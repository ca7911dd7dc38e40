use tracing::debug;

use super::rendering::{DrawSink, DrawToken};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawHandle(pub u64);

#[derive(Debug, Default)]
pub struct DrawHandleAllocator {
    next: u64,
}

impl DrawHandleAllocator {
    pub fn allocate(&mut self) -> DrawHandle {
        let handle = DrawHandle(self.next);
        self.next = self.next.saturating_add(1);
        handle
    }
}

/// Ordered set of tokens to submit each frame.
///
/// Tokens draw in insertion order. Handles are never reused, so the backing
/// vector stays sorted by handle and lookups are binary searches.
#[derive(Debug, Default)]
pub struct DrawList {
    allocator: DrawHandleAllocator,
    tokens: Vec<(DrawHandle, DrawToken)>,
}

impl DrawList {
    pub fn insert(&mut self, token: DrawToken) -> DrawHandle {
        let handle = self.allocator.allocate();
        self.tokens.push((handle, token));
        handle
    }

    /// Removes the token if present. Removing an unknown or already removed
    /// handle is a no-op and returns `false`.
    pub fn remove(&mut self, handle: DrawHandle) -> bool {
        match self.index_of(handle) {
            Some(index) => {
                self.tokens.remove(index);
                true
            }
            None => {
                debug!(handle = handle.0, "draw_list_remove_missing");
                false
            }
        }
    }

    pub fn contains(&self, handle: DrawHandle) -> bool {
        self.index_of(handle).is_some()
    }

    pub fn get(&self, handle: DrawHandle) -> Option<&DrawToken> {
        self.index_of(handle).map(|index| &self.tokens[index].1)
    }

    pub fn get_mut(&mut self, handle: DrawHandle) -> Option<&mut DrawToken> {
        self.index_of(handle).map(|index| &mut self.tokens[index].1)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn submit_all<S: DrawSink + ?Sized>(&self, sink: &mut S) {
        for (_, token) in &self.tokens {
            sink.submit(token);
        }
    }

    fn index_of(&self, handle: DrawHandle) -> Option<usize> {
        self.tokens
            .binary_search_by_key(&handle, |(existing, _)| *existing)
            .ok()
    }
}
