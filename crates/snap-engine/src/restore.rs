//! In-memory storage of pre-snap frames so un-snapping can restore size.

use std::collections::{HashMap, VecDeque};

use snap_geom::Rect;
use snap_world::WindowId;

/// Maximum number of remembered frames; the oldest entry is evicted first.
pub const RESTORE_CAP: usize = 256;

/// Frames windows had before they were first snapped.
#[derive(Debug, Default)]
pub struct RestoreMemory {
    /// Remembered frame per window.
    frames: HashMap<WindowId, Rect>,
    /// Insertion order for eviction.
    order: VecDeque<WindowId>,
}

impl RestoreMemory {
    /// Empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `frame` for `id`, replacing any previous entry.
    pub fn remember(&mut self, id: WindowId, frame: Rect) {
        if self.frames.insert(id, frame).is_some() {
            self.order.retain(|k| *k != id);
        } else if self.frames.len() > RESTORE_CAP
            && let Some(old) = self.order.pop_front()
        {
            self.frames.remove(&old);
        }
        self.order.push_back(id);
    }

    /// Remembered frame for `id`.
    pub fn get(&self, id: WindowId) -> Option<Rect> {
        self.frames.get(&id).copied()
    }

    /// Remove and return the remembered frame for `id`.
    pub fn take(&mut self, id: WindowId) -> Option<Rect> {
        let frame = self.frames.remove(&id)?;
        self.order.retain(|k| *k != id);
        Some(frame)
    }

    /// Number of remembered windows.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame for un-snapping `id`: the remembered size (or `fraction` of the
    /// usable area) centered in `usable`. Consumes the remembered entry.
    pub fn centered_frame(&mut self, id: WindowId, usable: Rect, fraction: f64) -> Rect {
        let usable = usable.sanitized();
        match self.take(id) {
            Some(prev) => usable.centered(prev.w, prev.h),
            None => usable.centered(usable.w * fraction, usable.h * fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wid(n: u32) -> WindowId {
        WindowId::new(1, n)
    }

    #[test]
    fn remembered_size_is_recentred() {
        let mut mem = RestoreMemory::new();
        mem.remember(wid(1), Rect::new(37.0, 90.0, 400.0, 300.0));
        let usable = Rect::new(0.0, 25.0, 1000.0, 800.0);
        assert_eq!(
            mem.centered_frame(wid(1), usable, 0.6),
            Rect::new(300.0, 275.0, 400.0, 300.0)
        );
        assert!(mem.is_empty());
    }

    #[test]
    fn default_fraction_without_memory() {
        let mut mem = RestoreMemory::new();
        let usable = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(
            mem.centered_frame(wid(2), usable, 0.5),
            Rect::new(250.0, 200.0, 500.0, 400.0)
        );
    }

    #[test]
    fn oversized_memory_is_clamped() {
        let mut mem = RestoreMemory::new();
        mem.remember(wid(1), Rect::new(0.0, 0.0, 3000.0, 300.0));
        let usable = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let r = mem.centered_frame(wid(1), usable, 0.6);
        assert_eq!(r.w, 1000.0);
        assert_eq!(r.x, 0.0);
    }

    #[test]
    fn oldest_entry_evicted_at_capacity() {
        let mut mem = RestoreMemory::new();
        for n in 0..=RESTORE_CAP as u32 {
            mem.remember(wid(n), Rect::new(0.0, 0.0, 100.0, 100.0));
        }
        assert_eq!(mem.len(), RESTORE_CAP);
        assert!(mem.get(wid(0)).is_none());
        assert!(mem.get(wid(RESTORE_CAP as u32)).is_some());
    }

    #[test]
    fn re_remember_replaces() {
        let mut mem = RestoreMemory::new();
        mem.remember(wid(1), Rect::new(0.0, 0.0, 100.0, 100.0));
        mem.remember(wid(1), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(mem.len(), 1);
        assert_eq!(mem.get(wid(1)).unwrap().w, 200.0);
    }
}
