use panelkit_geom::{Geometry, Rect, Restored, Vec2, apply_or_default, try_serialize};
use panelkit_io::{KeyValueStore, PANELS_SECTION};

use super::rect::{PanelRect, check_canvas};
use super::{HitRegion, LifecycleState, PanelSpec, PersistOutcome, ResizeHandle};

/// Thickness of the invisible resize grips along the panel edges.
pub const RESIZE_GRIP: f32 = 8.0;

#[derive(Clone, Copy, Debug)]
struct Gesture {
    origin: Vec2,
    start: Rect,
    handle: Option<ResizeHandle>,
}

/// A movable, optionally resizable panel whose geometry is persisted under
/// its kind in the [`PANELS_SECTION`] of a [`KeyValueStore`].
#[derive(Debug)]
pub struct Panel {
    spec: PanelSpec,
    state: LifecycleState,
    rect: PanelRect,
    canvas: Vec2,
    screen_padding: f32,
    applying_saved_geometry: bool,
    gesture: Option<Gesture>,
}

impl Panel {
    pub fn new(spec: PanelSpec, canvas: Vec2, screen_padding: f32) -> Self {
        let rect = PanelRect::new(spec.default_geometry(canvas));
        Self {
            spec,
            state: LifecycleState::Constructing,
            rect,
            canvas,
            screen_padding,
            applying_saved_geometry: false,
            gesture: None,
        }
    }

    pub fn spec(&self) -> &PanelSpec {
        &self.spec
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn geometry(&self) -> Geometry {
        self.rect.geometry
    }

    pub fn canvas(&self) -> Vec2 {
        self.canvas
    }

    pub fn outer(&self) -> Rect {
        self.rect.outer(self.canvas)
    }

    pub fn is_applying_saved_geometry(&self) -> bool {
        self.applying_saved_geometry
    }

    pub fn is_interactive(&self) -> bool {
        self.state == LifecycleState::Interactive
    }

    pub fn default_geometry(&self) -> Geometry {
        self.spec.default_geometry(self.canvas)
    }

    fn record_key(&self) -> &'static str {
        self.spec.kind.as_str()
    }

    /// Restores the persisted geometry (or the default) and makes the panel
    /// interactive. Runs once per panel; later calls are ignored.
    pub fn late_construct<S>(&mut self, store: &mut S) -> Option<Restored>
    where
        S: KeyValueStore + ?Sized,
    {
        if self.state != LifecycleState::Constructing {
            log::debug!(
                "panel {} already constructed (state {:?})",
                self.spec.id,
                self.state
            );
            return None;
        }
        self.applying_saved_geometry = true;
        self.state = LifecycleState::RestoringSavedGeometry;

        let fallback = self.default_geometry();
        let record = store.get(PANELS_SECTION, self.record_key());
        let restored = apply_or_default(record.as_deref(), fallback, Geometry::validate);
        self.rect = PanelRect::new(restored.geometry);
        if let Err(e) = self
            .rect
            .clamp(self.canvas, self.spec.min_size, self.screen_padding)
        {
            log::error!(
                "exception loading panel {} save data: {}; using default",
                self.spec.id,
                e
            );
            self.rect = PanelRect::new(fallback);
        }

        // Programmatic placement looks like a finished resize; the guard
        // keeps it from being written back.
        self.on_geometry_committed(store);

        if restored.needs_heal() {
            self.write_record(store);
        }

        self.state = LifecycleState::Interactive;
        self.applying_saved_geometry = false;
        log::info!(
            "panel {} restored ({:?}) at {:?}",
            self.spec.id,
            restored.source,
            self.rect.geometry
        );
        Some(restored)
    }

    /// Persists the current geometry unless a restore is in flight.
    pub fn persist<S>(&mut self, store: &mut S) -> PersistOutcome
    where
        S: KeyValueStore + ?Sized,
    {
        self.on_geometry_committed(store)
    }

    fn on_geometry_committed<S>(&mut self, store: &mut S) -> PersistOutcome
    where
        S: KeyValueStore + ?Sized,
    {
        if self.applying_saved_geometry {
            log::trace!(target: "panels", "{}: persist suppressed during restore", self.spec.id);
            return PersistOutcome::Suppressed;
        }
        self.write_record(store)
    }

    fn write_record<S>(&self, store: &mut S) -> PersistOutcome
    where
        S: KeyValueStore + ?Sized,
    {
        let (value, outcome) = match try_serialize(&self.rect.geometry) {
            Ok(value) => (value, PersistOutcome::Written),
            Err(e) => {
                log::warn!("exception generating panel {} save data: {}", self.spec.id, e);
                (String::new(), PersistOutcome::WroteEmpty)
            }
        };
        if let Err(e) = store.set(PANELS_SECTION, self.record_key(), &value) {
            log::warn!("failed to persist panel {}: {}", self.spec.id, e);
            return PersistOutcome::StoreFailed;
        }
        outcome
    }

    pub fn hit_test(&self, cursor: Vec2) -> HitRegion {
        let outer = self.outer();
        if self.state == LifecycleState::Closed || !outer.contains(cursor) {
            return HitRegion::None;
        }
        let near_left = cursor.x <= outer.x + RESIZE_GRIP;
        let near_right = cursor.x >= outer.right() - RESIZE_GRIP;
        let near_top = cursor.y <= outer.y + RESIZE_GRIP;
        let near_bottom = cursor.y >= outer.bottom() - RESIZE_GRIP;
        let handle = match (near_left, near_right, near_top, near_bottom) {
            (true, _, true, _) => Some(ResizeHandle::TopLeft),
            (_, true, true, _) => Some(ResizeHandle::TopRight),
            (true, _, _, true) => Some(ResizeHandle::BottomLeft),
            (_, true, _, true) => Some(ResizeHandle::BottomRight),
            (true, _, _, _) => Some(ResizeHandle::Left),
            (_, true, _, _) => Some(ResizeHandle::Right),
            (_, _, true, _) => Some(ResizeHandle::Top),
            (_, _, _, true) => Some(ResizeHandle::Bottom),
            _ => None,
        };
        match handle {
            Some(handle) if self.spec.resize.allows(handle) => HitRegion::Resize(handle),
            _ => HitRegion::Content,
        }
    }

    pub fn begin_drag(&mut self, cursor: Vec2) -> bool {
        if !self.is_interactive() || !self.spec.can_drag {
            return false;
        }
        self.gesture = Some(Gesture {
            origin: cursor,
            start: self.outer(),
            handle: None,
        });
        self.state = LifecycleState::Dragging;
        true
    }

    pub fn update_drag(&mut self, cursor: Vec2) {
        if self.state != LifecycleState::Dragging {
            return;
        }
        let Some(gesture) = self.gesture else {
            return;
        };
        let pad = self.screen_padding;
        let start = gesture.start;
        let max_x = (self.canvas.x - start.w - pad).max(pad);
        let max_y = (self.canvas.y - start.h - pad).max(pad);
        let new_x = (start.x + cursor.x - gesture.origin.x).clamp(pad, max_x);
        let new_y = (start.y + cursor.y - gesture.origin.y).clamp(pad, max_y);
        self.rect.move_to(new_x, new_y, self.canvas);
    }

    pub fn finish_drag<S>(&mut self, store: &mut S) -> Option<PersistOutcome>
    where
        S: KeyValueStore + ?Sized,
    {
        if self.state != LifecycleState::Dragging {
            return None;
        }
        self.gesture = None;
        self.state = LifecycleState::Interactive;
        Some(self.on_geometry_committed(store))
    }

    pub fn begin_resize(&mut self, cursor: Vec2, handle: ResizeHandle) -> bool {
        if !self.is_interactive() || !self.spec.resize.allows(handle) {
            return false;
        }
        self.gesture = Some(Gesture {
            origin: cursor,
            start: self.outer(),
            handle: Some(handle),
        });
        self.state = LifecycleState::Resizing;
        true
    }

    pub fn update_resize(&mut self, cursor: Vec2) {
        if self.state != LifecycleState::Resizing {
            return;
        }
        let Some(Gesture {
            origin,
            start,
            handle: Some(handle),
        }) = self.gesture
        else {
            return;
        };

        let delta_x = cursor.x - origin.x;
        let delta_y = cursor.y - origin.y;
        let min = self.spec.min_size;
        let pad = self.screen_padding;
        let right_edge = start.right();
        let bottom_edge = start.bottom();

        let mut new_x = start.x;
        let mut new_y = start.y;
        let mut new_w = start.w;
        let mut new_h = start.h;

        if handle.moves_left() {
            new_x = start.x + delta_x;
            new_w = right_edge - new_x;
        } else if handle.moves_right() {
            new_w = start.w + delta_x;
        }
        if handle.moves_top() {
            new_y = start.y + delta_y;
            new_h = bottom_edge - new_y;
        } else if handle.moves_bottom() {
            new_h = start.h + delta_y;
        }

        if new_w < min.x {
            new_w = min.x;
            if handle.moves_left() {
                new_x = right_edge - new_w;
            }
        }
        if new_h < min.y {
            new_h = min.y;
            if handle.moves_top() {
                new_y = bottom_edge - new_h;
            }
        }

        if handle.moves_left() && new_x < pad {
            new_x = pad;
            new_w = right_edge - new_x;
            if new_w < min.x {
                new_w = min.x;
                new_x = right_edge - new_w;
            }
        }
        if handle.moves_top() && new_y < pad {
            new_y = pad;
            new_h = bottom_edge - new_y;
            if new_h < min.y {
                new_h = min.y;
                new_y = bottom_edge - new_h;
            }
        }

        new_w = new_w.min((self.canvas.x - pad - new_x).max(min.x));
        new_h = new_h.min((self.canvas.y - pad - new_y).max(min.y));

        self.rect
            .set_outer(Rect::new(new_x, new_y, new_w, new_h), self.canvas);
    }

    pub fn finish_resize<S>(&mut self, store: &mut S) -> Option<PersistOutcome>
    where
        S: KeyValueStore + ?Sized,
    {
        if self.state != LifecycleState::Resizing {
            return None;
        }
        self.gesture = None;
        self.state = LifecycleState::Interactive;
        Some(self.on_geometry_committed(store))
    }

    /// Re-validates placement against a new reference resolution. Nothing is
    /// persisted; the next gesture will write the clamped geometry.
    pub fn set_canvas(&mut self, canvas: Vec2) {
        if let Err(e) = check_canvas(canvas) {
            log::warn!("panel {} ignoring canvas change: {}", self.spec.id, e);
            return;
        }
        self.canvas = canvas;
        if let Err(e) = self
            .rect
            .clamp(canvas, self.spec.min_size, self.screen_padding)
        {
            log::warn!("panel {} could not be clamped: {}", self.spec.id, e);
        }
    }

    /// Sets the outer height (e.g. from measured content), respecting the
    /// minimum size and screen bounds.
    pub fn set_content_height(&mut self, height: f32) {
        if !height.is_finite() {
            log::warn!("panel {} ignoring height {}", self.spec.id, height);
            return;
        }
        self.rect.set_height(height.max(self.spec.min_size.y), self.canvas);
        self.rect.ensure_on_canvas(self.canvas, self.screen_padding);
    }

    /// Transient-state hook. Geometry and its persisted record are left
    /// alone; an unfinished gesture is abandoned without persisting.
    pub fn reset(&mut self) {
        if matches!(
            self.state,
            LifecycleState::Dragging | LifecycleState::Resizing
        ) {
            log::debug!("panel {} reset abandoned a gesture", self.spec.id);
            self.gesture = None;
            self.state = LifecycleState::Interactive;
        }
    }

    pub fn close(&mut self) {
        self.gesture = None;
        self.applying_saved_geometry = false;
        self.state = LifecycleState::Closed;
    }
}
