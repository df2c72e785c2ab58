use panelkit_geom::{Geometry, GeometryError, Rect, Vec2};

/// Live placement of a panel: the persisted [`Geometry`] plus a size delta
/// that is added to the anchor extent. The delta is transient; only the
/// geometry is written to the store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelRect {
    pub geometry: Geometry,
    pub size_delta: Vec2,
}

pub fn check_canvas(canvas: Vec2) -> Result<(), GeometryError> {
    if canvas.x.is_finite() && canvas.y.is_finite() && canvas.x > 0.0 && canvas.y > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::DegenerateCanvas {
            w: canvas.x,
            h: canvas.y,
        })
    }
}

impl PanelRect {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            size_delta: Vec2::ZERO,
        }
    }

    pub fn size(&self, canvas: Vec2) -> Vec2 {
        self.geometry.anchor_span().scale(canvas) + self.size_delta
    }

    pub fn center(&self, canvas: Vec2) -> Vec2 {
        self.geometry.anchor_center().scale(canvas) + self.geometry.position
    }

    pub fn outer(&self, canvas: Vec2) -> Rect {
        let size = self.size(canvas);
        let c = self.center(canvas);
        Rect::new(c.x - size.x * 0.5, c.y - size.y * 0.5, size.x, size.y)
    }

    /// Grows the size delta until both extents reach `min`.
    pub fn ensure_min_size(&mut self, canvas: Vec2, min: Vec2) -> bool {
        let size = self.size(canvas);
        let mut changed = false;
        if size.x < min.x {
            self.size_delta.x += min.x - size.x;
            changed = true;
        }
        if size.y < min.y {
            self.size_delta.y += min.y - size.y;
            changed = true;
        }
        changed
    }

    /// Shifts the panel so its outer rect sits inside the canvas, `pad`
    /// pixels away from every edge where it fits.
    pub fn ensure_on_canvas(&mut self, canvas: Vec2, pad: f32) -> bool {
        let outer = self.outer(canvas);
        let max_x = (canvas.x - outer.w - pad).max(pad);
        let max_y = (canvas.y - outer.h - pad).max(pad);
        let x = outer.x.clamp(pad, max_x);
        let y = outer.y.clamp(pad, max_y);
        if x == outer.x && y == outer.y {
            return false;
        }
        self.geometry.position += Vec2::new(x - outer.x, y - outer.y);
        true
    }

    /// Moves the outer rect's top-left corner to `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32, canvas: Vec2) {
        let outer = self.outer(canvas);
        self.geometry.position += Vec2::new(x - outer.x, y - outer.y);
    }

    /// Re-expresses `outer` through the anchors so the persisted geometry
    /// carries the new size.
    pub fn set_outer(&mut self, outer: Rect, canvas: Vec2) {
        if check_canvas(canvas).is_err() || !outer.size().is_finite() {
            return;
        }
        let span = Vec2::new(
            (outer.w / canvas.x).clamp(0.0, 1.0),
            (outer.h / canvas.y).clamp(0.0, 1.0),
        );
        let c = outer.center();
        let center_n = Vec2::new(c.x / canvas.x, c.y / canvas.y);
        let anchor_min = Vec2::new(
            (center_n.x - span.x * 0.5).clamp(0.0, 1.0 - span.x),
            (center_n.y - span.y * 0.5).clamp(0.0, 1.0 - span.y),
        );
        let anchor_max = Vec2::new(
            (anchor_min.x + span.x).min(1.0),
            (anchor_min.y + span.y).min(1.0),
        );
        self.geometry.anchor_min = anchor_min;
        self.geometry.anchor_max = anchor_max;
        self.size_delta = outer.size() - self.geometry.anchor_span().scale(canvas);
        self.geometry.position = c - self.geometry.anchor_center().scale(canvas);
    }

    /// Sets the outer height, growing or shrinking around the centre.
    pub fn set_height(&mut self, height: f32, canvas: Vec2) {
        self.size_delta.y = height - self.geometry.anchor_span().y * canvas.y;
    }

    /// Minimum size first, then screen bounds.
    pub fn clamp(&mut self, canvas: Vec2, min: Vec2, pad: f32) -> Result<(), GeometryError> {
        check_canvas(canvas)?;
        if !self.geometry.is_finite() || !self.size_delta.is_finite() {
            return Err(GeometryError::Invalid("non-finite field"));
        }
        self.ensure_min_size(canvas, min);
        self.ensure_on_canvas(canvas, pad);
        Ok(())
    }
}
