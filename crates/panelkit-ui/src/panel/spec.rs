use panelkit_geom::{Geometry, Vec2};

use super::{PanelKind, ResizeTypes};

/// Default placement offset, possibly relative to the reference resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultPosition {
    Fixed(Vec2),
    /// `canvas * scale + offset`
    FromCanvas { scale: Vec2, offset: Vec2 },
}

impl DefaultPosition {
    pub fn resolve(self, canvas: Vec2) -> Vec2 {
        match self {
            DefaultPosition::Fixed(p) => p,
            DefaultPosition::FromCanvas { scale, offset } => canvas.scale(scale) + offset,
        }
    }
}

/// Everything a registry needs to know about a panel type. Concrete panels
/// are values of this struct rather than types of their own.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelSpec {
    pub kind: PanelKind,
    pub id: &'static str,
    pub min_size: Vec2,
    pub default_anchor_min: Vec2,
    pub default_anchor_max: Vec2,
    pub default_position: DefaultPosition,
    pub can_drag: bool,
    pub resize: ResizeTypes,
}

impl PanelSpec {
    /// The always-present launcher panel. A vertical layout only needs room
    /// for one button column.
    pub fn content(horizontal_layout: bool) -> Self {
        Self {
            kind: PanelKind::Base,
            id: "CorePanel",
            min_size: Vec2::new(if horizontal_layout { 340.0 } else { 100.0 }, 25.0),
            default_anchor_min: Vec2::HALF,
            default_anchor_max: Vec2::HALF,
            default_position: DefaultPosition::FromCanvas {
                scale: Vec2::new(0.0, 1.0),
                offset: Vec2::ZERO,
            },
            can_drag: true,
            resize: ResizeTypes::None,
        }
    }

    pub fn fam_stats() -> Self {
        Self {
            kind: PanelKind::FamStats,
            id: "FamStatsPanel",
            min_size: Vec2::new(340.0, 25.0),
            default_anchor_min: Vec2::HALF,
            default_anchor_max: Vec2::HALF,
            default_position: DefaultPosition::FromCanvas {
                scale: Vec2::new(1.0, 0.5),
                offset: Vec2::new(-150.0, 0.0),
            },
            can_drag: true,
            resize: ResizeTypes::None,
        }
    }

    pub fn default_geometry(&self, canvas: Vec2) -> Geometry {
        Geometry::new(
            self.default_anchor_min,
            self.default_anchor_max,
            self.default_position.resolve(canvas),
        )
    }
}
