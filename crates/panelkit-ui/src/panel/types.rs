/// Panel type identifier; also the persisted record key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Base,
    FamStats,
}

impl PanelKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PanelKind::Base => "Base",
            PanelKind::FamStats => "FamStats",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Constructing,
    RestoringSavedGeometry,
    Interactive,
    Dragging,
    Resizing,
    Closed,
}

/// Which edges a user may drag to resize a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeTypes {
    None,
    Horizontal,
    Vertical,
    All,
}

impl ResizeTypes {
    pub fn allows(self, handle: ResizeHandle) -> bool {
        match self {
            ResizeTypes::None => false,
            ResizeTypes::All => true,
            ResizeTypes::Horizontal => matches!(handle, ResizeHandle::Left | ResizeHandle::Right),
            ResizeTypes::Vertical => matches!(handle, ResizeHandle::Top | ResizeHandle::Bottom),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [Self; 8] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
    ];

    #[inline]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    #[inline]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    #[inline]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    #[inline]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitRegion {
    None,
    Resize(ResizeHandle),
    Content,
}

/// Result of a persistence attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistOutcome {
    Written,
    /// A restore is applying geometry; nothing was written.
    Suppressed,
    /// Encoding failed and an empty record was written instead.
    WroteEmpty,
    /// The store rejected the write.
    StoreFailed,
}
