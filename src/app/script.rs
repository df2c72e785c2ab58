//! Scripted input for the headless host: a TOML list of steps, each expanded
//! into tick-scheduled events.

use std::error::Error;
use std::fs;
use std::path::Path;

use panelkit_geom::Vec2;
use panelkit_ui::{ContentAction, PanelKind, ResizeHandle};
use serde::Deserialize;

use crate::event::{Event, EventQueue};

pub const DEFAULT_SCRIPT: &str = r#"
[[step]]
at = 5
op = { kind = "press", action = "open_fam_stats" }

[[step]]
at = 90
op = { kind = "drag", panel = "fam_stats", dx = -240.0, dy = -120.0, steps = 12 }

[[step]]
at = 140
op = { kind = "press", action = "toggle_combat" }

[[step]]
at = 150
op = { kind = "press", action = "toggle_combat" }

[[step]]
at = 200
op = { kind = "press", action = "cycle_scale" }

[[step]]
at = 260
op = { kind = "leave_session" }

[[step]]
at = 320
op = { kind = "join_session" }

[[step]]
at = 420
op = { kind = "drag", panel = "base", dx = 300.0, dy = -40.0 }

[[step]]
at = 500
op = { kind = "close", panel = "fam_stats" }

[[step]]
at = 520
op = { kind = "quit" }
"#;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPanel {
    Base,
    FamStats,
}

impl From<ScriptPanel> for PanelKind {
    fn from(p: ScriptPanel) -> Self {
        match p {
            ScriptPanel::Base => PanelKind::Base,
            ScriptPanel::FamStats => PanelKind::FamStats,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptAction {
    OpenBoxList,
    OpenFamStats,
    Unbind,
    BindLast,
    ToggleCombat,
    CycleScale,
}

impl From<ScriptAction> for ContentAction {
    fn from(a: ScriptAction) -> Self {
        match a {
            ScriptAction::OpenBoxList => ContentAction::OpenBoxList,
            ScriptAction::OpenFamStats => ContentAction::OpenFamStats,
            ScriptAction::Unbind => ContentAction::Unbind,
            ScriptAction::BindLast => ContentAction::BindLast,
            ScriptAction::ToggleCombat => ContentAction::ToggleCombat,
            ScriptAction::CycleScale => ContentAction::CycleScale,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptHandle {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl From<ScriptHandle> for ResizeHandle {
    fn from(h: ScriptHandle) -> Self {
        match h {
            ScriptHandle::Left => ResizeHandle::Left,
            ScriptHandle::Right => ResizeHandle::Right,
            ScriptHandle::Top => ResizeHandle::Top,
            ScriptHandle::Bottom => ResizeHandle::Bottom,
            ScriptHandle::TopLeft => ResizeHandle::TopLeft,
            ScriptHandle::TopRight => ResizeHandle::TopRight,
            ScriptHandle::BottomLeft => ResizeHandle::BottomLeft,
            ScriptHandle::BottomRight => ResizeHandle::BottomRight,
        }
    }
}

fn default_steps() -> u64 {
    8
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptOp {
    Drag {
        panel: ScriptPanel,
        dx: f32,
        dy: f32,
        #[serde(default = "default_steps")]
        steps: u64,
    },
    Resize {
        panel: ScriptPanel,
        handle: ScriptHandle,
        dx: f32,
        dy: f32,
        #[serde(default = "default_steps")]
        steps: u64,
    },
    Press {
        action: ScriptAction,
    },
    Open {
        panel: ScriptPanel,
    },
    Close {
        panel: ScriptPanel,
    },
    LeaveSession,
    JoinSession,
    Quit,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub at: u64,
    pub op: ScriptOp,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text)?)
    }

    /// Emits every step's events relative to the queue's current tick.
    pub fn schedule(&self, queue: &mut EventQueue) -> usize {
        let base = queue.now;
        let mut emitted = 0;
        for step in &self.steps {
            let at = base.saturating_add(step.at);
            for (offset, event) in expand(&step.op) {
                queue.emit_at(at.saturating_add(offset), event);
                emitted += 1;
            }
        }
        emitted
    }
}

fn gesture_path(dx: f32, dy: f32, steps: u64) -> impl Iterator<Item = (u64, Vec2)> {
    let steps = steps.max(1);
    (1..=steps).map(move |i| {
        let t = i as f32 / steps as f32;
        (i, Vec2::new(dx * t, dy * t))
    })
}

fn expand(op: &ScriptOp) -> Vec<(u64, Event)> {
    match *op {
        ScriptOp::Drag {
            panel,
            dx,
            dy,
            steps,
        } => {
            let kind = PanelKind::from(panel);
            let mut out = vec![(0, Event::DragStarted { kind })];
            out.extend(
                gesture_path(dx, dy, steps).map(|(i, offset)| (i, Event::DragMoved { kind, offset })),
            );
            out.push((steps.max(1) + 1, Event::DragFinished { kind }));
            out
        }
        ScriptOp::Resize {
            panel,
            handle,
            dx,
            dy,
            steps,
        } => {
            let kind = PanelKind::from(panel);
            let mut out = vec![(
                0,
                Event::ResizeStarted {
                    kind,
                    handle: handle.into(),
                },
            )];
            out.extend(
                gesture_path(dx, dy, steps)
                    .map(|(i, offset)| (i, Event::ResizeMoved { kind, offset })),
            );
            out.push((steps.max(1) + 1, Event::ResizeFinished { kind }));
            out
        }
        ScriptOp::Press { action } => vec![(0, Event::ActionPressed(action.into()))],
        ScriptOp::Open { panel } => vec![(0, Event::OpenPanel(panel.into()))],
        ScriptOp::Close { panel } => vec![(0, Event::ClosePanel(panel.into()))],
        ScriptOp::LeaveSession => vec![(0, Event::SessionLeft)],
        ScriptOp::JoinSession => vec![(0, Event::SessionJoined)],
        ScriptOp::Quit => vec![(0, Event::Quit)],
    }
}
