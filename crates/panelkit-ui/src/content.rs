//! The always-present launcher panel: buttons that open other panels, send
//! one-shot commands, or cycle the UI scale.

use std::time::Instant;

use panelkit_geom::Vec2;
use panelkit_io::Settings;
use panelkit_runtime::{CommandGate, Outbox, RequestKind};

use crate::panel::{Panel, PanelKind, PanelSpec};

/// One-shot commands are not polled, so they carry no feed epoch.
const COMMAND_EPOCH: u64 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentAction {
    OpenBoxList,
    OpenFamStats,
    Unbind,
    BindLast,
    ToggleCombat,
    CycleScale,
}

impl ContentAction {
    pub fn label(self) -> &'static str {
        match self {
            ContentAction::OpenBoxList => "Box List",
            ContentAction::OpenFamStats => "Fam Stats",
            ContentAction::Unbind => "Unbind",
            ContentAction::BindLast => "Bind Last",
            ContentAction::ToggleCombat => "Combat Mode",
            ContentAction::CycleScale => "*",
        }
    }
}

/// What the host should do after a button press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionEffect {
    /// The box list lives outside this layer.
    OpenBoxList,
    OpenPanel(PanelKind),
    Sent(RequestKind),
    CoolingDown,
    CycleScale,
    /// The action is disabled or has nothing to send.
    Ignored,
    TransportClosed,
}

pub struct ContentPanel {
    panel: Panel,
    actions: Vec<ContentAction>,
    gate: CommandGate,
    outbox: Outbox,
    last_bind_command: Option<String>,
}

impl ContentPanel {
    pub fn new(canvas: Vec2, settings: &Settings, outbox: Outbox) -> Self {
        let spec = PanelSpec::content(settings.ui.horizontal_content_layout);
        Self {
            panel: Panel::new(spec, canvas, settings.ui.screen_padding),
            actions: Self::enabled_actions(settings),
            gate: CommandGate::new(settings.polling.command_cooldown()),
            outbox,
            last_bind_command: settings.panels.last_bind_command.clone(),
        }
    }

    fn enabled_actions(settings: &Settings) -> Vec<ContentAction> {
        let toggles = &settings.panels;
        let mut actions = Vec::with_capacity(6);
        if toggles.box_list {
            actions.push(ContentAction::OpenBoxList);
        }
        if toggles.fam_stats {
            actions.push(ContentAction::OpenFamStats);
        }
        if toggles.bind_buttons {
            actions.push(ContentAction::Unbind);
            actions.push(ContentAction::BindLast);
        }
        if toggles.combat_button {
            actions.push(ContentAction::ToggleCombat);
        }
        actions.push(ContentAction::CycleScale);
        actions
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    pub fn actions(&self) -> &[ContentAction] {
        &self.actions
    }

    pub fn is_ready(&self, action: ContentAction, now: Instant) -> bool {
        match self.request_for(action) {
            Some(kind) => self.gate.is_ready(&kind, now),
            None => self.actions.contains(&action),
        }
    }

    /// Settings changes that do not need the panel rebuilt.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.actions = Self::enabled_actions(settings);
        self.gate.set_cooldown(settings.polling.command_cooldown());
        self.last_bind_command = settings.panels.last_bind_command.clone();
    }

    fn request_for(&self, action: ContentAction) -> Option<RequestKind> {
        match action {
            ContentAction::Unbind => Some(RequestKind::Unbind),
            ContentAction::ToggleCombat => Some(RequestKind::ToggleCombat),
            ContentAction::BindLast => self
                .last_bind_command
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(|c| RequestKind::BindLast(c.to_string())),
            _ => None,
        }
    }

    pub fn trigger(&mut self, action: ContentAction, now: Instant) -> ActionEffect {
        if !self.actions.contains(&action) {
            log::debug!("action {:?} is disabled", action);
            return ActionEffect::Ignored;
        }
        match action {
            ContentAction::OpenBoxList => ActionEffect::OpenBoxList,
            ContentAction::OpenFamStats => ActionEffect::OpenPanel(PanelKind::FamStats),
            ContentAction::CycleScale => ActionEffect::CycleScale,
            ContentAction::Unbind | ContentAction::BindLast | ContentAction::ToggleCombat => {
                let Some(kind) = self.request_for(action) else {
                    log::debug!("no last bind command configured");
                    return ActionEffect::Ignored;
                };
                if !self.gate.try_acquire(&kind, now) {
                    return ActionEffect::CoolingDown;
                }
                if self.outbox.enqueue(COMMAND_EPOCH, kind.clone()) {
                    log::info!("sent {:?}", kind);
                    ActionEffect::Sent(kind)
                } else {
                    ActionEffect::TransportClosed
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn settings() -> Settings {
        let mut s = Settings::default();
        s.panels.last_bind_command = Some(".fam bind 2".into());
        s
    }

    #[test]
    fn commands_respect_cooldown() {
        let (outbox, requests) = Outbox::channel();
        let mut content = ContentPanel::new(Vec2::new(1920.0, 1080.0), &settings(), outbox);
        let t0 = Instant::now();
        assert_eq!(
            content.trigger(ContentAction::Unbind, t0),
            ActionEffect::Sent(RequestKind::Unbind)
        );
        assert_eq!(
            content.trigger(ContentAction::Unbind, t0 + Duration::from_millis(500)),
            ActionEffect::CoolingDown
        );
        assert!(!content.is_ready(ContentAction::Unbind, t0 + Duration::from_millis(1999)));
        assert_eq!(
            content.trigger(ContentAction::Unbind, t0 + Duration::from_millis(2000)),
            ActionEffect::Sent(RequestKind::Unbind)
        );
        assert_eq!(requests.try_iter().count(), 2);
    }

    #[test]
    fn bind_last_needs_a_command() {
        let (outbox, requests) = Outbox::channel();
        let mut content =
            ContentPanel::new(Vec2::new(1920.0, 1080.0), &Settings::default(), outbox);
        assert_eq!(
            content.trigger(ContentAction::BindLast, Instant::now()),
            ActionEffect::Ignored
        );
        content.apply_settings(&settings());
        assert_eq!(
            content.trigger(ContentAction::BindLast, Instant::now()),
            ActionEffect::Sent(RequestKind::BindLast(".fam bind 2".into()))
        );
        assert_eq!(requests.try_iter().count(), 1);
    }

    #[test]
    fn disabled_actions_are_ignored() {
        let mut s = settings();
        s.panels.combat_button = false;
        s.panels.box_list = false;
        let (outbox, _requests) = Outbox::channel();
        let mut content = ContentPanel::new(Vec2::new(1920.0, 1080.0), &s, outbox);
        assert_eq!(
            content.actions(),
            &[
                ContentAction::OpenFamStats,
                ContentAction::Unbind,
                ContentAction::BindLast,
                ContentAction::CycleScale
            ]
        );
        assert_eq!(
            content.trigger(ContentAction::ToggleCombat, Instant::now()),
            ActionEffect::Ignored
        );
        assert_eq!(
            content.trigger(ContentAction::OpenFamStats, Instant::now()),
            ActionEffect::OpenPanel(PanelKind::FamStats)
        );
    }

    #[test]
    fn vertical_layout_narrows_minimum_width() {
        let mut s = Settings::default();
        s.ui.horizontal_content_layout = false;
        let (outbox, _requests) = Outbox::channel();
        let content = ContentPanel::new(Vec2::new(1920.0, 1080.0), &s, outbox);
        assert_eq!(content.panel().spec().min_size, Vec2::new(100.0, 25.0));
    }
}
