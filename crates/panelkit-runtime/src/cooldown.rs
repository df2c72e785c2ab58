use std::time::{Duration, Instant};

use hashbrown::HashMap;

use crate::RequestKind;

/// Per-command cooldown for user-triggered requests: after a command is sent
/// it cannot be sent again until the cooldown has elapsed.
#[derive(Debug)]
pub struct CommandGate {
    cooldown: Duration,
    last_sent: HashMap<RequestKind, Instant>,
}

impl CommandGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_sent: HashMap::new(),
        }
    }

    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }

    pub fn is_ready(&self, kind: &RequestKind, now: Instant) -> bool {
        match self.last_sent.get(kind) {
            Some(sent) => now.saturating_duration_since(*sent) >= self.cooldown,
            None => true,
        }
    }

    /// Claims the command slot. Returns false while still cooling down.
    pub fn try_acquire(&mut self, kind: &RequestKind, now: Instant) -> bool {
        if !self.is_ready(kind, now) {
            log::debug!("command {:?} still cooling down", kind);
            return false;
        }
        self.last_sent.insert(kind.clone(), now);
        true
    }

    pub fn clear(&mut self) {
        self.last_sent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_is_per_command() {
        let t0 = Instant::now();
        let mut gate = CommandGate::new(Duration::from_millis(2000));
        assert!(gate.try_acquire(&RequestKind::Unbind, t0));
        assert!(!gate.try_acquire(&RequestKind::Unbind, t0 + Duration::from_millis(1999)));
        assert!(gate.try_acquire(&RequestKind::ToggleCombat, t0));
        assert!(gate.try_acquire(&RequestKind::Unbind, t0 + Duration::from_millis(2000)));
    }
}
