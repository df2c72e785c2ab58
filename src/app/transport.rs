use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use panelkit_runtime::{Request, RequestKind, Response};
use panelkit_ui::StatSnapshot;

/// Knobs for the simulated data source.
#[derive(Clone, Copy, Debug)]
pub struct TransportConfig {
    pub latency: Duration,
    /// Every n-th stats request goes unanswered (0 disables).
    pub drop_every: u64,
    /// Every n-th stats request is answered twice (0 disables).
    pub duplicate_every: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(40),
            drop_every: 7,
            duplicate_every: 5,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TransportStats {
    pub requests: u64,
    pub answered: u64,
    pub dropped: u64,
    pub commands: u64,
}

#[derive(Debug)]
struct Familiar {
    name: String,
    level: u32,
    prestige: u32,
    percent: u32,
    experience: i64,
    combat: bool,
}

impl Familiar {
    fn bound(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: 12,
            prestige: 1,
            percent: 0,
            experience: 0,
            combat: true,
        }
    }

    fn sample(&mut self, n: u64) -> StatSnapshot {
        // Experience moves on two requests out of three.
        if n % 3 != 0 {
            self.experience += 37;
            self.percent += 3;
            if self.percent >= 100 {
                self.percent -= 100;
                self.level += 1;
            }
        }
        let mut dynamic = vec![("Attack Speed".to_string(), format!("{}%", 5 + self.level / 4))];
        if n % 4 < 2 {
            dynamic.push(("Lifesteal".to_string(), "8%".to_string()));
        }
        if !self.combat {
            dynamic.push(("Stance".to_string(), "Passive".to_string()));
        }
        StatSnapshot {
            name: self.name.clone(),
            level: self.level,
            prestige_level: self.prestige,
            max_health: 1500 + i64::from(self.level) * 25,
            physical_power: 60 + i64::from(self.level),
            spell_power: 30 + i64::from(self.level) / 2,
            experience_value: self.experience,
            experience_percent: self.percent,
            school: "Blood".to_string(),
            dynamic_stats: dynamic,
        }
    }
}

/// Spawns the simulated transport. It answers stats requests on `replies`
/// and exits once every request sender is gone.
pub fn spawn(
    requests: Receiver<Request>,
    replies: Sender<Response<StatSnapshot>>,
    config: TransportConfig,
) -> io::Result<JoinHandle<TransportStats>> {
    thread::Builder::new()
        .name("transport".into())
        .spawn(move || run(requests, replies, config))
}

fn run(
    requests: Receiver<Request>,
    replies: Sender<Response<StatSnapshot>>,
    config: TransportConfig,
) -> TransportStats {
    let mut stats = TransportStats::default();
    let mut familiar = Some(Familiar::bound("Vampire Bat"));
    let mut stats_requests = 0u64;
    for req in requests.iter() {
        stats.requests += 1;
        match req.kind {
            RequestKind::FamStats => {
                stats_requests += 1;
                if config.drop_every > 0 && stats_requests % config.drop_every == 0 {
                    log::debug!(target: "transport", "dropping stats request (epoch {})", req.epoch);
                    stats.dropped += 1;
                    continue;
                }
                thread::sleep(config.latency);
                let payload = match familiar.as_mut() {
                    Some(f) => f.sample(stats_requests),
                    None => StatSnapshot::default(),
                };
                let copies = if config.duplicate_every > 0
                    && stats_requests % config.duplicate_every == 0
                {
                    2
                } else {
                    1
                };
                for _ in 0..copies {
                    let response = Response {
                        epoch: req.epoch,
                        payload: payload.clone(),
                    };
                    if replies.send(response).is_err() {
                        log::debug!(target: "transport", "reply channel closed");
                        return stats;
                    }
                    stats.answered += 1;
                }
            }
            RequestKind::Unbind => {
                stats.commands += 1;
                log::info!("transport: familiar unbound");
                familiar = None;
            }
            RequestKind::BindLast(command) => {
                stats.commands += 1;
                let name = command.rsplit(' ').next().unwrap_or("Familiar");
                log::info!("transport: {:?} bound {}", command, name);
                familiar = Some(Familiar::bound(name));
            }
            RequestKind::ToggleCombat => {
                stats.commands += 1;
                if let Some(f) = familiar.as_mut() {
                    f.combat = !f.combat;
                    log::info!("transport: combat mode {}", if f.combat { "on" } else { "off" });
                }
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;

    #[test]
    fn drops_and_duplicates_follow_config() {
        let (req_tx, req_rx) = unbounded();
        let (rep_tx, rep_rx) = unbounded();
        let handle = spawn(
            req_rx,
            rep_tx,
            TransportConfig {
                latency: Duration::ZERO,
                drop_every: 3,
                duplicate_every: 2,
            },
        )
        .unwrap();
        for epoch in 1..=4 {
            req_tx
                .send(Request {
                    epoch,
                    kind: RequestKind::FamStats,
                })
                .unwrap();
        }
        drop(req_tx);
        let stats = handle.join().unwrap();
        let epochs: Vec<u64> = rep_rx.try_iter().map(|r| r.epoch).collect();
        // 1 answered, 2 duplicated, 3 dropped, 4 duplicated
        assert_eq!(epochs, vec![1, 2, 2, 4, 4]);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.answered, 5);
    }

    #[test]
    fn unbind_clears_the_familiar() {
        let (req_tx, req_rx) = unbounded();
        let (rep_tx, rep_rx) = unbounded();
        let handle = spawn(
            req_rx,
            rep_tx,
            TransportConfig {
                latency: Duration::ZERO,
                drop_every: 0,
                duplicate_every: 0,
            },
        )
        .unwrap();
        req_tx
            .send(Request {
                epoch: 0,
                kind: RequestKind::Unbind,
            })
            .unwrap();
        req_tx
            .send(Request {
                epoch: 1,
                kind: RequestKind::FamStats,
            })
            .unwrap();
        drop(req_tx);
        handle.join().unwrap();
        let reply = rep_rx.try_recv().unwrap();
        assert_eq!(reply.payload.name_line(), "Unknown Familiar");
    }
}
