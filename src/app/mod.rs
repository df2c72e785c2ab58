//! Headless host: owns the panels, the persisted store and the simulated
//! transport, and drives them from a tick-scheduled event queue.

mod init;
mod script;
mod state;
mod step;
mod transport;
mod view;
mod watchers;

#[cfg(test)]
mod tests;

pub use init::AppOptions;
pub use state::App;
pub use transport::TransportConfig;
