//! Vhost lifecycle: paths, state probing and the manager driving transitions.

mod manager;
mod paths;
mod request;
mod state;

pub use manager::VhostManager;
pub use paths::{Layout, VhostPaths};
pub use request::{CreateOptions, CreateOutcome, ListScope, RemoveOptions, VhostInfo};
pub use state::VhostState;
