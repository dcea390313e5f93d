//! External side effects: web server reload, database admin and editor launch.

mod system;
mod traits;

#[cfg(test)]
pub(crate) mod recording;

pub use system::{split_command, SystemActions};
pub use traits::ExternalActions;
