//! Client SDK for the VoteXpert e-voting platform.
//!
//! [`api`] speaks the REST protocol, [`session`] holds and persists the
//! authenticated session, [`flow`] drives voter verification, admin login
//! and ballot casting, and [`shell`] turns an expired session into a
//! redirect to the right login screen.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod flow;
pub mod logging;
pub mod model;
pub mod refresh;
pub mod session;
pub mod shell;
pub mod validation;

#[cfg(test)]
mod testing;

pub use api::Api;
pub use config::Config;
pub use error::{Error, Result};
pub use session::SessionContext;
