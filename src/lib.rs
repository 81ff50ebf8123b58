//! gator - a command-line RSS feed aggregator
//!
//! Users register, add and follow feeds, and run `agg` to periodically
//! collect the feed that has waited longest.

pub mod command;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod rss;
pub mod session;

pub use command::{build_registry, Command, CommandRegistry, State};
pub use config::Config;
pub use db::{Database, User, UserRepository};
pub use error::{GatorError, Result};
pub use session::{Session, SessionData};
