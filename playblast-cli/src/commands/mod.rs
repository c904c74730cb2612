//! CLI command implementations

mod config;
mod encode;
mod info;
mod list;

pub use config::{config, ConfigArgs};
pub use encode::{encode, EncodeArgs};
pub use info::{info, InfoArgs};
pub use list::list;
