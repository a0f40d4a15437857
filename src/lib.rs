//! Community-grouped layout, selection highlighting and expertise-overlap
//! recommendations for researcher collaboration networks.

pub mod config;
pub mod error;
pub mod layout;
pub mod network;
pub mod recommend;
pub mod util;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
