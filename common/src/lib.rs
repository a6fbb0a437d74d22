mod catalog;
mod config;
mod db;
mod error;
mod generator;
mod notifier;
mod schema;
mod workflow;

pub use catalog::*;
pub use config::*;
pub use db::*;
pub use error::*;
pub use generator::*;
pub use notifier::*;
pub use schema::*;
pub use workflow::*;
