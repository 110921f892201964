//! formsmith-store: storage backends and link generators.
//!
//! Implements the `FormStore` and `LinkGenerator` traits from
//! `formsmith-core`, and loads the `formsmith.toml` configuration that picks
//! where forms live.

pub mod config;
pub mod fs;
pub mod link;
pub mod memory;

pub use config::{load_config, load_config_from, open_service, FormsmithConfig};
pub use fs::JsonDirStore;
pub use link::{RandomLinks, SequentialLinks};
pub use memory::InMemoryStore;
