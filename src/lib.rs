pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use core::engine::{FailurePolicy, SafariEngine, SystemClock};
pub use core::launch::{LaunchTarget, OpenCommandLauncher, StdoutSink, UrlSchemeSink};
pub use core::resolver::{HttpFetcher, TitleResolver};
pub use core::template::TemplateRenderer;
pub use domain::model::{LaunchPayload, Note, ResolvedPost};
pub use utils::error::{Result, SafariError};
