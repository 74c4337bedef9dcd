pub mod engine;
pub mod input;
pub mod launch;
pub mod resolver;
pub mod template;
pub mod title;

pub use crate::domain::model::{BatchReport, LaunchPayload, Note, ResolvedPost, ShareOutcome};
pub use crate::domain::ports::{Clock, ConfigProvider, Launcher, NoteSink, PageFetcher};
pub use crate::utils::error::Result;
