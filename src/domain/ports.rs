use crate::domain::model::LaunchPayload;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the response body of a GET to `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait Launcher: Send + Sync {
    /// Asks the host to open `launch_url`; `Ok(false)` means the host refused it.
    async fn open(&self, launch_url: &str) -> Result<bool>;
}

#[async_trait]
pub trait NoteSink: Send + Sync {
    async fn deliver(&self, payload: &LaunchPayload) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub trait ConfigProvider: Send + Sync {
    fn separators(&self) -> Vec<String>;
    fn user_agent(&self) -> String;
    fn timeout_seconds(&self) -> u64;
    fn heading(&self) -> String;
    fn sections(&self) -> Vec<String>;
    fn placeholder(&self) -> String;
    /// Launch target names or URL templates, in the order they should be tried.
    fn launch_target_names(&self) -> Vec<String>;
    fn launch_command(&self) -> String;
    fn tags(&self) -> String;
}
