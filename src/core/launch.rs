use crate::domain::model::LaunchPayload;
use crate::domain::ports::{Launcher, NoteSink};
use crate::utils::error::{Result, SafariError};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;
use std::io::{Stdout, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use url::Url;

/// Everything except RFC 3986 unreserved characters gets escaped; space is `%20`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const DEFAULT_TAGS: &str = "Safari Gold";

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

pub fn default_launch_command() -> String {
    if cfg!(target_os = "macos") {
        "open".to_string()
    } else {
        "xdg-open".to_string()
    }
}

pub fn default_targets() -> Vec<String> {
    vec!["devonthink".to_string(), "ia-writer".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// `x-devonthink://createMarkdown`
    DevonthinkMarkdown,
    /// `x-devonthink://clip`, keeps the source URL as the record location
    DevonthinkClip,
    IaWriter,
    /// Any scheme URL with `{text}`, `{title}`, `{url}` and `{tags}` placeholders.
    Custom(String),
}

impl LaunchTarget {
    pub fn build_url(&self, payload: &LaunchPayload, tags: &str) -> String {
        let text = encode_component(&payload.text);
        let title = encode_component(&payload.title);
        match self {
            LaunchTarget::DevonthinkMarkdown => format!(
                "x-devonthink://createMarkdown?text={}&title={}&tags={}",
                text,
                title,
                encode_component(tags)
            ),
            LaunchTarget::DevonthinkClip => format!(
                "x-devonthink://clip?text={}&location={}&title={}",
                text,
                encode_component(&payload.source_url),
                title
            ),
            LaunchTarget::IaWriter => format!("ia-writer://new?&text={}&edit=true", text),
            LaunchTarget::Custom(template) => template
                .replace("{text}", &text)
                .replace("{title}", &title)
                .replace("{url}", &encode_component(&payload.source_url))
                .replace("{tags}", &encode_component(tags)),
        }
    }
}

impl FromStr for LaunchTarget {
    type Err = SafariError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "devonthink" => Ok(LaunchTarget::DevonthinkMarkdown),
            "devonthink-clip" => Ok(LaunchTarget::DevonthinkClip),
            "ia-writer" => Ok(LaunchTarget::IaWriter),
            custom if custom.contains("://") && custom.contains("{text}") => {
                Ok(LaunchTarget::Custom(custom.to_string()))
            }
            other => Err(SafariError::InvalidConfigValueError {
                field: "launch.targets".to_string(),
                value: other.to_string(),
                reason: "Expected devonthink, devonthink-clip, ia-writer, or a scheme URL containing {text}"
                    .to_string(),
            }),
        }
    }
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchTarget::DevonthinkMarkdown => write!(f, "devonthink"),
            LaunchTarget::DevonthinkClip => write!(f, "devonthink-clip"),
            LaunchTarget::IaWriter => write!(f, "ia-writer"),
            LaunchTarget::Custom(template) => {
                let scheme = template.split("://").next().unwrap_or(template);
                write!(f, "{}://", scheme)
            }
        }
    }
}

/// Runs the host's URL opener (`open` on macOS, `xdg-open` elsewhere).
#[derive(Debug, Clone)]
pub struct OpenCommandLauncher {
    program: String,
}

impl OpenCommandLauncher {
    pub fn new(program: String) -> Self {
        Self { program }
    }
}

impl Default for OpenCommandLauncher {
    fn default() -> Self {
        Self::new(default_launch_command())
    }
}

#[async_trait]
impl Launcher for OpenCommandLauncher {
    async fn open(&self, launch_url: &str) -> Result<bool> {
        tracing::debug!("Running {} for a {} byte URL", self.program, launch_url.len());
        let status = tokio::process::Command::new(&self.program)
            .arg(launch_url)
            .status()
            .await?;
        Ok(status.success())
    }
}

/// Hands each payload to the first launch target the host accepts.
pub struct UrlSchemeSink<L: Launcher> {
    launcher: L,
    targets: Vec<LaunchTarget>,
    tags: String,
}

impl<L: Launcher> UrlSchemeSink<L> {
    pub fn new(launcher: L, targets: Vec<LaunchTarget>, tags: String) -> Self {
        Self {
            launcher,
            targets,
            tags,
        }
    }
}

#[async_trait]
impl<L: Launcher> NoteSink for UrlSchemeSink<L> {
    async fn deliver(&self, payload: &LaunchPayload) -> Result<()> {
        let mut attempted = Vec::with_capacity(self.targets.len());

        for target in &self.targets {
            let launch_url = target.build_url(payload, &self.tags);
            Url::parse(&launch_url).map_err(|e| SafariError::EncodingError {
                field: format!("launch url for {}", target),
                message: e.to_string(),
            })?;

            attempted.push(target.to_string());
            match self.launcher.open(&launch_url).await {
                Ok(true) => {
                    tracing::info!("🚀 Opened note '{}' with {}", payload.title, target);
                    return Ok(());
                }
                Ok(false) => {
                    tracing::debug!("Launch target {} was refused, trying next", target);
                }
                Err(e) => {
                    tracing::warn!("Launch target {} failed: {}", target, e);
                }
            }
        }

        Err(SafariError::LaunchError { attempted })
    }
}

/// Writes notes to stdout (or any writer) instead of launching an app.
/// Consecutive notes are separated by a `---` line.
#[derive(Debug)]
pub struct StdoutSink<W: Write + Send = Stdout> {
    writer: Mutex<W>,
    written: AtomicUsize,
}

impl StdoutSink<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for StdoutSink<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> StdoutSink<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            written: AtomicUsize::new(0),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: Write + Send> NoteSink for StdoutSink<W> {
    async fn deliver(&self, payload: &LaunchPayload) -> Result<()> {
        let mut writer = self.writer.lock().await;
        if self.written.fetch_add(1, Ordering::SeqCst) > 0 {
            writeln!(writer, "---")?;
        }
        write!(writer, "{}", payload.text)?;
        writer.flush()?;
        Ok(())
    }
}
