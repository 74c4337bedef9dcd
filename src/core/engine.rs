use crate::core::resolver::TitleResolver;
use crate::core::template::TemplateRenderer;
use crate::domain::model::{
    BatchReport, DryRunReport, ItemFailure, LaunchPayload, Note, ShareOutcome,
};
use crate::domain::ports::{Clock, NoteSink, PageFetcher};
use crate::utils::error::{Result, SafariError};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DOCUMENT_SEPARATOR: &str = "\n---\n";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// What to do when one URL in a run fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 記錄失敗並繼續處理下一個 URL
    #[default]
    Skip,
    Abort,
}

pub struct SafariEngine<F: PageFetcher, S: NoteSink, K: Clock> {
    resolver: TitleResolver<F>,
    renderer: TemplateRenderer,
    sink: S,
    clock: K,
    policy: FailurePolicy,
}

impl<F: PageFetcher, S: NoteSink, K: Clock> SafariEngine<F, S, K> {
    pub fn new(
        resolver: TitleResolver<F>,
        renderer: TemplateRenderer,
        sink: S,
        clock: K,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            resolver,
            renderer,
            sink,
            clock,
            policy,
        }
    }

    /// Resolves one URL and renders its note with today's date.
    pub async fn process_url(&self, url: &str) -> Result<Note> {
        let post = self.resolver.resolve(url).await?;
        let current_date = self.clock.today().format(DATE_FORMAT).to_string();
        let document = self.renderer.render(
            url,
            post.thread_title.as_deref(),
            post.site_name.as_deref(),
            &current_date,
        );

        Ok(Note {
            source_url: url.to_string(),
            title: post.thread_title.unwrap_or_default(),
            document,
        })
    }

    /// One note per URL, delivered as soon as it is rendered.
    pub async fn run_batch<I>(&self, urls: I) -> Result<BatchReport>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        let mut report = BatchReport::default();

        for (index, next) in urls.into_iter().enumerate() {
            let url = match next {
                Ok(url) => url,
                Err(e) => {
                    let label = format!("<input #{}>", index + 1);
                    self.handle_failure(&mut report.failures, label, e)?;
                    continue;
                }
            };

            tracing::info!("🔗 Processing {}", url);
            let outcome = match self.process_url(&url).await {
                Ok(note) => self.sink.deliver(&LaunchPayload::from(note)).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => report.delivered += 1,
                Err(e) => self.handle_failure(&mut report.failures, url, e)?,
            }
        }

        tracing::info!(
            "✅ Batch finished: {} delivered, {} failed",
            report.delivered,
            report.failures.len()
        );
        Ok(report)
    }

    /// All notes joined into one payload, titled after the last URL processed.
    pub async fn run_share(&self, urls: &[String]) -> Result<ShareOutcome> {
        let mut outcome = ShareOutcome::default();
        let mut documents = Vec::with_capacity(urls.len());
        let mut last: Option<Note> = None;

        for url in urls {
            tracing::info!("🔗 Processing {}", url);
            match self.process_url(url).await {
                Ok(note) => {
                    documents.push(note.document.clone());
                    last = Some(note);
                }
                Err(e) => self.handle_failure(&mut outcome.failures, url.clone(), e)?,
            }
        }

        let Some(last) = last else {
            tracing::warn!("No notes were produced, nothing to deliver");
            return Ok(outcome);
        };

        let payload = LaunchPayload {
            text: documents.join(DOCUMENT_SEPARATOR),
            title: last.title,
            source_url: last.source_url,
        };
        self.sink.deliver(&payload).await?;

        outcome.note_count = documents.len();
        outcome.payload = Some(payload);
        Ok(outcome)
    }

    /// Resolves titles without rendering or delivering anything. Unreadable
    /// input lines go through the failure policy like in a batch run.
    pub async fn dry_run<I>(&self, urls: I) -> Result<DryRunReport>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        let mut report = DryRunReport::default();
        for (index, next) in urls.into_iter().enumerate() {
            let url = match next {
                Ok(url) => url,
                Err(e) => {
                    let label = format!("<input #{}>", index + 1);
                    self.handle_failure(&mut report.failures, label, e)?;
                    continue;
                }
            };

            match self.resolver.resolve(&url).await {
                Ok(post) => report.resolved.push((url, post)),
                Err(e) => self.handle_failure(&mut report.failures, url, e)?,
            }
        }
        Ok(report)
    }

    fn handle_failure(
        &self,
        failures: &mut Vec<ItemFailure>,
        url: String,
        error: SafariError,
    ) -> Result<()> {
        match self.policy {
            FailurePolicy::Abort => {
                tracing::error!("❌ {} failed, aborting: {}", url, error);
                Err(error)
            }
            FailurePolicy::Skip => {
                tracing::warn!("⚠️ Skipping {}: {}", url, error);
                failures.push(ItemFailure { url, error });
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::title::default_separators;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct FixedClock;

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        }
    }

    struct MapFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl PageFetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| SafariError::HttpStatusError {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        delivered: Arc<Mutex<Vec<LaunchPayload>>>,
    }

    #[async_trait]
    impl NoteSink for RecordingSink {
        async fn deliver(&self, payload: &LaunchPayload) -> Result<()> {
            self.delivered.lock().await.push(payload.clone());
            Ok(())
        }
    }

    fn build_engine(
        policy: FailurePolicy,
    ) -> (SafariEngine<MapFetcher, RecordingSink, FixedClock>, RecordingSink) {
        let pages = HashMap::from([
            (
                "https://forum.example.com/a".to_string(),
                "<title>Thread About Widgets | MyForum</title>".to_string(),
            ),
            (
                "https://blog.example.com/b".to_string(),
                "<title>Just A Page Title</title>".to_string(),
            ),
        ]);
        let sink = RecordingSink::default();
        let engine = SafariEngine::new(
            TitleResolver::new(MapFetcher { pages }, default_separators()),
            TemplateRenderer::default(),
            sink.clone(),
            FixedClock,
            policy,
        );
        (engine, sink)
    }

    #[tokio::test]
    async fn test_process_url_renders_with_clock_date() {
        let (engine, _) = build_engine(FailurePolicy::Skip);
        let note = engine.process_url("https://blog.example.com/b").await.unwrap();

        assert_eq!(note.title, "Just A Page Title");
        assert!(note
            .document
            .contains("> [Just A Page Title](https://blog.example.com/b)"));
        assert!(note.document.contains("From:   \n"));
        assert!(note.document.contains("Analysis date: 2024-03-09  \n"));
    }

    #[tokio::test]
    async fn test_batch_skips_failures_by_default() {
        let (engine, sink) = build_engine(FailurePolicy::Skip);
        let urls = vec![
            Ok("https://forum.example.com/a".to_string()),
            Ok("https://missing.example.com/x".to_string()),
            Ok("https://blog.example.com/b".to_string()),
        ];

        let report = engine.run_batch(urls).await.unwrap();

        assert_eq!(report.delivered, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, "https://missing.example.com/x");
        assert_eq!(sink.delivered.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_abort_stops_at_first_failure() {
        let (engine, sink) = build_engine(FailurePolicy::Abort);
        let urls = vec![
            Ok("https://missing.example.com/x".to_string()),
            Ok("https://forum.example.com/a".to_string()),
        ];

        let result = engine.run_batch(urls).await;

        assert!(matches!(result, Err(SafariError::HttpStatusError { .. })));
        assert!(sink.delivered.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_empty_input() {
        let (engine, sink) = build_engine(FailurePolicy::Skip);
        let report = engine.run_batch(Vec::new()).await.unwrap();

        assert_eq!(report.delivered, 0);
        assert!(report.is_clean());
        assert!(sink.delivered.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_share_joins_documents_and_uses_last_title() {
        let (engine, sink) = build_engine(FailurePolicy::Skip);
        let urls = vec![
            "https://forum.example.com/a".to_string(),
            "https://blog.example.com/b".to_string(),
        ];

        let outcome = engine.run_share(&urls).await.unwrap();

        assert_eq!(outcome.note_count, 2);
        let delivered = sink.delivered.lock().await;
        assert_eq!(delivered.len(), 1);
        let payload = &delivered[0];
        assert_eq!(payload.title, "Just A Page Title");
        assert_eq!(payload.source_url, "https://blog.example.com/b");

        let parts: Vec<&str> = payload.text.split(DOCUMENT_SEPARATOR).collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains("From: MyForum  \n"));
        assert!(parts[1].contains("> [Just A Page Title]"));
    }

    #[tokio::test]
    async fn test_share_with_no_successful_notes_delivers_nothing() {
        let (engine, sink) = build_engine(FailurePolicy::Skip);
        let urls = vec!["https://missing.example.com/x".to_string()];

        let outcome = engine.run_share(&urls).await.unwrap();

        assert!(outcome.payload.is_none());
        assert_eq!(outcome.failures.len(), 1);
        assert!(sink.delivered.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_resolves_without_delivering() {
        let (engine, sink) = build_engine(FailurePolicy::Skip);
        let urls = vec![
            Ok("https://forum.example.com/a".to_string()),
            Ok("https://missing.example.com/x".to_string()),
        ];

        let report = engine.dry_run(urls).await.unwrap();

        assert_eq!(report.resolved.len(), 1);
        assert_eq!(report.resolved[0].1.site_name.as_deref(), Some("MyForum"));
        assert_eq!(report.failures.len(), 1);
        assert!(sink.delivered.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_skips_unreadable_input_line() {
        let (engine, _) = build_engine(FailurePolicy::Skip);
        let urls = vec![
            Ok("https://forum.example.com/a".to_string()),
            Err(SafariError::EncodingError {
                field: "input line 2".to_string(),
                message: "stream did not contain valid UTF-8".to_string(),
            }),
            Ok("https://blog.example.com/b".to_string()),
        ];

        let report = engine.dry_run(urls).await.unwrap();

        assert_eq!(report.resolved.len(), 2);
        assert_eq!(report.resolved[1].0, "https://blog.example.com/b");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, "<input #2>");
        assert!(matches!(
            report.failures[0].error,
            SafariError::EncodingError { .. }
        ));
    }

    #[tokio::test]
    async fn test_dry_run_abort_on_unreadable_input_line() {
        let (engine, _) = build_engine(FailurePolicy::Abort);
        let urls = vec![Err(SafariError::EncodingError {
            field: "input line 1".to_string(),
            message: "stream did not contain valid UTF-8".to_string(),
        })];

        let result = engine.dry_run(urls).await;

        assert!(matches!(result, Err(SafariError::EncodingError { .. })));
    }
}
