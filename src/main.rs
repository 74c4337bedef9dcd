use anyhow::Context;
use clap::Parser;
use safari_gold::core::input::UrlLines;
use safari_gold::core::{ConfigProvider, NoteSink};
use safari_gold::utils::error::{ErrorSeverity, SafariError};
use safari_gold::utils::{logger, validation::Validate};
use safari_gold::{
    CliConfig, HttpFetcher, OpenCommandLauncher, SafariEngine, StdoutSink, SystemClock,
    TemplateRenderer, TitleResolver, UrlSchemeSink,
};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting safari-gold");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(
                "❌ safari-gold failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            exit_code_for(&e)
        }
    };

    std::io::stdout().flush().context("Failed to flush stdout")?;
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run(cli: &CliConfig) -> Result<i32, SafariError> {
    let config = cli.load_config()?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    let fetcher = HttpFetcher::new(&config.user_agent(), config.timeout_seconds())?;
    let resolver = TitleResolver::new(fetcher, config.separators());
    let renderer = TemplateRenderer::new(config.heading(), config.sections(), config.placeholder());
    let policy = config.failure_policy();

    if cli.print || cli.dry_run {
        let engine = SafariEngine::new(resolver, renderer, StdoutSink::new(), SystemClock, policy);
        return run_with(cli, engine).await;
    }

    let launcher = OpenCommandLauncher::new(config.launch_command());
    let sink = UrlSchemeSink::new(launcher, config.launch_targets()?, config.tags());
    let engine = SafariEngine::new(resolver, renderer, sink, SystemClock, policy);
    run_with(cli, engine).await
}

async fn run_with<S: NoteSink>(
    cli: &CliConfig,
    engine: SafariEngine<HttpFetcher, S, SystemClock>,
) -> Result<i32, SafariError> {
    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - titles are resolved but nothing is rendered or launched");
        let report = if cli.is_share_mode() {
            engine.dry_run(cli.urls.iter().cloned().map(Ok)).await?
        } else {
            engine.dry_run(UrlLines::new(std::io::stdin().lock())).await?
        };
        for (url, post) in &report.resolved {
            println!("URL: {}", url);
            println!("Title: {}", post.thread_title.as_deref().unwrap_or_default());
            println!("From: {}", post.site_name.as_deref().unwrap_or_default());
            println!();
        }
        for failure in &report.failures {
            eprintln!("❌ {}: {}", failure.url, failure.error.user_friendly_message());
        }
        return Ok(failure_exit_code(report.failures.len()));
    }

    if cli.is_share_mode() {
        let outcome = engine.run_share(&cli.urls).await?;
        match &outcome.payload {
            Some(payload) => tracing::info!(
                "✅ Delivered {} note(s) as '{}'",
                outcome.note_count,
                payload.title
            ),
            None => tracing::warn!("⚠️ No notes were delivered"),
        }
        return Ok(failure_exit_code(outcome.failures.len()));
    }

    // 沒有參數時，從 stdin 逐行讀取 URL 直到 EOF
    let report = engine.run_batch(UrlLines::new(std::io::stdin().lock())).await?;
    for failure in &report.failures {
        eprintln!("❌ {}: {}", failure.url, failure.error.user_friendly_message());
    }
    Ok(failure_exit_code(report.failures.len()))
}

fn failure_exit_code(failures: usize) -> i32 {
    if failures > 0 {
        1
    } else {
        0
    }
}

// 根據錯誤嚴重程度決定退出碼
fn exit_code_for(e: &SafariError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
