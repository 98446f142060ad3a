#![deny(warnings)]

use anyhow::Context;
use chunk_translator_core::config::{
    ConfigError, LanguagePair, ProviderConfig, SourceLang, StdEnv, TargetLang, AUTO_SOURCE_LANG,
    DEFAULT_TARGET_LANG, DEFAULT_TIMEOUT_MS, ENV_MODEL_ID, ENV_TRANSLATION_API_ENDPOINT,
    ENV_TRANSLATION_API_KEY,
};
use chunk_translator_core::normalize::read_translation;
use chunk_translator_core::proxy;
use chunk_translator_core::segment::split_sentences;
use chunk_translator_core::translate::{
    translate, DummyProvider, ResponsesApiProvider, TranslateError, TranslateRequest,
    TranslationProvider,
};
use chunk_translator_core::util::{retry_with_backoff, RetryConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chunk-translator")]
#[command(about = "Translate text and split the result into sentence chunks")]
struct Args {
    #[arg(long, global = true, env = ENV_TRANSLATION_API_KEY, hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, global = true, env = ENV_MODEL_ID)]
    model: Option<String>,

    #[arg(long, global = true, env = ENV_TRANSLATION_API_ENDPOINT)]
    endpoint: Option<String>,

    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Answer with the input text instead of calling the provider
    #[arg(long, global = true)]
    offline: bool,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate TEXT and print it one sentence chunk per line
    Translate {
        text: String,

        #[arg(long, default_value = AUTO_SOURCE_LANG)]
        from: String,

        #[arg(long, default_value = DEFAULT_TARGET_LANG)]
        to: String,

        /// Exchange --from and --to before translating
        #[arg(long)]
        swap: bool,

        /// Print the whole result, alignments included, as JSON
        #[arg(long)]
        json: bool,

        /// Extra attempts after a retryable failure
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Normalize a saved provider response (FILE or stdin) without any network call
    Normalize { file: Option<PathBuf> },
    /// Run the translation endpoint on a request BODY (or stdin) and print the reply
    Invoke {
        #[arg(long, default_value = "POST")]
        method: String,

        body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    match args.command {
        Command::Translate {
            ref text,
            ref from,
            ref to,
            swap,
            json,
            retries,
        } => {
            let mut languages = LanguagePair {
                source: SourceLang::parse(from),
                target: TargetLang::new(to.as_str())?,
            };
            if swap {
                languages = languages.swap()?;
            }
            let provider = build_provider(&args)?
                .context("no api key configured; pass --api-key or use --offline")?;
            run_translate(&*provider, text, languages, json, retries).await
        }
        Command::Normalize { ref file } => run_normalize(file.as_ref()).await,
        Command::Invoke {
            ref method,
            ref body,
        } => {
            let provider = build_provider(&args)?;
            let body = match body {
                Some(body) => body.clone(),
                None => read_stdin().await?,
            };
            let response = proxy::handle(method, Some(&body), provider.as_deref()).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// `None` when no api key is available and `--offline` is not set.
fn build_provider(args: &Args) -> anyhow::Result<Option<Box<dyn TranslationProvider>>> {
    if args.offline {
        tracing::info!("offline mode, echoing input");
        let provider: Box<dyn TranslationProvider> = Box::new(DummyProvider::new());
        return Ok(Some(provider));
    }

    let config = match ProviderConfig::resolve(
        args.api_key.clone(),
        args.model.clone(),
        args.endpoint.clone(),
        args.timeout_ms,
        &StdEnv,
    ) {
        Ok(config) => config,
        Err(ConfigError::MissingApiKey) => return Ok(None),
        Err(e) => return Err(e).context("invalid provider configuration"),
    };

    tracing::info!(
        endpoint = %config.endpoint,
        model = %config.model,
        timeout_ms = args.timeout_ms,
        "config loaded"
    );

    let provider: Box<dyn TranslationProvider> = Box::new(ResponsesApiProvider::new(config)?);
    Ok(Some(provider))
}

async fn run_translate(
    provider: &dyn TranslationProvider,
    text: &str,
    languages: LanguagePair,
    json: bool,
    retries: u32,
) -> anyhow::Result<()> {
    let text = text.trim();
    anyhow::ensure!(!text.is_empty(), "nothing to translate");

    let request = TranslateRequest {
        text: text.to_owned(),
        source: languages.source,
        target: languages.target,
    };
    let retry = RetryConfig::new(retries.saturating_add(1), Duration::from_millis(500));

    let result = retry_with_backoff(
        &retry,
        || translate(provider, request.clone()),
        |e: &TranslateError| e.is_retryable(),
    )
    .await
    .context("translation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for chunk in split_sentences(&result.text) {
            println!("{}", chunk.trim_end());
        }
    }
    Ok(())
}

async fn run_normalize(file: Option<&PathBuf>) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => read_stdin().await?,
    };
    let response: serde_json::Value =
        serde_json::from_str(&raw).context("provider response is not JSON")?;

    let result = read_translation(&response);
    if result.is_empty() {
        tracing::warn!("no usable translation in response");
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("failed to read stdin")?;
    Ok(buf)
}
