//! fetchkit CLI - send one HTTP request through a composed transformer pipeline

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fetchkit_lib::{
    Backoff, EndpointOptions, Fetch, FetchError, FetchRef, Payload, RequestInit, ReqwestFetch,
    Response, ResponseKind, SharedTransformer, body, cache, compose, create_endpoint, debug,
    header, json, method, prefix, query, retry,
};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "fetchkit", version)]
#[command(about = "Send an HTTP request through a composable transformer pipeline", long_about = None)]
struct Cli {
    /// Absolute URL, or a path when --prefix is given
    #[arg(value_name = "URL")]
    url: String,

    /// HTTP method
    #[arg(
        short = 'X',
        long = "request",
        value_name = "METHOD",
        default_value = "GET",
        env = "FETCHKIT_METHOD"
    )]
    method: String,

    /// Request header (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Query parameter (repeatable)
    #[arg(short = 'q', long = "query", value_name = "KEY=VALUE", value_parser = parse_query)]
    query: Vec<(String, String)>,

    /// Request body
    #[arg(short = 'd', long = "data", value_name = "BODY")]
    data: Option<String>,

    /// Send the body as JSON, validating it first
    #[arg(long, requires = "data")]
    json_body: bool,

    /// Base URL prefixed onto the request path
    #[arg(long, value_name = "BASE", env = "FETCHKIT_PREFIX")]
    prefix: Option<String>,

    /// Total attempts; values above 1 enable retries
    #[arg(long, value_name = "N", default_value_t = 1)]
    retry: u32,

    /// Base delay between attempts
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    retry_delay: u64,

    /// Double the delay after each failed attempt
    #[arg(long)]
    exponential: bool,

    /// Cache GET responses for this long
    #[arg(long, value_name = "MS")]
    cache_ms: Option<u64>,

    /// Log the request before it is sent
    #[arg(long)]
    debug: bool,

    /// Exit with an error on non-2xx responses
    #[arg(long)]
    fail: bool,

    /// Request timeout
    #[arg(long, value_name = "MS", env = "FETCHKIT_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `NAME: VALUE`, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in `{raw}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_query(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `KEY=VALUE`, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("missing query key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            // -v: request/response flow
            1 => "warn,fetchkit_lib=info".to_string(),
            // -vv: transformer decisions (cache, retry, debug output)
            2 => "info,fetchkit_lib=debug".to_string(),
            _ => "debug,fetchkit_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Builds the pipeline, outermost first.
fn transformers(cli: &Cli) -> Result<Vec<SharedTransformer>, String> {
    let mut pipeline = vec![method(cli.method.to_uppercase())];

    for (name, value) in &cli.headers {
        pipeline.push(header(name.as_str(), value.as_str()));
    }

    if let Some(data) = &cli.data {
        if cli.json_body {
            serde_json::from_str::<serde_json::Value>(data)
                .map_err(|e| format!("--data is not valid JSON: {e}"))?;
            pipeline.push(json());
        }
        pipeline.push(body(data.clone()));
    }

    if !cli.query.is_empty() {
        pipeline.push(query(cli.query.clone()));
    }

    if let Some(base) = &cli.prefix {
        pipeline.push(prefix(base.as_str()));
    }

    if cli.debug {
        pipeline.push(debug());
    }

    if cli.retry > 1 {
        let backoff = if cli.exponential {
            Backoff::exponential()
        } else {
            Backoff::default()
        };
        pipeline.push(retry(
            cli.retry,
            Duration::from_millis(cli.retry_delay),
            backoff,
        ));
    }

    if let Some(ms) = cli.cache_ms {
        pipeline.push(cache(Duration::from_millis(ms)));
    }

    Ok(pipeline)
}

fn primitive(cli: &Cli) -> Result<ReqwestFetch, FetchError> {
    let mut builder =
        ReqwestFetch::builder().user_agent(concat!("fetchkit/", env!("CARGO_PKG_VERSION")))?;
    if let Some(ms) = cli.timeout_ms {
        builder = builder.timeout(Duration::from_millis(ms));
    }
    builder.build()
}

fn print_response(response: &Response) -> io::Result<()> {
    eprintln!(
        "HTTP {} {}",
        response.status(),
        response.url().unwrap_or_default()
    );
    let mut stdout = io::stdout().lock();
    stdout.write_all(response.bytes())?;
    stdout.flush()
}

async fn run(cli: Cli) -> Result<(), String> {
    let pipeline = transformers(&cli)?;
    let fetch: FetchRef = Arc::new(primitive(&cli).map_err(|e| e.to_string())?);

    let response = if cli.fail {
        let endpoint = create_endpoint(
            pipeline,
            EndpointOptions {
                parse: ResponseKind::Raw,
            },
            fetch,
        );
        match endpoint.call(cli.url.as_str(), Vec::new()).await {
            Ok(Payload::Raw(response)) => response,
            Ok(other) => return Err(format!("unexpected payload: {other:?}")),
            Err(FetchError::Status(err)) => {
                print_response(err.response()).map_err(|e| e.to_string())?;
                return Err(err.to_string());
            }
            Err(e) => return Err(e.to_string()),
        }
    } else {
        compose(pipeline, fetch)
            .fetch(cli.url.as_str().into(), RequestInit::default())
            .await
            .map_err(|e| e.to_string())?
    };

    print_response(&response).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!(url = %cli.url, method = %cli.method, "fetchkit starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fetchkit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn header_parsing() {
        assert_eq!(
            parse_header("Accept: application/json").unwrap(),
            ("Accept".to_string(), "application/json".to_string())
        );
        assert_eq!(
            parse_header("X-Empty:").unwrap(),
            ("X-Empty".to_string(), String::new())
        );
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn query_parsing_keeps_later_equals() {
        assert_eq!(
            parse_query("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert!(parse_query("=x").is_err());
        assert!(parse_query("flag").is_err());
    }

    #[test]
    fn minimal_pipeline_is_just_the_method() {
        let cli = cli(&["https://example.com"]);
        assert_eq!(transformers(&cli).unwrap().len(), 1);
    }

    #[test]
    fn full_pipeline() {
        let cli = cli(&[
            "/items",
            "-X",
            "post",
            "-H",
            "X-Trace: 1",
            "-q",
            "page=2",
            "-d",
            r#"{"a":1}"#,
            "--json-body",
            "--prefix",
            "https://example.com",
            "--debug",
            "--retry",
            "3",
            "--cache-ms",
            "500",
        ]);
        // method, header, json, body, query, prefix, debug, retry, cache
        assert_eq!(transformers(&cli).unwrap().len(), 9);
    }

    #[test]
    fn invalid_json_body_is_rejected() {
        let cli = cli(&["https://example.com", "-d", "{oops", "--json-body"]);
        let err = transformers(&cli).err().unwrap();
        assert!(err.contains("not valid JSON"));
    }

    #[test]
    fn json_body_requires_data() {
        let result = Cli::try_parse_from(["fetchkit", "https://example.com", "--json-body"]);
        assert!(result.is_err());
    }
}
