//! Publishes a run's output metadata to the catalog.
//!
//! Reads the input manifest, layers configuration (file, environment, flags),
//! posts one catalog document, and prints a one-line JSON summary of the
//! catalog's reply to stdout. Logs go to stderr.

use anyhow::{Context, Result, anyhow};
use catalog_publisher::{
    CatalogPublisher, ConfigLayer, HttpTransport, InputManifest, PipelineId, PublisherConfig,
};
use serde_json::json;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    init_logging(args.log_level);

    let config = resolve_config(&args)?;
    let manifest = InputManifest::load(&args.manifest)?;
    let transport = HttpTransport::new(config.timeout)?;

    let report = CatalogPublisher::run(
        transport,
        &config,
        manifest.files_input(),
        manifest.rdf_input(),
    )?;

    println!(
        "{}",
        serde_json::to_string(&json!({
            "accepted": report.accepted(),
            "status": report.status,
            "resources": report.resource_count,
        }))?
    );
    Ok(())
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &CliArgs) -> Result<PublisherConfig> {
    let file_layer = match &args.config {
        Some(path) => ConfigLayer::from_file(path)?,
        None => ConfigLayer::default(),
    };
    let cli_layer = ConfigLayer {
        catalog_api_location: args.catalog_api_location.clone(),
        pipeline_id: args.pipeline_id.clone(),
        fail_on_rejection: args.fail_on_rejection.then_some(true),
        timeout_secs: args.timeout_secs,
    };
    file_layer
        .merge(ConfigLayer::from_env())
        .merge(cli_layer)
        .build()
}

/// Parsed command-line arguments.
struct CliArgs {
    manifest: PathBuf,
    config: Option<PathBuf>,
    catalog_api_location: Option<String>,
    pipeline_id: Option<PipelineId>,
    fail_on_rejection: bool,
    timeout_secs: Option<u64>,
    log_level: Level,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut config = PartialArgs::default();

        while let Some(arg_os) = args.next() {
            let arg = os_to_string(arg_os)?;
            match arg.as_str() {
                "--manifest" => {
                    config.manifest = Some(PathBuf::from(next_value(&mut args, "--manifest")?))
                }
                "--config" => {
                    config.config = Some(PathBuf::from(next_value(&mut args, "--config")?))
                }
                "--catalog-api-location" => {
                    config.catalog_api_location =
                        Some(next_value(&mut args, "--catalog-api-location")?)
                }
                "--pipeline-id" => {
                    let raw = next_value(&mut args, "--pipeline-id")?;
                    config.pipeline_id = Some(PipelineId::parse(&raw));
                }
                "--fail-on-rejection" => config.fail_on_rejection = true,
                "--timeout-secs" => {
                    let raw = next_value(&mut args, "--timeout-secs")?;
                    config.timeout_secs = Some(
                        raw.parse::<u64>()
                            .with_context(|| format!("Failed to parse --timeout-secs '{raw}'"))?,
                    );
                }
                "--log-level" => {
                    config.log_level = Some(parse_level(&next_value(&mut args, "--log-level")?)?)
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown flag: {other}");
                    print_usage();
                    std::process::exit(1);
                }
            }
        }

        config.build()
    }
}

#[derive(Default)]
struct PartialArgs {
    manifest: Option<PathBuf>,
    config: Option<PathBuf>,
    catalog_api_location: Option<String>,
    pipeline_id: Option<PipelineId>,
    fail_on_rejection: bool,
    timeout_secs: Option<u64>,
    log_level: Option<Level>,
}

impl PartialArgs {
    fn build(self) -> Result<CliArgs> {
        Ok(CliArgs {
            manifest: self
                .manifest
                .ok_or_else(|| anyhow!("Missing required flag: --manifest"))?,
            config: self.config,
            catalog_api_location: self.catalog_api_location.filter(|v| !v.is_empty()),
            pipeline_id: self.pipeline_id,
            fail_on_rejection: self.fail_on_rejection,
            timeout_secs: self.timeout_secs,
            log_level: self.log_level.unwrap_or(Level::INFO),
        })
    }
}

fn parse_level(raw: &str) -> Result<Level> {
    match raw.to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(anyhow!(
            "Unknown log level: {other} (expected trace|debug|info|warn|error)"
        )),
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("Missing value for {flag}"))?;
    os_to_string(value)
}

fn os_to_string(value: OsString) -> Result<String> {
    value
        .into_string()
        .map_err(|raw| anyhow!("Argument is not valid UTF-8: {}", raw.to_string_lossy()))
}

fn print_usage() {
    eprintln!("{}", usage());
}

fn usage() -> &'static str {
    "Usage: catalog-publish --manifest PATH [options]\n\nOptions:\n  --config PATH                 JSON config (catalogApiLocation, pipelineId, failOnRejection, timeoutSecs)\n  --catalog-api-location URL    overrides config and CATALOG_API_LOCATION\n  --pipeline-id ID              overrides config and CATALOG_PIPELINE_ID\n  --fail-on-rejection           exit non-zero when the catalog answers with a non-200 status\n  --timeout-secs N              overall request timeout\n  --log-level LEVEL             trace|debug|info|warn|error (default info)\n"
}
