// crates/i18n-gen-cli/src/main.rs
// ============================================================================
// Module: i18n-gen CLI Entry Point
// Description: Command dispatcher for translation code generation.
// Purpose: Provide a safe, localized CLI over the generation pipeline.
// Dependencies: clap, i18n-gen-config, i18n-gen-core, i18n-gen-emit, thiserror.
// ============================================================================

//! ## Overview
//! The i18n-gen CLI loads catalogs below a root directory, validates them,
//! and writes the generated Rust translator module to stdout or a file. It
//! also checks previously generated files for drift and dumps the IR as JSON.
//! All user-facing strings are routed through the i18n catalog. Errors are
//! rendered once, here, on stderr with a non-zero exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use i18n_gen_cli::i18n::Locale;
use i18n_gen_cli::i18n::set_locale;
use i18n_gen_cli::t;
use i18n_gen_config::EmitConfig;
use i18n_gen_config::GeneratorConfig;
use i18n_gen_config::TelemetryConfig;
use i18n_gen_config::TelemetrySink;
use i18n_gen_core::CatalogLoader;
use i18n_gen_core::Generator;
use i18n_gen_core::LoaderOptions;
use i18n_gen_core::telemetry::EventSink;
use i18n_gen_core::telemetry::FileEventSink;
use i18n_gen_core::telemetry::NoopEventSink;
use i18n_gen_core::telemetry::StderrEventSink;
use i18n_gen_emit::EmitterConfig;
use i18n_gen_emit::RustEmitter;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a previously generated file read for drift checks.
const MAX_GENERATED_BYTES: usize = 16 * 1024 * 1024;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "I18N_GEN_LANG";
/// Package name used when `--package` is omitted.
const DEFAULT_PACKAGE: &str = "translation";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "i18n-gen", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `I18N_GEN_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the Rust translator module.
    Generate(GenerateCommand),
    /// Verify a generated file matches the catalogs.
    Check(CheckCommand),
    /// Validate catalogs without emitting code.
    Validate(ValidateCommand),
    /// Print the translation IR as JSON.
    Ir(IrCommand),
}

/// Catalog location and configuration shared by every command.
#[derive(Args, Debug, Clone)]
struct CatalogArgs {
    /// Catalog root directory.
    #[arg(long, value_name = "DIR")]
    root: PathBuf,
    /// Base path below the root to scan (defaults to the root itself).
    #[arg(long = "path", value_name = "BASE")]
    base: Option<PathBuf>,
    /// Optional config file path (defaults to i18n-gen.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
struct GenerateCommand {
    /// Catalog settings.
    #[command(flatten)]
    catalogs: CatalogArgs,
    /// Package name recorded in the generated module.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PACKAGE)]
    package: String,
    /// Output file (defaults to stdout).
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Catalog settings.
    #[command(flatten)]
    catalogs: CatalogArgs,
    /// Package name recorded in the generated module.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PACKAGE)]
    package: String,
    /// Previously generated file to compare against.
    #[arg(long, value_name = "FILE")]
    out: PathBuf,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Catalog settings.
    #[command(flatten)]
    catalogs: CatalogArgs,
}

/// Arguments for `ir`.
#[derive(Args, Debug)]
struct IrCommand {
    /// Catalog settings.
    #[command(flatten)]
    catalogs: CatalogArgs,
    /// Package name recorded in the IR.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PACKAGE)]
    package: String,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Generate(command) => command_generate(&command),
        Commands::Check(command) => command_check(&command),
        Commands::Validate(command) => command_validate(&command),
        Commands::Ir(command) => command_ir(&command),
    }
}

/// Prints CLI help to stdout.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `generate`.
fn command_generate(command: &GenerateCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.catalogs)?;
    let generator = build_generator(&command.catalogs, &command.package, &config)?;
    let emitter = build_emitter(&config.emit)?;
    let ir = generator
        .build(&base_path(&command.catalogs))
        .map_err(|err| CliError::new(t!("generate.failed", error = err)))?;
    let output = generator
        .emit(&ir, &emitter)
        .map_err(|err| CliError::new(t!("generate.failed", error = err)))?;
    match &command.out {
        Some(path) => {
            write_generated_output(path, &output)?;
            write_stdout_line(&t!(
                "generate.ok",
                locales = ir.locales.len(),
                path = path.display()
            ))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        None => write_stdout_bytes(&output)
            .map_err(|err| CliError::new(output_error("stdout", &err)))?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `check`.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.catalogs)?;
    let generator = build_generator(&command.catalogs, &command.package, &config)?;
    let emitter = build_emitter(&config.emit)?;
    let output = generator
        .generate(&base_path(&command.catalogs), &emitter)
        .map_err(|err| CliError::new(t!("check.failed", error = err)))?;
    check_generated_output(&command.out, &output)?;
    write_stdout_line(&t!("check.ok", path = command.out.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `validate`.
fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.catalogs)?;
    let generator = build_generator(&command.catalogs, DEFAULT_PACKAGE, &config)?;
    let ir = generator
        .build(&base_path(&command.catalogs))
        .map_err(|err| CliError::new(t!("validate.failed", error = err)))?;
    write_stdout_line(&t!(
        "validate.ok",
        locales = ir.locales.len(),
        messages = ir.message_ids.len()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `ir`.
fn command_ir(command: &IrCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.catalogs)?;
    let generator = build_generator(&command.catalogs, &command.package, &config)?;
    let json = generator
        .build(&base_path(&command.catalogs))
        .and_then(|ir| ir.to_json())
        .map_err(|err| CliError::new(t!("ir.failed", error = err)))?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Pipeline Wiring
// ============================================================================

/// Loads configuration for a command.
fn load_config(args: &CatalogArgs) -> CliResult<GeneratorConfig> {
    GeneratorConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Returns the base path to scan below the root.
fn base_path(args: &CatalogArgs) -> PathBuf {
    args.base.clone().unwrap_or_default()
}

/// Builds the generator from catalog arguments and configuration.
fn build_generator(
    args: &CatalogArgs,
    package: &str,
    config: &GeneratorConfig,
) -> CliResult<Generator> {
    let options = LoaderOptions {
        suffix: config.catalog.suffix.trim().to_string(),
        max_file_bytes: u64::try_from(config.catalog.max_file_bytes).unwrap_or(u64::MAX),
        max_files: config.catalog.max_files,
    };
    let loader = CatalogLoader::new(&args.root).with_options(options);
    let sink = telemetry_sink(&config.telemetry)?;
    Ok(Generator::new(loader, package).with_sink(sink))
}

/// Builds the telemetry sink selected by configuration.
fn telemetry_sink(config: &TelemetryConfig) -> CliResult<Arc<dyn EventSink>> {
    match (config.sink, &config.path) {
        (TelemetrySink::Stderr, _) => Ok(Arc::new(StderrEventSink)),
        (TelemetrySink::File, Some(path)) => {
            let sink = FileEventSink::new(path).map_err(|err| {
                CliError::new(t!("telemetry.open_failed", path = path.display(), error = err))
            })?;
            Ok(Arc::new(sink))
        }
        (TelemetrySink::None | TelemetrySink::File, _) => Ok(Arc::new(NoopEventSink)),
    }
}

/// Merges configured emitter settings over the emitter defaults.
fn emitter_config(config: &EmitConfig) -> EmitterConfig {
    let mut merged = EmitterConfig::default();
    if let Some(runtime) = &config.runtime_crate {
        merged.runtime_crate = runtime.trim().to_string();
    }
    if let Some(opaque) = &config.opaque_type {
        merged.opaque_type = opaque.trim().to_string();
    }
    for (alias, target) in &config.types {
        merged.type_aliases.insert(alias.trim().to_string(), target.trim().to_string());
    }
    merged.header.clone_from(&config.header);
    merged
}

/// Builds the Rust emitter from configuration.
fn build_emitter(config: &EmitConfig) -> CliResult<RustEmitter> {
    RustEmitter::new(emitter_config(config))
        .map_err(|err| CliError::new(t!("emit.config_invalid", error = err)))
}

// ============================================================================
// SECTION: Output Files
// ============================================================================

/// Writes generated output to disk through a temporary file.
fn write_generated_output(path: &Path, contents: &[u8]) -> CliResult<()> {
    let io_error =
        |err: std::io::Error| CliError::new(t!("generate.io_failed", path = path.display(), error = err));
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let temp_path = path.with_extension("tmp");
    let mut file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(io_error)?;
    file.write_all(contents).map_err(io_error)?;
    file.sync_all().map_err(io_error)?;
    fs::rename(&temp_path, path).map_err(io_error)?;
    Ok(())
}

/// Checks generated output against the on-disk file.
fn check_generated_output(path: &Path, contents: &[u8]) -> CliResult<()> {
    let kind = t!("input.kind.generated");
    let existing = read_bytes_with_limit(path, MAX_GENERATED_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("input.read_failed", kind = kind, path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    if existing != contents {
        return Err(CliError::new(t!("check.drift", path = path.display())));
    }
    Ok(())
}

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Locale
// ============================================================================

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

/// Converts CLI language selections into locales.
impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
