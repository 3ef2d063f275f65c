#![allow(
    clippy::too_many_lines,            // command handlers mirror CLI options
    clippy::needless_pass_by_value,    // clap requires owned values
    clippy::fn_params_excessive_bools, // CLI commands have many boolean flags
)]

//! specmatrix CLI - exam specification matrix generator
//!
//! Sends exam matrix documents to Gemini, prints the resulting matrix and
//! exports it as HTML, JSON or DOCX.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use specmatrix_cli::config::{Config, DEFAULT_CONFIG};
use specmatrix_cli::credentials::{
    mask_key, resolve_api_key, CredentialStore, KeySource, API_KEY_ENV,
};
use specmatrix_core::render::{render_html, render_text};
use specmatrix_core::source::format_file_size;
use specmatrix_core::{
    reconcile, CognitiveLevel, LevelConfig, MatrixConfig, MatrixData, MatrixError, MatrixView,
    SourceFile, SourceKind,
};
use specmatrix_gemini::{
    GeminiClient, GenerationRequest, MatrixGenerator, ModelType, DEFAULT_BASE_URL,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }

    const fn log_level(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "specmatrix",
    about = "Generate exam specification matrices from exam documents",
    long_about = "Generate exam specification matrices (bản đặc tả đề kiểm tra) from\n\
                  exam matrix documents with Gemini, then render or export them.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a specification matrix from source documents
    #[command(long_about = "Generate a specification matrix from source documents.\n\
                      \n\
                      Every file is sent inline in a single request. Supported types:\n\
                      PDF, PNG, JPEG, WEBP, GIF, HEIC, HEIF.\n\
                      \n\
                      Levels take PERCENT,MULTIPLE_CHOICE,FREE_RESPONSE, e.g. --recognition 30,8,1")]
    Generate {
        /// Exam matrix documents to analyse
        #[arg(value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Layout samples the result should imitate
        #[arg(long, value_name = "FILE")]
        template: Vec<PathBuf>,

        /// Model: flash or pro
        #[arg(short, long)]
        model: Option<ModelType>,

        /// API key (overrides GEMINI_API_KEY and the stored key)
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,

        /// Do not send a requested question distribution
        #[arg(long)]
        no_config: bool,

        /// Recognition level as PERCENT,MC,FR
        #[arg(long, value_name = "P,MC,FR")]
        recognition: Option<LevelConfig>,

        /// Understanding level as PERCENT,MC,FR
        #[arg(long, value_name = "P,MC,FR")]
        understanding: Option<LevelConfig>,

        /// Application level as PERCENT,MC,FR
        #[arg(long, value_name = "P,MC,FR")]
        application: Option<LevelConfig>,

        /// High application level as PERCENT,MC,FR
        #[arg(long, value_name = "P,MC,FR")]
        high_application: Option<LevelConfig>,

        /// Extra instructions appended to the prompt
        #[arg(long, value_name = "TEXT", default_value = "")]
        instructions: String,

        /// Save the result as JSON
        #[arg(long, value_name = "OUT")]
        json: Option<PathBuf>,

        /// Save the result as an HTML page
        #[arg(long, value_name = "OUT")]
        html: Option<PathBuf>,

        /// Export DOCX into DIR (config output_dir or current directory when omitted)
        #[arg(long, value_name = "DIR")]
        docx: Option<Option<PathBuf>>,

        /// Report discrepancies between counted rows, summary and request
        #[arg(long)]
        check: bool,
    },

    /// Print a saved matrix
    Render {
        /// Matrix JSON produced by `generate --json`
        #[arg(value_name = "MATRIX_JSON")]
        input: PathBuf,

        /// Save as an HTML page instead of printing the table
        #[arg(long, value_name = "OUT")]
        html: Option<PathBuf>,

        /// Report discrepancies between counted rows and summary
        #[arg(long)]
        check: bool,
    },

    /// Export a saved matrix as DOCX
    Export {
        /// Matrix JSON produced by `generate --json`
        #[arg(value_name = "MATRIX_JSON")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Manage configuration settings
    #[command(long_about = "Manage specmatrix configuration files.\n\
                      \n\
                      Configuration files are loaded in this order (later overrides earlier):\n\
                        1. User config: ~/.specmatrix.toml\n\
                        2. Project config: ./.specmatrix.toml\n\
                        3. Command-line arguments")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum KeyAction {
    /// Store an API key
    Set {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Show the key in use (masked) and where it comes from
    Show,
    /// Delete the stored key
    Clear,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Create a .specmatrix.toml with the default distribution
    Init {
        /// Create in the home directory (~/.specmatrix.toml)
        #[arg(long)]
        global: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the effective configuration
    Show {
        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Show the configuration and credential file paths
    Path,
}

/// Options of one `generate` invocation after clap parsing.
struct GenerateOptions {
    files: Vec<PathBuf>,
    templates: Vec<PathBuf>,
    model: Option<ModelType>,
    api_key: Option<String>,
    no_config: bool,
    levels: [(CognitiveLevel, Option<LevelConfig>); 4],
    instructions: String,
    json: Option<PathBuf>,
    html: Option<PathBuf>,
    docx: Option<Option<PathBuf>>,
    check: bool,
}

fn init_logging(verbosity: Verbosity) {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in [
        "specmatrix",
        "specmatrix_cli",
        "specmatrix_core",
        "specmatrix_gemini",
        "specmatrix_docx",
    ] {
        if let Ok(directive) = format!("{target}={}", verbosity.log_level()).parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);
    init_logging(verbosity);

    let (user_config, project_config) = Config::discover_configs();
    let config = Config::merge(user_config, project_config);

    match args.command {
        Commands::Generate {
            files,
            template,
            model,
            api_key,
            no_config,
            recognition,
            understanding,
            application,
            high_application,
            instructions,
            json,
            html,
            docx,
            check,
        } => {
            let options = GenerateOptions {
                files,
                templates: template,
                model,
                api_key,
                no_config,
                levels: [
                    (CognitiveLevel::Recognition, recognition),
                    (CognitiveLevel::Understanding, understanding),
                    (CognitiveLevel::Application, application),
                    (CognitiveLevel::HighApplication, high_application),
                ],
                instructions,
                json,
                html,
                docx,
                check,
            };
            generate_command(options, &config, verbosity).await
        }
        Commands::Render { input, html, check } => {
            render_command(&input, html.as_deref(), check || config.check(), verbosity)
        }
        Commands::Export { input, output } => {
            let dir = output
                .or_else(|| config.output_dir().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("."));
            export_command(&input, &dir, verbosity)
        }
        Commands::Key { action } => key_command(action, verbosity),
        Commands::Config { action } => config_command(action, &config, verbosity),
    }
}

/// Requested distribution: config file levels, then CLI overrides.
fn requested_distribution(
    config: &Config,
    levels: &[(CognitiveLevel, Option<LevelConfig>)],
) -> MatrixConfig {
    let mut requested = config.matrix_config();
    for (level, value) in levels {
        if let Some(value) = value {
            *requested.level_mut(*level) = *value;
        }
    }
    requested
}

async fn generate_command(
    options: GenerateOptions,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    // Preconditions are checked before anything is read or sent
    let store = CredentialStore::locate()?;
    let stored = store.load()?;
    let env_key = std::env::var(API_KEY_ENV).ok();
    let Some((api_key, source)) =
        resolve_api_key(options.api_key.as_deref(), env_key.as_deref(), stored.as_deref())
    else {
        eprintln!(
            "{} Run `specmatrix key set <KEY>` or set {API_KEY_ENV}",
            "Hint:".cyan().bold()
        );
        return Err(MatrixError::MissingCredential.into());
    };
    debug!(%source, "using API key");

    if options.files.is_empty() {
        return Err(MatrixError::NoSourceFiles.into());
    }

    let mut sources = Vec::with_capacity(options.files.len() + options.templates.len());
    for path in &options.files {
        sources.push(SourceFile::load(path, SourceKind::MatrixSource)?);
    }
    for path in &options.templates {
        sources.push(SourceFile::load(path, SourceKind::TemplateSource)?);
    }

    if verbosity.should_show_output() {
        for source in &sources {
            eprintln!(
                "  {} {} ({})",
                format!("[{}]", source.kind).dimmed(),
                source.display_name(),
                format_file_size(source.size)
            );
        }
    }

    let requested = if options.no_config {
        None
    } else {
        let requested = requested_distribution(config, &options.levels);
        if let Some(message) = requested.validate() {
            eprintln!("{} {message}", "Warning:".yellow().bold());
        }
        Some(requested)
    };

    let files = sources
        .iter()
        .map(SourceFile::payload)
        .collect::<specmatrix_core::Result<Vec<_>>>()?;

    let model = config.resolve_model(options.model);
    let request = GenerationRequest {
        model,
        files,
        config: requested,
        additional_instructions: options.instructions,
    };

    let client = GeminiClient::with_base_url(api_key, config.endpoint().unwrap_or(DEFAULT_BASE_URL));

    let spinner = if verbosity.should_show_output() {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Generating with {}", model.description()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    } else {
        None
    };

    let result = client.generate(&request).await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!(error = %e, "generation failed");
            eprintln!("{} {}", "Error:".red().bold(), e.user_message());
            std::process::exit(1);
        }
    };

    info!(
        rows = outcome.data.rows.len(),
        latency_ms = outcome.latency_ms,
        "generation complete"
    );
    if verbosity.is_verbose() {
        eprintln!(
            "{} {} | {} input / {} output tokens | {}ms",
            "Model:".cyan().bold(),
            outcome.model,
            outcome.input_tokens,
            outcome.output_tokens,
            outcome.latency_ms
        );
    }

    let view = MatrixView::new(outcome.data);

    if verbosity.should_show_output() {
        println!("{}", render_text(&view));
    }
    if options.check || config.check() {
        report_discrepancies(&view, request.config.as_ref());
    }

    if let Some(path) = &options.json {
        save_json(view.data(), path, verbosity)?;
    }
    if let Some(path) = &options.html {
        save_html(&view, path, verbosity)?;
    }
    if let Some(dir) = options.docx {
        let dir = dir
            .or_else(|| config.output_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        save_docx(&view, &dir, verbosity)?;
    }

    Ok(())
}

fn load_matrix(path: &Path) -> Result<MatrixView> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read matrix file: {}", path.display()))?;
    let data: MatrixData = serde_json::from_str(&content)
        .map_err(MatrixError::from)
        .with_context(|| format!("Invalid matrix JSON: {}", path.display()))?;
    Ok(MatrixView::new(data))
}

fn report_discrepancies(view: &MatrixView, requested: Option<&MatrixConfig>) {
    let found = reconcile(view.totals(), &view.data().summary, requested);
    if found.is_empty() {
        eprintln!("{} Summary matches the counted rows", "Check:".green().bold());
        return;
    }
    for discrepancy in &found {
        eprintln!("{} {discrepancy}", "Warning:".yellow().bold());
    }
}

fn save_json(data: &MatrixData, path: &Path, verbosity: Verbosity) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    if verbosity.should_show_output() {
        eprintln!("{} Saved {}", "Success:".green().bold(), path.display());
    }
    Ok(())
}

fn save_html(view: &MatrixView, path: &Path, verbosity: Verbosity) -> Result<()> {
    fs::write(path, render_html(view))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    if verbosity.should_show_output() {
        eprintln!("{} Saved {}", "Success:".green().bold(), path.display());
    }
    Ok(())
}

fn save_docx(view: &MatrixView, dir: &Path, verbosity: Verbosity) -> Result<()> {
    let path = specmatrix_docx::export_to_path(view, dir)
        .map_err(|e| MatrixError::ExportError(e.to_string()))
        .with_context(|| format!("Failed to export DOCX into {}", dir.display()))?;
    if verbosity.should_show_output() {
        eprintln!("{} Exported {}", "Success:".green().bold(), path.display());
    }
    Ok(())
}

fn render_command(
    input: &Path,
    html: Option<&Path>,
    check: bool,
    verbosity: Verbosity,
) -> Result<()> {
    let view = load_matrix(input)?;

    match html {
        Some(path) => save_html(&view, path, verbosity)?,
        None => println!("{}", render_text(&view)),
    }
    if check {
        report_discrepancies(&view, None);
    }
    Ok(())
}

fn export_command(input: &Path, dir: &Path, verbosity: Verbosity) -> Result<()> {
    let view = load_matrix(input)?;
    save_docx(&view, dir, verbosity)
}

fn key_command(action: KeyAction, verbosity: Verbosity) -> Result<()> {
    let store = CredentialStore::locate()?;

    match action {
        KeyAction::Set { key } => {
            let saved = store.save(&key)?;
            if verbosity.should_show_output() {
                println!(
                    "{} Stored API key {} in {}",
                    "Success:".green().bold(),
                    mask_key(&saved),
                    store.path().display()
                );
            }
        }
        KeyAction::Show => {
            let stored = store.load()?;
            let env_key = std::env::var(API_KEY_ENV).ok();
            let Some((key, source)) =
                resolve_api_key(None, env_key.as_deref(), stored.as_deref())
            else {
                eprintln!("{} No API key configured", "Note:".yellow().bold());
                std::process::exit(1);
            };
            let location = match source {
                KeySource::Store => store.path().display().to_string(),
                other => other.to_string(),
            };
            println!("{} ({location})", mask_key(&key));
        }
        KeyAction::Clear => {
            let removed = store.clear()?;
            if verbosity.should_show_output() {
                if removed {
                    println!("{} Removed stored API key", "Success:".green().bold());
                } else {
                    println!("{} No stored API key", "Note:".yellow().bold());
                }
            }
        }
    }
    Ok(())
}

fn config_command(action: ConfigAction, config: &Config, verbosity: Verbosity) -> Result<()> {
    match action {
        ConfigAction::Init { global, force } => config_init(global, force, verbosity),
        ConfigAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("{}", toml::to_string_pretty(config)?);
            }
            Ok(())
        }
        ConfigAction::Path => {
            let user = Config::user_config_path()
                .map_or_else(|| "(no home directory)".to_string(), |p| p.display().to_string());
            println!("user:        {user}");
            println!("project:     {}", Config::project_config_path().display());
            println!("credentials: {}", CredentialStore::locate()?.path().display());
            Ok(())
        }
    }
}

fn config_init(global: bool, force: bool, verbosity: Verbosity) -> Result<()> {
    let config_path = if global {
        Config::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
    } else {
        Config::project_config_path()
    };

    if config_path.exists() && !force {
        eprintln!(
            "{} Configuration file already exists: {}",
            "Error:".red().bold(),
            config_path.display()
        );
        eprintln!("{} Use --force to overwrite", "Hint:".cyan().bold());
        std::process::exit(1);
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    if verbosity.should_show_output() {
        println!(
            "{} Created configuration file: {}",
            "Success:".green().bold(),
            config_path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::Verbose.log_level(), "debug");
    }

    #[test]
    fn test_cli_levels_override_config() {
        let config: Config =
            toml::from_str("[levels.understanding]\npercent = 35\nmultiple_choice = 2\nfree_response = 2\n")
                .unwrap();
        let requested = requested_distribution(
            &config,
            &[
                (CognitiveLevel::Recognition, Some(LevelConfig::new(35, 10, 0))),
                (CognitiveLevel::Application, None),
            ],
        );
        assert_eq!(requested.recognition, LevelConfig::new(35, 10, 0));
        assert_eq!(requested.understanding, LevelConfig::new(35, 2, 2));
        assert_eq!(requested.application, LevelConfig::new(20, 0, 4));
    }

    #[test]
    fn test_args_parse_generate() {
        let args = Args::try_parse_from([
            "specmatrix",
            "generate",
            "a.pdf",
            "b.png",
            "--template",
            "t.pdf",
            "--model",
            "pro",
            "--recognition",
            "30,8,1",
            "--docx",
        ])
        .unwrap();
        let Commands::Generate {
            files,
            template,
            model,
            recognition,
            docx,
            ..
        } = args.command
        else {
            panic!("expected generate");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(template, vec![PathBuf::from("t.pdf")]);
        assert_eq!(model, Some(ModelType::Pro));
        assert_eq!(recognition, Some(LevelConfig::new(30, 8, 1)));
        assert_eq!(docx, Some(None));
    }

    #[test]
    fn test_args_reject_bad_level() {
        assert!(Args::try_parse_from([
            "specmatrix",
            "generate",
            "a.pdf",
            "--recognition",
            "30,8"
        ])
        .is_err());
    }
}
