// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use pagebabel::app_config::{self, Config, TranslationProvider, GEMINI_KEY_ENV};
use pagebabel::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Ollama,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a file of text fragments
    Translate {
        /// Plain text (one fragment per line) or a JSON array of strings or text nodes
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Target language, real or imaginary
        #[arg(short, long)]
        target_language: Option<String>,

        /// Output file (defaults to INPUT.<language>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate a single string
    Text {
        /// Text to translate
        text: String,

        /// Target language, real or imaginary
        #[arg(short, long)]
        target_language: Option<String>,
    },

    /// Check that the configured provider is reachable
    Check,

    /// Generate shell completions for pagebabel
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// PageBabel - playful batch translation of page text
#[derive(Parser, Debug)]
#[command(name = "pagebabel")]
#[command(version = "0.1.0")]
#[command(about = "Translate page text into any language, real or not, with a generative model")]
#[command(long_about = "PageBabel sends text fragments to a generative language model in batches \
and writes the translations back in the same order. Fragments that cannot be translated keep \
their original text.

EXAMPLES:
    pagebabel translate page.json -t Pirate          # Translate a JSON array of strings or nodes
    pagebabel translate copy.txt -t Klingon -o out.txt
    pagebabel -p ollama -m llama3.2:3b translate copy.txt -t Elvish
    pagebabel text \"Hello world\" -t Shakespearean
    pagebabel check                                  # Test the provider connection
    pagebabel completions bash > pagebabel.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    gemini - Google Gemini API (requires API key, or GEMINI_KEY in the environment)
    ollama - Local Ollama server (default: llama3.2:3b)
    mock   - Offline echo provider for trying things out")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Translation provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// API key for the provider
    #[arg(long, env = GEMINI_KEY_ENV, hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation; filtering follows `log::max_level`
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "pagebabel", &mut std::io::stdout());
        return Ok(());
    }

    let target_override = match &cli.command {
        Commands::Translate { target_language, .. } | Commands::Text { target_language, .. } => target_language.clone(),
        _ => None,
    };
    let config = load_config(&cli, target_override)?;
    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Translate { input_path, output, .. } => {
            controller.run(&input_path, output).await?;
        }
        Commands::Text { text, .. } => {
            let translation = controller.translate_text(&text).await?;
            println!("{}", translation);
        }
        Commands::Check => controller.check_connection().await?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

// @loads: Config file, applies command line overrides, validates
fn load_config(cli: &CommandLineOptions, target_language: Option<String>) -> Result<Config> {
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (mut config, created) = Config::load_or_create(&cli.config_path)?;
    if created {
        warn!("Config file not found at '{}', created default config.", cli.config_path);
    }

    if let Some(provider) = &cli.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &cli.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.translation.active_provider_config_mut().api_key = api_key.clone();
    }
    if let Some(target_language) = target_language {
        config.target_language = target_language;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}
