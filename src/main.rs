use anyhow::Result;
use clap::{Parser, Subcommand};

use agriguide::api::PredictionRequest;
use agriguide::cli;

#[derive(Debug, Parser)]
#[command(name = "agriguide")]
#[command(about = "AgriGuide farmer dashboard: crop prediction, AgriBot chat, languages")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Recommend a crop from soil and weather readings
    Predict {
        /// Nitrogen content (kg/ha)
        #[arg(long, default_value = "")]
        nitrogen: String,
        /// Phosphorus content (kg/ha)
        #[arg(long, default_value = "")]
        phosphorus: String,
        /// Potassium content (kg/ha)
        #[arg(long, default_value = "")]
        potassium: String,
        /// Temperature (°C)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        temperature: String,
        /// Relative humidity (%)
        #[arg(long, default_value = "")]
        humidity: String,
        /// Soil pH
        #[arg(long, default_value = "")]
        ph: String,
        /// Rainfall (mm)
        #[arg(long, default_value = "")]
        rainfall: String,
    },
    /// Ask AgriBot; starts an interactive chat when no message is given
    Chat {
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Show or set the preferred language
    Language {
        /// Language code to save, e.g. `hi`
        code: Option<String>,
    },
    /// List supported languages
    Languages {
        /// Ask the backend instead of using the built-in list
        #[arg(long)]
        remote: bool,
    },
    /// Translate text through the backend
    Translate {
        /// Target language code
        #[arg(long)]
        to: String,
        /// Source language code
        #[arg(long, default_value = "auto")]
        from: String,
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },
    /// Interactive session over every dashboard section
    Dashboard,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.agriguide/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value by dotted key, e.g. `server.base_url`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Predict {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
        } => cli::run_predict(&PredictionRequest {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
        }),
        Commands::Chat { message } => cli::run_chat(&message.join(" ")),
        Commands::Language { code } => cli::run_language(code.as_deref()),
        Commands::Languages { remote } => cli::run_languages(remote),
        Commands::Translate { to, from, text } => cli::run_translate(&text.join(" "), &to, &from),
        Commands::Dashboard => cli::run_dashboard(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
