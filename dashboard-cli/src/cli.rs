use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::{process::ExitCode, time::Duration};

use dashboard_core::{BackgroundChange, Config, JokeTeller, Theme};

use crate::{app::Dashboard, interactive};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "dashboard",
    version,
    about = "Theme, backgrounds, weather and jokes from the terminal"
)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current theme, or change it.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Pick a new random background photo.
    Background,

    /// Show current weather for a city or the configured location.
    Weather {
        /// City name, e.g. "Berlin".
        city: Option<String>,

        /// Use the device location from the config file.
        #[arg(long, conflicts_with = "city")]
        here: bool,
    },

    /// Fetch a random joke and read it aloud. Ctrl-C stops speaking.
    Joke,

    /// Menu-driven session.
    Interactive,

    /// Inspect the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    /// Switch between dark and light.
    Toggle,

    /// Use a specific theme.
    Set { theme: Theme },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,

    /// Print the config file location.
    Path,
}

fn status(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        let config = Config::load()?;
        let dash = Dashboard::new(&config)?;

        let ok = match self.command.unwrap_or(Command::Interactive) {
            Command::Theme { action } => {
                let theme = match action {
                    None => dash.theme.initialize(),
                    Some(ThemeAction::Toggle) => {
                        dash.theme.initialize();
                        dash.theme.toggle()
                    }
                    Some(ThemeAction::Set { theme }) => {
                        dash.theme.set(theme);
                        theme
                    }
                };
                println!("Theme: {theme} {}", dash.theme_surface.icon());
                true
            }
            Command::Background => matches!(
                dash.background.change_background().await,
                BackgroundChange::Committed(_)
            ),
            Command::Weather { city, here } => {
                let res = if here {
                    dash.weather.lookup_here().await
                } else {
                    dash.weather
                        .lookup_city(city.as_deref().unwrap_or_default())
                        .await
                };
                res.is_ok()
            }
            Command::Joke => {
                let told = dash.jokes.tell_joke().await.is_ok();
                if told {
                    wait_for_speech(&dash.jokes).await;
                }
                told
            }
            Command::Interactive => {
                interactive::run(&dash).await?;
                true
            }
            Command::Config { action } => {
                match action {
                    ConfigAction::Show => print!("{}", config.to_toml_string()?),
                    ConfigAction::Path => println!("{}", Config::config_file_path()?.display()),
                }
                true
            }
        };

        Ok(status(ok))
    }
}

/// Block until the current utterance finishes, stopping it on Ctrl-C.
async fn wait_for_speech(jokes: &JokeTeller) {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                jokes.stop_speaking();
                break;
            }
            _ = tick.tick() => {
                if !jokes.is_speaking() {
                    break;
                }
            }
        }
    }
}
