use anyhow::{Context, Result};
use std::sync::Arc;

use dashboard_core::{
    BackgroundRandomizer, Config, JokeApiClient, JokeTeller, OpenMeteoClient, ThemeController,
    WeatherLookup, http,
    platform::{
        CommandSpeech, ConfiguredGeolocator, HttpImageLoader, SystemColorScheme, TomlFileStore,
    },
};

use crate::terminal::{TerminalBackground, TerminalJoke, TerminalTheme, TerminalWeather};

/// The four components wired to the terminal and the native platform.
pub struct Dashboard {
    pub theme: ThemeController,
    pub theme_surface: Arc<TerminalTheme>,
    pub background: Arc<BackgroundRandomizer>,
    pub weather: WeatherLookup,
    pub jokes: JokeTeller,
}

impl Dashboard {
    pub fn new(config: &Config) -> Result<Self> {
        let client = http::build_client().context("Failed to build HTTP client")?;
        let store = TomlFileStore::new(Config::preferences_file_path()?);
        tracing::debug!(path = %store.path().display(), "preferences store");

        let theme_surface = Arc::new(TerminalTheme::default());
        let theme = ThemeController::new(
            theme_surface.clone(),
            Arc::new(store),
            Arc::new(SystemColorScheme::from_env(&config.appearance)),
        );

        let background = BackgroundRandomizer::new(
            Arc::new(TerminalBackground),
            Arc::new(HttpImageLoader::new(client.clone())),
            config.endpoints.image.clone(),
        );

        let weather = WeatherLookup::new(
            Arc::new(TerminalWeather),
            Arc::new(OpenMeteoClient::new(client.clone(), &config.endpoints)),
            Arc::new(ConfiguredGeolocator::new(config.location.clone())),
        );

        let jokes = JokeTeller::new(
            Arc::new(TerminalJoke),
            Arc::new(JokeApiClient::new(client, config.endpoints.joke.clone())),
            Arc::new(CommandSpeech::new(config.speech.clone())),
        );

        Ok(Self {
            theme,
            theme_surface,
            background: Arc::new(background),
            weather,
            jokes,
        })
    }

    /// Start a background change without waiting for the image.
    pub fn spawn_background_change(&self) {
        let background = self.background.clone();
        tokio::spawn(async move {
            background.change_background().await;
        });
    }
}
