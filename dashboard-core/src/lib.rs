//! Core library for the `dashboard` tool.
//!
//! This crate defines:
//! - Four independent components: theme, background, weather and jokes
//! - Clients for the public APIs they use (Open-Meteo, JokeAPI, an image host)
//! - Ports to the host platform (storage, color scheme, position, speech)
//! - Configuration handling
//!
//! Every component owns the UI surface it draws on, injected at construction,
//! so it can be driven from a terminal, a test, or any other front end.

pub mod background;
pub mod config;
pub mod generation;
pub mod http;
pub mod joke;
pub mod model;
pub mod platform;
pub mod theme;
pub mod weather;

pub use background::{BackgroundChange, BackgroundRandomizer, BackgroundSurface};
pub use config::Config;
pub use http::FetchError;
pub use joke::{JokeApiClient, JokeError, JokeService, JokeSurface, JokeTeller};
pub use model::{Coordinates, CurrentWeather, Joke, Place, WeatherReading};
pub use theme::{Theme, ThemeController, ThemeSurface};
pub use weather::{
    OpenMeteoClient, WeatherError, WeatherLookup, WeatherPanel, WeatherService, WeatherSurface,
};
