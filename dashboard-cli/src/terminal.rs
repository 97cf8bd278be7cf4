//! Terminal renditions of the component surfaces.

use std::sync::{Mutex, PoisonError};

use dashboard_core::{BackgroundSurface, JokeSurface, ThemeSurface, WeatherPanel, WeatherSurface};

/// Holds the theme attribute for the lifetime of the process.
#[derive(Debug, Default)]
pub struct TerminalTheme {
    attribute: Mutex<Option<String>>,
    icon: Mutex<String>,
}

impl TerminalTheme {
    pub fn icon(&self) -> String {
        self.icon.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ThemeSurface for TerminalTheme {
    fn set_theme_attribute(&self, value: Option<&str>) {
        *self.attribute.lock().unwrap_or_else(PoisonError::into_inner) = value.map(str::to_string);
    }

    fn theme_attribute(&self) -> Option<String> {
        self.attribute
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_toggle_icon(&self, icon: &str) {
        *self.icon.lock().unwrap_or_else(PoisonError::into_inner) = icon.to_string();
    }
}

#[derive(Debug, Default)]
pub struct TerminalBackground;

impl BackgroundSurface for TerminalBackground {
    fn set_opacity(&self, opacity: f32) {
        tracing::debug!(opacity, "background opacity");
    }

    fn set_background_image(&self, url: &str) {
        println!("🖼️  Background: {url}");
    }
}

#[derive(Debug, Default)]
pub struct TerminalWeather;

impl WeatherSurface for TerminalWeather {
    fn render(&self, panel: &WeatherPanel) {
        match panel {
            WeatherPanel::Idle => {}
            WeatherPanel::Loading(status) | WeatherPanel::Failed(status) => println!("{status}"),
            WeatherPanel::Ready(reading) => {
                println!("{} {}  {}", reading.icon, reading.temperature, reading.location);
                println!("   {}", reading.description);
                println!("   Wind: {}", reading.wind);
                println!("   Observed: {}", reading.observed);
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }
}

#[derive(Debug, Default)]
pub struct TerminalJoke;

impl JokeSurface for TerminalJoke {
    fn show_text(&self, text: &str) {
        println!("{text}");
    }
}
