//! City and device-location weather lookup.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    generation::{Generation, Ticket},
    http::FetchError,
    model::{Coordinates, CurrentWeather, Place, WeatherReading},
    platform::{Geolocator, PositionError},
};

pub mod openmeteo;

pub use openmeteo::OpenMeteoClient;

pub const LOADING_MESSAGE: &str = "Fetching weather...";
pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name or use My Location.";
pub const DEVICE_LOCATION_LABEL: &str = "Your Location";
pub const FALLBACK_ICON: &str = "🌡️";

#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    /// Places matching `name`, best match first.
    async fn geocode(&self, name: &str) -> Result<Vec<Place>, FetchError>;
    async fn current_weather(&self, at: Coordinates) -> Result<CurrentWeather, FetchError>;
}

/// What the weather panel shows. Status text and result are never shown together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherPanel {
    Idle,
    Loading(String),
    Ready(WeatherReading),
    Failed(String),
}

pub trait WeatherSurface: Send + Sync {
    fn render(&self, panel: &WeatherPanel);
    /// Blocking notice for invalid input.
    fn alert(&self, message: &str);
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Please enter a city name or use My Location.")]
    EmptyCity,

    #[error("City not found.")]
    NotFound,

    #[error("Error fetching location.")]
    Geocoding(#[source] FetchError),

    #[error("Unable to fetch weather.")]
    Forecast(#[source] FetchError),

    #[error("Location permission denied.")]
    PermissionDenied(#[source] PositionError),

    #[error("Geolocation not supported.")]
    NotSupported,

    #[error("a newer weather request replaced this one")]
    Superseded,
}

/// Icon for a WMO weather code.
pub fn weather_icon(code: u16) -> &'static str {
    match code {
        0 => "☀️",
        1 => "🌤️",
        2 => "⛅",
        3 => "☁️",
        45 | 48 => "🌫️",
        51 => "🌦️",
        61 => "🌧️",
        71 => "❄️",
        95 => "⛈️",
        _ => FALLBACK_ICON,
    }
}

/// Human-readable text for a WMO weather code.
pub fn weather_description(code: u16) -> String {
    let text = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 | 57 => "Freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        other => return format!("Code {other}"),
    };
    text.to_string()
}

/// Nearest integer, halves going up: -2.5 becomes -2, 2.5 becomes 3.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

impl WeatherReading {
    /// `label` falls back to the coordinates when absent or empty.
    pub fn new(weather: &CurrentWeather, at: Coordinates, label: Option<&str>) -> Self {
        let location = match label {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => at.to_string(),
        };

        Self {
            temperature: format!("{}°C", round_half_up(weather.temperature_c)),
            icon: weather_icon(weather.weather_code),
            description: weather_description(weather.weather_code),
            wind: format!("{} km/h", weather.wind_speed_kmh),
            observed: weather.observed_time.replacen('T', " ", 1),
            location,
        }
    }
}

pub struct WeatherLookup {
    surface: Arc<dyn WeatherSurface>,
    service: Arc<dyn WeatherService>,
    geolocator: Arc<dyn Geolocator>,
    generation: Generation,
}

impl WeatherLookup {
    pub fn new(
        surface: Arc<dyn WeatherSurface>,
        service: Arc<dyn WeatherService>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        Self {
            surface,
            service,
            geolocator,
            generation: Generation::default(),
        }
    }

    /// Text-entry path: trim, reject empty input, then resolve and fetch.
    pub async fn lookup_city(&self, input: &str) -> Result<WeatherReading, WeatherError> {
        let city = input.trim();
        if city.is_empty() {
            self.surface.alert(EMPTY_CITY_MESSAGE);
            return Err(WeatherError::EmptyCity);
        }

        let ticket = self.generation.issue();
        let place = self.resolve_city(city, ticket).await?;
        self.fetch(place.coordinates, Some(&place.label()), ticket).await
    }

    /// Device-location path.
    pub async fn lookup_here(&self) -> Result<WeatherReading, WeatherError> {
        let ticket = self.generation.issue();

        if !self.geolocator.is_available() {
            return Err(self.fail(ticket, WeatherError::NotSupported));
        }

        let at = match self.geolocator.current_position().await {
            Ok(at) => at,
            Err(err) => return Err(self.fail(ticket, WeatherError::PermissionDenied(err))),
        };

        self.fetch(at, Some(DEVICE_LOCATION_LABEL), ticket).await
    }

    /// Fetch and render conditions at `at`; without a label the coordinates are shown.
    pub async fn fetch_weather(
        &self,
        at: Coordinates,
        label: Option<&str>,
    ) -> Result<WeatherReading, WeatherError> {
        let ticket = self.generation.issue();
        self.fetch(at, label, ticket).await
    }

    async fn resolve_city(&self, city: &str, ticket: Ticket) -> Result<Place, WeatherError> {
        let places = match self.service.geocode(city).await {
            Ok(places) => places,
            Err(err) => return Err(self.fail(ticket, WeatherError::Geocoding(err))),
        };

        if !self.generation.is_current(ticket) {
            return Err(WeatherError::Superseded);
        }

        match places.into_iter().next() {
            Some(place) => {
                tracing::debug!(city, place = %place.label(), "resolved city");
                Ok(place)
            }
            None => Err(self.fail(ticket, WeatherError::NotFound)),
        }
    }

    async fn fetch(
        &self,
        at: Coordinates,
        label: Option<&str>,
        ticket: Ticket,
    ) -> Result<WeatherReading, WeatherError> {
        if self.generation.is_current(ticket) {
            self.surface
                .render(&WeatherPanel::Loading(LOADING_MESSAGE.to_string()));
        }

        let weather = match self.service.current_weather(at).await {
            Ok(weather) => weather,
            Err(err) => return Err(self.fail(ticket, WeatherError::Forecast(err))),
        };

        if !self.generation.is_current(ticket) {
            tracing::debug!(%at, "discarding superseded weather");
            return Err(WeatherError::Superseded);
        }

        let reading = WeatherReading::new(&weather, at, label);
        self.surface.render(&WeatherPanel::Ready(reading.clone()));
        Ok(reading)
    }

    /// Show `err` as the panel status, unless a newer request owns the panel.
    fn fail(&self, ticket: Ticket, err: WeatherError) -> WeatherError {
        if !self.generation.is_current(ticket) {
            tracing::debug!(error = %err, "discarding superseded weather failure");
            return WeatherError::Superseded;
        }

        if let WeatherError::Geocoding(source) | WeatherError::Forecast(source) = &err {
            tracing::error!(error = %source, "{err}");
        }

        self.surface.render(&WeatherPanel::Failed(err.to_string()));
        err
    }
}
