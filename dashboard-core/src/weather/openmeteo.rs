use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::Endpoints,
    http::{FetchError, get_json},
    model::{Coordinates, CurrentWeather, Place},
};

use super::WeatherService;

/// Open-Meteo geocoding and forecast APIs. No key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client, endpoints: &Endpoints) -> Self {
        Self {
            http,
            geocoding_url: endpoints.geocoding.clone(),
            forecast_url: endpoints.forecast.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResponse {
    // Absent when nothing matched.
    #[serde(default)]
    results: Vec<OmPlace>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current_weather: OmCurrentWeather,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    weathercode: u16,
    windspeed: f64,
    time: String,
}

impl From<OmPlace> for Place {
    fn from(place: OmPlace) -> Self {
        Self {
            name: place.name,
            country: place.country,
            coordinates: Coordinates::new(place.latitude, place.longitude),
        }
    }
}

impl From<OmCurrentWeather> for CurrentWeather {
    fn from(raw: OmCurrentWeather) -> Self {
        Self {
            temperature_c: raw.temperature,
            weather_code: raw.weathercode,
            wind_speed_kmh: raw.windspeed,
            observed_time: raw.time,
        }
    }
}

#[async_trait]
impl WeatherService for OpenMeteoClient {
    async fn geocode(&self, name: &str) -> Result<Vec<Place>, FetchError> {
        let parsed: OmGeocodingResponse = get_json(
            &self.http,
            &self.geocoding_url,
            &[("name", name), ("count", "1")],
        )
        .await?;

        Ok(parsed.results.into_iter().map(Place::from).collect())
    }

    async fn current_weather(&self, at: Coordinates) -> Result<CurrentWeather, FetchError> {
        let latitude = at.latitude.to_string();
        let longitude = at.longitude.to_string();

        let parsed: OmForecastResponse = get_json(
            &self.http,
            &self.forecast_url,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
            ],
        )
        .await?;

        Ok(parsed.current_weather.into())
    }
}
