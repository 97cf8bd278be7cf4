use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}, {:.2}", self.latitude, self.longitude)
    }
}

/// A geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
}

impl Place {
    pub fn label(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// Conditions reported by the forecast service for one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub weather_code: u16,
    pub wind_speed_kmh: f64,
    /// Provider timestamp as sent, e.g. `2024-05-01T14:30`.
    pub observed_time: String,
}

/// A rendered weather result, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReading {
    pub temperature: String,
    pub icon: &'static str,
    pub description: String,
    pub wind: String,
    pub observed: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum Joke {
    #[serde(rename = "single")]
    Single { joke: String },

    #[serde(rename = "twopart")]
    TwoPart { setup: String, delivery: String },
}

impl Joke {
    /// The text that is both displayed and spoken.
    pub fn text(&self) -> String {
        match self {
            Joke::Single { joke } => joke.clone(),
            Joke::TwoPart { setup, delivery } => format!("{setup} ... {delivery}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_display_with_two_decimals() {
        assert_eq!(Coordinates::new(52.5244, 13.4105).to_string(), "52.52, 13.41");
        assert_eq!(Coordinates::new(-33.0, 151.2).to_string(), "-33.00, 151.20");
    }

    #[test]
    fn place_label_includes_country_when_known() {
        let mut place = Place {
            name: "Berlin".to_string(),
            country: Some("Germany".to_string()),
            coordinates: Coordinates::new(52.52, 13.41),
        };
        assert_eq!(place.label(), "Berlin, Germany");

        place.country = None;
        assert_eq!(place.label(), "Berlin");
    }

    #[test]
    fn two_part_joke_joins_setup_and_delivery() {
        let joke = Joke::TwoPart {
            setup: "S".to_string(),
            delivery: "D".to_string(),
        };
        assert_eq!(joke.text(), "S ... D");
    }

    #[test]
    fn single_joke_is_used_verbatim() {
        let joke = Joke::Single {
            joke: "J".to_string(),
        };
        assert_eq!(joke.text(), "J");
    }

    #[test]
    fn joke_payloads_decode_with_extra_fields() {
        let single: Joke = serde_json::from_str(
            r#"{"error":false,"category":"Programming","type":"single","joke":"J","id":1,"safe":true,"lang":"en"}"#,
        )
        .unwrap();
        assert_eq!(single.text(), "J");

        let two: Joke = serde_json::from_str(
            r#"{"type":"twopart","setup":"S","delivery":"D","flags":{"nsfw":false}}"#,
        )
        .unwrap();
        assert_eq!(two.text(), "S ... D");
    }

    #[test]
    fn error_payload_does_not_decode_as_joke() {
        let res = serde_json::from_str::<Joke>(
            r#"{"error":true,"internalError":false,"code":106,"message":"No matching joke found"}"#,
        );
        assert!(res.is_err());
    }
}
