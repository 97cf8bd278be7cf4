use async_trait::async_trait;

use crate::{config::LocationConfig, model::Coordinates};

use super::Geolocator;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("permission to read the device position was denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// Device position taken from the `[location]` configuration section.
///
/// Without that section the capability is reported as missing.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocator {
    location: Option<LocationConfig>,
}

impl ConfiguredGeolocator {
    pub fn new(location: Option<LocationConfig>) -> Self {
        Self { location }
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    fn is_available(&self) -> bool {
        self.location.is_some()
    }

    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        let location = self
            .location
            .as_ref()
            .ok_or_else(|| PositionError::Unavailable("no location configured".to_string()))?;

        if !location.allow {
            return Err(PositionError::PermissionDenied);
        }

        if !(-90.0..=90.0).contains(&location.latitude)
            || !(-180.0..=180.0).contains(&location.longitude)
        {
            return Err(PositionError::Unavailable(format!(
                "configured coordinates out of range: {}, {}",
                location.latitude, location.longitude
            )));
        }

        Ok(Coordinates::new(location.latitude, location.longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(latitude: f64, longitude: f64, allow: bool) -> ConfiguredGeolocator {
        ConfiguredGeolocator::new(Some(LocationConfig {
            latitude,
            longitude,
            allow,
        }))
    }

    #[tokio::test]
    async fn returns_configured_position() {
        let geo = located(48.85, 2.35, true);
        assert!(geo.is_available());
        assert_eq!(
            geo.current_position().await,
            Ok(Coordinates::new(48.85, 2.35))
        );
    }

    #[tokio::test]
    async fn refuses_when_not_allowed() {
        let geo = located(48.85, 2.35, false);
        assert_eq!(
            geo.current_position().await,
            Err(PositionError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn out_of_range_is_unavailable() {
        let geo = located(123.0, 2.35, true);
        assert!(matches!(
            geo.current_position().await,
            Err(PositionError::Unavailable(_))
        ));
    }

    #[test]
    fn unavailable_without_configuration() {
        assert!(!ConfiguredGeolocator::default().is_available());
    }
}
