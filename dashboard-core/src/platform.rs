//! Ports to the host platform: storage, color scheme, position, speech and
//! image loading, together with their native implementations.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::model::Coordinates;

pub mod geolocation;
pub mod image;
pub mod scheme;
pub mod speech;
pub mod storage;

pub use geolocation::{ConfiguredGeolocator, PositionError};
pub use image::{HttpImageLoader, ImageError};
pub use scheme::SystemColorScheme;
pub use speech::{CommandSpeech, SpeechError, Utterance};
pub use storage::{MemoryStore, StoreError, TomlFileStore};

/// Persistent string key-value storage.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub trait ColorSchemeSource: Send + Sync {
    /// `None` when the platform expresses no preference.
    fn prefers_dark(&self) -> Option<bool>;
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    fn is_available(&self) -> bool;
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// Speech output. At most one utterance is expected to play at a time.
pub trait SpeechSynthesizer: Send + Sync + Debug {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;
    fn cancel(&self);
    fn is_speaking(&self) -> bool;
}

#[async_trait]
pub trait ImageLoader: Send + Sync + Debug {
    /// Resolves once the image at `url` has been fully fetched.
    async fn preload(&self, url: &str) -> Result<(), ImageError>;
}
