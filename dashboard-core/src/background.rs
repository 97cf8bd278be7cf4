use rand::Rng;
use std::{ops::Range, sync::Arc};

use crate::{generation::Generation, platform::ImageLoader};

/// Range of the cache-busting seed appended to image URLs.
pub const SEED_RANGE: Range<u32> = 0..100_000;

/// Opacity held while the next image is loading.
pub const FADED_OPACITY: f32 = 0.5;

pub trait BackgroundSurface: Send + Sync {
    fn set_opacity(&self, opacity: f32);
    fn set_background_image(&self, url: &str);
}

/// How a single background change ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundChange {
    Committed(String),
    /// The image failed to load; the surface stays faded.
    Stuck(String),
    /// A newer change started before this image finished loading.
    Superseded(String),
}

pub struct BackgroundRandomizer {
    surface: Arc<dyn BackgroundSurface>,
    loader: Arc<dyn ImageLoader>,
    image_host: String,
    generation: Generation,
}

impl BackgroundRandomizer {
    pub fn new(
        surface: Arc<dyn BackgroundSurface>,
        loader: Arc<dyn ImageLoader>,
        image_host: impl Into<String>,
    ) -> Self {
        Self {
            surface,
            loader,
            image_host: image_host.into(),
            generation: Generation::default(),
        }
    }

    pub fn image_url(&self, seed: u32) -> String {
        format!(
            "{}/1920/1080?random={seed}",
            self.image_host.trim_end_matches('/')
        )
    }

    pub async fn change_background(&self) -> BackgroundChange {
        let seed = rand::thread_rng().gen_range(SEED_RANGE);
        self.change_background_with_seed(seed).await
    }

    pub async fn change_background_with_seed(&self, seed: u32) -> BackgroundChange {
        let ticket = self.generation.issue();
        let url = self.image_url(seed);

        self.surface.set_opacity(FADED_OPACITY);

        if let Err(err) = self.loader.preload(&url).await {
            tracing::warn!(error = %err, "background image did not load");
            return BackgroundChange::Stuck(url);
        }

        if !self.generation.is_current(ticket) {
            tracing::debug!(%url, "discarding superseded background");
            return BackgroundChange::Superseded(url);
        }

        self.surface.set_background_image(&url);
        self.surface.set_opacity(1.0);
        BackgroundChange::Committed(url)
    }
}
