use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

use crate::platform::{ColorSchemeSource, KeyValueStore};

/// Storage key of the persisted theme preference.
pub const THEME_KEY: &str = "theme";

/// Attribute value marking the dark theme; light is the attribute's absence.
const DARK_ATTRIBUTE: &str = "dark";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon shown on the toggle: what clicking it switches to.
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }

    /// Anything other than an explicit dark marker reads as light.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some(DARK_ATTRIBUTE) => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown theme '{0}'. Supported themes: dark, light.")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

/// The part of the UI that carries the theme: a document attribute and the
/// toggle button's icon.
pub trait ThemeSurface: Send + Sync {
    fn set_theme_attribute(&self, value: Option<&str>);
    fn theme_attribute(&self) -> Option<String>;
    fn set_toggle_icon(&self, icon: &str);
}

pub struct ThemeController {
    surface: Arc<dyn ThemeSurface>,
    store: Arc<dyn KeyValueStore>,
    scheme: Arc<dyn ColorSchemeSource>,
}

impl ThemeController {
    pub fn new(
        surface: Arc<dyn ThemeSurface>,
        store: Arc<dyn KeyValueStore>,
        scheme: Arc<dyn ColorSchemeSource>,
    ) -> Self {
        Self {
            surface,
            store,
            scheme,
        }
    }

    pub fn apply(&self, theme: Theme) {
        match theme {
            Theme::Dark => self.surface.set_theme_attribute(Some(DARK_ATTRIBUTE)),
            Theme::Light => self.surface.set_theme_attribute(None),
        }
        self.surface.set_toggle_icon(theme.toggle_icon());
    }

    /// Theme currently shown by the surface.
    pub fn effective(&self) -> Theme {
        Theme::from_attribute(self.surface.theme_attribute().as_deref())
    }

    /// Stored preference, then the system color scheme, then light.
    ///
    /// Any non-empty stored value counts as a preference; values other than
    /// "dark" read as light.
    pub fn startup_theme(&self) -> Theme {
        if let Some(theme) = self.stored() {
            return theme;
        }

        match self.scheme.prefers_dark() {
            Some(true) => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn initialize(&self) -> Theme {
        let theme = self.startup_theme();
        tracing::debug!(%theme, "applying startup theme");
        self.apply(theme);
        theme
    }

    pub fn toggle(&self) -> Theme {
        let next = self.effective().opposite();
        self.set(next);
        next
    }

    /// Apply and persist an explicit choice.
    pub fn set(&self, theme: Theme) {
        self.apply(theme);
        if let Err(err) = self.store.set(THEME_KEY, theme.as_str()) {
            tracing::warn!(error = %err, "failed to persist theme preference");
        }
    }

    fn stored(&self) -> Option<Theme> {
        let value = match self.store.get(THEME_KEY) {
            Ok(value) => value?,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read theme preference");
                return None;
            }
        };

        if value.is_empty() {
            return None;
        }

        Some(value.parse().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "stored theme preference read as light");
            Theme::Light
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSurface {
        attribute: Mutex<Option<String>>,
        icon: Mutex<String>,
    }

    impl ThemeSurface for FakeSurface {
        fn set_theme_attribute(&self, value: Option<&str>) {
            *self.attribute.lock().unwrap() = value.map(str::to_string);
        }

        fn theme_attribute(&self) -> Option<String> {
            self.attribute.lock().unwrap().clone()
        }

        fn set_toggle_icon(&self, icon: &str) {
            *self.icon.lock().unwrap() = icon.to_string();
        }
    }

    struct FixedScheme(Option<bool>);

    impl ColorSchemeSource for FixedScheme {
        fn prefers_dark(&self) -> Option<bool> {
            self.0
        }
    }

    fn controller(
        stored: Option<&str>,
        system_dark: Option<bool>,
    ) -> (ThemeController, Arc<FakeSurface>, Arc<MemoryStore>) {
        let surface = Arc::new(FakeSurface::default());
        let store = Arc::new(MemoryStore::default());
        if let Some(value) = stored {
            store.set(THEME_KEY, value).unwrap();
        }
        let ctl = ThemeController::new(
            surface.clone(),
            store.clone(),
            Arc::new(FixedScheme(system_dark)),
        );
        (ctl, surface, store)
    }

    #[test]
    fn applied_theme_is_read_back() {
        let (ctl, surface, _) = controller(None, None);

        for theme in [Theme::Dark, Theme::Light] {
            ctl.apply(theme);
            assert_eq!(ctl.effective(), theme);
        }

        assert_eq!(*surface.attribute.lock().unwrap(), None);
        assert_eq!(*surface.icon.lock().unwrap(), "🌙");
    }

    #[test]
    fn dark_sets_attribute_and_sun_icon() {
        let (ctl, surface, _) = controller(None, None);
        ctl.apply(Theme::Dark);

        assert_eq!(surface.attribute.lock().unwrap().as_deref(), Some("dark"));
        assert_eq!(*surface.icon.lock().unwrap(), "☀️");
    }

    #[test]
    fn toggling_twice_returns_to_original() {
        let (ctl, _, store) = controller(None, Some(true));
        let original = ctl.initialize();

        assert_eq!(ctl.toggle(), original.opposite());
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));

        assert_eq!(ctl.toggle(), original);
        assert_eq!(ctl.effective(), original);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn stored_preference_wins_over_system() {
        let (ctl, _, _) = controller(Some("light"), Some(true));
        assert_eq!(ctl.initialize(), Theme::Light);

        let (ctl, _, _) = controller(Some("dark"), Some(false));
        assert_eq!(ctl.initialize(), Theme::Dark);
    }

    #[test]
    fn system_preference_used_when_nothing_stored() {
        let (ctl, _, store) = controller(None, Some(true));
        assert_eq!(ctl.initialize(), Theme::Dark);
        // Startup never writes the preference.
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
    }

    #[test]
    fn falls_back_to_light() {
        let (ctl, _, _) = controller(None, None);
        assert_eq!(ctl.startup_theme(), Theme::Light);

        let (ctl, _, _) = controller(Some("sepia"), None);
        assert_eq!(ctl.startup_theme(), Theme::Light);
    }

    #[test]
    fn unknown_stored_value_is_light_even_when_system_is_dark() {
        let (ctl, surface, _) = controller(Some("sepia"), Some(true));

        assert_eq!(ctl.initialize(), Theme::Light);
        assert_eq!(*surface.attribute.lock().unwrap(), None);
    }

    #[test]
    fn empty_stored_value_defers_to_system() {
        let (ctl, _, _) = controller(Some(""), Some(true));
        assert_eq!(ctl.startup_theme(), Theme::Dark);
    }

    #[test]
    fn unknown_attribute_reads_as_light() {
        assert_eq!(Theme::from_attribute(Some("solarized")), Theme::Light);
        assert_eq!(Theme::from_attribute(None), Theme::Light);
        assert_eq!(Theme::from_attribute(Some("dark")), Theme::Dark);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "blue".parse::<Theme>().unwrap_err();
        assert!(err.to_string().contains("Unknown theme 'blue'"));
    }
}
