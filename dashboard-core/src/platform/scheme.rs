use crate::{config::Appearance, theme::Theme};

use super::ColorSchemeSource;

/// Color scheme of the hosting terminal.
///
/// An explicit configured scheme wins; otherwise the `COLORFGBG` convention
/// (`"<fg>;<bg>"`, set by rxvt, Konsole and others) decides.
#[derive(Debug, Clone, Default)]
pub struct SystemColorScheme {
    configured: Option<Theme>,
    colorfgbg: Option<String>,
}

impl SystemColorScheme {
    pub fn new(configured: Option<Theme>, colorfgbg: Option<String>) -> Self {
        Self {
            configured,
            colorfgbg,
        }
    }

    pub fn from_env(appearance: &Appearance) -> Self {
        Self::new(appearance.system_scheme, std::env::var("COLORFGBG").ok())
    }
}

impl ColorSchemeSource for SystemColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        if let Some(theme) = self.configured {
            return Some(theme == Theme::Dark);
        }

        let background: u8 = self.colorfgbg.as_deref()?.rsplit(';').next()?.parse().ok()?;
        // ANSI colors 0-6 and 8 are the dark ones.
        Some(matches!(background, 0..=6 | 8))
    }
}
