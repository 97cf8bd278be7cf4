use anyhow::Result;
use inquire::{InquireError, Select, Text};
use std::fmt;

use crate::app::Dashboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ToggleTheme,
    NewBackground,
    WeatherByCity,
    WeatherHere,
    TellJoke,
    StopSpeaking,
    Quit,
}

impl Action {
    const ALL: [Action; 7] = [
        Action::ToggleTheme,
        Action::NewBackground,
        Action::WeatherByCity,
        Action::WeatherHere,
        Action::TellJoke,
        Action::StopSpeaking,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::ToggleTheme => "Toggle theme",
            Action::NewBackground => "New background",
            Action::WeatherByCity => "Weather for a city",
            Action::WeatherHere => "Weather at my location",
            Action::TellJoke => "Tell me a joke",
            Action::StopSpeaking => "Stop speaking",
            Action::Quit => "Quit",
        })
    }
}

/// `None` when the user dismissed the prompt.
fn prompt<T>(ask: impl FnOnce() -> Result<T, InquireError>) -> Result<Option<T>> {
    // Prompts block on the terminal; keep the runtime's other tasks moving.
    match tokio::task::block_in_place(ask) {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Startup work followed by the menu loop that feeds user choices to the components.
pub async fn run(dash: &Dashboard) -> Result<()> {
    let theme = dash.theme.initialize();
    println!("Theme: {theme} {}", dash.theme_surface.icon());
    dash.spawn_background_change();

    loop {
        let Some(action) = prompt(|| Select::new("What next?", Action::ALL.to_vec()).prompt())?
        else {
            break;
        };

        // Failures are already shown by the component surfaces.
        match action {
            Action::ToggleTheme => {
                let theme = dash.theme.toggle();
                println!("Theme: {theme} {}", dash.theme_surface.icon());
            }
            Action::NewBackground => dash.spawn_background_change(),
            Action::WeatherByCity => {
                if let Some(city) = prompt(|| Text::new("City:").prompt())? {
                    let _ = dash.weather.lookup_city(&city).await;
                }
            }
            Action::WeatherHere => {
                let _ = dash.weather.lookup_here().await;
            }
            Action::TellJoke => {
                let _ = dash.jokes.tell_joke().await;
            }
            Action::StopSpeaking => dash.jokes.stop_speaking(),
            Action::Quit => break,
        }
    }

    dash.jokes.stop_speaking();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_ends_with_quit() {
        assert_eq!(Action::ALL.last(), Some(&Action::Quit));
        assert_eq!(Action::TellJoke.to_string(), "Tell me a joke");
    }
}
