use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    generation::Generation,
    http::FetchError,
    model::Joke,
    platform::{SpeechSynthesizer, Utterance},
};

pub mod jokeapi;

pub use jokeapi::JokeApiClient;

pub const LOADING_MESSAGE: &str = "Loading joke...";

#[async_trait]
pub trait JokeService: Send + Sync + Debug {
    async fn random_joke(&self) -> Result<Joke, FetchError>;
}

pub trait JokeSurface: Send + Sync {
    fn show_text(&self, text: &str);
}

#[derive(Debug, thiserror::Error)]
pub enum JokeError {
    #[error("Could not fetch a joke.")]
    Fetch(#[source] FetchError),

    #[error("a newer joke request replaced this one")]
    Superseded,
}

pub struct JokeTeller {
    surface: Arc<dyn JokeSurface>,
    service: Arc<dyn JokeService>,
    speech: Arc<dyn SpeechSynthesizer>,
    generation: Generation,
}

impl JokeTeller {
    pub fn new(
        surface: Arc<dyn JokeSurface>,
        service: Arc<dyn JokeService>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            surface,
            service,
            speech,
            generation: Generation::default(),
        }
    }

    /// Fetch a joke, show it and read it aloud. Returns the joke text.
    pub async fn tell_joke(&self) -> Result<String, JokeError> {
        let ticket = self.generation.issue();
        self.surface.show_text(LOADING_MESSAGE);

        let joke = self.service.random_joke().await;

        if !self.generation.is_current(ticket) {
            tracing::debug!("discarding superseded joke");
            return Err(JokeError::Superseded);
        }

        let text = match joke {
            Ok(joke) => joke.text(),
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch joke");
                let err = JokeError::Fetch(err);
                self.surface.show_text(&err.to_string());
                return Err(err);
            }
        };

        self.surface.show_text(&text);
        self.speak(&text);
        Ok(text)
    }

    /// Start speaking `text`, cutting off anything already playing.
    pub fn speak(&self, text: &str) {
        self.stop_speaking();
        if let Err(err) = self.speech.speak(&Utterance::new(text)) {
            tracing::warn!(error = %err, "speech unavailable");
        }
    }

    pub fn stop_speaking(&self) {
        if self.speech.is_speaking() {
            self.speech.cancel();
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.speech.is_speaking()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SpeechError;
    use reqwest::StatusCode;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct TextArea(Mutex<Vec<String>>);

    impl TextArea {
        fn shown(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl JokeSurface for TextArea {
        fn show_text(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    #[derive(Debug)]
    struct FixedJoke(Option<Joke>);

    #[async_trait]
    impl JokeService for FixedJoke {
        async fn random_joke(&self) -> Result<Joke, FetchError> {
            self.0.clone().ok_or_else(|| FetchError::Status {
                url: "http://jokes".to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "no joke".to_string(),
            })
        }
    }

    /// Numbers its jokes; the first call waits until released.
    #[derive(Debug, Default)]
    struct GatedJokes {
        gate: Notify,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl JokeService for GatedJokes {
        async fn random_joke(&self) -> Result<Joke, FetchError> {
            let n = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if n == 1 {
                self.gate.notified().await;
            }
            Ok(Joke::Single {
                joke: format!("joke {n}"),
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum SpeechOp {
        Speak(String),
        Cancel,
    }

    #[derive(Debug, Default)]
    struct FakeSpeech {
        ops: Mutex<Vec<SpeechOp>>,
        speaking: Mutex<bool>,
    }

    impl SpeechSynthesizer for FakeSpeech {
        fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
            assert_eq!(utterance.lang, "en-US");
            assert_eq!(utterance.rate, 1.0);
            self.ops
                .lock()
                .unwrap()
                .push(SpeechOp::Speak(utterance.text.clone()));
            *self.speaking.lock().unwrap() = true;
            Ok(())
        }

        fn cancel(&self) {
            self.ops.lock().unwrap().push(SpeechOp::Cancel);
            *self.speaking.lock().unwrap() = false;
        }

        fn is_speaking(&self) -> bool {
            *self.speaking.lock().unwrap()
        }
    }

    fn teller(joke: Option<Joke>) -> (JokeTeller, Arc<TextArea>, Arc<FakeSpeech>) {
        let area = Arc::new(TextArea::default());
        let speech = Arc::new(FakeSpeech::default());
        let teller = JokeTeller::new(area.clone(), Arc::new(FixedJoke(joke)), speech.clone());
        (teller, area, speech)
    }

    #[tokio::test]
    async fn two_part_joke_is_shown_and_spoken() {
        let (teller, area, speech) = teller(Some(Joke::TwoPart {
            setup: "S".to_string(),
            delivery: "D".to_string(),
        }));

        let text = teller.tell_joke().await.unwrap();

        assert_eq!(text, "S ... D");
        assert_eq!(area.shown(), vec![LOADING_MESSAGE, "S ... D"]);
        assert_eq!(
            *speech.ops.lock().unwrap(),
            vec![SpeechOp::Speak("S ... D".to_string())]
        );
    }

    #[tokio::test]
    async fn single_joke_text_is_used_as_is() {
        let (teller, area, _) = teller(Some(Joke::Single {
            joke: "J".to_string(),
        }));

        assert_eq!(teller.tell_joke().await.unwrap(), "J");
        assert_eq!(area.shown().last().map(String::as_str), Some("J"));
    }

    #[tokio::test]
    async fn failure_shows_message_and_stays_silent() {
        let (teller, area, speech) = teller(None);

        let err = teller.tell_joke().await.unwrap_err();

        assert!(matches!(err, JokeError::Fetch(_)));
        assert_eq!(area.shown(), vec![LOADING_MESSAGE, "Could not fetch a joke."]);
        assert!(speech.ops.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_joke_cuts_off_previous_speech() {
        let (teller, _, speech) = teller(Some(Joke::Single {
            joke: "J".to_string(),
        }));

        teller.tell_joke().await.unwrap();
        teller.tell_joke().await.unwrap();

        assert_eq!(
            *speech.ops.lock().unwrap(),
            vec![
                SpeechOp::Speak("J".to_string()),
                SpeechOp::Cancel,
                SpeechOp::Speak("J".to_string()),
            ]
        );
    }

    #[test]
    fn stop_when_silent_changes_nothing() {
        let (teller, area, speech) = teller(None);

        teller.stop_speaking();
        teller.stop_speaking();

        assert!(speech.ops.lock().unwrap().is_empty());
        assert!(!teller.is_speaking());
        assert!(area.shown().is_empty());
    }

    #[test]
    fn stop_cancels_active_speech() {
        let (teller, _, speech) = teller(None);

        teller.speak("hello");
        assert!(teller.is_speaking());
        teller.stop_speaking();

        assert!(!teller.is_speaking());
        assert_eq!(speech.ops.lock().unwrap().last(), Some(&SpeechOp::Cancel));
    }

    #[tokio::test]
    async fn late_joke_is_neither_shown_nor_spoken() {
        let area = Arc::new(TextArea::default());
        let speech = Arc::new(FakeSpeech::default());
        let jokes = Arc::new(GatedJokes::default());
        let teller = Arc::new(JokeTeller::new(area.clone(), jokes.clone(), speech.clone()));

        let slow = tokio::spawn({
            let teller = teller.clone();
            async move { teller.tell_joke().await }
        });
        while *jokes.calls.lock().unwrap() == 0 {
            tokio::task::yield_now().await;
        }

        assert_eq!(teller.tell_joke().await.unwrap(), "joke 2");
        jokes.gate.notify_one();

        assert!(matches!(slow.await.unwrap(), Err(JokeError::Superseded)));
        assert_eq!(area.shown(), vec![LOADING_MESSAGE, LOADING_MESSAGE, "joke 2"]);
        assert_eq!(
            *speech.ops.lock().unwrap(),
            vec![SpeechOp::Speak("joke 2".to_string())]
        );
    }
}
