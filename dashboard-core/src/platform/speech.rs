use std::{
    io,
    process::{Child, Command, Stdio},
    sync::{Mutex, PoisonError},
};

use crate::config::SpeechConfig;

use super::SpeechSynthesizer;

/// Words per minute at rate 1.0.
const BASE_WPM: f32 = 175.0;

/// One unit of synthesized speech.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: "en-US".to_string(),
            rate: 1.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("failed to start speech program '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Speaks by running an external text-to-speech program per utterance.
#[derive(Debug)]
pub struct CommandSpeech {
    config: SpeechConfig,
    current: Mutex<Option<Child>>,
}

impl CommandSpeech {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            config,
            current: Mutex::new(None),
        }
    }

    fn args_for(&self, utterance: &Utterance) -> Vec<String> {
        let wpm = (BASE_WPM * utterance.rate).round().to_string();
        let lang = utterance.lang.to_lowercase();

        self.config
            .args
            .iter()
            .map(|arg| arg.replace("{lang}", &lang).replace("{wpm}", &wpm))
            .chain(std::iter::once(utterance.text.clone()))
            .collect()
    }
}

impl SpeechSynthesizer for CommandSpeech {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let child = Command::new(&self.config.command)
            .args(self.args_for(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        tracing::debug!(pid = child.id(), "speech started");

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut previous) = current.replace(child) {
            stop_child(&mut previous);
        }
        Ok(())
    }

    fn cancel(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut child) = current.take() {
            stop_child(&mut child);
        }
    }

    fn is_speaking(&self) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let running = match current.as_mut().map(Child::try_wait) {
            Some(Ok(None)) => true,
            Some(Ok(Some(_))) | None => false,
            Some(Err(err)) => {
                tracing::warn!(error = %err, "failed to poll speech program");
                false
            }
        };

        if !running {
            current.take();
        }
        running
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn stop_child(child: &mut Child) {
    if let Err(err) = child.kill() {
        // Already exited.
        tracing::trace!(error = %err, "speech program not killed");
    }
    if let Err(err) = child.wait() {
        tracing::warn!(error = %err, "failed to reap speech program");
    }
}
