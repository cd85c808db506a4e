//! Sinks for user-facing messages.
//!
//! The pipeline hands every warning, rescheduling notice and final risk
//! message to a [`Notifier`] as plain text. Rendering is the notifier's
//! concern; `notify` must return before the pipeline continues.

use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::{debug, warn};

/// Receives plain-text messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

/// Prints each message on stdout and mirrors it to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("{message}");
        debug!(event = "notifier.message", message = %message);
    }
}

/// External text-to-speech command, invoked with the message as last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for SpeechCommand {
    /// `espeak` at 150 words per minute.
    fn default() -> Self {
        SpeechCommand {
            program: "espeak".to_string(),
            args: vec!["-s".to_string(), "150".to_string()],
        }
    }
}

impl SpeechCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        SpeechCommand {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Run the command to completion. Returns whether it exited successfully.
    pub fn speak(&self, text: &str) -> bool {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                warn!(program = %self.program, code = ?status.code(), "speech command failed");
                false
            }
            Err(e) => {
                warn!(program = %self.program, error = %e, "speech command unavailable");
                false
            }
        }
    }
}

/// Forwards to an inner notifier, then speaks the message and waits for the
/// speech command to finish.
pub struct SpeechNotifier<N> {
    inner: N,
    command: SpeechCommand,
}

impl<N: Notifier> SpeechNotifier<N> {
    pub fn new(inner: N, command: SpeechCommand) -> Self {
        SpeechNotifier { inner, command }
    }
}

impl<N: Notifier> Notifier for SpeechNotifier<N> {
    fn notify(&self, message: &str) {
        self.inner.notify(message);
        self.command.speak(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::RecordingNotifier;

    #[test]
    fn test_speech_command_default() {
        let cmd = SpeechCommand::default();
        assert_eq!(cmd.program, "espeak");
        assert_eq!(cmd.args, vec!["-s", "150"]);
    }

    #[test]
    fn test_missing_speech_program_does_not_panic() {
        let cmd = SpeechCommand::new("definitely-not-a-speech-binary-5521", &[]);
        assert!(!cmd.speak("hello"));
    }

    #[test]
    fn test_speech_notifier_forwards_even_when_speech_fails() {
        let recorder = Arc::new(RecordingNotifier::new());
        let notifier = SpeechNotifier::new(
            recorder.clone(),
            SpeechCommand::new("definitely-not-a-speech-binary-5521", &[]),
        );

        notifier.notify("Supply Chain Risk Prediction.");
        assert_eq!(recorder.messages(), vec!["Supply Chain Risk Prediction."]);
    }

    #[test]
    fn test_arc_dyn_notifier() {
        let recorder = Arc::new(RecordingNotifier::new());
        let shared: Arc<dyn Notifier> = recorder.clone();
        shared.notify("one");
        shared.notify("two");
        assert_eq!(recorder.messages(), vec!["one", "two"]);
    }
}
