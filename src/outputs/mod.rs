pub mod speech;

pub use speech::{CommandSpeech, SilentSpeech, SpeechSink};
