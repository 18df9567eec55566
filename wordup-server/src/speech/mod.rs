mod speech_models;
mod speech_store;
mod sqlite_speech_store;

pub use speech_models::{NewSpeech, Speech, SpeechAnalysis, SpeechUpdate};
pub use speech_store::SpeechStore;
