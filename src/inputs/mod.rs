pub mod utterance;

pub use utterance::{parse_payload, PayloadFormat, UtteranceSource};
