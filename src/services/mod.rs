pub mod launcher;
pub mod llm;
