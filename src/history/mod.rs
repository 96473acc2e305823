mod processor;
mod transcript;

pub use processor::HistoryProcessor;
pub use transcript::Transcript;
