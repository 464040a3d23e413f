//! YouTube link parsing and caption retrieval.

pub mod transcript;
pub mod url;

pub use transcript::{Fragment, Transcript, TranscriptError, TranscriptFetcher, YoutubeTranscripts};
pub use url::parse_video_id;
