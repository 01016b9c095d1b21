pub mod batch;
pub mod digest;
pub mod finnhub;
pub mod mailer;
pub mod merge;
pub mod summarizer;
pub mod templates;
pub mod types;
pub mod users;
pub mod utils;

pub use batch::{run_welcome, BatchRunner, RunSummary};
pub use digest::DigestBuilder;
pub use finnhub::{FinnhubClient, NewsSource};
pub use mailer::{Delivery, DigestMailer, RecordingDelivery, SmtpMailer};
pub use merge::{dedupe_general, round_robin_merge};
pub use summarizer::{GeminiGenerator, MockGenerator, Summarizer, TextGenerator};
pub use types::*;
pub use users::{StaticDirectory, UserDirectory, WatchlistStore};
