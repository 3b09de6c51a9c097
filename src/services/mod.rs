mod accessibility;
mod aggregator;
mod audit;
mod document;
mod fetcher;
mod normalize;
mod performance;
mod progress;
mod security;
mod seo;
mod tls_inspector;

pub use audit::Auditor;
pub use normalize::normalize_url;
pub use progress::ChannelProgress;
