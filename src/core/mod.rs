//! Core normalization, classification, and orchestration.

pub mod http;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod outcome;
pub mod provider;
pub mod rows;
pub mod summary;
pub mod window;

pub use models::{
    AccountIdentity, ClassifiedWindows, DisplayRow, GlobalSummary, HealthStatus, ModelQuota,
    ProviderResult, QuotaData, RateWindow, ReasonCode, ResultStatus, SimpleQuota, SlottedWindow,
    UsageData, Urgency, WindowSlot,
};
pub use orchestrator::{FetchOptions, QuotaReport, fetch_all};
pub use outcome::{classify_message, classify_outcome};
pub use provider::{Provider, parse_provider_list};
pub use rows::{build_row, build_rows};
pub use summary::summarize;
pub use window::{classify, normalize};
