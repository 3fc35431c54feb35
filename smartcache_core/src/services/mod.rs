//! Cache-backed wrappers around expensive operations
//!
//! Each wrapper tries the cache under its own type and, on a miss, runs an
//! [`ExpensiveOperation`] and stores the result. Cache problems never reach
//! the caller; only the operation's own failure or timeout does, and a
//! failed or timed-out computation is not cached.

pub mod cv;
pub mod jobs;
pub mod operation;
pub mod simulated;
pub mod templates;
pub mod types;

pub use cv::CvProcessor;
pub use jobs::JobMatcher;
pub use operation::{Cached, ExpensiveOperation, cached_compute};
pub use simulated::{SimulatedCvAnalysis, SimulatedJobMatching, SimulatedTemplateGeneration};
pub use templates::TemplateSystem;
pub use types::{
    CoverLetter, CoverLetterTemplate, CvAnalysis, CvDocument, JobDetails, JobFilters, JobMatch,
    TemplateRequest, UserProfile,
};
