//! Firefly Bridge Case Extractor
//!
//! Derives a structured rescue-case record from raw free text - a
//! social-media post or comment, Thai mixed with English and numerals.
//!
//! # Overview
//!
//! Intake is the primary pathway for cases: the API layer hands the untouched
//! post text to the extractor and stores the result alongside it. The
//! extractor is a fixed cascade of compiled patterns:
//!
//! ```text
//! raw text → phones → urgency tier → description cues → gazetteer → Extraction
//! ```
//!
//! # Key Features
//!
//! - **Phone extraction**: separator and contiguous forms, deduplicated in
//!   first-match order
//! - **Urgency triage**: ordered keyword tiers, first hit wins
//! - **Description**: matched cue fragments, with a truncated-prefix fallback
//! - **Location**: first gazetteer hit
//! - **Swappable vocabulary**: tiers, cues and gazetteer are data ([`Lexicon`])
//!
//! Extraction never fails and performs no I/O; one [`CaseExtractor`] is safely
//! shared across threads.
//!
//! # Example Usage
//!
//! ```
//! use firefly_extractor::CaseExtractor;
//!
//! let extractor = CaseExtractor::new();
//! let result = extractor.extract("ช่วยด้วย น้ำท่วมที่หาดใหญ่ โทร 081-234-5678");
//!
//! assert_eq!(result.phones, vec!["081-234-5678"]);
//! assert_eq!(result.location.as_deref(), Some("หาดใหญ่"));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod lexicon;

pub use config::ExtractorConfig;
pub use error::LexiconError;
pub use extractor::{CaseExtractor, Extraction};
pub use lexicon::{DescriptionCue, Lexicon, UrgencyTier};
