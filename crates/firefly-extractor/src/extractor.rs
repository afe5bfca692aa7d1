//! Core Case Extractor implementation

use crate::config::ExtractorConfig;
use crate::lexicon::Lexicon;
use firefly_domain::UrgencyLevel;
use regex::Regex;
use tracing::debug;

/// Leading 0, 1-2 digits, optional separator, 3 digits, optional separator,
/// 4 digits: `081-234-5678`, `081 234 5678`, `02-123-4567`
const PHONE_SEPARATOR_PATTERN: &str = r"0\d{1,2}[-\s]?\d{3}[-\s]?\d{4}";

/// Leading 0 followed by exactly 9 digits: `0812345678`
const PHONE_CONTIGUOUS_PATTERN: &str = r"0\d{9}";

/// The structured record derived from one raw post
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Distinct phone numbers, in first-match order
    pub phones: Vec<String>,

    /// Severity bucket, `Low` when no keyword matched
    pub urgency: UrgencyLevel,

    /// Matched cue fragments joined with ", ", or a prefix of the input
    pub description: String,

    /// First gazetteer hit, if any
    pub location: Option<String>,
}

/// The Case Extractor converts a raw social-media post into a structured record
///
/// Extraction is deterministic, side-effect-free and infallible: malformed or
/// empty input degrades to defaults instead of erroring. One extractor can be
/// shared across request-handling tasks freely.
#[derive(Debug)]
pub struct CaseExtractor {
    config: ExtractorConfig,
    lexicon: Lexicon,
    phone_separator: Regex,
    phone_contiguous: Regex,
}

impl CaseExtractor {
    /// Create an extractor with the builtin lexicon and default config
    pub fn new() -> Self {
        Self::with_lexicon(ExtractorConfig::default(), Lexicon::builtin())
    }

    /// Create an extractor with a custom config and the builtin lexicon
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self::with_lexicon(config, Lexicon::builtin())
    }

    /// Create an extractor with a custom config and lexicon
    pub fn with_lexicon(config: ExtractorConfig, lexicon: Lexicon) -> Self {
        Self {
            config,
            lexicon,
            phone_separator: Regex::new(PHONE_SEPARATOR_PATTERN).expect("phone pattern is valid"),
            phone_contiguous: Regex::new(PHONE_CONTIGUOUS_PATTERN).expect("phone pattern is valid"),
        }
    }

    /// Derive the structured record from raw free text
    ///
    /// Input beyond `max_text_length` characters is ignored. Empty input
    /// yields no phones, `Low` urgency, an empty description and no location.
    pub fn extract(&self, raw_content: &str) -> Extraction {
        let text = self.bounded(raw_content);

        let phones = self.extract_phones(text);
        let urgency = self.classify_urgency(text);
        let description = self.extract_description(text);
        let location = self.extract_location(text);

        debug!(
            phones = phones.len(),
            urgency = urgency.as_str(),
            location = location.as_deref().unwrap_or("-"),
            "extracted case fields"
        );

        Extraction {
            phones,
            urgency,
            description,
            location,
        }
    }

    /// Cap the input at `max_text_length` characters, on a char boundary
    fn bounded<'a>(&self, raw_content: &'a str) -> &'a str {
        match raw_content.char_indices().nth(self.config.max_text_length) {
            Some((idx, _)) => &raw_content[..idx],
            None => raw_content,
        }
    }

    /// Union of both phone patterns, deduplicated, first-seen order
    ///
    /// Separator-form matches are collected before contiguous-form matches,
    /// so evaluation order affects only insertion order, never membership.
    fn extract_phones(&self, text: &str) -> Vec<String> {
        let mut phones: Vec<String> = Vec::new();

        for pattern in [&self.phone_separator, &self.phone_contiguous] {
            for m in pattern.find_iter(text) {
                let candidate = m.as_str().trim();
                if !phones.iter().any(|p| p == candidate) {
                    phones.push(candidate.to_string());
                }
            }
        }

        phones
    }

    /// Top-down tier scan; the first tier with any keyword hit wins
    fn classify_urgency(&self, text: &str) -> UrgencyLevel {
        // Thai script has no case; lowercasing normalizes the Latin portion
        let haystack = text.to_lowercase();

        for tier in self.lexicon.urgency_tiers() {
            if tier.keywords.iter().any(|k| haystack.contains(k.as_str())) {
                return tier.level;
            }
        }

        UrgencyLevel::Low
    }

    /// All cue matches in listed order, or a truncated prefix of the input
    fn extract_description(&self, text: &str) -> String {
        let mut fragments: Vec<String> = Vec::new();

        for cue in self.lexicon.description_cues() {
            for m in cue.find_all(text) {
                fragments.push(m.as_str().trim().to_string());
            }
        }

        if fragments.is_empty() {
            return text.chars().take(self.config.description_fallback_chars).collect();
        }

        fragments.join(", ")
    }

    /// First gazetteer entry found in the text, scanned in listed order
    fn extract_location(&self, text: &str) -> Option<String> {
        self.lexicon
            .gazetteer()
            .iter()
            .find(|place| text.contains(place.as_str()))
            .cloned()
    }
}

impl Default for CaseExtractor {
    fn default() -> Self {
        Self::new()
    }
}
