//! Lexicon - the vocabulary tables behind extraction
//!
//! The urgency keyword tiers, description cue patterns and the location
//! gazetteer are data, not code: deployments can swap the vocabulary for a
//! different disaster or region without touching extraction logic. A builtin
//! table ships with the crate; `Lexicon::from_toml` loads a replacement.

use crate::error::LexiconError;
use firefly_domain::UrgencyLevel;
use regex::Regex;
use serde::Deserialize;

/// One urgency tier: a severity level and the keywords that trigger it
///
/// Tiers are evaluated in the order they appear in the lexicon, so the list
/// must be sorted most-severe first.
#[derive(Debug, Clone)]
pub struct UrgencyTier {
    /// Severity assigned when any keyword matches
    pub level: UrgencyLevel,

    /// Trigger keywords, stored lowercase for case-insensitive matching
    pub keywords: Vec<String>,
}

/// A compiled description cue
///
/// Each cue captures a short clause around one semantically meaningful signal
/// in a post (a person count, being trapped, flooding, ...).
#[derive(Debug)]
pub struct DescriptionCue {
    /// Name of the cue for identification
    pub name: String,

    /// The compiled regex
    regex: Regex,
}

impl DescriptionCue {
    /// Compile a cue from a regex pattern
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, LexiconError> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|source| LexiconError::InvalidPattern {
            name: name.clone(),
            source,
        })?;
        Ok(Self { name, regex })
    }

    /// Find all matches of this cue in the content
    pub fn find_all<'a>(&'a self, content: &'a str) -> impl Iterator<Item = regex::Match<'a>> + '_ {
        self.regex.find_iter(content)
    }
}

/// The full extraction vocabulary
#[derive(Debug)]
pub struct Lexicon {
    urgency_tiers: Vec<UrgencyTier>,
    description_cues: Vec<DescriptionCue>,
    gazetteer: Vec<String>,
}

impl Lexicon {
    /// The builtin vocabulary: Thai flood-relief triage language
    pub fn builtin() -> Self {
        Self::from_spec(builtin_spec()).expect("builtin lexicon is valid")
    }

    /// Load a replacement vocabulary from TOML
    ///
    /// ```
    /// use firefly_extractor::Lexicon;
    ///
    /// let lexicon = Lexicon::from_toml(r#"
    ///     gazetteer = ["หาดใหญ่"]
    ///
    ///     [[urgency_tier]]
    ///     level = "critical"
    ///     keywords = ["ฉุกเฉิน"]
    ///
    ///     [[description_cue]]
    ///     name = "flooded"
    ///     pattern = "น้ำท่วม[^\\s,]*"
    /// "#).unwrap();
    /// assert_eq!(lexicon.gazetteer().len(), 1);
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, LexiconError> {
        let spec: LexiconSpec = toml::from_str(toml_str)?;
        Self::from_spec(spec)
    }

    fn from_spec(spec: LexiconSpec) -> Result<Self, LexiconError> {
        let mut urgency_tiers = Vec::with_capacity(spec.urgency_tiers.len());
        for tier in spec.urgency_tiers {
            let level = UrgencyLevel::parse(&tier.level)
                .ok_or_else(|| LexiconError::UnknownLevel(tier.level.clone()))?;
            if tier.keywords.is_empty() {
                return Err(LexiconError::EmptyList("urgency tier keyword"));
            }
            let keywords = tier.keywords.iter().map(|k| k.to_lowercase()).collect();
            urgency_tiers.push(UrgencyTier { level, keywords });
        }

        let mut description_cues = Vec::with_capacity(spec.description_cues.len());
        for cue in spec.description_cues {
            description_cues.push(DescriptionCue::new(cue.name, &cue.pattern)?);
        }

        Ok(Self {
            urgency_tiers,
            description_cues,
            gazetteer: spec.gazetteer,
        })
    }

    /// The urgency tiers, most severe first
    pub fn urgency_tiers(&self) -> &[UrgencyTier] {
        &self.urgency_tiers
    }

    /// The description cues, in evaluation order
    pub fn description_cues(&self) -> &[DescriptionCue] {
        &self.description_cues
    }

    /// The place names recognized for location extraction, in scan order
    pub fn gazetteer(&self) -> &[String] {
        &self.gazetteer
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Serde form of a lexicon, as written in TOML
#[derive(Debug, Deserialize)]
struct LexiconSpec {
    #[serde(rename = "urgency_tier", default)]
    urgency_tiers: Vec<TierSpec>,

    #[serde(rename = "description_cue", default)]
    description_cues: Vec<CueSpec>,

    #[serde(default)]
    gazetteer: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TierSpec {
    level: String,
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CueSpec {
    name: String,
    pattern: String,
}

/// The builtin vocabulary as literal data
fn builtin_spec() -> LexiconSpec {
    LexiconSpec {
        urgency_tiers: vec![
            // Life-threatening: someone is in immediate danger
            TierSpec {
                level: "critical".to_string(),
                keywords: vec![
                    "ฉุกเฉิน".to_string(),   // emergency
                    "วิกฤต".to_string(),     // crisis
                    "หมดสติ".to_string(),    // unconscious
                    "ไม่หายใจ".to_string(),  // not breathing
                    "จมน้ำ".to_string(),     // drowning
                    "ไฟดูด".to_string(),     // electrocution
                ],
            },
            // Explicit call for help, needed now
            TierSpec {
                level: "high".to_string(),
                keywords: vec![
                    "ด่วนมาก".to_string(),   // very urgent
                    "ช่วยด้วย".to_string(),  // help!
                    "เร่งด่วน".to_string(),  // pressing
                    "sos".to_string(),
                ],
            },
            // Generic urgency/hurry language
            TierSpec {
                level: "medium".to_string(),
                keywords: vec![
                    "ด่วน".to_string(),      // urgent
                    "รีบ".to_string(),       // hurry
                    "โดยเร็ว".to_string(),   // quickly
                    "เร็วที่สุด".to_string(), // as fast as possible
                ],
            },
        ],
        description_cues: vec![
            CueSpec {
                name: "person_count".to_string(),
                pattern: r"\d+\s*คน".to_string(),
            },
            CueSpec {
                name: "trapped".to_string(),
                pattern: r"ติด(?:อยู่|ค้าง)[^\s,]*".to_string(),
            },
            CueSpec {
                name: "flooded".to_string(),
                pattern: r"น้ำท่วม[^\s,]*".to_string(),
            },
            CueSpec {
                name: "need".to_string(),
                pattern: r"ต้องการ[^\s,]*".to_string(),
            },
            CueSpec {
                name: "child".to_string(),
                pattern: r"เด็ก(?:\s*\d+\s*คน|[^\s,]*)".to_string(),
            },
            CueSpec {
                name: "elderly".to_string(),
                pattern: r"(?:ผู้สูงอายุ|คนแก่|คนชรา)(?:\s*\d+\s*คน|[^\s,]*)".to_string(),
            },
        ],
        gazetteer: vec![
            "หาดใหญ่".to_string(),
            "สงขลา".to_string(),
            "ปัตตานี".to_string(),
            "ยะลา".to_string(),
            "นราธิวาส".to_string(),
            "นครศรีธรรมราช".to_string(),
            "สุราษฎร์ธานี".to_string(),
            "พัทลุง".to_string(),
            "ตรัง".to_string(),
            "สตูล".to_string(),
            "ภูเก็ต".to_string(),
            "กระบี่".to_string(),
            "เชียงใหม่".to_string(),
            "เชียงราย".to_string(),
            "อุบลราชธานี".to_string(),
            "กรุงเทพ".to_string(),
        ],
    }
}
