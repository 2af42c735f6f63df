use crate::config::ExtractionConfig;
use crate::core::fields::REGISTRATION_PATTERN;
use crate::domain::model::{Movement, MovementFields};
use crate::utils::error::Result;
use regex::Regex;

pub mod points {
    pub const PERSON: i32 = 30;
    pub const REGISTRATION: i32 = 25;
    pub const POSITION: i32 = 20;
    pub const JOB_CODE: i32 = 15;
    pub const DEPARTMENT: i32 = 10;
    pub const VERB_LITERAL: i32 = 10;
    pub const COMMISSIONED_LITERAL: i32 = 10;
    pub const REGISTRATION_LITERAL: i32 = 10;
    pub const CODE_LITERAL: i32 = 5;
    pub const HEADER_CUE: i32 = 5;
    pub const PERSON_MISSING: i32 = -20;
}

/// Which fields were found, independent of where they came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldPresence {
    pub person: bool,
    pub registration_number: bool,
    pub position: bool,
    pub job_code: bool,
    pub department: bool,
}

impl FieldPresence {
    pub fn from_fields(person: Option<&str>, fields: &MovementFields) -> Self {
        Self {
            person: person.is_some_and(|p| !p.trim().is_empty()),
            registration_number: fields.registration_number.is_some(),
            position: fields.position.is_some(),
            job_code: fields.job_code.is_some(),
            department: fields.department.is_some(),
        }
    }
}

/// Additive 0–100 quality score. A heuristic for downstream filtering, not a
/// probability.
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    verb: Regex,
    commissioned: Regex,
    registration: Regex,
    code_literal: Regex,
    header_cues: Vec<String>,
}

impl ConfidenceScorer {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            verb: Regex::new(
                r"(?i)\b(?:exonera|exonerar|nomear|nomeia|designar|designa|dispensar|demitir)\b",
            )?,
            commissioned: Regex::new(r"(?i)cargo\s+em\s+comiss[ãa]o")?,
            registration: Regex::new(REGISTRATION_PATTERN)?,
            code_literal: Regex::new(r"(?i)c[óo]digo\s+n\s*[º°]")?,
            header_cues: config
                .header_cues
                .iter()
                .map(|cue| cue.trim().to_lowercase())
                .collect(),
        })
    }

    pub fn score(&self, movement: &Movement, source_text: &str) -> u8 {
        let presence = FieldPresence::from_fields(Some(movement.person()), &movement.fields);
        self.score_presence(presence, source_text)
    }

    pub fn score_presence(&self, presence: FieldPresence, source_text: &str) -> u8 {
        let mut total = 0;

        total += if presence.person {
            points::PERSON
        } else {
            points::PERSON_MISSING
        };
        if presence.registration_number {
            total += points::REGISTRATION;
        }
        if presence.position {
            total += points::POSITION;
        }
        if presence.job_code {
            total += points::JOB_CODE;
        }
        if presence.department {
            total += points::DEPARTMENT;
        }

        if self.verb.is_match(source_text) {
            total += points::VERB_LITERAL;
        }
        if self.commissioned.is_match(source_text) {
            total += points::COMMISSIONED_LITERAL;
        }
        if self.registration.is_match(source_text) {
            total += points::REGISTRATION_LITERAL;
        }
        if self.code_literal.is_match(source_text) {
            total += points::CODE_LITERAL;
        }
        let lowered = source_text.to_lowercase();
        if self.header_cues.iter().any(|cue| lowered.contains(cue.as_str())) {
            total += points::HEADER_CUE;
        }

        total.clamp(0, 100) as u8
    }
}
