use crate::config::ExtractionConfig;
use crate::core::text::{clean_span, within_bounds};
use crate::domain::model::MovementFields;
use crate::utils::error::Result;
use regex::Regex;
use std::fmt;

/// `PREFIX-DDD.DDD-D`, e.g. `BM-324.917-2`, ASCII digits only.
pub const REGISTRATION_PATTERN: &str = r"\b([A-Z]{2})-([0-9]{3})\.([0-9]{3})-([0-9])\b";

/// Same shape without groups or boundaries, for embedding in larger patterns.
pub const REGISTRATION_LITERAL: &str = r"[A-Z]{2}-[0-9]{3}\.[0-9]{3}-[0-9]";

/// Civil-servant registration number in its canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationNumber {
    prefix: [char; 2],
    digits: [u8; 7],
}

impl RegistrationNumber {
    /// `prefix` must be two ASCII uppercase letters and every digit `0..=9`.
    pub fn new(prefix: [char; 2], digits: [u8; 7]) -> Option<Self> {
        if prefix.iter().all(|c| c.is_ascii_uppercase()) && digits.iter().all(|d| *d <= 9) {
            Some(Self { prefix, digits })
        } else {
            None
        }
    }
}

impl fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.digits;
        write!(
            f,
            "{}{}-{}{}{}.{}{}{}-{}",
            self.prefix[0], self.prefix[1], d[0], d[1], d[2], d[3], d[4], d[5], d[6]
        )
    }
}

/// Ordered pattern lists for the per-movement fields. Every extractor returns the
/// first match that survives cleaning and the length bounds; absence is `None`.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    registration: Regex,
    position: Vec<Regex>,
    position_code: Regex,
    position_stop: Regex,
    job_code: Regex,
    department: Vec<Regex>,
    department_stop: Regex,
    min_len: usize,
    max_len: usize,
}

impl FieldExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let position = vec![
            Regex::new(r"(?i:cargo\s+em\s+comiss[ãa]o)\s+(?:(?i:de)\s+)?([^,.;\n]+)")?,
            Regex::new(r"(?i:cargo\s+(?:tempor[áa]rio\s+|comissionado\s+)?de)\s+([^,.;\n]+)")?,
            Regex::new(
                r"(?i:fun[çc][ãa]o\s+(?:comissionada\s+|gratificada\s+|p[úu]blica\s+)?de)\s+([^,.;\n]+)",
            )?,
        ];
        let department = vec![
            Regex::new(r"(?i:da\s+chefia\s+d[aoe])\s+([^,.;\n]+)")?,
            Regex::new(r"((?i:secretaria\s+municipal)\s+[^,.;\n]+)")?,
            Regex::new(r"(?i:[óo]rg[ãa]o)\s+([^,.;\n]+)")?,
            Regex::new(r"((?i:departamento)\s+[^,.;\n]+)")?,
        ];

        Ok(Self {
            registration: Regex::new(REGISTRATION_PATTERN)?,
            position,
            position_code: Regex::new(r"\b[A-Z]{2,4}[ -]?[0-9]{1,2}\b")?,
            position_stop: Regex::new(
                r"(?i)\s(?:c[óo]digo|s[íi]mbolo)\b|\s(?:na|no|junto\s+[àa]|junto\s+ao)\s+(?:secretaria|prefeitura|gabinete|subsecretaria|diretoria|departamento|coordenadoria|superintend[êe]ncia|administra[çc][ãa]o)\b|\sa\s+partir\b|\spelo\s+per[íi]odo\b|\sa\s+pedido\b",
            )?,
            job_code: Regex::new(
                r"(?i:c[óo]digo)\s+(?:(?i:n\s*[º°]|n\.)\s*)?([A-Z0-9](?:[A-Z0-9.\-]*[A-Z0-9])?)",
            )?,
            department,
            department_stop: Regex::new(r"(?i)\sa\s+partir\b|\spelo\s+per[íi]odo\b|\sa\s+pedido\b")?,
            min_len: config.min_field_length,
            max_len: config.max_field_length,
        })
    }

    pub fn registration_number(&self, text: &str) -> Option<String> {
        self.registration.captures(text).map(|caps| {
            format!("{}-{}.{}-{}", &caps[1], &caps[2], &caps[3], &caps[4])
        })
    }

    pub fn parse_registration(&self, text: &str) -> Option<RegistrationNumber> {
        let caps = self.registration.captures(text)?;
        let mut prefix = caps[1].chars();
        let prefix = [prefix.next()?, prefix.next()?];
        let digits: Vec<u8> = [&caps[2], &caps[3], &caps[4]]
            .concat()
            .bytes()
            .map(|b| b - b'0')
            .collect();
        RegistrationNumber::new(prefix, digits.try_into().ok()?)
    }

    pub fn position(&self, text: &str) -> Option<String> {
        self.first_match(&self.position, &self.position_stop, text)
            .or_else(|| self.position_code(text))
    }

    /// Bare grade such as `DAM 3` or `CC-3`, skipping segments of dotted job codes
    /// like `SMDE.DAM3.A.009`.
    fn position_code(&self, text: &str) -> Option<String> {
        self.position_code
            .find_iter(text)
            .filter(|m| {
                let before = text[..m.start()].chars().next_back();
                let mut after = text[m.end()..].chars();
                let dotted_after = after.next() == Some('.')
                    && after.next().is_some_and(|c| c.is_ascii_alphanumeric());
                before != Some('.') && !dotted_after
            })
            .map(|m| m.as_str().to_string())
            .find(|code| within_bounds(code, self.min_len, self.max_len))
    }

    pub fn job_code(&self, text: &str) -> Option<String> {
        self.job_code
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .find(|code| within_bounds(code, self.min_len, self.max_len))
    }

    pub fn department(&self, text: &str) -> Option<String> {
        self.first_match(&self.department, &self.department_stop, text)
    }

    pub fn extract_all(&self, text: &str) -> MovementFields {
        MovementFields {
            registration_number: self.registration_number(text),
            position: self.position(text),
            job_code: self.job_code(text),
            department: self.department(text),
        }
    }

    fn first_match(&self, patterns: &[Regex], stop: &Regex, text: &str) -> Option<String> {
        patterns.iter().find_map(|pattern| {
            pattern.captures_iter(text).find_map(|caps| {
                let raw = caps.get(1)?.as_str();
                let cut = match stop.find(raw) {
                    Some(m) => &raw[..m.start()],
                    None => raw,
                };
                let value = clean_span(cut);
                within_bounds(&value, self.min_len, self.max_len).then_some(value)
            })
        })
    }
}
