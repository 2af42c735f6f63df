use crate::config::ExtractionConfig;
use crate::core::fields::{FieldExtractor, REGISTRATION_LITERAL};
use crate::core::names::NameValidator;
use crate::core::text::{self, clean_span, collapse_whitespace, floor_char_boundary};
use crate::domain::model::{ActionType, Movement, MovementFields};
use crate::utils::error::Result;
use regex::{Captures, Regex};
use std::collections::HashSet;

/// Capitalised tokens joined by spaces or tabs, with optional lowercase connectives
/// between them. Stops at the first lowercase word, punctuation or line break.
const NAME: &str = r"\p{Lu}[\p{L}'’\-]*(?:[ \t]+(?:(?:d[aeo]s?|e)[ \t]+)?\p{Lu}[\p{L}'’\-]*)*";

/// ", a pedido," and "a servidora" style fillers between the verb and the name.
const PREFIX: &str = r"(?:[ \t]*,[ \t]*(?i:a[ \t]+pedido)[ \t]*,)?[ \t]+(?:(?i:[ao][ \t]+servidora?|[ao][ \t]+funcion[áa]ri[ao])[ \t]+)?";

const DISMISSAL_VERBS: &str = r"exonerar|exonera|dispensar|dispensa|demitir|demite";
const APPOINTMENT_VERBS: &str = r"nomear|nomeia|contratar|contrata";
const DESIGNATION_VERBS: &str = r"designar|designa";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    StructuredLine,
    Tabular,
    Generic,
}

impl Tier {
    fn label(&self) -> &'static str {
        match self {
            Tier::StructuredLine => "tier1",
            Tier::Tabular => "tier2",
            Tier::Generic => "tier3",
        }
    }
}

#[derive(Debug, Clone)]
struct VerbPattern {
    action: ActionType,
    regex: Regex,
}

/// Tiered movement extraction. Each tier only runs when the previous one produced
/// no validated movement.
#[derive(Debug, Clone)]
pub struct MovementExtractor {
    structured: Vec<VerbPattern>,
    tabular: Regex,
    generic: Regex,
    next_verb: Regex,
    window_chars: usize,
    min_field_len: usize,
    max_field_len: usize,
}

impl MovementExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let trailer = format!(r"\s*(?:,\s*(?P<reg>{}))?\s*,?\s*", REGISTRATION_LITERAL);

        let structured = vec![
            VerbPattern {
                action: ActionType::Dismissal,
                regex: Regex::new(&format!(
                    r"\b(?P<verb>(?i:{})){}(?P<name>{}){}(?i:d[oa])\s+(?i:cargo|fun[çc][ãa]o)",
                    DISMISSAL_VERBS, PREFIX, NAME, trailer
                ))?,
            },
            VerbPattern {
                action: ActionType::Appointment,
                regex: Regex::new(&format!(
                    r"\b(?P<verb>(?i:{})){}(?P<name>{}){}(?i:para|no|na|como)\s+(?:(?i:exercer)\s+)?(?:(?i:[oa])\s+)?(?i:cargo|fun[çc][ãa]o)",
                    APPOINTMENT_VERBS, PREFIX, NAME, trailer
                ))?,
            },
            VerbPattern {
                action: ActionType::Designation,
                regex: Regex::new(&format!(
                    r"\b(?P<verb>(?i:{})){}(?P<name>{}){}(?i:para|no|na|como)\s+(?:(?i:exercer)\s+)?(?:(?i:[oa])\s+)?(?i:cargo|fun[çc][ãa]o)",
                    DESIGNATION_VERBS, PREFIX, NAME, trailer
                ))?,
            },
        ];

        Ok(Self {
            structured,
            tabular: Regex::new(
                r"^\s*(?:[-•*]\s+)?(?P<name>[^\-–—0-9,;]+?)\s+[-–—]\s+(?P<position>[^\-–—]+?)\s+[-–—]\s+(?P<department>.+?)\s*$",
            )?,
            generic: Regex::new(&format!(
                r"\b(?P<verb>(?i:{}|{}|{})){}(?P<name>{})",
                DISMISSAL_VERBS, APPOINTMENT_VERBS, DESIGNATION_VERBS, PREFIX, NAME
            ))?,
            next_verb: Regex::new(&format!(
                r"\b(?i:{}|{}|{})\b",
                DISMISSAL_VERBS, APPOINTMENT_VERBS, DESIGNATION_VERBS
            ))?,
            window_chars: config.window_chars,
            min_field_len: config.min_field_length,
            max_field_len: config.max_field_length,
        })
    }

    /// Extracts every movement in `content`. `default_action` is the document-level
    /// action, used by the tabular tier where lines carry no verb.
    pub fn extract(
        &self,
        content: &str,
        default_action: ActionType,
        names: &NameValidator,
        fields: &FieldExtractor,
        trace: &mut Vec<String>,
    ) -> Vec<Movement> {
        let movements = self.structured(content, names, fields, trace);
        if !movements.is_empty() {
            return self.finish(Tier::StructuredLine, movements, trace);
        }

        trace.push("tier1: no validated movement, trying tabular lines".to_string());
        let movements = self.tabular_lines(content, default_action, names, fields, trace);
        if !movements.is_empty() {
            return self.finish(Tier::Tabular, movements, trace);
        }

        trace.push("tier2: no validated movement, trying generic verb pattern".to_string());
        let movements = self.generic(content, names, fields, trace);
        if !movements.is_empty() {
            return self.finish(Tier::Generic, movements, trace);
        }

        trace.push("tier3: no validated movement".to_string());
        Vec::new()
    }

    /// Line hits first, then each multi-line block rejoined as a paragraph so
    /// clauses wrapped across a line break are still found.
    fn structured(
        &self,
        content: &str,
        names: &NameValidator,
        fields: &FieldExtractor,
        trace: &mut Vec<String>,
    ) -> Vec<Movement> {
        let mut movements = Vec::new();
        for block in text::blocks(content) {
            let line_hits: Vec<Movement> = block
                .iter()
                .flat_map(|line| self.structured_segment(line, names, fields, trace))
                .collect();
            if block.len() < 2 {
                movements.extend(line_hits);
                continue;
            }

            let paragraph = block.join(" ");
            let mut paragraph_trace = Vec::new();
            let paragraph_hits = self.structured_segment(&paragraph, names, fields, &mut paragraph_trace);
            for entry in paragraph_trace {
                if !trace.contains(&entry) {
                    trace.push(entry);
                }
            }
            movements.extend(merge_passes(line_hits, paragraph_hits));
        }
        movements
    }

    fn structured_segment(
        &self,
        segment: &str,
        names: &NameValidator,
        fields: &FieldExtractor,
        trace: &mut Vec<String>,
    ) -> Vec<Movement> {
        let mut hits: Vec<(usize, ActionType, Captures<'_>)> = self
            .structured
            .iter()
            .flat_map(|pattern| {
                pattern
                    .regex
                    .captures_iter(segment)
                    .filter_map(move |caps| Some((caps.get(0)?.start(), pattern.action, caps)))
            })
            .collect();
        hits.sort_by_key(|(start, _, _)| *start);

        hits.into_iter()
            .flat_map(|(_, action, caps)| {
                self.movement_from_verb(Tier::StructuredLine, segment, action, &caps, names, fields, trace)
            })
            .collect()
    }

    fn tabular_lines(
        &self,
        content: &str,
        action: ActionType,
        names: &NameValidator,
        fields: &FieldExtractor,
        trace: &mut Vec<String>,
    ) -> Vec<Movement> {
        let mut movements = Vec::new();
        for line in text::lines(content) {
            let Some(caps) = self.tabular.captures(line) else {
                continue;
            };
            let people = people_in(Tier::Tabular, &collapse_whitespace(&caps["name"]), names, trace);
            if people.is_empty() {
                continue;
            }

            let mut row = MovementFields {
                registration_number: fields.registration_number(line),
                position: self.bounded(&caps["position"]),
                job_code: fields.job_code(line),
                department: self.bounded(&caps["department"]),
            };
            row.merge_missing(fields.extract_all(line));

            movements.extend(
                people
                    .into_iter()
                    .filter_map(|person| Movement::new(action, person, row.clone(), line)),
            );
        }
        movements
    }

    fn generic(
        &self,
        content: &str,
        names: &NameValidator,
        fields: &FieldExtractor,
        trace: &mut Vec<String>,
    ) -> Vec<Movement> {
        let mut movements = Vec::new();
        for block in text::blocks(content) {
            let block = block.join("\n");
            for caps in self.generic.captures_iter(&block) {
                let action = action_for_verb(&caps["verb"]);
                movements.extend(
                    self.movement_from_verb(Tier::Generic, &block, action, &caps, names, fields, trace),
                );
            }
        }
        movements
    }

    #[allow(clippy::too_many_arguments)]
    fn movement_from_verb(
        &self,
        tier: Tier,
        segment: &str,
        action: ActionType,
        caps: &Captures<'_>,
        names: &NameValidator,
        fields: &FieldExtractor,
        trace: &mut Vec<String>,
    ) -> Vec<Movement> {
        let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
            return Vec::new();
        };
        let people = people_in(tier, &collapse_whitespace(name.as_str()), names, trace);
        if people.is_empty() {
            return Vec::new();
        }

        let window = self.clause_window(segment, whole.start(), whole.end());
        let mut extracted = fields.extract_all(window);
        if let Some(reg) = caps.name("reg") {
            extracted.registration_number = Some(reg.as_str().to_string());
        }

        let span = clean_span(window);
        people
            .into_iter()
            .filter_map(|person| Movement::new(action, person, extracted.clone(), span.as_str()))
            .collect()
    }

    /// Text from the verb up to the next action verb, the end of the segment, or
    /// `window_chars`, whichever comes first.
    fn clause_window<'t>(&self, segment: &'t str, start: usize, match_end: usize) -> &'t str {
        let limit = floor_char_boundary(segment, start + self.window_chars.max(match_end - start));
        let end = self
            .next_verb
            .find_at(segment, match_end)
            .map(|m| m.start())
            .filter(|next| *next < limit)
            .unwrap_or(limit);
        &segment[start..end]
    }

    fn bounded(&self, raw: &str) -> Option<String> {
        let value = clean_span(raw);
        text::within_bounds(&value, self.min_field_len, self.max_field_len).then_some(value)
    }

    fn finish(&self, tier: Tier, movements: Vec<Movement>, trace: &mut Vec<String>) -> Vec<Movement> {
        let found = movements.len();
        let deduped = dedup_movements(movements);
        trace.push(format!(
            "{}: {} movement(s) extracted ({} after dedup)",
            tier.label(),
            found,
            deduped.len()
        ));
        tracing::debug!("{} produced {} movement(s)", tier.label(), deduped.len());
        deduped
    }
}

/// Validated people in a name candidate: one when it is a single name, several
/// when it joins complete names with "e", none when it is rejected.
fn people_in(tier: Tier, candidate: &str, names: &NameValidator, trace: &mut Vec<String>) -> Vec<String> {
    if let Some(people) = names.split_joined(candidate) {
        trace.push(format!(
            "{}: split '{}' into {} people",
            tier.label(),
            candidate,
            people.len()
        ));
        return people;
    }
    match names.check(candidate) {
        Ok(()) => vec![candidate.to_string()],
        Err(reason) => {
            trace.push(format!(
                "{}: rejected name candidate '{}': {}",
                tier.label(),
                candidate,
                reason
            ));
            Vec::new()
        }
    }
}

/// Paragraph hits in document order, preferring the line-level version of the
/// same movement since its window is tighter.
fn merge_passes(mut line_hits: Vec<Movement>, paragraph_hits: Vec<Movement>) -> Vec<Movement> {
    let mut merged = Vec::with_capacity(line_hits.len().max(paragraph_hits.len()));
    for hit in paragraph_hits {
        let same = line_hits
            .iter()
            .position(|m| m.person() == hit.person() && m.action_type == hit.action_type);
        match same {
            Some(i) => merged.push(line_hits.remove(i)),
            None => merged.push(hit),
        }
    }
    merged.extend(line_hits);
    merged
}

/// Keeps the first movement for each `(person, action)` pair.
pub fn dedup_movements(movements: Vec<Movement>) -> Vec<Movement> {
    let mut seen = HashSet::new();
    movements
        .into_iter()
        .filter(|m| seen.insert((m.person().to_string(), m.action_type)))
        .collect()
}

fn action_for_verb(verb: &str) -> ActionType {
    let verb = verb.to_lowercase();
    if verb.starts_with("exoner") || verb.starts_with("dispens") || verb.starts_with("demit") {
        ActionType::Dismissal
    } else if verb.starts_with("design") {
        ActionType::Designation
    } else {
        ActionType::Appointment
    }
}
