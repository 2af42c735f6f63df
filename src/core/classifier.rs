use crate::domain::model::{ActionType, Category};
use crate::utils::error::Result;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    /// Only set for [`Category::Personnel`].
    pub action_type: Option<ActionType>,
}

/// Keyword classifier. Rules are checked in priority order and the first hit wins;
/// personnel wording comes first because a personnel decree still says "decreto".
#[derive(Debug, Clone)]
pub struct Classifier {
    personnel: Regex,
    dismissal: Regex,
    appointment: Regex,
    designation: Regex,
    rules: Vec<(Category, Regex)>,
}

impl Classifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            personnel: Regex::new(
                r"(?i)\b(?:nomear|nomeia|nomeação|nomeações|designar|designa|exonera|exonerar|exoneração|exonerações|dispensar|demitir|cargo\s+em\s+comiss[ãa]o|cargo\s+comissionado)\b",
            )?,
            dismissal: Regex::new(
                r"(?i)\b(?:exonera|exonerar|exoneração|exonerações|exonerada|exonerado|dispensar|dispensa|demitir|demite|demissão)\b",
            )?,
            appointment: Regex::new(
                r"(?i)\b(?:nomear|nomeia|nomeação|nomeações|nomeada|nomeado|contratar)\b",
            )?,
            designation: Regex::new(r"(?i)\b(?:designar|designa|designação|designada|designado)\b")?,
            rules: vec![
                (
                    Category::Contract,
                    Regex::new(r"(?i)\b(?:contratos?|aditivos?|termos?|convênios?)\b")?,
                ),
                (
                    Category::Bid,
                    Regex::new(r"(?i)\b(?:licitação|licitações|pregão|concorrência|edital)\b")?,
                ),
                (Category::Decree, Regex::new(r"(?i)\bdecretos?\b")?),
                (Category::Ordinance, Regex::new(r"(?i)\bportarias?\b")?),
            ],
        })
    }

    pub fn classify(&self, title: &str, content: &str) -> Classification {
        let text = format!("{}\n{}", title, content);

        if self.personnel.is_match(&text) {
            return Classification {
                category: Category::Personnel,
                action_type: Some(self.action_type(&text)),
            };
        }

        let category = self
            .rules
            .iter()
            .find(|(_, pattern)| pattern.is_match(&text))
            .map(|(category, _)| *category)
            .unwrap_or(Category::General);

        Classification {
            category,
            action_type: None,
        }
    }

    /// Dismissal wording outranks appointment wording: a document that mentions
    /// both is a replacement, and the exoneração is the primary act.
    pub fn action_type(&self, text: &str) -> ActionType {
        if self.dismissal.is_match(text) {
            ActionType::Dismissal
        } else if self.appointment.is_match(text) {
            ActionType::Appointment
        } else if self.designation.is_match(text) {
            ActionType::Designation
        } else {
            ActionType::Appointment
        }
    }

    /// Label of the personnel keyword that triggered classification, for the trace.
    pub fn personnel_cue<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.personnel.find(text).map(|m| m.as_str())
    }
}
