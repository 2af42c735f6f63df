use crate::utils::error::{DomError, Result};
use serde::{Deserialize, Serialize};

/// 爬蟲交來的一則公報原文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: None,
            source: None,
        }
    }

    /// Strict conversion from an untyped JSON object. `title` and `content` must be
    /// present and be strings; `url` and `source` may be absent or null.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| DomError::malformed("document", "must be a JSON object"))?;

        let title = required_string(obj, "title")?;
        let content = required_string(obj, "content")?;
        let url = optional_string(obj, "url")?;
        let source = optional_string(obj, "source")?;

        Ok(Self {
            title,
            content,
            url,
            source,
        })
    }

    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return true;
        }
        format!("{} {}", self.title, self.content)
            .to_lowercase()
            .contains(&keyword)
    }
}

fn required_string(obj: &serde_json::Map<String, serde_json::Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(DomError::malformed(
            field,
            format!("must be a string, got {}", json_kind(other)),
        )),
        None => Err(DomError::malformed(field, "is missing")),
    }
}

fn optional_string(
    obj: &serde_json::Map<String, serde_json::Value>,
    field: &str,
) -> Result<Option<String>> {
    match obj.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DomError::malformed(
            field,
            format!("must be a string or null, got {}", json_kind(other)),
        )),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Appointment,
    Dismissal,
    Designation,
}

impl ActionType {
    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Appointment => "Nomeação",
            ActionType::Dismissal => "Exoneração",
            ActionType::Designation => "Designação",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Personnel,
    Contract,
    Bid,
    Decree,
    Ordinance,
    General,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Personnel => "Nomeação",
            Category::Contract => "Contrato",
            Category::Bid => "Licitação",
            Category::Decree => "Decreto",
            Category::Ordinance => "Portaria",
            Category::General => "Publicação",
        }
    }
}

/// Optional fields shared by movements and by the document-level fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl MovementFields {
    pub fn is_empty(&self) -> bool {
        self.registration_number.is_none()
            && self.position.is_none()
            && self.job_code.is_none()
            && self.department.is_none()
    }

    /// Fills only the fields that are still absent.
    pub fn merge_missing(&mut self, other: MovementFields) {
        if self.registration_number.is_none() {
            self.registration_number = other.registration_number;
        }
        if self.position.is_none() {
            self.position = other.position;
        }
        if self.job_code.is_none() {
            self.job_code = other.job_code;
        }
        if self.department.is_none() {
            self.department = other.department;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub action_type: ActionType,
    person: String,
    #[serde(flatten)]
    pub fields: MovementFields,
    pub source_span: String,
}

impl Movement {
    /// `None` when the person is blank; a movement always names someone.
    pub fn new(
        action_type: ActionType,
        person: impl Into<String>,
        fields: MovementFields,
        source_span: impl Into<String>,
    ) -> Option<Self> {
        let person = person.into().trim().to_string();
        if person.is_empty() {
            return None;
        }
        Some(Self {
            action_type,
            person,
            fields,
            source_span: source_span.into(),
        })
    }

    pub fn person(&self) -> &str {
        &self.person
    }

    pub fn registration_number(&self) -> Option<&str> {
        self.fields.registration_number.as_deref()
    }

    pub fn position(&self) -> Option<&str> {
        self.fields.position.as_deref()
    }

    pub fn job_code(&self) -> Option<&str> {
        self.fields.job_code.as_deref()
    }

    pub fn department(&self) -> Option<&str> {
        self.fields.department.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredMovement {
    #[serde(flatten)]
    pub movement: Movement,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActDetails {
    Contract {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        company: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        object: Option<String>,
    },
    Bid {
        #[serde(skip_serializing_if = "Option::is_none")]
        modality: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        number: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        object: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedResult {
    pub title: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,
    pub movements: Vec<ScoredMovement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<MovementFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ActDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub debug_trace: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_accepts_minimal_document() {
        let doc = Document::from_json(&json!({"title": "ATOS DO PREFEITO", "content": ""})).unwrap();
        assert_eq!(doc.title, "ATOS DO PREFEITO");
        assert!(doc.url.is_none());
    }

    #[test]
    fn test_from_json_rejects_missing_or_non_string_fields() {
        assert!(matches!(
            Document::from_json(&json!({"title": "x"})),
            Err(DomError::MalformedInput { ref field, .. }) if field == "content"
        ));
        assert!(matches!(
            Document::from_json(&json!({"title": 42, "content": "x"})),
            Err(DomError::MalformedInput { ref field, .. }) if field == "title"
        ));
        assert!(Document::from_json(&json!({"title": "t", "content": "c", "url": 3})).is_err());
        assert!(Document::from_json(&json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_movement_requires_person() {
        assert!(Movement::new(ActionType::Dismissal, "   ", MovementFields::default(), "").is_none());
        let m = Movement::new(ActionType::Dismissal, " Ana Souza ", MovementFields::default(), "x").unwrap();
        assert_eq!(m.person(), "Ana Souza");
    }

    #[test]
    fn test_matches_keyword_is_case_insensitive() {
        let doc = Document::new("ATOS DO PREFEITO", "Exonera Ana Souza");
        assert!(doc.matches_keyword("EXONERA"));
        assert!(doc.matches_keyword("prefeito"));
        assert!(!doc.matches_keyword("licitação"));
    }

    #[test]
    fn test_movement_serializes_flat_fields() {
        let fields = MovementFields {
            registration_number: Some("BM-324.917-2".to_string()),
            ..Default::default()
        };
        let m = Movement::new(ActionType::Dismissal, "Ana Souza", fields, "span").unwrap();
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["registration_number"], "BM-324.917-2");
        assert_eq!(value["action_type"], "dismissal");
        assert!(value.get("position").is_none());
    }
}
