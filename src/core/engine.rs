use crate::config::ExtractionConfig;
use crate::core::classifier::Classifier;
use crate::core::details::DetailExtractor;
use crate::core::fields::FieldExtractor;
use crate::core::movements::MovementExtractor;
use crate::core::names::NameValidator;
use crate::core::scoring::{ConfidenceScorer, FieldPresence};
use crate::core::text;
use crate::domain::model::{Category, ClassifiedResult, Document, ScoredMovement};
use crate::utils::error::Result;
use crate::utils::logger;
use crate::utils::validation::Validate;

const SUMMARY_CHARS: usize = 500;

/// Document in, [`ClassifiedResult`] out. Holds only immutable configuration and
/// compiled patterns, so one engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    config: ExtractionConfig,
    classifier: Classifier,
    names: NameValidator,
    fields: FieldExtractor,
    movements: MovementExtractor,
    scorer: ConfidenceScorer,
    details: DetailExtractor,
}

impl ExtractionEngine {
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            classifier: Classifier::new()?,
            names: NameValidator::new(&config),
            fields: FieldExtractor::new(&config)?,
            movements: MovementExtractor::new(&config)?,
            scorer: ConfidenceScorer::new(&config)?,
            details: DetailExtractor::new(config.max_field_length)?,
            config,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(ExtractionConfig::default())
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Validates an untyped JSON document before processing it.
    pub fn process_json(&self, value: &serde_json::Value) -> Result<ClassifiedResult> {
        let doc = Document::from_json(value)?;
        Ok(self.process(&doc))
    }

    pub fn process_batch(&self, docs: &[Document]) -> Vec<ClassifiedResult> {
        docs.iter().map(|doc| self.process(doc)).collect()
    }

    pub fn process(&self, doc: &Document) -> ClassifiedResult {
        let mut trace = Vec::new();

        let (content, truncated) = text::bound_chars(&doc.content, self.config.max_input_chars);
        if truncated {
            trace.push(format!(
                "input: content truncated to {} chars",
                self.config.max_input_chars
            ));
        }

        let classification = self.classifier.classify(&doc.title, content);
        let header = format!("{}\n{}", doc.title, content);
        match self.classifier.personnel_cue(&header) {
            Some(cue) if classification.category == Category::Personnel => trace.push(format!(
                "classifier: personnel (cue '{}'), action {:?}",
                cue, classification.action_type
            )),
            _ => trace.push(format!("classifier: {:?}", classification.category)),
        }

        let mut movements = Vec::new();
        let mut fields = None;
        let mut score = None;

        if let (Category::Personnel, Some(action)) =
            (classification.category, classification.action_type)
        {
            movements = self
                .movements
                .extract(content, action, &self.names, &self.fields, &mut trace)
                .into_iter()
                .map(|movement| {
                    let source = format!("{}\n{}", doc.title, movement.source_span);
                    let score = self.scorer.score(&movement, &source);
                    ScoredMovement { movement, score }
                })
                .collect::<Vec<_>>();

            if movements.is_empty() {
                // 沒有可信的人名時仍保留文件層級的欄位
                let doc_fields = self.fields.extract_all(content);
                let presence = FieldPresence::from_fields(None, &doc_fields);
                score = Some(self.scorer.score_presence(presence, &header));
                if !doc_fields.is_empty() {
                    fields = Some(doc_fields);
                }
            } else {
                score = movements.iter().map(|m| m.score).max();
            }
        }

        let details = self.details.extract(classification.category, content);

        let r#type = match classification.action_type {
            Some(action) => action.label().to_string(),
            None => classification.category.label().to_string(),
        };

        tracing::debug!(
            "classified '{}' as {:?} with {} movement(s)",
            doc.title,
            classification.category,
            movements.len()
        );
        logger::mirror_debug_trace(&doc.title, &trace);

        ClassifiedResult {
            title: doc.title.clone(),
            category: classification.category,
            r#type,
            action_type: classification.action_type,
            movements,
            fields,
            details,
            score,
            summary: text::excerpt(&doc.content, SUMMARY_CHARS),
            url: doc.url.clone(),
            source: doc.source.clone(),
            debug_trace: trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ActDetails, ActionType};

    fn engine() -> ExtractionEngine {
        ExtractionEngine::with_defaults().unwrap()
    }

    #[test]
    fn test_personnel_result_is_assembled() {
        let doc = Document::new(
            "ATOS DO PREFEITO",
            "Exonera Breno Seroa da Motta, do cargo em comissão de Diretor, código nº DIR.012, da chefia da Secretaria Municipal de Política Urbana.",
        );
        let result = engine().process(&doc);

        assert_eq!(result.category, Category::Personnel);
        assert_eq!(result.r#type, "Exoneração");
        assert_eq!(result.movements.len(), 1);
        let m = &result.movements[0];
        assert_eq!(m.movement.person(), "Breno Seroa da Motta");
        assert_eq!(m.movement.department(), Some("Secretaria Municipal de Política Urbana"));
        // 30 + 20 + 15 + 10 + verb 10 + comissão 10 + código nº 5 + header 5
        assert_eq!(m.score, 100);
        assert_eq!(result.score, Some(100));
    }

    #[test]
    fn test_personnel_without_movement_keeps_document_fields() {
        let doc = Document::new(
            "Aviso",
            "Ficam vagos os cargos em comissão. Cargo em comissão DAM 2, código nº DAM.002.",
        );
        let result = engine().process(&doc);

        assert_eq!(result.category, Category::Personnel);
        assert!(result.movements.is_empty());
        let fields = result.fields.unwrap();
        assert_eq!(fields.position.as_deref(), Some("DAM 2"));
        assert_eq!(fields.job_code.as_deref(), Some("DAM.002"));
        // -20 + 20 + 15 + comissão 10 + código nº 5
        assert_eq!(result.score, Some(30));
    }

    #[test]
    fn test_truncation_is_traced() {
        let config = ExtractionConfig {
            max_input_chars: 100,
            ..Default::default()
        };
        let engine = ExtractionEngine::new(config).unwrap();
        let doc = Document::new("Aviso", "a".repeat(600));
        let result = engine.process(&doc);

        assert!(result.debug_trace[0].starts_with("input: content truncated"));
        assert_eq!(result.summary.chars().count(), SUMMARY_CHARS + 3);
    }

    #[test]
    fn test_contract_details_attached() {
        let doc = Document::new(
            "CONTRATOS E CONVÊNIOS",
            "Contrato nº 2025/001. Contratada: Empresa XYZ Ltda. Valor: R$ 15.000,00.",
        );
        let result = engine().process(&doc);
        assert_eq!(result.category, Category::Contract);
        assert_eq!(result.r#type, "Contrato");
        assert!(matches!(
            result.details,
            Some(ActDetails::Contract { value: Some(ref v), .. }) if v == "R$ 15.000,00"
        ));
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExtractionConfig {
            name_token_ratio: 2.0,
            ..Default::default()
        };
        assert!(ExtractionEngine::new(config).is_err());
    }

    #[test]
    fn test_process_json_rejects_non_string_content() {
        let value = serde_json::json!({"title": "ATOS", "content": ["Exonera"]});
        assert!(engine().process_json(&value).is_err());

        let value = serde_json::json!({"title": "ATOS", "content": "Nomear Maria Fernanda Costa para o cargo de Assessora Técnica"});
        let result = engine().process_json(&value).unwrap();
        assert_eq!(result.action_type, Some(ActionType::Appointment));
    }
}
