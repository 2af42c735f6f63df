use crate::core::text::{clean_span, within_bounds};
use crate::domain::model::{ActDetails, Category};
use crate::utils::error::Result;
use regex::Regex;

/// Secondary details for contract and bid acts.
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    value: Regex,
    company: Vec<Regex>,
    object: Regex,
    modality: Regex,
    number: Regex,
    max_len: usize,
}

impl DetailExtractor {
    pub fn new(max_len: usize) -> Result<Self> {
        Ok(Self {
            value: Regex::new(r"(?i)r\$\s*(\d(?:[\d.]*\d)?(?:,\d{2})?)")?,
            company: vec![
                Regex::new(r"(?i)\bcontratada[\s:]+([^,.;\n]+)")?,
                Regex::new(r"(?i)\bempresa\s+([^,.;\n]+)")?,
            ],
            object: Regex::new(r"(?i)\bobjeto[\s:]+([^.\n]+)")?,
            modality: Regex::new(
                r"(?i)\b(pregão\s+eletrônico|pregão\s+presencial|pregão|concorrência|tomada\s+de\s+preços|convite|leilão)\b",
            )?,
            number: Regex::new(r"(?i)\bn[º°]\s*(\d[\d/.\-]*\d|\d)")?,
            max_len,
        })
    }

    pub fn extract(&self, category: Category, content: &str) -> Option<ActDetails> {
        match category {
            Category::Contract => Some(ActDetails::Contract {
                value: self
                    .value
                    .captures(content)
                    .map(|caps| format!("R$ {}", &caps[1])),
                company: self
                    .company
                    .iter()
                    .find_map(|pattern| self.capture(pattern, content)),
                object: self.capture(&self.object, content),
            }),
            Category::Bid => Some(ActDetails::Bid {
                modality: self
                    .modality
                    .captures(content)
                    .map(|caps| caps[1].split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()),
                number: self.capture(&self.number, content),
                object: self.capture(&self.object, content),
            }),
            _ => None,
        }
    }

    fn capture(&self, pattern: &Regex, content: &str) -> Option<String> {
        let caps = pattern.captures(content)?;
        let value = clean_span(caps.get(1)?.as_str());
        within_bounds(&value, 1, self.max_len).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> DetailExtractor {
        DetailExtractor::new(200).unwrap()
    }

    #[test]
    fn test_contract_details() {
        let details = extractor().extract(
            Category::Contract,
            "Extrato do contrato. Contratada: Construtora Horizonte Ltda, valor R$ 2.500.000,00. Objeto: reforma da escola municipal.",
        );
        assert_eq!(
            details,
            Some(ActDetails::Contract {
                value: Some("R$ 2.500.000,00".to_string()),
                company: Some("Construtora Horizonte Ltda".to_string()),
                object: Some("reforma da escola municipal".to_string()),
            })
        );
    }

    #[test]
    fn test_bid_details() {
        let details = extractor().extract(
            Category::Bid,
            "Aviso de Licitação. Pregão Eletrônico nº 045/2025. Objeto: aquisição de material de escritório.",
        );
        assert_eq!(
            details,
            Some(ActDetails::Bid {
                modality: Some("pregão eletrônico".to_string()),
                number: Some("045/2025".to_string()),
                object: Some("aquisição de material de escritório".to_string()),
            })
        );
    }

    #[test]
    fn test_other_categories_have_no_details() {
        assert_eq!(extractor().extract(Category::Decree, "Decreto nº 1"), None);
    }
}
