use crate::config::ExtractionConfig;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRejection {
    TooShort(usize),
    TooLong(usize),
    ContainsDigit,
    DenylistedTerm(String),
    TooFewTokens(usize),
    TooManyTokens(usize),
    LowNameTokenRatio { valid: usize, total: usize },
}

impl fmt::Display for NameRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameRejection::TooShort(len) => write!(f, "too short ({} chars)", len),
            NameRejection::TooLong(len) => write!(f, "too long ({} chars)", len),
            NameRejection::ContainsDigit => write!(f, "contains digits"),
            NameRejection::DenylistedTerm(term) => write!(f, "contains denylisted term '{}'", term),
            NameRejection::TooFewTokens(n) => write!(f, "only {} token(s)", n),
            NameRejection::TooManyTokens(n) => write!(f, "{} tokens", n),
            NameRejection::LowNameTokenRatio { valid, total } => {
                write!(f, "only {}/{} tokens look like name parts", valid, total)
            }
        }
    }
}

/// Decides whether a captured span is a person's name rather than an
/// organisation, a place or a piece of legal boilerplate.
#[derive(Debug, Clone)]
pub struct NameValidator {
    denylist: Vec<String>,
    connectives: Vec<String>,
    min_length: usize,
    max_length: usize,
    min_tokens: usize,
    max_tokens: usize,
    token_ratio: f64,
    accept_uppercase: bool,
}

impl NameValidator {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            denylist: config.effective_denylist(),
            connectives: config
                .name_connectives
                .iter()
                .map(|c| c.trim().to_string())
                .collect(),
            min_length: config.min_name_length,
            max_length: config.max_name_length,
            min_tokens: config.min_name_tokens,
            max_tokens: config.max_name_tokens,
            token_ratio: config.name_token_ratio,
            accept_uppercase: config.accept_uppercase_names,
        }
    }

    pub fn is_plausible_person_name(&self, candidate: &str) -> bool {
        self.check(candidate).is_ok()
    }

    pub fn check(&self, candidate: &str) -> Result<(), NameRejection> {
        let candidate = candidate.trim();
        let len = candidate.chars().count();

        if len < self.min_length {
            return Err(NameRejection::TooShort(len));
        }
        if len > self.max_length {
            return Err(NameRejection::TooLong(len));
        }
        if candidate.chars().any(|c| c.is_ascii_digit()) {
            return Err(NameRejection::ContainsDigit);
        }

        let lowered = candidate.to_lowercase();
        if let Some(term) = self.denylist.iter().find(|term| lowered.contains(term.as_str())) {
            return Err(NameRejection::DenylistedTerm(term.clone()));
        }

        let tokens: Vec<&str> = candidate.split_whitespace().collect();
        if tokens.len() < self.min_tokens {
            return Err(NameRejection::TooFewTokens(tokens.len()));
        }
        if tokens.len() > self.max_tokens {
            return Err(NameRejection::TooManyTokens(tokens.len()));
        }

        let valid = tokens
            .iter()
            .filter(|token| self.is_connective(token) || self.is_name_token(token))
            .count();
        if (valid as f64) < self.token_ratio * tokens.len() as f64 {
            return Err(NameRejection::LowNameTokenRatio {
                valid,
                total: tokens.len(),
            });
        }

        Ok(())
    }

    /// Splits "Ana Maria Souza e Pedro Henrique Lima" into its people. Returns
    /// `None` unless every part on both sides of a standalone "e" is a valid name
    /// by itself, so "Ferreira e Silva" style surnames stay whole.
    pub fn split_joined(&self, candidate: &str) -> Option<Vec<String>> {
        let mut parts = vec![Vec::new()];
        for token in candidate.split_whitespace() {
            if token == "e" || token == "E" {
                parts.push(Vec::new());
            } else if let Some(last) = parts.last_mut() {
                last.push(token);
            }
        }
        if parts.len() < 2 {
            return None;
        }

        let people: Vec<String> = parts.iter().map(|tokens| tokens.join(" ")).collect();
        people
            .iter()
            .all(|person| self.check(person).is_ok())
            .then_some(people)
    }

    fn is_connective(&self, token: &str) -> bool {
        self.connectives.iter().any(|c| c == token)
    }

    // 允許連字號與撇號分隔的複合姓氏，例如 Ana-Maria、D'Ávila
    fn is_name_token(&self, token: &str) -> bool {
        token
            .split(['-', '\'', '’'])
            .all(|part| !part.is_empty() && self.is_name_part(part))
    }

    fn is_name_part(&self, part: &str) -> bool {
        let mut chars = part.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !first.is_uppercase() {
            return false;
        }
        let rest: Vec<char> = chars.collect();
        if rest.iter().all(|c| c.is_lowercase()) {
            return true;
        }
        self.accept_uppercase && !rest.is_empty() && rest.iter().all(|c| c.is_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> NameValidator {
        NameValidator::new(&ExtractionConfig::default())
    }

    #[test]
    fn test_accepts_typical_names() {
        let v = validator();
        assert!(v.is_plausible_person_name("Ariadna Miranda Valério Andrade"));
        assert!(v.is_plausible_person_name("Breno Seroa da Motta"));
        assert!(v.is_plausible_person_name("Ana Paula da Silva dos Santos"));
        assert!(v.is_plausible_person_name("Natália Souza Diniz Alves"));
    }

    #[test]
    fn test_accepts_all_caps_gazette_names() {
        let v = validator();
        assert!(v.is_plausible_person_name("JOSÉ CARLOS DE OLIVEIRA SANTOS"));

        let strict = NameValidator::new(&ExtractionConfig {
            accept_uppercase_names: false,
            ..Default::default()
        });
        assert!(!strict.is_plausible_person_name("JOSÉ CARLOS DE OLIVEIRA SANTOS"));
    }

    #[test]
    fn test_rejects_single_token_and_digits() {
        let v = validator();
        assert_eq!(v.check("Mariana"), Err(NameRejection::TooFewTokens(1)));
        assert_eq!(v.check("Ana Souza 3"), Err(NameRejection::ContainsDigit));
        assert!(matches!(v.check("Ana"), Err(NameRejection::TooShort(3))));
    }

    #[test]
    fn test_denylisted_terms_never_validate() {
        let v = validator();
        for candidate in [
            "Prefeitura de Belo Horizonte",
            "Secretaria Municipal de Administração",
            "Diário Oficial do Município",
            "Construtora Horizonte Ltda",
            "Comercial Mineira S.A.",
            "Souza Serviços Eireli",
            "Artigo Quinto Parágrafo Único",
            "Maria Silva Prefeitura Nova",
        ] {
            assert!(
                matches!(v.check(candidate), Err(NameRejection::DenylistedTerm(_))),
                "{} should be denylisted",
                candidate
            );
        }
    }

    #[test]
    fn test_rejects_lowercase_heavy_spans() {
        let v = validator();
        assert!(matches!(
            v.check("informa sobre o funcionamento"),
            Err(NameRejection::LowNameTokenRatio { .. })
        ));
        assert!(!v.is_plausible_person_name("Ana para exercer cargo"));
    }

    #[test]
    fn test_extra_denylist_from_config() {
        let v = NameValidator::new(&ExtractionConfig {
            extra_denylist: vec!["Sabará".to_string()],
            ..Default::default()
        });
        assert!(!v.is_plausible_person_name("Câmara Sabará Central"));
        assert!(v.is_plausible_person_name("Pedro Henrique Almeida"));
    }

    #[test]
    fn test_split_joined_names() {
        let v = validator();
        assert_eq!(
            v.split_joined("Ana Maria Souza e Pedro Henrique Lima"),
            Some(vec!["Ana Maria Souza".to_string(), "Pedro Henrique Lima".to_string()])
        );
        assert_eq!(
            v.split_joined("LUCIA HELENA SILVA E PEDRO AUGUSTO SANTOS"),
            Some(vec!["LUCIA HELENA SILVA".to_string(), "PEDRO AUGUSTO SANTOS".to_string()])
        );
        assert_eq!(v.split_joined("José Ferreira e Silva"), None);
        assert_eq!(v.split_joined("Ana Maria Souza"), None);
    }
}
