use crate::utils::error::{DomError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 機構、地名與法條用語，出現在候選姓名中即判定為誤判
pub const DEFAULT_NAME_DENYLIST: &[&str] = &[
    // 城市與行政區
    "belo horizonte",
    "contagem",
    "betim",
    "venda nova",
    "barreiro",
    "pampulha",
    "minas gerais",
    // 機構
    "secretaria",
    "prefeitura",
    "diário oficial",
    "dom pbh",
    "câmara municipal",
    "poder executivo",
    "ministério público",
    "tribunal de justiça",
    "governo do",
    "assembleia de",
    "municipal de",
    "estadual de",
    "federal de",
    "concurso público",
    "provimento efetivo",
    "recrutamento amplo",
    "lei municipal",
    // 法條用語
    "art.",
    "artigo",
    "inciso",
    "parágrafo",
    "decreto",
    "portaria",
    // 公司後綴
    "ltda",
    "s.a.",
    "s/a",
    "eireli",
];

pub const DEFAULT_NAME_CONNECTIVES: &[&str] = &["da", "de", "do", "dos", "das", "e", "a", "o"];

pub const DEFAULT_HEADER_CUES: &[&str] = &[
    "atos do prefeito",
    "decreto",
    "portaria",
    "resolve",
    "nomeações",
    "exonerações",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub min_name_tokens: usize,
    pub max_name_tokens: usize,
    pub name_token_ratio: f64,
    pub accept_uppercase_names: bool,
    pub name_denylist: Vec<String>,
    pub extra_denylist: Vec<String>,
    pub name_connectives: Vec<String>,
    pub min_field_length: usize,
    pub max_field_length: usize,
    pub max_input_chars: usize,
    pub window_chars: usize,
    pub header_cues: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_name_length: 6,
            max_name_length: 80,
            min_name_tokens: 2,
            max_name_tokens: 8,
            name_token_ratio: 0.7,
            accept_uppercase_names: true,
            name_denylist: to_strings(DEFAULT_NAME_DENYLIST),
            extra_denylist: Vec::new(),
            name_connectives: to_strings(DEFAULT_NAME_CONNECTIVES),
            min_field_length: 3,
            max_field_length: 200,
            max_input_chars: 10_000,
            window_chars: 400,
            header_cues: to_strings(DEFAULT_HEADER_CUES),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl ExtractionConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DomError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，未列出的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DomError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Built-in denylist plus `extra_denylist`, lowercased.
    pub fn effective_denylist(&self) -> Vec<String> {
        self.name_denylist
            .iter()
            .chain(self.extra_denylist.iter())
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_positive_number("min_name_length", self.min_name_length, 1)?;
        validation::validate_positive_number(
            "max_name_length",
            self.max_name_length,
            self.min_name_length,
        )?;
        validation::validate_positive_number("min_name_tokens", self.min_name_tokens, 2)?;
        validation::validate_positive_number(
            "max_name_tokens",
            self.max_name_tokens,
            self.min_name_tokens,
        )?;
        validation::validate_range("name_token_ratio", self.name_token_ratio, 0.0, 1.0)?;
        validation::validate_positive_number("min_field_length", self.min_field_length, 1)?;
        validation::validate_positive_number(
            "max_field_length",
            self.max_field_length,
            self.min_field_length,
        )?;
        validation::validate_positive_number("max_input_chars", self.max_input_chars, 100)?;
        validation::validate_positive_number("window_chars", self.window_chars, 40)?;
        validation::validate_required_list("name_denylist", &self.name_denylist)?;
        validation::validate_non_empty_entries("extra_denylist", &self.extra_denylist)?;
        validation::validate_required_list("name_connectives", &self.name_connectives)?;
        validation::validate_non_empty_entries("header_cues", &self.header_cues)?;
        Ok(())
    }
}

impl Validate for ExtractionConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
