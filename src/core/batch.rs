use crate::core::engine::ExtractionEngine;
use crate::domain::model::{Category, ClassifiedResult, Document};
use crate::domain::ports::ResultSink;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Case-insensitive filter on title or content.
    pub keyword: Option<String>,
    /// Drops personnel results scoring below this. Other categories carry no
    /// score and always pass.
    pub min_score: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_documents: usize,
    pub matched_documents: usize,
    pub emitted_results: usize,
    pub movements: usize,
}

/// Classify, filter, sort, then hand everything to a sink.
pub struct BatchRunner<'e> {
    engine: &'e ExtractionEngine,
    options: BatchOptions,
}

impl<'e> BatchRunner<'e> {
    pub fn new(engine: &'e ExtractionEngine, options: BatchOptions) -> Self {
        Self { engine, options }
    }

    pub fn collect(&self, docs: &[Document]) -> Vec<ClassifiedResult> {
        let mut results: Vec<ClassifiedResult> = docs
            .iter()
            .filter(|doc| self.keep_document(doc))
            .map(|doc| self.engine.process(doc))
            .filter(|result| self.keep_result(result))
            .collect();

        // 穩定排序：同分保留輸入順序
        results.sort_by(|a, b| b.score.unwrap_or(0).cmp(&a.score.unwrap_or(0)));
        results
    }

    pub fn run<S: ResultSink>(&self, docs: &[Document], sink: &mut S) -> Result<BatchSummary> {
        tracing::info!("📥 Processing {} documents", docs.len());

        let matched_documents = docs.iter().filter(|doc| self.keep_document(doc)).count();
        if let Some(keyword) = &self.options.keyword {
            tracing::info!("🔍 {} documents match keyword '{}'", matched_documents, keyword);
        }

        let results = self.collect(docs);
        let movements = results.iter().map(|r| r.movements.len()).sum();
        tracing::info!(
            "🔧 Classified {} results with {} movement(s)",
            results.len(),
            movements
        );

        for result in &results {
            sink.accept(result)?;
        }
        sink.finish()?;
        tracing::info!("💾 Results written");

        Ok(BatchSummary {
            total_documents: docs.len(),
            matched_documents,
            emitted_results: results.len(),
            movements,
        })
    }

    fn keep_document(&self, doc: &Document) -> bool {
        match &self.options.keyword {
            Some(keyword) => doc.matches_keyword(keyword),
            None => true,
        }
    }

    fn keep_result(&self, result: &ClassifiedResult) -> bool {
        match (self.options.min_score, result.category, result.score) {
            (Some(min), Category::Personnel, Some(score)) => score >= min,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemorySink {
        titles: Vec<String>,
        finished: bool,
    }

    impl ResultSink for MemorySink {
        fn accept(&mut self, result: &ClassifiedResult) -> Result<()> {
            self.titles.push(result.title.clone());
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn docs() -> Vec<Document> {
        vec![
            Document::new("Aviso de Licitação", "Pregão Eletrônico nº 12/2025."),
            Document::new(
                "ATOS DO PREFEITO",
                "Exonera Ariadna Miranda Valério Andrade, BM-324.917-2, do cargo em comissão DAM 3, código nº DAM.003, da chefia da Secretaria Municipal de Administração Regional Venda Nova.",
            ),
            Document::new("Nomeação", "Nomear Maria Fernanda Costa para o cargo de Assessora Técnica"),
            Document::new("Comunicado", "Horário de atendimento alterado."),
        ]
    }

    #[test]
    fn test_results_sorted_by_score_stable() {
        let engine = ExtractionEngine::with_defaults().unwrap();
        let runner = BatchRunner::new(&engine, BatchOptions::default());
        let titles: Vec<String> = runner.collect(&docs()).into_iter().map(|r| r.title).collect();

        assert_eq!(
            titles,
            vec!["ATOS DO PREFEITO", "Nomeação", "Aviso de Licitação", "Comunicado"]
        );
    }

    #[test]
    fn test_min_score_only_filters_personnel() {
        let engine = ExtractionEngine::with_defaults().unwrap();
        let options = BatchOptions {
            min_score: Some(90),
            ..Default::default()
        };
        let runner = BatchRunner::new(&engine, options);
        let titles: Vec<String> = runner.collect(&docs()).into_iter().map(|r| r.title).collect();

        assert_eq!(titles, vec!["ATOS DO PREFEITO", "Aviso de Licitação", "Comunicado"]);
    }

    #[test]
    fn test_keyword_filter_and_sink() {
        let engine = ExtractionEngine::with_defaults().unwrap();
        let options = BatchOptions {
            keyword: Some("MARIA".to_string()),
            ..Default::default()
        };
        let mut sink = MemorySink::default();
        let summary = BatchRunner::new(&engine, options).run(&docs(), &mut sink).unwrap();

        assert_eq!(sink.titles, vec!["Nomeação"]);
        assert!(sink.finished);
        assert_eq!(summary.total_documents, 4);
        assert_eq!(summary.matched_documents, 1);
        assert_eq!(summary.movements, 1);
    }
}
