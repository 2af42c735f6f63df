use crate::domain::model::{ClassifiedResult, MovementFields};
use crate::domain::ports::ResultSink;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<&'a str>,
    pub total: usize,
    pub results: &'a [ClassifiedResult],
}

/// Buffers results and writes one pretty-printed [`BatchReport`] on finish.
pub struct JsonReportSink<W: Write> {
    writer: W,
    keyword: Option<String>,
    results: Vec<ClassifiedResult>,
}

impl<W: Write> JsonReportSink<W> {
    pub fn new(writer: W, keyword: Option<String>) -> Self {
        Self {
            writer,
            keyword,
            results: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonReportSink<W> {
    fn accept(&mut self, result: &ClassifiedResult) -> Result<()> {
        self.results.push(result.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let report = BatchReport {
            generated_at: Utc::now(),
            keyword: self.keyword.as_deref(),
            total: self.results.len(),
            results: &self.results,
        };
        serde_json::to_writer_pretty(&mut self.writer, &report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MovementRow<'a> {
    title: &'a str,
    category: &'a str,
    r#type: &'a str,
    action_type: Option<&'a str>,
    person: Option<&'a str>,
    registration_number: Option<&'a str>,
    position: Option<&'a str>,
    job_code: Option<&'a str>,
    department: Option<&'a str>,
    score: Option<u8>,
    url: Option<&'a str>,
}

fn row<'a>(
    result: &'a ClassifiedResult,
    action_type: Option<&'a str>,
    person: Option<&'a str>,
    fields: Option<&'a MovementFields>,
    score: Option<u8>,
) -> MovementRow<'a> {
    MovementRow {
        title: &result.title,
        category: result.category.label(),
        r#type: &result.r#type,
        action_type,
        person,
        registration_number: fields.and_then(|f| f.registration_number.as_deref()),
        position: fields.and_then(|f| f.position.as_deref()),
        job_code: fields.and_then(|f| f.job_code.as_deref()),
        department: fields.and_then(|f| f.department.as_deref()),
        score,
        url: result.url.as_deref(),
    }
}

/// One CSV row per movement. Documents without movements get a single row with
/// an empty person column.
pub struct CsvMovementSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvMovementSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

impl<W: Write> ResultSink for CsvMovementSink<W> {
    fn accept(&mut self, result: &ClassifiedResult) -> Result<()> {
        if result.movements.is_empty() {
            self.writer.serialize(row(
                result,
                result.action_type.map(|a| a.label()),
                None,
                result.fields.as_ref(),
                result.score,
            ))?;
        }
        for scored in &result.movements {
            let m = &scored.movement;
            self.writer.serialize(row(
                result,
                Some(m.action_type.label()),
                Some(m.person()),
                Some(&m.fields),
                Some(scored.score),
            ))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::ExtractionEngine;
    use crate::domain::model::Document;

    fn results() -> Vec<ClassifiedResult> {
        let engine = ExtractionEngine::with_defaults().unwrap();
        engine.process_batch(&[
            Document::new(
                "ATOS DO PREFEITO",
                "Exonera Ariadna Miranda Valério Andrade, BM-324.917-2, do cargo em comissão DAM 3, código nº DAM.003.\nNomear Maria Fernanda Costa para o cargo de Assessora Técnica.",
            ),
            Document::new("Comunicado", "Horário de atendimento alterado."),
        ])
    }

    #[test]
    fn test_json_report_shape() {
        let mut sink = JsonReportSink::new(Vec::new(), Some("atos".to_string()));
        for r in &results() {
            sink.accept(r).unwrap();
        }
        sink.finish().unwrap();

        let value: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(value["keyword"], "atos");
        assert_eq!(value["total"], 2);
        assert!(value["generated_at"].is_string());
        assert_eq!(value["results"][0]["type"], "Exoneração");
        assert_eq!(value["results"][0]["movements"][0]["registration_number"], "BM-324.917-2");
    }

    #[test]
    fn test_csv_rows_per_movement() {
        let mut sink = CsvMovementSink::new(Vec::new());
        for r in &results() {
            sink.accept(r).unwrap();
        }
        sink.finish().unwrap();

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("title,category,type,action_type,person"));
        assert!(lines[1].contains("Ariadna Miranda Valério Andrade"));
        assert!(lines[2].contains("Maria Fernanda Costa"));
        assert!(lines[3].starts_with("Comunicado,Publicação,Publicação,,,"));
    }
}
