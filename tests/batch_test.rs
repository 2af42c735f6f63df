use anyhow::Result;
use dom_extract::adapters::{input, output};
use dom_extract::{BatchOptions, BatchRunner, DomError, ExtractionEngine};
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

const DOCS: &str = r#"[
  {"title": "Comunicado", "content": "Horário de atendimento alterado.", "url": "https://dom-web.pbh.gov.br/1"},
  {"title": "Nomeação", "content": "Nomear Maria Fernanda Costa para o cargo de Assessora Técnica"},
  {"title": "ATOS DO PREFEITO", "content": "Exonera Ariadna Miranda Valério Andrade, BM-324.917-2, do cargo em comissão DAM 3, código nº DAM.003, da chefia da Secretaria Municipal de Administração Regional Venda Nova."},
  {"title": "Extrato de Contrato", "content": "Contratada: Construtora Horizonte Ltda. Valor R$ 2.500.000,00. Objeto: reforma da escola."}
]"#;

fn write_docs() -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(DOCS.as_bytes())?;
    Ok(file)
}

#[test]
fn test_json_report_from_file() -> Result<()> {
    let file = write_docs()?;
    let docs = input::load_documents(file.path())?;
    let engine = ExtractionEngine::with_defaults()?;

    let mut sink = output::JsonReportSink::new(Vec::new(), None);
    let summary = BatchRunner::new(&engine, BatchOptions::default()).run(&docs, &mut sink)?;
    assert_eq!(summary.total_documents, 4);
    assert_eq!(summary.emitted_results, 4);
    assert_eq!(summary.movements, 2);

    let report: serde_json::Value = serde_json::from_slice(&sink.into_inner())?;
    assert!(report.get("keyword").is_none());
    let titles: Vec<&str> = report["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["ATOS DO PREFEITO", "Nomeação", "Comunicado", "Extrato de Contrato"]
    );
    assert_eq!(report["results"][3]["details"]["kind"], "contract");
    assert_eq!(report["results"][3]["details"]["value"], "R$ 2.500.000,00");
    assert_eq!(report["results"][2]["url"], "https://dom-web.pbh.gov.br/1");
    Ok(())
}

#[test]
fn test_csv_output_with_threshold() -> Result<()> {
    let file = write_docs()?;
    let docs = input::load_documents(file.path())?;
    let engine = ExtractionEngine::with_defaults()?;
    let options = BatchOptions {
        keyword: Some("cargo".to_string()),
        min_score: Some(80),
    };

    let dir = tempdir()?;
    let path = dir.path().join("movements.csv");
    let mut sink = output::CsvMovementSink::new(fs::File::create(&path)?);
    let summary = BatchRunner::new(&engine, options).run(&docs, &mut sink)?;
    drop(sink);

    assert_eq!(summary.matched_documents, 2);
    assert_eq!(summary.emitted_results, 1);

    let mut reader = csv::Reader::from_path(&path)?;
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][4], "Ariadna Miranda Valério Andrade");
    assert_eq!(&rows[0][5], "BM-324.917-2");
    Ok(())
}

#[test]
fn test_malformed_document_reports_index() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(br#"[{"title": "ok", "content": "ok"}, {"content": "sem titulo"}]"#)?;

    match input::load_documents(file.path()) {
        Err(DomError::MalformedInput { field, .. }) => assert_eq!(field, "documents[1].title"),
        other => panic!("expected MalformedInput, got {:?}", other),
    }
    Ok(())
}
