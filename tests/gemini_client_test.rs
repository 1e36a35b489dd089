use clerical_rpa::clients::GeminiClient;
use clerical_rpa::error::{AppError, GeminiError};
use clerical_rpa::infrastructure::excel::read_sheet;
use clerical_rpa::workflow::BoletoFlow;
use clerical_rpa::{Config, ItemCtx, ItemOutcome};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const EXTRACTED: &str = "```json\n{\"Beneficiário\": \"Loja Exemplo LTDA\", \"Valor do Documento\": \"R$ 150,00\", \"CPF\": \"123.456.789-00\"}\n```";

fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        gemini_api_base_url: server.base_url(),
        boleto_excel: dir.path().join("output.xlsx").display().to_string(),
        ..Config::default()
    }
}

async fn mock_upload(server: &MockServer) {
    let session_url = server.url("/upload-session/1");

    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload/v1beta/files")
                .header("x-goog-api-key", "test-key")
                .header("x-goog-upload-command", "start")
                .header("x-goog-upload-header-content-type", "application/pdf")
                .body_contains("boleto1");
            then.status(200).header("x-goog-upload-url", session_url.as_str());
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload-session/1")
                .header("x-goog-upload-command", "upload, finalize");
            then.status(200).json_body(json!({
                "file": {
                    "name": "files/abc123",
                    "displayName": "boleto1",
                    "mimeType": "application/pdf",
                    "uri": "https://example.test/v1beta/files/abc123"
                }
            }));
        })
        .await;
}

async fn mock_generate(server: &MockServer, text: &str) {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-flash:generateContent")
                .body_contains("https://example.test/v1beta/files/abc123")
                .body_contains("Nosso Número");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": text }], "role": "model" }
                }]
            }));
        })
        .await;
}

#[tokio::test]
async fn upload_then_generate() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let dir = TempDir::new()?;
    let pdf = dir.path().join("boleto1.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 fake")?;
    mock_upload(&server).await;
    mock_generate(&server, "{\"CPF\": \"1\"}").await;

    let client = GeminiClient::new(&test_config(&server, &dir));
    let uploaded = client.upload_file(&pdf, "boleto1").await?;
    assert_eq!(uploaded.name, "files/abc123");
    assert_eq!(uploaded.display_name, "boleto1");

    let text = client
        .generate_content(clerical_rpa::services::boleto_extractor::EXTRACTION_PROMPT, &uploaded)
        .await?;
    assert_eq!(text, "{\"CPF\": \"1\"}");
    Ok(())
}

#[tokio::test]
async fn bad_status_carries_body() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let dir = TempDir::new()?;
    let pdf = dir.path().join("boleto1.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 fake")?;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload/v1beta/files");
            then.status(403).body("API key not valid");
        })
        .await;

    let client = GeminiClient::new(&test_config(&server, &dir));
    let err = client.upload_file(&pdf, "boleto1").await.unwrap_err();

    match err {
        AppError::Gemini(GeminiError::BadStatus { status, body, .. }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "API key not valid");
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn boleto_flow_appends_one_row() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let dir = TempDir::new()?;
    let pdf = dir.path().join("boleto1.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 fake")?;
    mock_upload(&server).await;
    mock_generate(&server, EXTRACTED).await;

    let config = test_config(&server, &dir);
    let flow = BoletoFlow::new(&config);
    let outcome = flow.run(&pdf, &ItemCtx::new(1, 1, "boleto1.pdf")).await?;

    assert_eq!(outcome, ItemOutcome::Done);
    let table = read_sheet(std::path::Path::new(&config.boleto_excel), None)?;
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.cell(0, 0), "Loja Exemplo LTDA");
    assert_eq!(table.cell(0, 3), "R$ 150,00");
    assert_eq!(table.cell(0, 7), "123.456.789-00");
    assert_eq!(table.cell(0, 9), "boleto1.pdf");
    Ok(())
}

#[tokio::test]
async fn boleto_flow_swallows_write_failure() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let dir = TempDir::new()?;
    let pdf = dir.path().join("boleto1.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 fake")?;
    // 输出路径是一个目录，写入必然失败
    let blocked = dir.path().join("blocked.xlsx");
    std::fs::create_dir(&blocked)?;
    mock_upload(&server).await;
    mock_generate(&server, EXTRACTED).await;

    let config = Config {
        boleto_excel: blocked.display().to_string(),
        ..test_config(&server, &dir)
    };
    let flow = BoletoFlow::new(&config);
    let outcome = flow.run(&pdf, &ItemCtx::new(1, 1, "boleto1.pdf")).await?;

    assert_eq!(outcome, ItemOutcome::WriteFailed);
    Ok(())
}

#[tokio::test]
async fn boleto_flow_propagates_malformed_json() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let dir = TempDir::new()?;
    let pdf = dir.path().join("boleto1.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 fake")?;
    mock_upload(&server).await;
    mock_generate(&server, "Não consegui ler o boleto.").await;

    let config = test_config(&server, &dir);
    let flow = BoletoFlow::new(&config);
    let err = flow
        .run(&pdf, &ItemCtx::new(1, 1, "boleto1.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Gemini(GeminiError::MalformedJson { .. })));
    assert!(!std::path::Path::new(&config.boleto_excel).exists());
    Ok(())
}
