//! 博莱托处理流程 - 流程层
//!
//! 流程顺序：
//! 1. 上传 PDF 到 Gemini
//! 2. 请求提取字段
//! 3. 清理并解析 JSON
//! 4. 追加到输出表格（失败只记录日志）

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::clients::GeminiClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::excel;
use crate::models::{BoletoRecord, BOLETO_HEADERS};
use crate::services::boleto_extractor::{extract_record, EXTRACTION_PROMPT};
use crate::utils::logging::truncate_text;
use crate::workflow::{ItemCtx, ItemOutcome};

/// 博莱托处理流程
///
/// 上传、生成、解析失败会向上传播并终止整个运行；
/// 写表失败被吞掉，继续下一个文件。
pub struct BoletoFlow {
    gemini: GeminiClient,
    excel_path: PathBuf,
}

impl BoletoFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            gemini: GeminiClient::new(config),
            excel_path: PathBuf::from(&config.boleto_excel),
        }
    }

    pub async fn run(&self, pdf_path: &Path, ctx: &ItemCtx) -> AppResult<ItemOutcome> {
        let file_name = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let display_name = pdf_path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.clone());

        let uploaded = self.gemini.upload_file(pdf_path, &display_name).await?;
        info!(
            "{} 📤 文件已上传: {} - url: {}",
            ctx, uploaded.display_name, uploaded.uri
        );

        let text = self
            .gemini
            .generate_content(EXTRACTION_PROMPT, &uploaded)
            .await?;
        debug!("{} Gemini 原始回复: {}", ctx, text);

        let record = extract_record(&text, &file_name)?;
        info!(
            "{} ✓ 提取完成: {} | {} | {}",
            ctx,
            truncate_text(&record.beneficiary, 30),
            record.document_value,
            record.due_date
        );

        Ok(self.write_record(&record, ctx))
    }

    /// 追加一行到输出表格，失败时记录日志并返回 `WriteFailed`
    pub fn write_record(&self, record: &BoletoRecord, ctx: &ItemCtx) -> ItemOutcome {
        match excel::append_row(&self.excel_path, &BOLETO_HEADERS, record.to_row()) {
            Ok(()) => {
                info!(
                    "{} ✅ 文件 {} 的数据已写入 {}",
                    ctx,
                    record.source_file,
                    self.excel_path.display()
                );
                ItemOutcome::Done
            }
            Err(e) => {
                error!("{} ❌ 写入表格失败: {}", ctx, e);
                ItemOutcome::WriteFailed
            }
        }
    }
}
