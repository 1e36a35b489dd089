//! 拼写纠正流程 - 流程层
//!
//! 流程顺序：调用 LLM → 失败则跳过 → 成功则写回同一行的输出列

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::excel;
use crate::models::CorrectionRow;
use crate::services::{CorrectionReply, LlmService};
use crate::utils::logging::truncate_text;
use crate::workflow::{ItemCtx, ItemOutcome};

/// 拼写纠正流程
pub struct CorrectionFlow {
    llm_service: LlmService,
    excel_path: PathBuf,
    sheet: String,
    output_column: String,
}

impl CorrectionFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            llm_service: LlmService::new(config),
            excel_path: PathBuf::from(&config.correction_excel),
            sheet: config.correction_sheet.clone(),
            output_column: config.correction_output_column.clone(),
        }
    }

    pub async fn run(&self, row: &CorrectionRow, ctx: &ItemCtx) -> AppResult<ItemOutcome> {
        info!("{} 📝 输入文本: {}", ctx, truncate_text(&row.input, 80));

        let corrected = match self.llm_service.correct_text(&row.input).await {
            CorrectionReply::Corrected(text) => text,
            CorrectionReply::Failed(message) => {
                warn!("{} ⚠️ {}，跳过该行", ctx, message);
                return Ok(ItemOutcome::Skipped);
            }
        };
        info!("{} ✓ 纠正结果: {}", ctx, truncate_text(&corrected, 80));

        excel::update_cell(
            &self.excel_path,
            &self.sheet,
            row.row_index,
            &self.output_column,
            corrected,
        )?;

        Ok(ItemOutcome::Done)
    }
}
