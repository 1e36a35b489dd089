//! 表单填写流程 - 流程层
//!
//! 第一行前点击 Start，然后填写并提交。任何失败都会终止整个运行。

use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::FormDriver;
use crate::models::ChallengeRow;
use crate::services::ChallengeForm;
use crate::workflow::{ItemCtx, ItemOutcome};

/// 表单填写流程
///
/// - 不持有任何资源（page 由编排层的 FormDriver 持有）
pub struct ChallengeFlow {
    form: ChallengeForm,
}

impl ChallengeFlow {
    pub fn new() -> Self {
        Self {
            form: ChallengeForm,
        }
    }

    pub async fn run(
        &self,
        driver: &FormDriver,
        row: &ChallengeRow,
        ctx: &ItemCtx,
    ) -> AppResult<ItemOutcome> {
        if ctx.is_first() {
            self.form.start(driver).await?;
            info!("▶️ 已点击 Start");
        }

        self.form.submit_row(driver, row).await?;
        info!("{} ✅ 已提交: {}", ctx, row.display_name());

        Ok(ItemOutcome::Done)
    }
}

impl Default for ChallengeFlow {
    fn default() -> Self {
        Self::new()
    }
}
