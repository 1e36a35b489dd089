//! RPA Challenge 表单服务 - 业务能力层
//!
//! 只负责"把一行数据填进表单并提交"，不关心遍历和截图

use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::FormDriver;
use crate::models::challenge::{self, ChallengeRow};

/// 开始按钮（只在第一行前点击一次）
pub const START_BUTTON: &str = r#"//button[text()="Start"]"#;

/// 提交按钮
pub const SUBMIT_BUTTON: &str = r#"//input[@type="submit"]"#;

/// 表格列名对应的输入框 XPath
///
/// 页面每轮会打乱输入框顺序，因此按 `ng-reflect-name` 定位而不是按位置
pub fn field_xpath(column: &str) -> Option<&'static str> {
    let xpath = match column {
        challenge::FIRST_NAME => r#"//input[@ng-reflect-name="labelFirstName"]"#,
        challenge::LAST_NAME => r#"//input[@ng-reflect-name="labelLastName"]"#,
        challenge::COMPANY_NAME => r#"//input[@ng-reflect-name="labelCompanyName"]"#,
        challenge::ROLE => r#"//input[@ng-reflect-name="labelRole"]"#,
        challenge::ADDRESS => r#"//input[@ng-reflect-name="labelAddress"]"#,
        challenge::EMAIL => r#"//input[@ng-reflect-name="labelEmail"]"#,
        challenge::PHONE_NUMBER => r#"//input[@ng-reflect-name="labelPhone"]"#,
        _ => return None,
    };
    Some(xpath)
}

/// 表单服务
pub struct ChallengeForm;

impl ChallengeForm {
    /// 点击开始按钮
    pub async fn start(&self, driver: &FormDriver) -> AppResult<()> {
        debug!("点击 Start 按钮");
        driver.click(START_BUTTON).await
    }

    /// 填写一行数据并提交
    pub async fn submit_row(&self, driver: &FormDriver, row: &ChallengeRow) -> AppResult<()> {
        for (column, value) in row.fields() {
            if let Some(xpath) = field_xpath(column) {
                driver.fill(xpath, value).await?;
            }
        }
        driver.click(SUBMIT_BUTTON).await
    }
}
