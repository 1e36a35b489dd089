//! 表单驱动器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"导航 / 点击 / 输入 / 截图"的能力

use std::path::Path;

use chromiumoxide::element::Element;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use tracing::debug;

use crate::error::{AppError, AppResult, BrowserError};

/// 表单驱动器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 通过 XPath 定位元素
/// - 不认识 ChallengeRow
/// - 不处理业务流程
pub struct FormDriver {
    page: Page,
}

impl FormDriver {
    /// 创建新的表单驱动器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 导航到指定 URL（goto 会等待页面加载完成）
    pub async fn goto(&self, url: &str) -> AppResult<()> {
        self.page.goto(url).await.map_err(|source| {
            AppError::Browser(BrowserError::NavigationFailed {
                url: url.to_string(),
                source,
            })
        })?;
        debug!("已导航到: {}", url);
        Ok(())
    }

    async fn find(&self, xpath: &str) -> AppResult<Element> {
        self.page.find_xpath(xpath).await.map_err(|source| {
            AppError::Browser(BrowserError::ElementNotFound {
                xpath: xpath.to_string(),
                source,
            })
        })
    }

    /// 点击元素
    pub async fn click(&self, xpath: &str) -> AppResult<()> {
        let element = self.find(xpath).await?;
        element
            .click()
            .await
            .map_err(|source| action_failed(xpath, source))?;
        Ok(())
    }

    /// 聚焦输入框并键入文本
    pub async fn fill(&self, xpath: &str, value: &str) -> AppResult<()> {
        let element = self.find(xpath).await?;
        element
            .click()
            .await
            .map_err(|source| action_failed(xpath, source))?;
        element
            .type_str(value)
            .await
            .map_err(|source| action_failed(xpath, source))?;
        debug!("{} ← {}", xpath, value);
        Ok(())
    }

    /// 保存整页截图，自动创建父目录
    pub async fn screenshot(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::io(parent.display().to_string(), e))?;
        }

        let params = ScreenshotParams::builder().full_page(true).build();
        self.page
            .save_screenshot(params, path)
            .await
            .map_err(|source| {
                AppError::Browser(BrowserError::ScreenshotFailed {
                    path: path.display().to_string(),
                    source,
                })
            })?;
        Ok(())
    }
}

fn action_failed(xpath: &str, source: chromiumoxide::error::CdpError) -> AppError {
    AppError::Browser(BrowserError::ActionFailed {
        xpath: xpath.to_string(),
        source,
    })
}
