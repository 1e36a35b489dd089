//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、按任务准备资源（浏览器只在表单任务中启动）
//! 2. **加载条目**：PDF 文件列表或表格数据行
//! 3. **顺序处理**：逐条委托给对应的流程
//! 4. **全局统计**：汇总成功、跳过、失败数量
//!
//! 失败语义：
//! - 博莱托：写表失败计入失败并继续，其它错误终止运行
//! - 纠正：API 失败跳过该行，写表错误终止运行
//! - 表单：任何错误终止运行

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{excel, FormDriver};
use crate::models::{list_boleto_files, ChallengeRow, CorrectionRow};
use crate::utils::logging;
use crate::workflow::{BoletoFlow, ChallengeFlow, CorrectionFlow, ItemCtx, ItemOutcome};

/// 要执行的任务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// 从 PDF 博莱托提取字段并追加到表格
    Boletos,
    /// 纠正表格中文本的拼写
    Correct,
    /// 根据表格数据填写 RPA Challenge 表单
    Challenge,
}

impl Task {
    pub fn name(self) -> &'static str {
        match self {
            Task::Boletos => "博莱托数据提取 (Gemini)",
            Task::Correct => "拼写纠正 (OpenAI)",
            Task::Challenge => "RPA Challenge 表单填写",
        }
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ProcessingStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Done => self.success += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::WriteFailed => self.failed += 1,
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    task: Task,
}

impl App {
    /// 初始化应用，提前检查任务所需的 API Key
    pub fn initialize(config: Config, task: Task) -> Result<Self> {
        match task {
            Task::Boletos => {
                config.require_gemini_key()?;
            }
            Task::Correct => {
                config.require_openai_key()?;
            }
            Task::Challenge => {}
        }

        Ok(Self { config, task })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let stats = match self.task {
            Task::Boletos => self.run_boletos().await?,
            Task::Correct => self.run_correction().await?,
            Task::Challenge => self.run_challenge().await?,
        };

        logging::print_final_stats(stats.success, stats.skipped, stats.failed, stats.total);
        Ok(stats)
    }

    async fn run_boletos(&self) -> Result<ProcessingStats> {
        logging::log_startup(self.task.name(), &self.config.boleto_folder);

        let files = list_boleto_files(&self.config.boleto_folder).await?;
        if files.is_empty() {
            warn!("⚠️ 没有找到待处理的 PDF 文件，程序结束");
            return Ok(ProcessingStats::default());
        }
        logging::log_items_loaded(files.len());

        let flow = BoletoFlow::new(&self.config);
        let mut stats = ProcessingStats::new(files.len());

        for (idx, path) in files.iter().enumerate() {
            let label = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let ctx = ItemCtx::new(idx + 1, files.len(), label);

            let outcome = flow
                .run(path, &ctx)
                .await
                .with_context(|| format!("{} 处理失败", ctx))?;
            stats.record(outcome);
        }

        Ok(stats)
    }

    async fn run_correction(&self) -> Result<ProcessingStats> {
        logging::log_startup(self.task.name(), &self.config.correction_excel);

        let table = excel::read_sheet(
            Path::new(&self.config.correction_excel),
            Some(&self.config.correction_sheet),
        )?;
        let rows = CorrectionRow::from_table(&table, &self.config.correction_input_column)?;
        if rows.is_empty() {
            warn!("⚠️ 工作表 {} 没有数据行，程序结束", self.config.correction_sheet);
            return Ok(ProcessingStats::default());
        }
        logging::log_items_loaded(rows.len());

        let flow = CorrectionFlow::new(&self.config);
        let mut stats = ProcessingStats::new(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            // 表格行号：表头占第 1 行
            let ctx = ItemCtx::new(idx + 1, rows.len(), format!("行 {}", row.row_index + 2));
            let outcome = flow.run(row, &ctx).await?;
            stats.record(outcome);
        }

        Ok(stats)
    }

    async fn run_challenge(&self) -> Result<ProcessingStats> {
        logging::log_startup(self.task.name(), &self.config.challenge_excel);

        let table = excel::read_sheet(Path::new(&self.config.challenge_excel), None)?;
        let rows = ChallengeRow::from_table(&table)?;
        if rows.is_empty() {
            warn!("⚠️ 表格 {} 没有数据行，程序结束", self.config.challenge_excel);
            return Ok(ProcessingStats::default());
        }
        logging::log_items_loaded(rows.len());

        let (mut browser, page) = browser::open_browser(&self.config).await?;
        let driver = FormDriver::new(page);
        driver.goto(&self.config.challenge_url).await?;
        info!("🌐 已打开: {}", self.config.challenge_url);

        let flow = ChallengeFlow::new();
        let mut stats = ProcessingStats::new(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let ctx = ItemCtx::new(idx + 1, rows.len(), row.display_name());
            let outcome = flow.run(&driver, row, &ctx).await?;
            stats.record(outcome);
        }

        let screenshot = Path::new(&self.config.screenshot_path);
        driver.screenshot(screenshot).await?;
        info!("📸 截图已保存: {}", screenshot.display());

        // 连接到外部浏览器时不关闭它
        if self.config.browser_debug_port.is_none() {
            browser.close().await.context("关闭浏览器失败")?;
            if let Err(e) = browser.wait().await {
                warn!("⚠️ 等待浏览器进程退出失败: {}", e);
            }
        }

        Ok(stats)
    }
}
