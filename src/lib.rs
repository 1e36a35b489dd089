//! # Clerical RPA
//!
//! 三个互不相关的文书自动化任务：
//!
//! - `boletos`：把 PDF 博莱托上传给 Gemini 提取字段，逐行追加到 Excel
//! - `correct`：把 Excel 中的文本逐行发给 OpenAI 纠正拼写，写回同一行
//! - `challenge`：驱动浏览器，用 Excel 数据填写 rpachallenge.com 的表单
//!
//! ## 分层
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure::excel` - 表格读写
//! - `FormDriver` - 唯一的 page owner，提供点击、输入、截图能力
//!
//! ### ② 业务能力层（Clients / Services）
//! - `GeminiClient` - 文件上传和内容生成
//! - `LlmService` - 拼写纠正
//! - `boleto_extractor` - 回复清理与字段映射
//! - `ChallengeForm` - 表单字段定位
//!
//! ### ③ 流程层（Workflow）
//! - `BoletoFlow` / `CorrectionFlow` / `ChallengeFlow` - 单个条目的处理流程
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 加载条目、顺序处理、统计

pub mod browser;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{FormDriver, SheetTable};
pub use models::{BoletoRecord, ChallengeRow, CorrectionRow};
pub use orchestrator::{App, ProcessingStats, Task};
pub use workflow::{ItemCtx, ItemOutcome};
