//! 流程层
//!
//! 每个任务一个流程，只定义"一个条目"的完整处理步骤；
//! 遍历、统计和资源持有交给编排层。

pub mod boleto_flow;
pub mod challenge_flow;
pub mod correction_flow;
pub mod item_ctx;

pub use boleto_flow::BoletoFlow;
pub use challenge_flow::ChallengeFlow;
pub use correction_flow::CorrectionFlow;
pub use item_ctx::ItemCtx;

/// 单个条目的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// 处理成功
    Done,
    /// 跳过（API 调用失败，继续下一条）
    Skipped,
    /// 结果写入表格失败（已记录日志，继续下一条）
    WriteFailed,
}
