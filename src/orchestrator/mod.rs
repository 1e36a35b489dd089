//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 负责加载条目、逐条调度流程、持有资源并输出统计。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<条目>)
//!     ↓
//! workflow::*Flow (处理单个条目)
//!     ↓
//! services / clients (能力层：提取 / 纠正 / 表单)
//!     ↓
//! infrastructure (基础设施：excel、FormDriver)
//! ```
//!
//! 所有任务都是严格顺序执行：一次只处理一个条目。

pub mod batch_processor;

pub use batch_processor::{App, ProcessingStats, Task};
