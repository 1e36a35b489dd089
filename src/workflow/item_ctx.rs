//! 条目处理上下文
//!
//! 封装"我正在处理第几个条目"这一信息，仅用于日志

use std::fmt::Display;

/// 条目处理上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 条目序号（从1开始）
    pub index: usize,

    /// 条目总数
    pub total: usize,

    /// 条目标识（文件名、行号等）
    pub label: String,
}

impl ItemCtx {
    /// 创建新的条目上下文
    pub fn new(index: usize, total: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            total,
            label: label.into(),
        }
    }

    pub fn is_first(&self) -> bool {
        self.index == 1
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{} {}]", self.index, self.total, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::ItemCtx;

    #[test]
    fn display_prefix() {
        let ctx = ItemCtx::new(2, 5, "boleto2.pdf");
        assert_eq!(ctx.to_string(), "[2/5 boleto2.pdf]");
        assert!(!ctx.is_first());
    }
}
