/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则按 `verbose` 选择默认级别
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "clerical_rpa=debug,info"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 测试中可能重复初始化，忽略错误
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `task`: 任务名称
/// - `source`: 输入来源（目录或表格）
pub fn log_startup(task: &str, source: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", task);
    info!("📂 输入: {}", source);
    info!(
        "🕐 开始时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录待处理条目数量
pub fn log_items_loaded(total: usize) {
    info!("✓ 找到 {} 个待处理条目", total);
    info!("💡 逐条顺序处理\n");
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `skipped`: 跳过数量
/// - `failed`: 失败数量（仅写入失败，继续处理）
/// - `total`: 总数
pub fn print_final_stats(success: usize, skipped: usize, failed: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("⏭️ 跳过: {}", skipped);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
