pub mod connection;
pub mod launcher;

pub use connection::connect_to_browser_and_page;
pub use launcher::launch_browser;

use chromiumoxide::{Browser, Page};

use crate::config::Config;
use crate::error::AppResult;

/// 按配置获取浏览器：设置了调试端口则连接已运行的浏览器，否则启动新浏览器
pub async fn open_browser(config: &Config) -> AppResult<(Browser, Page)> {
    match config.browser_debug_port {
        Some(port) => connect_to_browser_and_page(port).await,
        None => launch_browser(config).await,
    }
}
