//! 命令行参数

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::orchestrator::Task;

#[derive(Debug, Parser)]
#[command(name = "clerical-rpa", version, about = "博莱托提取 / 拼写纠正 / RPA Challenge 表单填写")]
pub struct Cli {
    /// TOML 配置文件（缺省时读取环境变量 RPA_CONFIG）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 从 PDF 博莱托中提取字段并追加到 Excel
    Boletos {
        /// PDF 所在目录
        #[arg(long)]
        folder: Option<String>,
        /// 输出 Excel 文件
        #[arg(long)]
        excel: Option<String>,
    },
    /// 调用 OpenAI 纠正 Excel 中的文本
    Correct {
        /// 输入/输出 Excel 文件
        #[arg(long)]
        excel: Option<String>,
        /// 工作表名
        #[arg(long)]
        sheet: Option<String>,
    },
    /// 按 Excel 数据填写 RPA Challenge 表单
    Challenge {
        /// 数据 Excel 文件
        #[arg(long)]
        excel: Option<String>,
        /// 表单页面 URL
        #[arg(long)]
        url: Option<String>,
        /// 连接已运行浏览器的远程调试端口
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// 把命令行参数覆盖到配置上，返回要执行的任务
    pub fn apply(&self, config: &mut Config) -> Task {
        if self.verbose {
            config.verbose_logging = true;
        }

        match &self.command {
            Command::Boletos { folder, excel } => {
                override_with(&mut config.boleto_folder, folder);
                override_with(&mut config.boleto_excel, excel);
                Task::Boletos
            }
            Command::Correct { excel, sheet } => {
                override_with(&mut config.correction_excel, excel);
                override_with(&mut config.correction_sheet, sheet);
                Task::Correct
            }
            Command::Challenge { excel, url, port } => {
                override_with(&mut config.challenge_excel, excel);
                override_with(&mut config.challenge_url, url);
                if port.is_some() {
                    config.browser_debug_port = *port;
                }
                Task::Challenge
            }
        }
    }
}

fn override_with(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommand_overrides_config() {
        let cli = Cli::parse_from([
            "clerical-rpa",
            "-v",
            "correct",
            "--excel",
            "textos.xlsx",
            "--sheet",
            "Plan2",
        ]);
        let mut config = Config::default();

        let task = cli.apply(&mut config);

        assert_eq!(task, Task::Correct);
        assert!(config.verbose_logging);
        assert_eq!(config.correction_excel, "textos.xlsx");
        assert_eq!(config.correction_sheet, "Plan2");
        assert_eq!(config.boleto_excel, "output.xlsx");
    }

    #[test]
    fn challenge_port_selects_attach_mode() {
        let cli = Cli::parse_from(["clerical-rpa", "challenge", "--port", "9222"]);
        let mut config = Config::default();

        assert_eq!(cli.apply(&mut config), Task::Challenge);
        assert_eq!(config.browser_debug_port, Some(9222));
    }
}
