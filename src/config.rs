use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 博莱托提取 (Gemini) ---
    pub gemini_api_key: String,
    pub gemini_api_base_url: String,
    pub gemini_model_name: String,
    /// 存放 PDF 博莱托的目录
    pub boleto_folder: String,
    /// 追加结果的 Excel 文件
    pub boleto_excel: String,

    // --- 拼写纠正 (OpenAI) ---
    pub openai_api_key: String,
    pub openai_api_base_url: String,
    pub openai_model_name: String,
    pub correction_excel: String,
    pub correction_sheet: String,
    pub correction_input_column: String,
    pub correction_output_column: String,

    // --- RPA Challenge 表单 ---
    pub challenge_excel: String,
    pub challenge_url: String,
    /// 设置后连接已运行的浏览器，否则启动新浏览器
    pub browser_debug_port: Option<u16>,
    pub chrome_executable: Option<String>,
    pub headless: bool,
    pub screenshot_path: String,

    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model_name: "gemini-1.5-flash".to_string(),
            boleto_folder: "./arquivos".to_string(),
            boleto_excel: "output.xlsx".to_string(),
            openai_api_key: String::new(),
            openai_api_base_url: "https://api.openai.com/v1".to_string(),
            openai_model_name: "gpt-3.5-turbo".to_string(),
            correction_excel: "Exemplo1.xlsx".to_string(),
            correction_sheet: "Plan1".to_string(),
            correction_input_column: "Input".to_string(),
            correction_output_column: "Output".to_string(),
            challenge_excel: "challenge.xlsx".to_string(),
            challenge_url: "https://rpachallenge.com/".to_string(),
            browser_debug_port: None,
            chrome_executable: None,
            headless: false,
            screenshot_path: "screenshots/challenge-completed.png".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从进程环境加载配置
    ///
    /// `.env` 文件存在时先载入；配置文件路径取 `config_path`，否则取 `RPA_CONFIG`。
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("已加载 {}", path.display());
        }

        let file_path = config_path
            .map(|p| p.to_path_buf())
            .or_else(|| std::env::var("RPA_CONFIG").ok().map(Into::into));

        let base = match file_path {
            Some(path) => Self::from_toml_file(&path)?,
            None => Self::default(),
        };

        Ok(base.overlay_env(|name| std::env::var(name).ok()))
    }

    /// 仅使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().overlay_env(|name| std::env::var(name).ok())
    }

    /// 读取 TOML 配置文件，缺失的键保留默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::io(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|source| {
            AppError::Config(ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖配置项，变量名为字段名的大写形式
    pub fn overlay_env<F>(self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |name: &str, current: String| var(name).unwrap_or(current);
        let parsed = |name: &str| {
            var(name).and_then(|v| match v.parse::<bool>() {
                Ok(b) => Some(b),
                Err(_) => {
                    warn!("环境变量 {} 的值 '{}' 不是布尔值，已忽略", name, v);
                    None
                }
            })
        };
        let port = var("BROWSER_DEBUG_PORT").and_then(|v| match v.parse::<u16>() {
            Ok(p) => Some(p),
            Err(_) => {
                warn!("环境变量 BROWSER_DEBUG_PORT 的值 '{}' 不是端口号，已忽略", v);
                None
            }
        });

        Self {
            gemini_api_key: string("GEMINI_API_KEY", self.gemini_api_key),
            gemini_api_base_url: string("GEMINI_API_BASE_URL", self.gemini_api_base_url),
            gemini_model_name: string("GEMINI_MODEL_NAME", self.gemini_model_name),
            boleto_folder: string("BOLETO_FOLDER", self.boleto_folder),
            boleto_excel: string("BOLETO_EXCEL", self.boleto_excel),
            openai_api_key: string("OPENAI_API_KEY", self.openai_api_key),
            openai_api_base_url: string("OPENAI_API_BASE_URL", self.openai_api_base_url),
            openai_model_name: string("OPENAI_MODEL_NAME", self.openai_model_name),
            correction_excel: string("CORRECTION_EXCEL", self.correction_excel),
            correction_sheet: string("CORRECTION_SHEET", self.correction_sheet),
            correction_input_column: string("CORRECTION_INPUT_COLUMN", self.correction_input_column),
            correction_output_column: string(
                "CORRECTION_OUTPUT_COLUMN",
                self.correction_output_column,
            ),
            challenge_excel: string("CHALLENGE_EXCEL", self.challenge_excel),
            challenge_url: string("CHALLENGE_URL", self.challenge_url),
            browser_debug_port: port.or(self.browser_debug_port),
            chrome_executable: var("CHROME_EXECUTABLE").or(self.chrome_executable),
            headless: parsed("HEADLESS").unwrap_or(self.headless),
            screenshot_path: string("SCREENSHOT_PATH", self.screenshot_path),
            verbose_logging: parsed("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
        }
    }

    /// 博莱托提取需要 Gemini API Key
    pub fn require_gemini_key(&self) -> AppResult<&str> {
        non_empty(&self.gemini_api_key, "GEMINI_API_KEY")
    }

    /// 拼写纠正需要 OpenAI API Key
    pub fn require_openai_key(&self) -> AppResult<&str> {
        non_empty(&self.openai_api_key, "OPENAI_API_KEY")
    }
}

fn non_empty<'a>(value: &'a str, var_name: &str) -> AppResult<&'a str> {
    if value.trim().is_empty() {
        Err(AppError::missing_api_key(var_name))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_hardcoded_paths() {
        let config = Config::default();
        assert_eq!(config.gemini_model_name, "gemini-1.5-flash");
        assert_eq!(config.boleto_folder, "./arquivos");
        assert_eq!(config.correction_sheet, "Plan1");
        assert_eq!(config.correction_output_column, "Output");
        assert_eq!(config.challenge_url, "https://rpachallenge.com/");
        assert!(config.browser_debug_port.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            boleto_folder = "pdfs"
            headless = true
            browser_debug_port = 9222
            "#,
        )
        .unwrap();

        assert_eq!(config.boleto_folder, "pdfs");
        assert!(config.headless);
        assert_eq!(config.browser_debug_port, Some(9222));
        assert_eq!(config.openai_model_name, "gpt-3.5-turbo");
    }

    #[test]
    fn env_overrides_file_values() {
        let config = Config::from_toml_str(r#"correction_sheet = "Folha""#)
            .unwrap()
            .overlay_env(lookup(&[
                ("CORRECTION_SHEET", "Plan2"),
                ("OPENAI_API_KEY", "sk-test"),
                ("BROWSER_DEBUG_PORT", "9333"),
            ]));

        assert_eq!(config.correction_sheet, "Plan2");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.browser_debug_port, Some(9333));
    }

    #[test]
    fn unparsable_env_values_are_ignored() {
        let config = Config::default().overlay_env(lookup(&[
            ("HEADLESS", "sim"),
            ("BROWSER_DEBUG_PORT", "porta"),
        ]));

        assert!(!config.headless);
        assert!(config.browser_debug_port.is_none());
    }

    #[test]
    fn missing_keys_are_reported() {
        let config = Config::default();
        let err = config.require_gemini_key().unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        let config = Config::default().overlay_env(lookup(&[("OPENAI_API_KEY", "sk-1")]));
        assert_eq!(config.require_openai_key().unwrap(), "sk-1");
    }
}
