use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 表格读写错误
    #[error("表格错误: {0}")]
    Excel(#[from] ExcelError),
    /// Gemini API 错误
    #[error("Gemini错误: {0}")]
    Gemini(#[from] GeminiError),
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 API Key
    #[error("环境变量 {var_name} 未设置")]
    MissingApiKey { var_name: String },
    /// TOML 配置文件解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 表格错误
#[derive(Debug, Error)]
pub enum ExcelError {
    /// 打开文件失败
    #[error("无法打开表格 {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: calamine::Error,
    },
    /// 工作表不存在
    #[error("表格 {path} 中不存在工作表 '{sheet}'")]
    SheetNotFound { path: String, sheet: String },
    /// 列不存在
    #[error("工作表 '{sheet}' 中不存在列 '{column}'")]
    MissingColumn { sheet: String, column: String },
    /// 行号超出范围
    #[error("行号 {row} 超出范围 (共 {len} 行)")]
    RowOutOfRange { row: usize, len: usize },
    /// 写入失败
    #[error("写入表格失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

/// Gemini API 错误
#[derive(Debug, Error)]
pub enum GeminiError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 非 2xx 响应
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 上传会话未返回上传地址
    #[error("上传会话未返回 x-goog-upload-url")]
    MissingUploadUrl,
    /// 返回结果中没有文本
    #[error("Gemini返回结果为空")]
    EmptyResponse,
    /// 返回的文本不是合法 JSON
    #[error("JSON解析失败: {source} (原文: {text})")]
    MalformedJson {
        text: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {message}")]
    LaunchFailed { message: String },
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 元素未找到
    #[error("未找到元素 {xpath}: {source}")]
    ElementNotFound {
        xpath: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 元素操作失败（点击、输入）
    #[error("操作元素 {xpath} 失败: {source}")]
    ActionFailed {
        xpath: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 截图失败
    #[error("截图保存到 {path} 失败: {source}")]
    ScreenshotFailed {
        path: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件操作错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// 创建缺少 API Key 错误
    pub fn missing_api_key(var_name: impl Into<String>) -> Self {
        AppError::Config(ConfigError::MissingApiKey {
            var_name: var_name.into(),
        })
    }

    /// 创建列不存在错误
    pub fn missing_column(sheet: impl Into<String>, column: impl Into<String>) -> Self {
        AppError::Excel(ExcelError::MissingColumn {
            sheet: sheet.into(),
            column: column.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
