//! # Error 模块
//!
//! 定义 dialogue-core 中使用的错误类型。
//!
//! 转换本身不会失败（见 [`crate::Converter::convert`]），这里的错误只出现在
//! 构建转换器（配置有误）和读写交换格式文档两个阶段。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 说话人正则无法编译
    #[error("说话人正则 '{pattern}' 无效 - {message}")]
    InvalidPattern { pattern: String, message: String },

    /// 引号对两侧必须各是一个字符
    #[error("引号对 '{open}' / '{close}' 无效：起始和结束符号都必须是单个字符")]
    InvalidQuotePair { open: String, close: String },

    /// 未知的引号预设
    #[error("未知的引号预设 '{name}'")]
    UnknownQuotePreset { name: String },
}

/// 交换格式错误
#[derive(Error, Debug)]
pub enum FormatError {
    /// JSON 序列化失败
    #[error("脚本序列化失败: {0}")]
    Serialize(#[source] serde_json::Error),

    /// JSON 反序列化失败
    #[error("脚本解析失败: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// dialogue-core 统一错误类型
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 交换格式错误
    #[error("格式错误: {0}")]
    Format(#[from] FormatError),
}

/// Result 类型别名
pub type ConvertResult<T> = Result<T, ConvertError>;
