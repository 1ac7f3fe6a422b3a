//! # Dialogue Core
//!
//! 对话脚本转换的核心库：把「旁白 + `说话人: 台词`」交替的纯文本，转换为
//! 可序列化为游戏脚本交换格式的有序动作序列。
//!
//! ## 架构概述
//!
//! `dialogue-core` 是纯逻辑核心，不做任何 IO。配置由外部加载后注入：
//!
//! ```text
//! 原始文本 ──► Segmenter ──(每行)──► Classifier
//!                 │
//!                 ├─(每段)──► strip_quotes
//!                 ▼
//!            Vec<Action> ──► ConversionResult::assemble ──► JSON
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! use dialogue_core::{ConvertOptions, Converter, ConverterConfig};
//!
//! let converter = Converter::new(&ConverterConfig::default())?;
//! let options = ConvertOptions::default()
//!     .with_quote_pairs(converter.presets().all());
//! let json = converter.convert_to_json("兰: 「你好」", &options)?;
//! ```
//!
//! ## 模块结构
//!
//! - [`quote`]：引号对、预设与去引号
//! - [`characters`]：说话人名 → 角色 ID
//! - [`classifier`]：单行分类
//! - [`segmenter`]：动作分段状态机
//! - [`script`]：交换格式数据模型
//! - [`config`]：配置数据模型
//! - [`converter`]：转换入口
//! - [`error`]：错误类型定义

pub mod characters;
pub mod classifier;
pub mod config;
pub mod converter;
pub mod error;
pub mod quote;
pub mod script;
pub mod segmenter;

// 重导出核心类型
pub use characters::CharacterDirectory;
pub use classifier::{Classify, SpeakerLine, SpeakerPattern};
pub use config::ConverterConfig;
pub use converter::{ConvertOptions, Converter, PREVIEW_CHARS, convert_once};
pub use error::{ConfigError, ConvertError, ConvertResult, FormatError};
pub use quote::{QuotePair, QuotePairSet, QuotePresets, strip_quotes};
pub use script::{Action, ActionKind, ConversionResult, ScriptMetadata};
pub use segmenter::Segmenter;
