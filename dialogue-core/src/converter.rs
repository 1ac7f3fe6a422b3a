//! # Converter 模块
//!
//! 对外的转换入口：持有由配置构建的不可变状态，每次调用独立完成
//! 分段 → 去引号 → 组装。
//!
//! ```text
//! 原始文本 → [Segmenter + Classifier] → Vec<Action> → [assemble] → ConversionResult
//! ```
//!
//! `Converter` 构建后只读，可在多个线程间共享；每次 [`Converter::convert`]
//! 都使用自己的累积状态。

use crate::characters::CharacterDirectory;
use crate::classifier::SpeakerPattern;
use crate::config::ConverterConfig;
use crate::error::{ConfigError, ConvertResult, FormatError};
use crate::quote::{QuotePairSet, QuotePresets};
use crate::script::{ConversionResult, ScriptMetadata};
use crate::segmenter::Segmenter;

/// 预览时截取的字符数
pub const PREVIEW_CHARS: usize = 500;

/// 单次转换的选项
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// 旁白名；为空或未设置时使用配置中的默认值
    pub narrator: Option<String>,
    /// 本次生效的引号对
    pub quote_pairs: QuotePairSet,
    /// 顶层元数据
    pub metadata: ScriptMetadata,
}

impl ConvertOptions {
    pub fn with_narrator(mut self, narrator: impl Into<String>) -> Self {
        self.narrator = Some(narrator.into());
        self
    }

    pub fn with_quote_pairs(mut self, quote_pairs: QuotePairSet) -> Self {
        self.quote_pairs = quote_pairs;
        self
    }

    pub fn with_metadata(mut self, metadata: ScriptMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// 文本转换器
#[derive(Debug, Clone)]
pub struct Converter {
    pattern: SpeakerPattern,
    directory: CharacterDirectory,
    narrator: String,
    known_pairs: QuotePairSet,
    presets: QuotePresets,
    /// 配置警告（非致命）
    warnings: Vec<String>,
}

impl Converter {
    /// 由配置构建转换器
    pub fn new(config: &ConverterConfig) -> Result<Self, ConfigError> {
        let pattern = SpeakerPattern::new(
            &config.patterns.speaker_pattern,
            config.parsing.max_speaker_name_length,
        )?;

        let mut warnings = Vec::new();
        if let Some(defect) = pattern.defect() {
            tracing::warn!("{defect}，所有行都将按普通行处理");
            warnings.push(defect);
        }

        Ok(Self {
            pattern,
            directory: config.character_mapping.clone(),
            narrator: config.parsing.default_narrator_name.clone(),
            known_pairs: config.quotes.quote_pairs.clone(),
            presets: config.quotes.quote_categories.clone(),
            warnings,
        })
    }

    /// 构建时发现的配置警告
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn directory(&self) -> &CharacterDirectory {
        &self.directory
    }

    /// 引号预设
    pub fn presets(&self) -> &QuotePresets {
        &self.presets
    }

    /// 配置中登记的全部引号对
    pub fn known_quote_pairs(&self) -> &QuotePairSet {
        &self.known_pairs
    }

    pub fn default_narrator(&self) -> &str {
        &self.narrator
    }

    /// 转换整段文本
    ///
    /// 不会失败：没有任何说话人行或正文全空时，结果的动作列表为空。
    pub fn convert(&self, text: &str, options: &ConvertOptions) -> ConversionResult {
        let narrator = options
            .narrator
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.narrator);

        let segmenter = Segmenter::new(
            &self.pattern,
            &self.directory,
            &options.quote_pairs,
            narrator,
        );
        let actions = segmenter.segment(text);
        tracing::debug!(actions = actions.len(), "转换完成");

        ConversionResult::assemble(actions, options.metadata.clone())
    }

    /// 转换并序列化为 JSON
    pub fn convert_to_json(
        &self,
        text: &str,
        options: &ConvertOptions,
    ) -> Result<String, FormatError> {
        self.convert(text, options).to_json()
    }

    /// 只转换开头 [`PREVIEW_CHARS`] 个字符
    pub fn preview(&self, text: &str, options: &ConvertOptions) -> ConversionResult {
        let end = text
            .char_indices()
            .nth(PREVIEW_CHARS)
            .map_or(text.len(), |(idx, _)| idx);
        self.convert(&text[..end], options)
    }
}

/// 一次性转换：构建转换器、转换并序列化
pub fn convert_once(
    config: &ConverterConfig,
    text: &str,
    options: &ConvertOptions,
) -> ConvertResult<String> {
    let converter = Converter::new(config)?;
    Ok(converter.convert_to_json(text, options)?)
}
