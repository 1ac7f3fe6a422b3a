//! # Classifier 模块
//!
//! 单行分类：判断一行是「说话人行」（`名字: 内容`）还是普通行。
//!
//! 语法本身是配置项，分类的约定固定：
//!
//! 1. 去掉首尾空白
//! 2. 从行首开始匹配语法，必须得到两个捕获组（名字、内容）
//! 3. 名字去掉首尾空白后，字符数必须严格小于上限
//!
//! 任何一步失败都视为普通行，分类本身从不报错。

use fancy_regex::Regex;

use crate::error::ConfigError;

/// 默认说话人语法：名字由单词字符、数字（含上标数字，如 `CHU²`）与空白组成，
/// 后接全角或半角冒号
pub const DEFAULT_SPEAKER_PATTERN: &str = r"^([\w\p{N}\s]+)\s*[：:]\s*(.*)$";

/// 默认名字长度上限
pub const DEFAULT_MAX_SPEAKER_NAME_LENGTH: usize = 50;

/// 一行说话人行的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakerLine<'a> {
    pub speaker: &'a str,
    pub content: &'a str,
}

/// 行分类能力
pub trait Classify {
    /// 返回 `Some` 表示说话人行，`None` 表示普通行
    fn classify<'a>(&self, line: &'a str) -> Option<SpeakerLine<'a>>;
}

/// 基于正则的说话人语法
#[derive(Debug, Clone)]
pub struct SpeakerPattern {
    regex: Regex,
    max_name_length: usize,
}

impl SpeakerPattern {
    /// 编译语法
    ///
    /// 只有正则本身无法编译才报错；捕获组不足两个时仍可构造，
    /// 由 [`SpeakerPattern::defect`] 报告，所有行都会被当作普通行。
    pub fn new(pattern: &str, max_name_length: usize) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_regex(regex, max_name_length))
    }

    /// 使用已编译的正则（如需自定义回溯上限）
    pub fn from_regex(regex: Regex, max_name_length: usize) -> Self {
        Self {
            regex,
            max_name_length,
        }
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn max_name_length(&self) -> usize {
        self.max_name_length
    }

    /// 检查语法是否缺少捕获组
    pub fn defect(&self) -> Option<String> {
        // captures_len 包含整体匹配的第 0 组
        let groups = self.regex.captures_len().saturating_sub(1);
        (groups < 2).then(|| {
            format!(
                "说话人正则 '{}' 中缺少捕获组：需要 2 个（名字、内容），实际 {} 个",
                self.regex.as_str(),
                groups
            )
        })
    }
}

impl Default for SpeakerPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_SPEAKER_PATTERN).expect("内置说话人正则必须有效"),
            max_name_length: DEFAULT_MAX_SPEAKER_NAME_LENGTH,
        }
    }
}

impl Classify for SpeakerPattern {
    fn classify<'a>(&self, line: &'a str) -> Option<SpeakerLine<'a>> {
        let line = line.trim();

        let caps = match self.regex.captures(line) {
            Ok(caps) => caps?,
            Err(e) => {
                tracing::warn!("说话人正则匹配失败，按普通行处理: {e}");
                return None;
            }
        };

        // 只接受从行首开始的匹配
        if caps.get(0)?.start() != 0 {
            return None;
        }

        let speaker = caps.get(1)?.as_str().trim();
        let content = caps.get(2)?.as_str().trim();

        if speaker.chars().count() >= self.max_name_length {
            return None;
        }

        Some(SpeakerLine { speaker, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(speaker: &'static str, content: &'static str) -> Option<SpeakerLine<'static>> {
        Some(SpeakerLine { speaker, content })
    }

    #[test]
    fn test_default_pattern_halfwidth_and_fullwidth_colon() {
        let p = SpeakerPattern::default();
        assert_eq!(p.classify("兰: 你好"), line("兰", "你好"));
        assert_eq!(p.classify("兰：你好"), line("兰", "你好"));
        assert_eq!(p.classify("  上原绯玛丽 ： 大家好  "), line("上原绯玛丽", "大家好"));
    }

    #[test]
    fn test_superscript_digit_in_name() {
        let p = SpeakerPattern::default();
        assert_eq!(p.classify("CHU²: 你好"), line("CHU²", "你好"));
        assert_eq!(p.classify("Ⅻ号：在"), line("Ⅻ号", "在"));
    }

    #[test]
    fn test_name_may_contain_spaces() {
        let p = SpeakerPattern::default();
        assert_eq!(
            p.classify("Lisa Imai: hello there"),
            line("Lisa Imai", "hello there")
        );
    }

    #[test]
    fn test_empty_content_is_still_speaker_line() {
        let p = SpeakerPattern::default();
        assert_eq!(p.classify("兰:"), line("兰", ""));
    }

    #[test]
    fn test_plain_lines() {
        let p = SpeakerPattern::default();
        assert_eq!(p.classify("世界"), None);
        assert_eq!(p.classify("「你好」"), None);
        // 名字部分含标点，不是单词字符
        assert_eq!(p.classify("她说，听好了：明天见"), None);
    }

    #[test]
    fn test_name_length_gate() {
        let p = SpeakerPattern::new(DEFAULT_SPEAKER_PATTERN, 3).unwrap();
        assert_eq!(p.classify("兰兰: 好"), line("兰兰", "好"));
        // 3 个字符不严格小于 3
        assert_eq!(p.classify("兰兰兰: 好"), None);
        // 按字符计数，不按字节
        assert_eq!(p.classify(" 兰兰 : 好"), line("兰兰", "好"));
    }

    #[test]
    fn test_default_gate_rejects_long_clause() {
        let p = SpeakerPattern::default();
        let clause = "这是一段很长很长的叙述文字".repeat(5);
        assert_eq!(p.classify(&format!("{clause}：后面的内容")), None);
    }

    #[test]
    fn test_custom_grammar() {
        let p = SpeakerPattern::new(r"^【(.+?)】(.*)$", 10).unwrap();
        assert_eq!(p.classify("【香澄】早上好"), line("香澄", "早上好"));
        assert_eq!(p.classify("香澄: 早上好"), None);
        assert!(p.defect().is_none());
    }

    #[test]
    fn test_match_must_start_at_line_start() {
        let p = SpeakerPattern::new(r"(\w+)=(\w+)", 10).unwrap();
        assert_eq!(p.classify("a=b"), line("a", "b"));
        assert_eq!(p.classify("-- a=b"), None);
    }

    #[test]
    fn test_missing_capture_group_degrades_to_plain() {
        let p = SpeakerPattern::new(r"^(\w+)[：:].*$", 10).unwrap();
        assert!(p.defect().is_some());
        assert_eq!(p.classify("兰: 你好"), None);

        let p = SpeakerPattern::new(r"^\w+[：:].*$", 10).unwrap();
        assert!(p.defect().unwrap().contains("实际 0 个"));
    }

    #[test]
    fn test_non_participating_group_is_plain() {
        let p = SpeakerPattern::new(r"^(\w+):(?:(x+)|y+)$", 10).unwrap();
        assert_eq!(p.classify("a:xx"), line("a", "xx"));
        assert_eq!(p.classify("a:yy"), None);
    }

    #[test]
    fn test_backtrack_limit_degrades_to_plain() {
        let regex = fancy_regex::RegexBuilder::new(r"^(x+x+)+(?>y)(.*)$")
            .backtrack_limit(1)
            .build()
            .unwrap();
        let p = SpeakerPattern::from_regex(regex, 50);
        assert!(p.defect().is_none());
        assert_eq!(p.classify("xxxxxxxxxxy z"), None);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = SpeakerPattern::new(r"^([\w", 10).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }
}
