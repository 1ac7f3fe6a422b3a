//! # Quote 模块
//!
//! 引号对表、命名预设以及去除外层引号的规范化函数。
//!
//! ## 规则
//!
//! - 只看去掉首尾空白后的第一个和最后一个字符
//! - 首字符是某个引号对的起始符，且尾字符恰好是对应结束符时，去掉这一层
//! - 最多去掉一层，不做部分剥离，也不处理不匹配的引号

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 单个引号对
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuotePair {
    pub open: char,
    pub close: char,
}

impl QuotePair {
    pub fn new(open: char, close: char) -> Self {
        Self { open, close }
    }

    /// 从两个字符串构造引号对，两侧都必须恰好是一个字符
    pub fn parse(open: &str, close: &str) -> Result<Self, ConfigError> {
        match (single_char(open), single_char(close)) {
            (Some(open), Some(close)) => Ok(Self { open, close }),
            _ => Err(ConfigError::InvalidQuotePair {
                open: open.to_string(),
                close: close.to_string(),
            }),
        }
    }

    /// 解析形如 `「」` 的双字符写法
    pub fn parse_compact(s: &str) -> Result<Self, ConfigError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(open), Some(close), None) => Ok(Self { open, close }),
            _ => Err(ConfigError::InvalidQuotePair {
                open: s.to_string(),
                close: String::new(),
            }),
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

// 配置文件里写成 ["「", "」"]
impl Serialize for QuotePair {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.open.to_string(), self.close.to_string()].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QuotePair {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [open, close] = <[String; 2]>::deserialize(deserializer)?;
        QuotePair::parse(&open, &close).map_err(serde::de::Error::custom)
    }
}

/// 一次转换中生效的引号集合：起始符 → 结束符
///
/// 同一个起始符后插入的会覆盖先插入的。反序列化时跳过不是单字符的条目。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuotePairSet {
    pairs: BTreeMap<char, char>,
}

impl QuotePairSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: QuotePair) {
        self.pairs.insert(pair.open, pair.close);
    }

    /// 查询起始符对应的结束符
    pub fn closing_for(&self, open: char) -> Option<char> {
        self.pairs.get(&open).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = QuotePair> + '_ {
        self.pairs
            .iter()
            .map(|(&open, &close)| QuotePair::new(open, close))
    }
}

impl FromIterator<QuotePair> for QuotePairSet {
    fn from_iter<I: IntoIterator<Item = QuotePair>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<QuotePair> for QuotePairSet {
    fn extend<I: IntoIterator<Item = QuotePair>>(&mut self, iter: I) {
        for pair in iter {
            self.insert(pair);
        }
    }
}

/// 命名引号预设表
///
/// 反序列化时跳过无效的预设（不是恰好两个单字符符号），其余预设照常加载。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuotePresets {
    presets: BTreeMap<String, QuotePair>,
}

impl QuotePresets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, pair: QuotePair) {
        self.presets.insert(name.into(), pair);
    }

    pub fn get(&self, name: &str) -> Option<QuotePair> {
        self.presets.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// 启用全部预设
    pub fn all(&self) -> QuotePairSet {
        self.presets.values().copied().collect()
    }

    /// 只启用指定名称的预设
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<QuotePairSet, ConfigError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name).ok_or_else(|| ConfigError::UnknownQuotePreset {
                    name: name.to_string(),
                })
            })
            .collect()
    }
}

impl FromIterator<(String, QuotePair)> for QuotePresets {
    fn from_iter<I: IntoIterator<Item = (String, QuotePair)>>(iter: I) -> Self {
        Self {
            presets: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for QuotePairSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(raw
            .iter()
            .filter_map(|(open, close)| lenient_pair(open, close))
            .collect())
    }
}

impl<'de> Deserialize<'de> for QuotePresets {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(name, sides)| match sides.as_slice() {
                [open, close] => lenient_pair(open, close).map(|pair| (name, pair)),
                _ => {
                    tracing::warn!(
                        preset = %name,
                        count = sides.len(),
                        "引号预设需要两个符号，已忽略"
                    );
                    None
                }
            })
            .collect())
    }
}

fn lenient_pair(open: &str, close: &str) -> Option<QuotePair> {
    QuotePair::parse(open, close)
        .inspect_err(|e| tracing::warn!("{e}，已忽略"))
        .ok()
}

/// 去除一层匹配的外层引号
///
/// 去掉首尾空白后不足两个字符，或首尾不构成生效的引号对时，原样返回 `text`。
/// 剥离后的内容会再次去除首尾空白。
pub fn strip_quotes<'a>(text: &'a str, pairs: &QuotePairSet) -> &'a str {
    let trimmed = text.trim();

    let mut chars = trimmed.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return text;
    };

    match pairs.closing_for(first) {
        Some(close) if close == last => {
            trimmed[first.len_utf8()..trimmed.len() - last.len_utf8()].trim()
        }
        _ => text,
    }
}
