//! # Config 模块
//!
//! 转换器配置的数据模型，与配置文件的结构一一对应。
//!
//! 这里只定义值和默认值，不做任何文件读写；由调用方加载后一次性交给
//! [`crate::Converter::new`]。

use serde::{Deserialize, Serialize};

use crate::characters::CharacterDirectory;
use crate::classifier::{DEFAULT_MAX_SPEAKER_NAME_LENGTH, DEFAULT_SPEAKER_PATTERN};
use crate::quote::{QuotePair, QuotePairSet, QuotePresets};

/// 配置文件的顶层分节名
pub const SECTIONS: [&str; 4] = ["character_mapping", "parsing", "patterns", "quotes"];

/// 转换器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// 说话人名 → 角色 ID
    #[serde(default = "default_character_mapping")]
    pub character_mapping: CharacterDirectory,

    #[serde(default)]
    pub parsing: ParsingConfig,

    #[serde(default)]
    pub patterns: PatternConfig,

    #[serde(default)]
    pub quotes: QuoteConfig,
}

/// 解析参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// 说话人名字符数上限（严格小于才算说话人行）
    #[serde(default = "default_max_speaker_name_length")]
    pub max_speaker_name_length: usize,

    /// 旁白的说话人名
    #[serde(default = "default_narrator_name")]
    pub default_narrator_name: String,
}

/// 语法配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// 说话人正则，需要两个捕获组：名字、内容
    #[serde(default = "default_speaker_pattern")]
    pub speaker_pattern: String,
}

/// 引号配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// 已知的全部引号对
    #[serde(default = "default_quote_pairs")]
    pub quote_pairs: QuotePairSet,

    /// 可按名称启用的引号预设
    #[serde(default = "default_quote_categories")]
    pub quote_categories: QuotePresets,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            character_mapping: default_character_mapping(),
            parsing: ParsingConfig::default(),
            patterns: PatternConfig::default(),
            quotes: QuoteConfig::default(),
        }
    }
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            max_speaker_name_length: default_max_speaker_name_length(),
            default_narrator_name: default_narrator_name(),
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            speaker_pattern: default_speaker_pattern(),
        }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            quote_pairs: default_quote_pairs(),
            quote_categories: default_quote_categories(),
        }
    }
}

// 默认值函数
fn default_max_speaker_name_length() -> usize {
    DEFAULT_MAX_SPEAKER_NAME_LENGTH
}

fn default_narrator_name() -> String {
    " ".to_string()
}

fn default_speaker_pattern() -> String {
    DEFAULT_SPEAKER_PATTERN.to_string()
}

const DEFAULT_QUOTES: [(&str, char, char); 6] = [
    ("中文引号 “...”", '“', '”'),
    ("中文单引号 ‘...’", '‘', '’'),
    ("日文引号 「...」", '「', '」'),
    ("日文书名号 『...』", '『', '』'),
    ("英文双引号 \"...\"", '"', '"'),
    ("英文单引号 '...'", '\'', '\''),
];

fn default_quote_pairs() -> QuotePairSet {
    DEFAULT_QUOTES
        .iter()
        .map(|&(_, open, close)| QuotePair::new(open, close))
        .collect()
}

fn default_quote_categories() -> QuotePresets {
    DEFAULT_QUOTES
        .iter()
        .map(|&(name, open, close)| (name.to_string(), QuotePair::new(open, close)))
        .collect()
}

/// BanG Dream! 角色名单；MyGO!!!!! / Ave Mujica 的部分角色复用了 1-5 号
const DEFAULT_CHARACTERS: [(&str, u32); 45] = [
    ("户山香澄", 1),
    ("花园多惠", 2),
    ("牛込里美", 3),
    ("山吹沙绫", 4),
    ("市谷有咲", 5),
    ("美竹兰", 6),
    ("青叶摩卡", 7),
    ("上原绯玛丽", 8),
    ("宇田川巴", 9),
    ("羽泽鸫", 10),
    ("弦卷心", 11),
    ("濑田薰", 12),
    ("北泽育美", 13),
    ("松原花音", 14),
    ("奥泽美咲", 15),
    ("丸山彩", 16),
    ("冰川日菜", 17),
    ("白鹭千圣", 18),
    ("大和麻弥", 19),
    ("若宫伊芙", 20),
    ("凑友希那", 21),
    ("冰川纱夜", 22),
    ("今井莉莎", 23),
    ("宇田川亚子", 24),
    ("白金燐子", 25),
    ("仓田真白", 26),
    ("桐谷透子", 27),
    ("广町七深", 28),
    ("二叶筑紫", 29),
    ("八潮瑠唯", 30),
    ("LAYER", 31),
    ("LOCK", 32),
    ("MASKING", 33),
    ("PAREO", 34),
    ("CHU²", 35),
    ("丰川祥子", 1),
    ("若叶睦", 2),
    ("三角初华", 3),
    ("八幡海铃", 4),
    ("祐天寺若麦", 5),
    ("高松灯", 36),
    ("千早爱音", 37),
    ("要乐奈", 38),
    ("长崎素世", 39),
    ("椎名立希", 40),
];

fn default_character_mapping() -> CharacterDirectory {
    DEFAULT_CHARACTERS
        .iter()
        .map(|&(name, id)| (name, vec![id]))
        .collect()
}
