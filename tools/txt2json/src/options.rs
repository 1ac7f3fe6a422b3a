//! # Options 模块
//!
//! 每次转换都要用到的命令行选项：旁白名、引号选择、顶层元数据。

use clap::Args;
use dialogue_core::{ConvertOptions, Converter, QuotePair, QuotePairSet, ScriptMetadata};

/// 转换选项
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// 旁白名称（默认取配置中的 default_narrator_name）
    #[arg(long, global = true)]
    pub narrator: Option<String>,

    /// 启用的引号预设名（可重复；默认启用全部预设）
    #[arg(long = "preset", global = true)]
    pub presets: Vec<String>,

    /// 不启用任何引号预设
    #[arg(long, global = true, conflicts_with = "presets")]
    pub no_presets: bool,

    /// 自定义引号对，写成两个字符，如 `【】`（可重复）
    #[arg(long = "pair", global = true)]
    pub pairs: Vec<String>,

    /// 服务器编号
    #[arg(long, default_value_t = 0, global = true)]
    pub server: i32,

    /// 语音轨道
    #[arg(long, default_value = "", global = true)]
    pub voice: String,

    /// 背景
    #[arg(long, global = true)]
    pub background: Option<String>,

    /// BGM
    #[arg(long, global = true)]
    pub bgm: Option<String>,
}

impl OptionArgs {
    /// 本次生效的引号集合：预设在前，自定义引号对覆盖同起始符的预设
    pub fn quote_pairs(&self, converter: &Converter) -> anyhow::Result<QuotePairSet> {
        let mut pairs = if self.no_presets {
            QuotePairSet::new()
        } else if self.presets.is_empty() {
            converter.presets().all()
        } else {
            converter.presets().select(&self.presets)?
        };

        for pair in &self.pairs {
            pairs.insert(QuotePair::parse_compact(pair)?);
        }
        Ok(pairs)
    }

    pub fn to_convert_options(&self, converter: &Converter) -> anyhow::Result<ConvertOptions> {
        Ok(ConvertOptions {
            narrator: self.narrator.clone(),
            quote_pairs: self.quote_pairs(converter)?,
            metadata: ScriptMetadata {
                server: self.server,
                voice_track: self.voice.clone(),
                background: self.background.clone(),
                bgm: self.bgm.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_core::ConverterConfig;

    fn converter() -> Converter {
        Converter::new(&ConverterConfig::default()).unwrap()
    }

    #[test]
    fn test_default_enables_all_presets() {
        let pairs = OptionArgs::default().quote_pairs(&converter()).unwrap();
        assert_eq!(pairs, converter().presets().all());
    }

    #[test]
    fn test_no_presets_with_custom_pair() {
        let args = OptionArgs {
            no_presets: true,
            pairs: vec!["【】".to_string()],
            ..Default::default()
        };
        let pairs = args.quote_pairs(&converter()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.closing_for('【'), Some('】'));
    }

    #[test]
    fn test_selected_presets() {
        let args = OptionArgs {
            presets: vec!["日文引号 「...」".to_string()],
            ..Default::default()
        };
        let pairs = args.quote_pairs(&converter()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.closing_for('「'), Some('」'));
    }

    #[test]
    fn test_unknown_preset_or_bad_pair_rejected() {
        let args = OptionArgs {
            presets: vec!["不存在".to_string()],
            ..Default::default()
        };
        assert!(args.quote_pairs(&converter()).is_err());

        let args = OptionArgs {
            pairs: vec!["<<>>".to_string()],
            ..Default::default()
        };
        assert!(args.quote_pairs(&converter()).is_err());
    }

    #[test]
    fn test_metadata_from_args() {
        let args = OptionArgs {
            narrator: Some("旁白".to_string()),
            server: 3,
            voice: "v01".to_string(),
            bgm: Some("bgm01".to_string()),
            ..Default::default()
        };
        let options = args.to_convert_options(&converter()).unwrap();
        assert_eq!(options.narrator.as_deref(), Some("旁白"));
        assert_eq!(options.metadata.server, 3);
        assert_eq!(options.metadata.voice_track, "v01");
        assert_eq!(options.metadata.background, None);
        assert_eq!(options.metadata.bgm.as_deref(), Some("bgm01"));
    }
}
