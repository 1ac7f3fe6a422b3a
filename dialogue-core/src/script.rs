//! # Script 模块
//!
//! 交换格式的数据模型与序列化。
//!
//! ## 设计原则
//!
//! - 字段顺序即结构体声明顺序，序列化结果稳定
//! - 序列化后再解析必须得到相等的值
//! - 非 ASCII 文本原样输出，方便人工校对

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// 动作类型
///
/// 当前只产出对话动作。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    #[default]
    Talk,
}

/// 一个对话动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub delay: u32,
    pub wait: bool,
    #[serde(rename = "characters")]
    pub character_ids: Vec<u32>,
    #[serde(rename = "name")]
    pub speaker_name: String,
    pub body: String,
    /// 保留字段，本核心不填充
    #[serde(rename = "motions")]
    pub motion_cues: Vec<String>,
    /// 保留字段，本核心不填充
    #[serde(rename = "voices")]
    pub voice_cues: Vec<String>,
    #[serde(rename = "close")]
    pub closes_dialogue: bool,
}

impl Action {
    /// 创建对话动作，其余字段取固定值
    pub fn talk(
        speaker_name: impl Into<String>,
        body: impl Into<String>,
        character_ids: Vec<u32>,
    ) -> Self {
        Self {
            kind: ActionKind::Talk,
            delay: 0,
            wait: true,
            character_ids,
            speaker_name: speaker_name.into(),
            body: body.into(),
            motion_cues: Vec::new(),
            voice_cues: Vec::new(),
            closes_dialogue: false,
        }
    }
}

/// 脚本顶层元数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptMetadata {
    pub server: i32,
    pub voice_track: String,
    pub background: Option<String>,
    pub bgm: Option<String>,
}

/// 转换结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub server: i32,
    #[serde(rename = "voice")]
    pub voice_track: String,
    pub background: Option<String>,
    pub bgm: Option<String>,
    /// 叙事顺序，不重排、不去重
    pub actions: Vec<Action>,
}

impl ConversionResult {
    /// 组装最终结果
    pub fn assemble(actions: Vec<Action>, metadata: ScriptMetadata) -> Self {
        let ScriptMetadata {
            server,
            voice_track,
            background,
            bgm,
        } = metadata;
        Self {
            server,
            voice_track,
            background,
            bgm,
            actions,
        }
    }

    /// 序列化为两空格缩进的 JSON 文本
    pub fn to_json(&self) -> Result<String, FormatError> {
        serde_json::to_string_pretty(self).map_err(FormatError::Serialize)
    }

    /// 从 JSON 文本解析
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        serde_json::from_str(json).map_err(FormatError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_talk_defaults() {
        let action = Action::talk("兰", "你好", vec![6]);
        assert_eq!(action.kind, ActionKind::Talk);
        assert_eq!(action.delay, 0);
        assert!(action.wait);
        assert!(action.motion_cues.is_empty());
        assert!(action.voice_cues.is_empty());
        assert!(!action.closes_dialogue);
    }

    #[test]
    fn test_assemble_uses_metadata() {
        let metadata = ScriptMetadata {
            server: 3,
            voice_track: "scenario01".to_string(),
            background: Some("bg00001".to_string()),
            bgm: None,
        };
        let result = ConversionResult::assemble(vec![Action::talk(" ", "旁白", vec![])], metadata);

        assert_eq!(result.server, 3);
        assert_eq!(result.voice_track, "scenario01");
        assert_eq!(result.background.as_deref(), Some("bg00001"));
        assert_eq!(result.bgm, None);
        assert_eq!(result.actions.len(), 1);
    }

    #[test]
    fn test_field_order_and_names() {
        let result = ConversionResult::assemble(
            vec![Action::talk("兰", "你好", vec![6])],
            ScriptMetadata::default(),
        );
        let json = result.to_json().unwrap();

        let top = ["\"server\"", "\"voice\"", "\"background\"", "\"bgm\"", "\"actions\""];
        let positions: Vec<usize> = top.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let fields = [
            "\"type\"",
            "\"delay\"",
            "\"wait\"",
            "\"characters\"",
            "\"name\"",
            "\"body\"",
            "\"motions\"",
            "\"voices\"",
            "\"close\"",
        ];
        let positions: Vec<usize> = fields.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_non_ascii_emitted_literally() {
        let result = ConversionResult::assemble(
            vec![Action::talk("美竹兰", "「いつも通り」", vec![6])],
            ScriptMetadata::default(),
        );
        let json = result.to_json().unwrap();
        assert!(json.contains("美竹兰"));
        assert!(json.contains("「いつも通り」"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_json_roundtrip() {
        let result = ConversionResult::assemble(
            vec![
                Action::talk("兰", "你好\n世界", vec![6]),
                Action::talk(" ", "旁白", vec![]),
            ],
            ScriptMetadata {
                server: 1,
                voice_track: String::new(),
                background: None,
                bgm: Some("bgm001".to_string()),
            },
        );
        let json = result.to_json().unwrap();
        assert_eq!(ConversionResult::from_json(&json).unwrap(), result);
    }

    #[test]
    fn test_from_json_rejects_unknown_kind() {
        let json = r#"{
            "server": 0, "voice": "", "background": null, "bgm": null,
            "actions": [{
                "type": "motion", "delay": 0, "wait": true, "characters": [],
                "name": "", "body": "", "motions": [], "voices": [], "close": false
            }]
        }"#;
        assert!(matches!(
            ConversionResult::from_json(json),
            Err(FormatError::Deserialize(_))
        ));
    }
}
