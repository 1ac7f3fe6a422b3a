//! # Segmenter 模块
//!
//! 动作分段状态机：一次顺序扫描，把行序列归并为动作序列。
//!
//! ## 状态
//!
//! - `current_speaker`：当前说话人，初始为旁白名
//! - `current_body_lines`：当前动作已累积的行
//!
//! ## 规则
//!
//! ```text
//! 空行          → 结束当前动作，说话人重置为旁白
//! 说话人行 S: C → S 与当前说话人不同且已有累积时先结束当前动作；
//!                 之后说话人设为 S，追加 C
//! 普通行        → 原样（去首尾空白）追加到当前动作
//! 输入结束      → 结束当前动作
//! ```
//!
//! 结束动作时正文为空（去引号后）则不产出任何动作。

use crate::characters::CharacterDirectory;
use crate::classifier::Classify;
use crate::quote::{QuotePairSet, strip_quotes};
use crate::script::Action;

/// 分段器
///
/// 只借用配置，每次 [`Segmenter::segment`] 调用使用独立的累积状态。
pub struct Segmenter<'a, C: Classify + ?Sized> {
    classifier: &'a C,
    directory: &'a CharacterDirectory,
    quote_pairs: &'a QuotePairSet,
    narrator: &'a str,
}

/// 累积状态
struct Accumulator<'a> {
    current_speaker: String,
    current_body_lines: Vec<&'a str>,
    actions: Vec<Action>,
}

impl<'a, C: Classify + ?Sized> Segmenter<'a, C> {
    pub fn new(
        classifier: &'a C,
        directory: &'a CharacterDirectory,
        quote_pairs: &'a QuotePairSet,
        narrator: &'a str,
    ) -> Self {
        Self {
            classifier,
            directory,
            quote_pairs,
            narrator,
        }
    }

    /// 对整段文本分段
    pub fn segment(&self, text: &str) -> Vec<Action> {
        let mut acc = Accumulator {
            current_speaker: self.narrator.to_string(),
            current_body_lines: Vec::new(),
            actions: Vec::new(),
        };

        for line in text.split('\n') {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                self.finalize(&mut acc);
                acc.current_speaker.clear();
                acc.current_speaker.push_str(self.narrator);
                continue;
            }

            match self.classifier.classify(trimmed) {
                Some(speaker_line) => {
                    if speaker_line.speaker != acc.current_speaker
                        && !acc.current_body_lines.is_empty()
                    {
                        self.finalize(&mut acc);
                    }
                    acc.current_speaker.clear();
                    acc.current_speaker.push_str(speaker_line.speaker);
                    acc.current_body_lines.push(speaker_line.content);
                }
                None => acc.current_body_lines.push(trimmed),
            }
        }

        self.finalize(&mut acc);
        acc.actions
    }

    /// 结束当前动作并清空累积的行
    ///
    /// 累积为空或去引号后正文为空时不产出动作，因此重复调用不会重复产出。
    fn finalize(&self, acc: &mut Accumulator<'_>) {
        if acc.current_body_lines.is_empty() {
            return;
        }

        let joined = acc.current_body_lines.join("\n");
        acc.current_body_lines.clear();

        let body = strip_quotes(joined.trim(), self.quote_pairs);
        if body.is_empty() {
            tracing::debug!(speaker = %acc.current_speaker, "正文为空，跳过该段");
            return;
        }

        let character_ids = self.directory.resolve(&acc.current_speaker).to_vec();
        acc.actions.push(Action::talk(
            acc.current_speaker.as_str(),
            body,
            character_ids,
        ));
    }
}
