//! # Characters 模块
//!
//! 说话人显示名 → 角色 ID 列表的映射。
//!
//! 不同版本的游戏会在各自的角色名单里复用同一批 ID，所以一个名字可以对应
//! 零个、一个或多个 ID。查不到的名字解析为空列表，不视为错误。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 角色目录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterDirectory {
    entries: BTreeMap<String, Vec<u32>>,
}

impl CharacterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个名字，已存在时覆盖
    pub fn insert(&mut self, name: &str, ids: Vec<u32>) {
        self.entries.insert(name.trim().to_string(), ids);
    }

    /// 解析说话人名对应的 ID（区分大小写，忽略首尾空白）
    pub fn resolve(&self, name: &str) -> &[u32] {
        self.entries
            .get(name.trim())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.entries
            .iter()
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    /// 解析 `名字=ID,ID,...` 形式的文本，每行一条
    ///
    /// - 不含 `=` 的行忽略
    /// - 非数字的 ID 跳过
    pub fn parse_assignments(text: &str) -> Self {
        let mut directory = Self::new();
        for line in text.lines() {
            let Some((name, ids)) = line.split_once('=') else {
                continue;
            };
            let ids = ids
                .split(',')
                .filter_map(|id| id.trim().parse::<u32>().ok())
                .collect();
            directory.insert(name, ids);
        }
        directory
    }

    /// 生成 `名字=ID,ID,...` 形式的文本
    pub fn to_assignments(&self) -> String {
        let mut out = String::new();
        for (name, ids) in self.iter() {
            let ids: Vec<String> = ids.iter().map(u32::to_string).collect();
            out.push_str(name);
            out.push('=');
            out.push_str(&ids.join(","));
            out.push('\n');
        }
        out
    }
}

impl<S: AsRef<str>> FromIterator<(S, Vec<u32>)> for CharacterDirectory {
    fn from_iter<I: IntoIterator<Item = (S, Vec<u32>)>>(iter: I) -> Self {
        let mut directory = Self::new();
        for (name, ids) in iter {
            directory.insert(name.as_ref(), ids);
        }
        directory
    }
}
