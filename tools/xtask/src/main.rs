//! # xtask - 开发辅助工具
//!
//! ```bash
//! cargo xtask check-all                      # fmt + clippy + test
//! cargo xtask cov-core                       # dialogue-core 覆盖率
//! cargo xtask cov-workspace                  # workspace 覆盖率（不含 xtask）
//! cargo xtask script-check [path] [config]   # 试转换对话文本
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialogue_core::{ConvertOptions, Converter, ConverterConfig};
use txt2json::ConfigStore;
use walkdir::WalkDir;
use xshell::{Shell, cmd};

/// 默认脚本目录（相对于 workspace root）
const DEFAULT_SCRIPTS_DIR: &str = "scripts";

#[derive(Parser)]
#[command(name = "xtask", about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Task {
    /// fmt、clippy、test 门禁检查
    CheckAll,
    /// dialogue-core 覆盖率报告
    CovCore,
    /// workspace 覆盖率报告
    CovWorkspace,
    /// 试转换对话文本：配置警告、空结果、未登记的说话人
    ScriptCheck {
        /// 文件或目录（默认：scripts/）
        path: Option<PathBuf>,
        /// YAML 配置（不存在时使用内置默认配置，不会写出文件）
        config: Option<PathBuf>,
    },
}

impl Task {
    /// 依次执行的 cargo 参数
    fn cargo_steps(&self) -> Vec<Vec<&'static str>> {
        match self {
            Task::CheckAll => vec![
                vec!["fmt", "--all", "--", "--check"],
                vec!["clippy", "--workspace", "--all-targets"],
                vec!["test", "--workspace"],
            ],
            Task::CovCore => vec![vec![
                "llvm-cov",
                "-p",
                "dialogue-core",
                "--all-features",
                "--html",
            ]],
            // xtask 不计入覆盖率
            Task::CovWorkspace => vec![vec![
                "llvm-cov",
                "--workspace",
                "--exclude",
                "xtask",
                "--all-features",
                "--html",
            ]],
            Task::ScriptCheck { .. } => Vec::new(),
        }
    }

    fn needs_llvm_cov(&self) -> bool {
        matches!(self, Task::CovCore | Task::CovWorkspace)
    }
}

fn main() -> anyhow::Result<()> {
    let task = Cli::parse().task;

    if let Task::ScriptCheck { path, config } = &task {
        return script_check(path.as_deref(), config.as_deref());
    }

    let sh = Shell::new()?;
    if task.needs_llvm_cov() {
        cmd!(sh, "cargo llvm-cov --version")
            .quiet()
            .ignore_stdout()
            .run()
            .context(
                "cargo llvm-cov 不可用，请先执行 `cargo install cargo-llvm-cov` 与 \
                 `rustup component add llvm-tools-preview`",
            )?;
    }

    for args in task.cargo_steps() {
        cmd!(sh, "cargo {args...}").run()?;
    }

    if task.needs_llvm_cov() {
        eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
    }
    Ok(())
}

//=============================================================================
// script-check
//=============================================================================

/// 检查报告
#[derive(Debug, Default)]
struct ScriptReport {
    scripts_checked: usize,
    read_errors: usize,
    /// 没有产出动作的文件
    empty_scripts: Vec<String>,
    /// 未登记的说话人 → 出现的文件
    unmapped_speakers: BTreeMap<String, Vec<String>>,
}

impl ScriptReport {
    /// 试转换一份文本并记录问题
    fn record(
        &mut self,
        script_id: &str,
        text: &str,
        converter: &Converter,
        options: &ConvertOptions,
    ) {
        self.scripts_checked += 1;

        let converted = converter.convert(text, options);
        if converted.actions.is_empty() {
            self.empty_scripts.push(script_id.to_string());
        }

        for action in &converted.actions {
            if action.speaker_name == converter.default_narrator()
                || !action.character_ids.is_empty()
            {
                continue;
            }
            let files = self
                .unmapped_speakers
                .entry(action.speaker_name.clone())
                .or_default();
            if !files.iter().any(|f| f == script_id) {
                files.push(script_id.to_string());
            }
        }
    }

    fn warning_count(&self) -> usize {
        self.empty_scripts.len() + self.unmapped_speakers.len()
    }

    fn print(&self, config_warnings: usize) {
        eprintln!("─────────────────────────────────────────────────────");
        eprintln!("检查完成: {} 个脚本\n", self.scripts_checked);

        for script_id in &self.empty_scripts {
            eprintln!("[WARN] {script_id}: 没有产出任何动作");
        }
        for (speaker, files) in &self.unmapped_speakers {
            eprintln!("[WARN] 未登记的说话人 '{speaker}': {}", files.join(", "));
        }

        let warnings = config_warnings + self.warning_count();
        eprintln!();
        match (self.read_errors, warnings) {
            (0, 0) => eprintln!("✅ 检查通过"),
            (0, w) => eprintln!("⚠️  0 个错误, {w} 个警告"),
            (e, w) => eprintln!("❌ {e} 个错误, {w} 个警告"),
        }
    }
}

fn script_check(path: Option<&Path>, config_path: Option<&Path>) -> anyhow::Result<()> {
    let root = path.unwrap_or(Path::new(DEFAULT_SCRIPTS_DIR));
    let files = if root.is_file() {
        vec![root.to_path_buf()]
    } else if root.is_dir() {
        collect_script_files(root)
    } else {
        anyhow::bail!(
            "路径不存在: {}（请在 workspace 根目录运行，或指定脚本路径）",
            root.display()
        );
    };

    if files.is_empty() {
        eprintln!("未找到脚本文件（.txt）");
        return Ok(());
    }

    let config = match config_path {
        Some(p) if p.exists() => ConfigStore::load(p).config().clone(),
        _ => ConverterConfig::default(),
    };
    let converter = Converter::new(&config)?;
    for warning in converter.warnings() {
        eprintln!("[WARN] 配置: {warning}");
    }
    let options = ConvertOptions::default().with_quote_pairs(converter.presets().all());

    eprintln!("==> 检查 {} 个脚本文件...\n", files.len());

    let mut report = ScriptReport::default();
    for file in &files {
        let script_id = file.display().to_string();
        match std::fs::read_to_string(file) {
            Ok(text) => report.record(&script_id, &text, &converter, &options),
            Err(e) => {
                eprintln!("[ERROR] {script_id}: 无法读取文件 - {e}");
                report.read_errors += 1;
            }
        }
    }

    report.print(converter.warnings().len());
    if report.read_errors > 0 {
        anyhow::bail!("脚本检查发现错误");
    }
    Ok(())
}

/// 递归收集 .txt 文件
fn collect_script_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    files
}
