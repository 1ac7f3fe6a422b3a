//! # Files 模块
//!
//! 文件级的转换：单文件、目录批量。
//!
//! 批量转换只处理输入目录下一层的 `.txt` 文件，单个文件失败只记录、不中断。
//! 多个文件在作用域线程中并行转换，共享同一个只读的 [`Converter`]。

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Context;
use dialogue_core::{ConvertOptions, Converter};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// 默认输出路径：把扩展名换成 `.json`
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("json")
}

/// 转换单个文件，返回产出的动作数
pub fn convert_file(
    converter: &Converter,
    options: &ConvertOptions,
    input: &Path,
    output: &Path,
) -> anyhow::Result<usize> {
    let text =
        fs::read_to_string(input).with_context(|| format!("读取输入文件失败: {:?}", input))?;
    info!(path = ?input, chars = text.chars().count(), "读取输入文件");

    let result = converter.convert(&text, options);
    let json = result.to_json()?;

    fs::write(output, json).with_context(|| format!("写入输出文件失败: {:?}", output))?;
    info!(path = ?output, actions = result.actions.len(), "保存成功");

    Ok(result.actions.len())
}

/// 列出目录下一层的 `.txt` 文件（按路径排序）
pub fn collect_txt_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("输入目录不存在: {:?}", dir);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// 批量转换报告
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    /// 失败的文件及原因
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}

/// 批量转换目录
pub fn batch_convert(
    converter: &Converter,
    options: &ConvertOptions,
    input_dir: &Path,
    output_dir: &Path,
    jobs: Option<NonZeroUsize>,
) -> anyhow::Result<BatchReport> {
    let files = collect_txt_files(input_dir)?;
    if files.is_empty() {
        warn!(dir = ?input_dir, "未找到 .txt 文件");
        return Ok(BatchReport::default());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("创建输出目录失败: {:?}", output_dir))?;

    let jobs = jobs
        .or_else(|| std::thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get)
        .min(files.len());
    let chunk_size = files.len().div_ceil(jobs);
    info!(files = files.len(), jobs, "开始批量处理");

    let outcomes: Vec<(PathBuf, anyhow::Result<usize>)> = std::thread::scope(|s| {
        let handles: Vec<_> = files
            .chunks(chunk_size)
            .map(|chunk| {
                let handle = s.spawn(move || {
                    chunk
                        .iter()
                        .map(|input| {
                            let output = output_dir.join(batch_output_name(input));
                            let outcome = convert_file(converter, options, input, &output);
                            (input.clone(), outcome)
                        })
                        .collect::<Vec<_>>()
                });
                (chunk, handle)
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|(chunk, h)| chunk_outcomes(chunk, h.join()))
            .collect()
    });

    let mut report = BatchReport::default();
    for (input, outcome) in outcomes {
        match outcome {
            Ok(_) => report.succeeded += 1,
            Err(e) => {
                error!(path = ?input, error = %format!("{e:#}"), "处理文件失败");
                report.failed.push((input, format!("{e:#}")));
            }
        }
    }

    info!(
        succeeded = report.succeeded,
        failed = report.failed.len(),
        "批量处理完成"
    );
    Ok(report)
}

/// 工作线程崩溃时，整块文件都记为失败
fn chunk_outcomes(
    chunk: &[PathBuf],
    joined: std::thread::Result<Vec<(PathBuf, anyhow::Result<usize>)>>,
) -> Vec<(PathBuf, anyhow::Result<usize>)> {
    match joined {
        Ok(outcomes) => outcomes,
        Err(_) => chunk
            .iter()
            .map(|input| (input.clone(), Err(anyhow::anyhow!("转换线程崩溃"))))
            .collect(),
    }
}

fn batch_output_name(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    PathBuf::from(stem).with_extension("json")
}
