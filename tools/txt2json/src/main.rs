//! # txt2json
//!
//! 对话文本转 JSON 脚本工具。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p txt2json -- convert story.txt
//! cargo run -p txt2json -- convert story.txt -o out/story.json --narrator 旁白
//! cargo run -p txt2json -- batch scripts/ out/ --jobs 4
//! cargo run -p txt2json -- preview story.txt --no-presets --pair 【】
//! cargo run -p txt2json -- test-quotes
//! cargo run -p txt2json -- characters export
//! cargo run -p txt2json -- characters import mapping.txt
//!
//! # 或安装后直接使用
//! cargo install --path tools/txt2json
//! txt2json convert story.txt --preset "日文引号 「...」"
//! ```

use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialogue_core::{CharacterDirectory, ConvertOptions, Converter};
use tracing::{Level, info, warn};
use txt2json::{
    ConfigStore, DEFAULT_CONFIG_PATH, OptionArgs, batch_convert, convert_file, default_output_path,
};

/// 内置的引号测试样例
const QUOTE_SAMPLES: [&str; 6] = [
    "「这是日文引号」",
    "『这是日文书名号』",
    "“这是中文双引号”",
    "‘这是中文单引号’",
    "角色名:「带名字的引号」",
    "兰: “分かった。\nじゃあ、始めよっか”",
];

#[derive(Parser)]
#[command(name = "txt2json")]
#[command(about = "对话文本转 JSON 脚本工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件（默认：config.yaml，不存在时自动创建）
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    options: OptionArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// 转换单个文件
    Convert {
        /// 输入文本文件
        input: PathBuf,

        /// 输出 JSON 文件（默认：输入文件名换成 .json）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 批量转换目录下的所有 .txt 文件
    Batch {
        /// 输入目录
        input_dir: PathBuf,

        /// 输出目录
        output_dir: PathBuf,

        /// 并行线程数（默认：CPU 核数）
        #[arg(short, long)]
        jobs: Option<NonZeroUsize>,
    },

    /// 预览转换结果（只转换开头 500 个字符）
    Preview {
        /// 输入文本文件
        input: PathBuf,
    },

    /// 用样例文本测试引号处理
    TestQuotes {
        /// 测试文本（默认使用内置样例）
        text: Option<String>,
    },

    /// 列出可用的引号预设
    Presets,

    /// 角色映射管理
    Characters {
        #[command(subcommand)]
        action: CharacterAction,
    },
}

#[derive(Subcommand)]
enum CharacterAction {
    /// 导出为 `角色名=ID,ID...` 文本
    Export {
        /// 输出文件（默认：标准输出）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 从 `角色名=ID,ID...` 文本导入，替换现有映射并保存配置
    Import {
        /// 映射文本文件
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("❌ {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut store = ConfigStore::load(&cli.config);

    match cli.command {
        Commands::Characters { action } => characters(&mut store, &action)?,
        Commands::Convert { input, output } => {
            let (converter, options) = prepare(&store, &cli.options)?;
            let output = output.unwrap_or_else(|| default_output_path(&input));
            let count = convert_file(&converter, &options, &input, &output)?;
            println!("✅ 转换完成: {:?} ({count} 个动作)", output);
        }
        Commands::Batch {
            input_dir,
            output_dir,
            jobs,
        } => {
            let (converter, options) = prepare(&store, &cli.options)?;
            let report = batch_convert(&converter, &options, &input_dir, &output_dir, jobs)?;
            println!(
                "批量处理完成！成功: {}, 失败: {}.",
                report.succeeded,
                report.failed.len()
            );
            for (path, reason) in &report.failed {
                println!("  ❌ {:?}: {reason}", path);
            }
        }
        Commands::Preview { input } => {
            let (converter, options) = prepare(&store, &cli.options)?;
            let text = fs::read_to_string(&input)
                .with_context(|| format!("读取输入文件失败: {:?}", input))?;
            println!("{}", converter.preview(&text, &options).to_json()?);
        }
        Commands::TestQuotes { text } => {
            let (converter, options) = prepare(&store, &cli.options)?;
            let text = text.unwrap_or_else(|| QUOTE_SAMPLES.join("\n\n"));
            info!(pairs = options.quote_pairs.len(), "引号处理测试");
            println!("--- 转换结果 (JSON) ---");
            println!("{}", converter.convert_to_json(&text, &options)?);
        }
        Commands::Presets => {
            let (converter, _) = prepare(&store, &cli.options)?;
            for name in converter.presets().names() {
                if let Some(pair) = converter.presets().get(name) {
                    println!("{name}\t{}{}", pair.open, pair.close);
                }
            }
        }
    }

    Ok(())
}

/// 由配置构建转换器，并把命令行选项转换为本次的转换选项
fn prepare(store: &ConfigStore, args: &OptionArgs) -> anyhow::Result<(Converter, ConvertOptions)> {
    let converter = Converter::new(store.config())
        .with_context(|| format!("配置无效: {:?}", store.path()))?;
    for warning in converter.warnings() {
        warn!("{warning}");
    }
    let options = args.to_convert_options(&converter)?;
    Ok((converter, options))
}

fn characters(store: &mut ConfigStore, action: &CharacterAction) -> anyhow::Result<()> {
    match action {
        CharacterAction::Export { output } => {
            let text = store.config().character_mapping.to_assignments();
            match output {
                Some(path) => {
                    fs::write(path, text).with_context(|| format!("写入失败: {:?}", path))?;
                    println!("✅ 已导出到 {:?}", path);
                }
                None => print!("{text}"),
            }
        }
        CharacterAction::Import { file } => {
            let text = fs::read_to_string(file)
                .with_context(|| format!("读取映射文件失败: {:?}", file))?;
            let directory = CharacterDirectory::parse_assignments(&text);
            let count = directory.len();
            store.config_mut().character_mapping = directory;
            store.save()?;
            println!("✅ 配置保存成功！共 {count} 个角色");
        }
    }
    Ok(())
}
