//! # txt2json
//!
//! dialogue-core 的文件与命令行外壳：配置文件读写、单文件与批量转换。
//!
//! ## 模块结构
//!
//! - [`store`]：YAML 配置文件（缺失时写出默认值、缺分节时补全）
//! - [`files`]：单文件 / 目录批量转换
//! - [`options`]：命令行选项 → [`dialogue_core::ConvertOptions`]

pub mod files;
pub mod options;
pub mod store;

pub use files::{BatchReport, batch_convert, collect_txt_files, convert_file, default_output_path};
pub use options::OptionArgs;
pub use store::{ConfigStore, DEFAULT_CONFIG_PATH, StoreError};
