// crates/cli/src/args.rs
use std::path::PathBuf;

use clap::{ArgAction, Args as ClapArgs, Parser, ValueHint};

use crate::options::OutputFormat;

/// Top-level CLI arguments parsed via clap.
#[derive(Parser, Debug)]
#[command(
    name = "project_scan",
    version = crate::VERSION,
    about = "プロジェクトのフォルダ/ファイル数・スクリプト行数・シーン数とサイズの集計ツール"
)]
pub struct Args {
    /// 走査するプロジェクトのルート（省略時は設定ファイルの root, なければ "."）
    #[arg(value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// 設定ファイル (.json / .yaml / .yml)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub scan: ScanArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub behavior: BehaviorArgs,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ScanArgs {
    /// 追加の除外フォルダ名（カンマ区切り/複数指定可, 大文字小文字無視）
    #[arg(long, value_delimiter = ',', help_heading = "走査")]
    pub exclude: Vec<String>,

    /// 既定の除外フォルダ一覧を使わない
    #[arg(long, help_heading = "走査")]
    pub no_default_excludes: bool,

    /// 行数を数える拡張子（カンマ区切り, 既定値を置き換え）
    #[arg(long, value_delimiter = ',', help_heading = "走査")]
    pub ext: Vec<String>,

    /// シーンとして数える拡張子（カンマ区切り, 既定値を置き換え）
    #[arg(long, value_delimiter = ',', help_heading = "走査")]
    pub scene_ext: Vec<String>,

    /// シンボリックリンクを辿る
    #[arg(long, help_heading = "走査")]
    pub follow: bool,

    /// 最大探索深さ
    #[arg(long, help_heading = "走査")]
    pub max_depth: Option<usize>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct OutputArgs {
    /// 出力フォーマット
    #[arg(long, value_enum, default_value = "table", help_heading = "出力")]
    pub format: OutputFormat,

    /// サイズを KiB/MiB 表記で表示（table のみ）
    #[arg(long, help_heading = "出力")]
    pub human: bool,
}

#[derive(ClapArgs, Debug, Default)]
pub struct BehaviorArgs {
    /// 読み取りエラーが1件でもあれば失敗終了する
    #[arg(long, help_heading = "動作")]
    pub strict: bool,

    /// 詳細ログ（-vv でさらに詳細）
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet", help_heading = "動作")]
    pub verbose: u8,

    /// エラー以外のログを抑制
    #[arg(short, long, help_heading = "動作")]
    pub quiet: bool,
}

impl BehaviorArgs {
    /// Default log directive when `RUST_LOG` is unset.
    pub const fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
