//! # ctxfmt - Cortex 代码格式化工具
//!
//! 按 `|` / `^` 块结构规整缩进。逐行处理：不解析、不改写代码本身，
//! 只调整每行的前导空白；空行保留。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p ctxfmt -- hello.ctx
//! cargo run -p ctxfmt -- scripts/           # 递归处理目录下的 .ctx
//! cargo run -p ctxfmt -- --check hello.ctx  # 只检查不改写
//! cargo run -p ctxfmt -- --indent 4 hello.ctx
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "ctxfmt")]
#[command(about = "Cortex 代码格式化工具")]
#[command(version)]
struct Cli {
    /// 要格式化的 .ctx 文件或目录（目录递归处理）
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// 缩进宽度
    #[arg(long, default_value = "2")]
    indent: usize,

    /// 只检查，不改写；存在未格式化文件时退出码为 1
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(clean) if clean => ExitCode::from(0),
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("错误: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let mut clean = true;
    for path in &cli.paths {
        for file in collect_ctx_files(path)? {
            if !format_file(&file, cli.indent, cli.check)? {
                clean = false;
            }
        }
    }
    Ok(clean)
}

/// 单个文件原样返回，目录递归收集 `.ctx`
fn collect_ctx_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        if path.extension().is_none_or(|ext| ext != "ctx") {
            eprintln!("跳过非 Cortex 文件: {}", path.display());
            return Ok(vec![]);
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "ctx")
        {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// 返回该文件是否已是格式化状态
fn format_file(path: &Path, indent: usize, check_only: bool) -> anyhow::Result<bool> {
    let original = std::fs::read_to_string(path)?;
    let formatted = format_content(&original, indent);

    if original == formatted {
        return Ok(true);
    }

    if check_only {
        println!("需要格式化: {}", path.display());
        Ok(false)
    } else {
        std::fs::write(path, &formatted)?;
        println!("已格式化: {}", path.display());
        Ok(true)
    }
}

fn format_content(content: &str, indent: usize) -> String {
    let mut level: usize = 0;
    let mut lines = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() {
            lines.push(String::new());
            continue;
        }

        let (opens, closes) = block_delta(line);

        // 以 '^' 开头的行先回退再缩进，块结束符与块体对齐
        let lead = closes.min(leading_carets(line));
        let this_level = level.saturating_sub(lead);
        lines.push(format!("{}{}", " ".repeat(this_level * indent), line));

        level = (level + opens).saturating_sub(closes);
    }

    let mut result = lines.join("\n");
    result.push('\n');
    result
}

/// 统计一行里块开始符和结束符的个数
///
/// 字符串字面量与 `//` 注释内不计；`||` 是逻辑运算符，整体跳过。
fn block_delta(line: &str) -> (usize, usize) {
    let mut opens = 0;
    let mut closes = 0;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                // 跳到字符串结尾，反斜杠逃逸下一个字符
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => break,
            '|' => {
                if chars.peek() == Some(&'|') {
                    chars.next();
                } else {
                    opens += 1;
                }
            }
            '^' => closes += 1,
            _ => {}
        }
    }
    (opens, closes)
}

/// 行首连续的 `^` 个数（决定本行相对当前层级的回退量）
fn leading_carets(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == '^' || c.is_whitespace())
        .filter(|c| *c == '^')
        .count()
}
