//! # cortexc - Cortex 命令行
//!
//! 运行 `.ctx` 脚本，或进入交互式求值循环。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p cortexc -- run hello.ctx
//! cargo run -p cortexc -- run hello.ctx --verbose
//! cargo run -p cortexc -- repl
//! ```
//!
//! 日志级别由 `RUST_LOG` 控制，默认 warn，输出到 stderr。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ctx_runtime::{Interpreter, Value};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use tracing::debug;

#[derive(Parser)]
#[command(name = "cortexc")]
#[command(about = "Cortex 语言解释器")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 Cortex 程序
    Run {
        /// Cortex 源文件（.ctx）
        file: PathBuf,

        /// 额外打印程序的最终结果
        #[arg(short, long)]
        verbose: bool,
    },

    /// 启动交互式求值循环
    Repl,
}

fn main() -> ExitCode {
    init_tracing();

    if let Err(e) = real_main() {
        eprintln!("错误: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, verbose } => run_file(&file, verbose),
        Commands::Repl => repl(),
    }
}

fn run_file(file: &PathBuf, verbose: bool) -> anyhow::Result<()> {
    if file.extension().is_none_or(|ext| ext != "ctx") {
        anyhow::bail!("'{}' 不是 Cortex 源文件（.ctx）", file.display());
    }

    let source = std::fs::read_to_string(file)
        .with_context(|| format!("无法读取 '{}'", file.display()))?;

    debug!("运行 {}", file.display());

    let mut interp = Interpreter::new();
    let result = interp.eval_source(&source)?;

    print!("{}", interp.take_output());
    if verbose && result != Value::Null {
        println!("程序返回: {result}");
    }
    Ok(())
}

/// 交互循环：环境跨行保留，单行求值错误只提示不退出
fn repl() -> anyhow::Result<()> {
    println!("Cortex 交互式求值（输入 exit 或 quit 退出，Ctrl+D 结束）");

    let mut line_editor = Reedline::create();
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("cortex".to_string()),
        DefaultPromptSegment::Empty,
    );
    let mut interp = Interpreter::new();

    loop {
        match line_editor.read_line(&prompt)? {
            Signal::Success(buffer) => {
                let line = buffer.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "exit" | "quit") {
                    return Ok(());
                }

                match interp.eval_source(line) {
                    Ok(result) => {
                        flush_output(&mut interp);
                        if result != Value::Null {
                            println!("{result}");
                        }
                    }
                    Err(e) => {
                        // 输出缓冲里可能已有本行 print 的内容，先刷出
                        flush_output(&mut interp);
                        eprintln!("错误: {e}");
                    }
                }
            }
            Signal::CtrlD | Signal::CtrlC => return Ok(()),
        }
    }
}

/// 把解释器缓冲的 print 输出刷到终端（交互模式下补一个换行）
fn flush_output(interp: &mut Interpreter) {
    let output = interp.take_output();
    if !output.is_empty() {
        println!("{output}");
    }
}
