//! Command-line tool for recommending English variable names for Chinese
//! phrases.
//!
//! # Usage
//!
//! ```bash
//! # Convert a phrase using the default camelCase style
//! zhv 用户名称
//!
//! # Pick a naming style
//! zhv --style snake 数据库连接
//!
//! # Buffer the full response instead of streaming
//! zhv --no-stream 文件上传状态
//!
//! # Manage configuration
//! zhv config set api_url "https://api.openai.com/v1"
//! zhv config set model "gpt-3.5-turbo"
//! zhv config set api_key "sk-..."
//! zhv config show
//!
//! # Show version information
//! zhv version
//! ```
//!
//! Configuration may also be supplied via the `ZHV_API_URL`, `ZHV_MODEL`,
//! and `ZHV_KEY` environment variables, which override the configuration
//! file at `~/.zhv/setting.json`.

use std::cell::Cell;
use std::sync::Mutex;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use zhv::{Config, Converter, NamingStyle, PlainTextRenderer, Result};

/// Usage line shown by the argument parser.
const USAGE: &str = "zhv [OPTIONS] <中文文本>...";

/// Remediation text shown when the configuration is incomplete.
const CONFIG_INCOMPLETE_HELP: &str = r#"配置不完整，请设置以下配置：

方式1 - 使用环境变量：
  export ZHV_API_URL="your-api-url"
  export ZHV_MODEL="your-model"
  export ZHV_KEY="your-api-key"

方式2 - 使用配置文件：
  zhv config set api_url "your-api-url"
  zhv config set model "your-model"
  zhv config set api_key "your-api-key"

方式3 - 查看当前配置：
  zhv config show"#;

/// Command-line arguments for the zhv tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
struct Args {
    /// Naming style for generated candidates.
    #[arrrg(optional, "Naming style: camel, pascal, snake, kebab (default: camel)", "STYLE")]
    style: Option<String>,

    /// Print the resolved configuration before converting.
    #[arrrg(flag, "Print the resolved configuration before converting")]
    verbose: bool,

    /// Buffer the full response instead of streaming it.
    #[arrrg(flag, "Buffer the full response instead of streaming")]
    no_stream: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    no_color: bool,
}

/// Main entry point for the zhv command-line tool.
#[tokio::main]
async fn main() {
    let (args, free) = Args::from_command_line_relaxed(USAGE);

    if free.is_empty() {
        eprintln!("用法: {USAGE}");
        std::process::exit(1);
    }

    let outcome = match free[0].as_str() {
        "version" => {
            print_version();
            Ok(())
        }
        "config" => run_config(&free[1..]),
        _ => convert_and_display(&args, free.join(" ")).await,
    };

    if let Err(err) = outcome {
        eprintln!("错误: {err}");
        std::process::exit(1);
    }
}

/// Handle the `config` subcommand.
fn run_config(rest: &[String]) -> Result<()> {
    match rest.first().map(String::as_str) {
        Some("set") if rest.len() == 3 => {
            let mut config = Config::load();
            config.set(&rest[1], &rest[2])?;
            config.save()?;
            println!("配置 {} 已设置", rest[1]);
            Ok(())
        }
        Some("show") if rest.len() == 1 => {
            show_config();
            Ok(())
        }
        _ => {
            eprintln!("用法: zhv config set <key> <value> | zhv config show");
            std::process::exit(1);
        }
    }
}

/// Print the current configuration with the API key masked.
fn show_config() {
    let config = Config::load();
    println!("当前配置:");
    println!("  API地址: {}", config.api_url);
    println!("  模型: {}", config.model);
    if config.api_key.is_empty() {
        println!("  API密钥: (未设置)");
    } else {
        println!("  API密钥: {}", config.masked_api_key());
    }
    println!();
    if config.is_valid() {
        println!("配置状态: ✓ 配置完整");
    } else {
        println!("配置状态: ✗ 配置不完整");
    }
}

/// Print version and build metadata.
fn print_version() {
    println!("ZHV (中文变量名推荐工具)");
    println!("版本: {}", env!("CARGO_PKG_VERSION"));
    println!("构建时间: {}", option_env!("ZHV_BUILD_TIME").unwrap_or("unknown"));
    println!("Git提交: {}", option_env!("ZHV_GIT_COMMIT").unwrap_or("unknown"));
    println!(
        "平台: {}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}

/// Convert a phrase and display the recommendations.
async fn convert_and_display(args: &Args, text: String) -> Result<()> {
    let config = Config::load();
    if !config.is_valid() {
        eprintln!("{CONFIG_INCOMPLETE_HELP}");
        std::process::exit(1);
    }

    let style: NamingStyle = args
        .style
        .as_deref()
        .unwrap_or("camel")
        .parse()
        .unwrap_or_default();

    let mut renderer = PlainTextRenderer::with_color(!args.no_color);
    if args.verbose {
        renderer.print_info(&format!(
            "使用配置: API={}, Model={}",
            config.api_url, config.model
        ));
        renderer.print_info(&format!("转换文本: {text}"));
        renderer.print_info(&format!("命名风格: {style}"));
        println!();
    }

    println!("中文: {text}");
    println!("风格: {}", style.description());
    println!("正在生成变量名推荐...");
    println!();

    let converter = Converter::new(config)?;

    if args.no_stream {
        let results = converter.convert(&text, style).await?;
        print_results(&mut renderer, &results);
        return Ok(());
    }

    // Interleaved streaming prints are serialized through one mutex.
    let renderer = Mutex::new(renderer);
    let has_content = Cell::new(false);

    converter
        .convert_stream(
            &text,
            style,
            |content| {
                let mut renderer = renderer.lock().expect("renderer mutex poisoned");
                if !has_content.get() {
                    renderer.print_text("AI回复: \n");
                    has_content.set(true);
                }
                renderer.print_text(content);
            },
            |results| {
                let mut renderer = renderer.lock().expect("renderer mutex poisoned");
                renderer.finish_response();
                renderer.print_text("\n");
                print_results(&mut renderer, &results);
            },
        )
        .await
}

/// Print the numbered candidate list.
fn print_results(renderer: &mut PlainTextRenderer, results: &[String]) {
    if results.is_empty() {
        renderer.print_text("未找到合适的变量名推荐\n");
        return;
    }
    renderer.print_text("推荐的变量名:\n");
    for (i, name) in results.iter().enumerate() {
        renderer.print_text(&format!("  {}. {name}\n", i + 1));
    }
}
