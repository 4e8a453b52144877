// ==========================================
// 电商订单导入 - 命令行入口
// ==========================================
// 用法: retail-order-import <文件> [平台] [--db <路径>] [--lang <语言>] [--json-log]
// 输出: 导入结果 JSON 写到 stdout,日志写到 stderr
// ==========================================

use retail_order_import::api::{ApiError, ImportApi, ImportApiResponse};
use retail_order_import::{db, i18n, logging};
use std::process::ExitCode;

const USAGE: &str = "用法: retail-order-import <订单文件(.xlsx/.xls/.csv/.pdf)> [平台: shopee|tiktok|lazada|other] [--db <数据库路径>] [--lang <zh-CN|en|vi>] [--json-log]";

struct CliArgs {
    file_path: String,
    platform: String,
    db_path: Option<String>,
    lang: Option<String>,
    json_log: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut positional = Vec::new();
    let mut db_path = None;
    let mut lang = None;
    let mut json_log = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = Some(args.next().ok_or("--db 缺少参数")?),
            "--lang" => lang = Some(args.next().ok_or("--lang 缺少参数")?),
            "--json-log" => json_log = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let file_path = positional.next().ok_or_else(|| USAGE.to_string())?;
    let platform = positional.next().unwrap_or_else(|| "shopee".to_string());

    Ok(CliArgs {
        file_path,
        platform,
        db_path,
        lang,
        json_log,
    })
}

async fn run(args: &CliArgs) -> Result<ImportApiResponse, ApiError> {
    let db_path = args.db_path.clone().unwrap_or_else(db::get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let api = ImportApi::new(db_path)?;
    if args.file_path.to_lowercase().ends_with(".pdf") {
        api.import_tiktok_pdf(&args.file_path).await
    } else {
        api.import_orders(&args.file_path, &args.platform).await
    }
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    if args.json_log {
        logging::init_json();
    } else {
        logging::init();
    }
    if let Some(lang) = &args.lang {
        i18n::set_locale(lang);
    }

    tracing::info!(
        "{} v{} 启动",
        retail_order_import::APP_NAME,
        retail_order_import::VERSION
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("无法创建运行时: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(&args)) {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(json) => {
                println!("{}", json);
                eprintln!(
                    "{}",
                    i18n::t_with_args(
                        "import.success",
                        &[("valid", &response.valid_count.to_string())]
                    )
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("结果序列化失败: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "导入失败");
            let body = serde_json::json!({ "code": e.code(), "message": e.to_string() });
            println!("{}", body);
            ExitCode::FAILURE
        }
    }
}
