// src/main.rs

use std::fs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;

use videobyte_adapter::adapters::videobyte;
use videobyte_adapter::adapters::videobyte::info::BIDDER_INFO;
use videobyte_adapter::adapters::videobyte::params::validate_params;
use videobyte_adapter::adapters::{Bidder, BidderName, ExtImpBidder, RequestData, ResponseData};
use videobyte_adapter::bidding::run_bidder;
use videobyte_adapter::config::{AdapterConfig, FileConfigSource, DEFAULT_CONFIG_FILE};
use videobyte_adapter::logging::init_tracing;
use videobyte_adapter::mock_exchange;
use videobyte_adapter::openrtb::request::BidRequest;
use videobyte_adapter::transport::http_client::DEFAULT_TIMEOUT_MS;
use videobyte_adapter::transport::HttpTransport;

const BIDDER: &str = "videobyte";

#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "VideoByte OpenRTB bidder adapter")]
struct CliArgs {
    #[arg(long, default_value = "logs")]
    log_dir: String,
    /// adapter 配置文件（JSON）
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,
    /// 覆盖配置文件中的 endpoint
    #[arg(long, env = "VIDEOBYTE_ENDPOINT")]
    endpoint: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 根据 OpenRTB 请求生成出站请求
    Build {
        #[arg(long)]
        request: String,
    },
    /// 把交易所响应翻译成出价
    Parse {
        #[arg(long)]
        request: String,
        #[arg(long, default_value_t = 200)]
        status: u16,
        /// 响应体文件，缺省为空
        #[arg(long)]
        body: Option<String>,
    },
    /// 生成请求、逐个发送并解析响应
    Run {
        #[arg(long)]
        request: String,
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,
    },
    /// 校验请求中每个 impression 的 bidder 参数
    Validate {
        #[arg(long)]
        request: String,
    },
    /// 打印 bidder 能力声明
    Info,
    /// 启动模拟交易所
    MockExchange {
        #[arg(short, long, default_value_t = 9001)]
        port: u16,
    },
}

fn read_request(path: &str) -> Result<BidRequest> {
    let content = fs::read_to_string(path).with_context(|| format!("unable to read {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("unable to parse bid request {}", path))
}

fn load_adapter(args: &CliArgs) -> Result<Box<dyn Bidder>> {
    let source = FileConfigSource::new(&args.config);
    let config = AdapterConfig::resolve(&source, args.endpoint.as_deref())
        .context("unable to load adapter config")?;
    Ok(videobyte::builder(BidderName(BIDDER.to_string()), &config)?)
}

fn errors_json<E: std::fmt::Display>(errors: &[E]) -> Vec<Value> {
    errors.iter().map(|e| json!(e.to_string())).collect()
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let _guard = init_tracing(&args.log_dir).context("unable to set global tracing subscriber")?;
    info!(command = ?args.command, "videobyte adapter starting");

    match &args.command {
        Command::Build { request } => {
            let adapter = load_adapter(&args)?;
            let request = read_request(request)?;
            let (requests, errors) = adapter.make_requests(&request);
            print_json(&json!({
                "requests": requests.iter().map(RequestData::to_json).collect::<Vec<_>>(),
                "errors": errors_json(&errors),
            }))?;
        }
        Command::Parse { request, status, body } => {
            let adapter = load_adapter(&args)?;
            let request = read_request(request)?;
            let body = match body {
                Some(path) => fs::read(path).with_context(|| format!("unable to read {}", path))?,
                None => Vec::new(),
            };
            let (requests, _) = adapter.make_requests(&request);
            let external = requests.into_iter().next().context("request produced no outbound call")?;
            let (response, errors) = adapter.make_bids(&request, &external, &ResponseData::new(*status, body));
            print_json(&json!({
                "response": response,
                "errors": errors_json(&errors),
            }))?;
        }
        Command::Run { request, timeout_ms } => {
            let adapter = load_adapter(&args)?;
            let request = read_request(request)?;
            let transport = HttpTransport::new(*timeout_ms);
            let outcome = run_bidder(&BidderName(BIDDER.to_string()), adapter.as_ref(), &transport, &request).await;
            print_json(&json!({
                "currency": outcome.currency,
                "bids": outcome.bids,
                "errors": outcome.errors.iter().map(|e| e.to_json()).collect::<Vec<_>>(),
            }))?;
        }
        Command::Validate { request } => {
            let request = read_request(request)?;
            let mut report = Vec::with_capacity(request.imp.len());
            for imp in &request.imp {
                let params = imp
                    .ext
                    .clone()
                    .and_then(|ext| serde_json::from_value::<ExtImpBidder>(ext).ok())
                    .map(|ext| ext.bidder)
                    .unwrap_or(Value::Null);
                let errors = validate_params(&params).err().unwrap_or_default();
                report.push(json!({ "imp_id": imp.id, "valid": errors.is_empty(), "errors": errors_json(&errors) }));
            }
            print_json(&Value::Array(report))?;
        }
        Command::Info => {
            print_json(&json!({ "bidder": BIDDER, "info": &*BIDDER_INFO }))?;
        }
        Command::MockExchange { port } => {
            tokio::select! {
                result = mock_exchange::start_mock_exchange(*port) => {
                    result.context("mock exchange stopped")?;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down mock exchange...");
                }
            }
        }
    }

    Ok(())
}
