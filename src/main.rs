use clap::Parser;
use dnscf::adapters::cloudflare::{CloudflareDns, CF_API_BASE};
use dnscf::adapters::pushplus::{PushPlusNotifier, PUSHPLUS_BASE};
use dnscf::adapters::uouin::UouinSource;
use dnscf::utils::{logger, validation::Validate};
use dnscf::{DomainSpec, JobConfig, ReconcileJob, RunStatus};

#[tokio::main]
async fn main() {
    let config = JobConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting dnscf ({} line)", config.line);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let domain_spec = DomainSpec::parse(&config.dns_name);

    let source = UouinSource::new(
        config.source_url.clone(),
        config.line.clone(),
        config.max_retries,
        config.retry_delay(),
        config.timeout(),
    );
    let provider = CloudflareDns::new(
        CF_API_BASE.to_string(),
        config.api_token.clone(),
        config.zone_id.clone(),
        config.timeout(),
    );
    let notifier = PushPlusNotifier::new(
        PUSHPLUS_BASE.to_string(),
        config.pushplus_token.clone(),
        config.push_title(),
        config.timeout(),
    );

    let job = ReconcileJob::new(source, provider, notifier, domain_spec);
    let report = job.run().await;

    match report.status {
        RunStatus::Completed => {
            tracing::info!("✅ run completed: {} records updated", report.outcomes.len());
            println!("✅ dnscf completed: {} records updated", report.outcomes.len());
        }
        RunStatus::PartialFailure => {
            let failed = report.outcomes.iter().filter(|o| !o.is_success()).count();
            tracing::error!(
                "⚠️ run partially failed: {}/{} outcomes failed",
                failed,
                report.outcomes.len()
            );
            eprintln!("⚠️ dnscf partially failed ({} failures)", failed);
        }
        RunStatus::Aborted(reason) => {
            tracing::error!("❌ run aborted before any DNS change: {:?}", reason);
            eprintln!("❌ dnscf aborted: {:?}", reason);
        }
    }

    if !report.skipped.is_empty() {
        tracing::warn!(
            "{} domains skipped for lack of candidates: {:?}",
            report.skipped.len(),
            report.skipped
        );
    }

    // 讓外部調度器能區分完全成功 / 部分成功 / 中止
    let exit_code = report.status.exit_code();
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
