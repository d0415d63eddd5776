use clap::Parser;
use price_alert::utils::{logger, validation::Validate};
use price_alert::{
    CliConfig, HttpFetcher, LocalStorage, PriceAlertConfig, PriceAlertEngine, PriceAlertError,
    PricePipeline,
};
use std::time::Duration;

fn fail(e: &PriceAlertError, code: i32) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting pricealert");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        fail(&e, 1);
    }

    tracing::info!("📁 Loading configuration from: {}", cli.config);
    let config = match PriceAlertConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Could not load config file '{}': {}", cli.config, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        fail(&e, 1);
    }
    tracing::info!("✅ Configuration loaded and validated successfully");

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no shop will be contacted");
        print!("{}", config.describe_plan());
        return Ok(());
    }

    let fetcher = match HttpFetcher::new(config.user_agent(), config.timeout()) {
        Ok(fetcher) => fetcher,
        Err(e) => fail(&e, 3),
    };
    let storage = LocalStorage::new(cli.base_dir());
    let mut pipeline = match PricePipeline::new(storage, fetcher, config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&e, e.exit_code()),
    };
    if cli.no_alerts {
        tracing::info!("🔕 Alerts disabled for this run");
        pipeline = pipeline.with_notifiers(Vec::new());
    }

    let engine = PriceAlertEngine::new(pipeline);

    if let Some(seconds) = cli.interval {
        let runs = engine
            .run_periodically(Duration::from_secs(seconds), cli.max_runs)
            .await;
        tracing::info!("Finished after {} runs", runs);
        return Ok(());
    }

    match engine.run().await {
        Ok(report) => {
            let code = report.exit_code();
            if code != 0 {
                eprintln!(
                    "⚠️ {} of {} price checks failed",
                    report.failed_checks(),
                    report.total_checks()
                );
                std::process::exit(code);
            }
        }
        Err(e) => fail(&e, e.exit_code().max(1)),
    }

    Ok(())
}
