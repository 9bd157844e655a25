use anyhow::Context;
use clap::Parser;
use groups_sync::app::{build_engine, load_credentials, load_groups_map};
use groups_sync::utils::{logger, validation::Validate};
use groups_sync::{CliConfig, LocalStorage, SyncConfig, SyncError, SyncReport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting groups-sync");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match SyncConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 相對路徑以設定檔所在目錄為準
    let storage = LocalStorage::beside(&args.config);

    if let Some(groups_map) = &args.groups_map {
        config.groups = load_groups_map(&storage, groups_map)
            .await
            .with_context(|| format!("Unable to load groups map {}", groups_map))?;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let credentials = load_credentials(&storage, &config.google.credentials_file)
        .await
        .with_context(|| {
            format!(
                "Unable to load Google credentials from {}",
                config.google.credentials_file
            )
        })?;
    let engine = build_engine(&config.source, &config.google, credentials)
        .context("Unable to set up API clients")?;

    let result = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no group changes will be made");
        engine.dry_run(&config.groups).await
    } else {
        engine.run(&config.groups).await
    };

    match result {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            report_failure(&e);
            std::process::exit(2);
        }
    }
}

fn print_report(report: &SyncReport) {
    for summary in &report.summaries {
        println!("{}", summary);
    }
    let verb = if report.dry_run { "would be" } else { "were" };
    println!(
        "✅ {} group pair(s) processed: {} member(s) {} added, {} {} deleted",
        report.summaries.len(),
        report.total_added(),
        verb,
        report.total_deleted(),
        verb
    );
}

fn report_failure(error: &SyncError) {
    let report = error.failure_report();
    tracing::error!("❌ {}", report);
    eprintln!("❌ {}", report);
    eprintln!("💡 Changes already applied were kept; the next run will pick up the rest");
}
