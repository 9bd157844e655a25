use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use groups_sync::app::{build_engine, load_credentials, load_groups_map};
use groups_sync::utils::{logger, validation::Validate};
use groups_sync::{GroupSyncSummary, LambdaConfig, S3Storage};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct Request {
    pub s3_bucket: Option<String>,
    pub groups_map_file: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub dry_run: bool,
    pub groups: Vec<GroupSyncSummary>,
    pub members_added: usize,
    pub members_deleted: usize,
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting groups-sync Lambda function");

    let (request, _context) = event.into_parts();
    let mut config = LambdaConfig::from_env()?;

    // 事件中的設定優先於環境變數
    if let Some(bucket) = request.s3_bucket {
        config.s3_bucket = bucket;
    }
    if let Some(file) = request.groups_map_file {
        config.groups_map_file = file;
    }
    config.validate()?;

    tracing::info!(
        "Groups map S3: {} / {}",
        config.s3_bucket,
        config.groups_map_file
    );

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .region(Region::new(config.s3_region.clone()))
        .build();
    let storage = S3Storage::new(S3Client::from_conf(s3_config), config.s3_bucket.clone());

    let mappings = load_groups_map(&storage, &config.groups_map_file).await?;
    let credentials = load_credentials(&storage, &config.google.credentials_file).await?;
    let engine = build_engine(&config.source, &config.google, credentials)?;

    let result = if request.dry_run {
        engine.dry_run(&mappings).await
    } else {
        engine.run(&mappings).await
    };
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{}", e.failure_report());
            return Err(e.into());
        }
    };

    let response = Response {
        message: if report.dry_run {
            "Group sync planned (dry run)".to_string()
        } else {
            "Group sync completed successfully".to_string()
        },
        dry_run: report.dry_run,
        members_added: report.total_added(),
        members_deleted: report.total_deleted(),
        groups: report.summaries,
    };

    tracing::info!("groups-sync Lambda function completed successfully");
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
