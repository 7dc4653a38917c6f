use std::process::ExitCode;
use std::sync::Arc;

use hometax_watch::core::failure_response;
use hometax_watch::{
    ChromeExtractor, MongoHistory, Runner, SlackNotifier, WatchConfig, WatchError,
};
use log::error;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .init();

    let config = match WatchConfig::from_env() {
        Ok(config) => config,
        Err(err) => return bail(&err),
    };

    let history =
        match MongoHistory::new(&config.mongo_uri, &config.database, &config.collection).await {
            Ok(history) => Arc::new(history),
            Err(err) => return bail(&err),
        };

    let notifier =
        match SlackNotifier::new(config.webhook_url.clone(), config.timezone_label.clone()) {
            Ok(notifier) => notifier,
            Err(err) => return bail(&err),
        };

    let extractor = Box::new(ChromeExtractor::new(
        config.target_url.clone(),
        config.banner_container_id.clone(),
    ));

    let runner = Runner::new(extractor, history, notifier);
    let response = runner.handle().await;
    println!("{}", response.body);

    if response.status_code == 200 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn bail(err: &WatchError) -> ExitCode {
    error!("Aborting before scrape: {}", err);
    println!("{}", failure_response(err).body);
    ExitCode::FAILURE
}
