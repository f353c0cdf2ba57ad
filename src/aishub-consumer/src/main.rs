use std::sync::Arc;

use aishub_consumer::{observer::SharedObserver, settings::Settings, startup::App};
use aishub_core::Position;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let settings = Settings::new().unwrap();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::from(&settings.log_level).as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let observer = SharedObserver::new(settings.observer);
    let (app, deltas) = App::build(&settings, Arc::new(observer.clone()));

    // Observer fixes arrive as json lines on stdin.
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match serde_json::from_str::<Position>(&line) {
                    Ok(position) => observer.update(Some(position)),
                    Err(e) => warn!("invalid observer position '{line}': {e:?}"),
                },
                Ok(None) => break,
                Err(e) => {
                    error!("failed to read observer position: {e:?}");
                    break;
                }
            }
        }
    });

    // Deltas leave as json lines on stdout.
    tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Ok(delta) = deltas.recv().await {
            match serde_json::to_vec(&delta) {
                Ok(mut line) => {
                    line.push(b'\n');
                    if let Err(e) = stdout.write_all(&line).await.and(stdout.flush().await) {
                        error!("failed to write delta: {e:?}");
                    }
                }
                Err(e) => error!("failed to serialize delta: {e:?}"),
            }
        }
    });

    info!("starting aishub consumer...");
    let handle = app.start();

    tokio::signal::ctrl_c().await.unwrap();
    handle.stop().await;
}
