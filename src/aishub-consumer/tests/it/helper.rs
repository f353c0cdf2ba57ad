use std::{sync::Arc, time::Duration};

use aishub_consumer::{
    observer::SharedObserver,
    settings::{Environment, LogLevel, Settings},
    startup::App,
};
use aishub_core::{Delta, Position, RawVesselRecord};
use async_channel::Receiver;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub static SELF_ID: &str = "urn:mrn:imo:mmsi:257999999";
pub static API_KEY: &str = "test_user";

pub struct TestHelper {
    pub mock_server: MockServer,
    pub observer: SharedObserver,
    pub app: App,
    pub deltas: Receiver<Delta>,
}

impl TestHelper {
    pub async fn new(observer: Option<Position>) -> TestHelper {
        Self::with_buffer_size(observer, 100).await
    }

    pub async fn with_buffer_size(observer: Option<Position>, buffer_size: usize) -> TestHelper {
        let mock_server = MockServer::start().await;
        let mut settings = test_settings(format!("{}/ws.php", mock_server.uri()));
        settings.channel_buffer_size = buffer_size;

        let observer = SharedObserver::new(observer);
        let (app, deltas) = App::build(&settings, Arc::new(observer.clone()));

        TestHelper {
            mock_server,
            observer,
            app,
            deltas,
        }
    }

    pub async fn respond_with_vessels(&self, vessels: Vec<RawVesselRecord>) {
        let body = json!([
            { "ERROR": false, "USERNAME": API_KEY, "FORMAT": "HUMAN", "RECORDS": vessels.len() },
            vessels,
        ]);
        self.respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .await;
    }

    pub async fn respond_with_status(&self, status: Value) {
        self.respond_with(ResponseTemplate::new(200).set_body_string(json!([status]).to_string()))
            .await;
    }

    pub async fn respond_with(&self, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/ws.php"))
            .respond_with(template)
            .mount(&self.mock_server)
            .await;
    }

    /// All deltas emitted so far.
    pub fn emitted(&self) -> Vec<Delta> {
        let mut out = Vec::new();
        while let Ok(delta) = self.deltas.try_recv() {
            out.push(delta);
        }
        out
    }

    pub async fn num_requests(&self) -> usize {
        self.mock_server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or_default()
    }
}

pub fn test_settings(url: String) -> Settings {
    Settings {
        log_level: LogLevel::Debug,
        environment: Environment::Test,
        api_key: API_KEY.to_string(),
        url,
        update_rate: Duration::from_secs(61),
        box_size: Some(10.0),
        self_id: SELF_ID.to_string(),
        observer: None,
        channel_buffer_size: 100,
        max_retries: 0,
    }
}

pub fn bergen() -> Position {
    Position::new(60.39299, 5.32415)
}
