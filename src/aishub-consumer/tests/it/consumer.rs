use std::{collections::HashMap, time::Duration};

use aishub_consumer::error::Error;
use aishub_core::{BOUNDING_BOX_PATH, Mmsi, RawVesselRecord, compute_bounding_box};
use serde_json::json;
use wiremock::ResponseTemplate;

use crate::helper::{API_KEY, SELF_ID, TestHelper, bergen};

#[tokio::test]
async fn test_cycle_emits_bounding_box_then_vessels_in_order() {
    let helper = TestHelper::new(Some(bergen())).await;
    let first = RawVesselRecord::test_default(Some(Mmsi::test_new(257000001)));
    let second = RawVesselRecord::test_default(Some(Mmsi::test_new(257000002)));
    helper.respond_with_vessels(vec![first, second]).await;

    helper.app.run_single().await.unwrap();

    let deltas = helper.emitted();
    assert_eq!(3, deltas.len());

    let expected_box = compute_bounding_box(&bergen(), Some(10.0)).unwrap();
    assert_eq!(format!("vessels.{SELF_ID}"), deltas[0].context);
    assert_eq!(None, deltas[0].timestamp());
    assert_eq!(
        Some(&serde_json::to_value(expected_box).unwrap()),
        deltas[0].value(BOUNDING_BOX_PATH)
    );

    assert_eq!("vessels.urn:mrn:imo:mmsi:257000001", deltas[1].context);
    assert_eq!("vessels.urn:mrn:imo:mmsi:257000002", deltas[2].context);
    assert_eq!(Some(&json!("257000002")), deltas[2].value("mmsi"));
}

#[tokio::test]
async fn test_query_is_parametrized_by_the_bounding_box() {
    let helper = TestHelper::new(Some(bergen())).await;
    helper.respond_with_vessels(vec![]).await;

    helper.app.run_single().await.unwrap();

    let requests = helper.mock_server.received_requests().await.unwrap();
    assert_eq!(1, requests.len());

    let query: HashMap<String, String> = requests[0].url.query_pairs().into_owned().collect();
    let expected_box = compute_bounding_box(&bergen(), Some(10.0)).unwrap();

    assert_eq!(API_KEY, query["username"]);
    assert_eq!("1", query["format"]);
    assert_eq!("json", query["output"]);
    assert_eq!("0", query["compress"]);
    assert_eq!(expected_box.latmin, query["latmin"].parse::<f64>().unwrap());
    assert_eq!(expected_box.latmax, query["latmax"].parse::<f64>().unwrap());
    assert_eq!(expected_box.lonmin, query["lonmin"].parse::<f64>().unwrap());
    assert_eq!(expected_box.lonmax, query["lonmax"].parse::<f64>().unwrap());
}

#[tokio::test]
async fn test_error_status_aborts_the_cycle() {
    let helper = TestHelper::new(Some(bergen())).await;
    helper
        .respond_with_status(json!({ "ERROR": true, "ERROR_MESSAGE": "Too frequent requests!" }))
        .await;

    let err = helper.app.run_single().await.unwrap_err();
    assert!(matches!(
        err.core(),
        Some(aishub_core::Error::Upstream { .. })
    ));

    // Only the bounding box made it out.
    let deltas = helper.emitted();
    assert_eq!(1, deltas.len());
    assert!(deltas[0].value(BOUNDING_BOX_PATH).is_some());
}

#[tokio::test]
async fn test_non_success_response_is_a_failed_request() {
    let helper = TestHelper::new(Some(bergen())).await;
    helper
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .await;

    let err = helper.app.run_single().await.unwrap_err();
    assert!(matches!(err, Error::FailedRequest { .. }));
    assert_eq!(Some(403), err.status().map(|s| s.as_u16()));
}

#[tokio::test]
async fn test_no_observer_position_skips_the_cycle() {
    let helper = TestHelper::new(None).await;
    helper.respond_with_vessels(vec![]).await;

    helper.app.run_single().await.unwrap();

    assert!(helper.emitted().is_empty());
    assert_eq!(0, helper.num_requests().await);
}

#[tokio::test]
async fn test_invalid_observer_position_fails_the_cycle() {
    let helper = TestHelper::new(Some(bergen())).await;
    helper.respond_with_vessels(vec![]).await;
    helper
        .observer
        .update(Some(aishub_core::Position::new(f64::NAN, 5.0)));

    let err = helper.app.run_single().await.unwrap_err();
    assert!(matches!(
        err.core(),
        Some(aishub_core::Error::InvalidPosition { .. })
    ));
    assert!(helper.emitted().is_empty());
    assert_eq!(0, helper.num_requests().await);
}

#[tokio::test]
async fn test_observer_itself_and_malformed_vessels_are_not_emitted() {
    let helper = TestHelper::new(Some(bergen())).await;
    let own = RawVesselRecord::test_default(Some(Mmsi::test_new(257999999)));
    let mut malformed = RawVesselRecord::test_default(None);
    malformed.remove("MMSI");
    let other = RawVesselRecord::test_default(Some(Mmsi::test_new(257000003)));
    helper
        .respond_with_vessels(vec![own, malformed, other])
        .await;

    helper.app.run_single().await.unwrap();

    let contexts: Vec<_> = helper
        .emitted()
        .into_iter()
        .skip(1)
        .map(|d| d.context)
        .collect();
    assert_eq!(vec!["vessels.urn:mrn:imo:mmsi:257000003"], contexts);
}

#[tokio::test]
async fn test_started_app_polls_immediately_and_stops() {
    let helper = TestHelper::new(Some(bergen())).await;
    helper.respond_with_vessels(vec![RawVesselRecord::test_default(None)]).await;

    let TestHelper {
        mock_server: _mock_server,
        app,
        deltas,
        ..
    } = helper;

    let handle = app.start();

    let first = deltas.recv().await.unwrap();
    assert!(first.value(BOUNDING_BOX_PATH).is_some());
    let second = deltas.recv().await.unwrap();
    assert!(second.value("mmsi").is_some());

    handle.stop().await;
    assert!(deltas.is_closed());
}

#[tokio::test]
async fn test_poll_loop_exits_when_all_receivers_are_dropped() {
    let helper = TestHelper::with_buffer_size(Some(bergen()), 1).await;
    helper.respond_with_vessels(vec![]).await;

    let TestHelper {
        mock_server,
        app,
        deltas,
        ..
    } = helper;
    drop(deltas);

    let handle = app.start();
    tokio::time::sleep(Duration::from_millis(200)).await;

    tokio::time::timeout(Duration::from_secs(3), handle.stop())
        .await
        .unwrap();
    // The bounding box could not be delivered, so nothing was fetched.
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stop_interrupts_a_cycle_blocked_on_a_full_channel() {
    let helper = TestHelper::with_buffer_size(Some(bergen()), 1).await;
    helper
        .respond_with_vessels(vec![
            RawVesselRecord::test_default(None),
            RawVesselRecord::test_default(None),
        ])
        .await;

    let TestHelper {
        mock_server: _mock_server,
        app,
        deltas,
        ..
    } = helper;

    let handle = app.start();
    tokio::time::sleep(Duration::from_millis(200)).await;

    tokio::time::timeout(Duration::from_secs(3), handle.stop())
        .await
        .unwrap();

    let first = deltas.recv().await.unwrap();
    assert!(first.value(BOUNDING_BOX_PATH).is_some());
    assert!(deltas.is_closed());
}
