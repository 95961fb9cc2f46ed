//! Integration tests for the playback endpoint service

use playlog_core::config::{ContextConfig, UserConfig};
use playlog_core::records::record_name;
use playlog_core::{
    AbstractEvent, ContextDirectory, Error, EventLog, MemoryEventLog, PlaybackService,
    PlaylogConfig, RelayCall, UserId,
};
use std::sync::Arc;

fn config() -> PlaylogConfig {
    PlaylogConfig::from_toml_str(
        r#"
        [[users]]
        id = 7
        token = "student"

        [[contexts]]
        id = 42
        name = "Course: Media Literacy"
        members = [7]

        [[contexts]]
        id = 1
        name = "Front page"
        open = true
        "#,
    )
    .unwrap()
}

fn service() -> (PlaybackService, Arc<MemoryEventLog>) {
    let log = Arc::new(MemoryEventLog::new());
    let service = PlaybackService::new(ContextDirectory::from_config(&config()), log.clone());
    (service, log)
}

fn decode(json: &str) -> RelayCall {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_every_mapped_event_has_a_record_kind() {
    let (service, log) = service();

    tokio_test::block_on(async {
        for event in AbstractEvent::ALL {
            if event == AbstractEvent::Failed {
                continue;
            }
            let call = decode(&format!(
                r#"{{"methodname":"playback_event","args":{{"context":42,"event":"{event}","title":"Intro"}}}}"#
            ));
            service.call(UserId(7), call).await.unwrap();
        }

        let kinds: Vec<_> = log.records(42).await.iter().map(|r| record_name(r.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                "playback_started",
                "playback_paused",
                "playback_seeked",
                "playback_resumed",
                "playback_completed",
            ]
        );
    });
}

#[tokio::test]
async fn test_numeric_fields_default_to_zero() {
    let (service, log) = service();

    service
        .call(
            UserId(7),
            decode(r#"{"methodname":"playback_event","args":{"context":42,"event":"seeked","title":"Intro"}}"#),
        )
        .await
        .unwrap();

    let record = &log.records(42).await[0];
    assert_eq!(record.other.position, 0);
    assert_eq!(record.other.offset, Some(0));
}

#[tokio::test]
async fn test_open_context_accepts_any_user() {
    let (service, log) = service();

    service
        .call(
            UserId(1234),
            decode(r#"{"methodname":"playback_failed","args":{"context":1,"title":"Promo","position":2,"code":1,"message":"x"}}"#),
        )
        .await
        .unwrap();

    let records = service.records(UserId(1234), 1).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, AbstractEvent::Failed);
    assert_eq!(log.len().await, 1);
}

#[tokio::test]
async fn test_records_require_membership() {
    let (service, _) = service();
    assert!(matches!(
        service.records(UserId(8), 42).await,
        Err(Error::AccessDenied { .. })
    ));
}

#[test]
fn test_unknown_method_fails_to_decode() {
    let result: Result<RelayCall, _> = serde_json::from_str(
        r#"{"methodname":"playback_rewound","args":{"context":1,"title":"x"}}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_directory_from_config() {
    let directory = ContextDirectory::from_config(&config());
    assert_eq!(directory.resolve(42).unwrap().name, "Course: Media Literacy");
    assert!(directory.resolve(42).unwrap().allows(UserId(7)));
    assert!(!directory.resolve(42).unwrap().allows(UserId(8)));
    assert!(directory.resolve(1).unwrap().allows(UserId(8)));

    let extra = PlaylogConfig {
        users: vec![UserConfig { id: 3, token: "t".into() }],
        contexts: vec![ContextConfig { id: 5, name: String::new(), members: vec![3], open: false }],
        ..Default::default()
    };
    let directory = ContextDirectory::from_config(&extra);
    assert_eq!(directory.authenticate("t").unwrap(), UserId(3));
}
