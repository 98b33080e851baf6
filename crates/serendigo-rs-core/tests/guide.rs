use pretty_assertions::assert_eq;
use serendigo_rs_core::{GuideService, MediaStore, SerendigoCoreError};
use serendigo_rs_protocol::{Audience, GuideMedia, GuideRequest, GuideStyle, NewDestination};
use serendigo_rs_providers::NarrationError;
use serendigo_rs_store::{DestinationStore, StoreError};
use serendigo_rs_test_utils::{FailingNarrator, FixedNarrator, InMemoryStore};
use std::path::Path;
use std::sync::Arc;

async fn seeded_store() -> (InMemoryStore, String) {
    let store = InMemoryStore::new();
    let destination = store
        .create(NewDestination {
            place_id: "mock_kiyomizu".to_string(),
            name: "清水寺".to_string(),
            address: "京都府京都市東山区清水".to_string(),
            lat: 34.994856,
            lng: 135.785046,
        })
        .await
        .expect("create");
    (store, destination.id)
}

fn media_file(root: &Path, url: &str) -> std::path::PathBuf {
    let relative = url.trim_start_matches("/media/");
    root.join(relative)
}

#[tokio::test]
async fn synthesized_guide_is_stored_as_mp3() {
    let temp = tempfile::tempdir().expect("tmp");
    let (store, id) = seeded_store().await;
    let narrator = FixedNarrator::new("概要: 清水の舞台で知られる古刹です。").with_audio(b"ID3audio".to_vec());
    let service = GuideService::new(
        Arc::new(store),
        Arc::new(narrator.clone()),
        Arc::new(narrator.clone()),
        MediaStore::new(temp.path(), "/media"),
    );
    let request = GuideRequest {
        style: GuideStyle::Energetic,
        audience: Some(Audience {
            age: Some(10),
            gender: None,
            interests: vec!["忍者".to_string()],
        }),
        voice: Some("nova".to_string()),
    };

    let response = service.generate(&id, &request).await.expect("guide");

    assert_eq!(response.destination_id, id);
    assert_eq!(response.text, "概要: 清水の舞台で知られる古刹です。");
    let GuideMedia::Synthesized { audio_url } = &response.media else {
        panic!("expected audio, got {:?}", response.media);
    };
    assert!(audio_url.starts_with("/media/guides/") && audio_url.ends_with(".mp3"));
    let bytes = std::fs::read(media_file(temp.path(), audio_url)).expect("audio file");
    assert_eq!(bytes, b"ID3audio");

    let prompts = narrator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("元気で"));
    assert!(prompts[0].contains("興味=忍者"));
    assert_eq!(narrator.voices(), vec![Some("nova".to_string())]);
}

#[tokio::test]
async fn speech_failure_falls_back_to_text_file() {
    let temp = tempfile::tempdir().expect("tmp");
    let (store, id) = seeded_store().await;
    let service = GuideService::new(
        Arc::new(store),
        Arc::new(FixedNarrator::new("台本テキスト")),
        Arc::new(FailingNarrator::new()),
        MediaStore::new(temp.path(), "/media"),
    );

    let response = service
        .generate(&id, &GuideRequest::default())
        .await
        .expect("guide");

    let GuideMedia::Fallback { text_url } = &response.media else {
        panic!("expected fallback, got {:?}", response.media);
    };
    assert!(text_url.ends_with(".txt"));
    let text = std::fs::read_to_string(media_file(temp.path(), text_url)).expect("text file");
    assert_eq!(text, "台本テキスト");
}

#[tokio::test]
async fn text_generation_failure_is_returned() {
    let temp = tempfile::tempdir().expect("tmp");
    let (store, id) = seeded_store().await;
    let speech = FixedNarrator::new("unused");
    let service = GuideService::new(
        Arc::new(store),
        Arc::new(FailingNarrator::unavailable()),
        Arc::new(speech.clone()),
        MediaStore::new(temp.path(), "/media"),
    );

    let err = service
        .generate(&id, &GuideRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SerendigoCoreError::Narration(NarrationError::Unavailable(_))
    ));
    assert!(speech.voices().is_empty());
    assert!(!temp.path().join("guides").exists());
}

#[tokio::test]
async fn unknown_destination_is_not_found() {
    let temp = tempfile::tempdir().expect("tmp");
    let narrator = FixedNarrator::new("text");
    let service = GuideService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(narrator.clone()),
        Arc::new(narrator),
        MediaStore::new(temp.path(), "/media"),
    );
    let err = service
        .generate("missing", &GuideRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SerendigoCoreError::Store(StoreError::NotFound(_))));
}

#[tokio::test]
async fn failed_fallback_write_is_a_media_error() {
    let temp = tempfile::tempdir().expect("tmp");
    let blocker = temp.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").expect("blocker");
    let (store, id) = seeded_store().await;
    let service = GuideService::new(
        Arc::new(store),
        Arc::new(FixedNarrator::new("text")),
        Arc::new(FailingNarrator::new()),
        MediaStore::new(&blocker, "/media"),
    );

    let err = service
        .generate(&id, &GuideRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SerendigoCoreError::Media { .. }));
}
