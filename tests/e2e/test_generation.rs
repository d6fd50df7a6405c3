use crate::e2e::helpers;

use chrono::{DateTime, Utc};
use helpers::TestContext;
use hyper::StatusCode;
use serde_json::{json, Value};
use test_context::test_context;
use uuid::Uuid;

fn generations_path(session_id: Uuid) -> String {
    format!("/api/sessions/{}/generations", session_id)
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_clip_with_emotion_coordinates(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("user@example.com");
    let token = ctx.token_for(&user.id);
    let voice = ctx.fixtures.create_voice(user.id, "Mine", false).await;
    let session = ctx.fixtures.create_session(user.id, "Takes").await;

    let response = ctx
        .client
        .post_with_auth(
            &generations_path(session.id),
            &json!({ "voice_id": voice.id, "text": "  Get   out\n of my   house  ", "emotion": "Angry" }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["emotion"], "angry");
    assert_eq!(body["arousal"], 0.9);
    assert_eq!(body["valence"], 0.1);
    assert_eq!(body["voice_id"], voice.id.to_string());
    assert_eq!(body["session_id"], session.id.to_string());
    assert!(body["is_liked"].is_null());
    assert!(body.get("file_path").is_none(), "Storage path must not leak");

    let requests = ctx.tts.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "Get out of my house");
    assert_eq!(requests[0].arousal, 0.9);
    assert_eq!(requests[0].valence, 0.1);
    assert!(requests[0].speaker_wav_len > 44);

    let clip_id = Uuid::parse_str(&response.str_field("id")).unwrap();
    let clip = ctx.store.clip(clip_id).unwrap();
    assert!(clip.file_path.starts_with("memory://generated-audio/"));
    assert!(ctx.blobs.object(&clip.file_path).is_some());

    // Generating bumps the session's activity time
    let touched = ctx.store.session(session.id).unwrap();
    assert!(touched.updated_at > session.updated_at);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_truncate_long_text_for_synthesis_only(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("user@example.com");
    let voice = ctx.fixtures.create_voice(user.id, "Mine", false).await;
    let session = ctx.fixtures.create_session(user.id, "Long").await;
    let text = "a".repeat(600);

    let response = ctx
        .client
        .post_with_auth(
            &generations_path(session.id),
            &json!({ "voice_id": voice.id, "text": text, "emotion": "neutral" }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    assert_eq!(ctx.tts.requests()[0].text.chars().count(), 500);
    assert_eq!(response.str_field("text"), text);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_validate_text_and_emotion(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("user@example.com");
    let token = ctx.token_for(&user.id);
    let voice = ctx.fixtures.create_voice(user.id, "Mine", false).await;
    let session = ctx.fixtures.create_session(user.id, "Checks").await;
    let path = generations_path(session.id);

    ctx.client
        .post_with_auth(&path, &json!({ "voice_id": voice.id, "text": "   ", "emotion": "happy" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text cannot be empty");

    ctx.client
        .post_with_auth(
            &path,
            &json!({ "voice_id": voice.id, "text": "x".repeat(2001), "emotion": "happy" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    ctx.client
        .post_with_auth(&path, &json!({ "voice_id": voice.id, "text": "Hi", "emotion": "ecstatic" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unsupported emotion");

    assert!(ctx.tts.requests().is_empty());
    assert_eq!(ctx.store.clip_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_distinguish_session_and_voice_denials(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("user@example.com");
    let other = ctx.fixtures.create_user("other@example.com");
    let token = ctx.token_for(&user.id);

    let own_voice = ctx.fixtures.create_voice(user.id, "Mine", false).await;
    let foreign_private = ctx.fixtures.create_voice(other.id, "Theirs", false).await;
    let own_session = ctx.fixtures.create_session(user.id, "Mine").await;
    let foreign_session = ctx.fixtures.create_session(other.id, "Theirs").await;

    // Foreign session is reported as missing, even with a usable voice
    ctx.client
        .post_with_auth(
            &generations_path(foreign_session.id),
            &json!({ "voice_id": own_voice.id, "text": "Hi", "emotion": "calm" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Session not found");

    // Session check wins over voice check
    ctx.client
        .post_with_auth(
            &generations_path(foreign_session.id),
            &json!({ "voice_id": foreign_private.id, "text": "Hi", "emotion": "calm" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Session not found");

    // An unknown voice in a foreign session reads the same as a missing session
    ctx.client
        .post_with_auth(
            &generations_path(foreign_session.id),
            &json!({ "voice_id": Uuid::new_v4(), "text": "Hi", "emotion": "calm" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Session not found");

    ctx.client
        .post_with_auth(
            &generations_path(Uuid::new_v4()),
            &json!({ "voice_id": Uuid::new_v4(), "text": "Hi", "emotion": "calm" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Session not found");

    ctx.client
        .post_with_auth(
            &generations_path(own_session.id),
            &json!({ "voice_id": foreign_private.id, "text": "Hi", "emotion": "calm" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Voice access denied");

    ctx.client
        .post_with_auth(
            &generations_path(own_session.id),
            &json!({ "voice_id": Uuid::new_v4(), "text": "Hi", "emotion": "calm" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Voice not found");

    assert!(ctx.tts.requests().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_allow_saved_voices_after_they_turn_private(ctx: &TestContext) {
    let owner = ctx.fixtures.create_user("owner@example.com");
    let fan = ctx.fixtures.create_user("fan@example.com");
    let voice = ctx.fixtures.create_voice(owner.id, "Shared", true).await;
    ctx.fixtures.save_voice(fan.id, voice.id).await;
    let session = ctx.fixtures.create_session(fan.id, "Fan work").await;

    // Owner makes the voice private
    ctx.client
        .patch_with_auth(
            &format!("/api/voices/{}", voice.id),
            &json!({ "is_public": false }),
            &ctx.token_for(&owner.id),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    ctx.client
        .post_with_auth(
            &generations_path(session.id),
            &json!({ "voice_id": voice.id, "text": "Still works", "emotion": "sad" }),
            &ctx.token_for(&fan.id),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::CREATED);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_engine_failure_without_persisting(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("user@example.com");
    let voice = ctx.fixtures.create_voice(user.id, "Mine", false).await;
    let session = ctx.fixtures.create_session(user.id, "Flaky").await;
    let blobs_before = ctx.blobs.len();
    ctx.tts.set_failing(true);

    ctx.client
        .post_with_auth(
            &generations_path(session.id),
            &json!({ "voice_id": voice.id, "text": "Hello", "emotion": "happy" }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("Failed to generate audio");

    assert_eq!(ctx.store.clip_count(), 0);
    assert_eq!(ctx.blobs.len(), blobs_before);
    assert_eq!(
        ctx.store.session(session.id).unwrap().updated_at,
        session.updated_at
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_session_untouched_when_clip_insert_fails(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("user@example.com");
    let voice = ctx.fixtures.create_voice(user.id, "Mine", false).await;
    let session = ctx.fixtures.create_session(user.id, "Atomic").await;
    let blobs_before = ctx.blobs.len();
    ctx.store.fail_next_clip_insert();

    ctx.client
        .post_with_auth(
            &generations_path(session.id),
            &json!({ "voice_id": voice.id, "text": "Hello", "emotion": "happy" }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(ctx.store.clip_count(), 0);
    assert_eq!(
        ctx.store.session(session.id).unwrap().updated_at,
        session.updated_at,
        "Session touch is rolled back with the failed insert"
    );
    assert_eq!(ctx.blobs.len(), blobs_before, "Orphaned clip blob is discarded");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_record_concurrent_generations(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("user@example.com");
    let token = ctx.token_for(&user.id);
    let voice = ctx.fixtures.create_voice(user.id, "Mine", false).await;
    let session = ctx.fixtures.create_session(user.id, "Busy").await;

    let mut futures = Vec::new();
    for i in 0..5 {
        let client = ctx.client.clone();
        let token = token.clone();
        let path = generations_path(session.id);
        let body = json!({ "voice_id": voice.id, "text": format!("Line {}", i), "emotion": "neutral" });
        futures.push(async move { client.post_with_auth(&path, &body, &token).await });
    }

    for result in futures::future::join_all(futures).await {
        result.unwrap().assert_status(StatusCode::CREATED);
    }

    let clips: Vec<Value> = ctx
        .client
        .get_with_auth(&generations_path(session.id), &token)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(clips.len(), 5);

    // Chronological order
    let times: Vec<DateTime<Utc>> = clips
        .iter()
        .map(|c| c["created_at"].as_str().unwrap().parse().unwrap())
        .collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);

    // The session ends at the latest completion time
    let latest = times.iter().max().copied().unwrap();
    assert_eq!(ctx.store.session(session.id).unwrap().updated_at, latest);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_manage_feedback_playback_and_deletion(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("user@example.com");
    let other = ctx.fixtures.create_user("other@example.com");
    let token = ctx.token_for(&user.id);
    let voice = ctx.fixtures.create_voice(user.id, "Mine", false).await;
    let session = ctx.fixtures.create_session(user.id, "Review").await;

    let response = ctx
        .client
        .post_with_auth(
            &generations_path(session.id),
            &json!({ "voice_id": voice.id, "text": "Rate me", "emotion": "surprised" }),
            &token,
        )
        .await
        .unwrap();
    let clip_id = response.str_field("id");
    let clip_path = format!("/api/generations/{}", clip_id);

    let response = ctx
        .client
        .patch_with_auth(&clip_path, &json!({ "is_liked": true }), &token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["is_liked"], true);

    let response = ctx
        .client
        .patch_with_auth(&clip_path, &json!({ "is_liked": null }), &token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert!(response.body.as_ref().unwrap()["is_liked"].is_null());

    let response = ctx
        .client
        .get_with_auth(&format!("{}/audio", clip_path), &token)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/wav");
    assert_eq!(&response.body_bytes[0..4], b"RIFF");

    let response = ctx
        .client
        .get_with_auth(&format!("{}/url", clip_path), &token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert!(response.str_field("url").starts_with("https://blobs.test/generated-audio/"));
    assert_eq!(response.body.as_ref().unwrap()["expires_in"], 900);

    // Other users see nothing
    let other_token = ctx.token_for(&other.id);
    ctx.client
        .get_with_auth(&format!("{}/audio", clip_path), &other_token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
    ctx.client
        .delete_with_auth(&clip_path, &other_token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);

    let stored_path = ctx
        .store
        .clip(Uuid::parse_str(&clip_id).unwrap())
        .unwrap()
        .file_path;
    ctx.client
        .delete_with_auth(&clip_path, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);
    assert!(ctx.blobs.object(&stored_path).is_none());
    assert_eq!(ctx.store.clip_count(), 0);
}
