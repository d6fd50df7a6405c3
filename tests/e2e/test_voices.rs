use crate::e2e::helpers;

use helpers::api_client::FormPart;
use helpers::fixtures::{mp3_bytes, wav_bytes};
use helpers::TestContext;
use hyper::StatusCode;
use serde_json::{json, Value};
use test_context::test_context;
use uuid::Uuid;

fn wav_part(data: &[u8]) -> FormPart<'_> {
    FormPart::File {
        name: "audio",
        filename: "sample.wav",
        content_type: "audio/wav",
        data,
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_voice_from_wav_upload(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("owner@example.com");
    let token = ctx.token_for(&user.id);
    let audio = wav_bytes(22050, 1, 0.5);

    let response = ctx
        .client
        .post_multipart_with_auth(
            "/api/voices",
            &[
                FormPart::Text("name", "Narrator"),
                FormPart::Text("description", "Warm and calm"),
                FormPart::Text("is_public", "true"),
                FormPart::Text("gender", "female"),
                wav_part(&audio),
            ],
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);

    let body = response.body.as_ref().unwrap();
    let id = response.str_field("id");
    assert_eq!(body.get("name").and_then(|v| v.as_str()), Some("Narrator"));
    assert_eq!(body.get("is_public").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(body.get("gender").and_then(|v| v.as_str()), Some("female"));
    assert_eq!(
        body.get("audio_url").and_then(|v| v.as_str()),
        Some(format!("/api/voices/{}/audio", id).as_str())
    );
    assert!(body.get("audio_sample").is_none(), "Storage path must not leak");

    // WAV passes through untouched
    assert_eq!(ctx.transcoder.calls(), 0);
    let voice = ctx.store.voice(Uuid::parse_str(&id).unwrap()).unwrap();
    assert!(voice.audio_sample.starts_with("memory://reference-audio/"));
    assert!(voice.audio_sample.ends_with(".wav"));
    assert_eq!(ctx.blobs.object(&voice.audio_sample), Some(audio));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_transcode_non_wav_uploads_and_clean_scratch_files(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("owner@example.com");
    let token = ctx.token_for(&user.id);
    let audio = mp3_bytes();

    let response = ctx
        .client
        .post_multipart_with_auth(
            "/api/voices",
            &[
                FormPart::Text("name", "Podcast voice"),
                FormPart::File {
                    name: "audio",
                    filename: "sample.mp3",
                    content_type: "audio/mpeg",
                    data: &audio,
                },
            ],
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    assert_eq!(ctx.transcoder.calls(), 1);

    let id = Uuid::parse_str(&response.str_field("id")).unwrap();
    let voice = ctx.store.voice(id).unwrap();
    let stored = ctx.blobs.object(&voice.audio_sample).unwrap();
    assert_eq!(&stored[0..4], b"RIFF");
    assert_eq!(&stored[8..12], b"WAVE");

    assert_eq!(ctx.scratch_entries(), 0, "Scratch files must be released");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unconvertible_audio_without_side_effects(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("owner@example.com");
    let token = ctx.token_for(&user.id);
    ctx.transcoder.set_failing(true);
    let audio = mp3_bytes();

    let response = ctx
        .client
        .post_multipart_with_auth(
            "/api/voices",
            &[
                FormPart::Text("name", "Broken"),
                FormPart::File {
                    name: "audio",
                    filename: "broken.mp3",
                    content_type: "audio/mpeg",
                    data: &audio,
                },
            ],
            &token,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("Failed to process audio");

    assert_eq!(ctx.blobs.len(), 0);
    assert_eq!(ctx.scratch_entries(), 0);

    let list = ctx.client.get_with_auth("/api/voices", &token).await.unwrap();
    list.assert_status(StatusCode::OK);
    assert_eq!(list.json::<Vec<Value>>().unwrap().len(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_validate_upload_fields(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("owner@example.com");
    let token = ctx.token_for(&user.id);
    let audio = wav_bytes(22050, 1, 0.1);

    // Missing audio part
    let response = ctx
        .client
        .post_multipart_with_auth("/api/voices", &[FormPart::Text("name", "No audio")], &token)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Audio file is required");

    // Blank name
    let response = ctx
        .client
        .post_multipart_with_auth(
            "/api/voices",
            &[FormPart::Text("name", "   "), wav_part(&audio)],
            &token,
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    // Unknown gender
    let response = ctx
        .client
        .post_multipart_with_auth(
            "/api/voices",
            &[
                FormPart::Text("name", "Voice"),
                FormPart::Text("gender", "robot"),
                wav_part(&audio),
            ],
            &token,
        )
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid gender");

    // Unknown genre
    let missing_genre = Uuid::new_v4().to_string();
    let response = ctx
        .client
        .post_multipart_with_auth(
            "/api/voices",
            &[
                FormPart::Text("name", "Voice"),
                FormPart::Text("genre_id", &missing_genre),
                wav_part(&audio),
            ],
            &token,
        )
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unknown genre");

    assert_eq!(ctx.blobs.len(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_oversized_samples(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("owner@example.com");
    let token = ctx.token_for(&user.id);
    // About 300 KiB against a 256 KiB limit
    let audio = wav_bytes(22050, 1, 7.0);
    assert!(audio.len() > ctx.config.max_upload_bytes);

    let response = ctx
        .client
        .post_multipart_with_auth(
            "/api/voices",
            &[FormPart::Text("name", "Long"), wav_part(&audio)],
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(ctx.blobs.len(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_authentication_to_upload(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/voices", &json!({ "name": "anonymous" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Missing authorization header");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_expired_and_forged_tokens(ctx: &TestContext) {
    let user = ctx.fixtures.create_user("owner@example.com");

    let expired =
        helpers::generate_test_jwt_with_expiry(&user.id, &ctx.config.jwt_secret, chrono::Duration::hours(-2));
    let response = ctx.client.get_with_auth("/api/voices", &expired).await.unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);

    let forged = helpers::generate_test_jwt(&user.id, "some-other-secret");
    let response = ctx.client.get_with_auth("/api/voices", &forged).await.unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Valid signature, but the account no longer exists
    let ghost = helpers::generate_test_jwt(&Uuid::new_v4(), &ctx.config.jwt_secret);
    let response = ctx.client.get_with_auth("/api/voices", &ghost).await.unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_visibility_rules_to_voice_detail(ctx: &TestContext) {
    let owner = ctx.fixtures.create_user("owner@example.com");
    let stranger = ctx.fixtures.create_user("stranger@example.com");
    let private = ctx.fixtures.create_voice(owner.id, "Private", false).await;
    let public = ctx.fixtures.create_voice(owner.id, "Public", true).await;

    let owner_token = ctx.token_for(&owner.id);
    let stranger_token = ctx.token_for(&stranger.id);

    ctx.client
        .get_with_auth(&format!("/api/voices/{}", private.id), &owner_token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    ctx.client
        .get_with_auth(&format!("/api/voices/{}", private.id), &stranger_token)
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Voice access denied");

    ctx.client
        .get(&format!("/api/voices/{}", private.id))
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN);

    // Public voices are readable anonymously
    ctx.client
        .get(&format!("/api/voices/{}", public.id))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    // A broken token on an optional-auth route degrades to anonymous
    ctx.client
        .get_with_auth(&format!("/api/voices/{}", public.id), "not-a-jwt")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    ctx.client
        .get(&format!("/api/voices/{}", Uuid::new_v4()))
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Voice not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_stream_reference_audio_for_viewable_voices(ctx: &TestContext) {
    let owner = ctx.fixtures.create_user("owner@example.com");
    let stranger = ctx.fixtures.create_user("stranger@example.com");
    let private = ctx.fixtures.create_voice(owner.id, "Private", false).await;
    let public = ctx.fixtures.create_voice(owner.id, "Public", true).await;

    let response = ctx
        .client
        .get(&format!("/api/voices/{}/audio", public.id))
        .await
        .unwrap();
    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/wav");
    assert_eq!(&response.body_bytes[0..4], b"RIFF");

    // Cookie auth works for <audio> playback
    let response = ctx
        .client
        .get_with_cookie(&format!("/api/voices/{}/audio", private.id), &ctx.token_for(&owner.id))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    ctx.client
        .get_with_auth(
            &format!("/api/voices/{}/audio", private.id),
            &ctx.token_for(&stranger.id),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_public_voices_with_filters(ctx: &TestContext) {
    let owner = ctx.fixtures.create_user("owner@example.com");
    let genre = ctx.fixtures.create_genre("Audiobook").await;

    let narrator = ctx.fixtures.create_voice(owner.id, "Deep Narrator", true).await;
    ctx.fixtures.assign_genre(narrator.id, genre.id).await;
    let _cheerful = ctx.fixtures.create_voice(owner.id, "Cheerful Host", true).await;
    let _hidden = ctx.fixtures.create_voice(owner.id, "Hidden Narrator", false).await;

    let response = ctx.client.get("/api/voices/public").await.unwrap();
    response.assert_status(StatusCode::OK);
    let voices: Vec<Value> = response.json().unwrap();
    assert_eq!(voices.len(), 2, "Private voices are excluded");
    // Newest first
    assert_eq!(voices[0]["name"], "Cheerful Host");

    let response = ctx
        .client
        .get("/api/voices/public?search=narrator")
        .await
        .unwrap();
    let voices: Vec<Value> = response.json().unwrap();
    assert_eq!(voices.len(), 1);
    assert_eq!(voices[0]["name"], "Deep Narrator");

    let response = ctx
        .client
        .get(&format!("/api/voices/public?genre_id={}", genre.id))
        .await
        .unwrap();
    let voices: Vec<Value> = response.json().unwrap();
    assert_eq!(voices.len(), 1);
    assert_eq!(voices[0]["id"], narrator.id.to_string());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_only_let_owners_update_and_delete(ctx: &TestContext) {
    let owner = ctx.fixtures.create_user("owner@example.com");
    let stranger = ctx.fixtures.create_user("stranger@example.com");
    let voice = ctx.fixtures.create_voice(owner.id, "Original", true).await;
    let path = format!("/api/voices/{}", voice.id);

    ctx.client
        .patch_with_auth(&path, &json!({ "name": "Hijacked" }), &ctx.token_for(&stranger.id))
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN);

    ctx.client
        .delete_with_auth(&path, &ctx.token_for(&stranger.id))
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN);

    let response = ctx
        .client
        .patch_with_auth(
            &path,
            &json!({ "name": "Renamed", "is_public": false, "gender": "male" }),
            &ctx.token_for(&owner.id),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["is_public"], false);
    assert_eq!(body["gender"], "male");

    ctx.client
        .delete_with_auth(&path, &ctx.token_for(&owner.id))
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    assert!(ctx.store.voice(voice.id).is_none());
    assert!(ctx.blobs.object(&voice.audio_sample).is_none(), "Sample blob is removed");

    ctx.client
        .get_with_auth(&path, &ctx.token_for(&owner.id))
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_save_and_unsave_public_voices(ctx: &TestContext) {
    let owner = ctx.fixtures.create_user("owner@example.com");
    let listener = ctx.fixtures.create_user("listener@example.com");
    let public = ctx.fixtures.create_voice(owner.id, "Public", true).await;
    let private = ctx.fixtures.create_voice(owner.id, "Private", false).await;
    let token = ctx.token_for(&listener.id);
    let save_path = format!("/api/voices/{}/save", public.id);

    ctx.client
        .post_empty_with_auth(&save_path, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::CREATED);

    ctx.client
        .post_empty_with_auth(&save_path, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::CONFLICT)
        .assert_error_message("Voice already saved");

    ctx.client
        .post_empty_with_auth(&format!("/api/voices/{}/save", private.id), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN);

    let response = ctx.client.get_with_auth("/api/voices/saved", &token).await.unwrap();
    response.assert_status(StatusCode::OK);
    let saved: Vec<Value> = response.json().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["id"], public.id.to_string());

    ctx.client
        .delete_with_auth(&save_path, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);
    assert_eq!(ctx.store.saved_count(listener.id), 0);

    ctx.client
        .delete_with_auth(&save_path, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_clear_nullable_fields_on_update(ctx: &TestContext) {
    let owner = ctx.fixtures.create_user("owner@example.com");
    let token = ctx.token_for(&owner.id);
    let genre = ctx.fixtures.create_genre("Podcast").await;
    let voice = ctx.fixtures.create_voice(owner.id, "Host", true).await;
    let path = format!("/api/voices/{}", voice.id);

    let response = ctx
        .client
        .patch_with_auth(
            &path,
            &json!({ "description": "Warm and slow", "gender": "female", "genre_id": genre.id }),
            &token,
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["description"], "Warm and slow");
    assert_eq!(body["genre_id"], genre.id.to_string());

    // Absent fields are left alone
    ctx.client
        .patch_with_auth(&path, &json!({ "name": "Host v2" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    let stored = ctx.store.voice(voice.id).unwrap();
    assert_eq!(stored.description.as_deref(), Some("Warm and slow"));
    assert_eq!(stored.genre_id, Some(genre.id));

    // Explicit nulls clear them
    ctx.client
        .patch_with_auth(
            &path,
            &json!({ "description": null, "gender": null, "genre_id": null }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    let stored = ctx.store.voice(voice.id).unwrap();
    assert_eq!(stored.name, "Host v2");
    assert_eq!(stored.description, None);
    assert_eq!(stored.gender, None);
    assert_eq!(stored.genre_id, None);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_authorization_on_public_routes(ctx: &TestContext) {
    let owner = ctx.fixtures.create_user("owner@example.com");
    let voice = ctx.fixtures.create_voice(owner.id, "Open", true).await;

    ctx.client
        .get_with_header("/api/voices/public", "authorization", "Basic dXNlcjpwYXNz")
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Invalid authorization format");

    // A well-formed but invalid token browses anonymously
    ctx.client
        .get_with_header(
            &format!("/api/voices/{}", voice.id),
            "authorization",
            "Bearer not-a-jwt",
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}
