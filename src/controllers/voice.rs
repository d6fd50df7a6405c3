use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::voice::{
    PublicVoiceQuery, UpdateVoiceRequest, VoiceGender, VoiceResponse, VoiceUpload,
};
use crate::{
    controllers::wav_response,
    domain::voice::{VoiceService, VoiceServiceApi},
    error::{AppError, AppResult},
    infrastructure::auth::{AuthUser, MaybeAuthUser},
};

pub struct VoiceController {
    voice_service: Arc<VoiceService>,
}

impl VoiceController {
    pub fn new(voice_service: Arc<VoiceService>) -> Self {
        Self { voice_service }
    }

    /// POST /api/voices - Upload a reference sample and create a voice
    pub async fn create_voice(
        State(controller): State<Arc<VoiceController>>,
        Extension(auth_user): Extension<AuthUser>,
        multipart: Multipart,
    ) -> AppResult<(StatusCode, Json<VoiceResponse>)> {
        let upload = read_voice_upload(multipart).await?;
        let voice = controller
            .voice_service
            .create_voice(&auth_user.principal(), upload)
            .await?;
        Ok((StatusCode::CREATED, Json(voice)))
    }

    /// GET /api/voices - Caller's own voices
    pub async fn list_own_voices(
        State(controller): State<Arc<VoiceController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Vec<VoiceResponse>>> {
        let voices = controller
            .voice_service
            .list_own_voices(&auth_user.principal())
            .await?;
        Ok(Json(voices))
    }

    /// GET /api/voices/public - Community listing
    pub async fn list_public_voices(
        State(controller): State<Arc<VoiceController>>,
        Query(query): Query<PublicVoiceQuery>,
    ) -> AppResult<Json<Vec<VoiceResponse>>> {
        let voices = controller.voice_service.list_public_voices(query).await?;
        Ok(Json(voices))
    }

    /// GET /api/voices/saved
    pub async fn list_saved_voices(
        State(controller): State<Arc<VoiceController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Vec<VoiceResponse>>> {
        let voices = controller
            .voice_service
            .list_saved_voices(&auth_user.principal())
            .await?;
        Ok(Json(voices))
    }

    /// GET /api/voices/{voice_id}
    pub async fn get_voice(
        State(controller): State<Arc<VoiceController>>,
        Extension(maybe_user): Extension<MaybeAuthUser>,
        Path(voice_id): Path<Uuid>,
    ) -> AppResult<Json<VoiceResponse>> {
        let voice = controller
            .voice_service
            .get_voice(maybe_user.principal().as_ref(), voice_id)
            .await?;
        Ok(Json(voice))
    }

    /// PATCH /api/voices/{voice_id}
    pub async fn update_voice(
        State(controller): State<Arc<VoiceController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(voice_id): Path<Uuid>,
        Json(request): Json<UpdateVoiceRequest>,
    ) -> AppResult<Json<VoiceResponse>> {
        let voice = controller
            .voice_service
            .update_voice(&auth_user.principal(), voice_id, request)
            .await?;
        Ok(Json(voice))
    }

    /// DELETE /api/voices/{voice_id}
    pub async fn delete_voice(
        State(controller): State<Arc<VoiceController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(voice_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .voice_service
            .delete_voice(&auth_user.principal(), voice_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /api/voices/{voice_id}/audio - Stream the reference sample
    pub async fn get_voice_audio(
        State(controller): State<Arc<VoiceController>>,
        Extension(maybe_user): Extension<MaybeAuthUser>,
        Path(voice_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let audio = controller
            .voice_service
            .get_voice_audio(maybe_user.principal().as_ref(), voice_id)
            .await?;
        Ok(wav_response(audio))
    }

    /// POST /api/voices/{voice_id}/save
    pub async fn save_voice(
        State(controller): State<Arc<VoiceController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(voice_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .voice_service
            .save_voice(&auth_user.principal(), voice_id)
            .await?;
        Ok(StatusCode::CREATED)
    }

    /// DELETE /api/voices/{voice_id}/save
    pub async fn unsave_voice(
        State(controller): State<Arc<VoiceController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(voice_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .voice_service
            .unsave_voice(&auth_user.principal(), voice_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
    } else {
        AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

fn parse_bool_field(value: &str) -> AppResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(AppError::BadRequest(format!("Invalid is_public value: {}", other))),
    }
}

async fn read_voice_upload(mut multipart: Multipart) -> AppResult<VoiceUpload> {
    let mut name = None;
    let mut description = None;
    let mut is_public = false;
    let mut gender = None;
    let mut genre_id = None;
    let mut audio = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "audio" => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                audio = Some(bytes.to_vec());
            }
            "name" => name = Some(field.text().await.map_err(multipart_error)?),
            "description" => {
                let text = field.text().await.map_err(multipart_error)?;
                description = Some(text).filter(|t| !t.trim().is_empty());
            }
            "is_public" => {
                let text = field.text().await.map_err(multipart_error)?;
                is_public = parse_bool_field(&text)?;
            }
            "gender" => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    gender = Some(text.parse::<VoiceGender>().map_err(AppError::BadRequest)?);
                }
            }
            "genre_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    let id = Uuid::parse_str(text.trim())
                        .map_err(|_| AppError::BadRequest("Invalid genre_id".to_string()))?;
                    genre_id = Some(id);
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown upload field");
            }
        }
    }

    let audio = audio
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::BadRequest("Audio file is required".to_string()))?;

    Ok(VoiceUpload {
        name: name.unwrap_or_default(),
        description,
        is_public,
        gender,
        genre_id,
        audio,
    })
}
