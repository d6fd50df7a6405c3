use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::generation::{GenerationResponse, SignedUrlResponse, UpdateGenerationRequest};
use crate::{
    controllers::wav_response,
    domain::generation::{GenerationService, GenerationServiceApi},
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct GenerationController {
    generation_service: Arc<GenerationService>,
}

impl GenerationController {
    pub fn new(generation_service: Arc<GenerationService>) -> Self {
        Self { generation_service }
    }

    /// PATCH /api/generations/{generation_id} - Like, dislike or clear
    pub async fn update_feedback(
        State(controller): State<Arc<GenerationController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(generation_id): Path<Uuid>,
        Json(request): Json<UpdateGenerationRequest>,
    ) -> AppResult<Json<GenerationResponse>> {
        let generation = controller
            .generation_service
            .update_feedback(&auth_user.principal(), generation_id, request)
            .await?;
        Ok(Json(generation))
    }

    /// DELETE /api/generations/{generation_id}
    pub async fn delete_generation(
        State(controller): State<Arc<GenerationController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(generation_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .generation_service
            .delete_generation(&auth_user.principal(), generation_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /api/generations/{generation_id}/audio
    pub async fn get_audio(
        State(controller): State<Arc<GenerationController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(generation_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let audio = controller
            .generation_service
            .get_generation_audio(&auth_user.principal(), generation_id)
            .await?;
        Ok(wav_response(audio))
    }

    /// GET /api/generations/{generation_id}/url - Presigned download URL
    pub async fn get_signed_url(
        State(controller): State<Arc<GenerationController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(generation_id): Path<Uuid>,
    ) -> AppResult<Json<SignedUrlResponse>> {
        let url = controller
            .generation_service
            .get_signed_url(&auth_user.principal(), generation_id)
            .await?;
        Ok(Json(url))
    }
}
