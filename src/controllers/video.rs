use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    domain::pipeline::{GenerateVideoRequest, GenerateVideoResponse, PipelineServiceApi},
    error::{AppError, AppResult},
    infrastructure::{config::Config, http::RequestId},
};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Topic, content, and code are required";
pub const VIDEO_CREATED_MESSAGE: &str = "Video created successfully";
pub const CLEANED_UP_MESSAGE: &str = "Session cleaned up.";

/// Response for POST /cleanup
#[derive(Debug, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub message: String,
    pub removed: usize,
}

pub struct VideoController {
    pipeline: Arc<dyn PipelineServiceApi>,
    output_dir: PathBuf,
    work_root: PathBuf,
    retain_work_dirs: bool,
}

impl VideoController {
    pub fn new(pipeline: Arc<dyn PipelineServiceApi>, config: &Config) -> Self {
        Self {
            pipeline,
            output_dir: config.output_dir.clone(),
            work_root: config.work_root(),
            retain_work_dirs: config.retain_work_dirs,
        }
    }

    /// POST /generate-video - Run the pipeline and publish the resulting video
    pub async fn generate_video(
        State(controller): State<Arc<VideoController>>,
        Extension(request_id): Extension<RequestId>,
        payload: Option<Json<GenerateVideoRequest>>,
    ) -> AppResult<Json<GenerateVideoResponse>> {
        let request = payload.map(|Json(request)| request).unwrap_or_default();
        let input = request
            .into_input()
            .ok_or_else(|| AppError::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string()))?;

        // One directory per request id keeps concurrent requests apart.
        let work_dir = controller.work_root.join(&request_id.0);
        tracing::info!(
            request_id = %request_id.0,
            topic = %input.topic,
            content_length = input.content.len(),
            code_length = input.code.len(),
            "Video generation requested"
        );

        let result = controller.pipeline.run(&input, &work_dir).await;
        let published = match result {
            Ok(video) => controller.publish(&video.path, &request_id.0).await,
            Err(e) => Err(AppError::from(e)),
        };
        controller.release_work_dir(&work_dir).await;

        let video_file = published?;
        Ok(Json(GenerateVideoResponse {
            message: VIDEO_CREATED_MESSAGE.to_string(),
            video_file,
        }))
    }

    /// GET /templates/:filename - Download a generated video
    pub async fn download(
        State(controller): State<Arc<VideoController>>,
        Path(filename): Path<String>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        if !is_plain_file_name(&filename) {
            return Err(AppError::BadRequest(format!(
                "Invalid file name: {}",
                filename
            )));
        }

        let path = controller.output_dir.join(&filename);
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(AppError::NotFound(format!("File not found: {}", filename)));
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| AppError::Internal(format!("failed to read {}: {}", filename, e)))?;

        let content_type = if filename.ends_with(".mp4") {
            "video/mp4"
        } else {
            "application/octet-stream"
        };
        let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .map_err(|_| AppError::BadRequest(format!("Invalid file name: {}", filename)))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers.insert(header::CONTENT_DISPOSITION, disposition);

        tracing::info!(file = %filename, size = bytes.len(), "Serving video download");
        Ok((StatusCode::OK, headers, Body::from(bytes)))
    }

    /// POST /cleanup - Remove leftover working directories
    pub async fn cleanup(
        State(controller): State<Arc<VideoController>>,
    ) -> AppResult<Json<CleanupResponse>> {
        let mut removed = 0;

        if let Ok(mut entries) = tokio::fs::read_dir(&controller.work_root).await {
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| AppError::Internal(format!("failed to list work directories: {}", e)))?
            {
                let path = entry.path();
                let result = if path.is_dir() {
                    tokio::fs::remove_dir_all(&path).await
                } else {
                    tokio::fs::remove_file(&path).await
                };
                match result {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove work entry"),
                }
            }
        }

        tracing::info!(removed, "Work directories cleaned up");
        Ok(Json(CleanupResponse {
            message: CLEANED_UP_MESSAGE.to_string(),
            removed,
        }))
    }

    /// Moves the finished video next to the other published videos, named after the request.
    async fn publish(&self, video: &std::path::Path, request_id: &str) -> AppResult<String> {
        let video_file = format!("{}.mp4", request_id);
        let destination = self.output_dir.join(&video_file);

        tokio::fs::rename(video, &destination).await.map_err(|e| {
            AppError::Internal(format!(
                "failed to publish {}: {}",
                destination.display(),
                e
            ))
        })?;

        tracing::info!(video_file = %video_file, "Video published");
        Ok(video_file)
    }

    async fn release_work_dir(&self, work_dir: &std::path::Path) {
        if self.retain_work_dirs {
            tracing::debug!(work_dir = %work_dir.display(), "Keeping work directory");
            return;
        }

        if let Err(e) = tokio::fs::remove_dir_all(work_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(work_dir = %work_dir.display(), error = %e, "Failed to remove work directory");
            }
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && name != "."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_names_only() {
        assert!(is_plain_file_name("3f2b.mp4"));
        assert!(!is_plain_file_name("../secret"));
        assert!(!is_plain_file_name("work/a.mp4"));
        assert!(!is_plain_file_name("..\\a.mp4"));
        assert!(!is_plain_file_name(""));
    }
}
