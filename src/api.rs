//! Request and response shapes for JSON front ends.

use serde::{Deserialize, Serialize};

use crate::error::{QrGenError, Result};
use crate::types::{ColorValue, GeneratorConfig, QrRequest, QrResult, SizeTier};

pub const SERVICE_NAME: &str = "qr-generator";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequest {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub error_correction: Option<String>,
}

impl ApiRequest {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn resolve(&self, config: &GeneratorConfig) -> QrRequest {
        QrRequest::resolve(
            &self.data,
            self.size.as_deref(),
            self.color.as_deref(),
            self.error_correction.as_deref(),
            config,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub version: u8,
    pub size_px: (u32, u32),
    pub selected_size: SizeTier,
    pub data_length: usize,
    pub color: ColorValue,
    pub error_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiSuccess {
    pub success: bool,
    pub qr_data_url: String,
    pub info: ApiInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip)]
    pub status: u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Success(ApiSuccess),
    Error(ApiError),
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Error(e) => e.status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<QrResult> for ApiResponse {
    fn from(result: QrResult) -> Self {
        Self::Success(ApiSuccess {
            success: true,
            qr_data_url: result.data_url,
            info: ApiInfo {
                version: result.version,
                size_px: result.size_px,
                selected_size: result.size.id,
                data_length: result.input_length,
                color: result.foreground,
                error_level: result.error_level,
            },
            warning: result.warning,
        })
    }
}

impl From<QrGenError> for ApiResponse {
    fn from(err: QrGenError) -> Self {
        Self::Error(ApiError {
            status: err.status(),
            error: err.to_string(),
        })
    }
}

impl From<Result<QrResult>> for ApiResponse {
    fn from(result: Result<QrResult>) -> Self {
        result.map_or_else(Self::from, Self::from)
    }
}

/// Liveness report. Touches no generator state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

pub fn health() -> HealthStatus {
    HealthStatus {
        status: "healthy",
        service: SERVICE_NAME,
    }
}
