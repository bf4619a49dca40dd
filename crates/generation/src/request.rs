//! Generation request modes.
//!
//! Each mode bundles a different set of reference inputs, so requests
//! are a tagged union rather than one flat struct of optional fields.
//! The dispatcher pattern-matches on the tag; reference inputs are URLs
//! into the asset store, already uploaded by the time a request is
//! built.

use serde::{Deserialize, Serialize};
use shotflow_core::error::CoreError;

/// Model and output settings shared by every mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model: String,
    pub aspect_ratio: String,
    pub resolution: Option<String>,
}

/// A named reference input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub name: String,
    pub url: String,
}

/// One generation request, tagged by mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GenerationRequest {
    /// Free prompt plus hand-picked reference images.
    Manual {
        params: GenerationParams,
        prompt: String,
        references: Vec<ReferenceImage>,
    },

    /// Prompt assembled backend-side from the shot's own references.
    Automatic {
        params: GenerationParams,
        prompt: Option<String>,
        storyboard: Option<ReferenceImage>,
        background: Option<ReferenceImage>,
        characters: Vec<ReferenceImage>,
    },

    /// Enhance the storyboard into a detailed sketch.
    #[serde(rename = "storyboard_enhancer")]
    Enhancer {
        params: GenerationParams,
        storyboard: ReferenceImage,
    },

    /// Re-frame an anchor image; all inputs are optional.
    Angles {
        params: GenerationParams,
        angle: Option<String>,
        length: Option<String>,
        focus: Option<String>,
        background: Option<String>,
        anchor: Option<ReferenceImage>,
        target: Option<ReferenceImage>,
    },

    /// Expand a base background into a grid of variants.
    BackgroundGrid {
        params: GenerationParams,
        base_image: ReferenceImage,
        context: Option<String>,
    },
}

impl GenerationRequest {
    /// The wire tag for this mode.
    pub fn mode(&self) -> &'static str {
        match self {
            GenerationRequest::Manual { .. } => "manual",
            GenerationRequest::Automatic { .. } => "automatic",
            GenerationRequest::Enhancer { .. } => "storyboard_enhancer",
            GenerationRequest::Angles { .. } => "angles",
            GenerationRequest::BackgroundGrid { .. } => "background_grid",
        }
    }

    pub fn params(&self) -> &GenerationParams {
        match self {
            GenerationRequest::Manual { params, .. }
            | GenerationRequest::Automatic { params, .. }
            | GenerationRequest::Enhancer { params, .. }
            | GenerationRequest::Angles { params, .. }
            | GenerationRequest::BackgroundGrid { params, .. } => params,
        }
    }

    /// Check mode-specific required inputs before dispatch.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            GenerationRequest::Manual { prompt, .. } => {
                if prompt.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "Manual generation requires a prompt".to_string(),
                    ));
                }
            }
            GenerationRequest::Enhancer { storyboard, .. } => {
                if storyboard.url.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "Storyboard enhancement requires a storyboard image".to_string(),
                    ));
                }
            }
            GenerationRequest::BackgroundGrid { base_image, .. } => {
                if base_image.url.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "Background grid generation requires a base image".to_string(),
                    ));
                }
            }
            GenerationRequest::Automatic { .. } | GenerationRequest::Angles { .. } => {}
        }
        Ok(())
    }

    /// One-line prompt text shown in the job list while the backend has
    /// not reported its own.
    pub fn prompt_summary(&self) -> String {
        match self {
            GenerationRequest::Manual { prompt, .. } => prompt.clone(),
            GenerationRequest::Automatic { prompt, .. } => prompt
                .clone()
                .unwrap_or_else(|| "Processing...".to_string()),
            GenerationRequest::Angles { angle: Some(angle), .. } => format!("Angle: {angle}"),
            _ => "Processing...".to_string(),
        }
    }
}
