//! Generator: one image in, one model call, one parsed `GenerationResult` out.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{AppError, IMAGE_REQUIRED_MESSAGE};
use crate::llm_client::{LlmError, VisionModel};
use crate::metadata::parser::{parse_reply, GenerationResult};
use crate::metadata::prompts::build_instruction;

/// Request body of `POST /api/generate-seo`, as the browser sends it.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateSeoRequest {
    pub image: Option<String>,
    pub platform: Option<String>,
    pub prompt: Option<String>,
}

/// A validated request: the image is present and non-blank.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Data URI, e.g. `data:image/jpeg;base64,...`.
    pub image: String,
    pub platform: String,
    pub instruction: Option<String>,
}

impl TryFrom<GenerateSeoRequest> for GenerationRequest {
    type Error = AppError;

    fn try_from(body: GenerateSeoRequest) -> Result<Self, Self::Error> {
        let image = body
            .image
            .filter(|i| !i.trim().is_empty())
            .ok_or_else(|| AppError::InvalidRequest(IMAGE_REQUIRED_MESSAGE.to_string()))?;

        Ok(GenerationRequest {
            image,
            platform: body.platform.unwrap_or_default(),
            instruction: body.prompt.filter(|p| !p.trim().is_empty()),
        })
    }
}

/// Builds the instruction, calls the model once within `timeout` and parses the reply.
///
/// Every model failure, including the timeout, becomes `AppError::Upstream` carrying the
/// cause for the log. A reply with no markers is not an error: it yields empty fields.
pub async fn generate_metadata(
    model: &dyn VisionModel,
    request: &GenerationRequest,
    timeout: Duration,
) -> Result<GenerationResult, AppError> {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        platform = %request.platform,
        image_bytes = request.image.len(),
        custom_prompt = request.instruction.is_some(),
        "Generating stock metadata"
    );

    let instruction = build_instruction(&request.platform, request.instruction.as_deref());

    let reply = tokio::time::timeout(timeout, model.describe_image(&instruction, &request.image))
        .await
        .unwrap_or(Err(LlmError::Timeout(timeout)))
        .map_err(|e| AppError::Upstream(format!("request {request_id}: {e}")))?;

    let result = parse_reply(&reply);

    if result.is_empty() {
        warn!(%request_id, "Model reply contained no recognised markers");
    } else {
        debug!(
            %request_id,
            title_chars = result.title.chars().count(),
            keyword_count = result.keyword_list().len(),
            "Parsed model reply"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const IMAGE: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

    /// Records the last call and answers with a canned result.
    struct ScriptedModel {
        reply: Result<String, u16>,
        delay: Option<Duration>,
        seen: Mutex<Option<(String, String)>>,
    }

    impl ScriptedModel {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: None,
                seen: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                delay: None,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl VisionModel for ScriptedModel {
        async fn describe_image(
            &self,
            instruction: &str,
            image_data_uri: &str,
        ) -> Result<String, LlmError> {
            *self.seen.lock().unwrap() = Some((instruction.to_string(), image_data_uri.to_string()));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "quota exceeded".to_string(),
                }),
            }
        }
    }

    fn request(platform: &str, prompt: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            image: IMAGE.to_string(),
            platform: platform.to_string(),
            instruction: prompt.map(str::to_string),
        }
    }

    #[test]
    fn test_try_from_requires_image() {
        let err = GenerationRequest::try_from(GenerateSeoRequest::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(ref m) if m == "Image data is required."));

        let blank = GenerateSeoRequest {
            image: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(GenerationRequest::try_from(blank).is_err());
    }

    #[test]
    fn test_try_from_defaults_optional_fields() {
        let body = GenerateSeoRequest {
            image: Some(IMAGE.to_string()),
            platform: None,
            prompt: Some("  ".to_string()),
        };
        let req = GenerationRequest::try_from(body).unwrap();
        assert_eq!(req.platform, "");
        assert_eq!(req.instruction, None);
    }

    #[tokio::test]
    async fn test_generates_from_well_formed_reply() {
        let model = ScriptedModel::replying(
            "TITLE: Red Fox in Snow\nKEYWORDS: fox, snow, winter, wildlife\nDESCRIPTION: A red fox walks through snow.",
        );
        let result = generate_metadata(&model, &request("Adobe Stock", None), Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(result.title, "Red Fox in Snow");
        assert_eq!(result.keyword_list().len(), 4);
        assert_eq!(result.description, "A red fox walks through snow.");
    }

    #[tokio::test]
    async fn test_model_receives_instruction_and_image() {
        let model = ScriptedModel::replying("TITLE: x");
        generate_metadata(
            &model,
            &request("Shutterstock", Some("Emphasise the teamwork")),
            Duration::from_secs(30),
        )
        .await
        .unwrap();

        let (instruction, image) = model.seen.lock().unwrap().clone().unwrap();
        assert_eq!(image, IMAGE);
        assert!(instruction.contains(r#""Shutterstock""#));
        assert!(instruction.contains("Emphasise the teamwork"));
    }

    #[tokio::test]
    async fn test_unmarked_reply_is_not_an_error() {
        let model = ScriptedModel::replying("I cannot help with that.");
        let result = generate_metadata(&model, &request("", None), Duration::from_secs(30))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_becomes_upstream_error() {
        let model = ScriptedModel::failing(429);
        let err = generate_metadata(&model, &request("", None), Duration::from_secs(30))
            .await
            .unwrap_err();
        match err {
            AppError::Upstream(cause) => assert!(cause.contains("quota exceeded")),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_model_times_out_as_upstream_error() {
        let model = ScriptedModel {
            delay: Some(Duration::from_secs(60)),
            ..ScriptedModel::replying("TITLE: too late")
        };
        let err = generate_metadata(&model, &request("", None), Duration::from_secs(30))
            .await
            .unwrap_err();
        match err {
            AppError::Upstream(cause) => assert!(cause.contains("timed out")),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
