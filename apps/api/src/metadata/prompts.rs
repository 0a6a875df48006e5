//! Instruction text sent to the vision model for metadata generation.
//! The output grammar here must stay in step with the markers in `parser.rs`.

use crate::metadata::parser::{DESCRIPTION_MARKER, KEYWORDS_MARKER, TITLE_MARKER};

/// Rendered when the caller leaves the platform blank.
pub const DEFAULT_PLATFORM: &str = "General";
/// Rendered when the caller sends no custom prompt.
pub const NO_CUSTOM_PROMPT: &str = "No custom prompt provided.";

const ROLE_PREAMBLE: &str = "You are an expert SEO metadata generator for stock photo \
    platforms like Adobe Stock, Shutterstock, and Freepik. Your task is to analyze an image \
    and generate a compelling title, relevant keywords, and a concise description based on \
    the user's requirements.";

/// Builds the full instruction for one image.
///
/// `platform` and `user_prompt` are interpolated verbatim. They are untrusted, but the
/// consumer is a language model, so no escaping is applied.
pub fn build_instruction(platform: &str, user_prompt: Option<&str>) -> String {
    let platform = if platform.trim().is_empty() {
        DEFAULT_PLATFORM
    } else {
        platform.trim()
    };
    let user_prompt = user_prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(NO_CUSTOM_PROMPT);

    format!(
        r#"{ROLE_PREAMBLE}

**Instructions:**
1. **Analyze the Image:** Carefully examine the subject, colors, mood, and potential concepts in the image.
2. **Generate Title:** Create a descriptive and commercially appealing title. It should be between 8 and 15 words.
3. **Generate Keywords:** Provide a list of 20-40 relevant keywords, separated by commas. Include a mix of specific and conceptual keywords. Do not use numbers or special characters in keywords.
4. **Generate Description:** Write a 2-3 sentence description that accurately describes the image and its potential uses.
5. **Platform Context:** The target platform is "{platform}". Tailor the tone and length slightly if needed, but follow the general rules.
6. **User's Custom Prompt:** If the user provides a custom prompt, give it higher priority in your analysis. User's prompt is: "{user_prompt}"

**Output Format:**
You MUST respond in the following format, with each section clearly marked. Do not add any other text or explanations.

{TITLE_MARKER} [Your generated title here]
{KEYWORDS_MARKER} [Your generated keywords here, comma-separated]
{DESCRIPTION_MARKER} [Your generated description here]"#
    )
}
