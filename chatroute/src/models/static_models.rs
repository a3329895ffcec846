use crate::types::*;
use crate::types::ProviderKind::{Anthropic, DeepSeek, Google, Ideogram, Midjourney, OpenAi};

const fn text(provider: ProviderKind, id: &'static str, name: &'static str, description: &'static str) -> ModelDescriptor {
    ModelDescriptor { id, name, provider, modality: Modality::Text, description, image: None }
}

const fn image(
    provider: ProviderKind,
    id: &'static str,
    name: &'static str,
    description: &'static str,
    size: &'static str,
    quality: Option<&'static str>,
    version: Option<&'static str>,
) -> ModelDescriptor {
    ModelDescriptor {
        id,
        name,
        provider,
        modality: Modality::Image,
        description,
        image: Some(ImageProfile { size, quality, version }),
    }
}

static MODELS: [ModelDescriptor; 19] = [
    // OpenAI
    text(OpenAi, "gpt-4o", "GPT-4o", "Most capable OpenAI model"),
    text(OpenAi, "gpt-4o-mini", "GPT-4o Mini", "Fast and efficient"),
    text(OpenAi, "gpt-4-turbo", "GPT-4 Turbo", "High performance"),
    text(OpenAi, "gpt-3.5-turbo", "GPT-3.5 Turbo", "Fast and reliable"),
    image(OpenAi, "dall-e-3", "DALL-E 3", "Advanced image generation", "1024x1024", Some("standard"), None),
    image(OpenAi, "dall-e-2", "DALL-E 2", "Image generation", "512x512", None, None),
    // Anthropic
    text(Anthropic, "claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet", "Most intelligent Claude model"),
    text(Anthropic, "claude-3-5-haiku-20241022", "Claude 3.5 Haiku", "Fast and lightweight"),
    text(Anthropic, "claude-3-opus-20240229", "Claude 3 Opus", "Most powerful Claude model"),
    text(Anthropic, "claude-3-sonnet-20240229", "Claude 3 Sonnet", "Balanced performance"),
    text(Anthropic, "claude-3-haiku-20240307", "Claude 3 Haiku", "Fast and efficient"),
    // Google
    text(Google, "gemini-1.5-pro", "Gemini 1.5 Pro", "Advanced multimodal model"),
    text(Google, "gemini-1.5-flash", "Gemini 1.5 Flash", "Fast and versatile"),
    text(Google, "gemini-pro", "Gemini Pro", "Powerful text generation"),
    ModelDescriptor {
        id: "gemini-pro-vision",
        name: "Gemini Pro Vision",
        provider: Google,
        modality: Modality::Multimodal,
        description: "Text and image understanding",
        image: None,
    },
    // DeepSeek
    text(DeepSeek, "deepseek-chat", "DeepSeek Chat", "Advanced reasoning model"),
    text(DeepSeek, "deepseek-coder", "DeepSeek Coder", "Specialized for coding"),
    // Image-only
    image(Ideogram, "ideogram-v2", "Ideogram V2", "High-quality image generation", "ASPECT_1_1", None, Some("V_2")),
    // No adapter yet, so no image profile either.
    ModelDescriptor {
        id: "midjourney-v6",
        name: "Midjourney V6",
        provider: Midjourney,
        modality: Modality::Image,
        description: "Artistic image generation",
        image: None,
    },
];

/// Every model the router knows, in display order.
pub fn all_models() -> &'static [ModelDescriptor] {
    &MODELS
}

/// Exact-match lookup by model id.
pub fn find_model(id: &str) -> Option<&'static ModelDescriptor> {
    MODELS.iter().find(|m| m.id == id)
}

pub fn models_for_provider(provider: ProviderKind) -> impl Iterator<Item = &'static ModelDescriptor> {
    MODELS.iter().filter(move |m| m.provider == provider)
}
