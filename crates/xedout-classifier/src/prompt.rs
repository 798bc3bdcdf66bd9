//! Moderation prompt construction

use xedout_core::{ChatMessage, ClassificationRequest, ContentPart, MessageContent};

/// Appended to the user's instruction so the model answers with a bare boolean
const ANSWER_FORMAT: &str = "Respond with only \"true\" or \"false\":";

/// Build the full instruction text for a post.
///
/// The image sentence reports every URL the post carries, even when only some
/// of them are forwarded to the model.
pub fn build_prompt(request: &ClassificationRequest) -> String {
    let mut prompt = format!("{} {}\n", request.prompt, ANSWER_FORMAT);
    prompt.push_str(&format!("Post text: \"{}\"\n", request.text));

    if request.has_images() {
        prompt.push_str(&format!(
            "The post contains {} image(s). Please consider the images in your analysis.",
            request.image_urls.len()
        ));
    }

    prompt
}

/// Build the single user message sent to the model.
///
/// Without images the content is the prompt string. With images it is a text
/// part followed by at most `max_images` image parts, in the order given.
pub fn build_message(request: &ClassificationRequest, max_images: usize) -> ChatMessage {
    let prompt = build_prompt(request);

    if !request.has_images() {
        return ChatMessage::user(prompt);
    }

    let mut parts = Vec::with_capacity(1 + request.image_urls.len().min(max_images));
    parts.push(ContentPart::text(prompt));
    parts.extend(
        request
            .image_urls
            .iter()
            .take(max_images)
            .map(|url| ContentPart::image(url.as_str())),
    );

    ChatMessage::user(MessageContent::Parts(parts))
}
