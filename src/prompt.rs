use crate::encoder::EncodedImage;
use crate::providers::{GenerateRequest, Part, ResponseFormat};
use crate::schema::recipe_schema;

/// Prompt for the decorative split-screen illustration on the landing view.
///
/// Loaded from `hero_prompt.txt` at compile time.
pub const HERO_PROMPT: &str = include_str!("hero_prompt.txt");

/// Instruction sent after the ingredient photos in the extraction request
pub const EXTRACTION_INSTRUCTION: &str = "Analyze the ingredients in these image(s) and generate a list of the key ingredients found, plus 3-4 diverse recipes I can make. Provide the output in the requested JSON format.";

/// Request for the hero illustration
pub fn build_hero_prompt() -> GenerateRequest {
    GenerateRequest {
        parts: vec![Part::Text(HERO_PROMPT.to_string())],
        format: ResponseFormat::ImageAndText,
    }
}

/// Request that turns ingredient photos into an ingredient list and recipes.
///
/// Images come first, in the order given, followed by the instruction. The
/// reply is constrained by [`recipe_schema`].
pub fn build_extraction_request(images: &[EncodedImage]) -> GenerateRequest {
    let mut parts: Vec<Part> = images.iter().cloned().map(Part::InlineData).collect();
    parts.push(Part::Text(EXTRACTION_INSTRUCTION.to_string()));

    GenerateRequest {
        parts,
        format: ResponseFormat::Json(recipe_schema()),
    }
}

pub fn recipe_image_prompt(title: &str) -> String {
    format!(
        "A delicious, photorealistic, professionally styled photo of \"{}\".",
        title
    )
}

/// Request for a photo of a single recipe
pub fn build_recipe_image_prompt(title: &str) -> GenerateRequest {
    GenerateRequest {
        parts: vec![Part::Text(recipe_image_prompt(title))],
        format: ResponseFormat::ImageAndText,
    }
}
