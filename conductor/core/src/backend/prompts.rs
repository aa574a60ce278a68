//! Prompt Builders
//!
//! Pure functions that turn a poem into the text sent to the AI service.

use crate::poem::Poem;

/// Prompt asking for a mood/summary/themes analysis of the whole poem
#[must_use]
pub fn analysis_prompt(poem: &Poem) -> String {
    format!(
        "Analyze the following poem titled \"{title}\" by {author}.\n\
         Poem text:\n\
         {text}\n\
         \n\
         Provide a JSON response with:\n\
         - mood: A few words describing the mood.\n\
         - summary: A 2-sentence summary.\n\
         - themes: An array of 3-4 key themes.\n",
        title = poem.title,
        author = poem.author,
        text = poem.text(),
    )
}

/// Prompt asking for an illustration, built from the opening lines
#[must_use]
pub fn image_prompt(poem: &Poem, opening_lines: usize) -> String {
    format!(
        "A dreamy, artistic, abstract visual representation of this poem: \"{title}\" by {author}.\n\
         The mood is {opening}.\n\
         Style: Soft, ethereal, high quality, digital art.",
        title = poem.title,
        author = poem.author,
        opening = poem.opening_lines(opening_lines).join(" "),
    )
}

/// JSON schema constraining the analysis response
#[must_use]
pub fn analysis_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "mood": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "themes": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        }
    })
}
