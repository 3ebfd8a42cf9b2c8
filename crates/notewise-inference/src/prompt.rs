//! Prompt for note analysis.

/// Build the analysis prompt for a note.
///
/// `ui_mode` is the editor mode the user picked and is passed through as a
/// hint. `language` is the language requested for the summary and tags.
/// The note text always comes last so the instructions cannot be pushed out
/// of view by a long note.
pub fn analysis_prompt(text: &str, ui_mode: &str, language: &str) -> String {
    format!(
        r#"You are a smart note editor.

For the NOTE below:
- Write a short summary in {language} (1-2 sentences).
- Produce 3-7 tags in {language}.
- Fill in these fields:
  - keywords: 3-10 keywords
  - sentiment: "positive" | "negative" | "neutral"
  - importance: integer from 1 to 5
  - mode:
      "suggest_fix"  : fix the user's spelling and wording mistakes,
      "auto_expand"  : expand the content without changing the user's style,
      "title_only"   : there is no content, write sensible content from the title.

Also return, in the "suggested_content" field, the COMPLETE AND CLEAN text
that can be saved directly as the user's note.

Current UI mode: "{ui_mode}"

RETURN THE OUTPUT ONLY IN THE JSON FORMAT BELOW.
Do not add any explanation, code block, markdown or text outside the JSON:
{{
  "summary": "short summary",
  "tags": ["tag1", "tag2"],
  "ai_meta": {{
    "keywords": ["word1", "word2"],
    "sentiment": "positive|negative|neutral",
    "importance": 1,
    "mode": "suggest_fix|auto_expand|title_only",
    "suggested_content": "complete and clean content"
  }}
}}

NOTE:
{text}"#,
        language = language,
        ui_mode = ui_mode,
        text = text,
    )
    .trim()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_ends_with_note_text() {
        let prompt = analysis_prompt("Buy milk\n\nand eggs", "auto", "Turkish");
        assert!(prompt.ends_with("NOTE:\nBuy milk\n\nand eggs"));
    }

    #[test]
    fn test_prompt_carries_mode_and_language() {
        let prompt = analysis_prompt("x", "enhance", "German");
        assert!(prompt.contains("Current UI mode: \"enhance\""));
        assert!(prompt.contains("summary in German"));
        assert!(prompt.contains("tags in German"));
    }

    #[test]
    fn test_prompt_lists_all_modes_and_sentiments() {
        let prompt = analysis_prompt("x", "auto", "Turkish");
        for word in [
            "suggest_fix",
            "auto_expand",
            "title_only",
            "positive",
            "negative",
            "neutral",
            "suggested_content",
        ] {
            assert!(prompt.contains(word), "prompt should mention {}", word);
        }
    }

    #[test]
    fn test_prompt_json_template_braces_render() {
        let prompt = analysis_prompt("x", "auto", "Turkish");
        assert!(prompt.contains("\n{\n  \"summary\""));
        assert!(!prompt.contains("{{"));
    }
}
