//! LLM prompt engineering for emotion analysis

use emoletr_llm::PromptPayload;

/// Maximum number of characters of document text embedded in the prompt
pub const MAX_PROMPT_CHARS: usize = 4000;

/// Builds the fixed analysis conversation for a document
pub struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    /// Create a new prompt builder, keeping only the embeddable prefix of `text`
    pub fn new(text: &str) -> Self {
        Self {
            text: truncate_chars(text, MAX_PROMPT_CHARS).to_string(),
        }
    }

    /// The text that will be embedded in the prompt
    pub fn embedded_text(&self) -> &str {
        &self.text
    }

    /// Build the complete analysis payload
    pub fn build(&self) -> PromptPayload {
        let mut prompt = String::new();

        // 1. Role and task
        prompt.push_str(ANALYSIS_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. The text to analyze
        prompt.push_str("Texte à analyser:\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n\n");

        // 3. Output format
        prompt.push_str(OUTPUT_FORMAT);

        PromptPayload::new(SYSTEM_ROLE, prompt)
    }
}

/// Convenience wrapper: build the payload for `text` in one call
pub fn build(text: &str) -> PromptPayload {
    PromptBuilder::new(text).build()
}

/// Prefix of `text` holding at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

const SYSTEM_ROLE: &str = "Tu es un expert en analyse émotionnelle de la littérature francophone et maghrébine, spécialisé dans la littérature post-coloniale algérienne.";

const ANALYSIS_INSTRUCTIONS: &str = r#"Tu es un expert en analyse émotionnelle de la littérature française et maghrébine, spécialisé dans la littérature post-coloniale algérienne.

Analyse le texte suivant et identifie les émotions présentes. Pour chaque émotion détectée, fournis:
1. Le type d'émotion (joie, tristesse, colère, peur, surprise, dégoût, nostalgie, espoir, etc.)
2. L'intensité (faible, moyenne, forte) sur une échelle de 0 à 100
3. Les passages du texte qui expriment cette émotion
4. Le contexte culturel et post-colonial si pertinent"#;

const OUTPUT_FORMAT: &str = r#"Réponds au format JSON avec la structure suivante:
{
    "emotions": [
        {
            "type": "nom de l'émotion",
            "intensity": score de 0 à 100,
            "percentage": pourcentage,
            "passages": ["extrait1", "extrait2"],
            "context": "contexte culturel"
        }
    ],
    "dominant_emotion": "émotion principale",
    "emotional_tone": "ton général (positif/négatif/neutre/mixte)",
    "cultural_notes": "notes sur le contexte post-colonial algérien",
    "summary": "résumé de l'analyse émotionnelle"
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text() {
        let payload = build("Le soleil se levait sur Oran.");
        assert!(payload.user.contains("Le soleil se levait sur Oran."));
    }

    #[test]
    fn test_prompt_includes_instructions_and_schema() {
        let payload = build("Test");
        assert!(payload.user.contains("identifie les émotions présentes"));
        for field in [
            "\"emotions\"",
            "\"type\"",
            "\"intensity\"",
            "\"percentage\"",
            "\"passages\"",
            "\"context\"",
            "\"dominant_emotion\"",
            "\"emotional_tone\"",
            "\"cultural_notes\"",
            "\"summary\"",
        ] {
            assert!(payload.user.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_system_role() {
        let payload = build("Test");
        assert!(payload.system.contains("littérature francophone et maghrébine"));
        assert!(payload.system.contains("post-coloniale algérienne"));
    }

    #[test]
    fn test_short_text_embedded_unmodified() {
        let text = "é".repeat(MAX_PROMPT_CHARS);
        let builder = PromptBuilder::new(&text);
        assert_eq!(builder.embedded_text(), text);
    }

    #[test]
    fn test_long_text_truncated_to_char_limit() {
        // Multi-byte characters: the cap counts characters, not bytes
        let head = "à".repeat(MAX_PROMPT_CHARS);
        let text = format!("{}TAIL_MARKER", head);

        let builder = PromptBuilder::new(&text);
        assert_eq!(builder.embedded_text(), head);
        assert!(!builder.build().user.contains("TAIL_MARKER"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("ééé", 2), "éé");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_build_is_deterministic() {
        let text = "Nedjma, l'étoile, et la mémoire de Constantine.";
        let first = build(text);
        for _ in 0..5 {
            assert_eq!(build(text), first);
        }
    }
}
