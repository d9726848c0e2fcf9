use crate::llm::prompts;
use crate::theme::Theme;

/// Everything a backend needs for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instructions: String,
    pub user_content: String,
    pub max_output_tokens: u32,
    pub temperature: f64,
}

const MAX_OUTPUT_TOKENS_CEILING: u32 = 200;

/// Temperature in hundredths, so 0.85 comes out as exactly `0.85`.
const TEMPERATURE_CEILING_CENTS: u32 = 100;

/// Fixed instruction for a drama level; levels above 10 share the top band.
pub fn drama_directive(level: u8) -> &'static str {
    prompts::DRAMA_BANDS
        .iter()
        .find(|(ceiling, _)| level <= *ceiling)
        .map(|(_, directive)| *directive)
        .unwrap_or(prompts::DRAMA_BANDS[prompts::DRAMA_BANDS.len() - 1].1)
}

/// The first `n` items, or all of them if there are fewer.
pub fn first_n<T>(items: &[T], n: usize) -> &[T] {
    &items[..items.len().min(n)]
}

pub fn max_output_tokens(level: u8) -> u32 {
    (100 + 10 * u32::from(level)).min(MAX_OUTPUT_TOKENS_CEILING)
}

pub fn temperature(level: u8) -> f64 {
    let cents = (50 + 5 * u32::from(level)).min(TEMPERATURE_CEILING_CENTS);
    f64::from(cents) / 100.0
}

/// Assemble the request for `text` in the given theme and drama level.
/// Pure: no backend is called here.
pub fn build(theme: &Theme, level: u8, text: &str) -> GenerationRequest {
    let vocabulary = first_n(&theme.vocabulary, prompts::VOCABULARY_SAMPLE).join(", ");
    let metaphors = first_n(&theme.metaphors, prompts::METAPHOR_SAMPLE).join(", ");

    let system_instructions = format!(
        "You are a creative storyteller specializing in {tone} narratives.\n\n\
         Transform software changes into epic {name} stories using this vocabulary: {vocabulary}\n\
         Include metaphors like: {metaphors}\n\
         {directive}\n\n\
         {constraint}",
        tone = theme.tone,
        name = theme.name,
        directive = drama_directive(level),
        constraint = prompts::FORMAT_CONSTRAINT,
    );

    let user_content = format!(
        "Transform this software change into an epic {name} tale: '{text}'",
        name = theme.name,
    );

    GenerationRequest {
        system_instructions,
        user_content,
        max_output_tokens: max_output_tokens(level),
        temperature: temperature(level),
    }
}

/// Trim the model output and make sure it carries a decorative symbol,
/// prefixing the theme emoji when it has none. Idempotent.
pub fn postprocess(raw_output: &str, theme: &Theme) -> String {
    let content = raw_output.trim();
    let emoji = theme.emoji_or_fallback();

    let decorated = prompts::DECORATIVE_SYMBOLS
        .iter()
        .any(|symbol| content.contains(symbol))
        || content.contains(emoji);

    if decorated {
        content.to_string()
    } else if content.is_empty() {
        emoji.to_string()
    } else {
        format!("{emoji} {content}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeSource;

    fn medieval() -> Theme {
        Theme {
            name: "medieval".into(),
            display_name: Some("Medieval Fantasy".into()),
            description: None,
            emoji: Some("⚔️".into()),
            vocabulary: [
                "vanquished", "forged", "conquered", "wielded", "summoned", "banished",
                "realm", "sacred", "legendary", "ancient",
            ]
            .map(String::from)
            .to_vec(),
            metaphors: [
                "dragon", "knight", "sword", "castle", "quest", "prophecy", "dark magic",
                "holy grail",
            ]
            .map(String::from)
            .to_vec(),
            tone: "epic fantasy adventure".into(),
            source: ThemeSource::Default,
        }
    }

    #[test]
    fn drama_bands_switch_at_boundaries() {
        assert_eq!(drama_directive(1), drama_directive(3));
        assert_ne!(drama_directive(3), drama_directive(4));
        assert_eq!(drama_directive(4), drama_directive(6));
        assert_ne!(drama_directive(6), drama_directive(7));
        assert_eq!(drama_directive(7), drama_directive(8));
        assert_ne!(drama_directive(8), drama_directive(9));
        assert_eq!(drama_directive(9), drama_directive(10));
        assert!(drama_directive(10).starts_with("Use MAXIMUM DRAMA"));
        assert_eq!(drama_directive(200), drama_directive(10));
    }

    #[test]
    fn sampling_parameters_are_monotonic_and_capped() {
        let mut prev = (0, 0.0);
        for level in 1..=30u8 {
            let tokens = max_output_tokens(level);
            let temp = temperature(level);
            assert!(tokens >= prev.0 && temp >= prev.1, "level {level}");
            assert!(tokens <= 200 && temp <= 1.0, "level {level}");
            prev = (tokens, temp);
        }
        assert_eq!(max_output_tokens(1), 110);
        assert_eq!(temperature(1), 0.55);
        assert_eq!(max_output_tokens(10), 200);
        assert_eq!(temperature(10), 1.0);
    }

    #[test]
    fn build_medieval_level_seven() {
        let request = build(&medieval(), 7, "Fixed minor bug in login form");

        assert!(request.system_instructions.contains("epic fantasy adventure"));
        assert!(request.system_instructions.contains("vanquished"));
        assert!(request.system_instructions.contains("dragon"));
        assert!(request.system_instructions.contains(drama_directive(7)));
        assert!(request.system_instructions.contains("one appropriate emoji"));
        assert!(request.user_content.contains("'Fixed minor bug in login form'"));
        assert!(request.user_content.contains("medieval"));
        assert_eq!(request.max_output_tokens, 170);
        assert_eq!(request.temperature, 0.85);
    }

    #[test]
    fn build_samples_only_leading_words() {
        let request = build(&medieval(), 5, "x");
        // 8th vocabulary word and 6th metaphor make it, the next ones do not
        assert!(request.system_instructions.contains("sacred"));
        assert!(!request.system_instructions.contains("legendary"));
        assert!(!request.system_instructions.contains("ancient"));
        assert!(request.system_instructions.contains("prophecy"));
        assert!(!request.system_instructions.contains("dark magic"));
    }

    #[test]
    fn build_is_deterministic() {
        let theme = medieval();
        assert_eq!(build(&theme, 4, "Bumped deps"), build(&theme, 4, "Bumped deps"));
    }

    #[test]
    fn first_n_tolerates_short_lists() {
        let short = ["a", "b"];
        assert_eq!(first_n(&short, 8), &["a", "b"]);
        assert_eq!(first_n(&short, 1), &["a"]);
        assert!(first_n::<&str>(&[], 6).is_empty());
    }

    #[test]
    fn postprocess_prefixes_theme_emoji_once() {
        let theme = medieval();
        let out = postprocess("  The login dragon was vanquished!\n", &theme);
        assert_eq!(out, "⚔️ The login dragon was vanquished!");
        assert_eq!(postprocess(&out, &theme), out);
    }

    #[test]
    fn postprocess_keeps_decorated_text() {
        let theme = medieval();
        assert_eq!(
            postprocess(" 🐉 The beast is slain \n", &theme),
            "🐉 The beast is slain"
        );
    }

    #[test]
    fn postprocess_falls_back_to_generic_symbol() {
        let mut theme = medieval();
        theme.emoji = None;
        assert_eq!(postprocess("Bug slain", &theme), "🎭 Bug slain");

        theme.emoji = Some("🌊".into());
        let once = postprocess("Tide turned", &theme);
        assert_eq!(once, "🌊 Tide turned");
        assert_eq!(postprocess(&once, &theme), once);
    }
}
