/// Drama bands, checked in order: the first band whose ceiling is at or above
/// the requested level wins. The last ceiling covers everything above 8.
pub const DRAMA_BANDS: &[(u8, &str)] = &[
    (3, "Use subtle epic language with moderate excitement."),
    (
        6,
        "Use dramatic language with strong action words and vivid imagery.",
    ),
    (
        8,
        "Use highly dramatic language with intense action, multiple adjectives, and epic stakes.",
    ),
    (
        u8::MAX,
        "Use MAXIMUM DRAMA with over-the-top language, legendary consequences, and world-shaking events!",
    ),
];

pub const FORMAT_CONSTRAINT: &str =
    "Keep responses to 7-10 words with one appropriate emoji. Be direct and dramatic.";

/// Any of these in the model output counts as "already decorated".
pub const DECORATIVE_SYMBOLS: &[&str] = &["⚔", "🏰", "🐉", "🚀", "💥", "⚡", "🎭"];

/// How many vocabulary words and metaphors go into the instructions.
pub const VOCABULARY_SAMPLE: usize = 8;
pub const METAPHOR_SAMPLE: usize = 6;
