//! Static per-month reading content
//!
//! Every saved reading is enriched with the quote, author, and four trait
//! points for its birth month, plus a prediction shared by all readings.

/// Prediction text stored with every reading
pub const PREDICTION: &str = "This year marks a turning point in your life journey. \
Expect unexpected opportunities that will lead to personal growth.";

/// Quote, author, and trait points for one birth month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthContent {
    pub quote: &'static str,
    pub author: &'static str,
    pub points: [&'static str; 4],
}

/// Content for months 1 through 12, in order
pub const MONTH_CONTENT: [MonthContent; 12] = [
    MonthContent {
        quote: "Go confidently in the direction of your dreams...",
        author: "Henry David Thoreau",
        points: ["Ambitious goal-setting", "Disciplined approach", "Innovative thinking", "Strong work ethic"],
    },
    MonthContent {
        quote: "The quieter you become, the more you are able to hear.",
        author: "Rumi",
        points: ["Deep intuition", "Creative expression", "Empathetic nature", "Resilient spirit"],
    },
    MonthContent {
        quote: "If nothing ever changed, there would be no butterflies.",
        author: "Unknown",
        points: ["Transformative energy", "Passionate drive", "Open-mindedness", "Creative potential"],
    },
    MonthContent {
        quote: "What you do makes a difference...",
        author: "Jane Goodall",
        points: ["Natural leadership", "Practical wisdom", "Strategic thinking", "Hopeful outlook"],
    },
    MonthContent {
        quote: "What you think, you become...",
        author: "Buddha",
        points: ["Grounded nature", "Dynamic energy", "Creative manifestation", "Intellectual growth"],
    },
    MonthContent {
        quote: "Happiness is not something ready-made...",
        author: "Dalai Lama",
        points: ["Intellectual depth", "Emotional intelligence", "Joy-seeking nature", "Sage wisdom"],
    },
    MonthContent {
        quote: "Peace cannot be kept by force...",
        author: "Albert Einstein",
        points: ["Intuitive nature", "Radiant personality", "Harmony-seeking", "Emotional depth"],
    },
    MonthContent {
        quote: "You are braver than you believe...",
        author: "A.A. Milne",
        points: ["Courageous spirit", "Inner strength", "Intellectual sharpness", "Self-love capacity"],
    },
    MonthContent {
        quote: "To live is the rarest thing...",
        author: "Oscar Wilde",
        points: ["Analytical mind", "Diplomatic skills", "Intentional living", "Spiritual awareness"],
    },
    MonthContent {
        quote: "You must do the thing you think you cannot do.",
        author: "Eleanor Roosevelt",
        points: ["Charming personality", "Transformative power", "Courage to overcome", "Hidden talents"],
    },
    MonthContent {
        quote: "Letting go gives us freedom...",
        author: "Thich Nhat Hanh",
        points: ["Soulful depth", "Philosophical mind", "Freedom-seeking", "Transformative release"],
    },
    MonthContent {
        quote: "Wherever you go, go with all your heart.",
        author: "Confucius",
        points: ["Adventurous spirit", "Ambitious drive", "Wholehearted living", "Fresh perspective"],
    },
];

/// Look up the content for a birth month.
///
/// Months outside 1..=12 fall back to January's content instead of being
/// rejected. This hides bad input from the client and may be worth revisiting.
pub fn month_content(month: i32) -> &'static MonthContent {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|index| MONTH_CONTENT.get(index))
        .unwrap_or(&MONTH_CONTENT[0])
}
