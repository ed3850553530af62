use net::MoodLabel;

/// Said when the ambient path cannot reach a verdict.
pub const GENERIC: &str = "I'm not sure how I feel right now.";

/// Fixed line for each mood, used whenever the oracle has nothing better.
pub fn fallback(mood: MoodLabel) -> &'static str {
    match mood {
        MoodLabel::Happy => "I'm feeling great! My light and water are perfect.",
        MoodLabel::Thirsty => "I'm so thirsty! My soil is very dry.",
        MoodLabel::Sad => "I'm feeling a little down today.",
        MoodLabel::Overwatered => "My roots are soaking. Please hold the water for a while.",
        MoodLabel::LowLight => "It's so dark in here. I need more light.",
        MoodLabel::HighLight => "I'm soaking up the sun!",
        MoodLabel::Smart => "I've been thinking about photosynthesis.",
        MoodLabel::Touched => "Hey, that tickles!",
        MoodLabel::Neutral => GENERIC,
        MoodLabel::Cold => "Brr, it's getting cold in here.",
        MoodLabel::Hot => "Phew, it is getting hot.",
    }
}
