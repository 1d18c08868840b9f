//! Canned replies for intents that need no collaborator.

use rand::seq::SliceRandom;
use rand::Rng;

pub const GREETINGS: &[&str] = &[
    "Hello! How can I help you today?",
    "Hi there! What would you like to know?",
    "Hey! I'm here to assist you.",
    "Good to hear from you! What can I do for you?",
];

pub const UNKNOWN_SUGGESTIONS: &[&str] = &[
    "I'm not sure what you mean. Try asking me for the time, searching Wikipedia, or opening a website.",
    "I didn't understand that. I can tell you the time, search Wikipedia, or open websites for you.",
    "Sorry, I don't know how to do that yet. Ask me about the time, Wikipedia, or websites.",
];

pub const HELP_TEXT: &str = "I can help you with several things:
- Tell you the current time by saying 'what time is it'
- Tell you the current date by saying 'what date is it'
- Search Wikipedia by saying 'search wikipedia for' followed by your topic
- Open websites by saying 'open' followed by the website name
- Just say 'hello assistant' to wake me up anytime";

pub const WEATHER_STUB: &str = "I don't have access to weather data yet, but I can help you with time, Wikipedia searches, and opening websites.";

pub const ASK_TOPIC: &str = "What would you like me to search for on Wikipedia?";
pub const ASK_WEBSITE: &str = "Which website would you like me to open?";

pub fn pick<R: Rng + ?Sized>(rng: &mut R, choices: &[&'static str]) -> &'static str {
    choices.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn pick_is_reproducible_for_a_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..16 {
            assert_eq!(pick(&mut a, GREETINGS), pick(&mut b, GREETINGS));
        }
    }

    #[test]
    fn pick_covers_the_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pick(&mut rng, GREETINGS));
        }
        assert_eq!(seen.len(), GREETINGS.len());
    }
}
