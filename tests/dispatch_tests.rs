mod common;

use common::{dispatcher, dispatcher_with, BrokenClock, ScriptedEncyclopedia};
use parley::dispatch::replies::{GREETINGS, HELP_TEXT, UNKNOWN_SUGGESTIONS, WEATHER_STUB};
use parley::dispatch::{DispatcherBuilder, FailureKind, Intent, Outcome};
use proptest::prelude::*;
use regex::Regex;
use std::sync::Arc;

#[tokio::test]
async fn test_time_uses_twelve_hour_clock() {
    let d = dispatcher();
    let response = d.process_command("What time is it?").await;
    assert_eq!(response.text, "The current time is 02:07 PM");
}

#[tokio::test]
async fn test_time_format_on_system_clock() {
    let d = DispatcherBuilder::default().seed(1).build().unwrap();
    let response = d.process_command("what time is it").await;
    let shape = Regex::new(r"^The current time is \d{2}:\d{2} (AM|PM)$").unwrap();
    assert!(shape.is_match(&response.text), "got {:?}", response.text);
}

#[tokio::test]
async fn test_date_spells_out_weekday_and_month() {
    let d = dispatcher();
    let response = d.process_command("tell me the date").await;
    assert_eq!(response.text, "Today is Tuesday, March 05, 2024");
}

#[tokio::test]
async fn test_clock_failure_is_recovered() {
    let d = DispatcherBuilder::default()
        .clock(Arc::new(BrokenClock))
        .seed(1)
        .build()
        .unwrap();

    let time = d.dispatch("what time is it").await;
    assert_eq!(time.response.text, "Sorry, I couldn't get the current time.");
    assert_eq!(time.outcome, Outcome::Recovered(FailureKind::ClockFault));

    let date = d.dispatch("what date is it").await;
    assert_eq!(date.response.text, "Sorry, I couldn't get the current date.");
}

#[tokio::test]
async fn test_wikipedia_argument_is_captured() {
    let (d, wiki, _) = dispatcher_with(
        ScriptedEncyclopedia::new().page("python programming", "Python is a programming language."),
    );

    let matched = d.classify("Search Wikipedia for Python Programming").unwrap();
    assert_eq!(matched.intent, Intent::EncyclopediaLookup);
    assert_eq!(matched.argument.as_deref(), Some("python programming"));

    let response = d.process_command("Search Wikipedia for Python Programming").await;
    assert_eq!(response.text, "According to Wikipedia: Python is a programming language.");
    assert_eq!(wiki.calls(), vec!["summary:python programming:2"]);
}

#[tokio::test]
async fn test_earlier_intent_wins() {
    let (d, _, opener) = dispatcher_with(ScriptedEncyclopedia::new());

    let dispatched = d.dispatch("what time is it and open google").await;
    assert_eq!(dispatched.intent, Intent::Time);
    assert!(opener.opened().is_empty(), "navigation must not run");

    // Lookup is declared before weather
    let matched = d.classify("tell me about the weather").unwrap();
    assert_eq!(matched.intent, Intent::EncyclopediaLookup);
    assert_eq!(matched.argument.as_deref(), Some("the weather"));

    // "wikipedia (.+)" needs a topic, so this falls through to navigation
    let matched = d.classify("open wikipedia").unwrap();
    assert_eq!(matched.intent, Intent::WebNavigation);
}

#[tokio::test]
async fn test_patterns_match_inside_words() {
    let d = dispatcher();
    // "hi" inside "this"
    let matched = d.classify("this thing").unwrap();
    assert_eq!(matched.intent, Intent::Greeting);
}

#[tokio::test]
async fn test_canned_replies() {
    let d = dispatcher();

    let greeting = d.process_command("Hello there").await;
    assert!(GREETINGS.contains(&greeting.text.as_str()));

    assert_eq!(d.process_command("what can you do").await.text, HELP_TEXT);
    assert_eq!(d.process_command("is there a forecast").await.text, WEATHER_STUB);
}

#[tokio::test]
async fn test_unmatched_input_gets_suggestion() {
    let d = dispatcher();
    let dispatched = d.dispatch("xyzzy plugh").await;
    assert_eq!(dispatched.intent, Intent::Unknown);
    assert_eq!(dispatched.outcome, Outcome::Unmatched);
    assert!(UNKNOWN_SUGGESTIONS.contains(&dispatched.response.text.as_str()));
}

#[tokio::test]
async fn test_blank_input() {
    let d = dispatcher();
    for blank in ["", "   ", "\t\n"] {
        let dispatched = d.dispatch(blank).await;
        assert_eq!(dispatched.response.text, "I didn't hear anything.");
        assert_eq!(dispatched.outcome, Outcome::EmptyInput);
    }
}

#[tokio::test]
async fn test_same_seed_same_replies() {
    let a = DispatcherBuilder::default().seed(9).build().unwrap();
    let b = DispatcherBuilder::default().seed(9).build().unwrap();

    for _ in 0..10 {
        assert_eq!(a.process_command("hey").await, b.process_command("hey").await);
        assert_eq!(a.process_command("qwfp").await, b.process_command("qwfp").await);
    }
}

proptest! {
    #[test]
    fn test_every_input_gets_one_response(input in "[a-zA-Z0-9 .?!']{0,48}") {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let d = dispatcher();
        let response = rt.block_on(d.process_command(&input));
        prop_assert!(!response.text.is_empty());
    }

    #[test]
    fn test_classification_ignores_case_and_padding(input in "[a-z ]{1,32}") {
        let d = dispatcher();
        let plain = d.classify(&input).map(|m| m.intent);
        let shouted = d.classify(&format!("  {}  ", input.to_uppercase())).map(|m| m.intent);
        prop_assert_eq!(plain, shouted);
    }
}
