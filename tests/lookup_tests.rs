mod common;

use common::{dispatcher_with, fixed_clock, ScriptedEncyclopedia};
use parley::dispatch::catalog::{Catalog, IntentSpec};
use parley::dispatch::replies::ASK_TOPIC;
use parley::dispatch::{DispatcherBuilder, FailureKind, Intent, LookupSettings, Outcome};
use parley::services::LookupError;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_missing_page_falls_back_to_search() {
    let (d, wiki, _) = dispatcher_with(
        ScriptedEncyclopedia::new()
            .hits("rust lang", &["Rust (programming language)", "Rust"])
            .page("Rust (programming language)", "Rust is a systems language."),
    );

    let response = d.process_command("look up rust lang").await;
    assert_eq!(response.text, "According to Wikipedia: Rust is a systems language.");
    assert_eq!(
        wiki.calls(),
        vec![
            "summary:rust lang:2",
            "search:rust lang:3",
            "summary:Rust (programming language):2",
        ]
    );
}

#[tokio::test]
async fn test_empty_search_is_not_found() {
    let (d, _, _) = dispatcher_with(ScriptedEncyclopedia::new());

    let dispatched = d.dispatch("wikipedia zzqx").await;
    assert_eq!(dispatched.response.text, "I couldn't find information about zzqx on Wikipedia.");
    assert_eq!(dispatched.outcome, Outcome::Recovered(FailureKind::LookupNotFound));
}

#[tokio::test]
async fn test_search_hit_without_page() {
    let (d, _, _) = dispatcher_with(ScriptedEncyclopedia::new().hits("zzqx", &["Zzqx (band)"]));

    let response = d.process_command("wikipedia zzqx").await;
    assert_eq!(
        response.text,
        "I couldn't find a Wikipedia page for zzqx. Try rephrasing your search."
    );
}

#[tokio::test]
async fn test_ambiguous_topic_takes_first_option() {
    let (d, wiki, _) = dispatcher_with(
        ScriptedEncyclopedia::new()
            .summary_error(
                "mercury",
                LookupError::Disambiguation(vec!["Mercury (planet)".into(), "Mercury (element)".into()]),
            )
            .page("Mercury (planet)", "Mercury is the first planet from the Sun."),
    );

    let response = d.process_command("tell me about mercury").await;
    assert_eq!(
        response.text,
        "I found multiple results. Here's information about Mercury (planet): Mercury is the first planet from the Sun."
    );
    assert_eq!(wiki.calls().len(), 2, "no search on ambiguity");
}

#[tokio::test]
async fn test_ambiguous_without_options() {
    let (d, _, _) = dispatcher_with(
        ScriptedEncyclopedia::new().summary_error("mercury", LookupError::Disambiguation(Vec::new())),
    );

    let dispatched = d.dispatch("tell me about mercury").await;
    assert_eq!(
        dispatched.response.text,
        "I found multiple results for mercury. Could you be more specific?"
    );
    assert_eq!(dispatched.outcome, Outcome::Recovered(FailureKind::LookupAmbiguous));
}

#[tokio::test]
async fn test_service_fault_is_apologised() {
    let (d, _, _) = dispatcher_with(
        ScriptedEncyclopedia::new().summary_error("rust", LookupError::Fault("HTTP 503".into())),
    );

    let dispatched = d.dispatch("wikipedia rust").await;
    assert_eq!(dispatched.response.text, "Sorry, I had trouble searching Wikipedia for rust.");
    assert_eq!(dispatched.outcome, Outcome::Recovered(FailureKind::LookupServiceFault));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let wiki = Arc::new(ScriptedEncyclopedia::new().page("rust", "Rust.").slow(Duration::from_secs(5)));
    let d = DispatcherBuilder::default()
        .clock(fixed_clock())
        .encyclopedia(wiki)
        .lookup(LookupSettings {
            timeout: Duration::from_millis(50),
            ..LookupSettings::default()
        })
        .seed(1)
        .build()
        .unwrap();

    let dispatched = d.dispatch("wikipedia rust").await;
    assert_eq!(dispatched.response.text, "Sorry, I had trouble searching Wikipedia for rust.");
    assert!(dispatched.elapsed < Duration::from_secs(2));
}

#[tokio::test]
async fn test_sentence_count_is_configurable() {
    let wiki = Arc::new(ScriptedEncyclopedia::new().page("rust", "Rust."));
    let d = DispatcherBuilder::default()
        .encyclopedia(wiki.clone())
        .lookup(LookupSettings {
            sentences: 4,
            ..LookupSettings::default()
        })
        .seed(1)
        .build()
        .unwrap();

    d.process_command("wikipedia rust").await;
    assert_eq!(wiki.calls(), vec!["summary:rust:4"]);
}

const KEYWORD_ONLY: &[IntentSpec] = &[IntentSpec {
    intent: Intent::EncyclopediaLookup,
    patterns: &["wikipedia"],
    fallback_keyword: Some("wikipedia"),
}];

#[tokio::test]
async fn test_keyword_fallback_extracts_topic() {
    let wiki = Arc::new(ScriptedEncyclopedia::new().page("cats", "Cats are small carnivores."));
    let d = DispatcherBuilder::default()
        .catalog(Catalog::compile(KEYWORD_ONLY).unwrap())
        .encyclopedia(wiki.clone())
        .seed(1)
        .build()
        .unwrap();

    let matched = d.classify("cats on wikipedia").unwrap();
    assert_eq!(matched.argument.as_deref(), Some("cats on"));

    let response = d.process_command("wikipedia cats").await;
    assert_eq!(response.text, "According to Wikipedia: Cats are small carnivores.");

    // Nothing left after stripping the keyword
    let response = d.process_command("Wikipedia").await;
    assert_eq!(response.text, ASK_TOPIC);
    assert_eq!(wiki.calls(), vec!["summary:cats:2"]);
}
