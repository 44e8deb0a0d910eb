//! Property-based tests for rust_clog using proptest

use parking_lot::Mutex;
use proptest::prelude::*;
use rust_clog::core::{format_message, sanitize_line, DedupeState, DEFAULT_SUMMARY_FORMAT};
use rust_clog::prelude::*;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

fn any_level() -> impl Strategy<Value = Level> {
    (0u8..Level::COUNT as u8).prop_map(|i| Level::try_from(i).unwrap())
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Level string conversions roundtrip, in any letter case
    #[test]
    fn test_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let name = if lower { level.to_str().to_lowercase() } else { level.to_str().to_string() };
        let parsed: Level = name.parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Ordering agrees with the numeric index
    #[test]
    fn test_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a.cmp(&b), a.index().cmp(&b.index()));
    }

    /// Serialized form is the upper-case name
    #[test]
    fn test_level_json(level in any_level()) {
        let json = serde_json::to_string(&level).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", level));
    }

    #[test]
    fn test_level_invalid_parse(name in "[a-z]{12,20}") {
        prop_assert!(name.parse::<Level>().is_err());
    }
}

// ============================================================================
// Formatting Tests
// ============================================================================

proptest! {
    /// A template without arguments is never interpreted
    #[test]
    fn test_template_without_params_is_verbatim(template in ".*") {
        prop_assert_eq!(format_message(&template, &[]), template);
    }

    #[test]
    fn test_integer_directive_matches_display(value in any::<i64>(), unsigned in any::<u64>()) {
        prop_assert_eq!(
            format_message("%d/%d", &[Param::from(value), Param::from(unsigned)]),
            format!("{}/{}", value, unsigned)
        );
    }

    #[test]
    fn test_string_directive_inserts_argument(
        prefix in "[a-z ]{0,10}",
        arg in ".*",
    ) {
        let template = format!("{}%s", prefix);
        prop_assert_eq!(
            format_message(&template, &[Param::from(arg.as_str())]),
            format!("{}{}", prefix, arg)
        );
    }

    /// Arguments beyond the directives are ignored
    #[test]
    fn test_surplus_arguments_ignored(extra in prop::collection::vec(any::<i32>(), 1..5)) {
        let mut params = vec![Param::from("x")];
        params.extend(extra.into_iter().map(Param::from));
        prop_assert_eq!(format_message("only %s", &params), "only x");
    }

    /// Sanitized messages never span lines
    #[test]
    fn test_sanitize_line_single_line(message in ".*") {
        let line = sanitize_line(&message);
        prop_assert!(!line.contains('\n'));
        prop_assert!(!line.contains('\r'));
        prop_assert!(!line.contains('\t'));
    }
}

// ============================================================================
// Dedupe Tests
// ============================================================================

proptest! {
    /// Every event is either emitted or counted into exactly one summary
    #[test]
    fn test_dedupe_accounts_for_every_event(
        events in prop::collection::vec((0u8..2, 0u8..2), 1..60)
    ) {
        let mut state = DedupeState::new(true, DEFAULT_SUMMARY_FORMAT);
        let mut emitted = 0u64;
        let mut summarized = 0u64;

        for (level, text) in &events {
            let level = if *level == 0 { Level::Info } else { Level::Error };
            let decision = state.check(level, "P", &text.to_string());
            if decision.emit_summary_first {
                let pending = state.repeat_count();
                prop_assert!(state.flush_summary().is_some());
                summarized += pending;
            }
            if !decision.suppress {
                emitted += 1;
            }
        }
        summarized += state.repeat_count();
        state.flush_summary();

        prop_assert_eq!(emitted + summarized, events.len() as u64);
        prop_assert_eq!(state.repeat_count(), 0);
    }
}

// ============================================================================
// Queue Policy Tests
// ============================================================================

/// Agent whose worker is parked inside a hook, so the queue does not drain
/// until the returned sender is dropped.
fn parked_agent(
    capacity: usize,
    policy: DropPolicy,
) -> (Agent, mpsc::Sender<()>, Arc<Mutex<Vec<String>>>) {
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let (entered_tx, entered_rx) = mpsc::channel::<()>();
    let release_rx = Mutex::new(release_rx);
    let entered_tx = Mutex::new(entered_tx);
    let processed = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&processed);

    let mut config = Config::default()
        .add_hook(Arc::new(move |event: &Event| {
            if event.level != Level::Debug {
                recorder.lock().push(event.message.clone());
            }
        }))
        .add_level_hook(
            Level::Debug,
            Arc::new(move |_: &Event| {
                let _ = entered_tx.lock().send(());
                let _ = release_rx.lock().recv();
            }),
        );
    config.console.enabled = false;
    config.queue_capacity = capacity;
    config.drop_policy = policy;

    let agent = Agent::new(config).unwrap();
    assert!(agent.enqueue(Event::new(Level::Debug, "Park", "park")));
    entered_rx.recv().unwrap();
    (agent, release_tx, processed)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// drop_new: exactly min(n, c) events are accepted, the rest are
    /// counted as drops for their level
    #[test]
    fn test_drop_new_accounting(capacity in 1usize..8, n in 0usize..20) {
        let (agent, release, processed) = parked_agent(capacity, DropPolicy::DropNew);

        let mut accepted = Vec::new();
        for i in 0..n {
            let level = if i % 2 == 0 { Level::Info } else { Level::Warning };
            if agent.enqueue(Event::new(level, "Q", format!("m{}", i))) {
                accepted.push(format!("m{}", i));
            }
        }
        drop(release);
        prop_assert!(agent.stop(Duration::from_secs(2)));

        let kept = n.min(capacity);
        let stats = agent.stats();
        prop_assert_eq!(accepted.len(), kept);
        prop_assert_eq!(stats.accepted as usize, kept + 1);
        prop_assert_eq!(stats.total_dropped() as usize, n - kept);
        prop_assert_eq!(processed.lock().clone(), accepted);
    }

    /// drop_old: the last c attempts are the ones processed
    #[test]
    fn test_drop_old_keeps_latest(capacity in 1usize..8, extra in 1usize..12) {
        let (agent, release, processed) = parked_agent(capacity, DropPolicy::DropOld);

        let n = capacity + extra;
        for i in 0..n {
            let enqueued = agent.enqueue(Event::new(Level::Info, "Q", format!("m{}", i)));
            prop_assert!(enqueued);
        }
        drop(release);
        prop_assert!(agent.stop(Duration::from_secs(2)));

        let expected: Vec<String> = (n - capacity..n).map(|i| format!("m{}", i)).collect();
        prop_assert_eq!(processed.lock().clone(), expected);
        prop_assert_eq!(agent.stats().evicted as usize, extra);
    }
}
