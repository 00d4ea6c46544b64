#![forbid(unsafe_code)]

//! Structured log output of a drag, captured through a subscriber layer.
//!
//! Assertions key on event targets and field values, never on formatting.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use reorder_core::geometry::Point;
use reorder_core::id::CollectionId;
use reorder_harness::{BoardLayout, Scenario};
use reorder_insertion::CollectionOptions;
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One emitted event: level, target, and its fields rendered as text.
#[derive(Debug, Clone)]
struct Logged {
    level: Level,
    target: &'static str,
    fields: BTreeMap<&'static str, String>,
}

impl Logged {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn is(&self, target: &str, message: &str) -> bool {
        self.target == target && self.field("message") == Some(message)
    }
}

impl Visit for Logged {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields.insert(field.name(), format!("{value:?}"));
    }
}

#[derive(Clone, Default)]
struct Sink(Arc<Mutex<Vec<Logged>>>);

impl<S: tracing::Subscriber> Layer<S> for Sink {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut logged = Logged {
            level: *meta.level(),
            target: meta.target(),
            fields: BTreeMap::new(),
        };
        event.record(&mut logged);
        self.0.lock().unwrap().push(logged);
    }
}

/// Run `f` under a subscriber that records every event, returning them.
fn logged_during(f: impl FnOnce()) -> Vec<Logged> {
    let sink = Sink::default();
    let subscriber = tracing_subscriber::registry().with(sink.clone());
    tracing::subscriber::with_default(subscriber, f);
    sink.0.lock().unwrap().clone()
}

fn find<'a>(events: &'a [Logged], target: &str, message: &str) -> &'a Logged {
    events
        .iter()
        .find(|event| event.is(target, message))
        .unwrap_or_else(|| panic!("no {target} event {message:?}"))
}

fn p() -> CollectionId {
    CollectionId::new(1).unwrap()
}

fn q() -> CollectionId {
    CollectionId::new(2).unwrap()
}

fn two_lists(q_group: &str) -> Scenario<&'static str> {
    let mut scenario = Scenario::new();
    scenario
        .add(
            p(),
            Point::ORIGIN,
            200.0,
            BoardLayout::COLUMN,
            vec!["a", "b", "c"],
            CollectionOptions::default().group("todo"),
        )
        .unwrap();
    scenario
        .add(
            q(),
            Point::new(300.0, 0.0),
            200.0,
            BoardLayout::COLUMN,
            vec!["m"],
            CollectionOptions::default().group(q_group),
        )
        .unwrap();
    scenario.tick();
    scenario
}

#[test]
fn reorder_logs_plan_and_commit() {
    let events = logged_during(|| {
        let mut scenario = two_lists("todo");
        scenario.start(p(), 0).unwrap();
        let past_c = scenario.after(p(), 2).unwrap();
        scenario.drag_over(p(), past_c);
        scenario.drop();
    });

    let committed = find(&events, "reorder.commit", "reordered");
    assert_eq!(committed.level, Level::INFO);
    assert_eq!(committed.field("collection"), Some("collection#1"));
    assert_eq!(committed.field("previous_position"), Some("0"));
    assert_eq!(committed.field("position"), Some("2"));

    let planned = find(&events, "reorder.commit", "reorder planned");
    assert_eq!(planned.level, Level::DEBUG);
    assert_eq!(planned.field("direction"), Some("ascending"));
    assert_eq!(planned.field("target_index"), Some("2"));

    let started = find(&events, "reorder.transition", "drag started");
    assert_eq!(started.field("sortable"), Some("true"));
    assert!(events.iter().any(|event| {
        event.is("reorder.transition", "transition") && event.field("effect") == Some("reordering")
    }));
}

#[test]
fn rejection_is_logged_with_reason() {
    let events = logged_during(|| {
        let mut scenario = two_lists("done");
        scenario.start(p(), 0).unwrap();
        let before_m = scenario.before(q(), 0).unwrap();
        scenario.drag_over(q(), before_m);
        scenario.drop();
    });

    let rejected = find(&events, "reorder.transition", "transfer rejected");
    assert_eq!(rejected.level, Level::DEBUG);
    assert_eq!(rejected.field("reason"), Some("group_mismatch"));
    assert_eq!(rejected.field("collection"), Some("collection#2"));

    assert_eq!(find(&events, "reorder.transition", "pointer ignored").level, Level::TRACE);

    let no_move = find(&events, "reorder.commit", "drop without move");
    assert_eq!(no_move.field("reason"), Some("no_target"));
    assert!(
        events
            .iter()
            .filter(|event| event.target == "reorder.commit")
            .all(|event| event.level != Level::INFO)
    );
}

#[test]
fn returning_home_is_logged() {
    let events = logged_during(|| {
        let mut scenario = two_lists("todo");
        scenario.start(p(), 0).unwrap();
        let before_m = scenario.before(q(), 0).unwrap();
        scenario.drag_over(q(), before_m);
        let past_c = scenario.after(p(), 2).unwrap();
        scenario.drag_over(p(), past_c);
    });

    let home = find(&events, "reorder.transition", "returned to initial collection");
    assert_eq!(home.level, Level::DEBUG);
    assert_eq!(home.field("collection"), Some("collection#1"));
    assert!(!events.iter().any(|event| event.is("reorder.transition", "transfer rejected")));
}

#[test]
fn zoning_reports_each_collection() {
    let events = logged_during(|| {
        two_lists("todo");
    });

    for (collection, items) in [("collection#1", "3"), ("collection#2", "1")] {
        assert!(
            events.iter().any(|event| {
                event.is("reorder.zoning", "zones computed")
                    && event.field("collection") == Some(collection)
                    && event.field("zoned") == Some(items)
            }),
            "no zoning event for {collection}"
        );
    }
}
