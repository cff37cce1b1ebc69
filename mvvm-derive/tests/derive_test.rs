use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use mvvm_core::{Event, EventAggregator, EventKind, PropertyNames, SubscriberId};
use mvvm_core::view_model::PropertyChanged;

#[derive(Debug, Event)]
struct ZoomChanged(i64);

#[derive(Debug, Event)]
#[event(name = "document.saved")]
struct DocumentSaved {
    path: String,
}

#[derive(Debug, Event)]
struct Tagged<T: Send + Sync + 'static> {
    tag: T,
}

#[allow(dead_code)]
#[derive(PropertyNames)]
struct EditorViewModel {
    #[property(skip)]
    changed: PropertyChanged,
    zoom: i64,
    file_name: String,
    r#type: String,
}

#[test]
fn test_event_names() {
    assert!(ZoomChanged::name().ends_with("ZoomChanged"));
    assert_eq!(DocumentSaved::name(), "document.saved");
    assert_eq!(DocumentSaved::kind().to_string(), "document.saved");
    assert_eq!(DocumentSaved::kind(), EventKind::of::<DocumentSaved>());
    assert_ne!(Tagged::<u8>::kind(), Tagged::<u16>::kind());
}

#[test]
fn test_derived_events_flow_through_aggregator() {
    let aggregator = EventAggregator::new();
    let subscriber = SubscriberId::new();
    let zoom = Arc::new(AtomicI64::new(0));
    let sink = zoom.clone();
    assert!(aggregator.subscribe(&subscriber, move |event: &ZoomChanged| {
        sink.store(event.0, Ordering::SeqCst);
        Ok(())
    }));
    assert!(aggregator.subscribe(&subscriber, |event: &DocumentSaved| {
        anyhow::ensure!(!event.path.is_empty(), "saved without a path");
        Ok(())
    }));
    assert!(aggregator.publish(ZoomChanged(150)));
    assert_eq!(zoom.load(Ordering::SeqCst), 150);
    assert!(aggregator.try_publish(DocumentSaved { path: String::new() }).is_err());
    assert!(!aggregator.publish(Tagged { tag: 1u8 }));
}

#[test]
fn test_property_names() {
    assert_eq!(EditorViewModel::PROP_ZOOM, "zoom");
    assert_eq!(EditorViewModel::PROP_FILE_NAME, "file_name");
    assert_eq!(EditorViewModel::PROP_TYPE, "type");
    assert_eq!(EditorViewModel::PROPERTIES, &["zoom", "file_name", "type"]);
}
