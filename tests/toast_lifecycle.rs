#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use toaster::config::Config;
use toaster::controller::{ToastController, ToastSettings};
use toaster::event::{EventBus, ShowToast};
use toaster::presentation::PresentationTable;
use toaster::timer::ManualScheduler;
use toaster::types::Level;

fn controller() -> ToastController<ManualScheduler> {
    ToastController::simulated(ToastSettings::default(), PresentationTable::classes())
}

#[test]
fn view_model_snapshot() {
    let mut toasts = controller();
    toasts.show_toast("success", "Saved");

    insta::assert_json_snapshot!(toasts.view().expect("toast shown"), @r###"
    {
      "id": 1,
      "visible": true,
      "level": "success",
      "message": "Saved",
      "icon": "heroicons:check-circle-solid",
      "style": "bg-green-50 border border-green-200 text-green-800"
    }
    "###);
}

#[test]
fn every_level_maps_to_its_presentation() {
    let toasts = controller();
    let expected = [
        ("success", "heroicons:check-circle-solid", "green"),
        ("error", "heroicons:x-circle-solid", "red"),
        ("warning", "heroicons:exclamation-triangle-solid", "amber"),
        ("info", "heroicons:information-circle-solid", "blue"),
        ("notice", "heroicons:information-circle-solid", "blue"),
    ];
    for (level, icon, colour) in expected {
        let presentation = toasts.presentation_for(level);
        assert_eq!(presentation.icon, icon);
        assert!(presentation.style.contains(colour), "{level} should be {colour}");
    }
}

#[test]
fn full_lifecycle_on_simulated_clock() {
    let mut toasts = controller();
    toasts.show_toast("warning", "Quota at 90%");

    toasts.advance(Duration::from_millis(5_000));
    let hiding = toasts.view().expect("toast still present while fading");
    assert!(!hiding.visible);
    assert_eq!(hiding.level, Level::Warning);

    toasts.advance(Duration::from_millis(300));
    assert!(toasts.view().is_none());
}

#[test]
fn bus_events_drive_the_controller() {
    let bus = EventBus::default();
    let mut toasts = controller();
    toasts.initialize(&bus);

    bus.publish(ShowToast::new("success", "Saved"));
    bus.publish(ShowToast::new("error", "Failed"));
    assert_eq!(toasts.pump_events(), 2);

    let view = toasts.view().expect("latest toast shown");
    assert_eq!((view.level, view.message.as_str()), (Level::Error, "Failed"));
    assert_eq!(toasts.scheduler().pending(), 1);

    toasts.advance(Duration::from_millis(4_000));
    bus.publish(ShowToast::new("lol", "Unknown level"));
    toasts.pump_events();
    toasts.advance(Duration::from_millis(4_000));
    let view = toasts.view().expect("replacement still visible");
    assert!(view.visible);
    assert_eq!(view.level, Level::Info);
}

#[test]
fn configured_table_feeds_the_controller() {
    let config = Config::from_toml_str(
        r#"
        [toast]
        display_for = "1s"
        fade_out = "100ms"

        [presentation]
        scheme = "inline"

        [presentation.overrides.error]
        icon = "lucide:octagon-x"
        "#,
    )
    .expect("valid config");

    let mut toasts = ToastController::simulated(config.toast, config.presentation_table());
    toasts.show_toast("error", "Boom");
    let view = toasts.view().expect("toast shown");
    assert_eq!(view.icon, "lucide:octagon-x");
    assert!(view.style.starts_with("background-color:#fef2f2"));

    toasts.advance(Duration::from_millis(1_100));
    assert!(toasts.view().is_none());
}
