//! Front-panel flow: edge interrupt → debounce ticks → relay toggles.

use crate::mock_hw::{MockButtons, MockEeprom, MockRelays, RecordingSink};

use outletboard::app::debounce::DebounceMode;
use outletboard::app::events::AppEvent;
use outletboard::app::relay_store::{RelayStore, SharedRelayStore};
use outletboard::app::service::PanelService;
use outletboard::config::BoardConfig;
use outletboard::drivers::hw_timer::DebounceTimer;
use outletboard::events::{self, Event};

fn shared() -> SharedRelayStore<MockRelays, MockEeprom> {
    SharedRelayStore::new(RelayStore::new(MockRelays::default(), MockEeprom::default()))
}

/// Run `n` sampling periods.
fn ticks(
    panel: &mut PanelService<'_, MockRelays, MockEeprom>,
    buttons: &mut MockButtons,
    timer: &mut DebounceTimer,
    sink: &mut RecordingSink,
    n: usize,
) {
    for _ in 0..n {
        panel.on_debounce_tick(buttons, timer, sink);
    }
}

#[test]
fn start_arms_edge_and_reports_groups() {
    let store = shared();
    let config = BoardConfig::default();
    let mut timer = DebounceTimer::new(&config).unwrap();
    let mut sink = RecordingSink::default();

    let mut panel = PanelService::new(&store, &config);
    panel.start(&mut timer, &mut sink);

    assert!(timer.is_edge_armed());
    assert!(!timer.is_ticking());
    assert_eq!(panel.debounce_mode(), DebounceMode::Idle);
    assert_eq!(
        sink.events,
        [AppEvent::Started {
            groups: [0, 1, 2, 3]
        }]
    );
}

#[test]
fn press_toggles_after_press_window_and_release_toggles_back() {
    let store = shared();
    let config = BoardConfig::default();
    let mut timer = DebounceTimer::new(&config).unwrap();
    let mut sink = RecordingSink::default();
    let mut buttons = MockButtons::default();
    let mut panel = PanelService::new(&store, &config);
    panel.start(&mut timer, &mut sink);

    buttons.pressed[1] = true;
    panel.on_button_edge(&mut timer);
    assert!(timer.is_ticking());
    assert!(!timer.is_edge_armed());

    ticks(&mut panel, &mut buttons, &mut timer, &mut sink, 1);
    assert_eq!(store.status_get(1), Ok(false));
    ticks(&mut panel, &mut buttons, &mut timer, &mut sink, 1);
    assert_eq!(store.status_get(1), Ok(true));
    assert_eq!(panel.debounce_mode(), DebounceMode::Idle);
    assert!(timer.is_edge_armed());

    buttons.pressed[1] = false;
    panel.on_button_edge(&mut timer);
    ticks(&mut panel, &mut buttons, &mut timer, &mut sink, 31);
    assert_eq!(store.status_get(1), Ok(true));
    ticks(&mut panel, &mut buttons, &mut timer, &mut sink, 1);
    assert_eq!(store.status_get(1), Ok(false));

    assert_eq!(sink.toggles(), [(1, true), (1, false)]);
}

#[test]
fn contact_bounce_shorter_than_press_window_is_ignored() {
    let store = shared();
    let config = BoardConfig::default();
    let mut timer = DebounceTimer::new(&config).unwrap();
    let mut sink = RecordingSink::default();
    let mut buttons = MockButtons::default();
    let mut panel = PanelService::new(&store, &config);
    panel.start(&mut timer, &mut sink);

    buttons.pressed[0] = true;
    panel.on_button_edge(&mut timer);
    ticks(&mut panel, &mut buttons, &mut timer, &mut sink, 1);
    buttons.pressed[0] = false;
    ticks(&mut panel, &mut buttons, &mut timer, &mut sink, 1);

    assert_eq!(panel.debounce_mode(), DebounceMode::Idle);
    assert!(sink.toggles().is_empty());
    assert_eq!(store.status_get(0), Ok(false));
}

#[test]
fn button_switches_its_whole_group() {
    let store = shared();
    store.group_set(2, 0).unwrap();
    store.group_set(3, 0).unwrap();

    let config = BoardConfig::default();
    let mut timer = DebounceTimer::new(&config).unwrap();
    let mut sink = RecordingSink::default();
    let mut buttons = MockButtons::default();
    let mut panel = PanelService::new(&store, &config);
    panel.start(&mut timer, &mut sink);

    buttons.pressed[3] = true;
    panel.on_button_edge(&mut timer);
    ticks(&mut panel, &mut buttons, &mut timer, &mut sink, 2);

    let snap = store.snapshot();
    assert_eq!(snap.map(|r| r.on), [true, false, true, true]);
}

#[test]
fn simultaneous_presses_toggle_each_outlet_once() {
    let store = shared();
    let config = BoardConfig::default();
    let mut timer = DebounceTimer::new(&config).unwrap();
    let mut sink = RecordingSink::default();
    let mut buttons = MockButtons::default();
    let mut panel = PanelService::new(&store, &config);
    panel.start(&mut timer, &mut sink);

    buttons.pressed[0] = true;
    buttons.pressed[2] = true;
    panel.on_button_edge(&mut timer);
    // A second edge while sampling changes nothing.
    panel.on_button_edge(&mut timer);
    ticks(&mut panel, &mut buttons, &mut timer, &mut sink, 2);

    assert_eq!(sink.toggles(), [(0, true), (2, true)]);
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ButtonChanged { pressed: true, .. }))
            .count(),
        2
    );
}

#[test]
fn stray_tick_while_idle_does_nothing() {
    let store = shared();
    let config = BoardConfig::default();
    let mut timer = DebounceTimer::new(&config).unwrap();
    let mut sink = RecordingSink::default();
    let mut buttons = MockButtons::default();
    let mut panel = PanelService::new(&store, &config);
    panel.start(&mut timer, &mut sink);

    buttons.pressed[0] = true;
    ticks(&mut panel, &mut buttons, &mut timer, &mut sink, 5);
    assert!(sink.toggles().is_empty());
    assert_eq!(store.status_get(0), Ok(false));
}

// The only test in this binary that touches the global event queue.
#[test]
fn late_drain_still_counts_every_tick() {
    let store = shared();
    let config = BoardConfig::default();
    let mut timer = DebounceTimer::new(&config).unwrap();
    let mut sink = RecordingSink::default();
    let mut buttons = MockButtons::default();
    let mut panel = PanelService::new(&store, &config);
    panel.start(&mut timer, &mut sink);
    events::drain_events(|_| {});

    buttons.pressed[2] = true;
    events::push_event(Event::ButtonEdge);
    // Two sampling periods elapse before the main loop wakes.
    events::push_event(Event::DebounceTick);
    events::push_event(Event::DebounceTick);

    events::drain_events(|event| match event {
        Event::ButtonEdge => panel.on_button_edge(&mut timer),
        Event::DebounceTick => panel.on_debounce_tick(&mut buttons, &mut timer, &mut sink),
    });

    assert_eq!(store.status_get(2), Ok(true));
    assert_eq!(panel.debounce_mode(), DebounceMode::Idle);
    assert_eq!(sink.toggles(), [(2, true)]);
}
