//! Relay store behaviour across boots, group changes and storage faults.

use crate::mock_hw::{MockEeprom, MockRelays};

use outletboard::adapters::nvs::NvsAdapter;
use outletboard::app::ports::GroupStorePort;
use outletboard::app::relay_store::{RelayStore, SharedRelayStore, default_groups};
use outletboard::error::OutletError;

fn fresh() -> RelayStore<MockRelays, MockEeprom> {
    RelayStore::new(MockRelays::default(), MockEeprom::default())
}

#[test]
fn boot_drives_every_relay_off() {
    let relays = MockRelays {
        latched: [true; 4],
        ..MockRelays::default()
    };
    let store = RelayStore::new(relays, MockEeprom::default());
    let (relays, _) = store.release();
    assert_eq!(relays.on_count(), 0);
    assert_eq!(relays.writes, [(0, false), (1, false), (2, false), (3, false)]);
}

#[test]
fn missing_or_corrupted_table_boots_with_defaults() {
    assert_eq!(fresh().groups(), default_groups());

    let eeprom = MockEeprom {
        corrupted: true,
        ..MockEeprom::default()
    };
    let store = RelayStore::new(MockRelays::default(), eeprom);
    assert_eq!(store.groups(), [0, 1, 2, 3]);
}

#[test]
fn toggle_switches_the_whole_group() {
    let mut store = fresh();
    store.group_set(1, 0).unwrap();
    store.group_set(3, 0).unwrap();

    assert_eq!(store.status_toggle(0), Ok(true));
    assert!(store.status_get(1).unwrap());
    assert!(store.status_get(3).unwrap());
    assert!(!store.status_get(2).unwrap());

    assert_eq!(store.status_toggle(3), Ok(false));
    let (relays, _) = store.release();
    assert_eq!(relays.on_count(), 0);
}

#[test]
fn joining_a_group_adopts_its_status() {
    let mut store = fresh();
    store.status_set(0, true).unwrap();

    store.group_set(2, 0).unwrap();
    assert!(store.status_get(2).unwrap());

    // A group with no other member switches the outlet off.
    store.group_set(2, 7).unwrap();
    assert!(!store.status_get(2).unwrap());
    assert!(store.status_get(0).unwrap());
}

#[test]
fn regrouping_to_own_group_reads_other_members_only() {
    let mut store = fresh();
    store.status_set(1, true).unwrap();
    // Outlet 1 is alone in group 1, so re-asserting it finds no member.
    store.group_set(1, 1).unwrap();
    assert!(!store.status_get(1).unwrap());
}

#[test]
fn out_of_range_outlet_is_rejected_without_side_effects() {
    let mut store = fresh();
    store.status_set(0, true).unwrap();
    let groups = store.groups();

    assert_eq!(store.status_set(4, false), Err(OutletError::InvalidOutlet(4)));
    assert_eq!(store.status_toggle(200), Err(OutletError::InvalidOutlet(200)));
    assert_eq!(store.group_set(4, 0), Err(OutletError::InvalidOutlet(4)));
    assert_eq!(store.group_get(255), Err(OutletError::InvalidOutlet(255)));

    assert_eq!(store.groups(), groups);
    let (relays, eeprom) = store.release();
    assert!(relays.latched[0]);
    assert_eq!(eeprom.writes, 0);
}

#[test]
fn persist_failure_keeps_the_change_in_memory() {
    let eeprom = MockEeprom {
        fail_writes: true,
        ..MockEeprom::default()
    };
    let mut store = RelayStore::new(MockRelays::default(), eeprom);

    assert_eq!(store.group_set(3, 1), Ok(()));
    assert_eq!(store.group_get(3), Ok(1));

    let (_, eeprom) = store.release();
    assert_eq!(eeprom.cells, None);
}

#[test]
fn groups_survive_a_reboot_but_status_does_not() {
    let store = SharedRelayStore::new(RelayStore::new(
        MockRelays::default(),
        NvsAdapter::new().unwrap(),
    ));
    store.group_set(3, 0).unwrap();
    store.group_set(2, 9).unwrap();
    store.status_set(0, true).unwrap();

    let (_, mut nvs) = store.into_inner().release();
    assert_eq!(nvs.load_groups(), Ok([0, 1, 9, 0]));

    let rebooted = SharedRelayStore::new(RelayStore::new(MockRelays::default(), nvs));
    assert_eq!(rebooted.group_get(3), Ok(0));
    assert_eq!(rebooted.group_get(2), Ok(9));
    assert!(rebooted.snapshot().iter().all(|r| !r.on));
}

#[test]
fn snapshot_reports_status_and_group() {
    let store = SharedRelayStore::new(fresh());
    store.group_set(1, 2).unwrap();
    store.status_set(2, true).unwrap();

    let snap = store.snapshot();
    assert_eq!(snap.map(|r| r.group), [0, 2, 2, 3]);
    assert_eq!(snap.map(|r| r.on), [false, true, true, false]);
}
