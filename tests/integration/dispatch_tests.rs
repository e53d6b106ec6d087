//! Host requests through the dispatcher: stream transport and SETUP packets.

use crate::mock_hw::{MockEeprom, MockLed, MockRelays, PipeTransport, RecordingSink};

use outletboard::app::events::AppEvent;
use outletboard::app::relay_store::{RelayStore, SharedRelayStore};
use outletboard::rpc::codec::SetupPacket;
use outletboard::rpc::dispatch::Dispatcher;
use outletboard::rpc::protocol::{ErrorCode, Response};

fn shared() -> SharedRelayStore<MockRelays, MockEeprom> {
    SharedRelayStore::new(RelayStore::new(MockRelays::default(), MockEeprom::default()))
}

#[test]
fn stream_requests_get_four_byte_answers() {
    let store = shared();
    let mut dispatcher = Dispatcher::new(&store);
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    let mut pipe = PipeTransport::with_input(&[
        0x01, 0x00, 0x00, // count
        0x03, 0x02, 0x01, // status_set(2, on)
        0x02, 0x02, 0x00, // status_get(2)
        0x06, 0x09, 0x00, // group_set(9, 0): bad index
        0x42, 0x00, 0x00, // unknown command
    ]);

    assert_eq!(dispatcher.serve(&mut pipe, &mut led, &mut sink), Ok(5));
    assert_eq!(
        pipe.tx,
        [
            0x01, 0x00, 0x04, 0x00, //
            0x03, 0x00, 0x00, 0x00, //
            0x02, 0x00, 0x01, 0x00, //
            0x06, 0x02, 0x00, 0x00, //
            0x42, 0x01, 0x00, 0x00, //
        ]
    );
    assert_eq!(pipe.flushes, 1);
    assert_eq!(dispatcher.served(), 5);
}

#[test]
fn requests_split_across_reads_are_reassembled() {
    let store = shared();
    let mut dispatcher = Dispatcher::new(&store);
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    let mut pipe = PipeTransport::with_input(&[0x04, 0x01, 0x00, 0x05, 0x01, 0x00]);
    pipe.read_chunk = 2;

    let mut answered = 0;
    while !pipe.rx.is_empty() {
        answered += dispatcher.serve(&mut pipe, &mut led, &mut sink).unwrap();
    }
    assert_eq!(answered, 2);
    assert_eq!(pipe.tx, [0x04, 0x00, 0x00, 0x00, 0x05, 0x00, 0x01, 0x00]);
    assert_eq!(store.status_get(1), Ok(true));
}

#[test]
fn reset_stream_discards_partial_request() {
    let store = shared();
    let mut dispatcher = Dispatcher::new(&store);
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    let mut pipe = PipeTransport::with_input(&[0x03, 0x00]);
    assert_eq!(dispatcher.serve(&mut pipe, &mut led, &mut sink), Ok(0));
    dispatcher.reset_stream();

    pipe.rx.extend([0x01, 0x00, 0x00]);
    assert_eq!(dispatcher.serve(&mut pipe, &mut led, &mut sink), Ok(1));
    assert_eq!(pipe.tx, [0x01, 0x00, 0x04, 0x00]);
    assert_eq!(store.status_get(0), Ok(false));
}

#[test]
fn vendor_setup_packet_is_answered_with_led_pulse() {
    let store = shared();
    let mut dispatcher = Dispatcher::new(&store);
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    // bRequest=status_set, wValue=0x0103 (param1=3), wIndex=0x0201 (param2=1).
    let packet = SetupPacket::parse(&[0xC0, 0x03, 0x03, 0x01, 0x01, 0x02, 0x04, 0x00]);
    let response = dispatcher.handle_setup(&packet, &mut led, &mut sink);

    assert_eq!(response, Some(Response::ok(0x03, 0)));
    assert_eq!(store.status_get(3), Ok(true));
    assert_eq!(led.transitions, [true, false]);
    assert!(matches!(
        sink.events.as_slice(),
        [AppEvent::RequestHandled { response, .. }] if response.is_ok()
    ));
}

#[test]
fn standard_setup_packet_is_left_to_the_usb_stack() {
    let store = shared();
    let mut dispatcher = Dispatcher::new(&store);
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    // GET_DESCRIPTOR
    let packet = SetupPacket::parse(&[0x80, 0x06, 0x00, 0x01, 0x00, 0x00, 0x12, 0x00]);
    assert_eq!(dispatcher.handle_setup(&packet, &mut led, &mut sink), None);
    assert!(led.transitions.is_empty());
    assert!(sink.events.is_empty());
    assert_eq!(dispatcher.served(), 0);
}

#[test]
fn rejected_requests_leave_relays_untouched() {
    let store = shared();
    let mut dispatcher = Dispatcher::new(&store);
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    let mut pipe = PipeTransport::with_input(&[0x00, 0x01, 0x01, 0x07, 0x01, 0x01, 0x04, 0x04, 0x00]);
    assert_eq!(dispatcher.serve(&mut pipe, &mut led, &mut sink), Ok(3));

    let errs: Vec<u8> = pipe.tx.chunks(4).map(|r| r[1]).collect();
    assert_eq!(
        errs,
        [ErrorCode::Cmd as u8, ErrorCode::Cmd as u8, ErrorCode::Arg as u8]
    );
    let (relays, eeprom) = store.into_inner().release();
    assert_eq!(relays.on_count(), 0);
    assert_eq!(relays.writes.len(), 4); // boot only
    assert_eq!(eeprom.writes, 0);
}

#[test]
fn dispatchers_on_two_threads_share_one_store() {
    let store = shared();

    std::thread::scope(|s| {
        for relay in 0..2u8 {
            let store = &store;
            s.spawn(move || {
                let mut dispatcher = Dispatcher::new(store);
                let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());
                for _ in 0..50 {
                    let mut pipe = PipeTransport::with_input(&[0x04, relay, 0x00]);
                    dispatcher.serve(&mut pipe, &mut led, &mut sink).unwrap();
                }
            });
        }
    });

    // Fifty toggles each: both back to off.
    assert_eq!(store.status_get(0), Ok(false));
    assert_eq!(store.status_get(1), Ok(false));
}
