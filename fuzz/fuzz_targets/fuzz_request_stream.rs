//! Fuzz target: host request stream → `Dispatcher::serve`
//!
//! Drives arbitrary byte sequences through the request decoder and the
//! dispatcher against in-memory relays, and asserts that every complete
//! request gets exactly one well-formed answer and that outlets sharing
//! a group never disagree.
//!
//! cargo fuzz run fuzz_request_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use outletboard::app::events::AppEvent;
use outletboard::app::ports::{
    EventSink, GroupStorePort, IndicatorPort, RelayPort, StorageError,
};
use outletboard::app::relay_store::{RelayStore, SharedRelayStore};
use outletboard::config::RELAY_COUNT;
use outletboard::rpc::dispatch::Dispatcher;
use outletboard::rpc::protocol::{REQUEST_LEN, RESPONSE_LEN, Response};
use outletboard::rpc::transport::Transport;

#[derive(Default)]
struct Latches([bool; RELAY_COUNT]);

impl RelayPort for Latches {
    fn drive(&mut self, relay: usize, on: bool) {
        self.0[relay] = on;
    }
    fn is_on(&mut self, relay: usize) -> bool {
        self.0[relay]
    }
}

struct Cells;

impl GroupStorePort for Cells {
    fn load_groups(&mut self) -> Result<[u8; RELAY_COUNT], StorageError> {
        Err(StorageError::NotFound)
    }
    fn store_group(&mut self, _relay: usize, _group: u8) -> Result<(), StorageError> {
        Ok(())
    }
}

struct Quiet;

impl IndicatorPort for Quiet {
    fn set(&mut self, _on: bool) {}
}

impl EventSink for Quiet {
    fn emit(&mut self, _event: &AppEvent) {}
}

/// Hands the input out in reads whose size is taken from the data itself.
struct Replay<'a> {
    input: &'a [u8],
    out: Vec<u8>,
}

impl Transport for Replay<'_> {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let want = self.input.first().map_or(0, |&b| b as usize % buf.len() + 1);
        let n = want.min(self.input.len()).min(buf.len());
        buf[..n].copy_from_slice(&self.input[..n]);
        self.input = &self.input[n..];
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.out.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let store = SharedRelayStore::new(RelayStore::new(Latches::default(), Cells));
    let mut dispatcher = Dispatcher::new(&store);
    let mut transport = Replay {
        input: data,
        out: Vec::new(),
    };
    let (mut led, mut sink) = (Quiet, Quiet);

    let mut answered = 0;
    while !transport.input.is_empty() {
        answered += dispatcher
            .serve(&mut transport, &mut led, &mut sink)
            .expect("in-memory transport never fails");
    }

    assert_eq!(answered, data.len() / REQUEST_LEN);
    assert_eq!(transport.out.len(), answered * RESPONSE_LEN);

    for (req, resp) in data
        .chunks_exact(REQUEST_LEN)
        .zip(transport.out.chunks_exact(RESPONSE_LEN))
    {
        let resp: [u8; RESPONSE_LEN] = resp.try_into().unwrap();
        let decoded = Response::from_bytes(resp).expect("response must decode");
        assert_eq!(decoded.cmd, req[0]);
        assert_eq!(resp[3], 0);
    }

    let snap = store.snapshot();
    for a in &snap {
        for b in &snap {
            if a.group == b.group {
                assert_eq!(a.on, b.on);
            }
        }
    }
});
