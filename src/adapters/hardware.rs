//! GPIO adapters: bridge `embedded-hal` pins to the relay and button ports.
//!
//! The banks are generic over the `embedded-hal` 1.0 digital traits, so
//! the same code drives ESP-IDF `PinDriver`s on the board and plain mock
//! pins in host tests.  Index `i` of each array is outlet / button `i`;
//! which GPIO that is comes from [`crate::pins`].
//!
//! The ports are infallible by contract: a HAL error is logged and the
//! operation degrades (a failed read-back reports "off", a failed button
//! read reports "released").

use embedded_hal::digital::{Error as _, InputPin, StatefulOutputPin};
use log::warn;

use crate::app::ports::{ButtonPort, RelayPort};
use crate::config::{BUTTON_COUNT, RELAY_COUNT};

/// Relay coil outputs.
pub struct GpioRelayBank<P> {
    pins: [P; RELAY_COUNT],
}

impl<P: StatefulOutputPin> GpioRelayBank<P> {
    pub fn new(pins: [P; RELAY_COUNT]) -> Self {
        Self { pins }
    }

    pub fn release(self) -> [P; RELAY_COUNT] {
        self.pins
    }
}

impl<P: StatefulOutputPin> RelayPort for GpioRelayBank<P> {
    fn drive(&mut self, relay: usize, on: bool) {
        let pin = &mut self.pins[relay];
        let result = if on { pin.set_high() } else { pin.set_low() };
        if let Err(e) = result {
            warn!("relay {}: output write failed ({:?})", relay, e.kind());
        }
    }

    fn is_on(&mut self, relay: usize) -> bool {
        match self.pins[relay].is_set_high() {
            Ok(on) => on,
            Err(e) => {
                warn!("relay {}: output read-back failed ({:?})", relay, e.kind());
                false
            }
        }
    }
}

/// Front-panel button inputs.
pub struct GpioButtonBank<P> {
    pins: [P; BUTTON_COUNT],
    active_low: bool,
}

impl<P: InputPin> GpioButtonBank<P> {
    /// `active_low`: a closed contact pulls the line to ground.
    pub fn new(pins: [P; BUTTON_COUNT], active_low: bool) -> Self {
        Self { pins, active_low }
    }
}

impl<P: InputPin> ButtonPort for GpioButtonBank<P> {
    fn sample(&mut self, button: usize) -> bool {
        let pin = &mut self.pins[button];
        let level = if self.active_low { pin.is_low() } else { pin.is_high() };
        level.unwrap_or_else(|e| {
            warn!("button {}: input read failed ({:?})", button, e.kind());
            false
        })
    }
}
