//! Outlet board firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  GpioRelayBank   GpioButtonBank   NvsAdapter    LogEventSink   │
//! │  (RelayPort)     (ButtonPort)     (GroupStore)  (EventSink)    │
//! │  DebounceTimer   StatusLed        UartTransport                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌──────────────────────┐        ┌──────────────────────────┐  │
//! │  │ PanelService         │        │ Dispatcher               │  │
//! │  │ (main loop, events)  │        │ (host-link thread)       │  │
//! │  └──────────┬───────────┘        └────────────┬─────────────┘  │
//! │             └──────── SharedRelayStore ───────┘                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_svc::hal::units::Hertz;
use log::{info, warn};

use outletboard::adapters::hardware::{GpioButtonBank, GpioRelayBank};
use outletboard::adapters::log_sink::LogEventSink;
use outletboard::adapters::nvs::NvsAdapter;
use outletboard::adapters::uart_transport::UartTransport;
use outletboard::app::ports::{ConfigPort, IndicatorPort};
use outletboard::app::relay_store::{RelayStore, SharedRelayStore};
use outletboard::app::service::PanelService;
use outletboard::config::{BUTTON_COUNT, BoardConfig, RELAY_COUNT, USB_PRODUCT_ID, USB_VENDOR_ID};
use outletboard::drivers::hw_init;
use outletboard::drivers::hw_timer::DebounceTimer;
use outletboard::drivers::status_led::StatusLed;
use outletboard::events::{self, Event};
use outletboard::pins;
use outletboard::rpc::dispatch::Dispatcher;

/// UART read timeout for the host-link thread.
const HOST_READ_TIMEOUT_MS: u64 = 20;
const HOST_THREAD_STACK: usize = 8 * 1024;

fn relay_outputs() -> Result<[PinDriver<'static, AnyOutputPin, Output>; RELAY_COUNT]> {
    let mut outputs = heapless::Vec::<_, RELAY_COUNT>::new();
    for &gpio in &pins::RELAY_GPIOS {
        // SAFETY: every GPIO in the relay table is claimed exactly once, here.
        let mut driver = PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?;
        driver.set_low()?;
        outputs
            .push(driver)
            .map_err(|_| anyhow!("relay pin table overflow"))?;
    }
    outputs
        .into_array()
        .map_err(|_| anyhow!("relay pin table incomplete"))
}

fn button_inputs() -> Result<[PinDriver<'static, AnyInputPin, Input>; BUTTON_COUNT]> {
    let mut inputs = heapless::Vec::<_, BUTTON_COUNT>::new();
    for &gpio in &pins::BUTTON_GPIOS {
        // SAFETY: every GPIO in the button table is claimed exactly once, here.
        let mut driver = PinDriver::input(unsafe { AnyInputPin::new(gpio) })?;
        driver.set_pull(if pins::BUTTON_ACTIVE_LOW { Pull::Up } else { Pull::Down })?;
        inputs
            .push(driver)
            .map_err(|_| anyhow!("button pin table overflow"))?;
    }
    inputs
        .into_array()
        .map_err(|_| anyhow!("button pin table incomplete"))
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Outlet board v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    info!(
        "USB id {:04x}:{:04x}, {} outlets",
        USB_VENDOR_ID, USB_PRODUCT_ID, RELAY_COUNT
    );

    let peripherals = Peripherals::take()?;

    // Activity LED stays lit until the board is ready.
    // SAFETY: the LED GPIO is not part of any other pin table.
    let led_pin = PinDriver::output(unsafe { AnyOutputPin::new(pins::STATUS_LED_GPIO) })?;
    let mut led = StatusLed::new(led_pin);
    led.set(true);

    // ── 2. Storage + board config ─────────────────────────────
    let nvs = NvsAdapter::new()?;
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            BoardConfig::default()
        }
    };
    info!(
        "Debounce: poll={}ms press={}ms release={}ms",
        config.poll_ms, config.press_ms, config.release_ms
    );

    // ── 3. Relays (all off) + persisted groups ────────────────
    let store = SharedRelayStore::new(RelayStore::new(GpioRelayBank::new(relay_outputs()?), nvs));

    // ── 4. Buttons, edge interrupt, debounce timer ────────────
    let mut buttons = GpioButtonBank::new(button_inputs()?, pins::BUTTON_ACTIVE_LOW);
    hw_init::init_button_isr()?;
    let mut timer = DebounceTimer::new(&config)?;

    // ── 5. Host link ──────────────────────────────────────────
    let uart = UartDriver::new(
        peripherals.uart0,
        peripherals.pins.gpio43,
        peripherals.pins.gpio44,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(pins::UART_BAUD)),
    )?;
    let mut transport = UartTransport::new(uart, HOST_READ_TIMEOUT_MS);
    info!(
        "Host link: UART0 tx=GPIO{} rx=GPIO{} @ {} baud",
        pins::UART_TX_GPIO,
        pins::UART_RX_GPIO,
        pins::UART_BAUD
    );

    // ── 6. Panel service ──────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut panel = PanelService::new(&store, &config);
    panel.start(&mut timer, &mut sink);
    led.set(false);

    info!("System ready. Entering event loop.");

    std::thread::scope(|s| -> Result<()> {
        let store = &store;
        std::thread::Builder::new()
            .name("host-link".into())
            .stack_size(HOST_THREAD_STACK)
            .spawn_scoped(s, move || {
                let mut dispatcher = Dispatcher::new(store);
                let mut sink = LogEventSink::new();
                loop {
                    if let Err(e) = dispatcher.serve(&mut transport, &mut led, &mut sink) {
                        warn!("Host link error: {:?}", e);
                        dispatcher.reset_stream();
                        FreeRtos::delay_ms(10);
                    }
                }
            })?;

        // ── 7. Event loop ─────────────────────────────────────
        // Ticks are counted, so a wake-up later than one period still
        // samples the buttons once per elapsed period.
        loop {
            events::drain_events(|event| match event {
                Event::ButtonEdge => panel.on_button_edge(&mut timer),
                Event::DebounceTick => panel.on_debounce_tick(&mut buttons, &mut timer, &mut sink),
            });
            if !events::has_pending() {
                FreeRtos::delay_ms(1);
            }
        }
    })
}
