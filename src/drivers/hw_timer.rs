//! Debounce sampling timer using ESP-IDF's esp_timer API.
//!
//! A periodic timer pushes [`Event::DebounceTick`] into the event counter
//! every `poll_ms` while the debouncer is sampling.  The callback runs in
//! the ESP timer task (not ISR) and only touches an atomic.
//!
//! On simulation targets nothing fires; the driver records which mode it
//! was put in so host code can observe the debouncer's transitions.

use crate::app::ports::DebounceTimerPort;
use crate::config::BoardConfig;
use crate::drivers::hw_init;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::events::{Event, push_event};

#[cfg(target_os = "espidf")]
unsafe extern "C" fn debounce_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::DebounceTick);
}

pub struct DebounceTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    period_us: u64,
    ticking: bool,
    edge_armed: bool,
}

impl DebounceTimer {
    /// Create the (stopped) sampling timer.
    #[cfg(target_os = "espidf")]
    pub fn new(config: &BoardConfig) -> crate::error::Result<Self> {
        let args = esp_timer_create_args_t {
            callback: Some(debounce_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"debounce".as_ptr(),
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: args outlives the call; the handle is owned by this struct.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK as esp_err_t {
            return Err(crate::error::Error::Init("esp_timer_create", ret));
        }
        log::info!("hw_timer: debounce timer created ({} ms period)", config.poll_ms);
        Ok(Self {
            handle,
            period_us: u64::from(config.poll_ms) * 1_000,
            ticking: false,
            edge_armed: false,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(config: &BoardConfig) -> crate::error::Result<Self> {
        log::info!("hw_timer(sim): debounce timer not started (ticks driven by caller)");
        Ok(Self {
            period_us: u64::from(config.poll_ms) * 1_000,
            ticking: false,
            edge_armed: false,
        })
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn is_edge_armed(&self) -> bool {
        self.edge_armed
    }
}

impl DebounceTimerPort for DebounceTimer {
    fn start_tick(&mut self) -> bool {
        if self.ticking {
            return true;
        }
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: handle was created in new() and is only used from the main task.
            let ret = unsafe { esp_timer_start_periodic(self.handle, self.period_us) };
            if ret != ESP_OK as esp_err_t {
                log::error!("hw_timer: debounce timer start failed (rc={})", ret);
                return false;
            }
        }
        self.ticking = true;
        true
    }

    fn stop_tick(&mut self) {
        if !self.ticking {
            return;
        }
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: see start_tick().
            let ret = unsafe { esp_timer_stop(self.handle) };
            if ret != ESP_OK as esp_err_t {
                log::warn!("hw_timer: debounce timer stop failed (rc={})", ret);
            }
        }
        self.ticking = false;
    }

    fn arm_edge(&mut self) {
        hw_init::set_button_edges(true);
        self.edge_armed = true;
    }

    fn disarm_edge(&mut self) {
        hw_init::set_button_edges(false);
        self.edge_armed = false;
    }
}

#[cfg(target_os = "espidf")]
impl Drop for DebounceTimer {
    fn drop(&mut self) {
        // SAFETY: handle is valid and no longer used after drop.
        unsafe {
            esp_timer_stop(self.handle);
            esp_timer_delete(self.handle);
        }
    }
}
