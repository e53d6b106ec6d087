//! One-shot GPIO interrupt setup for the front-panel buttons.
//!
//! Configures the button pins for any-edge interrupts, installs the
//! per-pin ISR service and routes every button edge into the event flags.
//! The edge interrupt is then switched on and off by [`set_button_edges`]
//! as the debouncer changes mode.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::Error;
#[cfg(target_os = "espidf")]
use crate::events::{Event, push_event};
#[cfg(target_os = "espidf")]
use crate::pins;

/// Any edge on any button pin.  Runs in ISR context.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_edge_isr(_arg: *mut core::ffi::c_void) {
    push_event(Event::ButtonEdge);
}

/// Install the GPIO ISR service and attach the button edge handler.
///
/// Interrupts stay disabled until the debouncer arms them.
#[cfg(target_os = "espidf")]
pub fn init_button_isr() -> Result<(), Error> {
    // SAFETY: called once from main() before the event loop.  The handler
    // only touches the atomic event flag.
    unsafe {
        let ret = gpio_install_isr_service(0);
        // ESP_ERR_INVALID_STATE: already installed by another driver.
        if ret != ESP_OK as esp_err_t && ret != ESP_ERR_INVALID_STATE as esp_err_t {
            return Err(Error::Init("gpio_install_isr_service", ret));
        }

        let (pull_up, pull_down) = if pins::BUTTON_ACTIVE_LOW {
            (gpio_pullup_t_GPIO_PULLUP_ENABLE, gpio_pulldown_t_GPIO_PULLDOWN_DISABLE)
        } else {
            (gpio_pullup_t_GPIO_PULLUP_DISABLE, gpio_pulldown_t_GPIO_PULLDOWN_ENABLE)
        };
        let btn_cfg = gpio_config_t {
            pin_bit_mask: pins::button_pin_mask(),
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: pull_up,
            pull_down_en: pull_down,
            intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
        };
        let ret = gpio_config(&btn_cfg);
        if ret != ESP_OK as esp_err_t {
            return Err(Error::Init("gpio_config", ret));
        }

        for &pin in &pins::BUTTON_GPIOS {
            let ret = gpio_isr_handler_add(pin, Some(button_edge_isr), core::ptr::null_mut());
            if ret != ESP_OK as esp_err_t {
                return Err(Error::Init("gpio_isr_handler_add", ret));
            }
            gpio_intr_disable(pin);
        }
    }
    info!("hw_init: button edge ISR installed on {:?}", pins::BUTTON_GPIOS);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_button_isr() -> Result<(), Error> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

/// Enable or disable the edge interrupt on every button pin.
#[cfg(target_os = "espidf")]
pub fn set_button_edges(enabled: bool) {
    for &pin in &pins::BUTTON_GPIOS {
        // SAFETY: plain register writes on pins configured in init_button_isr().
        let ret = unsafe {
            if enabled {
                gpio_intr_enable(pin)
            } else {
                gpio_intr_disable(pin)
            }
        };
        if ret != ESP_OK as esp_err_t {
            log::warn!("hw_init: GPIO{} interrupt switch failed (rc={})", pin, ret);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn set_button_edges(_enabled: bool) {}
