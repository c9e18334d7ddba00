//! # aardvark-usb
//!
//! A Rust control library for the Total Phase Aardvark USB I2C/SPI host
//! adapter: I2C master and slave transfers, SPI master transfers, GPIO on
//! the shared pins, plus the passive I2C bus monitor.
//!
//! The crate speaks to the adapter through the [`Transport`] trait, a thin
//! blocking request/response seam mirroring the vendor command set. A
//! binding to the vendor shared library (or any other bridge) implements
//! that trait separately; the tests in this crate drive everything through
//! scripted transports.
//!
//! ## Features
//!
//! * Device discovery ([`find_devices`]) and flexible opening
//!   ([`Aardvark::open`], [`Aardvark::open_default`],
//!   [`Aardvark::open_serial`]).
//! * Version compatibility gating at open time.
//! * I2C master transfers (write, read, write-then-read, 10-bit
//!   addressing via flags) and I2C slave mode with a settable response
//!   buffer.
//! * SPI master transfers with configurable polarity, phase, bit order
//!   and SS polarity.
//! * GPIO direction, drive, pull-up and blocking input-change polling on
//!   the six shared pins, with strongly typed [`Pin`]/[`PinSet`] masks.
//! * I2C bus monitor passthrough (raw samples, no decoding).
//!
//! ## Shared pins and shadow state
//!
//! The I2C and SPI subsystems share their pins with GPIO; only the four
//! joint configurations in [`Config`] exist. Enabling or disabling one
//! subsystem ([`Aardvark::set_i2c_enabled`], [`Aardvark::set_spi_enabled`])
//! always preserves the other's state.
//!
//! Much of the adapter is write-only: GPIO directions, output levels,
//! pull-up enables and the I2C slave response buffer cannot be read back.
//! The session keeps a shadow copy of every successful write and answers
//! reads from it; see [`Aardvark::gpio_get`] and
//! [`Aardvark::i2c_slave_response`] for the exact contract.
//!
//! ## Sessions and threading
//!
//! One [`Aardvark`] owns one adapter handle exclusively. Sessions are
//! single-threaded: no internal locking is provided, and interleaving
//! operations on one session from several threads leaves the shadow cache
//! and the hardware inconsistent. Independent sessions on different
//! adapters may run concurrently. Dropping a session closes its handle.
//!
//! ## Basic usage
//!
//! ```no_run
//! use aardvark_usb::{Aardvark, Pin, PinSet, Result, Transport};
//!
//! fn demo<T: Transport>(transport: T) -> Result<()> {
//!     let mut adapter = Aardvark::open_default(transport)?;
//!     println!("serial: {}", adapter.unique_id_str()?);
//!     println!("firmware: {}", adapter.firmware_version());
//!
//!     // I2C master: write a register address, read two bytes back.
//!     adapter.set_i2c_bitrate_khz(400)?;
//!     let value = adapter.i2c_master_write_read(0x50, &[0x00], 2)?;
//!     println!("read: {:02X?}", value);
//!
//!     // Free the SPI pins and blink SS as a GPIO.
//!     adapter.set_spi_enabled(false)?;
//!     adapter.set_gpio_outputs(PinSet::from(Pin::Ss))?;
//!     adapter.gpio_set_high(Pin::Ss)?;
//!     adapter.gpio_set_low(Pin::Ss)?;
//!
//!     adapter.close()
//! }
//! ```

mod config;
pub mod consts;
mod device;
mod error;
mod gpio;
mod i2c;
mod spi;
mod transport;

pub use config::Config;
pub use device::{
    find_devices, format_unique_id, parse_unique_id, resolve_port, Aardvark, DeviceInfo,
    PollEvent,
};
pub use error::{status_string, Error, Result};
pub use gpio::{Pin, PinSet};
pub use i2c::I2cStatus;
pub use spi::{SpiBitorder, SpiPhase, SpiPolarity, SsPolarity};
pub use transport::{Handle, Transport, VersionInfo};
