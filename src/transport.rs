//! The transport seam between this library and the adapter firmware.
//!
//! Every primitive is a blocking request/response call following the
//! firmware calling convention: the return value is either a non-negative
//! result or a negative status code (see [`crate::consts`]). Translation of
//! negative codes into typed errors happens above this seam, never inside
//! it.
//!
//! This crate does not ship a production implementation; a binding to the
//! vendor library (or a remote bridge) implements [`Transport`] separately.
//! Tests drive the library through scripted implementations.

/// Opaque identifier for one open adapter at the transport layer.
///
/// Valid handles are non-negative. A `Handle` is only meaningful for the
/// transport instance that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(i32);

impl Handle {
    /// Wraps a raw handle value as returned by `open_ext`.
    pub fn from_raw(raw: i32) -> Self {
        Handle(raw)
    }

    /// Returns the raw handle value.
    pub fn raw(&self) -> i32 {
        self.0
    }
}

/// Version block reported by the adapter at open time.
///
/// Each version is a 16-bit value, major in the high byte and minor in the
/// low byte. The `*_req_by_*` fields are the mutual compatibility
/// thresholds checked during [`crate::Aardvark::open`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionInfo {
    /// Version of the host-side software stack.
    pub software: u16,
    /// Firmware version of the adapter.
    pub firmware: u16,
    /// Hardware revision of the adapter.
    pub hardware: u16,
    /// Minimum software version required by this firmware.
    pub sw_req_by_fw: u16,
    /// Minimum firmware version required by this software.
    pub fw_req_by_sw: u16,
    /// Minimum API version required by this software.
    pub api_req_by_sw: u16,
}

/// Synchronous request/response capability to the physical adapter.
///
/// All methods block the calling thread. A timeout argument of a negative
/// value means block indefinitely; there is no cancellation primitive
/// beyond the timeout itself.
pub trait Transport {
    /// Opens the adapter on `port`. Returns the handle (>= 0) or a negative
    /// status code, together with the version block.
    fn open_ext(&mut self, port: u16) -> (i32, VersionInfo);

    /// Releases `handle` back to the transport.
    fn close(&mut self, handle: Handle) -> i32;

    /// Returns the 32-bit unique identifier of the open adapter.
    fn unique_id(&mut self, handle: Handle) -> u32;

    /// Returns the number of attached adapters, or a negative status code.
    fn find_devices(&mut self) -> i32;

    /// Fills `ports` and `unique_ids` with enumeration data for up to
    /// `ports.len()` adapters. Returns the number of adapters found.
    /// Port entries carry [`crate::consts::PORT_NOT_FREE`] when the
    /// adapter is already open elsewhere.
    fn find_devices_ext(&mut self, ports: &mut [u16], unique_ids: &mut [u32]) -> i32;

    /// Applies an interface configuration (one of the `CONFIG_*` values) or
    /// queries the current one with [`crate::consts::CONFIG_QUERY`].
    /// Returns the applied configuration.
    fn configure(&mut self, handle: Handle, config: i32) -> i32;

    /// Sets the I2C bitrate in kHz, or queries it when `bitrate_khz` is 0.
    /// Returns the applied bitrate.
    fn i2c_bitrate(&mut self, handle: Handle, bitrate_khz: i32) -> i32;

    /// Sets the I2C bus lock timeout in ms, or queries it when
    /// `timeout_ms` is 0. Returns the applied timeout.
    fn i2c_bus_timeout(&mut self, handle: Handle, timeout_ms: i32) -> i32;

    /// Sets or queries the I2C pull-up resistor configuration.
    fn i2c_pullup(&mut self, handle: Handle, pullup_mask: u8) -> i32;

    /// Sets or queries the switchable target power pins.
    fn target_power(&mut self, handle: Handle, power_mask: u8) -> i32;

    /// Master write. Returns the I2C status code and the number of bytes
    /// actually written.
    fn i2c_write_ext(&mut self, handle: Handle, addr: u16, flags: u8, data: &[u8])
        -> (i32, usize);

    /// Master read into `data`. Returns the I2C status code and the number
    /// of bytes actually read.
    fn i2c_read_ext(
        &mut self,
        handle: Handle,
        addr: u16,
        flags: u8,
        data: &mut [u8],
    ) -> (i32, usize);

    /// Enables slave mode on `addr` with the given buffer sizes.
    fn i2c_slave_enable(
        &mut self,
        handle: Handle,
        addr: u8,
        max_tx_bytes: usize,
        max_rx_bytes: usize,
    ) -> i32;

    /// Disables slave mode.
    fn i2c_slave_disable(&mut self, handle: Handle) -> i32;

    /// Reads bytes received while acting as a slave. Returns the I2C
    /// status code, the addressing master's address and the byte count.
    fn i2c_slave_read_ext(&mut self, handle: Handle, data: &mut [u8]) -> (i32, u8, usize);

    /// Loads the response buffer transmitted on the next slave read
    /// transaction. Write-only at the hardware level.
    fn i2c_slave_set_response(&mut self, handle: Handle, data: &[u8]) -> i32;

    /// Returns the number of bytes transmitted by the last slave response.
    fn i2c_slave_write_stats(&mut self, handle: Handle) -> i32;

    /// Enables passive bus monitoring.
    fn i2c_monitor_enable(&mut self, handle: Handle) -> i32;

    /// Disables passive bus monitoring.
    fn i2c_monitor_disable(&mut self, handle: Handle) -> i32;

    /// Drains captured monitor samples into `data`. Returns the sample
    /// count.
    fn i2c_monitor_read(&mut self, handle: Handle, data: &mut [u16]) -> i32;

    /// Sets the SPI bitrate in kHz, or queries it when `bitrate_khz` is 0.
    fn spi_bitrate(&mut self, handle: Handle, bitrate_khz: i32) -> i32;

    /// Configures SPI clock polarity, phase and bit order.
    fn spi_configure(&mut self, handle: Handle, polarity: u8, phase: u8, bitorder: u8) -> i32;

    /// Full-duplex SPI transfer: shifts `data_out` out while capturing
    /// into `data_in`.
    fn spi_write(&mut self, handle: Handle, data_out: &[u8], data_in: &mut [u8]) -> i32;

    /// Sets the slave-select output polarity for master transfers.
    fn spi_master_ss_polarity(&mut self, handle: Handle, polarity: u8) -> i32;

    /// Configures which GPIO pins are outputs (bit set = output).
    fn gpio_direction(&mut self, handle: Handle, direction_mask: u8) -> i32;

    /// Drives the configured output pins: bit set = high, clear = low.
    fn gpio_set(&mut self, handle: Handle, value_mask: u8) -> i32;

    /// Enables pull-up resistors on the pins in `pullup_mask`.
    fn gpio_pullup(&mut self, handle: Handle, pullup_mask: u8) -> i32;

    /// Blocks until a GPIO input changes or `timeout_ms` elapses. Returns
    /// the bitmask of input pins that are currently high.
    fn gpio_change(&mut self, handle: Handle, timeout_ms: i32) -> i32;

    /// Blocks until an asynchronous event is pending or `timeout_ms`
    /// elapses. Returns the pending event bitmask (`POLL_*`).
    fn async_poll(&mut self, handle: Handle, timeout_ms: i32) -> i32;
}
