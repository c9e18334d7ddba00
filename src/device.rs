//! Device enumeration and the session owning one open adapter.

use crate::config::Config;
use crate::consts;
use crate::error::{check_status, transport_error, Error, Result};
use crate::gpio::PinSet;
use crate::transport::{Handle, Transport, VersionInfo};
use log::{debug, trace, warn};

/// Formats a 32-bit unique id as the `NNNN-NNNNNN` serial number printed
/// on the adapter label.
pub fn format_unique_id(unique_id: u32) -> String {
    format!("{:04}-{:06}", unique_id / 1_000_000, unique_id % 1_000_000)
}

/// Parses a `NNNN-NNNNNN` serial number back into the 32-bit unique id.
pub fn parse_unique_id(serial_number: &str) -> Option<u32> {
    let (high, low) = serial_number.split_once('-')?;
    if high.len() != 4 || low.len() != 6 {
        return None;
    }
    let high: u32 = high.parse().ok()?;
    let low: u32 = low.parse().ok()?;
    high.checked_mul(1_000_000)?.checked_add(low)
}

// Renders a 16-bit version value as "major.minor", minor zero padded.
fn version_str(version: u16) -> String {
    format!("{}.{:02}", version >> 8, version & 0xFF)
}

/// One attached adapter as reported by a single enumeration snapshot.
///
/// Descriptors are value data and may be stale the instant they are
/// returned: the adapter can be unplugged, or opened by another process,
/// between enumeration and [`Aardvark::open`]. Open-by-serial-number
/// re-verifies identity after opening for exactly this reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Port number usable with [`Aardvark::open`].
    pub port: u16,
    /// Serial number in `NNNN-NNNNNN` form.
    pub serial_number: String,
    /// Whether the adapter is currently opened by some process.
    pub in_use: bool,
}

/// Enumerates all attached adapters.
///
/// The transport requires pre-sized buffers, so this queries the count
/// first and then fetches the sized result. A zero count short-circuits
/// without a second query.
pub fn find_devices<T: Transport>(transport: &mut T) -> Result<Vec<DeviceInfo>> {
    let num_devices = check_status(transport.find_devices())? as usize;
    if num_devices == 0 {
        return Ok(Vec::new());
    }

    let mut ports = vec![0u16; num_devices];
    let mut unique_ids = vec![0u32; num_devices];
    let num_devices = check_status(transport.find_devices_ext(&mut ports, &mut unique_ids))?
        .min(num_devices as i32) as usize;

    let devices = ports[..num_devices]
        .iter()
        .zip(&unique_ids[..num_devices])
        .map(|(&port, &uid)| DeviceInfo {
            port: port & !consts::PORT_NOT_FREE,
            serial_number: format_unique_id(uid),
            in_use: port & consts::PORT_NOT_FREE != 0,
        })
        .collect();
    Ok(devices)
}

/// Resolves an open request to a port number.
///
/// With neither argument, port 0 is used. A serial number triggers an
/// enumeration scan and fails with [`Error::DeviceNotFound`] if nothing
/// matches; a bare port is passed through without enumeration. The result
/// is advisory only: the port may belong to a different adapter by the
/// time it is opened, which the open-by-serial path catches after the
/// fact.
pub fn resolve_port<T: Transport>(
    transport: &mut T,
    port: Option<u16>,
    serial_number: Option<&str>,
) -> Result<u16> {
    match (port, serial_number) {
        (None, None) => Ok(0),
        (_, Some(serial)) => find_devices(transport)?
            .into_iter()
            .find(|dev| dev.serial_number == serial)
            .map(|dev| dev.port)
            .ok_or(Error::DeviceNotFound),
        (Some(port), None) => Ok(port),
    }
}

/// Events reported by [`Aardvark::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    /// Data received while acting as an I2C slave.
    I2cRead,
    /// The I2C slave response buffer was transmitted.
    I2cWrite,
    /// Data received while acting as an SPI slave.
    Spi,
    /// Monitor samples are pending.
    I2cMonitor,
}

// Hardware state the firmware cannot report back, reconstructed from
// successful writes only. Cleared on open; never persisted.
#[derive(Debug, Default)]
pub(crate) struct Shadow {
    pub(crate) outputs: PinSet,
    pub(crate) high: PinSet,
    pub(crate) pullups: PinSet,
    pub(crate) slave_response: Option<Vec<u8>>,
}

/// An open session with one Aardvark adapter.
///
/// The session exclusively owns the transport handle and all client-side
/// shadow state. It is single-threaded by design: no internal locking is
/// provided, and the shadow cache is only consistent if operations are
/// not interleaved. Sessions on different adapters are fully independent.
///
/// Dropping the session closes the handle, so the scarce USB resource is
/// released on every exit path. After an explicit [`Aardvark::close`],
/// every operation fails with [`Error::SessionClosed`].
#[derive(Debug)]
pub struct Aardvark<T: Transport> {
    pub(crate) transport: T,
    handle: Option<Handle>,
    version: VersionInfo,
    pub(crate) shadow: Shadow,
}

impl<T: Transport> Aardvark<T> {
    /// Size of the receive/transmit buffers requested for slave mode and
    /// monitor reads.
    pub const BUFFER_SIZE: usize = 65535;

    /// Opens the adapter on `port`.
    ///
    /// After acquiring the handle the version block is checked: firmware
    /// older than this library requires fails with
    /// [`Error::IncompatibleDevice`], then a library older than the
    /// firmware requires fails with [`Error::IncompatibleLibrary`]. On
    /// success the adapter is forced to the SPI+I2C configuration (its
    /// own power-cycle default) so the session starts from a known state,
    /// and all shadow state starts empty.
    pub fn open(mut transport: T, port: u16) -> Result<Self> {
        let (ret, version) = transport.open_ext(port);
        if ret < 0 {
            return Err(transport_error(ret));
        }
        let handle = Handle::from_raw(ret);
        debug!(
            "Opened adapter on port {}: hw {}, fw {}, sw {}",
            port,
            version_str(version.hardware),
            version_str(version.firmware),
            version_str(version.software)
        );

        // Errors below drop the session, which closes the handle.
        let mut device = Aardvark {
            transport,
            handle: Some(handle),
            version,
            shadow: Shadow::default(),
        };

        if version.firmware < version.fw_req_by_sw {
            debug!(
                "Firmware {} older than required {}",
                version_str(version.firmware),
                version_str(version.fw_req_by_sw)
            );
            return Err(Error::IncompatibleDevice {
                firmware: version_str(version.firmware),
                required: version_str(version.fw_req_by_sw),
            });
        } else if version.software < version.sw_req_by_fw {
            debug!(
                "Library {} older than required {}",
                version_str(version.software),
                version_str(version.sw_req_by_fw)
            );
            return Err(Error::IncompatibleLibrary {
                software: version_str(version.software),
                required: version_str(version.sw_req_by_fw),
            });
        }

        device.interface_configure(Config::SpiI2c.raw())?;
        Ok(device)
    }

    /// Opens the first adapter (port 0).
    pub fn open_default(transport: T) -> Result<Self> {
        Self::open(transport, 0)
    }

    /// Opens the adapter with the given serial number.
    ///
    /// Enumeration only yields a snapshot, so after opening the candidate
    /// port the adapter's own unique id is compared against the requested
    /// serial number. On mismatch the session is closed and
    /// [`Error::DeviceNotFound`] is returned. No retry is attempted: a
    /// mismatch caused by an enumeration race is indistinguishable from a
    /// genuinely absent device, and repeated enumeration does not
    /// converge. Callers who want a retry policy implement it themselves.
    pub fn open_serial(mut transport: T, serial_number: &str) -> Result<Self> {
        let port = resolve_port(&mut transport, None, Some(serial_number))?;
        let mut device = Self::open(transport, port)?;
        let actual = device.unique_id_str()?;
        if actual != serial_number {
            warn!(
                "Port {} now reports serial {}, expected {}; enumeration was stale",
                port, actual, serial_number
            );
            device.close()?;
            return Err(Error::DeviceNotFound);
        }
        Ok(device)
    }

    /// Closes the session and releases the handle.
    ///
    /// Any further operation, including a second `close`, fails with
    /// [`Error::SessionClosed`].
    pub fn close(&mut self) -> Result<()> {
        let handle = self.handle.take().ok_or(Error::SessionClosed)?;
        debug!("Closing adapter session");
        check_status(self.transport.close(handle))?;
        Ok(())
    }

    /// Whether the session is still open.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn handle(&self) -> Result<Handle> {
        self.handle.ok_or(Error::SessionClosed)
    }

    /// The 32-bit unique identifier of the adapter. This is the serial
    /// number without the dash: label `0012-345678` reads back as
    /// `12345678`.
    pub fn unique_id(&mut self) -> Result<u32> {
        let handle = self.handle()?;
        Ok(self.transport.unique_id(handle))
    }

    /// The unique identifier formatted as `NNNN-NNNNNN`.
    pub fn unique_id_str(&mut self) -> Result<String> {
        Ok(format_unique_id(self.unique_id()?))
    }

    /// The raw version block read at open time.
    pub fn version_info(&self) -> &VersionInfo {
        &self.version
    }

    /// Version of the host-side software stack, as `major.minor`.
    pub fn api_version(&self) -> String {
        version_str(self.version.software)
    }

    /// Firmware version of the adapter, as `major.minor`.
    pub fn firmware_version(&self) -> String {
        version_str(self.version.firmware)
    }

    /// Hardware revision of the adapter, as `major.minor`.
    pub fn hardware_revision(&self) -> String {
        version_str(self.version.hardware)
    }

    // Issues a configure call (change or query) and returns the applied
    // raw configuration.
    pub(crate) fn interface_configure(&mut self, config: i32) -> Result<i32> {
        let handle = self.handle()?;
        check_status(self.transport.configure(handle, config))
    }

    /// Queries the active pin-sharing configuration from the hardware.
    ///
    /// Always authoritative; the configuration register can be read back,
    /// so it is never shadowed.
    pub fn config(&mut self) -> Result<Config> {
        let raw = self.interface_configure(consts::CONFIG_QUERY)?;
        Config::from_raw(raw).ok_or_else(|| transport_error(consts::ERR_CONFIG_ERROR))
    }

    /// Whether the hardware I2C interface is currently enabled.
    pub fn i2c_enabled(&mut self) -> Result<bool> {
        Ok(self.config()?.i2c_enabled())
    }

    /// Enables or disables the hardware I2C interface.
    ///
    /// When disabled, SDA and SCL become available as GPIOs. The firmware
    /// only accepts the full joint I2C/SPI state, so the current
    /// configuration is queried first and the SPI facet carried over
    /// unchanged. No transport write is issued if the interface is
    /// already in the requested state.
    pub fn set_i2c_enabled(&mut self, enabled: bool) -> Result<()> {
        let current = self.config()?;
        let target = current.with_i2c(enabled);
        if target != current {
            debug!("Switching configuration {:?} -> {:?}", current, target);
            self.interface_configure(target.raw())?;
        } else {
            trace!("I2C already {}", if enabled { "enabled" } else { "disabled" });
        }
        Ok(())
    }

    /// Whether the hardware SPI interface is currently enabled.
    pub fn spi_enabled(&mut self) -> Result<bool> {
        Ok(self.config()?.spi_enabled())
    }

    /// Enables or disables the hardware SPI interface.
    ///
    /// When disabled, MISO, MOSI, SCK and SS become available as GPIOs.
    /// The I2C facet is preserved; see [`Self::set_i2c_enabled`].
    pub fn set_spi_enabled(&mut self, enabled: bool) -> Result<()> {
        let current = self.config()?;
        let target = current.with_spi(enabled);
        if target != current {
            debug!("Switching configuration {:?} -> {:?}", current, target);
            self.interface_configure(target.raw())?;
        } else {
            trace!("SPI already {}", if enabled { "enabled" } else { "disabled" });
        }
        Ok(())
    }

    /// I2C bitrate in kHz. The firmware rounds unsupported values down,
    /// so the returned value is the one actually applied. Power-on
    /// default is 100 kHz.
    pub fn i2c_bitrate_khz(&mut self) -> Result<u32> {
        let handle = self.handle()?;
        Ok(check_status(self.transport.i2c_bitrate(handle, 0))? as u32)
    }

    /// Sets the I2C bitrate in kHz and returns the applied value.
    pub fn set_i2c_bitrate_khz(&mut self, bitrate_khz: u32) -> Result<u32> {
        let handle = self.handle()?;
        Ok(check_status(self.transport.i2c_bitrate(handle, bitrate_khz as i32))? as u32)
    }

    /// I2C bus lock timeout in ms. The firmware clamps to 10..=450 ms and
    /// rounds to the next representable value. Power-on default is
    /// 200 ms.
    pub fn i2c_bus_timeout_ms(&mut self) -> Result<u32> {
        let handle = self.handle()?;
        Ok(check_status(self.transport.i2c_bus_timeout(handle, 0))? as u32)
    }

    /// Sets the I2C bus lock timeout in ms and returns the applied value.
    pub fn set_i2c_bus_timeout_ms(&mut self, timeout_ms: u32) -> Result<u32> {
        let handle = self.handle()?;
        Ok(check_status(self.transport.i2c_bus_timeout(handle, timeout_ms as i32))? as u32)
    }

    /// Whether the adapter's internal I2C pull-up resistors are enabled.
    ///
    /// Fails with a transport error on adapter revisions without
    /// switchable pull-ups.
    pub fn i2c_pullups_enabled(&mut self) -> Result<bool> {
        let handle = self.handle()?;
        let ret = check_status(self.transport.i2c_pullup(handle, consts::I2C_PULLUP_QUERY))?;
        Ok(ret != consts::I2C_PULLUP_NONE as i32)
    }

    /// Enables or disables the internal I2C pull-up resistors.
    pub fn set_i2c_pullups(&mut self, enabled: bool) -> Result<()> {
        let handle = self.handle()?;
        let mask = if enabled {
            consts::I2C_PULLUP_BOTH
        } else {
            consts::I2C_PULLUP_NONE
        };
        check_status(self.transport.i2c_pullup(handle, mask))?;
        Ok(())
    }

    /// Whether the switchable target power pins (4 and 6) are active.
    ///
    /// Fails with a transport error on adapter revisions without
    /// switchable power.
    pub fn target_power(&mut self) -> Result<bool> {
        let handle = self.handle()?;
        let ret = check_status(self.transport.target_power(handle, consts::TARGET_POWER_QUERY))?;
        Ok(ret != consts::TARGET_POWER_NONE as i32)
    }

    /// Activates or deactivates the target power pins.
    pub fn set_target_power(&mut self, enabled: bool) -> Result<()> {
        let handle = self.handle()?;
        let mask = if enabled {
            consts::TARGET_POWER_BOTH
        } else {
            consts::TARGET_POWER_NONE
        };
        check_status(self.transport.target_power(handle, mask))?;
        Ok(())
    }

    /// Blocks until an asynchronous event is pending or the timeout
    /// elapses. `None` or a negative timeout blocks indefinitely; there
    /// is no way to abort a pending poll from another thread, so callers
    /// needing cancellation should poll with short timeouts in a loop.
    ///
    /// Returns the pending events, empty if the timeout expired.
    pub fn poll(&mut self, timeout_ms: Option<i32>) -> Result<Vec<PollEvent>> {
        let handle = self.handle()?;
        let timeout = timeout_ms.unwrap_or(-1);
        let pending = check_status(self.transport.async_poll(handle, timeout))?;

        let mut events = Vec::new();
        for (bit, event) in [
            (consts::POLL_I2C_READ, PollEvent::I2cRead),
            (consts::POLL_I2C_WRITE, PollEvent::I2cWrite),
            (consts::POLL_SPI, PollEvent::Spi),
            (consts::POLL_I2C_MONITOR, PollEvent::I2cMonitor),
        ] {
            if pending & bit != 0 {
                events.push(event);
            }
        }
        Ok(events)
    }
}

impl<T: Transport> Drop for Aardvark<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let ret = self.transport.close(handle);
            if ret < 0 {
                warn!("Closing adapter on drop failed with status {}", ret);
            }
        }
    }
}
