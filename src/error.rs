use crate::consts;
use crate::i2c::I2cStatus;
use thiserror::Error;

/// Errors that can occur when using Aardvark adapters.
///
/// Transport-level failures and I2C transaction status failures are two
/// independent status spaces in the firmware protocol and are kept as
/// separate variants so callers can distinguish a broken link from a
/// misbehaving bus.
#[derive(Error, Debug)]
pub enum Error {
    /// A transport call returned a negative status code.
    #[error("transport error {code} ({message})")]
    Transport {
        /// The raw negative status code.
        code: i32,
        /// Symbolic name of the code, `ERR_UNKNOWN` if unrecognized.
        message: &'static str,
    },
    /// An I2C master or slave transaction completed with a non-OK status.
    #[error("I2C transaction failed: {0}")]
    I2c(I2cStatus),
    /// The adapter firmware is older than this library requires.
    #[error("incompatible device: firmware {firmware} older than required {required}")]
    IncompatibleDevice {
        /// Firmware version reported by the adapter, as `major.minor`.
        firmware: String,
        /// Minimum firmware version this library requires.
        required: String,
    },
    /// This library is older than the adapter firmware requires.
    #[error("incompatible library: version {software} older than required {required}")]
    IncompatibleLibrary {
        /// Software (library) version, as `major.minor`.
        software: String,
        /// Minimum software version the firmware requires.
        required: String,
    },
    /// No adapter matched the requested port or serial number.
    ///
    /// Also returned when an adapter opened by serial number turns out to
    /// be a different device than the enumeration promised (the enumeration
    /// snapshot was stale). No retry is attempted in that case.
    #[error("device not found")]
    DeviceNotFound,
    /// An operation was invoked on a session that was already closed.
    #[error("session is closed")]
    SessionClosed,
    /// The requested SPI mode is not supported by the adapter.
    #[error("SPI mode {0} not supported (only modes 0 and 3)")]
    UnsupportedSpiMode(u8),
}

/// Result type alias for Aardvark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the symbolic name for a general (non-I2C) status code.
pub fn status_string(code: i32) -> &'static str {
    match code {
        consts::ERR_UNABLE_TO_LOAD_LIBRARY => "ERR_UNABLE_TO_LOAD_LIBRARY",
        consts::ERR_UNABLE_TO_LOAD_DRIVER => "ERR_UNABLE_TO_LOAD_DRIVER",
        consts::ERR_UNABLE_TO_LOAD_FUNCTION => "ERR_UNABLE_TO_LOAD_FUNCTION",
        consts::ERR_INCOMPATIBLE_LIBRARY => "ERR_INCOMPATIBLE_LIBRARY",
        consts::ERR_INCOMPATIBLE_DEVICE => "ERR_INCOMPATIBLE_DEVICE",
        consts::ERR_COMMUNICATION_ERROR => "ERR_COMMUNICATION_ERROR",
        consts::ERR_UNABLE_TO_OPEN => "ERR_UNABLE_TO_OPEN",
        consts::ERR_UNABLE_TO_CLOSE => "ERR_UNABLE_TO_CLOSE",
        consts::ERR_INVALID_HANDLE => "ERR_INVALID_HANDLE",
        consts::ERR_CONFIG_ERROR => "ERR_CONFIG_ERROR",
        consts::ERR_I2C_NOT_AVAILABLE => "ERR_I2C_NOT_AVAILABLE",
        consts::ERR_I2C_NOT_ENABLED => "ERR_I2C_NOT_ENABLED",
        consts::ERR_I2C_READ_ERROR => "ERR_I2C_READ_ERROR",
        consts::ERR_I2C_WRITE_ERROR => "ERR_I2C_WRITE_ERROR",
        consts::ERR_I2C_SLAVE_BAD_CONFIG => "ERR_I2C_SLAVE_BAD_CONFIG",
        consts::ERR_I2C_SLAVE_READ_ERROR => "ERR_I2C_SLAVE_READ_ERROR",
        consts::ERR_I2C_SLAVE_TIMEOUT => "ERR_I2C_SLAVE_TIMEOUT",
        consts::ERR_I2C_DROPPED_EXCESS_BYTES => "ERR_I2C_DROPPED_EXCESS_BYTES",
        consts::ERR_I2C_BUS_ALREADY_FREE => "ERR_I2C_BUS_ALREADY_FREE",
        consts::ERR_SPI_NOT_AVAILABLE => "ERR_SPI_NOT_AVAILABLE",
        consts::ERR_SPI_NOT_ENABLED => "ERR_SPI_NOT_ENABLED",
        consts::ERR_SPI_WRITE_ERROR => "ERR_SPI_WRITE_ERROR",
        consts::ERR_SPI_SLAVE_READ_ERROR => "ERR_SPI_SLAVE_READ_ERROR",
        consts::ERR_SPI_SLAVE_TIMEOUT => "ERR_SPI_SLAVE_TIMEOUT",
        consts::ERR_SPI_DROPPED_EXCESS_BYTES => "ERR_SPI_DROPPED_EXCESS_BYTES",
        consts::ERR_GPIO_NOT_AVAILABLE => "ERR_GPIO_NOT_AVAILABLE",
        consts::ERR_I2C_MONITOR_NOT_AVAILABLE => "ERR_I2C_MONITOR_NOT_AVAILABLE",
        consts::ERR_I2C_MONITOR_NOT_ENABLED => "ERR_I2C_MONITOR_NOT_ENABLED",
        _ => "ERR_UNKNOWN",
    }
}

/// Builds the [`Error::Transport`] for a negative status code.
pub(crate) fn transport_error(code: i32) -> Error {
    Error::Transport {
        code,
        message: status_string(code),
    }
}

/// Maps a negative return value to [`Error::Transport`], passing
/// non-negative values through. Mirrors the firmware calling convention
/// where every non-I2C-status call multiplexes its result and its error
/// into one signed integer.
pub(crate) fn check_status(ret: i32) -> Result<i32> {
    if ret < 0 {
        Err(transport_error(ret))
    } else {
        Ok(ret)
    }
}
