//! Constants of the Aardvark command/response protocol.
//!
//! Numeric values follow the vendor API so that a [`crate::Transport`]
//! implementation can pass them through unchanged.

// --- General Status Codes ---
// Returned (negative) by every non-I2C-status transport call on failure.
pub const ERR_UNABLE_TO_LOAD_LIBRARY: i32 = -1;
pub const ERR_UNABLE_TO_LOAD_DRIVER: i32 = -2;
pub const ERR_UNABLE_TO_LOAD_FUNCTION: i32 = -3;
pub const ERR_INCOMPATIBLE_LIBRARY: i32 = -4;
pub const ERR_INCOMPATIBLE_DEVICE: i32 = -5;
pub const ERR_COMMUNICATION_ERROR: i32 = -6;
pub const ERR_UNABLE_TO_OPEN: i32 = -7;
pub const ERR_UNABLE_TO_CLOSE: i32 = -8;
pub const ERR_INVALID_HANDLE: i32 = -9;
pub const ERR_CONFIG_ERROR: i32 = -10;
pub const ERR_I2C_NOT_AVAILABLE: i32 = -100;
pub const ERR_I2C_NOT_ENABLED: i32 = -101;
pub const ERR_I2C_READ_ERROR: i32 = -102;
pub const ERR_I2C_WRITE_ERROR: i32 = -103;
pub const ERR_I2C_SLAVE_BAD_CONFIG: i32 = -104;
pub const ERR_I2C_SLAVE_READ_ERROR: i32 = -105;
pub const ERR_I2C_SLAVE_TIMEOUT: i32 = -106;
pub const ERR_I2C_DROPPED_EXCESS_BYTES: i32 = -107;
pub const ERR_I2C_BUS_ALREADY_FREE: i32 = -108;
pub const ERR_SPI_NOT_AVAILABLE: i32 = -200;
pub const ERR_SPI_NOT_ENABLED: i32 = -201;
pub const ERR_SPI_WRITE_ERROR: i32 = -202;
pub const ERR_SPI_SLAVE_READ_ERROR: i32 = -203;
pub const ERR_SPI_SLAVE_TIMEOUT: i32 = -204;
pub const ERR_SPI_DROPPED_EXCESS_BYTES: i32 = -205;
pub const ERR_GPIO_NOT_AVAILABLE: i32 = -400;
pub const ERR_I2C_MONITOR_NOT_AVAILABLE: i32 = -500;
pub const ERR_I2C_MONITOR_NOT_ENABLED: i32 = -501;

// --- Interface Configuration ---
// The four joint I2C/SPI/GPIO pin-sharing modes, plus the query sentinel.
pub const CONFIG_GPIO_ONLY: i32 = 0x00;
pub const CONFIG_SPI_GPIO: i32 = 0x01;
pub const CONFIG_GPIO_I2C: i32 = 0x02;
pub const CONFIG_SPI_I2C: i32 = 0x03;
pub const CONFIG_QUERY: i32 = 0x80;

// Bit set in enumerated port numbers when the device is already open.
pub const PORT_NOT_FREE: u16 = 0x8000;

// --- I2C Master Flags ---
pub const I2C_NO_FLAGS: u8 = 0x00;
pub const I2C_10_BIT_ADDR: u8 = 0x01;
pub const I2C_COMBINED_FMT: u8 = 0x02;
pub const I2C_NO_STOP: u8 = 0x04;
pub const I2C_SIZED_READ: u8 = 0x10;
pub const I2C_SIZED_READ_EXTRA1: u8 = 0x20;

// --- I2C Transaction Status Codes ---
// Distinct from the general status space above; returned by master/slave
// transfer calls.
pub const I2C_STATUS_OK: i32 = 0;
pub const I2C_STATUS_BUS_ERROR: i32 = 1;
pub const I2C_STATUS_SLA_ACK: i32 = 2;
pub const I2C_STATUS_SLA_NACK: i32 = 3;
pub const I2C_STATUS_DATA_NACK: i32 = 4;
pub const I2C_STATUS_ARB_LOST: i32 = 5;
pub const I2C_STATUS_BUS_LOCKED: i32 = 6;
pub const I2C_STATUS_LAST_DATA_ACK: i32 = 7;

// --- I2C Pullup / Target Power Selectors ---
pub const I2C_PULLUP_NONE: u8 = 0x00;
pub const I2C_PULLUP_BOTH: u8 = 0x03;
pub const I2C_PULLUP_QUERY: u8 = 0x80;
pub const TARGET_POWER_NONE: u8 = 0x00;
pub const TARGET_POWER_BOTH: u8 = 0x03;
pub const TARGET_POWER_QUERY: u8 = 0x80;

// --- Async Poll Event Bits ---
pub const POLL_NO_DATA: i32 = 0x00;
pub const POLL_I2C_READ: i32 = 0x01;
pub const POLL_I2C_WRITE: i32 = 0x02;
pub const POLL_SPI: i32 = 0x04;
pub const POLL_I2C_MONITOR: i32 = 0x08;

// --- I2C Monitor Symbols ---
// Monitor samples are u16: data bytes in the low byte, special symbols above.
pub const I2C_MONITOR_DATA: u16 = 0x00FF;
pub const I2C_MONITOR_NACK: u16 = 0x0100;
pub const I2C_MONITOR_START: u16 = 0xFF00;
pub const I2C_MONITOR_STOP: u16 = 0xFF01;

// --- General-call slave address reported by the firmware ---
pub const I2C_GENERAL_CALL_RAW: u8 = 0x80;
