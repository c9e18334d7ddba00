//! Interface configuration state.
//!
//! The adapter multiplexes its six physical pins between the I2C and SPI
//! subsystems and plain GPIO. Only four joint configurations exist; the
//! firmware accepts the full joint state on every change, so toggling one
//! subsystem requires knowing the other's current state first (handled by
//! [`crate::Aardvark::set_i2c_enabled`] and friends).

use crate::consts;

/// One of the four legal pin-sharing configurations.
///
/// The set forms a 2x2 lattice over two independent facets, `i2c` and
/// `spi`. Unlike the GPIO output state, the active configuration can always
/// be read back from the hardware, so it is never shadowed client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Config {
    /// All six pins available as GPIO.
    GpioOnly,
    /// SPI active, SDA/SCL available as GPIO.
    SpiGpio,
    /// I2C active, MISO/MOSI/SCK/SS available as GPIO.
    GpioI2c,
    /// Both subsystems active. Power-cycle default of the adapter.
    SpiI2c,
}

impl Config {
    /// Builds the configuration from its two facets.
    pub fn from_facets(i2c: bool, spi: bool) -> Self {
        match (i2c, spi) {
            (false, false) => Config::GpioOnly,
            (false, true) => Config::SpiGpio,
            (true, false) => Config::GpioI2c,
            (true, true) => Config::SpiI2c,
        }
    }

    /// Whether the I2C subsystem is active in this configuration.
    pub fn i2c_enabled(&self) -> bool {
        matches!(self, Config::GpioI2c | Config::SpiI2c)
    }

    /// Whether the SPI subsystem is active in this configuration.
    pub fn spi_enabled(&self) -> bool {
        matches!(self, Config::SpiGpio | Config::SpiI2c)
    }

    /// Returns this configuration with the I2C facet replaced.
    pub fn with_i2c(self, enabled: bool) -> Self {
        Config::from_facets(enabled, self.spi_enabled())
    }

    /// Returns this configuration with the SPI facet replaced.
    pub fn with_spi(self, enabled: bool) -> Self {
        Config::from_facets(self.i2c_enabled(), enabled)
    }

    /// Wire value accepted by the configure call.
    pub fn raw(&self) -> i32 {
        match self {
            Config::GpioOnly => consts::CONFIG_GPIO_ONLY,
            Config::SpiGpio => consts::CONFIG_SPI_GPIO,
            Config::GpioI2c => consts::CONFIG_GPIO_I2C,
            Config::SpiI2c => consts::CONFIG_SPI_I2C,
        }
    }

    /// Decodes a wire value reported by the configure call.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            consts::CONFIG_GPIO_ONLY => Some(Config::GpioOnly),
            consts::CONFIG_SPI_GPIO => Some(Config::SpiGpio),
            consts::CONFIG_GPIO_I2C => Some(Config::GpioI2c),
            consts::CONFIG_SPI_I2C => Some(Config::SpiI2c),
            _ => None,
        }
    }
}
