//! SPI master operation.

use crate::device::Aardvark;
use crate::error::{check_status, Error, Result};
use crate::transport::Transport;
use log::{debug, trace};

/// SCK polarity: which edge pair the clock idles and toggles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiPolarity {
    /// Clock idles low, rising edge first.
    RisingFalling,
    /// Clock idles high, falling edge first.
    FallingRising,
}

impl SpiPolarity {
    fn raw(&self) -> u8 {
        match self {
            SpiPolarity::RisingFalling => 0,
            SpiPolarity::FallingRising => 1,
        }
    }
}

/// Sampling phase relative to the clock edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiPhase {
    /// Sample on the leading edge, set up on the trailing edge.
    SampleSetup,
    /// Set up on the leading edge, sample on the trailing edge.
    SetupSample,
}

impl SpiPhase {
    fn raw(&self) -> u8 {
        match self {
            SpiPhase::SampleSetup => 0,
            SpiPhase::SetupSample => 1,
        }
    }
}

/// Bit order on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiBitorder {
    MsbFirst,
    LsbFirst,
}

impl SpiBitorder {
    fn raw(&self) -> u8 {
        match self {
            SpiBitorder::MsbFirst => 0,
            SpiBitorder::LsbFirst => 1,
        }
    }
}

/// Polarity of the slave-select output during master transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsPolarity {
    ActiveLow,
    ActiveHigh,
}

impl SsPolarity {
    fn raw(&self) -> u8 {
        match self {
            SsPolarity::ActiveLow => 0,
            SsPolarity::ActiveHigh => 1,
        }
    }
}

impl<T: Transport> Aardvark<T> {
    /// SPI bitrate in kHz. The slowest supported rate is 125 kHz; smaller
    /// values are rounded up by the firmware. Power-on default is
    /// 1000 kHz.
    pub fn spi_bitrate_khz(&mut self) -> Result<u32> {
        let handle = self.handle()?;
        Ok(check_status(self.transport.spi_bitrate(handle, 0))? as u32)
    }

    /// Sets the SPI bitrate in kHz and returns the applied value.
    pub fn set_spi_bitrate_khz(&mut self, bitrate_khz: u32) -> Result<u32> {
        let handle = self.handle()?;
        Ok(check_status(self.transport.spi_bitrate(handle, bitrate_khz as i32))? as u32)
    }

    /// Configures clock polarity, phase and bit order for master
    /// transfers.
    pub fn spi_configure(
        &mut self,
        polarity: SpiPolarity,
        phase: SpiPhase,
        bitorder: SpiBitorder,
    ) -> Result<()> {
        let handle = self.handle()?;
        debug!(
            "Configuring SPI: {:?}, {:?}, {:?}",
            polarity, phase, bitorder
        );
        check_status(self.transport.spi_configure(
            handle,
            polarity.raw(),
            phase.raw(),
            bitorder.raw(),
        ))?;
        Ok(())
    }

    /// Configures the SPI interface by the well-known mode number.
    ///
    /// The adapter only supports modes 0 and 3 (both MSB first); any
    /// other mode fails with [`Error::UnsupportedSpiMode`].
    pub fn spi_configure_mode(&mut self, mode: u8) -> Result<()> {
        match mode {
            0 => self.spi_configure(
                SpiPolarity::RisingFalling,
                SpiPhase::SampleSetup,
                SpiBitorder::MsbFirst,
            ),
            3 => self.spi_configure(
                SpiPolarity::FallingRising,
                SpiPhase::SetupSample,
                SpiBitorder::MsbFirst,
            ),
            other => Err(Error::UnsupportedSpiMode(other)),
        }
    }

    /// Full-duplex master transfer: shifts `data` out and returns the
    /// bytes captured on MISO, one per byte written.
    pub fn spi_write(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let handle = self.handle()?;
        let mut data_in = vec![0u8; data.len()];
        check_status(self.transport.spi_write(handle, data, &mut data_in))?;
        trace!("SPI transfer: {} bytes", data.len());
        Ok(data_in)
    }

    /// Changes the output polarity of the SS line for master transfers.
    pub fn spi_ss_polarity(&mut self, polarity: SsPolarity) -> Result<()> {
        let handle = self.handle()?;
        debug!("Setting SS polarity: {:?}", polarity);
        check_status(self.transport.spi_master_ss_polarity(handle, polarity.raw()))?;
        Ok(())
    }
}
