//! I2C master and slave operation, plus the monitor passthrough.
//!
//! I2C transfers carry their own status enumeration, separate from the
//! general transport status space. Any non-OK status surfaces as
//! [`Error::I2c`]; transport failures on the surrounding control calls
//! (slave enable, monitor enable, ...) stay [`Error::Transport`].

use crate::consts;
use crate::device::Aardvark;
use crate::error::{check_status, Error, Result};
use crate::transport::Transport;
use log::{debug, trace};
use std::fmt;

/// Outcome of an I2C master or slave transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cStatus {
    Ok,
    BusError,
    SlaveAck,
    SlaveNack,
    DataNack,
    ArbLost,
    BusLocked,
    LastDataAck,
    /// A status code this library does not know about.
    Unknown(i32),
}

impl I2cStatus {
    /// Decodes a raw status code from a transfer call.
    pub fn from_raw(code: i32) -> Self {
        match code {
            consts::I2C_STATUS_OK => I2cStatus::Ok,
            consts::I2C_STATUS_BUS_ERROR => I2cStatus::BusError,
            consts::I2C_STATUS_SLA_ACK => I2cStatus::SlaveAck,
            consts::I2C_STATUS_SLA_NACK => I2cStatus::SlaveNack,
            consts::I2C_STATUS_DATA_NACK => I2cStatus::DataNack,
            consts::I2C_STATUS_ARB_LOST => I2cStatus::ArbLost,
            consts::I2C_STATUS_BUS_LOCKED => I2cStatus::BusLocked,
            consts::I2C_STATUS_LAST_DATA_ACK => I2cStatus::LastDataAck,
            other => I2cStatus::Unknown(other),
        }
    }

    /// Symbolic name of this status.
    pub fn name(&self) -> &'static str {
        match self {
            I2cStatus::Ok => "I2C_STATUS_OK",
            I2cStatus::BusError => "I2C_STATUS_BUS_ERROR",
            I2cStatus::SlaveAck => "I2C_STATUS_SLA_ACK",
            I2cStatus::SlaveNack => "I2C_STATUS_SLA_NACK",
            I2cStatus::DataNack => "I2C_STATUS_DATA_NACK",
            I2cStatus::ArbLost => "I2C_STATUS_ARB_LOST",
            I2cStatus::BusLocked => "I2C_STATUS_BUS_LOCKED",
            I2cStatus::LastDataAck => "I2C_STATUS_LAST_DATA_ACK",
            I2cStatus::Unknown(_) => "I2C_STATUS_UNKNOWN_STATUS",
        }
    }
}

impl fmt::Display for I2cStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            I2cStatus::Unknown(code) => write!(f, "{} ({})", self.name(), code),
            _ => f.write_str(self.name()),
        }
    }
}

// Maps a non-OK transfer status to Error::I2c.
fn check_i2c_status(code: i32) -> Result<()> {
    match I2cStatus::from_raw(code) {
        I2cStatus::Ok => Ok(()),
        status => Err(Error::I2c(status)),
    }
}

impl<T: Transport> Aardvark<T> {
    /// Makes an I2C master write access.
    ///
    /// The addressed device receives `data`; the transaction ends with a
    /// stop condition unless [`consts::I2C_NO_STOP`] is set in `flags`.
    /// 10-bit addresses are supported with [`consts::I2C_10_BIT_ADDR`].
    pub fn i2c_master_write(&mut self, addr: u16, data: &[u8], flags: u8) -> Result<()> {
        let handle = self.handle()?;
        debug!(
            "I2C master write to 0x{:02X}: {} bytes, flags=0x{:02X}",
            addr,
            data.len(),
            flags
        );
        let (status, num_written) = self.transport.i2c_write_ext(handle, addr, flags, data);
        check_i2c_status(status)?;
        trace!("I2C master write: {} bytes on the wire", num_written);
        Ok(())
    }

    /// Makes an I2C master read access.
    ///
    /// Clock cycles for `length` bytes are generated; a short read occurs
    /// if the device NAKs early, in which case the returned buffer is
    /// shorter than requested. The transaction ends with a stop condition
    /// unless [`consts::I2C_NO_STOP`] is set.
    pub fn i2c_master_read(&mut self, addr: u16, length: usize, flags: u8) -> Result<Vec<u8>> {
        let handle = self.handle()?;
        let mut data = vec![0u8; length];
        let (status, num_read) = self.transport.i2c_read_ext(handle, addr, flags, &mut data);
        check_i2c_status(status)?;
        data.truncate(num_read);
        trace!("I2C master read from 0x{:02X}: {} bytes", addr, data.len());
        Ok(data)
    }

    /// Makes an I2C write-then-read access.
    ///
    /// The write is issued without a stop condition; the read then begins
    /// with a repeated start. This is the usual access pattern for
    /// addressable devices like EEPROMs and port expanders.
    pub fn i2c_master_write_read(
        &mut self,
        addr: u16,
        data: &[u8],
        length: usize,
    ) -> Result<Vec<u8>> {
        self.i2c_master_write(addr, data, consts::I2C_NO_STOP)?;
        self.i2c_master_read(addr, length, consts::I2C_NO_FLAGS)
    }

    /// Enables I2C slave mode on `addr`.
    ///
    /// The adapter then responds when addressed. Use [`Self::poll`] to
    /// wait for received data and [`Self::i2c_slave_read`] to fetch it.
    pub fn i2c_slave_enable(&mut self, addr: u8) -> Result<()> {
        let handle = self.handle()?;
        debug!("Enabling I2C slave mode on 0x{:02X}", addr);
        check_status(self.transport.i2c_slave_enable(
            handle,
            addr,
            Self::BUFFER_SIZE,
            Self::BUFFER_SIZE,
        ))?;
        Ok(())
    }

    /// Disables I2C slave mode.
    pub fn i2c_slave_disable(&mut self) -> Result<()> {
        let handle = self.handle()?;
        debug!("Disabling I2C slave mode");
        check_status(self.transport.i2c_slave_disable(handle))?;
        Ok(())
    }

    /// Fetches the bytes received in a slave transaction, together with
    /// the address the master used. A general call is reported as
    /// address `0x00`.
    pub fn i2c_slave_read(&mut self) -> Result<(u8, Vec<u8>)> {
        let handle = self.handle()?;
        let mut data = vec![0u8; Self::BUFFER_SIZE];
        let (status, addr, num_read) = self.transport.i2c_slave_read_ext(handle, &mut data);
        check_i2c_status(status)?;
        data.truncate(num_read);
        let addr = if addr == consts::I2C_GENERAL_CALL_RAW {
            0x00
        } else {
            addr
        };
        trace!("I2C slave read: {} bytes from master 0x{:02X}", data.len(), addr);
        Ok((addr, data))
    }

    /// Loads the buffer the adapter transmits on the next slave read
    /// transaction. The shadow copy is updated only if the hardware
    /// accepted the buffer.
    pub fn set_i2c_slave_response(&mut self, data: &[u8]) -> Result<()> {
        let handle = self.handle()?;
        debug!("Setting I2C slave response: {} bytes", data.len());
        check_status(self.transport.i2c_slave_set_response(handle, data))?;
        self.shadow.slave_response = Some(data.to_vec());
        Ok(())
    }

    /// The last slave response buffer written through this session, or
    /// `None` if none was set.
    ///
    /// The hardware provides no read-back for this buffer, so the value
    /// is served from the shadow cache and only reflects what this
    /// session wrote. It may be stale if the device was modified through
    /// another path.
    pub fn i2c_slave_response(&self) -> Option<&[u8]> {
        self.shadow.slave_response.as_deref()
    }

    /// Number of bytes transmitted by the last slave response.
    pub fn i2c_slave_last_transmit_size(&mut self) -> Result<usize> {
        let handle = self.handle()?;
        Ok(check_status(self.transport.i2c_slave_write_stats(handle))? as usize)
    }

    /// Activates the passive bus monitor. While active, all other adapter
    /// functions are disabled. Fails with a transport error on adapter
    /// revisions without monitor support.
    pub fn i2c_monitor_enable(&mut self) -> Result<()> {
        let handle = self.handle()?;
        debug!("Enabling I2C monitor");
        check_status(self.transport.i2c_monitor_enable(handle))?;
        Ok(())
    }

    /// Deactivates the passive bus monitor.
    pub fn i2c_monitor_disable(&mut self) -> Result<()> {
        let handle = self.handle()?;
        debug!("Disabling I2C monitor");
        check_status(self.transport.i2c_monitor_disable(handle))?;
        Ok(())
    }

    /// Drains captured monitor samples.
    ///
    /// Samples are returned undecoded: data bytes in the low byte, plus
    /// the special symbols [`consts::I2C_MONITOR_NACK`],
    /// [`consts::I2C_MONITOR_START`] and [`consts::I2C_MONITOR_STOP`].
    /// Use [`Self::poll`] to check for pending samples first.
    pub fn i2c_monitor_read(&mut self) -> Result<Vec<u16>> {
        let handle = self.handle()?;
        let mut data = vec![0u16; Self::BUFFER_SIZE];
        let num_read = check_status(self.transport.i2c_monitor_read(handle, &mut data))? as usize;
        data.truncate(num_read);
        Ok(data)
    }
}
