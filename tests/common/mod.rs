//! Scripted transport used to drive the library in integration tests.
//!
//! The mock records every call and answers from a small amount of
//! programmable state, the same way the original firmware would: handles
//! equal the opened port, the configure call applies and echoes joint
//! configurations, and error injection knobs force negative status codes
//! on selected primitives.

#![allow(dead_code)]

use aardvark_usb::{consts, Aardvark, Handle, Transport, VersionInfo};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    OpenExt(u16),
    Close(i32),
    UniqueId,
    FindDevices,
    FindDevicesExt(usize),
    Configure(i32),
    I2cBitrate(i32),
    I2cBusTimeout(i32),
    I2cPullup(u8),
    TargetPower(u8),
    I2cWrite {
        addr: u16,
        flags: u8,
        data: Vec<u8>,
    },
    I2cRead {
        addr: u16,
        flags: u8,
        len: usize,
    },
    I2cSlaveEnable {
        addr: u8,
        max_tx: usize,
        max_rx: usize,
    },
    I2cSlaveDisable,
    I2cSlaveRead,
    I2cSlaveSetResponse(Vec<u8>),
    I2cSlaveWriteStats,
    MonitorEnable,
    MonitorDisable,
    MonitorRead,
    SpiBitrate(i32),
    SpiConfigure {
        polarity: u8,
        phase: u8,
        bitorder: u8,
    },
    SpiWrite(Vec<u8>),
    SpiSsPolarity(u8),
    GpioDirection(u8),
    GpioSet(u8),
    GpioPullup(u8),
    GpioChange(i32),
    AsyncPoll(i32),
}

#[derive(Debug)]
pub struct State {
    pub calls: Vec<Call>,
    /// Enumeration data: (port, unique id). Set PORT_NOT_FREE in the port
    /// to mark it as in use.
    pub devices: Vec<(u16, u32)>,
    /// Forces open_ext to fail with this code.
    pub open_error: Option<i32>,
    pub version: VersionInfo,
    /// Fallback unique id when the opened port is not in `devices`.
    pub unique_id: u32,
    /// Overrides the unique id lookup entirely; simulates the enumeration
    /// snapshot going stale between resolve and open.
    pub unique_id_override: Option<u32>,
    /// Joint configuration as the firmware sees it.
    pub config: i32,
    pub configure_error: Option<i32>,
    pub gpio_error: Option<i32>,
    pub gpio_change_result: i32,
    pub i2c_write_status: i32,
    pub i2c_read_status: i32,
    pub i2c_read_data: Vec<u8>,
    pub i2c_slave_status: i32,
    pub slave_read_addr: u8,
    pub slave_read_data: Vec<u8>,
    pub slave_set_response_error: Option<i32>,
    pub write_stats: i32,
    pub monitor_data: Vec<u16>,
    pub i2c_bitrate: i32,
    pub i2c_bus_timeout: i32,
    pub spi_bitrate: i32,
    pub pullup_state: u8,
    pub power_state: u8,
    pub spi_read_data: Vec<u8>,
    pub async_poll_result: i32,
}

impl Default for State {
    fn default() -> Self {
        State {
            calls: Vec::new(),
            devices: Vec::new(),
            open_error: None,
            version: VersionInfo::default(),
            unique_id: 0,
            unique_id_override: None,
            config: consts::CONFIG_SPI_I2C,
            configure_error: None,
            gpio_error: None,
            gpio_change_result: 0,
            i2c_write_status: consts::I2C_STATUS_OK,
            i2c_read_status: consts::I2C_STATUS_OK,
            i2c_read_data: Vec::new(),
            i2c_slave_status: consts::I2C_STATUS_OK,
            slave_read_addr: 0,
            slave_read_data: Vec::new(),
            slave_set_response_error: None,
            write_stats: 0,
            monitor_data: Vec::new(),
            i2c_bitrate: 100,
            i2c_bus_timeout: 200,
            spi_bitrate: 1000,
            pullup_state: 0,
            power_state: 0,
            spi_read_data: Vec::new(),
            async_poll_result: consts::POLL_NO_DATA,
        }
    }
}

impl State {
    pub fn count<F: Fn(&Call) -> bool>(&self, pred: F) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

/// Handle-out-to-state mock. Clone the inner `Rc` before handing the
/// transport to a session to keep inspecting calls afterwards.
#[derive(Debug)]
pub struct MockTransport {
    pub state: Rc<RefCell<State>>,
}

impl MockTransport {
    pub fn new() -> (Self, Rc<RefCell<State>>) {
        let state = Rc::new(RefCell::new(State::default()));
        (
            MockTransport {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

/// Opens a session on port 0 and clears the recorded open-time calls, so
/// tests only see the traffic they generate themselves.
pub fn open_default_session() -> (Aardvark<MockTransport>, Rc<RefCell<State>>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mock, state) = MockTransport::new();
    let adapter = Aardvark::open_default(mock).expect("open failed");
    state.borrow_mut().calls.clear();
    (adapter, state)
}

impl Transport for MockTransport {
    fn open_ext(&mut self, port: u16) -> (i32, VersionInfo) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::OpenExt(port));
        let version = s.version;
        match s.open_error {
            Some(code) => (code, version),
            // Handles mirror the port so tests can tell sessions apart.
            None => (port as i32, version),
        }
    }

    fn close(&mut self, handle: Handle) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::Close(handle.raw()));
        0
    }

    fn unique_id(&mut self, handle: Handle) -> u32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::UniqueId);
        if let Some(uid) = s.unique_id_override {
            return uid;
        }
        let port = handle.raw() as u16;
        s.devices
            .iter()
            .find(|(p, _)| p & !consts::PORT_NOT_FREE == port)
            .map(|(_, uid)| *uid)
            .unwrap_or(s.unique_id)
    }

    fn find_devices(&mut self) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::FindDevices);
        s.devices.len() as i32
    }

    fn find_devices_ext(&mut self, ports: &mut [u16], unique_ids: &mut [u32]) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::FindDevicesExt(ports.len()));
        for (i, (port, uid)) in s.devices.iter().enumerate() {
            if i < ports.len() {
                ports[i] = *port;
            }
            if i < unique_ids.len() {
                unique_ids[i] = *uid;
            }
        }
        s.devices.len() as i32
    }

    fn configure(&mut self, _handle: Handle, config: i32) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::Configure(config));
        if let Some(code) = s.configure_error {
            return code;
        }
        if config != consts::CONFIG_QUERY {
            s.config = config;
        }
        s.config
    }

    fn i2c_bitrate(&mut self, _handle: Handle, bitrate_khz: i32) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cBitrate(bitrate_khz));
        if bitrate_khz != 0 {
            s.i2c_bitrate = bitrate_khz;
        }
        s.i2c_bitrate
    }

    fn i2c_bus_timeout(&mut self, _handle: Handle, timeout_ms: i32) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cBusTimeout(timeout_ms));
        if timeout_ms != 0 {
            s.i2c_bus_timeout = timeout_ms;
        }
        s.i2c_bus_timeout
    }

    fn i2c_pullup(&mut self, _handle: Handle, pullup_mask: u8) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cPullup(pullup_mask));
        if pullup_mask != consts::I2C_PULLUP_QUERY {
            s.pullup_state = pullup_mask;
        }
        s.pullup_state as i32
    }

    fn target_power(&mut self, _handle: Handle, power_mask: u8) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::TargetPower(power_mask));
        if power_mask != consts::TARGET_POWER_QUERY {
            s.power_state = power_mask;
        }
        s.power_state as i32
    }

    fn i2c_write_ext(
        &mut self,
        _handle: Handle,
        addr: u16,
        flags: u8,
        data: &[u8],
    ) -> (i32, usize) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cWrite {
            addr,
            flags,
            data: data.to_vec(),
        });
        (s.i2c_write_status, data.len())
    }

    fn i2c_read_ext(
        &mut self,
        _handle: Handle,
        addr: u16,
        flags: u8,
        data: &mut [u8],
    ) -> (i32, usize) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cRead {
            addr,
            flags,
            len: data.len(),
        });
        let n = s.i2c_read_data.len().min(data.len());
        data[..n].copy_from_slice(&s.i2c_read_data[..n]);
        (s.i2c_read_status, n)
    }

    fn i2c_slave_enable(
        &mut self,
        _handle: Handle,
        addr: u8,
        max_tx_bytes: usize,
        max_rx_bytes: usize,
    ) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cSlaveEnable {
            addr,
            max_tx: max_tx_bytes,
            max_rx: max_rx_bytes,
        });
        0
    }

    fn i2c_slave_disable(&mut self, _handle: Handle) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cSlaveDisable);
        0
    }

    fn i2c_slave_read_ext(&mut self, _handle: Handle, data: &mut [u8]) -> (i32, u8, usize) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cSlaveRead);
        let n = s.slave_read_data.len().min(data.len());
        data[..n].copy_from_slice(&s.slave_read_data[..n]);
        (s.i2c_slave_status, s.slave_read_addr, n)
    }

    fn i2c_slave_set_response(&mut self, _handle: Handle, data: &[u8]) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cSlaveSetResponse(data.to_vec()));
        match s.slave_set_response_error {
            Some(code) => code,
            None => data.len() as i32,
        }
    }

    fn i2c_slave_write_stats(&mut self, _handle: Handle) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::I2cSlaveWriteStats);
        s.write_stats
    }

    fn i2c_monitor_enable(&mut self, _handle: Handle) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::MonitorEnable);
        0
    }

    fn i2c_monitor_disable(&mut self, _handle: Handle) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::MonitorDisable);
        0
    }

    fn i2c_monitor_read(&mut self, _handle: Handle, data: &mut [u16]) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::MonitorRead);
        let n = s.monitor_data.len().min(data.len());
        data[..n].copy_from_slice(&s.monitor_data[..n]);
        n as i32
    }

    fn spi_bitrate(&mut self, _handle: Handle, bitrate_khz: i32) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::SpiBitrate(bitrate_khz));
        if bitrate_khz != 0 {
            s.spi_bitrate = bitrate_khz.max(125);
        }
        s.spi_bitrate
    }

    fn spi_configure(&mut self, _handle: Handle, polarity: u8, phase: u8, bitorder: u8) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::SpiConfigure {
            polarity,
            phase,
            bitorder,
        });
        0
    }

    fn spi_write(&mut self, _handle: Handle, data_out: &[u8], data_in: &mut [u8]) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::SpiWrite(data_out.to_vec()));
        let n = s.spi_read_data.len().min(data_in.len());
        data_in[..n].copy_from_slice(&s.spi_read_data[..n]);
        data_out.len() as i32
    }

    fn spi_master_ss_polarity(&mut self, _handle: Handle, polarity: u8) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::SpiSsPolarity(polarity));
        0
    }

    fn gpio_direction(&mut self, _handle: Handle, direction_mask: u8) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::GpioDirection(direction_mask));
        s.gpio_error.unwrap_or(0)
    }

    fn gpio_set(&mut self, _handle: Handle, value_mask: u8) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::GpioSet(value_mask));
        s.gpio_error.unwrap_or(0)
    }

    fn gpio_pullup(&mut self, _handle: Handle, pullup_mask: u8) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::GpioPullup(pullup_mask));
        s.gpio_error.unwrap_or(0)
    }

    fn gpio_change(&mut self, _handle: Handle, timeout_ms: i32) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::GpioChange(timeout_ms));
        s.gpio_change_result
    }

    fn async_poll(&mut self, _handle: Handle, timeout_ms: i32) -> i32 {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::AsyncPoll(timeout_ms));
        s.async_poll_result
    }
}
