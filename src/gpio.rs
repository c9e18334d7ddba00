//! GPIO control and the client-side shadow of write-only pin state.
//!
//! The firmware offers no way to read back pin direction, drive level or
//! pull-up enables. The session therefore caches every successful write and
//! answers [`Aardvark::gpio_get`] for output pins from that cache alone.
//! Input pins are resolved live through a blocking poll.

use crate::device::Aardvark;
use crate::error::{check_status, Result};
use crate::transport::Transport;
use log::{debug, trace};
use std::fmt;

// Timeout used when gpio_get has to fall back to polling an input pin.
const GPIO_GET_POLL_TIMEOUT_MS: i32 = 32;

/// One of the six physical pins shared between I2C, SPI and GPIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    Scl,
    Sda,
    Miso,
    Sck,
    Mosi,
    Ss,
}

impl Pin {
    /// All six pins, in wire bit order.
    pub const ALL: [Pin; 6] = [Pin::Scl, Pin::Sda, Pin::Miso, Pin::Sck, Pin::Mosi, Pin::Ss];

    /// Wire bitmask of this pin.
    pub fn mask(&self) -> u8 {
        match self {
            Pin::Scl => 0x01,
            Pin::Sda => 0x02,
            Pin::Miso => 0x04,
            Pin::Sck => 0x08,
            Pin::Mosi => 0x10,
            Pin::Ss => 0x20,
        }
    }
}

/// A set of [`Pin`]s.
///
/// The configured-outputs, driven-high and pull-up masks share no
/// hardware-level distinction, so raw bitmask arithmetic aliases them
/// easily. This type keeps them apart in the API and converts to the wire
/// bitmask only at the transport boundary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PinSet(u8);

impl PinSet {
    const VALID_MASK: u8 = 0x3F;

    /// The empty set.
    pub fn empty() -> Self {
        PinSet(0)
    }

    /// The set of all six pins.
    pub fn all() -> Self {
        PinSet(Self::VALID_MASK)
    }

    /// Builds a set from a wire bitmask, ignoring bits above the six pins.
    pub fn from_mask(mask: u8) -> Self {
        PinSet(mask & Self::VALID_MASK)
    }

    /// Wire bitmask of this set.
    pub fn mask(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(&self, pin: Pin) -> bool {
        self.0 & pin.mask() != 0
    }

    pub fn insert(&mut self, pin: Pin) {
        self.0 |= pin.mask();
    }

    pub fn remove(&mut self, pin: Pin) {
        self.0 &= !pin.mask();
    }

    /// Returns this set with `pin` added. Convenient for building literals.
    pub fn with(mut self, pin: Pin) -> Self {
        self.insert(pin);
        self
    }

    /// Returns this set with `pin` removed.
    pub fn without(mut self, pin: Pin) -> Self {
        self.remove(pin);
        self
    }

    /// Whether every pin of `self` is also in `other`.
    pub fn is_subset_of(&self, other: PinSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterates the member pins in wire bit order.
    pub fn iter(&self) -> impl Iterator<Item = Pin> + '_ {
        Pin::ALL.into_iter().filter(|pin| self.contains(*pin))
    }
}

impl From<Pin> for PinSet {
    fn from(pin: Pin) -> Self {
        PinSet(pin.mask())
    }
}

impl FromIterator<Pin> for PinSet {
    fn from_iter<I: IntoIterator<Item = Pin>>(iter: I) -> Self {
        let mut set = PinSet::empty();
        for pin in iter {
            set.insert(pin);
        }
        set
    }
}

impl fmt::Debug for PinSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Transport> Aardvark<T> {
    /// Returns the cached set of pins configured as outputs.
    ///
    /// This is a pure cache read; the hardware cannot report pin
    /// directions back.
    pub fn gpio_outputs(&self) -> PinSet {
        self.shadow.outputs
    }

    /// Configures which pins are driven as outputs; all other pins become
    /// inputs.
    ///
    /// A repeated call with an identical set issues no transport call. On
    /// failure the cached set is left unchanged.
    pub fn set_gpio_outputs(&mut self, outputs: PinSet) -> Result<()> {
        let handle = self.handle()?;
        if outputs.mask() == self.shadow.outputs.mask() {
            trace!("GPIO outputs already {:?}, skipping write", outputs);
            return Ok(());
        }
        debug!("Configuring GPIO outputs: {:?}", outputs);
        check_status(self.transport.gpio_direction(handle, outputs.mask()))?;
        self.shadow.outputs = outputs;
        Ok(())
    }

    /// Returns the cached set of pins with pull-up resistors enabled.
    pub fn gpio_pullups(&self) -> PinSet {
        self.shadow.pullups
    }

    /// Enables pull-up resistors on exactly the pins in `pullups`.
    ///
    /// Pull-ups only affect pins configured as inputs. Same no-op and
    /// cache discipline as [`Self::set_gpio_outputs`].
    pub fn set_gpio_pullups(&mut self, pullups: PinSet) -> Result<()> {
        let handle = self.handle()?;
        if pullups.mask() == self.shadow.pullups.mask() {
            trace!("GPIO pullups already {:?}, skipping write", pullups);
            return Ok(());
        }
        debug!("Configuring GPIO pullups: {:?}", pullups);
        check_status(self.transport.gpio_pullup(handle, pullups.mask()))?;
        self.shadow.pullups = pullups;
        Ok(())
    }

    /// Drives a configured output pin high. No-op if the cache already
    /// shows the pin high.
    pub fn gpio_set_high(&mut self, pin: Pin) -> Result<()> {
        let handle = self.handle()?;
        if self.shadow.high.contains(pin) {
            trace!("GPIO pin {:?} already high", pin);
            return Ok(());
        }
        let new_high = self.shadow.high.with(pin);
        trace!("Driving {:?} high, output mask 0x{:02X}", pin, new_high.mask());
        check_status(self.transport.gpio_set(handle, new_high.mask()))?;
        self.shadow.high = new_high;
        Ok(())
    }

    /// Drives a configured output pin low. No-op if the cache already
    /// shows the pin low.
    pub fn gpio_set_low(&mut self, pin: Pin) -> Result<()> {
        let handle = self.handle()?;
        if !self.shadow.high.contains(pin) {
            trace!("GPIO pin {:?} already low", pin);
            return Ok(());
        }
        let new_high = self.shadow.high.without(pin);
        trace!("Driving {:?} low, output mask 0x{:02X}", pin, new_high.mask());
        check_status(self.transport.gpio_set(handle, new_high.mask()))?;
        self.shadow.high = new_high;
        Ok(())
    }

    /// Toggles a configured output pin based on its cached state.
    pub fn gpio_toggle(&mut self, pin: Pin) -> Result<()> {
        if self.shadow.high.contains(pin) {
            self.gpio_set_low(pin)
        } else {
            self.gpio_set_high(pin)
        }
    }

    /// Reads the state of a pin. Returns `true` if the pin is high.
    ///
    /// For pins configured as outputs this is answered from the shadow
    /// cache without touching the hardware (the firmware cannot report
    /// output levels). Any other pin is treated as an input and resolved
    /// by a short blocking poll, returning the live level.
    pub fn gpio_get(&mut self, pin: Pin) -> Result<bool> {
        self.handle()?;
        if self.shadow.outputs.contains(pin) {
            return Ok(self.shadow.high.contains(pin));
        }
        Ok(self.gpio_poll(GPIO_GET_POLL_TIMEOUT_MS)?.contains(pin))
    }

    /// Blocks until a GPIO input changes or `timeout_ms` elapses.
    ///
    /// In either case the set of input pins that are currently high is
    /// returned.
    pub fn gpio_poll(&mut self, timeout_ms: i32) -> Result<PinSet> {
        let handle = self.handle()?;
        let bitmask = check_status(self.transport.gpio_change(handle, timeout_ms))?;
        Ok(PinSet::from_mask(bitmask as u8))
    }
}
