//! Transporte spidev para Linux
//!
//! spidev gestiona el CS por su cuenta en cada transferencia, así que los
//! bytes enviados dentro de una transacción se acumulan y se envían junto
//! con la lectura (o al cerrar) en una única transferencia del kernel.

use std::vec::Vec;

use embedded_hal::spi::{Operation, SpiDevice};
use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};
use linux_embedded_hal::{SPIError, SpidevDevice};

use super::{BusDevice, SpiConfig, SpiMode};

/// Errores del transporte spidev
#[derive(Debug, thiserror::Error)]
pub enum LinuxSpiError {
    #[error("error de transferencia spidev: {0:?}")]
    Spi(SPIError),
    #[error("error de configuración spidev: {0}")]
    Io(#[from] std::io::Error),
    #[error("operación fuera de una transacción")]
    NoTransaction,
}

/// Implementación de `BusDevice` sobre `/dev/spidevX.Y`
pub struct SpidevInterface {
    spi: SpidevDevice,
    config: SpiConfig,
    max_speed_hz: u32,
    pending: Vec<u8>,
    in_transaction: bool,
}

impl SpidevInterface {
    /// Abre el nodo spidev descrito por `config` y lo configura
    pub fn open(config: &SpiConfig) -> Result<Self, LinuxSpiError> {
        let spi = SpidevDevice(Spidev::open(config.spidev_path())?);
        let mut iface = Self {
            spi,
            config: *config,
            max_speed_hz: config.initial_speed_hz,
            pending: Vec::with_capacity(16),
            in_transaction: false,
        };
        iface.apply_options(config.initial_speed_hz)?;
        Ok(iface)
    }

    fn apply_options(&mut self, hz: u32) -> Result<(), LinuxSpiError> {
        let mode = match self.config.mode {
            SpiMode::Mode0 => SpiModeFlags::SPI_MODE_0,
            SpiMode::Mode1 => SpiModeFlags::SPI_MODE_1,
            SpiMode::Mode2 => SpiModeFlags::SPI_MODE_2,
            SpiMode::Mode3 => SpiModeFlags::SPI_MODE_3,
        };
        let options = SpidevOptions::new()
            .bits_per_word(self.config.word_size)
            .max_speed_hz(hz)
            .mode(mode)
            .build();
        self.spi.0.configure(&options)?;
        self.max_speed_hz = hz;
        Ok(())
    }
}

impl BusDevice for SpidevInterface {
    type Error = LinuxSpiError;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.pending.clear();
        self.in_transaction = true;
        Ok(())
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        if !self.in_transaction {
            return Err(LinuxSpiError::NoTransaction);
        }
        self.in_transaction = false;
        if self.pending.is_empty() {
            return Ok(());
        }
        let result = self.spi.write(&self.pending).map_err(LinuxSpiError::Spi);
        self.pending.clear();
        result
    }

    fn send(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if !self.in_transaction {
            return Err(LinuxSpiError::NoTransaction);
        }
        self.pending.extend_from_slice(data);
        Ok(())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        if !self.in_transaction {
            return Err(LinuxSpiError::NoTransaction);
        }
        let result = self
            .spi
            .transaction(&mut [Operation::Write(&self.pending), Operation::Read(buffer)])
            .map_err(LinuxSpiError::Spi);
        self.pending.clear();
        result
    }

    fn set_max_speed_hz(&mut self, hz: u32) -> Result<(), Self::Error> {
        self.apply_options(hz)
    }

    fn max_speed_hz(&self) -> u32 {
        self.max_speed_hz
    }
}
