//! Biblioteca Rust para los sensores de movimiento InvenSense MPU/ICM por SPI
//!
//! Esta biblioteca proporciona una interfaz a nivel de registros para las
//! IMU MPU6000, MPU6500, MPU9250, MPU9255, ICM20608 e ICM20602:
//! identificación, reset, configuración de escalas, lectura de muestras y
//! control del FIFO.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

// Importaciones internas
pub mod config;
pub mod conversion;
pub mod device;
pub mod fifo;
pub mod interface;
pub mod register;
pub mod types;

#[cfg(test)]
mod mock;

// Re-exports públicos
pub use config::{InvensenseConfig, WhoAmIPolicy};
pub use conversion::{accel_raw_to_g, gyro_raw_to_dps, temp_raw_to_celsius};
pub use device::{DeviceState, Invensense, InvensenseError};
pub use interface::{BusDevice, Interface, SpiConfig, SpiInterface};
pub use types::{AccelData, AccelFullScale, FifoSetting, GyroData, GyroFullScale, ImuType};

/// Crea un nuevo dispositivo usando un bus SPI y un pin CS de embedded-hal
pub fn new_spi_device<SPI, CS, D, E>(
    spi: SPI,
    cs: CS,
    delay: D,
    config: InvensenseConfig,
) -> Invensense<SpiInterface<SPI, CS>, D>
where
    SPI: SpiBus<u8, Error = E>,
    CS: OutputPin,
    D: DelayNs,
{
    let interface = SpiInterface::new(spi, cs, &config.spi);
    Invensense::new(interface, delay, config)
}

/// Crea un nuevo dispositivo sobre `/dev/spidevX.Y`
#[cfg(feature = "linux")]
pub fn new_linux_device<D: DelayNs>(
    delay: D,
    config: InvensenseConfig,
) -> Result<Invensense<interface::linux::SpidevInterface, D>, interface::linux::LinuxSpiError> {
    let interface = interface::linux::SpidevInterface::open(&config.spi)?;
    Ok(Invensense::new(interface, delay, config))
}
