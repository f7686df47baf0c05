//! Módulo de abstracción para el bus SPI de los sensores Invensense
//!
//! El controlador sólo necesita una capacidad de bus muy reducida:
//! abrir y cerrar una transacción, enviar y recibir bytes, y ajustar la
//! frecuencia máxima del reloj. Sobre ella se construye el protocolo de
//! registros (bit 7 de la dirección = lectura).

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

#[cfg(feature = "linux")]
pub mod linux;

/// Bit de lectura en el byte de dirección
pub const READ_FLAG: u8 = 0x80;

/// Error genérico para interfaces de comunicación
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceError<E> {
    /// Error de comunicación SPI
    SpiError(E),
    /// Error de pin CS para SPI
    PinError,
    /// Parámetro inválido
    InvalidParameter,
}

/// Modo SPI (polaridad y fase del reloj)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

/// Parámetros de construcción del dispositivo de bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// Índice del bus SPI
    pub bus_index: u8,
    /// Línea de chip-select
    pub select_line: u32,
    /// Frecuencia inicial en Hz
    pub initial_speed_hz: u32,
    /// Bits por palabra
    pub word_size: u8,
    /// Polaridad y fase
    pub mode: SpiMode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            bus_index: 0,
            select_line: 0,
            // Frecuencia baja hasta identificar el chip
            initial_speed_hz: 10_000,
            word_size: 8,
            mode: SpiMode::Mode3,
        }
    }
}

impl SpiConfig {
    pub fn new(bus_index: u8, select_line: u32) -> Self {
        Self {
            bus_index,
            select_line,
            ..Self::default()
        }
    }

    /// Ruta del nodo spidev correspondiente en Linux
    #[cfg(feature = "std")]
    pub fn spidev_path(&self) -> std::string::String {
        std::format!("/dev/spidev{}.{}", self.bus_index, self.select_line)
    }
}

/// Capacidad de bus que consume el controlador
///
/// Cada transacción se enmarca entre `begin` y `end`; el llamante no debe
/// intercalar transacciones.
pub trait BusDevice {
    /// Tipo de error del transporte
    type Error;

    /// Abre una transacción (activa CS)
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Cierra la transacción (desactiva CS)
    fn end(&mut self) -> Result<(), Self::Error>;

    /// Envía bytes dentro de la transacción abierta
    fn send(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Recibe `buffer.len()` bytes dentro de la transacción abierta
    fn receive(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Ajusta la frecuencia máxima del reloj
    fn set_max_speed_hz(&mut self, hz: u32) -> Result<(), Self::Error>;

    /// Frecuencia máxima configurada actualmente
    fn max_speed_hz(&self) -> u32;
}

/// Trait para abstraer el protocolo de registros del sensor
pub trait Interface {
    /// Tipo de error que puede producir la interfaz
    type Error;

    /// Escribe `data` a partir del registro `reg`
    fn write_reg(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Lee `data.len()` bytes a partir del registro `reg`
    fn read_reg(&mut self, reg: u8, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Cambia la frecuencia máxima del bus subyacente
    fn set_max_speed_hz(&mut self, hz: u32) -> Result<(), Self::Error>;

    /// Frecuencia máxima actual del bus subyacente
    fn max_speed_hz(&self) -> u32;
}

impl<B: BusDevice> Interface for B {
    type Error = B::Error;

    fn write_reg(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        // Para escritura el bit más significativo debe ser 0
        let addr = reg & !READ_FLAG;

        self.begin()?;
        let mut result = self.send(&[addr]);
        if result.is_ok() && !data.is_empty() {
            result = self.send(data);
        }
        let end = self.end();

        result.and(end)
    }

    fn read_reg(&mut self, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        // Para lectura el bit más significativo debe ser 1
        let addr = reg | READ_FLAG;

        self.begin()?;
        let result = self.send(&[addr]).and_then(|_| self.receive(data));
        let end = self.end();

        result.and(end)
    }

    fn set_max_speed_hz(&mut self, hz: u32) -> Result<(), Self::Error> {
        BusDevice::set_max_speed_hz(self, hz)
    }

    fn max_speed_hz(&self) -> u32 {
        BusDevice::max_speed_hz(self)
    }
}

/// Implementación de `BusDevice` sobre un `SpiBus` de embedded-hal y un pin CS
///
/// embedded-hal no expone el reloj del bus, así que la frecuencia pedida
/// sólo se registra; la placa debe aplicarla leyendo `max_speed_hz()`.
pub struct SpiInterface<SPI, CS> {
    spi: SPI,
    cs: CS,
    max_speed_hz: u32,
}

impl<SPI, CS, E> SpiInterface<SPI, CS>
where
    SPI: SpiBus<u8, Error = E>,
    CS: OutputPin,
{
    /// Crea una nueva interfaz SPI
    pub fn new(spi: SPI, cs: CS, config: &SpiConfig) -> Self {
        Self {
            spi,
            cs,
            max_speed_hz: config.initial_speed_hz,
        }
    }

    /// Consume la interfaz y devuelve el bus SPI y el pin CS
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS, E> BusDevice for SpiInterface<SPI, CS>
where
    SPI: SpiBus<u8, Error = E>,
    CS: OutputPin,
{
    type Error = InterfaceError<E>;

    fn begin(&mut self) -> Result<(), Self::Error> {
        // Activar CS (nivel bajo)
        self.cs.set_low().map_err(|_| InterfaceError::PinError)
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        let flushed = self.spi.flush().map_err(InterfaceError::SpiError);
        // Desactivar CS (nivel alto) aunque falle el flush
        let released = self.cs.set_high().map_err(|_| InterfaceError::PinError);
        flushed.and(released)
    }

    fn send(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(data).map_err(InterfaceError::SpiError)
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        if buffer.is_empty() {
            return Err(InterfaceError::InvalidParameter);
        }
        self.spi.read(buffer).map_err(InterfaceError::SpiError)
    }

    fn set_max_speed_hz(&mut self, hz: u32) -> Result<(), Self::Error> {
        if hz == 0 {
            return Err(InterfaceError::InvalidParameter);
        }
        self.max_speed_hz = hz;
        Ok(())
    }

    fn max_speed_hz(&self) -> u32 {
        self.max_speed_hz
    }
}
