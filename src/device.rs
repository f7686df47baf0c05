use embedded_hal::delay::DelayNs;

use crate::config::{InvensenseConfig, WhoAmIPolicy};
use crate::conversion::{
    accel_raw_to_g, combine_axes, combine_temperature, gyro_raw_to_dps, temp_raw_to_celsius,
};
use crate::interface::Interface;
use crate::register::{bits, registers};
use crate::types::{
    AccelData, AccelFullScale, DlpfSetting, GyroData, GyroFullScale, ImuType, InvalidValue,
    PowerMode, UnsupportedDevice,
};

/// Etiqueta de los mensajes de diagnóstico
pub(crate) const LOG_TARGET: &str = "invensense";

/// Estados de una instancia, estrictamente secuenciales
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Uninitialized,
    BusConfigured,
    Identified,
    Reset,
    Configured,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvensenseError<E> {
    #[error("error de bus: {0:?}")]
    Interface(E),
    #[error("WHO_AM_I 0x{found:02X} no coincide con 0x{expected:02X}")]
    WhoAmIMismatch { expected: u8, found: u8 },
    #[error("tipo de IMU no soportado: {0}")]
    UnsupportedDevice(u8),
    #[error("parámetro inválido")]
    InvalidParameter,
    #[error("operación no válida en el estado {0:?}")]
    InvalidState(DeviceState),
}

impl<E> From<InvalidValue> for InvensenseError<E> {
    fn from(_: InvalidValue) -> Self {
        InvensenseError::InvalidParameter
    }
}

impl<E> From<UnsupportedDevice> for InvensenseError<E> {
    fn from(err: UnsupportedDevice) -> Self {
        InvensenseError::UnsupportedDevice(err.0)
    }
}

/// Instancia de un sensor Invensense sobre un bus exclusivo
pub struct Invensense<I, D> {
    pub(crate) interface: I,
    pub(crate) delay: D,
    pub(crate) config: InvensenseConfig,
    pub(crate) state: DeviceState,
    pub(crate) verified: bool,
    /// Escalas escritas con éxito en el hardware
    pub(crate) accel_scale: Option<AccelFullScale>,
    pub(crate) gyro_scale: Option<GyroFullScale>,
}

const CONFIGURABLE: [DeviceState; 3] = [
    DeviceState::Reset,
    DeviceState::Configured,
    DeviceState::Ready,
];

impl<I, D, E> Invensense<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
{
    /// Crea una instancia sin tocar el bus
    pub fn new(interface: I, delay: D, config: InvensenseConfig) -> Self {
        Self {
            interface,
            delay,
            config,
            state: DeviceState::Uninitialized,
            verified: false,
            accel_scale: None,
            gyro_scale: None,
        }
    }

    /// Consume la instancia y devuelve el bus y el proveedor de esperas
    pub fn release(self) -> (I, D) {
        (self.interface, self.delay)
    }

    pub fn imu_type(&self) -> ImuType {
        self.config.imu_type
    }

    pub fn config(&self) -> &InvensenseConfig {
        &self.config
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Indica si WHO_AM_I coincidió con la variante configurada
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Escala del giroscopio activa, si ya se ha escrito
    pub fn gyro_scale(&self) -> Option<GyroFullScale> {
        self.gyro_scale
    }

    /// Escala del acelerómetro activa, si ya se ha escrito
    pub fn accel_scale(&self) -> Option<AccelFullScale> {
        self.accel_scale
    }

    pub(crate) fn require(&self, allowed: &[DeviceState]) -> Result<(), InvensenseError<E>> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            log::debug!(target: LOG_TARGET, "operation not allowed in state {:?}", self.state);
            Err(InvensenseError::InvalidState(self.state))
        }
    }

    /// Lee `data.len()` registros consecutivos a partir de `reg`
    pub fn read_regs(&mut self, reg: u8, data: &mut [u8]) -> Result<(), InvensenseError<E>> {
        if data.is_empty() {
            return Err(InvensenseError::InvalidParameter);
        }
        self.interface
            .read_reg(reg, data)
            .map_err(InvensenseError::Interface)
    }

    pub fn read_reg(&mut self, reg: u8) -> Result<u8, InvensenseError<E>> {
        let mut data = [0u8];
        self.read_regs(reg, &mut data)?;
        Ok(data[0])
    }

    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), InvensenseError<E>> {
        self.interface
            .write_reg(reg, &[value])
            .map_err(InvensenseError::Interface)
    }

    /// Lee, modifica y vuelve a escribir un registro (dos transacciones)
    pub fn modify_reg<F>(&mut self, reg: u8, f: F) -> Result<u8, InvensenseError<E>>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = f(self.read_reg(reg)?);
        self.write_reg(reg, value)?;
        Ok(value)
    }

    /// Devuelve el bus a la frecuencia inicial de la configuración
    pub fn configure_bus(&mut self) -> Result<(), InvensenseError<E>> {
        self.interface
            .set_max_speed_hz(self.config.spi.initial_speed_hz)
            .map_err(InvensenseError::Interface)?;
        self.state = DeviceState::BusConfigured;
        Ok(())
    }

    /// Comprueba WHO_AM_I contra la variante configurada
    ///
    /// Si coincide, sube el reloj del bus al máximo del chip. Si no, el
    /// resultado depende de la `WhoAmIPolicy`: con `FailClosed` devuelve
    /// `WhoAmIMismatch`; con `ProceedUnverified` continúa sin tocar el reloj.
    pub fn identify(&mut self) -> Result<u8, InvensenseError<E>> {
        self.require(&[DeviceState::BusConfigured])?;

        let imu_type = self.config.imu_type;
        let expected = imu_type.whoami();
        let found = self.read_reg(registers::WHO_AM_I)?;
        log::debug!(target: LOG_TARGET, "whoami=0x{:02X}", found);

        if found == expected {
            let hz = imu_type.max_speed_hz();
            self.interface
                .set_max_speed_hz(hz)
                .map_err(InvensenseError::Interface)?;
            log::debug!(target: LOG_TARGET, "{} identified, bus at {} Hz", imu_type.name(), hz);
            self.verified = true;
        } else {
            log::warn!(
                target: LOG_TARGET,
                "{} whoami mismatch: expected 0x{:02X}, got 0x{:02X}",
                imu_type.name(),
                expected,
                found
            );
            self.verified = false;
            if self.config.whoami_policy == WhoAmIPolicy::FailClosed {
                return Err(InvensenseError::WhoAmIMismatch { expected, found });
            }
        }

        self.state = DeviceState::Identified;
        Ok(found)
    }

    /// Reset por software: activa DEVICE_RESET conservando el resto de bits
    pub fn reset(&mut self) -> Result<(), InvensenseError<E>> {
        self.require(&[DeviceState::Identified])?;

        let value = self.modify_reg(registers::PWR_MGMT_1, |v| v | bits::DEVICE_RESET)?;
        log::debug!(target: LOG_TARGET, "soft reset (pwr_mgmt_1=0x{:02X})", value);

        // El reset deja los registros en sus valores por defecto
        self.accel_scale = None;
        self.gyro_scale = None;
        self.delay.delay_ms(self.config.reset_delay_ms);

        self.state = DeviceState::Reset;
        Ok(())
    }

    pub fn configure_power(&mut self, mode: PowerMode) -> Result<(), InvensenseError<E>> {
        self.require(&CONFIGURABLE)?;
        self.write_reg(registers::PWR_MGMT_1, mode.register_value())
    }

    /// Con el FIFO lleno se sobrescriben las muestras más antiguas
    pub fn configure_fifo_overwrite_policy(&mut self) -> Result<(), InvensenseError<E>> {
        self.require(&CONFIGURABLE)?;
        self.modify_reg(registers::CONFIG, |v| v & !bits::FIFO_MODE)?;
        Ok(())
    }

    /// Escribe la escala del giroscopio con una única escritura
    pub fn set_gyro_scale(&mut self, scale: GyroFullScale) -> Result<(), InvensenseError<E>> {
        self.require(&CONFIGURABLE)?;
        self.write_reg(registers::GYRO_CONFIG, scale.register_value())?;
        self.gyro_scale = Some(scale);
        log::trace!(target: LOG_TARGET, "gyro scale {:?}", scale);
        Ok(())
    }

    /// Escribe la escala del acelerómetro con una única escritura
    pub fn set_accel_scale(&mut self, scale: AccelFullScale) -> Result<(), InvensenseError<E>> {
        self.require(&CONFIGURABLE)?;
        self.write_reg(registers::ACCEL_CONFIG, scale.register_value())?;
        self.accel_scale = Some(scale);
        log::trace!(target: LOG_TARGET, "accel scale {:?}", scale);
        Ok(())
    }

    /// Divisor de la tasa de muestreo: ODR = base / (1 + div)
    pub fn set_sample_rate_divider(&mut self, div: u8) -> Result<(), InvensenseError<E>> {
        self.require(&CONFIGURABLE)?;
        self.write_reg(registers::SMPLRT_DIV, div)
    }

    pub fn set_dlpf(&mut self, setting: DlpfSetting) -> Result<(), InvensenseError<E>> {
        self.require(&CONFIGURABLE)?;
        self.modify_reg(registers::CONFIG, |v| {
            (v & !bits::DLPF_CFG_MASK) | setting.register_value()
        })?;
        Ok(())
    }

    /// Lee la escala del giroscopio directamente del hardware
    pub fn read_gyro_scale(&mut self) -> Result<GyroFullScale, InvensenseError<E>> {
        let value = self.read_reg(registers::GYRO_CONFIG)?;
        Ok(GyroFullScale::from_register(value))
    }

    /// Lee la escala del acelerómetro directamente del hardware
    pub fn read_accel_scale(&mut self) -> Result<AccelFullScale, InvensenseError<E>> {
        let value = self.read_reg(registers::ACCEL_CONFIG)?;
        Ok(AccelFullScale::from_register(value))
    }

    /// Secuencia completa de arranque
    ///
    /// Puede llamarse de nuevo desde cualquier estado para forzar una
    /// reinicialización. Devuelve el valor leído de WHO_AM_I.
    pub fn initialize(&mut self) -> Result<u8, InvensenseError<E>> {
        if self.state != DeviceState::Uninitialized {
            log::debug!(target: LOG_TARGET, "re-initializing from {:?}", self.state);
        }
        self.state = DeviceState::Uninitialized;
        self.verified = false;
        self.accel_scale = None;
        self.gyro_scale = None;

        self.configure_bus()?;
        let whoami = self.identify()?;
        self.reset()?;

        self.configure_power(PowerMode::AllEnabled)?;
        self.configure_fifo_overwrite_policy()?;
        self.set_gyro_scale(self.config.gyro_scale)?;
        self.set_accel_scale(self.config.accel_scale)?;
        self.state = DeviceState::Configured;

        self.set_sample_rate_divider(self.config.sample_rate_divider)?;
        self.state = DeviceState::Ready;

        log::info!(
            target: LOG_TARGET,
            "{} ready (verified={}, accel={:?}, gyro={:?})",
            self.config.imu_type.name(),
            self.verified,
            self.config.accel_scale,
            self.config.gyro_scale
        );
        Ok(whoami)
    }

    pub fn read_accel_raw(&mut self) -> Result<[i16; 3], InvensenseError<E>> {
        self.require(&[DeviceState::Ready])?;
        let mut data = [0u8; 6];
        self.read_regs(registers::ACCEL_XOUT_H, &mut data)?;
        Ok(combine_axes(&data))
    }

    pub fn read_gyro_raw(&mut self) -> Result<[i16; 3], InvensenseError<E>> {
        self.require(&[DeviceState::Ready])?;
        let mut data = [0u8; 6];
        self.read_regs(registers::GYRO_XOUT_H, &mut data)?;
        Ok(combine_axes(&data))
    }

    pub fn read_temperature_raw(&mut self) -> Result<i16, InvensenseError<E>> {
        self.require(&[DeviceState::Ready])?;
        let mut data = [0u8; 2];
        self.read_regs(registers::TEMP_OUT_H, &mut data)?;
        Ok(combine_temperature(&data))
    }

    /// Lee el acelerómetro y lo convierte a g con la escala activa
    pub fn read_accel(&mut self) -> Result<AccelData, InvensenseError<E>> {
        let raw = self.read_accel_raw()?;
        let scale = self
            .accel_scale
            .ok_or(InvensenseError::InvalidState(self.state))?;
        Ok(accel_raw_to_g(raw, scale))
    }

    /// Lee el giroscopio y lo convierte a grados/segundo con la escala activa
    pub fn read_gyro(&mut self) -> Result<GyroData, InvensenseError<E>> {
        let raw = self.read_gyro_raw()?;
        let scale = self
            .gyro_scale
            .ok_or(InvensenseError::InvalidState(self.state))?;
        Ok(gyro_raw_to_dps(raw, scale))
    }

    /// Lee la temperatura en grados Celsius
    pub fn read_temperature(&mut self) -> Result<f32, InvensenseError<E>> {
        let raw = self.read_temperature_raw()?;
        Ok(temp_raw_to_celsius(raw))
    }
}
