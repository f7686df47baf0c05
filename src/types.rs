//! Definiciones de tipos comunes para los sensores Invensense

use core::str::FromStr;

use crate::device::LOG_TARGET;
use crate::register::{bits, whoami};

/// Valor rechazado al convertir un entero en un enumerado de configuración
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("valor fuera de rango: {0}")]
pub struct InvalidValue(pub u8);

/// Tipo de dispositivo no soportado
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tipo de IMU no soportado: {0}")]
pub struct UnsupportedDevice(pub u8);

/// Nombre de IMU no reconocido
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("nombre de IMU no reconocido")]
pub struct UnknownImuName;

/// Variantes de chip soportadas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ImuType {
    Mpu6000 = 0,
    Mpu6500 = 1,
    Mpu9250 = 2,
    Mpu9255 = 3,
    Icm20608 = 4,
    Icm20602 = 5,
}

impl ImuType {
    /// Valor esperado en el registro WHO_AM_I
    pub fn whoami(&self) -> u8 {
        match self {
            ImuType::Mpu6000 => whoami::MPU6000,
            ImuType::Mpu6500 => whoami::MPU6500,
            ImuType::Mpu9250 => whoami::MPU9250,
            ImuType::Mpu9255 => whoami::MPU9255,
            ImuType::Icm20608 => whoami::ICM20608,
            ImuType::Icm20602 => whoami::ICM20602,
        }
    }

    /// Frecuencia SPI máxima válida para todos los registros del chip
    pub fn max_speed_hz(&self) -> u32 {
        match self {
            ImuType::Icm20608 | ImuType::Icm20602 => 10_000_000,
            ImuType::Mpu6000 | ImuType::Mpu6500 | ImuType::Mpu9250 | ImuType::Mpu9255 => {
                1_000_000
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImuType::Mpu6000 => "MPU6000",
            ImuType::Mpu6500 => "MPU6500",
            ImuType::Mpu9250 => "MPU9250",
            ImuType::Mpu9255 => "MPU9255",
            ImuType::Icm20608 => "ICM20608",
            ImuType::Icm20602 => "ICM20602",
        }
    }
}

impl TryFrom<u8> for ImuType {
    type Error = UnsupportedDevice;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ImuType::Mpu6000),
            1 => Ok(ImuType::Mpu6500),
            2 => Ok(ImuType::Mpu9250),
            3 => Ok(ImuType::Mpu9255),
            4 => Ok(ImuType::Icm20608),
            5 => Ok(ImuType::Icm20602),
            other => {
                log::error!(target: LOG_TARGET, "invalid imu type {}", other);
                Err(UnsupportedDevice(other))
            }
        }
    }
}

impl FromStr for ImuType {
    type Err = UnknownImuName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let imu = [
            ImuType::Mpu6000,
            ImuType::Mpu6500,
            ImuType::Mpu9250,
            ImuType::Mpu9255,
            ImuType::Icm20608,
            ImuType::Icm20602,
        ]
        .into_iter()
        .find(|imu| imu.name().eq_ignore_ascii_case(s));

        imu.ok_or_else(|| {
            log::error!(target: LOG_TARGET, "invalid imu type {:?}", s);
            UnknownImuName
        })
    }
}

/// Escalas completas disponibles para el giroscopio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum GyroFullScale {
    /// ±250 dps
    #[default]
    Fs250Dps = 0,
    /// ±500 dps
    Fs500Dps = 1,
    /// ±1000 dps
    Fs1000Dps = 2,
    /// ±2000 dps
    Fs2000Dps = 3,
}

impl GyroFullScale {
    /// Valor codificado para GYRO_CONFIG
    pub fn register_value(&self) -> u8 {
        match self {
            GyroFullScale::Fs250Dps => 0x00,
            GyroFullScale::Fs500Dps => 0x08,
            GyroFullScale::Fs1000Dps => 0x10,
            GyroFullScale::Fs2000Dps => 0x18,
        }
    }

    /// Rango en grados/segundo
    pub fn range(&self) -> f32 {
        match self {
            GyroFullScale::Fs250Dps => 250.0,
            GyroFullScale::Fs500Dps => 500.0,
            GyroFullScale::Fs1000Dps => 1000.0,
            GyroFullScale::Fs2000Dps => 2000.0,
        }
    }

    /// Decodifica los bits FS_SEL de un valor de GYRO_CONFIG
    pub fn from_register(value: u8) -> Self {
        match (value & bits::FS_SEL_MASK) >> bits::FS_SEL_SHIFT {
            0 => GyroFullScale::Fs250Dps,
            1 => GyroFullScale::Fs500Dps,
            2 => GyroFullScale::Fs1000Dps,
            _ => GyroFullScale::Fs2000Dps,
        }
    }
}

impl TryFrom<u8> for GyroFullScale {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GyroFullScale::Fs250Dps),
            1 => Ok(GyroFullScale::Fs500Dps),
            2 => Ok(GyroFullScale::Fs1000Dps),
            3 => Ok(GyroFullScale::Fs2000Dps),
            other => Err(InvalidValue(other)),
        }
    }
}

/// Escalas completas disponibles para el acelerómetro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AccelFullScale {
    /// ±2g
    #[default]
    Fs2G = 0,
    /// ±4g
    Fs4G = 1,
    /// ±8g
    Fs8G = 2,
    /// ±16g
    Fs16G = 3,
}

impl AccelFullScale {
    /// Valor codificado para ACCEL_CONFIG
    pub fn register_value(&self) -> u8 {
        match self {
            AccelFullScale::Fs2G => 0x00,
            AccelFullScale::Fs4G => 0x08,
            AccelFullScale::Fs8G => 0x10,
            AccelFullScale::Fs16G => 0x18,
        }
    }

    /// Rango en g
    pub fn range(&self) -> f32 {
        match self {
            AccelFullScale::Fs2G => 2.0,
            AccelFullScale::Fs4G => 4.0,
            AccelFullScale::Fs8G => 8.0,
            AccelFullScale::Fs16G => 16.0,
        }
    }

    /// Decodifica los bits FS_SEL de un valor de ACCEL_CONFIG
    pub fn from_register(value: u8) -> Self {
        match (value & bits::FS_SEL_MASK) >> bits::FS_SEL_SHIFT {
            0 => AccelFullScale::Fs2G,
            1 => AccelFullScale::Fs4G,
            2 => AccelFullScale::Fs8G,
            _ => AccelFullScale::Fs16G,
        }
    }
}

impl TryFrom<u8> for AccelFullScale {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccelFullScale::Fs2G),
            1 => Ok(AccelFullScale::Fs4G),
            2 => Ok(AccelFullScale::Fs8G),
            3 => Ok(AccelFullScale::Fs16G),
            other => Err(InvalidValue(other)),
        }
    }
}

/// Fuentes que se vuelcan al FIFO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FifoSetting {
    Accel = 0,
    Gyro = 1,
    AccelGyro = 2,
}

impl FifoSetting {
    /// Bits de habilitación para el registro FIFO_EN
    pub fn register_value(&self) -> u8 {
        match self {
            FifoSetting::Accel => bits::ACCEL_FIFO_EN,
            FifoSetting::Gyro => bits::GYRO_FIFO_EN,
            FifoSetting::AccelGyro => bits::ACCEL_FIFO_EN | bits::GYRO_FIFO_EN,
        }
    }
}

impl TryFrom<u8> for FifoSetting {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FifoSetting::Accel),
            1 => Ok(FifoSetting::Gyro),
            2 => Ok(FifoSetting::AccelGyro),
            other => Err(InvalidValue(other)),
        }
    }
}

/// Modos de PWR_MGMT_1 expuestos por el controlador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerMode {
    /// Todo activo, oscilador interno
    #[default]
    AllEnabled,
    /// Todo activo, reloj PLL seleccionado automáticamente
    AllEnabledPll,
}

impl PowerMode {
    pub fn register_value(&self) -> u8 {
        match self {
            PowerMode::AllEnabled => 0x00,
            PowerMode::AllEnabledPll => bits::CLKSEL_AUTO,
        }
    }
}

/// Filtro paso bajo digital (campo DLPF_CFG de CONFIG)
///
/// Los anchos de banda nombrados son los del giroscopio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DlpfSetting {
    #[default]
    Bw250Hz = 0,
    Bw184Hz = 1,
    Bw92Hz = 2,
    Bw41Hz = 3,
    Bw20Hz = 4,
    Bw10Hz = 5,
    Bw5Hz = 6,
    Bw3600Hz = 7,
}

impl DlpfSetting {
    pub fn register_value(&self) -> u8 {
        *self as u8 & bits::DLPF_CFG_MASK
    }
}

/// Aceleración en unidades físicas (g)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccelData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Velocidad angular en unidades físicas (grados/segundo)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GyroData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{captured_logs, start_log_capture};

    #[test]
    fn test_scale_encoding_is_one_to_one() {
        let gyro = [
            GyroFullScale::Fs250Dps,
            GyroFullScale::Fs500Dps,
            GyroFullScale::Fs1000Dps,
            GyroFullScale::Fs2000Dps,
        ];
        for scale in gyro {
            assert_eq!(GyroFullScale::from_register(scale.register_value()), scale);
            assert_eq!(GyroFullScale::try_from(scale as u8), Ok(scale));
        }

        let accel = [
            AccelFullScale::Fs2G,
            AccelFullScale::Fs4G,
            AccelFullScale::Fs8G,
            AccelFullScale::Fs16G,
        ];
        for scale in accel {
            assert_eq!(AccelFullScale::from_register(scale.register_value()), scale);
            assert_eq!(AccelFullScale::try_from(scale as u8), Ok(scale));
        }
    }

    #[test]
    fn test_invalid_enumerators_are_rejected() {
        assert_eq!(GyroFullScale::try_from(4), Err(InvalidValue(4)));
        assert_eq!(AccelFullScale::try_from(7), Err(InvalidValue(7)));
        assert_eq!(FifoSetting::try_from(3), Err(InvalidValue(3)));
        assert_eq!(ImuType::try_from(6), Err(UnsupportedDevice(6)));
    }

    #[test]
    fn test_imu_type_lookup() {
        assert_eq!(ImuType::Icm20602.whoami(), 0x12);
        assert_eq!(ImuType::Icm20602.max_speed_hz(), 10_000_000);
        assert_eq!("icm20602".parse::<ImuType>(), Ok(ImuType::Icm20602));
        assert_eq!("MPU9250".parse::<ImuType>(), Ok(ImuType::Mpu9250));
        assert_eq!("bmi088".parse::<ImuType>(), Err(UnknownImuName));
    }

    #[test]
    fn test_unknown_imu_type_logs_error() {
        start_log_capture();
        assert_eq!(ImuType::try_from(9), Err(UnsupportedDevice(9)));
        assert_eq!("mpu9999".parse::<ImuType>(), Err(UnknownImuName));

        let errors = captured_logs(log::Level::Error);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|log| log.target == LOG_TARGET));

        start_log_capture();
        assert_eq!(ImuType::try_from(5), Ok(ImuType::Icm20602));
        assert!(captured_logs(log::Level::Error).is_empty());
    }

    #[test]
    fn test_fifo_bits() {
        assert_eq!(FifoSetting::Accel.register_value(), 0x08);
        assert_eq!(FifoSetting::Gyro.register_value(), 0x70);
        assert_eq!(FifoSetting::AccelGyro.register_value(), 0x78);
    }
}
