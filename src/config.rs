//! Parámetros de construcción y políticas del controlador

use crate::interface::SpiConfig;
use crate::types::{AccelFullScale, GyroFullScale, ImuType};

/// Espera por defecto tras el reset por software (ms)
pub const DEFAULT_RESET_DELAY_MS: u32 = 100;

/// Qué hacer cuando WHO_AM_I no coincide con la variante pedida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhoAmIPolicy {
    /// Abortar la inicialización con `WhoAmIMismatch`
    #[default]
    FailClosed,
    /// Registrar el aviso y continuar con un dispositivo sin verificar
    ProceedUnverified,
}

/// Configuración completa de una instancia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvensenseConfig {
    pub spi: SpiConfig,
    pub imu_type: ImuType,
    pub accel_scale: AccelFullScale,
    pub gyro_scale: GyroFullScale,
    pub whoami_policy: WhoAmIPolicy,
    pub reset_delay_ms: u32,
    pub sample_rate_divider: u8,
}

impl Default for InvensenseConfig {
    fn default() -> Self {
        Self {
            spi: SpiConfig::default(),
            imu_type: ImuType::Icm20602,
            accel_scale: AccelFullScale::Fs2G,
            gyro_scale: GyroFullScale::Fs250Dps,
            whoami_policy: WhoAmIPolicy::FailClosed,
            reset_delay_ms: DEFAULT_RESET_DELAY_MS,
            sample_rate_divider: 0,
        }
    }
}

impl InvensenseConfig {
    pub fn new(imu_type: ImuType) -> Self {
        Self {
            imu_type,
            ..Self::default()
        }
    }

    pub fn with_spi(mut self, spi: SpiConfig) -> Self {
        self.spi = spi;
        self
    }

    pub fn with_accel_scale(mut self, scale: AccelFullScale) -> Self {
        self.accel_scale = scale;
        self
    }

    pub fn with_gyro_scale(mut self, scale: GyroFullScale) -> Self {
        self.gyro_scale = scale;
        self
    }

    pub fn with_whoami_policy(mut self, policy: WhoAmIPolicy) -> Self {
        self.whoami_policy = policy;
        self
    }

    pub fn with_reset_delay_ms(mut self, ms: u32) -> Self {
        self.reset_delay_ms = ms;
        self
    }

    pub fn with_sample_rate_divider(mut self, div: u8) -> Self {
        self.sample_rate_divider = div;
        self
    }
}
