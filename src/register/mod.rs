//! Definiciones de registros para la familia MPU/ICM de Invensense
//!
//! Todas las variantes soportadas comparten el mismo mapa de registros en
//! un único banco, así que las direcciones son absolutas.

/// Direcciones de registros
pub mod registers {
    // Registros de configuración
    pub const SMPLRT_DIV: u8 = 0x19;
    pub const CONFIG: u8 = 0x1A;
    pub const GYRO_CONFIG: u8 = 0x1B;
    pub const ACCEL_CONFIG: u8 = 0x1C;

    // Registros de FIFO
    pub const FIFO_EN: u8 = 0x23;
    pub const FIFO_COUNTH: u8 = 0x72;
    pub const FIFO_COUNTL: u8 = 0x73;
    pub const FIFO_R_W: u8 = 0x74;

    // Registros de acelerómetro
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const ACCEL_XOUT_L: u8 = 0x3C;
    pub const ACCEL_YOUT_H: u8 = 0x3D;
    pub const ACCEL_YOUT_L: u8 = 0x3E;
    pub const ACCEL_ZOUT_H: u8 = 0x3F;
    pub const ACCEL_ZOUT_L: u8 = 0x40;

    // Registros de temperatura
    pub const TEMP_OUT_H: u8 = 0x41;
    pub const TEMP_OUT_L: u8 = 0x42;

    // Registros de giroscopio
    pub const GYRO_XOUT_H: u8 = 0x43;
    pub const GYRO_XOUT_L: u8 = 0x44;
    pub const GYRO_YOUT_H: u8 = 0x45;
    pub const GYRO_YOUT_L: u8 = 0x46;
    pub const GYRO_ZOUT_H: u8 = 0x47;
    pub const GYRO_ZOUT_L: u8 = 0x48;

    // Registros de control y estado
    pub const USER_CTRL: u8 = 0x6A;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const PWR_MGMT_2: u8 = 0x6C;

    // Registro de identificación
    pub const WHO_AM_I: u8 = 0x75;
}

/// Bits útiles para configuración y control
pub mod bits {
    // PWR_MGMT_1
    pub const DEVICE_RESET: u8 = 0x80;
    pub const SLEEP: u8 = 0x40;
    pub const CLKSEL_MASK: u8 = 0x07;
    pub const CLKSEL_AUTO: u8 = 0x01;

    // CONFIG
    pub const FIFO_MODE: u8 = 0x40; // 1 = no sobrescribir con el FIFO lleno
    pub const DLPF_CFG_MASK: u8 = 0x07;

    // GYRO_CONFIG / ACCEL_CONFIG, bits [4:3]
    pub const FS_SEL_MASK: u8 = 0x18;
    pub const FS_SEL_SHIFT: u8 = 3;

    // USER_CTRL
    pub const FIFO_EN: u8 = 0x40;
    pub const I2C_IF_DIS: u8 = 0x10;
    pub const FIFO_RESET: u8 = 0x04;

    // FIFO_EN
    pub const TEMP_FIFO_EN: u8 = 0x80;
    pub const XG_FIFO_EN: u8 = 0x40;
    pub const YG_FIFO_EN: u8 = 0x20;
    pub const ZG_FIFO_EN: u8 = 0x10;
    pub const ACCEL_FIFO_EN: u8 = 0x08;
    pub const GYRO_FIFO_EN: u8 = XG_FIFO_EN | YG_FIFO_EN | ZG_FIFO_EN;
}

/// Valores de WHO_AM_I de cada variante
pub mod whoami {
    pub const MPU6000: u8 = 0x68;
    pub const MPU6500: u8 = 0x70;
    pub const MPU9250: u8 = 0x71;
    pub const MPU9255: u8 = 0x73;
    pub const ICM20608: u8 = 0xAF;
    pub const ICM20602: u8 = 0x12;
}
