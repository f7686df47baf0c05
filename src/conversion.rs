//! Funciones de conversión para datos del sensor
//!
//! Este módulo convierte los datos raw de los registros de salida a
//! unidades físicas: aceleración en g, velocidad angular en grados por
//! segundo y temperatura en grados Celsius.

use crate::types::{AccelData, AccelFullScale, GyroData, GyroFullScale};

/// Mayor valor positivo de un registro de 16 bits con signo
pub const RAW_FULL_SCALE: f32 = 32767.0;

/// Sensibilidad del sensor de temperatura (LSB/°C)
pub const TEMP_SENSITIVITY: f32 = 326.8;

/// Temperatura correspondiente a un valor raw de 0
pub const TEMP_OFFSET_C: f32 = 25.0;

/// Combina pares alto/bajo de tres ejes (MSB primero)
pub fn combine_axes(data: &[u8; 6]) -> [i16; 3] {
    [
        i16::from_be_bytes([data[0], data[1]]),
        i16::from_be_bytes([data[2], data[3]]),
        i16::from_be_bytes([data[4], data[5]]),
    ]
}

/// Combina los dos bytes de temperatura tal como los entrega el bus
///
/// El primer byte recibido es el menos significativo.
pub fn combine_temperature(data: &[u8; 2]) -> i16 {
    ((data[1] as i16) << 8) | (data[0] as i16)
}

/// Convierte datos brutos de acelerómetro a g según la escala configurada
///
/// # Arguments
/// * `raw` - Valores brutos del acelerómetro [x, y, z]
/// * `scale` - Configuración de escala completa del acelerómetro
pub fn accel_raw_to_g(raw: [i16; 3], scale: AccelFullScale) -> AccelData {
    let range = scale.range();
    AccelData {
        x: range * raw[0] as f32 / RAW_FULL_SCALE,
        y: range * raw[1] as f32 / RAW_FULL_SCALE,
        z: range * raw[2] as f32 / RAW_FULL_SCALE,
    }
}

/// Convierte datos brutos de giroscopio a grados/segundo según la escala configurada
///
/// # Arguments
/// * `raw` - Valores brutos del giroscopio [x, y, z]
/// * `scale` - Configuración de escala completa del giroscopio
pub fn gyro_raw_to_dps(raw: [i16; 3], scale: GyroFullScale) -> GyroData {
    let range = scale.range();
    GyroData {
        x: range * raw[0] as f32 / RAW_FULL_SCALE,
        y: range * raw[1] as f32 / RAW_FULL_SCALE,
        z: range * raw[2] as f32 / RAW_FULL_SCALE,
    }
}

/// Convierte datos brutos de temperatura a grados Celsius
pub fn temp_raw_to_celsius(raw: i16) -> f32 {
    raw as f32 / TEMP_SENSITIVITY + TEMP_OFFSET_C
}
