//! Control del FIFO hardware
//!
//! Sólo se gestiona la captura (activar, desactivar, vaciar) y el contador
//! de bytes; la lectura del contenido queda fuera de este controlador.

use embedded_hal::delay::DelayNs;

use crate::device::{DeviceState, Invensense, InvensenseError, LOG_TARGET};
use crate::interface::Interface;
use crate::register::{bits, registers};
use crate::types::FifoSetting;

/// Tamaño del FIFO hardware en bytes
pub const HARDWARE_FIFO_SIZE: u16 = 1024;

impl<I, D, E> Invensense<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
{
    /// Activa la captura en el FIFO para las fuentes indicadas
    pub fn enable_fifo(&mut self, setting: FifoSetting) -> Result<(), InvensenseError<E>> {
        self.require(&[DeviceState::Ready])?;
        self.modify_reg(registers::USER_CTRL, |v| v | bits::FIFO_EN)?;
        self.write_reg(registers::FIFO_EN, setting.register_value())?;
        log::debug!(target: LOG_TARGET, "fifo enabled ({:?})", setting);
        Ok(())
    }

    /// Desactiva la captura limpiando USER_CTRL
    pub fn disable_fifo(&mut self) -> Result<(), InvensenseError<E>> {
        self.require(&[DeviceState::Ready])?;
        self.write_reg(registers::USER_CTRL, 0x00)?;
        log::debug!(target: LOG_TARGET, "fifo disabled");
        Ok(())
    }

    /// Vacía el FIFO; el bit se limpia solo en el hardware
    pub fn reset_fifo(&mut self) -> Result<(), InvensenseError<E>> {
        self.require(&[DeviceState::Ready])?;
        self.modify_reg(registers::USER_CTRL, |v| v | bits::FIFO_RESET)?;
        Ok(())
    }

    /// Número de bytes acumulados en el FIFO (MSB primero)
    pub fn fifo_byte_count(&mut self) -> Result<u16, InvensenseError<E>> {
        self.require(&[DeviceState::Ready])?;
        let mut data = [0u8; 2];
        self.read_regs(registers::FIFO_COUNTH, &mut data)?;
        Ok(u16::from_be_bytes(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::tests::{device, ready_device};
    use crate::mock::BusTransaction;
    use crate::types::ImuType;

    #[test]
    fn test_enable_fifo_sets_user_ctrl_then_sources() {
        let settings = [
            (FifoSetting::Accel, 0x08),
            (FifoSetting::Gyro, 0x70),
            (FifoSetting::AccelGyro, 0x78),
        ];
        for (setting, expected) in settings {
            let mut dev = ready_device(ImuType::Icm20602);
            dev.interface.set_regs(registers::USER_CTRL, &[bits::I2C_IF_DIS]);

            dev.enable_fifo(setting).unwrap();

            assert_eq!(
                dev.interface.transactions(),
                vec![
                    BusTransaction::Read {
                        reg: registers::USER_CTRL,
                        len: 1
                    },
                    BusTransaction::Write {
                        reg: registers::USER_CTRL,
                        data: vec![bits::I2C_IF_DIS | bits::FIFO_EN],
                    },
                    BusTransaction::Write {
                        reg: registers::FIFO_EN,
                        data: vec![expected],
                    },
                ]
            );
        }
    }

    #[test]
    fn test_disable_fifo_clears_user_ctrl() {
        let mut dev = ready_device(ImuType::Icm20602);
        dev.enable_fifo(FifoSetting::AccelGyro).unwrap();
        dev.disable_fifo().unwrap();
        assert_eq!(dev.interface.reg(registers::USER_CTRL), 0x00);
    }

    #[test]
    fn test_reset_fifo_keeps_enable_bit() {
        let mut dev = ready_device(ImuType::Icm20602);
        dev.enable_fifo(FifoSetting::Gyro).unwrap();
        dev.reset_fifo().unwrap();
        assert_eq!(
            dev.interface.reg(registers::USER_CTRL),
            bits::FIFO_EN | bits::FIFO_RESET
        );
    }

    #[test]
    fn test_fifo_byte_count_is_big_endian() {
        let mut dev = ready_device(ImuType::Icm20602);
        dev.interface.set_regs(registers::FIFO_COUNTH, &[0x03, 0xF0]);
        assert_eq!(dev.fifo_byte_count().unwrap(), 1008);
        assert!(dev.fifo_byte_count().unwrap() <= HARDWARE_FIFO_SIZE);
        assert_eq!(
            dev.interface.transactions().last(),
            Some(&BusTransaction::Read {
                reg: registers::FIFO_COUNTH,
                len: 2
            })
        );
    }

    #[test]
    fn test_fifo_requires_ready() {
        let mut dev = device(ImuType::Icm20602);
        assert_eq!(
            dev.fifo_byte_count(),
            Err(InvensenseError::InvalidState(DeviceState::Uninitialized))
        );
        assert_eq!(
            dev.enable_fifo(FifoSetting::Accel),
            Err(InvensenseError::InvalidState(DeviceState::Uninitialized))
        );
        assert!(dev.interface.transactions().is_empty());
    }

    #[test]
    fn test_fifo_setting_from_raw_value() {
        fn setting(v: u8) -> Result<FifoSetting, InvensenseError<crate::mock::MockBusError>> {
            Ok(FifoSetting::try_from(v)?)
        }
        assert_eq!(setting(2), Ok(FifoSetting::AccelGyro));
        assert_eq!(setting(9), Err(InvensenseError::InvalidParameter));
    }
}
