//! Bus simulado para pruebas
//!
//! Mantiene un banco de 128 registros: las escrituras se guardan y las
//! lecturas devuelven lo guardado. Cada transacción queda registrada.

use std::cell::RefCell;
use std::string::{String, ToString};
use std::sync::Once;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::interface::{BusDevice, READ_FLAG};

/// Transacción observada en el bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusTransaction {
    Read { reg: u8, len: usize },
    Write { reg: u8, data: Vec<u8> },
}

/// Error inyectado por el bus simulado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

#[derive(Debug)]
pub struct MockBus {
    regs: [u8; 128],
    transactions: Vec<BusTransaction>,
    sent: Option<Vec<u8>>,
    received: usize,
    max_speed_hz: u32,
    fail: bool,
}

impl MockBus {
    pub fn new(initial_speed_hz: u32) -> Self {
        Self {
            regs: [0; 128],
            transactions: Vec::new(),
            sent: None,
            received: 0,
            max_speed_hz: initial_speed_hz,
            fail: false,
        }
    }

    /// Precarga registros a partir de `reg`
    pub fn set_regs(&mut self, reg: u8, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.regs[(reg as usize + i) & 0x7F] = *byte;
        }
    }

    pub fn reg(&self, reg: u8) -> u8 {
        self.regs[(reg & 0x7F) as usize]
    }

    pub fn transactions(&self) -> Vec<BusTransaction> {
        self.transactions.clone()
    }

    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    /// Escrituras dirigidas a `reg`
    pub fn writes_to(&self, reg: u8) -> Vec<Vec<u8>> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                BusTransaction::Write { reg: r, data } if *r == reg => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn set_fail(&mut self, fail: bool) {
        self.fail = fail;
    }
}

impl BusDevice for MockBus {
    type Error = MockBusError;

    fn begin(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockBusError);
        }
        assert!(self.sent.is_none(), "transacción anidada");
        self.sent = Some(Vec::new());
        self.received = 0;
        Ok(())
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        let sent = self.sent.take().expect("end sin begin");
        let Some((&addr, payload)) = sent.split_first() else {
            return Ok(());
        };
        let reg = addr & !READ_FLAG;
        if addr & READ_FLAG != 0 {
            self.transactions.push(BusTransaction::Read {
                reg,
                len: self.received,
            });
        } else {
            self.set_regs(reg, payload);
            self.transactions.push(BusTransaction::Write {
                reg,
                data: payload.to_vec(),
            });
        }
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.sent
            .as_mut()
            .expect("send fuera de transacción")
            .extend_from_slice(data);
        Ok(())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        let addr = self.sent.as_ref().expect("receive fuera de transacción")[0];
        let start = (addr & !READ_FLAG) as usize + self.received;
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = self.regs[(start + i) & 0x7F];
        }
        self.received += buffer.len();
        Ok(())
    }

    fn set_max_speed_hz(&mut self, hz: u32) -> Result<(), Self::Error> {
        self.max_speed_hz = hz;
        Ok(())
    }

    fn max_speed_hz(&self) -> u32 {
        self.max_speed_hz
    }
}

/// Proveedor de esperas que sólo acumula el tiempo pedido
#[derive(Debug, Default)]
pub struct RecordingDelay {
    total_ns: u64,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
    }
}

/// Registro de diagnóstico capturado en el hilo de la prueba
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLog {
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

std::thread_local! {
    static CAPTURED: RefCell<Vec<CapturedLog>> = RefCell::new(Vec::new());
}

/// Logger global que guarda los registros por hilo; cada prueba corre en
/// su propio hilo y sólo ve lo que ella misma emite
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|logs| {
            logs.borrow_mut().push(CapturedLog {
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            })
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static LOGGER_INIT: Once = Once::new();

/// Instala el logger de captura (una vez por proceso) y vacía los
/// registros del hilo actual
pub fn start_log_capture() {
    LOGGER_INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    CAPTURED.with(|logs| logs.borrow_mut().clear());
}

/// Registros del hilo actual con el nivel dado
pub fn captured_logs(level: log::Level) -> Vec<CapturedLog> {
    CAPTURED.with(|logs| {
        logs.borrow()
            .iter()
            .filter(|log| log.level == level)
            .cloned()
            .collect()
    })
}
