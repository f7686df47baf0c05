//! Lectura básica de una IMU Invensense sobre spidev
//!
//! Uso: linux_basic [bus] [cs] [imu]   (por defecto: 0 0 icm20602)

use invensense_rs::{
    self, AccelFullScale, FifoSetting, GyroFullScale, ImuType, InvensenseConfig, SpiConfig,
};
use linux_embedded_hal::Delay;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

fn main() {
    env_logger::init();
    println!("Invensense - Ejemplo básico");

    let mut args = std::env::args().skip(1);
    let bus: u8 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);
    let cs: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);
    let imu_type = match args.next().map(|a| a.parse::<ImuType>()) {
        None => ImuType::Icm20602,
        Some(Ok(imu)) => imu,
        Some(Err(e)) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    // Flag para controlar la ejecución del programa
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    // Configurar el manejador para Ctrl+C
    ctrlc::set_handler(move || {
        println!("\nDeteniendo el programa...");
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error al configurar el manejador de Ctrl+C");

    let config = InvensenseConfig::new(imu_type)
        .with_spi(SpiConfig::new(bus, cs))
        .with_accel_scale(AccelFullScale::Fs2G)
        .with_gyro_scale(GyroFullScale::Fs250Dps);

    let mut device = match invensense_rs::new_linux_device(Delay {}, config) {
        Ok(device) => device,
        Err(e) => {
            eprintln!("Error al abrir {}: {}", config.spi.spidev_path(), e);
            return;
        }
    };

    match device.initialize() {
        Ok(whoami) => println!("{} inicializado (whoami=0x{:02X})", imu_type.name(), whoami),
        Err(e) => {
            eprintln!("Error al inicializar el dispositivo: {}", e);
            return;
        }
    }

    if let Err(e) = device.enable_fifo(FifoSetting::AccelGyro) {
        eprintln!("Error al activar el FIFO: {}", e);
    }

    println!("Leyendo datos. Presiona Ctrl+C para detener...");

    while running.load(Ordering::SeqCst) {
        match device.read_accel() {
            Ok(a) => println!("Aceleración: x={:.3}G, y={:.3}G, z={:.3}G", a.x, a.y, a.z),
            Err(e) => eprintln!("Error al leer acelerómetro: {}", e),
        }

        match device.read_gyro() {
            Ok(g) => println!("Giroscopio: x={:.2}°/s, y={:.2}°/s, z={:.2}°/s", g.x, g.y, g.z),
            Err(e) => eprintln!("Error al leer giroscopio: {}", e),
        }

        match device.read_temperature() {
            Ok(t) => println!("Temperatura: {:.2}°C", t),
            Err(e) => eprintln!("Error al leer temperatura: {}", e),
        }

        match device.fifo_byte_count() {
            Ok(n) => println!("FIFO: {} bytes", n),
            Err(e) => eprintln!("Error al leer el FIFO: {}", e),
        }

        // El FIFO sobrescribe lo más antiguo; se vacía en cada vuelta
        if let Err(e) = device.reset_fifo() {
            eprintln!("Error al vaciar el FIFO: {}", e);
        }
        println!("-------------------");
        thread::sleep(Duration::from_millis(200));
    }

    if let Err(e) = device.disable_fifo() {
        eprintln!("Error al desactivar el FIFO: {}", e);
    }
    println!("Ejemplo finalizado");
}
