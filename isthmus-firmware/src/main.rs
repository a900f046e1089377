//! Isthmus - MAX3140 bridge firmware
//!
//! Bridges a host UART to an RS-485 line driven by a MAX3140 on SPI0.
//! Bytes from the host are queued on the chip's transmit path; bytes the
//! chip receives are forwarded back to the host.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{SPI0, UART0};
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as HostUartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use isthmus_core::{PortConfig, DEFAULT_TX_QUEUE_SIZE};
use isthmus_drivers::Port;
use isthmus_hal::spi::{Phase, Polarity, SpiConfig};

use crate::bus::ChipSelectBus;
use crate::channels::ChannelSink;
use crate::config::parse_config;

mod bus;
mod channels;
mod config;
mod tasks;

/// Embedded startup configuration (compiled into firmware)
/// Edit port.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../port.toml");

/// Host link speed
const HOST_BAUDRATE: u32 = 115_200;

/// The MAX3140 port as wired on this board
pub type BridgePort = Port<
    CriticalSectionRawMutex,
    ChipSelectBus<Spi<'static, SPI0, Blocking>, Output<'static>>,
    Delay,
    ChannelSink,
    DEFAULT_TX_QUEUE_SIZE,
>;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

static PORT: StaticCell<BridgePort> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Isthmus firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let port_config = load_config();

    // SPI0 to the MAX3140 (SCK=GPIO18, MOSI=GPIO19, MISO=GPIO16, CS=GPIO17)
    let bus_settings = SpiConfig::MAX3140;
    let (polarity, phase): (Polarity, Phase) = bus_settings.mode.into();
    let mut spi_config = spi::Config::default();
    spi_config.frequency = bus_settings.frequency;
    spi_config.polarity = match polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    spi_config.phase = match phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);

    // Active-low IRQ from the MAX3140 (GPIO20)
    let irq = Input::new(p.PIN_20, Pull::Up);

    let port: &'static BridgePort = PORT.init(Port::new(
        ChipSelectBus::new(spi, cs),
        Delay,
        port_config,
    ));

    // The chip may still be coming out of power-on reset
    while let Err(e) = port.start() {
        warn!("MAX3140 start failed: {}, retrying", e);
        Timer::after_millis(100).await;
    }
    info!("MAX3140 configured");

    if let Err(e) = port.open(ChannelSink) {
        error!("Failed to open port: {}", e);
    }

    // Host link on UART0 (TX=GPIO0, RX=GPIO1)
    let mut host_config = HostUartConfig::default();
    host_config.baudrate = HOST_BAUDRATE;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, host_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("Host UART initialized");

    spawner.spawn(tasks::irq_task(port, irq)).unwrap();
    spawner.spawn(tasks::host_rx_task(port, rx)).unwrap();
    spawner.spawn(tasks::host_tx_task(tx)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        if let Err(e) = port.driver().check_transfers() {
            warn!("{}: {} so far", e, port.driver().transfer_faults());
        }
        trace!("heartbeat: {} queued", port.chars_in_buffer());
    }
}

/// Parse the embedded port.toml
///
/// Falls back to 9600 8N1 if the file does not parse; build.rs should
/// have caught that already.
fn load_config() -> PortConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Line: {} baud, retry limit {}",
                config.line.baudrate, config.write_retry_limit
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            PortConfig::default()
        }
    }
}
