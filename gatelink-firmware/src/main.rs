//! Gatelink - Building-Automation Protocol Gateway Firmware
//!
//! Main firmware binary for STM32F407 boards with an RMII Ethernet PHY.
//! Bridges UDP, an RS-485 bus and two RS-232 links to local relays, IR
//! emitters and GPIO sensors. Every medium carries the same frame format,
//! so any of them can command and observe the same devices.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Ipv4Cidr, StackResources, StaticConfigV4};
use embassy_stm32::eth::{Ethernet, GenericPhy, PacketQueue};
use embassy_stm32::gpio::{Input, Level, Output, OutputType, Pull, Speed};
use embassy_stm32::mode::Blocking;
use embassy_stm32::peripherals::{RNG, TIM3, TIM4};
use embassy_stm32::rng::Rng;
use embassy_stm32::time::{khz, Hertz};
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::usart::{ConfigError, Uart};
use embassy_stm32::{bind_interrupts, eth, interrupt, pac, rng, Config};
use embassy_sync::once_lock::OnceLock;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use gatelink_core::config::BUS_UART;
use gatelink_core::ir::IR_PORT_COUNT;
use gatelink_core::traits::SerialPort;
use gatelink_core::{GatewayConfig, IrBlaster, RelayBank, Router, Rs485Bus};
use gatelink_hal_stm32::{usart_config, InputLine, OutputLine, TimerCarrier, UsartPort};

mod gateway;
mod serial;
mod tasks;

use crate::gateway::Gateway;
use crate::serial::{Port, BUS_PORT, SERIAL1_PORT, SERIAL2_PORT};

/// Embedded configuration (compiled into firmware)
/// Edit gateway.cfg and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../gateway.cfg");

/// IR code tables, one per port; an empty file leaves the port unused
const IR_TABLES: [&str; IR_PORT_COUNT] = [
    include_str!("../ir/IR1.txt"),
    include_str!("../ir/IR2.txt"),
    include_str!("../ir/IR3.txt"),
    include_str!("../ir/IR4.txt"),
    include_str!("../ir/IR5.txt"),
    include_str!("../ir/IR6.txt"),
];

/// Input clock of TIM3/TIM4 (APB1 timers, see `rcc_config`)
const TIMER_CLOCK_HZ: u32 = 84_000_000;

/// Initial carrier frequency; codes set their own period when played
const IR_CARRIER_KHZ: u32 = 38;

bind_interrupts!(struct Irqs {
    ETH => eth::InterruptHandler;
    HASH_RNG => rng::InterruptHandler<RNG>;
});

/// Socket buffers (must live forever)
struct UdpBuffers {
    rx_meta: [PacketMetadata; 4],
    rx: [u8; 1024],
    tx_meta: [PacketMetadata; 4],
    tx: [u8; 1024],
}

// Static cells for everything tasks reference
static PACKETS: StaticCell<PacketQueue<4, 4>> = StaticCell::new();
static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
static UDP_BUFFERS: StaticCell<UdpBuffers> = StaticCell::new();
static SOCKET: StaticCell<UdpSocket<'static>> = StaticCell::new();
static PWM3: StaticCell<SimplePwm<'static, TIM3>> = StaticCell::new();
static PWM4: StaticCell<SimplePwm<'static, TIM4>> = StaticCell::new();
static GATEWAY: StaticCell<Gateway> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Gatelink firmware starting...");

    let p = embassy_stm32::init(rcc_config());
    info!("Peripherals initialized");

    let config = load_config();

    // Serial ports: RS-485 on USART2, RS-232 links on USART3 and USART6
    let bus_port = open_port(
        &BUS_PORT,
        interrupt::USART2,
        Uart::new_blocking(p.USART2, p.PD6, p.PD5, usart_config(&BUS_UART)),
        pac::USART2,
    );
    let serial1 = open_port(
        &SERIAL1_PORT,
        interrupt::USART3,
        Uart::new_blocking(
            p.USART3,
            p.PD9,
            p.PD8,
            usart_config(&config.serial_uart(SerialPort::Port1)),
        ),
        pac::USART3,
    );
    let serial2 = open_port(
        &SERIAL2_PORT,
        interrupt::USART6,
        Uart::new_blocking(
            p.USART6,
            p.PC7,
            p.PC6,
            usart_config(&config.serial_uart(SerialPort::Port2)),
        ),
        pac::USART6,
    );
    info!(
        "Serial ports open: RS-485 {} baud, RS-232 {}/{} baud",
        BUS_UART.baudrate, config.serial_baud[0], config.serial_baud[1]
    );

    // Relays, all off
    let relays = RelayBank::new([
        OutputLine::new(Output::new(p.PE0, Level::Low, Speed::Low)),
        OutputLine::new(Output::new(p.PE1, Level::Low, Speed::Low)),
        OutputLine::new(Output::new(p.PE2, Level::Low, Speed::Low)),
    ]);

    // Transceiver starts in receive mode
    let direction = OutputLine::new(Output::new(p.PD7, Level::Low, Speed::Low));
    let bus = Rs485Bus::new(bus_port, direction, Delay);

    // IR emitters: TIM3 CH1-4 and TIM4 CH1-2
    let mut pwm3 = SimplePwm::new(
        p.TIM3,
        Some(PwmPin::new(p.PB4, OutputType::PushPull)),
        Some(PwmPin::new(p.PB5, OutputType::PushPull)),
        Some(PwmPin::new(p.PB0, OutputType::PushPull)),
        Some(PwmPin::new(p.PB1, OutputType::PushPull)),
        khz(IR_CARRIER_KHZ),
        Default::default(),
    );
    pwm3.ch1().enable();
    pwm3.ch2().enable();
    pwm3.ch3().enable();
    pwm3.ch4().enable();
    PWM3.init(pwm3);

    let mut pwm4 = SimplePwm::new(
        p.TIM4,
        Some(PwmPin::new(p.PD12, OutputType::PushPull)),
        Some(PwmPin::new(p.PD13, OutputType::PushPull)),
        None,
        None,
        khz(IR_CARRIER_KHZ),
        Default::default(),
    );
    pwm4.ch1().enable();
    pwm4.ch2().enable();
    PWM4.init(pwm4);

    let tables = IR_TABLES.map(|table| (!table.trim().is_empty()).then_some(table));
    let ir = IrBlaster::new(
        tables,
        [
            TimerCarrier::new(pac::TIM3, 0, TIMER_CLOCK_HZ),
            TimerCarrier::new(pac::TIM3, 1, TIMER_CLOCK_HZ),
            TimerCarrier::new(pac::TIM3, 2, TIMER_CLOCK_HZ),
            TimerCarrier::new(pac::TIM3, 3, TIMER_CLOCK_HZ),
            TimerCarrier::new(pac::TIM4, 0, TIMER_CLOCK_HZ),
            TimerCarrier::new(pac::TIM4, 1, TIMER_CLOCK_HZ),
        ],
        Delay,
    );

    // Sensor inputs, pulled up and switched to ground
    let inputs = [
        InputLine::new(Input::new(p.PE8, Pull::Up)),
        InputLine::new(Input::new(p.PE9, Pull::Up)),
        InputLine::new(Input::new(p.PE10, Pull::Up)),
        InputLine::new(Input::new(p.PE11, Pull::Up)),
        InputLine::new(Input::new(p.PE12, Pull::Up)),
        InputLine::new(Input::new(p.PE13, Pull::Up)),
        InputLine::new(Input::new(p.PE14, Pull::Up)),
        InputLine::new(Input::new(p.PE15, Pull::Up)),
    ];

    // Network: locally administered MAC derived from the device ID
    let mac_addr = [0x02, 0x00, 0x47, 0x4C, 0x00, config.device_id];
    let device = Ethernet::new(
        PACKETS.init(PacketQueue::<4, 4>::new()),
        p.ETH,
        Irqs,
        p.PA1,
        p.PA2,
        p.PC1,
        p.PA7,
        p.PC4,
        p.PC5,
        p.PG13,
        p.PB13,
        p.PG11,
        GenericPhy::new_auto(),
        mac_addr,
    );

    let net_config = embassy_net::Config::ipv4_static(StaticConfigV4 {
        address: Ipv4Cidr::new(config.address, config.prefix_len()),
        gateway: Some(config.gateway),
        dns_servers: heapless::Vec::new(),
    });

    let mut rng = Rng::new(p.RNG, Irqs);
    let mut seed = [0u8; 8];
    if let Err(e) = rng.async_fill_bytes(&mut seed).await {
        warn!("RNG failed ({:?}), using fixed network seed", e);
    }

    let (stack, runner) = embassy_net::new(
        device,
        net_config,
        RESOURCES.init(StackResources::new()),
        u64::from_le_bytes(seed),
    );
    spawner.spawn(tasks::net_task(runner)).unwrap();

    let UdpBuffers {
        rx_meta,
        rx,
        tx_meta,
        tx,
    } = UDP_BUFFERS.init(UdpBuffers {
        rx_meta: [PacketMetadata::EMPTY; 4],
        rx: [0; 1024],
        tx_meta: [PacketMetadata::EMPTY; 4],
        tx: [0; 1024],
    });
    let mut socket = UdpSocket::new(stack, rx_meta, rx, tx_meta, tx);
    if let Err(e) = socket.bind(config.udp_port) {
        error!("UDP bind to port {} failed: {:?}", config.udp_port, e);
    }
    let socket: &'static UdpSocket<'static> = SOCKET.init(socket);

    let gateway: &'static Gateway = GATEWAY.init(Gateway {
        relays,
        serial: [serial1, serial2],
        bus,
        ir,
        socket,
        peer: IpEndpoint::new(IpAddress::Ipv4(config.peer), config.udp_port),
    });

    let router = || Router::new(config.device_id, gateway);
    spawner.spawn(tasks::udp_task(socket, router())).unwrap();
    spawner.spawn(tasks::rs485_task(bus_port, router())).unwrap();
    spawner
        .spawn(tasks::rs232_task(SerialPort::Port1, serial1, gateway))
        .unwrap();
    spawner
        .spawn(tasks::rs232_task(SerialPort::Port2, serial2, gateway))
        .unwrap();
    spawner.spawn(tasks::gpio_task(inputs, router())).unwrap();

    info!("All tasks spawned, waiting for network");
    stack.wait_config_up().await;
    info!("Network up, listening on UDP port {}", config.udp_port);
}

/// Clock tree: 8 MHz HSE -> 168 MHz SYSCLK, APB1 42 MHz (timers 84 MHz)
fn rcc_config() -> Config {
    use embassy_stm32::rcc::*;

    let mut config = Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL168,
        divp: Some(PllPDiv::DIV2),
        divq: Some(PllQDiv::DIV7),
        divr: None,
    });
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV4;
    config.rcc.apb2_pre = APBPrescaler::DIV2;
    config.rcc.sys = Sysclk::PLL1_P;
    config
}

/// Parse the embedded configuration, logging every line that kept its default
fn load_config() -> GatewayConfig {
    let (config, issues) = GatewayConfig::parse(EMBEDDED_CONFIG);
    for issue in &issues {
        warn!(
            "gateway.cfg: {:?} is {:?}, using default",
            issue.field, issue.kind
        );
    }

    let ip = config.address.octets();
    let gw = config.gateway.octets();
    info!(
        "Device {} at {}.{}.{}.{}/{} via {}.{}.{}.{}",
        config.device_id,
        ip[0],
        ip[1],
        ip[2],
        ip[3],
        config.prefix_len(),
        gw[0],
        gw[1],
        gw[2],
        gw[3]
    );
    config
}

/// Configure one USART for interrupt-driven use
fn open_port(
    slot: &'static OnceLock<Port>,
    irq: interrupt::Interrupt,
    driver: Result<Uart<'static, Blocking>, ConfigError>,
    regs: pac::usart::Usart,
) -> &'static Port {
    let driver = unwrap!(driver);
    serial::install(slot, irq, UsartPort::new(driver, regs))
}
