#![no_main]
#![no_std]

use cortex_m_rt::entry;
use log::{error, info, LevelFilter};
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
    timer::{Channel1, Channel2},
};
use stm32f7xx_hal as hal;

use zumo_motion::config;
use zumo_motion::control::{Geometry, MotionConfig, MotionController};
use zumo_motion::drivers::{QuadratureEncoders, ZumoMotors};
use zumo_motion::hw::{BoardPins, Encoder, SysTickDelay, Usart, UsartLogger};

static LOGGER: UsartLogger<pac::USART1> = UsartLogger::new();

/// Side length of the demo square (cm).
const SQUARE_SIDE_CM: f32 = 30.0;

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOD);

    // USART1 (DBG) -> log
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    LOGGER.install(Usart::new(serial), LevelFilter::Info).ok();

    // TIM4 PWM -> motors
    let channels = (
        Channel1::new(pins.motors.left_pwm),
        Channel2::new(pins.motors.right_pwm),
    );
    let (pwm_left, pwm_right) = dp.TIM4.pwm_hz(channels, 20.kHz(), &clocks).split();
    let motors = ZumoMotors::new(
        pwm_left,
        pwm_right,
        pins.motors.left_dir,
        pins.motors.right_dir,
    )
    .flip_right(true);

    // TIM2/TIM3 -> encoders. The pins only need to stay in AF mode.
    let _encoder_pins = pins.encoders;
    let encoders =
        QuadratureEncoders::new(Encoder::tim2(dp.TIM2), Encoder::tim3(dp.TIM3)).invert_right(true);

    let delay = SysTickDelay::new(cp.SYST, clocks.sysclk().raw());

    let config = MotionConfig::default()
        .with_stall_timeout(50)
        .with_max_distance_cm(200.0);

    let mut ctrl = match MotionController::new(motors, encoders, delay, Geometry::zumo(), config) {
        Ok(ctrl) => ctrl,
        Err(e) => {
            error!("controller config rejected: {}", e);
            loop {
                cortex_m::asm::wfi();
            }
        }
    };

    info!(
        "ticks/cm={} ticks/deg={}",
        ctrl.geometry().ticks_per_cm(),
        ctrl.geometry().ticks_per_degree()
    );

    // Timed straight run for finding TRIM. Watch which way the robot curves.
    ctrl.run_timed(config::TEST_DURATION_MS);
    info!(
        "motor test {} done, trim={} ({:?})",
        ctrl.tests_run(),
        ctrl.trim().value(),
        ctrl.trim().advice()
    );

    // Drive a square, ramping each side.
    for side in 0..4 {
        let result = ctrl
            .drive_straight(SQUARE_SIDE_CM, true)
            .and_then(|_| ctrl.turn_in_place(90.0));

        if let Err(e) = result {
            error!("side {}: {}", side, e);
            break;
        }
    }

    info!("done");

    loop {
        cortex_m::asm::wfi();
    }
}
