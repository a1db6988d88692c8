//! GPIO input poller

use defmt::*;
use embassy_time::{Duration, Ticker};
use gatelink_core::gpio::{Debouncer, GPIO_INPUT_COUNT, SAMPLE_PERIOD_MS};
use gatelink_core::Router;
use gatelink_hal::InputPin;
use gatelink_hal_stm32::InputLine;

use crate::gateway::Gateway;

/// Sample every input and report debounced low events
#[embassy_executor::task]
pub async fn gpio_task(inputs: [InputLine; GPIO_INPUT_COUNT], router: Router<'static, Gateway>) {
    info!("GPIO poller started");

    let mut debouncer = Debouncer::<GPIO_INPUT_COUNT>::new();
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_PERIOD_MS));

    loop {
        ticker.next().await;

        for (index, input) in inputs.iter().enumerate() {
            if debouncer.sample(index, input.is_low()) {
                let number = index as u8 + 1;
                info!("GPIO{} low", number);
                router.report_input(number).await;
            }
        }
    }
}
