pub mod delay;
pub mod encoder;
pub mod pins;
pub mod usart;

pub use delay::SysTickDelay;
pub use encoder::Encoder;
pub use pins::BoardPins;
pub use usart::{Usart, UsartLogger};
