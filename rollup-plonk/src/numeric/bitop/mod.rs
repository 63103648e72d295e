mod get_msb;

pub use get_msb::{round_up_power_2, Msb};
