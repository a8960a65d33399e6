//! Property definitions for the Si4463 radio
//!
//! Properties are addressed by a 16-bit id: the property group in the high
//! byte and the index inside the group in the low byte. They are read with
//! GET_PROPERTY and written with SET_PROPERTY through
//! [`Device::read_property`](crate::Device::read_property) and
//! [`Device::write_property`](crate::Device::write_property).
//!
//! Only the properties the driver changes at run time are modelled here. The
//! bulk configuration is replayed from the [`catalog`](crate::catalog).

mod int_ctl;
mod pa;
mod packet;

pub use int_ctl::*;
pub use pa::*;
pub use packet::*;
