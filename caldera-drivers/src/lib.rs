//! Hardware driver implementations
//!
//! Adapters from `caldera-hal` pins and converters onto the capability
//! traits in `caldera-core`:
//!
//! - Heater relay on a digital output ([`relay::Relay`])
//! - Enable switch on a digital input ([`switch::EnableSwitch`])
//! - Boiler thermistor on an ADC channel ([`sensor::Thermistor`])

#![no_std]
#![deny(unsafe_code)]

pub mod relay;
pub mod sensor;
pub mod switch;
