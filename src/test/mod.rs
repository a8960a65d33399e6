//! Scenario tests against a simulated transceiver

mod radio;
