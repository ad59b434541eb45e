//! Peripheral state machine tests.
//!
//! Each model is clocked directly, without the testbench, so the tests pin
//! down exact cycle behaviour.


/// UART receiver sampling, glitch rejection and framing errors.
pub mod uart_rx;
