//! Line levels and framing constants.
//!
//! Levels are modelled as `bool` with `true` meaning logic high.

/// Logic high on a UART line (mark).
pub const LINE_MARK: bool = true;

/// Logic low on a UART line (space).
pub const LINE_SPACE: bool = false;

/// Idle level of a UART line.
pub const LINE_IDLE: bool = LINE_MARK;

/// Chip-select level when no slave is addressed (active-low signal).
pub const CS_INACTIVE: bool = true;

/// Number of bits in one SPI transfer.
pub const SPI_WORD_BITS: u8 = 8;

/// Number of SCLK edges in one SPI transfer (two per bit).
pub const SPI_EDGES_PER_WORD: u8 = SPI_WORD_BITS * 2;

/// Smallest data width a UART frame may carry.
pub const UART_MIN_DATA_BITS: u8 = 5;

/// Largest data width a UART frame may carry.
pub const UART_MAX_DATA_BITS: u8 = 8;

/// Fewest stop bits a UART frame may end with.
pub const UART_MIN_STOP_BITS: u8 = 1;

/// Most stop bits a UART frame may end with.
pub const UART_MAX_STOP_BITS: u8 = 2;

/// Smallest oversampling ratio the receiver accepts.
///
/// The receiver samples the start bit at `oversample / 2`, so anything below
/// two leaves no mid-bit point to sample.
pub const UART_MIN_OVERSAMPLE: u32 = 2;
