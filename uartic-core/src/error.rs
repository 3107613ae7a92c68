//! Driver status codes

use uartic_hal::HwError;

/// Why a request was rejected
///
/// Success is `Ok(())`; every rejection is reported before any hardware
/// state changes unless noted otherwise on the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Hardware rejected the operation, or the channel is not open
    Failed,
    /// The direction already owns a transfer, or a frame is still shifting
    Busy,
    /// Missing buffer, zero length, unsupported baud rate or unknown request
    InvalidArgument,
    /// Requested length exceeds the supplied buffer
    OutOfBound,
}

/// Result of a driver request
pub type UartResult = Result<(), UartError>;

impl From<HwError> for UartError {
    fn from(e: HwError) -> Self {
        match e {
            HwError::Failed => UartError::Failed,
            HwError::Busy => UartError::Busy,
        }
    }
}
