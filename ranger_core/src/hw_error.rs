//! Maps `Box<dyn Error>` from trait boundaries to typed `RangerError`.
//!
//! The traits in `ranger_traits` use `Box<dyn Error + Send + Sync>`; this module
//! converts those to our typed error enum, with an optional feature-gated path
//! for `ranger_hardware::HwError` downcasting.

use crate::error::RangerError;

/// Map a capture-device error raised during a query.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> RangerError {
    #[cfg(feature = "hardware-errors")]
    {
        use ranger_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::PinUnavailable(_) | HwError::PinBusy(_) | HwError::ZeroCapacity => {
                    RangerError::Device(hw.to_string())
                }
                HwError::NotConnected => RangerError::Link(hw.to_string()),
                other => RangerError::Hardware(other.to_string()),
            };
        }
    }

    RangerError::Hardware(e.to_string())
}

/// Map an error from the wireless link; every link failure is a `Link` error.
pub fn map_link_error(e: &(dyn std::error::Error + 'static)) -> RangerError {
    RangerError::Link(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_errors_fall_back_to_hardware() {
        let e = std::io::Error::other("bus glitch");
        assert_eq!(
            map_hw_error(&e),
            RangerError::Hardware("bus glitch".to_string())
        );
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn typed_hw_errors_are_classified() {
        use ranger_hardware::error::HwError;
        assert!(matches!(
            map_hw_error(&HwError::PinBusy(13)),
            RangerError::Device(_)
        ));
        assert!(matches!(
            map_hw_error(&HwError::NotConnected),
            RangerError::Link(_)
        ));
        assert!(matches!(
            map_hw_error(&HwError::Gpio("x".into())),
            RangerError::Hardware(_)
        ));
    }
}
