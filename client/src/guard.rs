//! Single-flight guard for network-bound operations

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ClientError, ClientResult};

/// Held while a request is pending; releases the flag when dropped, including
/// when the pending future itself is dropped.
pub(crate) struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> ClientResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::RequestInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected_until_release() {
        let flag = AtomicBool::new(false);
        let first = InFlight::acquire(&flag).unwrap();
        assert!(matches!(
            InFlight::acquire(&flag),
            Err(ClientError::RequestInFlight)
        ));
        drop(first);
        assert!(InFlight::acquire(&flag).is_ok());
    }
}
