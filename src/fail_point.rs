//! Allocation fault injection.
//!
//! Each table owns an `AllocGate` and asks it before every allocation of
//! backing storage. Outside of tests (and without the `fault_injection`
//! feature) the gate is zero-sized and always admits.

use crate::error::AllocError;

#[derive(Debug, Default)]
pub(crate) struct AllocGate {
    #[cfg(any(test, feature = "fault_injection"))]
    remaining: Option<usize>,
}

impl AllocGate {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(any(test, feature = "fault_injection"))]
            remaining: None,
        }
    }

    /// Ask for one allocation at `site`; fails with `site` once the armed
    /// budget is spent.
    #[inline]
    pub(crate) fn admit(&mut self, site: AllocError) -> Result<(), AllocError> {
        #[cfg(any(test, feature = "fault_injection"))]
        {
            if let Some(n) = self.remaining.as_mut() {
                if *n == 0 {
                    return Err(site);
                }
                *n -= 1;
            }
        }
        #[cfg(not(any(test, feature = "fault_injection")))]
        let _ = site;
        Ok(())
    }

    /// Let `n` more allocations succeed, then fail every one after them.
    #[cfg(any(test, feature = "fault_injection"))]
    pub(crate) fn arm(&mut self, n: usize) {
        self.remaining = Some(n);
    }

    #[cfg(any(test, feature = "fault_injection"))]
    pub(crate) fn disarm(&mut self) {
        self.remaining = None;
    }
}
