//! # caseshare-ref
//!
//! Reference walkthroughs for the caseshare access-control engine.
//!
//! Each scenario builds a fresh engine from the bundled configuration, plays
//! out one sharing story with fictional patients and doctors, and prints
//! what every doctor can see at each step:
//!
//! 1. **Private mention**: a patient mentions one doctor on a private case;
//!    a second doctor and an unverified account get nothing.
//! 2. **Public toggle**: "share with all doctors" is switched on and off
//!    while an explicit grant survives both transitions.
//! 3. **Revocation and export**: one of three mentions is revoked and a
//!    multi-case export is refused until it only names accessible cases.
//! 4. **Audit trail**: the hash-chained ledger is exported and verified,
//!    together with an index consistency check.
//!
//! No network or storage is touched.

pub mod mock_data;
pub mod scenarios;
