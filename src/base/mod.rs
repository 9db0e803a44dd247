//! Base types and error handling.
//!
//! Provides foundational types mirroring Chromium's `net/base/`:
//! - [`NetError`](neterror::NetError): Network error codes matching `net_error_list.h`
//! - [`LoadState`](loadstate::LoadState): Proxy resolution states from `load_states_list.h`

pub mod loadstate;
pub mod neterror;

#[cfg(test)]
mod tests;
