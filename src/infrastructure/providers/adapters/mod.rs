//! # Provider Adapters
//!
//! One module per money-transfer provider integration. Every adapter
//! implements [`ProviderAdapter`](super::traits::ProviderAdapter) and
//! is registered, in fan-out order, by
//! [`default_registry`](super::default_registry).

pub mod dahabshiil;
pub mod intermex;
pub mod koronapay;
pub mod paysend;
pub mod remitbee;
pub mod singx;
pub mod transfergo;
pub mod westernunion;
pub mod wise;
pub mod xe;

pub use dahabshiil::DahabshiilAdapter;
pub use intermex::IntermexAdapter;
pub use koronapay::KoronaPayAdapter;
pub use paysend::PaysendAdapter;
pub use remitbee::RemitbeeAdapter;
pub use singx::SingXAdapter;
pub use transfergo::TransferGoAdapter;
pub use westernunion::WesternUnionAdapter;
pub use wise::WiseAdapter;
pub use xe::XeAdapter;
