mod client;
mod device;
mod energy;
mod error;
mod features;
pub mod protocol;
pub mod schema;
mod session;
mod types;

pub use client::{AristonClient, AristonClientBuilder};
pub use device::{Device, Family, VelisModel};
pub use energy::{ConsumptionHistory, ConsumptionSequence, EnergyAccount, Usage};
pub use error::{Error, Result};
pub use features::Features;
pub use session::Session;
pub use types::*;
