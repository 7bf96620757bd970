pub mod agent;
pub mod projectile;

pub use agent::AgentEntity;
pub use projectile::{ProjectileEntity, ProjectileStatus};
