pub mod health;
pub mod lookup;
