pub mod diff;
pub mod publish;
pub mod status;
