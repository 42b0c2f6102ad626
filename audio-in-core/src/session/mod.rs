pub mod capture;
pub mod control;
pub mod pump;
