pub mod calibration;
pub mod clock;
pub mod engine;
pub mod judge;
pub mod replay;
