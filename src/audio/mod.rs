pub mod decode;
pub mod envelope;
pub mod onset;
