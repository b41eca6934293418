pub mod pairing;
pub mod storage;
pub mod verifier;
