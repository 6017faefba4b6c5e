//! Checks over the generated `<adminType><Bucket>` definitions.

pub mod closure;
pub mod operator_code;
pub mod partition;
pub mod refs;
pub mod wildcard;
