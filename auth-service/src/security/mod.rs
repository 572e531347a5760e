/// Security module for authentication
///
/// Password hashing lives here; RS256 signing/verification comes from the
/// shared token-codec library.
pub mod password;
pub mod verification;

pub use token_codec::{KeyClass, TokenCodec, Verification};
