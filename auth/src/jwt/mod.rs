pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::SessionClaims;
pub use codec::SessionTokenCodec;
pub use errors::TokenError;
