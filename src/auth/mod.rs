mod claims;
pub mod jwt;

pub use jwt::AuthUser;

#[cfg(test)]
pub(crate) use claims::TokenKind;
