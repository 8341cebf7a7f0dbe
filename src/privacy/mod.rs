pub mod codec;
pub mod toggle;

pub use codec::{decode, encode, PrivacySet};
pub use toggle::PrivacyToggleService;
