pub mod form;
pub mod parse;
pub mod password;
pub mod random;
pub mod slug;
