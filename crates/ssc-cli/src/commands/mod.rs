pub mod convert;
pub mod group;
pub mod inspect;
