mod event;
mod status;
mod token;

pub mod dtos {
    pub use crate::event::dtos::*;
    pub use crate::token::dtos::*;
}

pub use crate::event::api::*;
pub use crate::status::api::*;
pub use crate::token::api::*;
