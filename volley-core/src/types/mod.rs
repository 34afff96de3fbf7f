mod ident;
mod item;

pub use ident::FetchId;
pub use item::Item;
