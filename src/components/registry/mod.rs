//! Registry views: the mint/edit form and the listing.

mod form;
mod list;

pub use form::DomainForm;
pub use list::MintList;
